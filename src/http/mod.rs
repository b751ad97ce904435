//! HTTP transport
//!
//! GET-only client used by every OData request.
//!
//! # Features
//!
//! - **Retries**: off by default, opt-in with constant, linear or exponential backoff
//! - **Throttling**: token bucket rate limiter using governor
//! - **Proxies**: one proxy URL for all traffic

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
