//! Pagination module
//!
//! # Overview
//!
//! CBS entity sets are served in pages. Each page may carry an
//! `odata.nextLink` pointing at the following one; the sequence ends on the
//! first page without a link. Page size is never used as a stop signal.
//!
//! [`Pages`] fetches pages lazily, either one by one with
//! [`Pages::next_page`], as a [`futures::Stream`], or all at once with
//! [`Pages::collect_all`].

mod next_link;
mod pages;
mod types;

pub use next_link::NextLinkPaginator;
pub use pages::Pages;
pub use types::{NextPage, PaginationState};
