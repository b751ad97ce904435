//! Lazy page sequence over one entity set

use super::next_link::NextLinkPaginator;
use super::types::{NextPage, PaginationState};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::odata::{Page, FORMAT_PARAM};
use crate::types::Record;
use futures::Stream;
use std::mem;
use tracing::{debug, info};
use url::Url;

/// Pages of one entity set, fetched on demand
///
/// The first request carries `$format=json` and the narrowing parameters.
/// Continuation links already encode the query, so later requests are sent
/// as given.
pub struct Pages<'a> {
    http: &'a HttpClient,
    paginator: NextLinkPaginator,
    next: NextPage,
    params: Vec<(String, String)>,
    state: PaginationState,
}

impl<'a> Pages<'a> {
    /// Start paging at `url` with the given query parameters
    pub fn new(http: &'a HttpClient, url: Url, params: Vec<(String, String)>) -> Self {
        let mut initial = vec![(FORMAT_PARAM.to_string(), "json".to_string())];
        initial.extend(params);

        Self {
            http,
            paginator: NextLinkPaginator::new(),
            next: NextPage::with_url(url),
            params: initial,
            state: PaginationState::new(),
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// True once the last page was fetched or a page failed
    pub fn is_done(&self) -> bool {
        self.next.is_done()
    }

    /// Fetch the next page, `None` after the last one
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        let url = match mem::replace(&mut self.next, NextPage::Done) {
            NextPage::Continue { url } => url,
            NextPage::Done => return Ok(None),
        };

        if self.state.pages == 0 {
            info!("Download {}", url);
        } else {
            debug!("Download {} (page {})", url, self.state.pages + 1);
        }

        let config = RequestConfig {
            query: mem::take(&mut self.params),
            ..RequestConfig::default()
        };
        let body = self.http.get_json(url.as_str(), &config).await?;
        let page = Page::from_value(body)?;

        self.next = self.paginator.process_page(&url, &page, &mut self.state)?;
        debug!(
            "Fetched {} records from {} (total {})",
            page.len(),
            url,
            self.state.total_fetched
        );

        Ok(Some(page))
    }

    /// Fetch every remaining page and concatenate the records in order
    ///
    /// Fails as a whole when any page fails; no partial result is returned.
    pub async fn collect_all(mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(page) = self.next_page().await? {
            records.extend(page.records);
        }
        Ok(records)
    }

    /// Turn the sequence into a stream of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<Page>> + 'a {
        futures::stream::try_unfold(self, |mut pages| async move {
            let page = pages.next_page().await?;
            Ok::<_, Error>(page.map(|page| (page, pages)))
        })
    }
}

impl std::fmt::Debug for Pages<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pages")
            .field("next", &self.next)
            .field("state", &self.state)
            .finish()
    }
}
