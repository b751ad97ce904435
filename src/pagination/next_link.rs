//! `odata.nextLink` pagination
//!
//! The service answers each page with the link to the next one. Links may be
//! absolute or relative to the page that carried them.

use super::types::{NextPage, PaginationState};
use crate::error::{Error, Result};
use crate::odata::Page;
use url::Url;

/// Follows the continuation link carried in each page
#[derive(Debug, Clone, Copy, Default)]
pub struct NextLinkPaginator;

impl NextLinkPaginator {
    pub fn new() -> Self {
        Self
    }

    /// Process a page fetched from `current` and determine the next one
    pub fn process_page(
        &self,
        current: &Url,
        page: &Page,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.add_page(page.len());
        state.visit(current);

        let Some(link) = page.next_link.as_deref() else {
            state.mark_done();
            return Ok(NextPage::Done);
        };

        let next = current
            .join(link)
            .map_err(|e| Error::decode(format!("Invalid next link '{link}': {e}")))?;

        if !state.visit(&next) {
            state.mark_done();
            return Err(Error::PaginationLoop {
                url: next.to_string(),
            });
        }

        Ok(NextPage::with_url(next))
    }
}
