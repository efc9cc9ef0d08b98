//! Cursor-driven sweep over one collection endpoint

use super::extract::{build_collection_url, extract_cursor, extract_items};
use super::types::{
    ClientProfile, NextPage, PaginationState, PaginatorConfig, SweepRequest, StopReason,
};
use crate::error::{Error, Result};
use crate::http::{PageRequest, RetryingFetcher};
use crate::types::JsonValue;
use tracing::{debug, warn};

/// Walks a collection page by page, feeding each page's last item id back
/// as the `before` cursor until a page comes back empty or without an id.
#[derive(Debug)]
pub struct CursorPaginator {
    fetcher: RetryingFetcher,
    config: PaginatorConfig,
}

impl CursorPaginator {
    /// Create a paginator over the given fetcher
    pub fn new(fetcher: RetryingFetcher, config: PaginatorConfig) -> Self {
        Self { fetcher, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Get the underlying fetcher
    pub fn fetcher(&self) -> &RetryingFetcher {
        &self.fetcher
    }

    /// Fetch every page of a sweep and return the items in page order.
    ///
    /// Any fetch failure aborts the sweep; items from earlier pages are
    /// discarded.
    pub async fn paginate(&self, sweep: &SweepRequest) -> Result<Vec<JsonValue>> {
        self.run(sweep)
            .await
            .map_err(|e| Error::pagination(&sweep.endpoint, e))
    }

    async fn run(&self, sweep: &SweepRequest) -> Result<Vec<JsonValue>> {
        let url = build_collection_url(&self.config.base_url, &sweep.user_id, &sweep.endpoint)?;
        let profile = ClientProfile::for_sweep(
            &self.config.client,
            &self.fetcher.config().user_agent,
            sweep,
        );
        let headers = profile.headers();
        debug!(
            "Sweeping {url} (per_page={}, anonymous_user_id={})",
            sweep.per_page,
            profile.anonymous_user_id()
        );

        let mut state = PaginationState::new();
        let mut items = Vec::new();

        loop {
            let request = PageRequest::new(url.as_str())
                .query("per_page", sweep.per_page)
                .headers(headers.iter().cloned())
                .cursor(state.cursor.clone());

            let body = self.fetcher.fetch(&request).await?;
            let page = extract_items(&body, &sweep.endpoint);
            let next = Self::process_page(page, &mut state);
            items.extend_from_slice(page);

            match next {
                NextPage::Continue(cursor) => {
                    debug!(
                        "{}: page {} had {} items, next before={cursor}",
                        sweep.endpoint,
                        state.pages_fetched,
                        page.len()
                    );
                    self.fetcher.sleeper().sleep(self.config.page_delay).await;
                }
                NextPage::Done(StopReason::CursorUnchanged) => {
                    warn!(
                        "{}: cursor did not advance after page {}, stopping",
                        sweep.endpoint, state.pages_fetched
                    );
                    break;
                }
                NextPage::Done(reason) => {
                    debug!(
                        "{}: done after {} pages ({reason}), {} items",
                        sweep.endpoint, state.pages_fetched, state.total_fetched
                    );
                    break;
                }
            }
        }

        Ok(items)
    }

    /// Account for one page and decide whether another one follows
    pub fn process_page(page: &[JsonValue], state: &mut PaginationState) -> NextPage {
        state.add_page(page.len());

        let Some(last) = page.last() else {
            state.mark_done();
            return NextPage::Done(StopReason::EmptyPage);
        };

        let Some(cursor) = extract_cursor(last) else {
            state.mark_done();
            return NextPage::Done(StopReason::NoCursor);
        };

        if state.cursor.as_ref() == Some(&cursor) {
            state.mark_done();
            return NextPage::Done(StopReason::CursorUnchanged);
        }

        state.set_cursor(cursor.clone());
        NextPage::Continue(cursor)
    }
}
