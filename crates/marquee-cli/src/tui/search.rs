//! Debounced query controller.
//!
//! Turns a stream of query edits into at most one catalog search per quiet
//! period. Every edit restarts the timer; only the search for the latest
//! non-empty text is issued, and only its outcome is ever applied.

use std::sync::Arc;
use std::time::Duration;

use marquee_api::omdb::{self, OmdbApi, SummaryRecord};

use super::task::LatestTask;

/// Outcome of one issued search.
#[derive(Debug)]
struct SearchOutcome {
    term: String,
    records: Vec<SummaryRecord>,
}

/// Holds the query text, the current results and the loading flag.
pub struct QueryController<A> {
    api: Arc<A>,
    quiet_period: Duration,
    query: String,
    results: Vec<SummaryRecord>,
    searched_term: Option<String>,
    loading: bool,
    task: LatestTask<SearchOutcome>,
}

impl<A> QueryController<A>
where
    A: OmdbApi + Send + Sync + 'static,
{
    /// Creates an idle controller.
    #[must_use]
    pub fn new(api: Arc<A>, quiet_period: Duration) -> Self {
        Self {
            api,
            quiet_period,
            query: String::new(),
            results: Vec::new(),
            searched_term: None,
            loading: false,
            task: LatestTask::new(),
        }
    }

    /// Replaces the query text.
    ///
    /// Empty (or whitespace-only) text cancels any pending search and clears
    /// the results at once. Any other text schedules a search after the quiet
    /// period, replacing whatever was scheduled or in flight.
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.query {
            return;
        }
        self.query = text;

        let term = self.query.trim();
        if term.is_empty() {
            self.task.cancel();
            self.results.clear();
            self.searched_term = None;
            self.loading = false;
            return;
        }

        self.loading = true;
        let term = String::from(term);
        let api = Arc::clone(&self.api);
        self.task.spawn_after(self.quiet_period, async move {
            tracing::debug!(term = %term, "Issuing search");
            let records = omdb::search(api.as_ref(), &term).await;
            SearchOutcome { term, records }
        });
    }

    /// Applies a finished search, if any. Returns `true` when state changed.
    pub fn poll(&mut self) -> bool {
        self.task.try_take().is_some_and(|outcome| {
            self.apply(outcome);
            true
        })
    }

    /// Waits for the pending search and applies it.
    ///
    /// Returns `false` when nothing was pending.
    pub async fn wait_for_results(&mut self) -> bool {
        match self.task.take().await {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, outcome: SearchOutcome) {
        tracing::debug!(term = %outcome.term, count = outcome.records.len(), "Applied search results");
        self.results = outcome.records;
        self.searched_term = Some(outcome.term);
        self.loading = false;
    }

    /// Current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results of the last applied search.
    #[must_use]
    pub fn results(&self) -> &[SummaryRecord] {
        &self.results
    }

    /// `true` from scheduling until the outcome is applied or superseded.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Term whose results are currently shown.
    #[must_use]
    pub fn searched_term(&self) -> Option<&str> {
        self.searched_term.as_deref()
    }

    /// `true` while a search is scheduled or in flight.
    #[cfg(test)]
    #[must_use]
    pub fn has_pending_request(&self) -> bool {
        self.task.is_pending()
    }
}
