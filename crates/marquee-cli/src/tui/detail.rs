//! Detail loader for the selected catalog entry.
//!
//! At most one lookup is live. Opening another entry supersedes the previous
//! lookup and closing abandons it; a superseded response is never shown.

use std::sync::Arc;

use marquee_api::omdb::{self, DetailRecord, OmdbApi, PlotLength};

use super::task::LatestTask;

/// Visible state of the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// Nothing open.
    Idle,
    /// Lookup in flight.
    Loading {
        /// Entry being fetched.
        imdb_id: String,
    },
    /// Lookup finished with a record.
    Loaded(Box<DetailRecord>),
    /// Lookup finished without a record (unknown ID or failure).
    NotFound {
        /// Entry that was requested.
        imdb_id: String,
    },
}

/// Drives the detail view through its states.
pub struct DetailLoader<A> {
    api: Arc<A>,
    plot: PlotLength,
    state: DetailState,
    task: LatestTask<(String, Option<DetailRecord>)>,
}

impl<A> DetailLoader<A>
where
    A: OmdbApi + Send + Sync + 'static,
{
    /// Creates an idle loader.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            plot: PlotLength::Full,
            state: DetailState::Idle,
            task: LatestTask::new(),
        }
    }

    /// Sets the plot length requested by later lookups.
    #[must_use]
    pub const fn with_plot(mut self, plot: PlotLength) -> Self {
        self.plot = plot;
        self
    }

    /// Opens the detail view for `imdb_id` and starts the lookup.
    pub fn open(&mut self, imdb_id: impl Into<String>) {
        let imdb_id = imdb_id.into();
        tracing::debug!(imdb_id = %imdb_id, "Opening detail");
        self.state = DetailState::Loading {
            imdb_id: imdb_id.clone(),
        };
        let api = Arc::clone(&self.api);
        let plot = self.plot;
        self.task.spawn(async move {
            let detail = omdb::lookup_with_plot(api.as_ref(), &imdb_id, plot).await;
            (imdb_id, detail)
        });
    }

    /// Closes the view and abandons any lookup in flight.
    pub fn close(&mut self) {
        self.task.cancel();
        self.state = DetailState::Idle;
    }

    /// Applies a finished lookup, if any. Returns `true` when state changed.
    pub fn poll(&mut self) -> bool {
        match self.task.try_take() {
            Some((imdb_id, detail)) => {
                self.apply(imdb_id, detail);
                true
            }
            None => false,
        }
    }

    /// Waits for the pending lookup and applies it.
    ///
    /// Returns `false` when nothing was pending.
    pub async fn wait_for_result(&mut self) -> bool {
        match self.task.take().await {
            Some((imdb_id, detail)) => {
                self.apply(imdb_id, detail);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, imdb_id: String, detail: Option<DetailRecord>) {
        self.state = match detail {
            Some(record) => DetailState::Loaded(Box::new(record)),
            None => DetailState::NotFound { imdb_id },
        };
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    /// `true` unless [`DetailState::Idle`].
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.state, DetailState::Idle)
    }

    /// `true` while a lookup is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading { .. })
    }

    /// IMDb ID of the open entry.
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        match &self.state {
            DetailState::Idle => None,
            DetailState::Loading { imdb_id } | DetailState::NotFound { imdb_id } => Some(imdb_id),
            DetailState::Loaded(record) => Some(&record.imdb_id),
        }
    }
}
