//! In-memory catalog used by the TUI tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, bail};
use marquee_api::omdb::{
    Category, DetailRecord, OmdbApi, PlotLength, SearchParams, SummaryRecord,
};

/// Builds a list-view record.
pub fn summary(title: &str, imdb_id: &str, poster: &str) -> SummaryRecord {
    SummaryRecord {
        title: String::from(title),
        year: String::from("2005"),
        imdb_id: String::from(imdb_id),
        category: Category::Movie,
        poster: String::from(poster),
    }
}

/// Builds a detail record from the movie fixture with a new title and ID.
pub fn detail(imdb_id: &str, title: &str) -> DetailRecord {
    let json = include_str!("../../../../fixtures/omdb/title_tt0372784.json");
    let mut record: DetailRecord = serde_json::from_str(json).unwrap();
    record.imdb_id = String::from(imdb_id);
    record.title = String::from(title);
    record
}

/// Three results for "batman", the last one without a poster.
pub fn batman_results() -> Vec<SummaryRecord> {
    vec![
        summary("Batman Begins", "tt0372784", "https://img.example/bb.jpg"),
        summary("The Batman", "tt1877830", "https://img.example/tb.jpg"),
        summary("Batman: The Animated Series", "tt0103359", "N/A"),
    ]
}

/// Catalog fake with canned answers, per-entry latency and call recording.
#[derive(Default)]
pub struct FakeCatalog {
    searches: HashMap<String, (Duration, Vec<SummaryRecord>)>,
    details: HashMap<String, (Duration, DetailRecord)>,
    failing: HashSet<String>,
    search_calls: Mutex<Vec<String>>,
    detail_calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `term` immediately.
    pub fn with_search(self, term: &str, records: Vec<SummaryRecord>) -> Self {
        self.with_slow_search(term, Duration::ZERO, records)
    }

    /// Answers `term` after `delay`.
    pub fn with_slow_search(
        mut self,
        term: &str,
        delay: Duration,
        records: Vec<SummaryRecord>,
    ) -> Self {
        self.searches.insert(String::from(term), (delay, records));
        self
    }

    /// Answers `imdb_id` immediately.
    pub fn with_detail(self, imdb_id: &str, title: &str) -> Self {
        self.with_slow_detail(imdb_id, title, Duration::ZERO)
    }

    /// Answers `imdb_id` after `delay`.
    pub fn with_slow_detail(mut self, imdb_id: &str, title: &str, delay: Duration) -> Self {
        self.details
            .insert(String::from(imdb_id), (delay, detail(imdb_id, title)));
        self
    }

    /// Makes searches for `term` or lookups of an ID fail with a transport error.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(String::from(key));
        self
    }

    /// Terms that reached the catalog, in order.
    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// IDs that reached the catalog, in order.
    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

impl OmdbApi for FakeCatalog {
    async fn search_titles(&self, params: &SearchParams) -> Result<Vec<SummaryRecord>> {
        self.search_calls.lock().unwrap().push(params.term.clone());
        if self.failing.contains(&params.term) {
            bail!("connection reset");
        }
        let Some((delay, records)) = self.searches.get(&params.term) else {
            return Ok(Vec::new());
        };
        if !delay.is_zero() {
            tokio::time::sleep(*delay).await;
        }
        Ok(records.clone())
    }

    async fn title_details(&self, imdb_id: &str, _plot: PlotLength) -> Result<Option<DetailRecord>> {
        self.detail_calls.lock().unwrap().push(String::from(imdb_id));
        if self.failing.contains(imdb_id) {
            bail!("connection reset");
        }
        let Some((delay, record)) = self.details.get(imdb_id) else {
            return Ok(None);
        };
        if !delay.is_zero() {
            tokio::time::sleep(*delay).await;
        }
        Ok(Some(record.clone()))
    }
}
