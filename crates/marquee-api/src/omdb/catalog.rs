//! Fail-soft catalog operations.
//!
//! Network, HTTP and decode failures are collapsed into the same outcome as
//! "no match": an empty result list or an absent record. Errors are logged
//! for diagnostics and never returned to the caller.

use super::api::OmdbApi;
use super::types::{DetailRecord, PlotLength, SearchParams, SummaryRecord};

/// Searches the catalog for `term`.
///
/// Returns an empty list on any failure.
pub async fn search(api: &(impl OmdbApi + Sync), term: &str) -> Vec<SummaryRecord> {
    search_with_params(api, &SearchParams::new(term)).await
}

/// Searches the catalog with explicit filters.
///
/// Returns an empty list on any failure.
pub async fn search_with_params(
    api: &(impl OmdbApi + Sync),
    params: &SearchParams,
) -> Vec<SummaryRecord> {
    match api.search_titles(params).await {
        Ok(results) => {
            tracing::debug!(term = %params.term, count = results.len(), "Search completed");
            results
        }
        Err(e) => {
            tracing::warn!(term = %params.term, error = %format!("{e:#}"), "Search failed");
            Vec::new()
        }
    }
}

/// Looks up a single entry with the full plot.
///
/// Returns `None` for unknown IDs and on any failure.
pub async fn lookup(api: &(impl OmdbApi + Sync), imdb_id: &str) -> Option<DetailRecord> {
    lookup_with_plot(api, imdb_id, PlotLength::Full).await
}

/// Looks up a single entry with the given plot length.
///
/// Returns `None` for unknown IDs and on any failure.
pub async fn lookup_with_plot(
    api: &(impl OmdbApi + Sync),
    imdb_id: &str,
    plot: PlotLength,
) -> Option<DetailRecord> {
    match api.title_details(imdb_id, plot).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::warn!(imdb_id, error = %format!("{e:#}"), "Lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use anyhow::{Result, bail};
    use tracing_mock::{expect, subscriber};

    use super::*;
    use crate::omdb::types::Category;

    /// API stub that always fails.
    struct FailingApi;

    impl OmdbApi for FailingApi {
        async fn search_titles(&self, _params: &SearchParams) -> Result<Vec<SummaryRecord>> {
            bail!("connection refused")
        }

        async fn title_details(
            &self,
            _imdb_id: &str,
            _plot: PlotLength,
        ) -> Result<Option<DetailRecord>> {
            bail!("connection refused")
        }
    }

    /// API stub with a single known entry.
    struct SingleEntryApi;

    impl OmdbApi for SingleEntryApi {
        async fn search_titles(&self, params: &SearchParams) -> Result<Vec<SummaryRecord>> {
            if params.term != "batman" {
                return Ok(Vec::new());
            }
            Ok(vec![SummaryRecord {
                title: String::from("Batman Begins"),
                year: String::from("2005"),
                imdb_id: String::from("tt0372784"),
                category: Category::Movie,
                poster: String::from("N/A"),
            }])
        }

        async fn title_details(
            &self,
            imdb_id: &str,
            _plot: PlotLength,
        ) -> Result<Option<DetailRecord>> {
            if imdb_id != "tt0372784" {
                return Ok(None);
            }
            let json = include_str!("../../../../fixtures/omdb/title_tt0372784.json");
            Ok(Some(serde_json::from_str(json)?))
        }
    }

    #[tokio::test]
    async fn test_search_failure_yields_empty() {
        // Arrange & Act
        let results = search(&FailingApi, "batman").await;

        // Assert
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_logs_warning() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::WARN))
            .run_with_handle();
        let guard = tracing::subscriber::set_default(subscriber);

        // Act
        let results = search(&FailingApi, "batman").await;
        drop(guard);

        // Assert
        assert!(results.is_empty());
        handle.assert_finished();
    }

    #[tokio::test]
    async fn test_search_success_passes_results_through() {
        // Arrange & Act
        let results = search(&SingleEntryApi, "batman").await;

        // Assert
        assert_eq!(results.len(), 1);
        assert_eq!(results.first().unwrap().imdb_id, "tt0372784");
    }

    #[tokio::test]
    async fn test_lookup_failure_yields_none() {
        // Arrange & Act
        let detail = lookup(&FailingApi, "tt0372784").await;

        // Assert
        assert!(detail.is_none());
    }

    #[tokio::test]
    async fn test_lookup_unknown_id_yields_none() {
        // Arrange & Act
        let detail = lookup(&SingleEntryApi, "tt0000000").await;

        // Assert
        assert!(detail.is_none());
    }

    #[tokio::test]
    async fn test_lookup_known_id() {
        // Arrange & Act
        let detail = lookup_with_plot(&SingleEntryApi, "tt0372784", PlotLength::Short).await;

        // Assert
        assert_eq!(detail.unwrap().title, "Batman Begins");
    }
}
