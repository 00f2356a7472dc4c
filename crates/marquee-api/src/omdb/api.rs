//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{DetailRecord, PlotLength, SearchParams, SummaryRecord};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches the catalog by title (`s=`).
    ///
    /// Returns an empty list when the catalog reports no match.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 2xx,
    /// or JSON parsing fails.
    async fn search_titles(&self, params: &SearchParams) -> Result<Vec<SummaryRecord>>;

    /// Fetches a single entry by IMDb ID (`i=`).
    ///
    /// Returns `None` when the catalog reports no such entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 2xx,
    /// or JSON parsing fails.
    async fn title_details(&self, imdb_id: &str, plot: PlotLength)
    -> Result<Option<DetailRecord>>;
}
