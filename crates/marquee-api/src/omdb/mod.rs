//! OMDb API client module.
//!
//! Handles HTTP requests to the OMDb endpoint and retrieves
//! movie, series and episode data by title search or IMDb ID.

mod api;
mod catalog;
mod client;
pub mod poster;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
pub use catalog::{lookup, lookup_with_plot, search, search_with_params};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
pub use types::{Category, DetailRecord, PlotLength, Rating, SearchParams, SummaryRecord};
