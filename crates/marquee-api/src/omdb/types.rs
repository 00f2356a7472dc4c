//! OMDb API response types and request parameters.

use std::fmt;

use serde::Deserialize;

use super::poster;

// --- Category ---

/// Catalog entry kind (`Type` field in OMDb responses).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    /// Feature film.
    Movie,
    /// TV series.
    Series,
    /// Single episode of a series.
    Episode,
    /// Video game.
    Game,
    /// Any value the catalog adds later.
    Other(String),
}

impl Category {
    /// Returns the wire value used by the `type=` query parameter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Game => "game",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "movie" => Self::Movie,
            "series" => Self::Series,
            "episode" => Self::Episode,
            "game" => Self::Game,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Search ---

/// Lightweight list-view representation of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryRecord {
    /// Display title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year, or a range such as "2005–2013" for series.
    #[serde(rename = "Year")]
    pub year: String,
    /// IMDb identifier (unique within a result set).
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Entry kind.
    #[serde(rename = "Type")]
    pub category: Category,
    /// Poster URL or the `"N/A"` sentinel.
    #[serde(rename = "Poster")]
    pub poster: String,
}

/// Raw envelope returned by the `s=` endpoint.
///
/// A missing `Search` array means "no results", not an HTTP failure.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchEnvelope {
    /// Matching entries.
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<SummaryRecord>>,
    /// Total result count across all pages (stringly typed by OMDb).
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    /// Catalog error message (e.g. "Movie not found!").
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

// --- Detail ---

/// A single rating source entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rating {
    /// Rating source (e.g. "Rotten Tomatoes").
    #[serde(rename = "Source")]
    pub source: String,
    /// Rating value (e.g. "85%").
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full catalog entry returned by the `i=` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetailRecord {
    /// Display title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year.
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Age rating (e.g. "PG-13").
    #[serde(rename = "Rated", default)]
    pub rated: String,
    /// Release date (e.g. "15 Jun 2005").
    #[serde(rename = "Released", default)]
    pub released: String,
    /// Runtime (e.g. "140 min").
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    /// Comma-separated genre list.
    #[serde(rename = "Genre", default)]
    pub genre: String,
    /// Director(s).
    #[serde(rename = "Director", default)]
    pub director: String,
    /// Writer(s).
    #[serde(rename = "Writer", default)]
    pub writer: String,
    /// Main cast.
    #[serde(rename = "Actors", default)]
    pub actors: String,
    /// Plot synopsis.
    #[serde(rename = "Plot", default)]
    pub plot: String,
    /// Spoken languages.
    #[serde(rename = "Language", default)]
    pub language: String,
    /// Production countries.
    #[serde(rename = "Country", default)]
    pub country: String,
    /// Awards text, or the `"N/A"` sentinel.
    #[serde(rename = "Awards", default)]
    pub awards: String,
    /// Poster URL or the `"N/A"` sentinel.
    #[serde(rename = "Poster", default)]
    pub poster: String,
    /// Ratings from individual sources.
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<Rating>,
    /// Metacritic score.
    #[serde(rename = "Metascore", default)]
    pub metascore: String,
    /// IMDb user rating (e.g. "8.2").
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    /// IMDb vote count (e.g. "1,600,000").
    #[serde(rename = "imdbVotes", default)]
    pub imdb_votes: String,
    /// IMDb identifier.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Entry kind.
    #[serde(rename = "Type")]
    pub category: Category,
    /// DVD release date (movies only).
    #[serde(rename = "DVD", default)]
    pub dvd: Option<String>,
    /// Box office gross (movies only).
    #[serde(rename = "BoxOffice", default)]
    pub box_office: Option<String>,
    /// Production company (movies only).
    #[serde(rename = "Production", default)]
    pub production: Option<String>,
    /// Official website (movies only).
    #[serde(rename = "Website", default)]
    pub website: Option<String>,
    /// Number of seasons (series only).
    #[serde(rename = "totalSeasons", default)]
    pub total_seasons: Option<String>,
}

impl DetailRecord {
    /// Splits the comma-separated genre field.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }

    /// Returns the awards text unless the catalog reported `"N/A"`.
    #[must_use]
    pub fn awards(&self) -> Option<&str> {
        poster::is_available(&self.awards).then_some(self.awards.as_str())
    }
}

// --- Error Response ---

/// OMDb error envelope (`{"Response":"False","Error":"..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbErrorResponse {
    /// Error message.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

// --- Request Parameters ---

/// Plot length requested from the `i=` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotLength {
    /// One-paragraph synopsis.
    Short,
    /// Full plot.
    #[default]
    Full,
}

impl PlotLength {
    /// Returns the wire value for the `plot=` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Full => "full",
        }
    }
}

/// Parameters for the `s=` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search term (required).
    pub term: String,
    /// Restrict results to one kind.
    pub category: Option<Category>,
    /// Restrict results to one release year.
    pub year: Option<u32>,
}

impl SearchParams {
    /// Creates new search params with the given term.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: None,
            year: None,
        }
    }

    /// Sets the kind filter.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }
}
