//! Pure projections from controller state to displayable values.
//!
//! Shared by the browser and the one-shot subcommands, so nothing here
//! depends on ratatui.

use marquee_api::omdb::poster;
use marquee_api::omdb::{DetailRecord, SummaryRecord};

/// Shown while the query is empty.
pub const PROMPT_MESSAGE: &str = "Type to search movies and series";

/// Number of rating sources listed in the detail view.
const MAX_RATINGS: usize = 3;

/// What the results area should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView<'a> {
    /// Query is empty.
    Prompt,
    /// A search is scheduled or in flight.
    Searching {
        /// Trimmed query text.
        term: &'a str,
    },
    /// The last search for a non-empty query matched nothing.
    NoResults {
        /// Trimmed query text.
        term: &'a str,
    },
    /// Ranked result rows.
    Results {
        /// "Found N result(s)".
        summary: String,
        /// One row per record, in catalog order.
        rows: Vec<ResultRow<'a>>,
    },
}

/// A single ranked result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow<'a> {
    /// 1-based rank.
    pub rank: usize,
    /// Display title.
    pub title: &'a str,
    /// Release year.
    pub year: &'a str,
    /// Entry kind.
    pub category: &'a str,
    /// IMDb identifier.
    pub imdb_id: &'a str,
    /// Poster URL or the placeholder.
    pub poster: &'a str,
}

/// Projects the query controller state onto a view.
#[must_use]
pub fn present<'a>(
    query: &'a str,
    loading: bool,
    results: &'a [SummaryRecord],
    placeholder: &'a str,
) -> ResultView<'a> {
    let term = query.trim();
    if term.is_empty() {
        return ResultView::Prompt;
    }
    if loading {
        return ResultView::Searching { term };
    }
    if results.is_empty() {
        return ResultView::NoResults { term };
    }
    let rows = results
        .iter()
        .zip(1..)
        .map(|(record, rank)| ResultRow {
            rank,
            title: &record.title,
            year: &record.year,
            category: record.category.as_str(),
            imdb_id: &record.imdb_id,
            poster: poster::resolve(&record.poster, placeholder),
        })
        .collect();
    ResultView::Results {
        summary: result_count_label(results.len()),
        rows,
    }
}

/// "Found 1 result" / "Found N results".
#[must_use]
pub fn result_count_label(count: usize) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("Found {count} result{suffix}")
}

/// Empty-state message for a query that matched nothing.
#[must_use]
pub fn no_results_message(term: &str) -> String {
    format!("No results for \"{term}\"")
}

/// One line of the featured listing: `#rank title (year) [category] poster`.
#[must_use]
pub fn featured_line(rank: usize, record: &SummaryRecord, placeholder: &str) -> String {
    format!(
        "#{rank} {} ({}) [{}] {}",
        record.title,
        record.year,
        record.category,
        poster::resolve(&record.poster, placeholder)
    )
}

/// Display-ready detail record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Title line.
    pub title: String,
    /// Year, age rating and runtime, skipping unavailable values.
    pub badges: Vec<String>,
    /// Individual genres.
    pub genres: Vec<String>,
    /// Plot synopsis.
    pub plot: String,
    /// Labelled fields in display order.
    pub fields: Vec<(&'static str, String)>,
    /// Awards text when available.
    pub awards: Option<String>,
    /// IMDb rating and vote count.
    pub imdb_rating: String,
    /// Up to three `source: value` lines.
    pub ratings: Vec<String>,
    /// Poster URL or the placeholder.
    pub poster: String,
    /// IMDb page.
    pub imdb_url: String,
}

/// Builds the detail view.
#[must_use]
pub fn detail_view(detail: &DetailRecord, placeholder: &str) -> DetailView {
    let badges = [&detail.year, &detail.rated, &detail.runtime]
        .into_iter()
        .filter(|value| poster::is_available(value))
        .cloned()
        .collect();

    let mut fields = vec![
        ("Director", detail.director.clone()),
        ("Writers", detail.writer.clone()),
        ("Cast", detail.actors.clone()),
        ("Released", detail.released.clone()),
        ("Language", detail.language.clone()),
        ("Country", detail.country.clone()),
    ];
    let optional = [
        ("Box office", detail.box_office.as_deref()),
        ("Production", detail.production.as_deref()),
        ("Seasons", detail.total_seasons.as_deref()),
    ];
    fields.extend(optional.into_iter().filter_map(|(label, value)| {
        value
            .filter(|v| poster::is_available(v))
            .map(|v| (label, String::from(v)))
    }));

    DetailView {
        title: detail.title.clone(),
        badges,
        genres: detail.genres().map(String::from).collect(),
        plot: detail.plot.clone(),
        fields,
        awards: detail.awards().map(String::from),
        imdb_rating: format!("{}/10 ({} votes)", detail.imdb_rating, detail.imdb_votes),
        ratings: detail
            .ratings
            .iter()
            .take(MAX_RATINGS)
            .map(|r| format!("{}: {}", r.source, r.value))
            .collect(),
        poster: String::from(poster::resolve(&detail.poster, placeholder)),
        imdb_url: poster::imdb_title_url(&detail.imdb_id),
    }
}
