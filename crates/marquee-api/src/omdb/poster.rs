//! Handling of the OMDb `"N/A"` sentinel.
//!
//! OMDb reports unavailable string fields (notably `Poster` and `Awards`)
//! as the literal `"N/A"` instead of omitting them. A poster with this value
//! must never be requested from the network.

/// Sentinel value meaning "field not available".
pub const NOT_AVAILABLE: &str = "N/A";

/// Default local placeholder used when a poster is unavailable.
pub const DEFAULT_PLACEHOLDER: &str = "/poster-placeholder.svg";

/// Base URL for IMDb title pages.
const IMDB_TITLE_BASE_URL: &str = "https://www.imdb.com/title/";

/// Returns `true` unless the value is empty or the `"N/A"` sentinel.
#[must_use]
pub fn is_available(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed != NOT_AVAILABLE
}

/// Returns the poster URL, or `placeholder` when the catalog has none.
#[must_use]
pub fn resolve<'a>(poster: &'a str, placeholder: &'a str) -> &'a str {
    if is_available(poster) {
        poster
    } else {
        placeholder
    }
}

/// Builds the IMDb page URL for a title.
#[must_use]
pub fn imdb_title_url(imdb_id: &str) -> String {
    format!("{IMDB_TITLE_BASE_URL}{imdb_id}/")
}
