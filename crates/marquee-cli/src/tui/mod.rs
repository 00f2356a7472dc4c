//! TUI module for the interactive browser.
//!
//! Uses `ratatui` + `crossterm` for rendering and the tokio runtime for
//! debounce timers and catalog requests.

mod browser;
/// Detail loader for the selected entry.
pub mod detail;
/// Pure view projections shared with the one-shot subcommands.
pub mod presenter;
/// Debounced query controller.
pub mod search;
/// Browser state types.
pub mod state;
mod task;
#[cfg(test)]
mod test_support;
mod ui;

pub use browser::{BrowserOptions, run_browser};
