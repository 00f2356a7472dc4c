//! Browser TUI main loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use marquee_api::omdb::OmdbApi;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{BrowserState, Focus};
use super::ui;

/// Idle wait between frames when no key is pending.
const TICK: Duration = Duration::from_millis(33);

/// Browser startup options.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Debounce quiet period.
    pub quiet_period: Duration,
    /// Image path shown for entries without a poster.
    pub placeholder_poster: String,
    /// Query typed in before the first frame.
    pub initial_query: Option<String>,
}

/// Runs the interactive browser until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(api: Arc<A>, options: BrowserOptions) -> Result<()>
where
    A: OmdbApi + Send + Sync + 'static,
{
    let mut state = BrowserState::new(api, options.quiet_period, options.placeholder_poster);
    if let Some(query) = options.initial_query {
        state.set_query(query);
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
///
/// Key polling never blocks; the loop sleeps between frames so that
/// debounce timers and catalog requests make progress.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState<A>,
) -> Result<()>
where
    A: OmdbApi + Send + Sync + 'static,
{
    let mut main_area_height: u16 = 0;

    loop {
        state.tick();

        terminal
            .draw(|frame| {
                main_area_height = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;

        let page_size = usize::from(main_area_height.saturating_sub(4));

        if !event::poll(Duration::ZERO).context("failed to poll events")? {
            tokio::time::sleep(TICK).await;
            continue;
        }

        if let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
            && handle_key(state, key.code, key.modifiers, page_size)
        {
            return Ok(());
        }
    }
}

/// Dispatches a key press. Returns `true` to exit.
fn handle_key<A>(
    state: &mut BrowserState<A>,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
) -> bool
where
    A: OmdbApi + Send + Sync + 'static,
{
    if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    if state.detail.is_open() {
        handle_detail_input(state, key);
        return false;
    }
    match state.focus {
        Focus::Query => {
            handle_query_input(state, key);
            false
        }
        Focus::Results => handle_results_input(state, key, page_size),
    }
}

/// Handles key input while the detail overlay is open.
fn handle_detail_input<A>(state: &mut BrowserState<A>, key: KeyCode)
where
    A: OmdbApi + Send + Sync + 'static,
{
    match key {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => state.close_detail(),
        KeyCode::Char('o') => open_imdb_page(state),
        _ => {}
    }
}

/// Handles key input in the query line.
fn handle_query_input<A>(state: &mut BrowserState<A>, key: KeyCode)
where
    A: OmdbApi + Send + Sync + 'static,
{
    match key {
        KeyCode::Esc => state.clear_query(),
        KeyCode::Backspace => state.query_pop(),
        KeyCode::Tab | KeyCode::Down => state.focus_results(),
        KeyCode::Enter => {
            state.focus_results();
            state.open_selected();
        }
        KeyCode::Char(c) => state.query_push(c),
        _ => {}
    }
}

/// Handles key input in the result table. Returns `true` to exit.
fn handle_results_input<A>(state: &mut BrowserState<A>, key: KeyCode, page_size: usize) -> bool
where
    A: OmdbApi + Send + Sync + 'static,
{
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::PageUp => state.page_up(page_size),
        KeyCode::PageDown => state.page_down(page_size),
        KeyCode::Enter => {
            state.open_selected();
        }
        KeyCode::Char('/') | KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => {
            state.focus_query();
        }
        KeyCode::Char('o') => open_imdb_page(state),
        _ => {}
    }
    false
}

/// Opens the IMDb page for the open or highlighted entry.
fn open_imdb_page<A>(state: &BrowserState<A>)
where
    A: OmdbApi + Send + Sync + 'static,
{
    let Some(url) = state.current_imdb_url() else {
        return;
    };
    if let Err(e) = open::that(&url) {
        tracing::warn!(url = %url, error = %e, "Failed to open browser");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::tui::test_support::{FakeCatalog, batman_results};

    fn make_state() -> BrowserState<FakeCatalog> {
        let api = FakeCatalog::new()
            .with_search("batman", batman_results())
            .with_detail("tt0372784", "Batman Begins");
        BrowserState::new(
            Arc::new(api),
            Duration::from_millis(400),
            String::from("/poster-placeholder.svg"),
        )
    }

    fn type_text(state: &mut BrowserState<FakeCatalog>, text: &str) {
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c), KeyModifiers::NONE, 10);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ctrl_c_quits_from_any_focus() {
        // Arrange
        let mut state = make_state();

        // Act
        let quit = handle_key(&mut state, KeyCode::Char('c'), KeyModifiers::CONTROL, 10);

        // Assert
        assert!(quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_q_is_typed_in_query_focus() {
        // Arrange
        let mut state = make_state();

        // Act
        let quit = handle_key(&mut state, KeyCode::Char('q'), KeyModifiers::NONE, 10);

        // Assert
        assert!(!quit);
        assert_eq!(state.search.query(), "q");
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_and_backspace_edit_query() {
        // Arrange
        let mut state = make_state();

        // Act
        type_text(&mut state, "batmanx");
        handle_key(&mut state, KeyCode::Backspace, KeyModifiers::NONE, 10);

        // Assert
        assert_eq!(state.search.query(), "batman");
        assert!(state.search.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_from_query_opens_first_result() {
        // Arrange
        let mut state = make_state();
        type_text(&mut state, "batman");
        tokio::time::sleep(Duration::from_millis(500)).await;
        state.tick();

        // Act
        handle_key(&mut state, KeyCode::Enter, KeyModifiers::NONE, 10);

        // Assert
        assert_eq!(state.focus, Focus::Results);
        assert_eq!(state.detail.current_id(), Some("tt0372784"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_keys_close_overlay() {
        // Arrange
        let mut state = make_state();
        type_text(&mut state, "batman");
        tokio::time::sleep(Duration::from_millis(500)).await;
        state.tick();
        handle_key(&mut state, KeyCode::Enter, KeyModifiers::NONE, 10);

        // Act
        let quit = handle_key(&mut state, KeyCode::Char('q'), KeyModifiers::NONE, 10);

        // Assert
        assert!(!quit);
        assert!(!state.detail.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_navigation_and_quit() {
        // Arrange
        let mut state = make_state();
        type_text(&mut state, "batman");
        tokio::time::sleep(Duration::from_millis(500)).await;
        state.tick();
        handle_key(&mut state, KeyCode::Tab, KeyModifiers::NONE, 10);

        // Act
        handle_key(&mut state, KeyCode::Char('j'), KeyModifiers::NONE, 10);
        handle_key(&mut state, KeyCode::PageDown, KeyModifiers::NONE, 10);
        let cursor = state.cursor();
        handle_key(&mut state, KeyCode::Char('/'), KeyModifiers::NONE, 10);
        let focus = state.focus;
        handle_key(&mut state, KeyCode::Tab, KeyModifiers::NONE, 10);
        let quit = handle_key(&mut state, KeyCode::Char('q'), KeyModifiers::NONE, 10);

        // Assert
        assert_eq!(cursor, 2);
        assert_eq!(focus, Focus::Query);
        assert!(quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_esc_clears_query() {
        // Arrange
        let mut state = make_state();
        type_text(&mut state, "bat");

        // Act
        handle_key(&mut state, KeyCode::Esc, KeyModifiers::NONE, 10);

        // Assert
        assert_eq!(state.search.query(), "");
        assert!(!state.search.is_loading());
        assert!(!state.search.has_pending_request());
    }
}
