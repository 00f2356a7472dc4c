//! Browser TUI state management.

use std::sync::Arc;
use std::time::Duration;

use marquee_api::omdb::{OmdbApi, SummaryRecord, poster};
use ratatui::widgets::TableState;

use super::detail::DetailLoader;
use super::search::QueryController;

/// Which part of the screen receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Query input line.
    Query,
    /// Result table.
    Results,
}

/// State for the browser TUI.
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState<A> {
    /// Debounced search over the typed query.
    pub search: QueryController<A>,
    /// Detail overlay for the selected entry.
    pub detail: DetailLoader<A>,
    /// Current input focus.
    pub focus: Focus,
    /// Table state for the result list (handles selection and scroll).
    pub results_table: TableState,
    /// Image path shown for entries without a poster.
    pub placeholder_poster: String,
}

impl<A> BrowserState<A>
where
    A: OmdbApi + Send + Sync + 'static,
{
    /// Creates a new state with an empty query.
    #[must_use]
    pub fn new(api: Arc<A>, quiet_period: Duration, placeholder_poster: String) -> Self {
        Self {
            search: QueryController::new(Arc::clone(&api), quiet_period),
            detail: DetailLoader::new(api),
            focus: Focus::Query,
            results_table: TableState::default(),
            placeholder_poster,
        }
    }

    /// Applies finished background work. Returns `true` when anything changed.
    pub fn tick(&mut self) -> bool {
        let searched = self.search.poll();
        if searched {
            self.reset_selection();
        }
        let detailed = self.detail.poll();
        searched || detailed
    }

    /// Replaces the whole query.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.search.set_query(text);
        self.sync_selection();
    }

    /// Appends a character to the query.
    pub fn query_push(&mut self, ch: char) {
        let mut query = String::from(self.search.query());
        query.push(ch);
        self.set_query(query);
    }

    /// Removes the last character from the query.
    pub fn query_pop(&mut self) {
        let mut query = String::from(self.search.query());
        if query.pop().is_some() {
            self.set_query(query);
        }
    }

    /// Clears the query, the results and the selection.
    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Moves focus to the result table if it has rows.
    pub fn focus_results(&mut self) {
        if self.search.results().is_empty() {
            return;
        }
        self.focus = Focus::Results;
        if self.results_table.selected().is_none() {
            self.results_table.select(Some(0));
        }
    }

    /// Moves focus back to the query input.
    pub const fn focus_query(&mut self) {
        self.focus = Focus::Query;
    }

    /// Returns the result cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.results_table.selected().unwrap_or(0)
    }

    /// Returns the highlighted result (if any).
    #[must_use]
    pub fn selected_result(&self) -> Option<&SummaryRecord> {
        self.results_table
            .selected()
            .and_then(|idx| self.search.results().get(idx))
    }

    /// Moves cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.results_table.select(Some(current - 1));
        }
    }

    /// Moves cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        let current = self.cursor();
        if current + 1 < self.search.results().len() {
            self.results_table.select(Some(current + 1));
        }
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self, page_size: usize) {
        let current = self.cursor();
        self.results_table
            .select(Some(current.saturating_sub(page_size)));
    }

    /// Scrolls down by a page.
    pub fn page_down(&mut self, page_size: usize) {
        let max = self.search.results().len().saturating_sub(1);
        let current = self.cursor();
        self.results_table
            .select(Some(current.saturating_add(page_size).min(max)));
    }

    /// Opens the detail view for the highlighted result.
    ///
    /// Returns `false` when nothing is highlighted.
    pub fn open_selected(&mut self) -> bool {
        let Some(imdb_id) = self.selected_result().map(|r| r.imdb_id.clone()) else {
            return false;
        };
        self.detail.open(imdb_id);
        true
    }

    /// Closes the detail view.
    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    /// IMDb page for the open detail, or else the highlighted result.
    #[must_use]
    pub fn current_imdb_url(&self) -> Option<String> {
        self.detail
            .current_id()
            .or_else(|| self.selected_result().map(|r| r.imdb_id.as_str()))
            .map(poster::imdb_title_url)
    }

    /// Selects the first row of a fresh result set.
    fn reset_selection(&mut self) {
        if self.search.results().is_empty() {
            self.results_table.select(None);
            self.focus = Focus::Query;
        } else {
            self.results_table.select(Some(0));
        }
    }

    /// Drops a selection that no longer points at a row.
    fn sync_selection(&mut self) {
        let len = self.search.results().len();
        if self.results_table.selected().is_some_and(|idx| idx >= len) {
            self.reset_selection();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::tui::detail::DetailState;
    use crate::tui::test_support::{FakeCatalog, batman_results};

    fn make_state(api: FakeCatalog) -> BrowserState<FakeCatalog> {
        BrowserState::new(
            Arc::new(api),
            Duration::from_millis(400),
            String::from("/poster-placeholder.svg"),
        )
    }

    async fn state_with_results() -> BrowserState<FakeCatalog> {
        let api = FakeCatalog::new()
            .with_search("batman", batman_results())
            .with_detail("tt1877830", "The Batman");
        let mut state = make_state(api);
        for ch in "batman".chars() {
            state.query_push(ch);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        state.tick();
        state
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state() {
        // Arrange & Act
        let state = make_state(FakeCatalog::new());

        // Assert
        assert_eq!(state.focus, Focus::Query);
        assert_eq!(state.search.query(), "");
        assert!(state.selected_result().is_none());
        assert!(!state.detail.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_then_tick_selects_first_row() {
        // Arrange & Act
        let state = state_with_results().await;

        // Assert
        assert_eq!(state.search.results().len(), 3);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.selected_result().unwrap().imdb_id, "tt0372784");
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_down_and_up() {
        // Arrange
        let mut state = state_with_results().await;
        state.focus_results();

        // Act & Assert
        state.move_down();
        state.move_down();
        assert_eq!(state.cursor(), 2);

        state.move_down(); // at end, should not move
        assert_eq!(state.cursor(), 2);

        state.move_up();
        assert_eq!(state.cursor(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_up_and_page_down() {
        // Arrange
        let mut state = state_with_results().await;

        // Act
        state.page_down(10);

        // Assert: clamped to last item
        assert_eq!(state.cursor(), 2);

        // Act
        state.page_up(10);

        // Assert
        assert_eq!(state.cursor(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_results_requires_rows() {
        // Arrange
        let mut state = make_state(FakeCatalog::new());

        // Act
        state.focus_results();

        // Assert
        assert_eq!(state.focus, Focus::Query);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_selected_loads_detail() {
        // Arrange
        let mut state = state_with_results().await;
        state.focus_results();
        state.move_down();

        // Act
        let opened = state.open_selected();
        state.detail.wait_for_result().await;

        // Assert
        assert!(opened);
        assert!(matches!(state.detail.state(), DetailState::Loaded(_)));
        assert_eq!(
            state.current_imdb_url().as_deref(),
            Some("https://www.imdb.com/title/tt1877830/")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_detail_returns_to_list() {
        // Arrange
        let mut state = state_with_results().await;
        state.open_selected();

        // Act
        state.close_detail();

        // Assert
        assert!(!state.detail.is_open());
        assert_eq!(state.cursor(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_query_resets_selection_and_focus() {
        // Arrange
        let mut state = state_with_results().await;
        state.focus_results();
        state.move_down();

        // Act
        state.clear_query();

        // Assert
        assert!(state.search.results().is_empty());
        assert!(state.selected_result().is_none());
        assert_eq!(state.focus, Focus::Query);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_pop_to_empty_clears_results() {
        // Arrange
        let mut state = make_state(FakeCatalog::new());
        state.query_push('x');

        // Act
        state.query_pop();
        state.query_pop(); // already empty, no-op

        // Assert
        assert_eq!(state.search.query(), "");
        assert!(!state.search.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_selected_without_results() {
        // Arrange
        let mut state = make_state(FakeCatalog::new());

        // Act
        let opened = state.open_selected();

        // Assert
        assert!(!opened);
        assert!(state.current_imdb_url().is_none());
    }
}
