//! TUI rendering logic for the browser.

use marquee_api::omdb::OmdbApi;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use super::detail::DetailState;
use super::presenter::{self, DetailView, PROMPT_MESSAGE, ResultRow, ResultView};
use super::state::{BrowserState, Focus};

/// Draws the browser UI. Returns the main content area height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw<A>(frame: &mut Frame, state: &mut BrowserState<A>) -> u16
where
    A: OmdbApi + Send + Sync + 'static,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // query input
            Constraint::Min(5),    // results
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_results(frame, chunks[1], state);
    draw_footer(frame, chunks[2], state);

    if state.detail.is_open() {
        draw_detail(frame, centered_rect(80, 80, frame.area()), state);
    }

    chunks[1].height
}

/// Draws the query input and the status box.
#[allow(clippy::indexing_slicing)]
fn draw_header<A>(frame: &mut Frame, area: Rect, state: &BrowserState<A>)
where
    A: OmdbApi + Send + Sync + 'static,
{
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let input_style = if state.focus == Focus::Query && !state.detail.is_open() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let query = state.search.query();
    let input = Paragraph::new(query)
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Search "));
    frame.render_widget(input, header_chunks[0]);

    if state.focus == Focus::Query && !state.detail.is_open() {
        let width = u16::try_from(Span::raw(query).width()).unwrap_or(u16::MAX);
        let inner = header_chunks[0];
        let x = inner
            .x
            .saturating_add(1)
            .saturating_add(width)
            .min(inner.right().saturating_sub(2));
        frame.set_cursor_position((x, inner.y.saturating_add(1)));
    }

    let busy = if state.search.is_loading() {
        Some("searching")
    } else if state.detail.is_loading() {
        Some("loading details")
    } else {
        None
    };
    let status = if let Some(activity) = busy {
        Line::from(Span::styled(
            format!("\u{27f3} {activity}\u{2026}"),
            Style::default().fg(Color::Cyan),
        ))
    } else if state.search.results().is_empty() {
        Line::from("")
    } else {
        Line::from(presenter::result_count_label(state.search.results().len()))
    };
    let status =
        Paragraph::new(status).block(Block::default().borders(Borders::ALL).title(" OMDb "));
    frame.render_widget(status, header_chunks[1]);
}

/// Draws the results area according to the presented view.
fn draw_results<A>(frame: &mut Frame, area: Rect, state: &mut BrowserState<A>)
where
    A: OmdbApi + Send + Sync + 'static,
{
    let view = presenter::present(
        state.search.query(),
        state.search.is_loading(),
        state.search.results(),
        &state.placeholder_poster,
    );

    let message = match view {
        ResultView::Prompt => vec![
            Line::from("\u{1f3ac}"),
            Line::from(""),
            Line::from(PROMPT_MESSAGE),
        ],
        ResultView::Searching { term } => {
            vec![Line::from(format!("Searching for \"{term}\"\u{2026}"))]
        }
        ResultView::NoResults { term } => vec![
            Line::from(presenter::no_results_message(term)),
            Line::from(""),
            Line::from(Span::styled(
                "Try another search term",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        ResultView::Results { summary, rows } => {
            let table = results_table(&summary, &rows, state.focus == Focus::Results);
            frame.render_stateful_widget(table, area, &mut state.results_table);
            return;
        }
    };

    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Results "));
    frame.render_widget(paragraph, area);
}

/// Builds the ranked result table.
fn results_table(summary: &str, rows: &[ResultRow<'_>], focused: bool) -> Table<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let header = Row::new(vec!["#", "Title", "Year", "Type", "Poster"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new(vec![
                r.rank.to_string(),
                String::from(r.title),
                String::from(r.year),
                String::from(r.category),
                String::from(r.poster),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(24),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Percentage(35),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {summary} "))
                .border_style(border_style),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
}

/// Draws the detail overlay.
fn draw_detail<A>(frame: &mut Frame, area: Rect, state: &BrowserState<A>)
where
    A: OmdbApi + Send + Sync + 'static,
{
    let (title, lines) = match state.detail.state() {
        DetailState::Idle => return,
        DetailState::Loading { imdb_id } => (
            format!(" {imdb_id} "),
            vec![Line::from("Loading details\u{2026}")],
        ),
        DetailState::NotFound { imdb_id } => (
            format!(" {imdb_id} "),
            vec![Line::from("No details found for this title.")],
        ),
        DetailState::Loaded(record) => {
            let view = presenter::detail_view(record, &state.placeholder_poster);
            (format!(" {} ", view.title), detail_lines(&view))
        }
    };

    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(" Esc: close  o: open IMDb ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// Formats the detail view as styled lines.
fn detail_lines(view: &DetailView) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(view.badges.join("  \u{2022}  ")),
        Line::from(Span::styled(view.genres.join(", "), Style::default().fg(Color::Magenta))),
        Line::from(""),
        Line::from(view.plot.clone()),
        Line::from(""),
    ];
    lines.extend(view.fields.iter().map(|(name, value)| {
        Line::from(vec![
            Span::styled(format!("{name}: "), label),
            Span::raw(value.clone()),
        ])
    }));
    if let Some(awards) = &view.awards {
        lines.push(Line::from(vec![
            Span::styled("Awards: ", label),
            Span::raw(awards.clone()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("\u{2605} IMDb ", label),
        Span::raw(view.imdb_rating.clone()),
    ]));
    lines.extend(view.ratings.iter().map(|r| Line::from(format!("  {r}"))));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Poster: ", label),
        Span::raw(view.poster.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("IMDb: ", label),
        Span::raw(view.imdb_url.clone()),
    ]));
    lines
}

/// Returns a rect centered in `area` taking the given percentages.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Draws the footer with key hints.
fn draw_footer<A>(frame: &mut Frame, area: Rect, state: &BrowserState<A>)
where
    A: OmdbApi + Send + Sync + 'static,
{
    let help_text = if state.detail.is_open() {
        Line::from("Esc/q/Enter: close  o: open IMDb  Ctrl-C: quit")
    } else {
        match state.focus {
            Focus::Query => Line::from(
                "Type to search  Tab/\u{2193}: results  Enter: details  Esc: clear  Ctrl-C: quit",
            ),
            Focus::Results => Line::from(vec![Span::raw(
                "\u{2191}\u{2193}/j/k: move  PgUp/PgDn: page  Enter: details  /: search  o: open IMDb  q: quit",
            )]),
        }
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;
    use std::time::Duration;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tui::test_support::{FakeCatalog, batman_results};

    fn render(state: &mut BrowserState<FakeCatalog>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| {
                draw(frame, state);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn make_state(api: FakeCatalog) -> BrowserState<FakeCatalog> {
        BrowserState::new(
            Arc::new(api),
            Duration::from_millis(400),
            String::from("/poster-placeholder.svg"),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_prompt() {
        // Arrange
        let mut state = make_state(FakeCatalog::new());

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains(PROMPT_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_results_with_placeholder() {
        // Arrange
        let mut state = make_state(FakeCatalog::new().with_search("batman", batman_results()));
        state.set_query("batman");
        state.search.wait_for_results().await;

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("Found 3 results"));
        assert!(screen.contains("Batman Begins"));
        assert!(screen.contains("/poster-placeholder.svg"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_no_results() {
        // Arrange
        let mut state = make_state(FakeCatalog::new());
        state.set_query("zzzzqqq");
        state.search.wait_for_results().await;

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("No results for \"zzzzqqq\""));
        assert!(!screen.contains(PROMPT_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_detail_overlay() {
        // Arrange
        let api = FakeCatalog::new()
            .with_search("batman", batman_results())
            .with_detail("tt0372784", "Batman Begins");
        let mut state = make_state(api);
        state.set_query("batman");
        tokio::time::sleep(Duration::from_millis(401)).await;
        let ticked = state.tick();
        let opened = state.open_selected();
        let loading_screen = render(&mut state);
        state.detail.wait_for_result().await;

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(ticked);
        assert!(opened);
        assert!(loading_screen.contains("Loading details"));
        assert!(screen.contains("Christopher Nolan"));
        assert!(screen.contains("Box office"));
    }
}
