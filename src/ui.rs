use crate::i18n::{t, t_with_args};
use crate::loader::{self, DataSource};
use crate::opener;
use crate::render::{selection_of, PageView, RowView, SelectOption, TableBody, ViewRenderer, COLUMNS};
use crate::state::{Action, ViewState, ViewStore};
use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::time::Duration;
use tracing::{debug, info, warn};
use tui_textarea::{CursorMove, Input, Key, TextArea};

#[derive(Clone, Copy, PartialEq, Debug)]
enum InputMode {
    Browse,
    Search,
    YearPicker,
    FormatPicker,
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq)]
enum KeyOutcome {
    Continue,
    Quit,
    Open(String),
}

/// Holds the latest view pushed by the store; every frame is drawn from it.
#[derive(Default)]
pub struct TuiRenderer {
    view: Option<PageView>,
}

impl TuiRenderer {
    pub fn view(&self) -> Option<&PageView> {
        self.view.as_ref()
    }
}

impl ViewRenderer for TuiRenderer {
    fn render(&mut self, view: &PageView) -> Result<()> {
        self.view = Some(view.clone());
        Ok(())
    }
}

/// Multi-select popup for the year and format controls.
struct Picker {
    options: Vec<SelectOption>,
    list_state: ListState,
}

impl Picker {
    fn new(options: &[SelectOption]) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            options: options.to_vec(),
            list_state,
        }
    }

    fn move_up(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if selected > 0 {
                self.list_state.select(Some(selected - 1));
            }
        }
    }

    fn move_down(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if selected < self.options.len().saturating_sub(1) {
                self.list_state.select(Some(selected + 1));
            }
        }
    }

    /// Picking "all" clears everything else; clearing the last value falls back to "all".
    fn toggle(&mut self) {
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        if selected >= self.options.len() {
            return;
        }

        if self.options[selected].is_all() {
            for option in &mut self.options {
                option.selected = option.is_all();
            }
            return;
        }

        self.options[selected].selected = !self.options[selected].selected;
        let any_specific = self.options.iter().any(|o| !o.is_all() && o.selected);
        for option in self.options.iter_mut().filter(|o| o.is_all()) {
            option.selected = !any_specific;
        }
    }
}

/// Interaction state that lives outside the view model.
struct Chrome {
    mode: InputMode,
    search: TextArea<'static>,
    table_state: TableState,
    picker: Option<Picker>,
    status_message: String,
}

impl Chrome {
    fn new() -> Self {
        Self {
            mode: InputMode::Browse,
            search: new_search_box(""),
            table_state: TableState::default(),
            picker: None,
            status_message: t("status_welcome"),
        }
    }

    /// Puts the cursor back on the first row after the page content changed.
    fn reset_selection(&mut self, view: Option<&PageView>) {
        let has_rows = view.map(|v| !v.rows().is_empty()).unwrap_or(false);
        self.table_state.select(if has_rows { Some(0) } else { None });
    }

    fn selected_row<'a>(&self, view: &'a PageView) -> Option<&'a RowView> {
        self.table_state.selected().and_then(|i| view.rows().get(i))
    }
}

fn new_search_box(text: &str) -> TextArea<'static> {
    let mut search = TextArea::new(vec![text.to_string()]);
    search.move_cursor(CursorMove::End);
    search
}

fn search_text(search: &TextArea) -> String {
    search.lines().first().cloned().unwrap_or_default()
}

pub async fn run(source: DataSource, initial: Vec<Action>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, source, initial).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, source: DataSource, initial: Vec<Action>) -> Result<()> {
    let mut store = ViewStore::new(ViewState::loading(), TuiRenderer::default())?;
    let mut chrome = Chrome::new();

    // Loading frame while the dataset is fetched
    terminal.draw(|f| draw(f, store.renderer().view(), &mut chrome))?;

    let result = loader::load(&source).await;
    if result.is_err() {
        chrome.status_message = t_with_args("status_load_failed", &[("source", &source.to_string())]);
    }
    store.dispatch(Action::Loaded(result))?;
    for action in initial {
        store.dispatch(action)?;
    }

    if store.state().is_ready() {
        chrome.search = new_search_box(&store.state().criteria().search);
        chrome.status_message = showing_message(store.state());
    }
    chrome.reset_selection(store.renderer().view());
    info!(source = %source, "viewer ready");

    loop {
        terminal.draw(|f| draw(f, store.renderer().view(), &mut chrome))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(&mut store, &mut chrome, key)? {
                    KeyOutcome::Quit => break,
                    KeyOutcome::Open(url) => {
                        chrome.status_message = match opener::open_url(&url) {
                            Ok(()) => t_with_args("status_opening", &[("url", &url)]),
                            Err(e) => {
                                warn!(%url, error = %format!("{:#}", e), "could not open link");
                                t_with_args("status_open_failed", &[("url", &url), ("error", &format!("{:#}", e))])
                            }
                        };
                    }
                    KeyOutcome::Continue => {}
                }
            }
        }
    }

    Ok(())
}

fn showing_message(state: &ViewState) -> String {
    t_with_args(
        "status_showing",
        &[
            ("count", &state.filtered_len().to_string()),
            ("total", &state.records().len().to_string()),
        ],
    )
}

fn handle_key(store: &mut ViewStore<TuiRenderer>, chrome: &mut Chrome, key: KeyEvent) -> Result<KeyOutcome> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(KeyOutcome::Quit);
    }

    match chrome.mode {
        InputMode::Browse => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(KeyOutcome::Quit),
            KeyCode::Enter | KeyCode::Char('o') => {
                if let Some(row) = store.renderer().view().and_then(|v| chrome.selected_row(v)) {
                    return Ok(KeyOutcome::Open(row.title.href.clone()));
                }
            }
            KeyCode::Char('O') => {
                if let Some(row) = store.renderer().view().and_then(|v| chrome.selected_row(v)) {
                    return Ok(KeyOutcome::Open(row.channel.href.clone()));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = chrome.table_state.selected() {
                    if selected > 0 {
                        chrome.table_state.select(Some(selected - 1));
                    }
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = store.renderer().view().map(|v| v.rows().len()).unwrap_or(0);
                if let Some(selected) = chrome.table_state.selected() {
                    if selected < rows.saturating_sub(1) {
                        chrome.table_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') | KeyCode::Char('l') => {
                let before = store.state().current_page();
                store.dispatch(Action::NextPage)?;
                if store.state().current_page() != before {
                    debug!(page = store.state().current_page(), "next page");
                    chrome.reset_selection(store.renderer().view());
                }
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('b') | KeyCode::Char('h') => {
                let before = store.state().current_page();
                store.dispatch(Action::PreviousPage)?;
                if store.state().current_page() != before {
                    debug!(page = store.state().current_page(), "previous page");
                    chrome.reset_selection(store.renderer().view());
                }
            }
            KeyCode::Char('/') if store.state().is_ready() => {
                chrome.mode = InputMode::Search;
            }
            KeyCode::Char('y') => {
                if let Some(view) = store.renderer().view() {
                    if !view.year_options.is_empty() {
                        chrome.picker = Some(Picker::new(&view.year_options));
                        chrome.mode = InputMode::YearPicker;
                    }
                }
            }
            KeyCode::Char('f') => {
                if let Some(view) = store.renderer().view() {
                    if !view.format_options.is_empty() {
                        chrome.picker = Some(Picker::new(&view.format_options));
                        chrome.mode = InputMode::FormatPicker;
                    }
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                chrome.search = new_search_box("");
                store.dispatch(Action::ResetFilters)?;
                chrome.reset_selection(store.renderer().view());
                chrome.status_message = t("status_reset");
            }
            _ => {}
        },
        InputMode::Search => match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                chrome.mode = InputMode::Browse;
            }
            _ => {
                if chrome.search.input(to_input(key)) {
                    store.dispatch(Action::SetSearch(search_text(&chrome.search)))?;
                    chrome.reset_selection(store.renderer().view());
                    chrome.status_message = showing_message(store.state());
                }
            }
        },
        InputMode::YearPicker | InputMode::FormatPicker => match key.code {
            KeyCode::Esc => {
                chrome.picker = None;
                chrome.mode = InputMode::Browse;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(picker) = chrome.picker.as_mut() {
                    picker.move_up();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(picker) = chrome.picker.as_mut() {
                    picker.move_down();
                }
            }
            KeyCode::Char(' ') => {
                if let Some(picker) = chrome.picker.as_mut() {
                    picker.toggle();
                }
            }
            KeyCode::Enter => {
                if let Some(picker) = chrome.picker.take() {
                    let selection = selection_of(&picker.options);
                    let action = if chrome.mode == InputMode::YearPicker {
                        Action::SetYears(selection)
                    } else {
                        Action::SetFormats(selection)
                    };
                    store.dispatch(action)?;
                    chrome.reset_selection(store.renderer().view());
                    chrome.status_message = showing_message(store.state());
                }
                chrome.mode = InputMode::Browse;
            }
            _ => {}
        },
    }

    Ok(KeyOutcome::Continue)
}

/// Maps a crossterm key onto the text area's input type.
fn to_input(key: KeyEvent) -> Input {
    let code = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => Key::Null,
    };
    Input {
        key: code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        ..Default::default()
    }
}

fn draw(f: &mut Frame, view: Option<&PageView>, chrome: &mut Chrome) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and totals
            Constraint::Length(3), // Filters
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Pagination
            Constraint::Length(3), // Selected row links
            Constraint::Length(3), // Status
        ])
        .split(f.size());

    // Title with totals
    let mut title_spans = vec![Span::styled(
        t("app_title"),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if let Some(summary) = view.and_then(|v| v.summary.as_ref()) {
        title_spans.push(Span::raw("  |  "));
        title_spans.push(Span::styled(
            format!("{}: {}", t("total_videos"), summary.total_videos),
            Style::default().fg(Color::Yellow),
        ));
        title_spans.push(Span::raw("  |  "));
        title_spans.push(Span::styled(
            format!("{}: {}", t("total_runtime"), summary.total_runtime),
            Style::default().fg(Color::Yellow),
        ));
    }
    let title = Paragraph::new(Line::from(title_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    draw_filters(f, chunks[1], view, chrome);

    match view {
        Some(view) => draw_table(f, chunks[2], view, &mut chrome.table_state),
        None => draw_placeholder(f, chunks[2], &t("loading"), Color::Gray),
    }

    draw_pagination(f, chunks[3], view);

    // Links of the highlighted row (pink box)
    let detail_text = view
        .and_then(|v| chrome.selected_row(v))
        .map(|row| {
            format!(
                "{} | {}",
                t_with_args(
                    "detail_link",
                    &[("url", &row.title.href), ("channel_url", &row.channel.href)],
                ),
                format_date(&row.upload_date)
            )
        })
        .unwrap_or_default();
    let detail_widget = Paragraph::new(detail_text)
        .style(Style::default().fg(Color::Magenta))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(detail_widget, chunks[4]);

    // Status bar
    let help_text = match chrome.mode {
        InputMode::Browse => t("help_browse"),
        InputMode::Search => t("help_search"),
        InputMode::YearPicker | InputMode::FormatPicker => t("help_picker"),
    };
    let status_text = format!("{} | {}", chrome.status_message, help_text);
    let status_widget = Paragraph::new(status_text)
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(status_widget, chunks[5]);

    if let Some(picker) = chrome.picker.as_mut() {
        let all_key = if chrome.mode == InputMode::YearPicker { "all_years" } else { "all_formats" };
        let title_key = if chrome.mode == InputMode::YearPicker { "filter_year" } else { "filter_format" };
        draw_picker(f, picker, all_key, &t(title_key));
    }
}

fn selection_label(options: &[SelectOption], all_key: &str) -> String {
    let picked: Vec<String> = options
        .iter()
        .filter(|o| o.selected && !o.is_all())
        .map(|o| o.label(all_key))
        .collect();
    if picked.is_empty() {
        t(all_key)
    } else {
        picked.join(", ")
    }
}

fn draw_filters(f: &mut Frame, area: Rect, view: Option<&PageView>, chrome: &Chrome) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(25),
            Constraint::Min(0),
        ])
        .split(area);

    let border = |mode: InputMode| {
        if chrome.mode == mode {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let years = view
        .map(|v| selection_label(&v.year_options, "all_years"))
        .unwrap_or_default();
    let year_widget = Paragraph::new(years).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border(InputMode::YearPicker))
            .title(format!("{} (y)", t("filter_year"))),
    );
    f.render_widget(year_widget, chunks[0]);

    let formats = view
        .map(|v| selection_label(&v.format_options, "all_formats"))
        .unwrap_or_default();
    let format_widget = Paragraph::new(formats).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border(InputMode::FormatPicker))
            .title(format!("{} (f)", t("filter_format"))),
    );
    f.render_widget(format_widget, chunks[1]);

    let search_widget = Paragraph::new(search_line(&chrome.search, chrome.mode == InputMode::Search)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border(InputMode::Search))
            .title(format!("{} (/)", t("search"))),
    );
    f.render_widget(search_widget, chunks[2]);
}

/// Search text with a block cursor while editing, or the placeholder when empty.
fn search_line(search: &TextArea, editing: bool) -> Line<'static> {
    let text = search_text(search);
    if text.is_empty() && !editing {
        return Line::from(Span::styled(t("search_placeholder"), Style::default().fg(Color::DarkGray)));
    }
    if !editing {
        return Line::from(text);
    }

    let (_, col) = search.cursor();
    let before: String = text.chars().take(col).collect();
    let at: String = text.chars().nth(col).map(String::from).unwrap_or_else(|| " ".to_string());
    let after: String = text.chars().skip(col + 1).collect();
    Line::from(vec![
        Span::raw(before),
        Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(after),
    ])
}

fn draw_placeholder(f: &mut Frame, area: Rect, text: &str, color: Color) {
    let placeholder = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(t("app_title")));
    f.render_widget(placeholder, area);
}

fn draw_table(f: &mut Frame, area: Rect, view: &PageView, table_state: &mut TableState) {
    let rows = match &view.body {
        TableBody::Loading => return draw_placeholder(f, area, &t("loading"), Color::Gray),
        TableBody::Failed(message) => {
            let text = format!("{}\n{}", t("load_error"), message);
            return draw_placeholder(f, area, &text, Color::Red);
        }
        TableBody::NoResults => return draw_placeholder(f, area, &t("no_results"), Color::Gray),
        TableBody::Rows(rows) => rows,
    };

    let link_style = Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut tag_spans = Vec::new();
            for (j, tag) in row.tags.iter().enumerate() {
                if j > 0 {
                    tag_spans.push(Span::raw(" "));
                }
                tag_spans.push(Span::styled(
                    format!(" {} ", tag),
                    Style::default().fg(Color::White).bg(Color::DarkGray),
                ));
            }

            let style = if i % 2 == 1 {
                Style::default().bg(Color::Rgb(30, 30, 30))
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(row.year.clone()),
                Cell::from(Span::styled(row.rank.clone(), Style::default().fg(Color::Yellow))),
                Cell::from(Span::styled(row.title.text.clone(), link_style.add_modifier(Modifier::BOLD))),
                Cell::from(Span::styled(row.channel.text.clone(), link_style)),
                Cell::from(Line::from(tag_spans)),
                Cell::from(row.run_time.clone()),
                Cell::from(Span::styled(row.upload_date.clone(), Style::default().fg(Color::Gray))),
                Cell::from(row.format.clone()),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(COLUMNS.iter().map(|key| Cell::from(t(key))).collect::<Vec<_>>())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Percentage(28),
        Constraint::Percentage(16),
        Constraint::Percentage(22),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Min(8),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "{} ({}-{})",
            view.page_info(),
            view.first_index + 1,
            view.first_index + rows.len()
        )))
        .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    f.render_stateful_widget(table, area, table_state);
}

fn draw_pagination(f: &mut Frame, area: Rect, view: Option<&PageView>) {
    let button = |label: String, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label, style)
    };

    let line = match view {
        Some(view) => Line::from(vec![
            button(format!("◀ {}", t("button_previous")), view.previous_enabled),
            Span::raw("   "),
            Span::styled(view.page_info(), Style::default().fg(Color::Cyan)),
            Span::raw("   "),
            button(format!("{} ▶", t("button_next")), view.next_enabled),
            Span::raw("   |   "),
            Span::styled(view.item_count_text(), Style::default().fg(Color::Gray)),
        ]),
        None => Line::from(""),
    };

    let pagination = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(pagination, area);
}

fn draw_picker(f: &mut Frame, picker: &mut Picker, all_key: &str, title: &str) {
    let area = centered_rect(40, 60, f.size());
    let items: Vec<ListItem> = picker
        .options
        .iter()
        .map(|option| {
            let mark = if option.selected { "[x]" } else { "[ ]" };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", mark), Style::default().fg(Color::Yellow)),
                Span::raw(option.label(all_key)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut picker.list_state);
}

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

fn format_date(date_str: &str) -> String {
    if date_str.is_empty() {
        return t("date_unknown");
    }

    let ago = |unit: &str, count: i64| {
        if count == 1 {
            t(&format!("date_{}_one", unit))
        } else {
            t_with_args(&format!("date_{}_other", unit), &[("count", &count.to_string())])
        }
    };

    // Full timestamps first, then plain YYYY-MM-DD
    let date = chrono::DateTime::parse_from_rfc3339(date_str)
        .map(|dt| dt.date_naive())
        .or_else(|_| chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d"));

    if let Ok(date) = date {
        let now = chrono::Utc::now().date_naive();
        let days = now.signed_duration_since(date).num_days();
        if days > 365 {
            return ago("year", days / 365);
        } else if days > 30 {
            return ago("month", days / 30);
        } else if days > 0 {
            return ago("day", days);
        } else if days == 0 {
            return t("date_today");
        }
    }

    date_str.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Dataset;
    use crate::record::{sample, Record};
    use ratatui::backend::TestBackend;

    fn store_with(records: Vec<Record>) -> ViewStore<TuiRenderer> {
        let mut store = ViewStore::new(ViewState::loading(), TuiRenderer::default()).unwrap();
        store
            .dispatch(Action::Loaded(Dataset::from_records(records)))
            .unwrap();
        store
    }

    fn videos(count: i64) -> Vec<Record> {
        (1..=count)
            .map(|i| sample(if i % 2 == 0 { 2021 } else { 2020 }, i, &format!("Video {}", i), "Essay"))
            .collect()
    }

    fn press(store: &mut ViewStore<TuiRenderer>, chrome: &mut Chrome, code: KeyCode) -> KeyOutcome {
        handle_key(store, chrome, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn screen(store: &ViewStore<TuiRenderer>, chrome: &mut Chrome) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 50)).unwrap();
        terminal
            .draw(|f| draw(f, store.renderer().view(), chrome))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn draws_first_page_of_rows() {
        let store = store_with(videos(25));
        let mut chrome = Chrome::new();
        chrome.reset_selection(store.renderer().view());
        let text = screen(&store, &mut chrome);

        assert!(text.contains("Video 1 "));
        assert!(text.contains("Video 20"));
        assert!(!text.contains("Video 21"));
        assert!(text.contains("https://www.youtube.com/watch?v=20201"));
    }

    #[test]
    fn draws_placeholder_for_empty_results() {
        let mut store = store_with(videos(5));
        store.dispatch(Action::SetSearch("nothing".to_string())).unwrap();
        let mut chrome = Chrome::new();
        chrome.reset_selection(store.renderer().view());
        let text = screen(&store, &mut chrome);

        assert!(!text.contains("Video 1"));
        assert_eq!(chrome.table_state.selected(), None);
    }

    #[test]
    fn draws_loading_frame_before_data() {
        let store = ViewStore::new(ViewState::loading(), TuiRenderer::default()).unwrap();
        let mut chrome = Chrome::new();
        let text = screen(&store, &mut chrome);
        assert!(text.contains(&t("loading")));
    }

    #[test]
    fn paging_keys_move_between_pages() {
        let mut store = store_with(videos(25));
        let mut chrome = Chrome::new();

        assert_eq!(press(&mut store, &mut chrome, KeyCode::Char('n')), KeyOutcome::Continue);
        assert_eq!(store.state().current_page(), 2);
        assert_eq!(chrome.table_state.selected(), Some(0));

        press(&mut store, &mut chrome, KeyCode::Right);
        assert_eq!(store.state().current_page(), 2);

        press(&mut store, &mut chrome, KeyCode::Left);
        assert_eq!(store.state().current_page(), 1);
    }

    #[test]
    fn typing_in_search_filters_live() {
        let mut store = store_with(videos(25));
        let mut chrome = Chrome::new();

        press(&mut store, &mut chrome, KeyCode::Char('/'));
        assert_eq!(chrome.mode, InputMode::Search);
        for c in "video 2".chars() {
            press(&mut store, &mut chrome, KeyCode::Char(c));
        }
        assert_eq!(store.state().criteria().search, "video 2");
        // Video 2 and Video 20..25
        assert_eq!(store.state().filtered_len(), 7);

        press(&mut store, &mut chrome, KeyCode::Backspace);
        assert_eq!(store.state().criteria().search, "video ");

        press(&mut store, &mut chrome, KeyCode::Enter);
        assert_eq!(chrome.mode, InputMode::Browse);
        assert_eq!(press(&mut store, &mut chrome, KeyCode::Char('x')), KeyOutcome::Continue);
    }

    #[test]
    fn year_picker_applies_selection() {
        let mut store = store_with(videos(10));
        let mut chrome = Chrome::new();

        press(&mut store, &mut chrome, KeyCode::Char('y'));
        assert_eq!(chrome.mode, InputMode::YearPicker);
        // Options: All, 2021, 2020
        press(&mut store, &mut chrome, KeyCode::Down);
        press(&mut store, &mut chrome, KeyCode::Char(' '));
        press(&mut store, &mut chrome, KeyCode::Enter);

        assert_eq!(chrome.mode, InputMode::Browse);
        assert_eq!(store.state().filtered_len(), 5);
        assert!(store.state().filtered_records().all(|r| r.year == 2021));
    }

    #[test]
    fn picking_all_clears_other_choices() {
        let view = PageView::build(store_with(videos(4)).state());
        let mut picker = Picker::new(&view.year_options);

        picker.move_down();
        picker.toggle();
        assert!(!picker.options[0].selected);
        assert!(picker.options[1].selected);

        picker.move_up();
        picker.toggle();
        assert!(picker.options[0].selected);
        assert!(picker.options.iter().skip(1).all(|o| !o.selected));

        picker.move_down();
        picker.toggle();
        picker.toggle();
        assert!(picker.options[0].selected);
        assert!(selection_of(&picker.options).is_empty());
    }

    #[test]
    fn reset_clears_search_and_filters() {
        let mut store = store_with(videos(25));
        let mut chrome = Chrome::new();
        store.dispatch(Action::SetSearch("video 1".to_string())).unwrap();
        chrome.search = new_search_box("video 1");

        press(&mut store, &mut chrome, KeyCode::Char('r'));
        assert_eq!(store.state().filtered_len(), 25);
        assert_eq!(search_text(&chrome.search), "");
    }

    #[test]
    fn quit_keys() {
        let mut store = store_with(videos(1));
        let mut chrome = Chrome::new();
        assert_eq!(press(&mut store, &mut chrome, KeyCode::Char('q')), KeyOutcome::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut store, &mut chrome, ctrl_c).unwrap(), KeyOutcome::Quit);
    }

    #[test]
    fn open_keys_pick_the_selected_rows_links() {
        let mut store = store_with(videos(25));
        let mut chrome = Chrome::new();
        chrome.reset_selection(store.renderer().view());

        assert_eq!(
            press(&mut store, &mut chrome, KeyCode::Enter),
            KeyOutcome::Open("https://www.youtube.com/watch?v=20201".to_string())
        );

        press(&mut store, &mut chrome, KeyCode::Down);
        assert_eq!(
            press(&mut store, &mut chrome, KeyCode::Char('o')),
            KeyOutcome::Open("https://www.youtube.com/watch?v=20212".to_string())
        );
        assert_eq!(
            press(&mut store, &mut chrome, KeyCode::Char('O')),
            KeyOutcome::Open("https://www.youtube.com/@somechannel".to_string())
        );
    }

    #[test]
    fn open_keys_do_nothing_without_a_row() {
        let mut store = store_with(videos(3));
        store.dispatch(Action::SetSearch("nothing".to_string())).unwrap();
        let mut chrome = Chrome::new();
        chrome.reset_selection(store.renderer().view());

        assert_eq!(press(&mut store, &mut chrome, KeyCode::Enter), KeyOutcome::Continue);
        assert_eq!(press(&mut store, &mut chrome, KeyCode::Char('O')), KeyOutcome::Continue);
    }

    #[test]
    fn draws_error_row_after_failed_load() {
        let mut store = ViewStore::new(ViewState::loading(), TuiRenderer::default()).unwrap();
        let err = Dataset::from_json(b"not json").unwrap_err();
        store.dispatch(Action::Loaded(Err(err))).unwrap();
        let mut chrome = Chrome::new();
        chrome.reset_selection(store.renderer().view());
        let text = screen(&store, &mut chrome);

        assert!(text.contains(&t("load_error")));
        assert!(!text.contains(&t("total_videos")));
        assert_eq!(chrome.table_state.selected(), None);
        assert_eq!(press(&mut store, &mut chrome, KeyCode::Enter), KeyOutcome::Continue);
    }

    #[test]
    fn formats_relative_dates() {
        assert_eq!(format_date(""), t("date_unknown"));
        assert_eq!(format_date("sometime"), "sometime");
        let now = chrono::Utc::now().date_naive();
        assert_eq!(format_date(&now.format("%Y-%m-%d").to_string()), t("date_today"));

        let yesterday = now - chrono::Duration::days(1);
        assert_eq!(format_date(&yesterday.format("%Y-%m-%d").to_string()), t("date_day_one"));

        let years = (now - chrono::NaiveDate::from_ymd_opt(2001, 1, 1).unwrap()).num_days() / 365;
        assert_eq!(
            format_date("2001-01-01"),
            t_with_args("date_year_other", &[("count", &years.to_string())])
        );
    }
}
