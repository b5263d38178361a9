//! hilite: terminal viewer for annotating plain-text decision documents
//!
//! Opens a decision export in an interactive viewer with live search,
//! user highlighting, and notes, or renders an annotated export to
//! stdout.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState,
    },
};

use hilite::annotate::{
    AnnotationStore, Navigator, SavedAnnotations, SearchEngine, SegmentSource, SelectionEvent,
    build_segments, capture_selection, slice_chars,
};
use hilite::decision::{Decision, load_decision};
use hilite::export::{ExportOptions, export_decision};
use hilite::theme::{Theme, ThemeManager};
use hilite::widgets::{DecisionView, LayoutCache, char_offset_at, layout_document};
use hilite::{ColorDepth, ExportFormat};

/// Terminal annotation and search for plain-text decision documents
#[derive(Parser)]
#[command(name = "hilite", version, about)]
struct Cli {
    /// Decision file to open (.txt)
    file: Option<PathBuf>,

    /// Sidecar JSON file with saved highlights and notes
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Export the annotated decision to stdout instead of opening the viewer
    #[arg(long, value_enum)]
    export: Option<ExportFormat>,

    /// Color depth for ANSI export
    #[arg(long, value_enum, default_value = "auto")]
    color_depth: ColorDepth,

    /// Write the default theme file and exit
    #[arg(long)]
    theme_init: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.theme_init {
        Theme::init_default()?;
        if let Some(path) = Theme::get_config_path() {
            println!("Wrote default theme to {}", path.display());
        }
        return Ok(());
    }

    let Some(file) = cli.file.as_deref() else {
        bail!("No decision file given. Usage: hilite <decision.txt>");
    };
    let decision = load_decision(file).await?;

    let mut store = AnnotationStore::for_text(&decision.body);
    if let Some(path) = cli.annotations.as_deref() {
        load_annotations(&mut store, path)?;
    }

    if let Some(format) = &cli.export {
        let options = ExportOptions {
            color_depth: cli.color_depth.clone(),
            ..Default::default()
        };
        let output = export_decision(&decision, &store, format, &options)?;
        print!("{output}");
        return Ok(());
    }

    run_viewer(decision, store, cli.annotations)
}

fn load_annotations(store: &mut AnnotationStore, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read annotations file: {}", path.display()))?;
    let saved: SavedAnnotations = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse annotations file: {}", path.display()))?;
    store.load_saved(saved);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    View,
    Search,
    Note,
    Panel,
}

/// A scroll resolved against the navigator after the next layout pass,
/// so fresh handles are used rather than the previous render's.
enum PendingScroll {
    SearchMatch(usize),
    Highlight(String),
}

struct App {
    decision: Decision,
    store: AnnotationStore,
    search: SearchEngine,
    navigator: Navigator<usize>,
    layout_cache: LayoutCache,
    themes: ThemeManager,
    annotations_path: Option<PathBuf>,

    mode: InputMode,
    search_input: String,
    note_input: String,
    scroll_offset: usize,
    pending_scroll: Option<PendingScroll>,
    /// Bumped whenever highlights, matches, or the current match change;
    /// keys the layout cache.
    revision: u64,
    status: Option<String>,
    panel_selected: usize,
    selection_anchor: Option<usize>,
    doc_area: Rect,
    should_quit: bool,
}

impl App {
    fn new(decision: Decision, store: AnnotationStore, annotations_path: Option<PathBuf>) -> Self {
        App {
            decision,
            store,
            search: SearchEngine::new(),
            navigator: Navigator::new(),
            layout_cache: LayoutCache::new(),
            themes: ThemeManager::default(),
            annotations_path,
            mode: InputMode::View,
            search_input: String::new(),
            note_input: String::new(),
            scroll_offset: 0,
            pending_scroll: None,
            revision: 0,
            status: None,
            panel_selected: 0,
            selection_anchor: None,
            doc_area: Rect::default(),
            should_quit: false,
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Build (or reuse) the layout for the current content and register
    /// this pass's scroll targets.
    fn ensure_layout(&mut self, width: u16) {
        if self.layout_cache.get(self.revision, width).is_some() {
            return;
        }
        let segments = build_segments(
            &self.decision.body,
            self.store.highlights(),
            self.search.matches(),
        );
        let layout = layout_document(
            &segments,
            width,
            self.themes.theme(),
            self.search.current_index(),
        );
        self.navigator.clear();
        for (source, line) in &layout.targets {
            match source {
                SegmentSource::Highlight { id } => {
                    self.navigator.register_highlight(id.clone(), *line);
                }
                SegmentSource::SearchMatch { index } => {
                    self.navigator.register_search_match(*index, *line);
                }
            }
        }
        self.layout_cache.insert(self.revision, width, layout);
    }

    fn line_count(&self) -> usize {
        self.layout_cache
            .get(self.revision, self.doc_area.width)
            .map(|layout| layout.lines.len())
            .unwrap_or(0)
    }

    fn clamp_scroll(&mut self) {
        let max = self
            .line_count()
            .saturating_sub(self.doc_area.height as usize);
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
    }

    fn center_on_line(&mut self, line: usize) {
        let half = (self.doc_area.height / 2) as usize;
        self.scroll_offset = line.saturating_sub(half);
    }

    /// Map a screen position to a canonical char offset, if it falls
    /// inside the rendered document.
    fn offset_at_screen(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.doc_area;
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let layout = self.layout_cache.get(self.revision, area.width)?;
        let line = self.scroll_offset + (row - area.y) as usize;
        let col = (column - area.x) as usize;
        char_offset_at(layout, line, col)
    }

    /// Turn a completed mouse drag into a captured selection. Both
    /// endpoints are inclusive; a click without a drag is a collapsed
    /// selection and is ignored.
    fn capture_mouse_selection(&mut self, anchor: usize, release: usize) {
        if anchor == release {
            return;
        }
        let (start, end) = if anchor < release {
            (anchor, release)
        } else {
            (release, anchor)
        };
        let selected = slice_chars(&self.decision.body, start, end + 1).to_string();
        let selection = SelectionEvent {
            selected_text: selected,
            preceding_chars: start,
        };
        match capture_selection(&mut self.store, &selection) {
            Ok(Some(_)) => {
                self.touch();
                self.status = Some("Highlight added".to_string());
            }
            Ok(None) => {}
            Err(err) => {
                self.status = Some(format!("Could not add highlight: {err}"));
            }
        }
    }

    fn annotation_count(&self) -> usize {
        self.store.highlights().len() + self.store.notes().len()
    }

    fn save_annotations(&mut self) {
        let Some(path) = self.annotations_path.clone() else {
            self.status = Some("No annotations file (run with --annotations <path>)".to_string());
            return;
        };
        let result = serde_json::to_string_pretty(&self.store.to_saved())
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));
        match result {
            Ok(()) => self.status = Some(format!("Annotations saved to {}", path.display())),
            Err(err) => self.status = Some(format!("Save failed: {err}")),
        }
    }
}

fn run_viewer(
    decision: Decision,
    store: AnnotationStore,
    annotations_path: Option<PathBuf>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(decision, store, annotations_path);
    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui(frame, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            _ => {}
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match app.mode {
        InputMode::View => handle_view_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Note => handle_note_key(app, key),
        InputMode::Panel => handle_panel_key(app, key),
    }
}

fn handle_view_key(app: &mut App, key: KeyEvent) {
    app.status = None;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('/') => {
            app.search_input = app.search.query().to_string();
            app.mode = InputMode::Search;
        }
        KeyCode::Char('n') => {
            app.search.next_match();
            app.touch();
            if let Some(index) = app.search.current_index() {
                app.pending_scroll = Some(PendingScroll::SearchMatch(index));
            }
        }
        KeyCode::Char('N') | KeyCode::Char('p') => {
            app.search.previous_match();
            app.touch();
            if let Some(index) = app.search.current_index() {
                app.pending_scroll = Some(PendingScroll::SearchMatch(index));
            }
        }
        KeyCode::Char('h') => {
            app.store.toggle_highlight_mode();
            app.status = Some(if app.store.highlight_mode() {
                "Highlight mode on: drag to mark text".to_string()
            } else {
                "Highlight mode off".to_string()
            });
        }
        KeyCode::Char('a') => {
            app.panel_selected = 0;
            app.mode = InputMode::Panel;
        }
        KeyCode::Char('m') => {
            app.note_input.clear();
            app.mode = InputMode::Note;
        }
        KeyCode::Char('s') => app.save_annotations(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_offset = app.scroll_offset.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_offset += 1;
        }
        KeyCode::PageUp => {
            app.scroll_offset = app
                .scroll_offset
                .saturating_sub(app.doc_area.height as usize);
        }
        KeyCode::PageDown => {
            app.scroll_offset += app.doc_area.height as usize;
        }
        KeyCode::Home | KeyCode::Char('g') => app.scroll_offset = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.scroll_offset = app.line_count();
        }
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    let mut query_changed = false;
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.mode = InputMode::View,
        KeyCode::Backspace => {
            app.search_input.pop();
            query_changed = true;
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            query_changed = true;
        }
        _ => {}
    }
    if query_changed {
        // Live search: the match set is rebuilt on every edit and the
        // cursor resets to the first match
        let query = app.search_input.clone();
        app.search.set_query(&app.decision.body, &query);
        app.touch();
        if let Some(index) = app.search.current_index() {
            app.pending_scroll = Some(PendingScroll::SearchMatch(index));
        }
    }
}

fn handle_note_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.note_input.clear();
            app.mode = InputMode::View;
        }
        KeyCode::Enter => {
            let text = std::mem::take(&mut app.note_input);
            app.status = match app.store.add_note(&text) {
                Some(_) => Some("Note added".to_string()),
                None => None,
            };
            app.mode = InputMode::View;
        }
        KeyCode::Backspace => {
            app.note_input.pop();
        }
        KeyCode::Char(c) => app.note_input.push(c),
        _ => {}
    }
}

fn handle_panel_key(app: &mut App, key: KeyEvent) {
    let count = app.annotation_count();
    match key.code {
        KeyCode::Esc | KeyCode::Char('a') | KeyCode::Char('q') => app.mode = InputMode::View,
        KeyCode::Up | KeyCode::Char('k') => {
            app.panel_selected = app.panel_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if count > 0 && app.panel_selected + 1 < count {
                app.panel_selected += 1;
            }
        }
        KeyCode::Enter => {
            let highlight_count = app.store.highlights().len();
            if app.panel_selected < highlight_count {
                let id = app.store.highlights()[app.panel_selected].id.clone();
                app.pending_scroll = Some(PendingScroll::Highlight(id));
                app.mode = InputMode::View;
            }
        }
        KeyCode::Char('d') => {
            let highlight_count = app.store.highlights().len();
            if app.panel_selected < highlight_count {
                let id = app.store.highlights()[app.panel_selected].id.clone();
                app.store.remove_highlight(&id);
                app.touch();
            } else if app.panel_selected < count {
                let note_index = app.panel_selected - highlight_count;
                let id = app.store.notes()[note_index].id.clone();
                app.store.remove_note(&id);
            }
            let remaining = app.annotation_count();
            if app.panel_selected >= remaining && remaining > 0 {
                app.panel_selected = remaining - 1;
            }
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_offset = app.scroll_offset.saturating_sub(3);
        }
        MouseEventKind::ScrollDown => {
            app.scroll_offset += 3;
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if app.store.highlight_mode() {
                app.selection_anchor = app.offset_at_screen(mouse.column, mouse.row);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(anchor) = app.selection_anchor.take() {
                if let Some(release) = app.offset_at_screen(mouse.column, mouse.row) {
                    app.capture_mouse_selection(anchor, release);
                }
            }
        }
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(frame.area());

    draw_document(frame, app, chunks[0]);
    draw_footer(frame, app, chunks[1]);

    match app.mode {
        InputMode::Search => draw_input_bar(frame, app, " Search ", true),
        InputMode::Note => draw_input_bar(frame, app, " Add note ", false),
        InputMode::Panel => draw_panel(frame, app),
        InputMode::View => {}
    }
}

fn draw_document(frame: &mut Frame, app: &mut App, area: Rect) {
    let border = app
        .themes
        .get_cached_color(&app.themes.theme().ui.document_border);
    let title_fg = app
        .themes
        .get_cached_color(&app.themes.theme().ui.document_title);
    let scrollbar_fg = app.themes.get_cached_color(&app.themes.theme().ui.scrollbar);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Decision {} ", app.decision.citation))
        .border_style(Style::default().fg(border))
        .title_style(Style::default().fg(title_fg).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.doc_area = inner;
    app.ensure_layout(inner.width);

    // Resolve any scroll request against this pass's handles; stale
    // targets simply drop
    if let Some(pending) = app.pending_scroll.take() {
        let line = match &pending {
            PendingScroll::SearchMatch(index) => {
                app.navigator.scroll_to_search_match(*index).copied()
            }
            PendingScroll::Highlight(id) => app.navigator.scroll_to_highlight(id).copied(),
        };
        if let Some(line) = line {
            app.center_on_line(line);
        }
    }
    app.clamp_scroll();

    let line_count = app.line_count();
    if let Some(layout) = app.layout_cache.get(app.revision, inner.width) {
        let view = DecisionView::new(layout).scroll_offset(app.scroll_offset);
        frame.render_widget(view, inner);
    }

    let overflow = line_count.saturating_sub(inner.height as usize);
    if overflow > 0 {
        let mut scrollbar_state = ScrollbarState::new(overflow).position(app.scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(scrollbar_fg)),
            area,
            &mut scrollbar_state,
        );
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let ui = &app.themes.theme().ui;
    let bg = app.themes.get_cached_color(&ui.footer_bg);
    let status_fg = app.themes.get_cached_color(&ui.status_bar_fg);
    let message_fg = app.themes.get_cached_color(&ui.status_message_fg);
    let help_fg = app.themes.get_cached_color(&ui.help_bar_fg);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let mut left = format!(
        " {} · {} pages · {} words",
        app.decision.citation, app.decision.metadata.page_count, app.decision.metadata.word_count
    );
    if app.store.highlight_mode() {
        left.push_str(" · HIGHLIGHT MODE");
    }
    if !app.search.query().is_empty() {
        match app.search.current_index() {
            Some(current) => {
                left.push_str(&format!(
                    " · {} of {} matches",
                    current + 1,
                    app.search.match_count()
                ));
            }
            None => left.push_str(" · no matches"),
        }
    }

    let mut spans = vec![Span::styled(left, Style::default().fg(status_fg))];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {status}"),
            Style::default().fg(message_fg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        rows[0],
    );

    let help = match app.mode {
        InputMode::View => {
            " q quit · / search · n/N match · h highlight · m note · a annotations · s save"
        }
        InputMode::Search => " type to search · Enter done · Esc close",
        InputMode::Note => " type the note · Enter add · Esc cancel",
        InputMode::Panel => " ↑/↓ select · Enter go to · d delete · Esc close",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().bg(bg).fg(help_fg)),
        rows[1],
    );
}

fn draw_input_bar(frame: &mut Frame, app: &App, title: &str, is_search: bool) {
    let area = frame.area();
    if area.height < 6 {
        return;
    }
    let rect = Rect {
        x: area.x + 1,
        y: area.y + area.height - 5,
        width: area.width.saturating_sub(2),
        height: 3,
    };

    let ui = &app.themes.theme().ui;
    let (border, text_fg, content) = if is_search {
        (
            app.themes.get_cached_color(&ui.search_border),
            app.themes.get_cached_color(&ui.search_input),
            &app.search_input,
        )
    } else {
        (
            app.themes.get_cached_color(&ui.panel_border),
            app.themes.get_cached_color(&ui.panel_item),
            &app.note_input,
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(Style::default().fg(border));
    let paragraph = Paragraph::new(format!("{content}█"))
        .style(Style::default().fg(text_fg))
        .block(block);

    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let mut excerpt: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        excerpt.push('…');
    }
    excerpt.replace('\n', " ")
}

fn draw_panel(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let width = (area.width / 3).max(24).min(area.width);
    let rect = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: area.height.saturating_sub(2),
    };

    let ui = &app.themes.theme().ui;
    let border = app.themes.get_cached_color(&ui.panel_border);
    let item_fg = app.themes.get_cached_color(&ui.panel_item);
    let selected_bg = app.themes.get_cached_color(&ui.panel_selected_bg);
    let selected_fg = app.themes.get_cached_color(&ui.panel_selected_fg);

    let mut items: Vec<ListItem> = Vec::new();
    for highlight in app.store.highlights() {
        items.push(ListItem::new(format!("▌ {}", excerpt(&highlight.text, 40))));
    }
    for note in app.store.notes() {
        items.push(ListItem::new(format!("✎ {}", excerpt(&note.text, 40))));
    }
    let empty = items.is_empty();
    if empty {
        items.push(ListItem::new("No annotations yet"));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Annotations ")
                .border_style(Style::default().fg(border)),
        )
        .style(Style::default().fg(item_fg))
        .highlight_style(Style::default().bg(selected_bg).fg(selected_fg));

    let mut state = ListState::default();
    if !empty {
        state.select(Some(app.panel_selected));
    }

    frame.render_widget(Clear, rect);
    frame.render_stateful_widget(list, rect, &mut state);
}
