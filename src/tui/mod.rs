// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Hosts a [`Navigator`] in a ratatui + crossterm shell: the package-grouped function list, the
//! diagram view, the info and links panels, and a footer with breadcrumb, fragment and toasts.

use std::{
    collections::{HashSet, VecDeque},
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::config::{DEFAULT_ENTRY_POINTS, DEFAULT_TOAST_SECONDS};
use crate::model::{Dataset, FunctionKey, PackageGroup};
use crate::nav::{
    fragment_link, Breadcrumb, CallRelations, Effect, FragmentChannel, InfoPanel, LabelLink,
    MemoryFragment, Navigator, Notice, Severity, Zoom,
};
use crate::render::{
    DiagramRenderer, FlowchartTextRenderer, RenderError, RenderJob, RenderOutcome, RenderWorker,
    RenderedDiagram,
};

const FOCUS_COLOR: Color = Color::LightGreen;
const INFO_COLOR: Color = Color::Gray;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "🅲 🅰 🅻 🅻 🅽 🅰 🆅 ";
const COMMENT_EXCERPT_CHARS: usize = 50;
const DETAIL_PANEL_HEIGHT: u16 = 12;
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shell settings resolved from the config file and the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiOptions {
    pub entry_points: Vec<String>,
    pub toast_duration: Duration,
    pub show_callers: bool,
    /// Raw fragment to open at startup, with or without the leading `#`.
    pub initial_fragment: String,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            entry_points: DEFAULT_ENTRY_POINTS.iter().map(|name| (*name).to_owned()).collect(),
            toast_duration: Duration::from_secs(DEFAULT_TOAST_SECONDS),
            show_callers: true,
            initial_fragment: String::new(),
        }
    }
}

/// Runs the interactive terminal UI until the user quits.
pub fn run(dataset: Arc<Dataset>, options: TuiOptions) -> Result<(), Box<dyn Error>> {
    let worker = RenderWorker::spawn(FlowchartTextRenderer)?;
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(dataset, options, RenderQueue::Worker(worker));
    app.start();

    while !app.should_quit {
        app.poll_renders();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(EVENT_POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    tracing::info!("tui closed");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    let direction = if stack_main_panes_vertically(main_area) {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_area);
    let content = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(DETAIL_PANEL_HEIGHT)])
        .split(panes[1]);
    let details = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(content[1]);

    render_function_list(frame, app, panes[0]);
    render_diagram(frame, app, content[0]);
    render_info(frame, app, details[0]);
    render_links(frame, app, details[1]);

    let toast_snapshot = app.toast.as_ref().map(|toast| toast.expires_at);
    if toast_snapshot.is_some_and(|expires_at| expires_at <= Instant::now()) {
        app.toast = None;
    }

    let compact = footer_uses_compact_mode(area);
    if let Some(input) = &app.fragment_prompt {
        let status = Paragraph::new(prompt_footer_line(app, input));
        frame.render_widget(status, status_area);
        set_prompt_cursor(frame, status_area, input);
    } else if app.search_mode == SearchMode::Editing {
        let status = Paragraph::new(search_footer_line(app));
        frame.render_widget(status, status_area);
        set_prompt_cursor(frame, status_area, app.navigator.search_query());
    } else {
        let status = Paragraph::new(footer_help_line(app, compact));
        frame.render_widget(status, status_area);
        let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
        frame.render_widget(brand, status_area);
    }

    if app.show_help {
        render_help(frame, app, main_area);
    }
}

fn set_prompt_cursor(frame: &mut Frame<'_>, status_area: Rect, input: &str) {
    let cursor_x = status_area
        .x
        .saturating_add(1)
        .saturating_add(input.chars().count() as u16)
        .min(status_area.x.saturating_add(status_area.width.saturating_sub(1)));
    frame.set_cursor_position((cursor_x, status_area.y));
}

// Panel, title, footer and help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    severity: Severity,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Inactive,
    Editing,
}

/// One row of the links panel.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LinkEntry {
    /// Diagram label wired by the last render; `index` addresses [`Navigator::links`].
    Diagram { index: usize, label: String, target: FunctionKey },
    Callee { expression: String, resolved: Option<FunctionKey> },
    Caller(FunctionKey),
}

impl LinkEntry {
    fn text(&self) -> String {
        match self {
            Self::Diagram { label, target, .. } => format!("↗ {label} → {target}"),
            Self::Callee { expression, resolved: Some(target) } => {
                format!("→ {expression} ({target})")
            }
            Self::Callee { expression, resolved: None } => format!("✗ {expression}"),
            Self::Caller(key) => format!("← {key}"),
        }
    }
}

/// Where render jobs go. The worker renders off-thread; inline renders on submit and is
/// drained by the same polling path.
#[derive(Debug)]
enum RenderQueue {
    Worker(RenderWorker),
    #[cfg_attr(not(test), allow(dead_code))]
    Inline { renderer: FlowchartTextRenderer, outcomes: VecDeque<RenderOutcome> },
}

impl RenderQueue {
    #[cfg_attr(not(test), allow(dead_code))]
    fn inline() -> Self {
        Self::Inline { renderer: FlowchartTextRenderer, outcomes: VecDeque::new() }
    }

    fn submit(&mut self, job: RenderJob) -> Result<(), RenderError> {
        match self {
            Self::Worker(worker) => worker.submit(job),
            Self::Inline { renderer, outcomes } => {
                let outcome = match renderer.render(&job.description) {
                    Ok(diagram) => RenderOutcome::Completed { ticket: job.ticket, diagram },
                    Err(error) => RenderOutcome::Failed { ticket: job.ticket, error },
                };
                outcomes.push_back(outcome);
                Ok(())
            }
        }
    }

    fn try_next(&mut self) -> Option<RenderOutcome> {
        match self {
            Self::Worker(worker) => worker.try_next(),
            Self::Inline { outcomes, .. } => outcomes.pop_front(),
        }
    }
}

struct App {
    navigator: Navigator<MemoryFragment>,
    renders: RenderQueue,
    entry_points: Vec<String>,
    toast_duration: Duration,
    show_callers: bool,
    focus: Focus,
    list_cursor: usize,
    list_state: ListState,
    diagram: Option<RenderedDiagram>,
    diagram_lines: Vec<String>,
    diagram_scroll: u16,
    diagram_viewport_height: u16,
    rendering: bool,
    render_error: Option<String>,
    info: Option<InfoPanel>,
    breadcrumb: Breadcrumb,
    active_item: Option<FunctionKey>,
    relations: CallRelations,
    label_links: Vec<LabelLink>,
    links: Vec<LinkEntry>,
    links_cursor: usize,
    links_state: ListState,
    search_mode: SearchMode,
    fragment_prompt: Option<String>,
    toast: Option<Toast>,
    show_help: bool,
    help_scroll: u16,
    should_quit: bool,
}

impl App {
    fn new(dataset: Arc<Dataset>, options: TuiOptions, renders: RenderQueue) -> Self {
        let navigator =
            Navigator::new(dataset, MemoryFragment::new(options.initial_fragment.as_str()));
        Self {
            navigator,
            renders,
            entry_points: options.entry_points,
            toast_duration: options.toast_duration,
            show_callers: options.show_callers,
            focus: Focus::Functions,
            list_cursor: 0,
            list_state: ListState::default(),
            diagram: None,
            diagram_lines: Vec::new(),
            diagram_scroll: 0,
            diagram_viewport_height: 0,
            rendering: false,
            render_error: None,
            info: None,
            breadcrumb: Breadcrumb::Welcome,
            active_item: None,
            relations: CallRelations::default(),
            label_links: Vec::new(),
            links: Vec::new(),
            links_cursor: 0,
            links_state: ListState::default(),
            search_mode: SearchMode::Inactive,
            fragment_prompt: None,
            toast: None,
            show_help: false,
            help_scroll: 0,
            should_quit: false,
        }
    }

    fn start(&mut self) {
        let opened = self.navigator.open_initial_fragment();
        tracing::info!(
            functions = self.navigator.dataset().len(),
            opened_fragment = opened,
            "tui started"
        );
        self.apply_effects();
    }

    fn apply_effects(&mut self) {
        loop {
            let effects = self.navigator.drain_effects();
            if effects.is_empty() {
                break;
            }
            for effect in effects {
                self.apply_effect(effect);
            }
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RenderRequested(request) => {
                self.diagram = None;
                self.diagram_lines.clear();
                self.diagram_scroll = 0;
                self.render_error = None;
                self.rendering = true;
                self.label_links.clear();
                self.links_cursor = 0;
                self.rebuild_links();

                let ticket = request.ticket.clone();
                if let Err(err) = self.renders.submit(request.into()) {
                    self.navigator.render_failed(&ticket, err.to_string());
                }
            }
            Effect::Rescale(_) => self.relayout_diagram(),
            Effect::InfoPanel(info) => self.info = Some(info),
            Effect::Breadcrumb(breadcrumb) => self.breadcrumb = breadcrumb,
            Effect::ActiveItem(key) => {
                if let Some(key) = &key {
                    if let Some(pos) = self.list_keys().iter().position(|listed| listed == key) {
                        self.list_cursor = pos;
                    }
                }
                self.active_item = key;
            }
            Effect::CallRelations(relations) => {
                self.relations = relations;
                self.rebuild_links();
            }
            Effect::LinksWired(links) => {
                self.label_links = links;
                self.rebuild_links();
            }
            Effect::RestoreScroll(offset) => {
                let offset = u16::try_from(offset).unwrap_or(u16::MAX);
                self.diagram_scroll = offset.min(self.max_diagram_scroll());
            }
            Effect::RenderFailed { message, .. } => {
                self.rendering = false;
                self.render_error = Some(message);
            }
            Effect::Notice(notice) => self.set_toast(notice),
            Effect::ShowWelcome => {
                self.diagram = None;
                self.diagram_lines.clear();
                self.diagram_scroll = 0;
                self.rendering = false;
                self.render_error = None;
                self.info = None;
                self.relations = CallRelations::default();
                self.label_links.clear();
                self.links_cursor = 0;
                self.rebuild_links();
            }
        }
    }

    fn poll_renders(&mut self) {
        while let Some(outcome) = self.renders.try_next() {
            match outcome {
                RenderOutcome::Completed { ticket, diagram } => {
                    if self.navigator.render_completed(&ticket, diagram.labels()) {
                        self.diagram_lines = diagram.layout(self.navigator.zoom());
                        self.diagram = Some(diagram);
                        self.rendering = false;
                    }
                }
                RenderOutcome::Failed { ticket, error } => {
                    self.navigator.render_failed(&ticket, error.to_string());
                }
            }
            self.apply_effects();
        }
    }

    fn relayout_diagram(&mut self) {
        if let Some(diagram) = &self.diagram {
            self.diagram_lines = diagram.layout(self.navigator.zoom());
        }
        self.diagram_scroll = self.diagram_scroll.min(self.max_diagram_scroll());
    }

    fn rebuild_links(&mut self) {
        let mut links = self
            .label_links
            .iter()
            .enumerate()
            .map(|(index, link)| LinkEntry::Diagram {
                index,
                label: link.label.clone(),
                target: link.target.clone(),
            })
            .collect::<Vec<_>>();
        links.extend(self.relations.callees.iter().map(|callee| LinkEntry::Callee {
            expression: callee.expression.clone(),
            resolved: callee.resolved.clone(),
        }));
        if self.show_callers {
            links.extend(self.relations.callers.iter().cloned().map(LinkEntry::Caller));
        }
        self.links = links;
        self.links_cursor = self.links_cursor.min(self.links.len().saturating_sub(1));
    }

    /// Packages with their records that pass the search query, in list order.
    fn visible_groups(&self) -> Vec<PackageGroup<'_>> {
        let visible = self.navigator.visible_keys().into_iter().collect::<HashSet<_>>();
        self.navigator
            .dataset()
            .packages()
            .into_iter()
            .filter_map(|mut group| {
                group.records.retain(|record| visible.contains(record.key()));
                (!group.records.is_empty()).then_some(group)
            })
            .collect()
    }

    fn list_keys(&self) -> Vec<FunctionKey> {
        self.visible_groups()
            .iter()
            .flat_map(|group| group.records.iter().map(|record| record.key().clone()))
            .collect()
    }

    fn max_diagram_scroll(&self) -> u16 {
        u16::try_from(self.diagram_lines.len().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => {
                    self.help_scroll = self.help_scroll.saturating_add(1);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1);
                }
                _ => {}
            }
            return false;
        }

        if self.fragment_prompt.is_some() {
            self.handle_fragment_prompt_key(code);
            self.apply_effects();
            return false;
        }

        if self.search_mode == SearchMode::Editing {
            self.handle_search_edit_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('/') => self.enter_search_mode(),
            KeyCode::Esc => self.clear_search(),
            KeyCode::Char('1') => self.focus = Focus::Functions,
            KeyCode::Char('2') => self.focus = Focus::Diagram,
            KeyCode::Char('3') => self.focus = Focus::Links,
            KeyCode::Tab => self.focus = self.focus.cycle(),
            KeyCode::BackTab => self.focus = self.focus.cycle_back(),
            KeyCode::Backspace => {
                let _ = self.navigator.back();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.navigator.zoom_in(),
            KeyCode::Char('-') => self.navigator.zoom_out(),
            KeyCode::Char('0') => self.navigator.reset_zoom(),
            KeyCode::Char('h') => self.navigator.clear(),
            KeyCode::Char('m') => {
                let _ = self.navigator.select_entry_point(&self.entry_points);
            }
            KeyCode::Char('#') => {
                self.fragment_prompt = Some(self.navigator.location().channel().read());
            }
            KeyCode::Char('y') => self.yank_fragment(),
            _ => match self.focus {
                Focus::Functions => self.handle_functions_key(code),
                Focus::Diagram => self.handle_diagram_key(code),
                Focus::Links => self.handle_links_key(code),
            },
        }

        self.apply_effects();
        false
    }

    fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    fn enter_search_mode(&mut self) {
        self.search_mode = SearchMode::Editing;
        self.focus = Focus::Functions;
    }

    fn handle_search_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.clear_search(),
            KeyCode::Enter => self.search_mode = SearchMode::Inactive,
            KeyCode::Backspace => {
                let mut query = self.navigator.search_query().to_owned();
                query.pop();
                self.update_search(query);
            }
            KeyCode::Char(ch) => {
                let mut query = self.navigator.search_query().to_owned();
                query.push(ch);
                self.update_search(query);
            }
            _ => {}
        }
    }

    fn clear_search(&mut self) {
        self.search_mode = SearchMode::Inactive;
        if !self.navigator.search_query().is_empty() {
            self.update_search(String::new());
        }
    }

    fn update_search(&mut self, query: String) {
        self.navigator.search(query);
        let keys = self.list_keys();
        self.list_cursor = self
            .active_item
            .as_ref()
            .and_then(|active| keys.iter().position(|key| key == active))
            .unwrap_or(0);
    }

    fn handle_fragment_prompt_key(&mut self, code: KeyCode) {
        let Some(input) = self.fragment_prompt.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.fragment_prompt = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) => input.push(ch),
            KeyCode::Enter => {
                let raw = std::mem::take(input);
                self.fragment_prompt = None;
                self.navigator.location_mut().channel_mut().set_external(&raw);
                self.navigator.fragment_changed();
            }
            _ => {}
        }
    }

    fn handle_functions_key(&mut self, code: KeyCode) {
        let len = self.list_keys().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_cursor = self.list_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list_cursor = (self.list_cursor + 1).min(len.saturating_sub(1));
            }
            KeyCode::Home | KeyCode::Char('g') => self.list_cursor = 0,
            KeyCode::End | KeyCode::Char('G') => self.list_cursor = len.saturating_sub(1),
            KeyCode::Enter => self.open_selected_function(),
            _ => {}
        }
    }

    fn open_selected_function(&mut self) {
        let Some(key) = self.list_keys().get(self.list_cursor).cloned() else {
            self.set_toast(Notice::new("No function matches the search", Severity::Info));
            return;
        };
        let _ = self.navigator.select(key.as_str(), true);
    }

    fn handle_diagram_key(&mut self, code: KeyCode) {
        let page = i32::from(self.diagram_viewport_height.max(2) - 1);
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_diagram(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_diagram(1),
            KeyCode::PageUp => self.scroll_diagram(-page),
            KeyCode::PageDown => self.scroll_diagram(page),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_diagram(i32::MIN),
            KeyCode::End | KeyCode::Char('G') => self.scroll_diagram(i32::MAX),
            KeyCode::Enter => {
                self.focus = Focus::Links;
            }
            _ => {}
        }
    }

    fn scroll_diagram(&mut self, delta: i32) {
        let max = i32::from(self.max_diagram_scroll());
        let next = i32::from(self.diagram_scroll).saturating_add(delta).clamp(0, max);
        self.diagram_scroll = u16::try_from(next).unwrap_or(0);
        self.navigator.set_scroll_offset(u32::from(self.diagram_scroll));
    }

    fn handle_links_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.links_cursor = self.links_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.links_cursor = (self.links_cursor + 1).min(self.links.len().saturating_sub(1));
            }
            KeyCode::Enter => self.follow_selected_link(),
            _ => {}
        }
    }

    fn follow_selected_link(&mut self) {
        let Some(entry) = self.links.get(self.links_cursor).cloned() else {
            self.set_toast(Notice::new("No link selected", Severity::Info));
            return;
        };
        let _ = match entry {
            LinkEntry::Diagram { index, .. } => self.navigator.activate_link(index),
            LinkEntry::Callee { expression, .. } => self.navigator.follow_call(&expression),
            LinkEntry::Caller(key) => self.navigator.select(key.as_str(), true),
        };
    }

    fn set_toast(&mut self, notice: Notice) {
        self.toast = Some(Toast {
            message: notice.message,
            severity: notice.severity,
            expires_at: Instant::now() + self.toast_duration,
        });
    }

    fn yank_fragment(&mut self) {
        let Some(key) = self.navigator.current() else {
            self.set_toast(Notice::new("No function selected", Severity::Info));
            return;
        };

        let link = fragment_link(key);
        match copy_to_clipboard(&link) {
            Ok(backend) => {
                let message = format!("Yanked {link} ({backend})");
                self.set_toast(Notice::new(message, Severity::Success));
            }
            Err(err) => {
                self.set_toast(Notice::new(format!("Clipboard error: {err}"), Severity::Error));
            }
        }
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crossterm::event::KeyCode;
    use ratatui::{backend::TestBackend, Terminal};

    use super::{draw, App, Focus, RenderQueue, TuiOptions};
    use crate::model::Dataset;
    use crate::nav::{FragmentChannel, Severity};

    pub(crate) struct HeadlessTui {
        app: App,
    }

    impl HeadlessTui {
        pub(crate) fn new(dataset: Dataset, options: TuiOptions) -> Self {
            let mut app = App::new(Arc::new(dataset), options, RenderQueue::inline());
            app.start();
            app.poll_renders();
            Self { app }
        }

        /// Handles one key and then drains finished renders, like one frame of the event loop.
        pub(crate) fn press(&mut self, code: KeyCode) -> bool {
            let quit = self.app.handle_key_code(code);
            self.app.poll_renders();
            quit
        }

        /// Handles one key without draining renders.
        pub(crate) fn press_only(&mut self, code: KeyCode) -> bool {
            self.app.handle_key_code(code)
        }

        pub(crate) fn poll_renders(&mut self) {
            self.app.poll_renders();
        }

        pub(crate) fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        pub(crate) fn focus(&self) -> Focus {
            self.app.focus
        }

        pub(crate) fn zoom_percent(&self) -> u32 {
            self.app.navigator.zoom().percent()
        }

        pub(crate) fn breadcrumb(&self) -> String {
            self.app.breadcrumb.to_string()
        }

        pub(crate) fn diagram_lines(&self) -> &[String] {
            &self.app.diagram_lines
        }

        pub(crate) fn render_error(&self) -> Option<&str> {
            self.app.render_error.as_deref()
        }

        pub(crate) fn diagram_scroll(&self) -> u16 {
            self.app.diagram_scroll
        }

        pub(crate) fn current(&self) -> Option<String> {
            self.app.navigator.current().map(ToString::to_string)
        }

        pub(crate) fn fragment(&self) -> String {
            self.app.navigator.location().channel().read()
        }

        pub(crate) fn history_depth(&self) -> usize {
            self.app.navigator.history().len()
        }

        pub(crate) fn toast(&self) -> Option<(String, Severity)> {
            self.app.toast.as_ref().map(|toast| (toast.message.clone(), toast.severity))
        }

        pub(crate) fn list_keys(&self) -> Vec<String> {
            self.app.list_keys().iter().map(ToString::to_string).collect()
        }

        pub(crate) fn link_texts(&self) -> Vec<String> {
            self.app.links.iter().map(super::LinkEntry::text).collect()
        }

        pub(crate) fn screen(&mut self, width: u16, height: u16) -> Vec<String> {
            let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
            terminal.draw(|frame| draw(frame, &mut self.app)).expect("draw");
            let buffer = terminal.backend().buffer();
            buffer
                .content()
                .chunks(usize::from(width))
                .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
                .collect()
        }
    }
}
