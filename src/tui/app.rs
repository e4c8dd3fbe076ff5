use crate::config::Config;
use crate::data::{
    AppState, CurrentSprintIssues, CurrentSprintStats, FilterField, IssueDetails, IssuesPanel,
    SortColumn, SortState,
};
use crate::format::browse_url;
use crate::graph::{GraphRenderer, GraphView, HtmlGraphRenderer};
use crate::integrations::{loader, ApiClient, LoadEvent};
use crate::util::open_url;
use crate::view::tables::NO_SEO_TASKS;
use crate::view::Counters;
use anyhow::Result;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::TableState;
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Braille spinner frames for loading animation
pub const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub const LOAD_FAILED: &str = "Ошибка загрузки данных. Проверьте подключение к серверу.";
pub const GRAPH_FAILED: &str = "Ошибка загрузки графа связей";
pub const SEO_FAILED: &str = "Ошибка загрузки SEO задач";

const PAGE_SIZE: isize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Issues,
    Sprints,
    SprintLoad,
    Links,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Issues, Tab::Sprints, Tab::SprintLoad, Tab::Links];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Issues => "Задачи",
            Tab::Sprints => "Спринты",
            Tab::SprintLoad => "Загруженность",
            Tab::Links => "Связи",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Default)]
pub enum DetailsState {
    #[default]
    Loading,
    Loaded(IssueDetails),
    Failed(String),
}

/// Active modal state - only one modal can be active at a time
#[derive(Debug, Default)]
pub enum ModalState {
    #[default]
    None,
    Help,
    /// `field` indexes `FilterField::ALL`
    FilterMenu { field: usize },
    Alert(String),
    IssueDetails {
        issue_key: String,
        details: DetailsState,
        scroll: u16,
    },
}

impl ModalState {
    pub fn is_none(&self) -> bool {
        matches!(self, ModalState::None)
    }
}

#[derive(Debug, Default)]
pub enum SprintIssuesState {
    #[default]
    NotLoaded,
    Loading,
    Loaded(CurrentSprintIssues),
    Failed,
}

/// Screen regions recorded while drawing, used for mouse hit-testing.
#[derive(Debug, Default)]
pub struct HitAreas {
    pub tabs: RefCell<Vec<(Rect, Tab)>>,
    pub headers: RefCell<Vec<(Rect, SortColumn)>>,
    /// Body of the issues table (rows only)
    pub issue_rows: Cell<Option<Rect>>,
    /// Body of the graph node list
    pub graph_nodes: Cell<Option<Rect>>,
}

impl HitAreas {
    pub fn clear(&self) {
        self.tabs.borrow_mut().clear();
        self.headers.borrow_mut().clear();
        self.issue_rows.set(None);
        self.graph_nodes.set(None);
    }
}

pub struct App {
    pub config: Arc<Config>,
    pub api: ApiClient,
    pub state: AppState,
    pub tab: Tab,
    pub modal: ModalState,

    // Issues tab
    pub selected: usize,
    pub issues_table: RefCell<TableState>,

    /// Scroll offset of the Sprints and Sprint load tabs
    pub scroll: u16,

    pub counters: Counters,
    pub sprint_stats: Option<CurrentSprintStats>,
    pub sprint_issues: SprintIssuesState,
    pub graph: GraphView,

    // UI state
    pub error_message: Option<String>,
    pub spinner_frame: usize,
    pub hover: Option<(u16, u16)>,
    pub hits: HitAreas,

    pending_loads: usize,
    load_tx: mpsc::Sender<LoadEvent>,
    load_rx: Option<mpsc::Receiver<LoadEvent>>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let renderer = HtmlGraphRenderer::new(config.graph_output_dir()?, &config.tracker.browse_url);
        Ok(Self::with_renderer(config, Box::new(renderer)))
    }

    pub fn with_renderer(config: Config, renderer: Box<dyn GraphRenderer>) -> Self {
        let (load_tx, load_rx) = mpsc::channel(64);
        let graph = GraphView::new(renderer, config.graph.physics);
        Self {
            api: ApiClient::new(&config.server.base_url),
            config: Arc::new(config),
            state: AppState::default(),
            tab: Tab::Issues,
            modal: ModalState::None,
            selected: 0,
            issues_table: RefCell::new(TableState::default()),
            scroll: 0,
            counters: Counters::default(),
            sprint_stats: None,
            sprint_issues: SprintIssuesState::NotLoaded,
            graph,
            error_message: None,
            spinner_frame: 0,
            hover: None,
            hits: HitAreas::default(),
            pending_loads: 0,
            load_tx,
            load_rx: Some(load_rx),
        }
    }

    pub fn show_help(&self) -> bool {
        matches!(self.modal, ModalState::Help)
    }

    pub fn show_filter_menu(&self) -> bool {
        matches!(self.modal, ModalState::FilterMenu { .. })
    }

    pub fn filter_menu_field(&self) -> Option<FilterField> {
        match self.modal {
            ModalState::FilterMenu { field } => FilterField::ALL.get(field).copied(),
            _ => None,
        }
    }

    pub fn show_issue_details(&self) -> bool {
        matches!(self.modal, ModalState::IssueDetails { .. })
    }

    pub fn show_alert(&self) -> bool {
        matches!(self.modal, ModalState::Alert(_))
    }

    /// Process a message and update app state (Elm Architecture update function).
    ///
    /// Returns `Ok(true)` if the app should quit, `Ok(false)` to continue.
    pub fn update(&mut self, msg: super::Message) -> Result<bool> {
        use super::Message;
        match msg {
            // ─────────────────────────────────────────────────────────────────
            // App lifecycle
            // ─────────────────────────────────────────────────────────────────
            Message::Quit => return Ok(true),
            Message::Refresh => self.start_loading(),

            // ─────────────────────────────────────────────────────────────────
            // Tabs
            // ─────────────────────────────────────────────────────────────────
            Message::NextTab => self.select_tab(self.tab.next()),
            Message::PrevTab => self.select_tab(self.tab.prev()),
            Message::SelectTab(tab) => self.select_tab(tab),

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Message::MoveUp => self.move_selection(-1),
            Message::MoveDown => self.move_selection(1),
            Message::PageUp => self.move_selection(-PAGE_SIZE),
            Message::PageDown => self.move_selection(PAGE_SIZE),
            Message::GotoTop => self.move_selection(isize::MIN / 2),
            Message::GotoBottom => self.move_selection(isize::MAX / 2),

            // ─────────────────────────────────────────────────────────────────
            // Selection actions
            // ─────────────────────────────────────────────────────────────────
            Message::OpenSelected => self.open_selected(),
            Message::ShowIssueDetails => self.show_selected_details(),
            Message::ShowSeoTasks => {
                self.pending_loads += 1;
                loader::spawn_seo_tasks(self.api.clone(), self.load_tx.clone());
            }

            // ─────────────────────────────────────────────────────────────────
            // Search mode
            // ─────────────────────────────────────────────────────────────────
            Message::EnterSearch => self.state.search_mode = true,
            Message::ExitSearch => {
                self.state.search_mode = false;
                self.state.search_query.clear();
                self.issues_changed();
            }
            Message::ConfirmSearch => self.state.search_mode = false,
            Message::SearchInput(c) => {
                self.state.search_query.push(c);
                self.issues_changed();
            }
            Message::SearchBackspace => {
                self.state.search_query.pop();
                self.issues_changed();
            }

            // ─────────────────────────────────────────────────────────────────
            // Sorting and filters
            // ─────────────────────────────────────────────────────────────────
            Message::SortBy(column) => {
                self.state.sort.select(column);
                self.issues_changed();
            }
            Message::ToggleFilterMenu => {
                self.modal = if self.show_filter_menu() {
                    ModalState::None
                } else {
                    ModalState::FilterMenu { field: 0 }
                };
            }
            Message::FilterMenuUp => self.move_filter_focus(-1),
            Message::FilterMenuDown => self.move_filter_focus(1),
            Message::CycleFilter { forward } => self.cycle_filter(forward),
            Message::ClearFilters => self.clear_filters(),

            // ─────────────────────────────────────────────────────────────────
            // Link graph
            // ─────────────────────────────────────────────────────────────────
            Message::TogglePhysics => {
                if let Err(e) = self.graph.toggle_physics() {
                    self.report_error("Не удалось переключить физику", e);
                }
            }
            Message::FitGraph => {
                if let Err(e) = self.graph.fit() {
                    self.report_error("Не удалось подогнать граф", e);
                }
            }
            Message::OpenGraphPage => self.open_graph_page(),

            // ─────────────────────────────────────────────────────────────────
            // Mouse
            // ─────────────────────────────────────────────────────────────────
            Message::MouseMoved { column, row } => self.hover = Some((column, row)),
            Message::MouseClick { column, row } => self.click(column, row),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Message::ToggleHelp => {
                self.modal = if self.show_help() {
                    ModalState::None
                } else {
                    ModalState::Help
                };
            }
            Message::CloseModal => self.modal = ModalState::None,

            Message::None => {}
        }
        Ok(false)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }

    /// Initial load and manual refresh.
    pub fn start_loading(&mut self) {
        self.pending_loads += 1;
        loader::spawn_dashboard_load(self.api.clone(), self.load_tx.clone());
    }

    fn finish_load(&mut self) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
    }

    /// Apply every load result that has arrived (non-blocking, call from the event loop tick)
    pub fn poll_loads(&mut self) -> bool {
        // Take ownership of the receiver to avoid borrow issues
        let Some(mut rx) = self.load_rx.take() else {
            return false;
        };

        let mut changed = false;
        while let Ok(event) = rx.try_recv() {
            self.handle_load_event(event);
            changed = true;
        }

        self.load_rx = Some(rx);
        changed
    }

    pub fn handle_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Statistics(stats) => {
                self.counters = Counters::from_statistics(&stats);
                self.state.statistics = Some(stats);
            }
            LoadEvent::Issues(issues) => {
                self.state.set_issues(issues);
                self.clamp_selection();
                self.error_message = None;
            }
            LoadEvent::LoadFailed(e) => {
                self.finish_load();
                self.error_message = Some(format!("{:#}", e));
                self.modal = ModalState::Alert(LOAD_FAILED.to_string());
            }
            LoadEvent::SprintStats(result) => {
                self.finish_load();
                match result {
                    Ok(stats) => {
                        if matches!(stats, CurrentSprintStats::Available(_)) {
                            self.sprint_issues = SprintIssuesState::Loading;
                            self.pending_loads += 1;
                            loader::spawn_sprint_issues(self.api.clone(), self.load_tx.clone());
                        } else {
                            self.sprint_issues = SprintIssuesState::NotLoaded;
                        }
                        self.sprint_stats = Some(stats);
                    }
                    Err(e) => tracing::error!("Failed to load sprint stats: {:#}", e),
                }
            }
            LoadEvent::SprintIssues(result) => {
                self.finish_load();
                self.sprint_issues = match result {
                    Ok(issues) => SprintIssuesState::Loaded(issues),
                    Err(e) => {
                        tracing::error!("Failed to load sprint issues: {:#}", e);
                        SprintIssuesState::Failed
                    }
                };
            }
            LoadEvent::Graph(result) => {
                self.finish_load();
                match result {
                    Ok(data) => {
                        if let Err(e) = self.graph.show(&data) {
                            tracing::error!("Failed to render link graph: {:#}", e);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to load link graph: {:#}", e);
                        self.graph.fail(GRAPH_FAILED);
                    }
                }
            }
            LoadEvent::SeoTasks(result) => {
                self.finish_load();
                match result {
                    Ok(tasks) if tasks.is_empty() => {
                        self.modal = ModalState::Alert(NO_SEO_TASKS.to_string());
                    }
                    Ok(tasks) => {
                        tracing::info!("Showing {} SEO tasks", tasks.len());
                        self.state.panel = IssuesPanel::SeoTasks(tasks);
                        self.tab = Tab::Issues;
                        self.selected = 0;
                        self.issues_table.borrow_mut().select(Some(0));
                    }
                    Err(e) => {
                        tracing::error!("Failed to load SEO tasks: {:#}", e);
                        self.modal = ModalState::Alert(SEO_FAILED.to_string());
                    }
                }
            }
            LoadEvent::IssueDetails { issue_key, result } => {
                self.finish_load();
                // Ignore results for a modal that has since been closed or replaced
                if let ModalState::IssueDetails {
                    issue_key: open_key,
                    details,
                    ..
                } = &mut self.modal
                {
                    if *open_key == issue_key {
                        *details = match result {
                            Ok(d) => DetailsState::Loaded(d),
                            Err(e) => DetailsState::Failed(format!("{:#}", e)),
                        };
                    }
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs and navigation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.scroll = 0;
        match tab {
            // Sprint stats are re-fetched on every activation
            Tab::SprintLoad => {
                self.pending_loads += 1;
                loader::spawn_sprint_stats(self.api.clone(), self.load_tx.clone());
            }
            Tab::Links if self.graph.needs_load() => {
                self.graph.mark_loading();
                self.pending_loads += 1;
                loader::spawn_graph(self.api.clone(), self.load_tx.clone());
            }
            _ => {}
        }
    }

    /// Rows in the issues panel: the filtered issues or the SEO tasks.
    pub fn issue_row_count(&self) -> usize {
        match &self.state.panel {
            IssuesPanel::Issues => self.state.visible_issues().len(),
            IssuesPanel::SeoTasks(tasks) => tasks.len(),
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        if let ModalState::IssueDetails { scroll, .. } = &mut self.modal {
            *scroll = (*scroll as isize).saturating_add(delta).clamp(0, u16::MAX as isize) as u16;
            return;
        }
        match self.tab {
            Tab::Issues => {
                let len = self.issue_row_count();
                if len == 0 {
                    return;
                }
                let max = len as isize - 1;
                self.selected = (self.selected as isize).saturating_add(delta).clamp(0, max) as usize;
                self.issues_table.borrow_mut().select(Some(self.selected));
            }
            Tab::Links => {
                self.graph.move_selection(delta);
                let height = self.hits.graph_nodes.get().map_or(1, |r| r.height as usize);
                self.graph.keep_selection_visible(height);
            }
            Tab::Sprints | Tab::SprintLoad => {
                let next = (self.scroll as isize).saturating_add(delta);
                self.scroll = next.clamp(0, u16::MAX as isize) as u16;
            }
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.issue_row_count();
        self.selected = self.selected.min(len.saturating_sub(1));
        self.issues_table.borrow_mut().select(Some(self.selected));
    }

    /// Any filter, sort or search interaction re-renders the issues table,
    /// replacing a SEO task listing.
    fn issues_changed(&mut self) {
        self.state.panel = IssuesPanel::Issues;
        self.selected = 0;
        let mut table = self.issues_table.borrow_mut();
        table.select(Some(0));
        *table.offset_mut() = 0;
    }

    pub fn selected_issue_key(&self) -> Option<String> {
        match self.tab {
            Tab::Issues => match &self.state.panel {
                IssuesPanel::Issues => self
                    .state
                    .visible_issues()
                    .get(self.selected)
                    .map(|i| i.issue_key.clone()),
                IssuesPanel::SeoTasks(tasks) => tasks.get(self.selected).map(|t| t.issue_key.clone()),
            },
            Tab::Links => self.graph.selected_node().map(|n| n.issue_key.clone()),
            Tab::Sprints | Tab::SprintLoad => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filters
    // ─────────────────────────────────────────────────────────────────────────

    fn move_filter_focus(&mut self, delta: isize) {
        if let ModalState::FilterMenu { field } = &mut self.modal {
            let max = FilterField::ALL.len() as isize - 1;
            *field = (*field as isize + delta).clamp(0, max) as usize;
        }
    }

    /// Step the focused filter through "all" followed by each option.
    fn cycle_filter(&mut self, forward: bool) {
        let Some(field) = self.filter_menu_field() else {
            return;
        };
        let options = self.state.filter_options();
        let values = options.values(field);

        // Position 0 is "all"; option i sits at i + 1
        let current = self
            .state
            .filters
            .get(field)
            .and_then(|v| values.iter().position(|o| o == v))
            .map_or(0, |i| i + 1);
        let slots = values.len() + 1;
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };

        let value = next.checked_sub(1).and_then(|i| values.get(i)).cloned();
        self.state.filters.set(field, value);
        self.issues_changed();
    }

    /// Reset filters, search and sorting to their initial state.
    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.state.search_query.clear();
        self.state.sort = SortState::default();
        self.issues_changed();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Links
    // ─────────────────────────────────────────────────────────────────────────

    fn report_error(&mut self, what: &str, e: anyhow::Error) {
        tracing::warn!("{}: {:#}", what, e);
        self.error_message = Some(format!("{}: {:#}", what, e));
    }

    pub fn open_issue(&mut self, issue_key: &str) {
        let url = browse_url(&self.config.tracker.browse_url, issue_key);
        if let Err(e) = open_url(&url) {
            self.report_error("Не удалось открыть ссылку", e);
        }
    }

    fn open_selected(&mut self) {
        let key = match &self.modal {
            ModalState::IssueDetails { issue_key, .. } => Some(issue_key.clone()),
            _ => self.selected_issue_key(),
        };
        if let Some(key) = key {
            self.open_issue(&key);
        }
    }

    fn show_selected_details(&mut self) {
        let Some(issue_key) = self.selected_issue_key() else {
            return;
        };
        self.modal = ModalState::IssueDetails {
            issue_key: issue_key.clone(),
            details: DetailsState::Loading,
            scroll: 0,
        };
        self.pending_loads += 1;
        loader::spawn_issue_details(self.api.clone(), self.load_tx.clone(), issue_key);
    }

    fn open_graph_page(&mut self) {
        let Some(path) = self.graph.handle().and_then(|h| h.location.clone()) else {
            return;
        };
        if let Err(e) = open_url(&path.to_string_lossy()) {
            self.report_error("Не удалось открыть граф", e);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mouse
    // ─────────────────────────────────────────────────────────────────────────

    /// Index of the graph node under the mouse pointer.
    pub fn hovered_node(&self) -> Option<usize> {
        if self.tab != Tab::Links {
            return None;
        }
        let (column, row) = self.hover?;
        let area = self.hits.graph_nodes.get()?;
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        let index = self.graph.scroll + (row - area.y) as usize;
        (index < self.graph.nodes().len()).then_some(index)
    }

    fn click(&mut self, column: u16, row: u16) {
        let pos = Position::new(column, row);

        if !self.modal.is_none() {
            self.modal = ModalState::None;
            return;
        }

        let tab = self
            .hits
            .tabs
            .borrow()
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, tab)| *tab);
        if let Some(tab) = tab {
            self.select_tab(tab);
            return;
        }

        match self.tab {
            Tab::Issues => {
                let header = self
                    .hits
                    .headers
                    .borrow()
                    .iter()
                    .find(|(rect, _)| rect.contains(pos))
                    .map(|(_, column)| *column);
                if let Some(column) = header {
                    self.state.sort.select(column);
                    self.issues_changed();
                    return;
                }

                let Some(body) = self.hits.issue_rows.get() else {
                    return;
                };
                if !body.contains(pos) {
                    return;
                }
                let offset = self.issues_table.borrow().offset();
                let index = offset + (row - body.y) as usize;
                if index >= self.issue_row_count() {
                    return;
                }
                // A second click on the selected row opens it
                if index == self.selected {
                    self.open_selected();
                } else {
                    self.selected = index;
                    self.issues_table.borrow_mut().select(Some(index));
                }
            }
            Tab::Links => {
                self.hover = Some((column, row));
                if let Some(index) = self.hovered_node() {
                    self.graph.select(index);
                    self.open_selected();
                }
            }
            Tab::Sprints | Tab::SprintLoad => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Spinner
    // ─────────────────────────────────────────────────────────────────────────

    /// Advance spinner frame (call on tick while loading)
    pub fn tick_spinner(&mut self) {
        if self.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }
}
