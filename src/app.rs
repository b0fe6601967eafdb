//! Main application state.
//!
//! This module implements The Elm Architecture (TEA) pattern: `update`
//! folds input events and backend messages into the model, `view` renders
//! it. Backend calls are never made here; they are queued as
//! [`PendingRequest`]s that the main loop hands to the task spawner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::api::types::{SimulationOption, SimulationRequest};
use crate::config::Config;
use crate::error::AppError;
use crate::events::{Event, GlobalKey};
use crate::form::{self, money, FormDefaults, FormValues};
use crate::tasks::ApiMessage;
use crate::ui::components::{
    render_hints, Activity, LookupRequest, MultiSelect, PickerAction, SelectItem, TextInput,
};
use crate::ui::{
    theme, LoadingIndicator, Notification, NotificationManager, PointerRouter, ResultView,
    TickerPicker,
};

/// The form fields, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    StartDate,
    EndDate,
    InitialInvestment,
    MonthlyInvestment,
    Tickers,
    Simulations,
    Run,
}

impl FormField {
    /// Every field in focus order.
    pub const ALL: [FormField; 7] = [
        FormField::StartDate,
        FormField::EndDate,
        FormField::InitialInvestment,
        FormField::MonthlyInvestment,
        FormField::Tickers,
        FormField::Simulations,
        FormField::Run,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|&f| f == self).unwrap_or(0)
    }

    /// The next field, wrapping to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The previous field, wrapping to the last.
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Title shown on the field.
    pub fn label(self) -> &'static str {
        match self {
            FormField::StartDate => "Start date",
            FormField::EndDate => "End date",
            FormField::InitialInvestment => "Initial investment",
            FormField::MonthlyInvestment => "Monthly investment",
            FormField::Tickers => "Tickers",
            FormField::Simulations => "Simulations",
            FormField::Run => "Run",
        }
    }

    /// Whether the field holds a money amount.
    pub fn is_amount(self) -> bool {
        matches!(
            self,
            FormField::InitialInvestment | FormField::MonthlyInvestment
        )
    }

    fn hints(self) -> &'static str {
        match self {
            FormField::Tickers => {
                "[↑/↓] choose  [Enter] add  [Backspace] remove last  [Tab] next  [Ctrl+R] run  [Ctrl+Q] quit"
            }
            FormField::Simulations => {
                "[↑/↓] move  [Space] toggle  [Ctrl+A] all  [Tab] next  [Ctrl+R] run  [Ctrl+Q] quit"
            }
            FormField::Run => "[Enter] run  [Ctrl+L] clear cache  [Ctrl+D] delete data cache  [Ctrl+Q] quit",
            _ => "[Tab] next  [Shift+Tab] previous  [Ctrl+R] run  [Ctrl+L] clear cache  [Ctrl+Q] quit",
        }
    }
}

/// A backend call the main loop should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    Lookup(LookupRequest),
    FetchSimulations,
    Simulate(SimulationRequest),
    ClearCache,
    DeleteDataCache,
}

/// The main application struct that holds all state.
pub struct App {
    /// Whether the application should quit.
    should_quit: bool,
    /// The focused field.
    focus: FormField,
    start_date: TextInput,
    end_date: TextInput,
    initial_investment: TextInput,
    monthly_investment: TextInput,
    /// Routes pointer presses to click-away listeners.
    router: PointerRouter,
    /// The ticker field.
    tickers: TickerPicker,
    /// The simulation checklist.
    simulations: MultiSelect,
    /// The last simulation result.
    result: ResultView,
    /// Notification manager for toast messages.
    notifications: NotificationManager,
    /// Shown while simulate or cache calls are in flight.
    loading: LoadingIndicator,
    /// Simulate calls in flight.
    simulations_running: usize,
    /// Calls waiting to be spawned.
    pending: Vec<PendingRequest>,
    /// Field areas from the last render, for click-to-focus.
    field_areas: Vec<(FormField, Rect)>,
    /// Application configuration.
    config: Config,
}

impl App {
    /// Create the application with today's defaults.
    pub fn new(config: Config) -> Self {
        let defaults = FormDefaults::for_today(&config.form);
        Self::with_defaults(config, defaults)
    }

    /// Create the application with explicit initial form values.
    ///
    /// The simulation catalogue fetch is queued immediately.
    pub fn with_defaults(config: Config, defaults: FormDefaults) -> Self {
        debug!(?defaults, "Creating application");

        let router = PointerRouter::new();
        let tickers = TickerPicker::new(&router, &config.search, &defaults.tickers);

        let mut simulations = MultiSelect::new("Simulations");
        simulations.set_empty_message("Loading simulations...");

        Self {
            should_quit: false,
            focus: FormField::default(),
            start_date: TextInput::with_value(defaults.start_date),
            end_date: TextInput::with_value(defaults.end_date),
            initial_investment: TextInput::with_value(defaults.initial_investment),
            monthly_investment: TextInput::with_value(defaults.monthly_investment),
            router,
            tickers,
            simulations,
            result: ResultView::new(),
            notifications: NotificationManager::new(),
            loading: LoadingIndicator::new(),
            simulations_running: 0,
            pending: vec![PendingRequest::FetchSimulations],
            field_areas: Vec::new(),
            config,
        }
    }

    /// Whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The focused field.
    pub fn focus(&self) -> FormField {
        self.focus
    }

    /// The application configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The ticker field.
    pub fn tickers(&self) -> &TickerPicker {
        &self.tickers
    }

    /// The simulation checklist.
    pub fn simulations(&self) -> &MultiSelect {
        &self.simulations
    }

    /// The result panel.
    pub fn result(&self) -> &ResultView {
        &self.result
    }

    /// Toast notifications.
    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    /// The loading indicator.
    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// The pointer router; exposed so tests can inspect registrations.
    pub fn router(&self) -> &PointerRouter {
        &self.router
    }

    /// Current text of a free-text field.
    pub fn field_value(&self, field: FormField) -> Option<&str> {
        self.text_input(field).map(TextInput::value)
    }

    /// Take every queued backend call.
    pub fn take_pending(&mut self) -> Vec<PendingRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Queue a call, starting the loading indicator where it applies.
    fn request(&mut self, request: PendingRequest) {
        match &request {
            PendingRequest::Simulate(_) => {
                self.simulations_running += 1;
                self.loading.begin(Activity::Simulation);
            }
            PendingRequest::ClearCache => self.loading.begin(Activity::ClearCache),
            PendingRequest::DeleteDataCache => self.loading.begin(Activity::DeleteDataCache),
            PendingRequest::Lookup(_) | PendingRequest::FetchSimulations => {}
        }
        self.pending.push(request);
    }

    /// Show an error in the notification area.
    pub fn handle_error(&mut self, error: &AppError) {
        warn!(error = %error, "Application error");
        self.notifications.push(Notification::from_error(error));
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Quit => {
                info!("Quit event received");
                self.should_quit = true;
            }
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event);
            }
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => self.handle_tick(),
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if let Some(global) = GlobalKey::from_key_event(&key_event) {
            match global {
                GlobalKey::Quit => self.should_quit = true,
                GlobalKey::RunSimulation => self.submit(),
                GlobalKey::ClearCache => self.request(PendingRequest::ClearCache),
                GlobalKey::DeleteDataCache => self.request(PendingRequest::DeleteDataCache),
                GlobalKey::NextField => self.set_focus(self.focus.next()),
                GlobalKey::PreviousField => self.set_focus(self.focus.previous()),
            }
            return;
        }

        match self.focus {
            FormField::Tickers => {
                if let Some(action) = self.tickers.handle_input(key_event) {
                    self.handle_picker_action(action);
                }
            }
            FormField::Simulations => {
                self.simulations.handle_input(key_event);
            }
            FormField::Run => {
                if key_event.code == KeyCode::Enter {
                    self.submit();
                }
            }
            field => {
                if key_event.code == KeyCode::Enter && key_event.modifiers == KeyModifiers::NONE {
                    self.set_focus(field.next());
                    return;
                }
                if let Some(input) = self.text_input_mut(field) {
                    if input.handle_input(key_event) && field.is_amount() {
                        if let Some(formatted) = money::format_amount(input.value()) {
                            input.reformat(formatted);
                        }
                    }
                }
            }
        }
    }

    fn handle_picker_action(&mut self, action: PickerAction) {
        match action {
            PickerAction::Lookup(request) => self.request(PendingRequest::Lookup(request)),
            PickerAction::Added(symbol) => info!(symbol = %symbol, "Ticker added"),
            PickerAction::Removed(symbol) => info!(symbol = %symbol, "Ticker removed"),
            PickerAction::Handled => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        let MouseEventKind::Down(MouseButton::Left) = mouse_event.kind else {
            return;
        };
        let (column, row) = (mouse_event.column, mouse_event.row);

        for id in self.router.dispatch_press(column, row) {
            if id == self.tickers.listener_id() {
                self.tickers.on_click_outside();
            }
        }

        // The dropdown may overlap other fields, so it gets the first look
        if let Some(action) = self.tickers.handle_click(column, row) {
            self.focus = FormField::Tickers;
            self.handle_picker_action(action);
            return;
        }

        let Some(field) = self.field_at(column, row) else {
            return;
        };
        self.set_focus(field);
        match field {
            FormField::Simulations => {
                self.simulations.handle_click(column, row);
            }
            FormField::Run => self.submit(),
            _ => {}
        }
    }

    fn field_at(&self, column: u16, row: u16) -> Option<FormField> {
        self.field_areas
            .iter()
            .find(|(_, area)| area.contains((column, row).into()))
            .map(|(field, _)| *field)
    }

    /// Move focus. Leaving the ticker field hides its dropdown.
    fn set_focus(&mut self, field: FormField) {
        if self.focus == FormField::Tickers && field != FormField::Tickers {
            self.tickers.on_click_outside();
        }
        if self.focus != field {
            trace!(from = ?self.focus, to = ?field, "Focus change");
            self.focus = field;
        }
    }

    fn text_input(&self, field: FormField) -> Option<&TextInput> {
        match field {
            FormField::StartDate => Some(&self.start_date),
            FormField::EndDate => Some(&self.end_date),
            FormField::InitialInvestment => Some(&self.initial_investment),
            FormField::MonthlyInvestment => Some(&self.monthly_investment),
            _ => None,
        }
    }

    fn text_input_mut(&mut self, field: FormField) -> Option<&mut TextInput> {
        match field {
            FormField::StartDate => Some(&mut self.start_date),
            FormField::EndDate => Some(&mut self.end_date),
            FormField::InitialInvestment => Some(&mut self.initial_investment),
            FormField::MonthlyInvestment => Some(&mut self.monthly_investment),
            _ => None,
        }
    }

    /// Validate the form and queue a simulation run.
    fn submit(&mut self) {
        let values = FormValues {
            start_date: self.start_date.value(),
            end_date: self.end_date.value(),
            initial_investment: self.initial_investment.value(),
            monthly_investment: self.monthly_investment.value(),
        };

        match form::build_request(
            &values,
            self.simulations.selected_ids(),
            self.tickers.selected_tickers(),
        ) {
            Ok(request) => {
                info!(
                    simulations = ?request.simulations,
                    tickers = ?request.tickers,
                    "Submitting simulation"
                );
                self.result.clear();
                self.request(PendingRequest::Simulate(request));
            }
            Err(e) => self.handle_error(&AppError::from(e)),
        }
    }

    /// Apply the outcome of a backend call.
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::TickersSearched { token, result } => {
                self.tickers.on_lookup_result(token, result);
            }
            ApiMessage::SimulationsFetched(result) => self.on_simulations_fetched(result),
            ApiMessage::SimulationFinished(result) => {
                self.simulations_running = self.simulations_running.saturating_sub(1);
                self.loading.end(Activity::Simulation);
                match result {
                    Ok(chart) => {
                        info!(traces = chart.traces.len(), "Simulation finished");
                        self.result.set_chart(chart);
                    }
                    Err(e) => {
                        warn!(error = %e, "Simulation failed");
                        self.notifications
                            .error(format!("Error running simulation: {}", e));
                    }
                }
            }
            ApiMessage::CacheCleared(result) => {
                self.loading.end(Activity::ClearCache);
                match result {
                    Ok(_) => self.notifications.success("Cache cleared successfully."),
                    Err(e) => self.notifications.error(format!("Error clearing cache: {}", e)),
                }
            }
            ApiMessage::DataCacheDeleted(result) => {
                self.loading.end(Activity::DeleteDataCache);
                match result {
                    Ok(_) => self.notifications.success("Data cache deleted successfully."),
                    Err(e) => self
                        .notifications
                        .error(format!("Error deleting data cache: {}", e)),
                }
            }
        }
    }

    fn on_simulations_fetched(&mut self, result: Result<Vec<SimulationOption>, String>) {
        match result {
            Ok(options) => {
                debug!(count = options.len(), "Simulations loaded");
                self.simulations
                    .set_empty_message("The backend offers no simulations.");
                self.simulations
                    .set_items(options.into_iter().map(SelectItem::from).collect());
            }
            Err(e) => {
                warn!(error = %e, "Failed to load simulations");
                self.simulations
                    .set_empty_message("Simulations unavailable.");
                self.notifications.error("Failed to load available simulations.");
            }
        }
    }

    fn handle_tick(&mut self) {
        self.loading.tick();
        self.notifications.tick();
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.field_areas.clear();

        let ticker_height = self.tickers.desired_height(area.width);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(ticker_height),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_input_row(
            frame,
            chunks[1],
            [FormField::StartDate, FormField::EndDate],
        );
        self.render_input_row(
            frame,
            chunks[2],
            [FormField::InitialInvestment, FormField::MonthlyInvestment],
        );

        self.tickers
            .render(frame, chunks[3], self.focus == FormField::Tickers);
        self.field_areas.push((FormField::Tickers, chunks[3]));

        self.render_body(frame, chunks[4]);
        render_hints(frame, chunks[5], self.focus.hints());

        // Overlays last: dropdown, then notifications on top of everything
        self.tickers.render_overlay(frame, area);
        self.notifications.render(frame, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let title = Line::from(vec![
            Span::styled(
                " simdash ",
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                self.config.backend.base_url.clone(),
                Style::default().fg(t.dim),
            ),
        ]);
        frame.render_widget(Paragraph::new(title), area);
        self.loading.render(frame, area);
    }

    fn render_input_row(&mut self, frame: &mut Frame, area: Rect, fields: [FormField; 2]) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (field, half) in fields.into_iter().zip(halves.iter()) {
            if let Some(input) = self.text_input(field) {
                input.render_with_label(frame, *half, field.label(), self.focus == field);
            }
            self.field_areas.push((field, *half));
        }
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(columns[0]);

        self.simulations
            .render(frame, left[0], self.focus == FormField::Simulations);
        self.field_areas.push((FormField::Simulations, left[0]));

        let run_focused = self.focus == FormField::Run;
        let run_style = if run_focused {
            Style::default()
                .fg(t.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(t.fg)
        };
        let border = if run_focused { t.border_focused } else { t.border };
        let run = Paragraph::new(Line::from(Span::styled(" Run simulation ", run_style)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            );
        frame.render_widget(run, left[1]);
        self.field_areas.push((FormField::Run, left[1]));

        self.result
            .render(frame, columns[1], self.simulations_running > 0);
    }
}
