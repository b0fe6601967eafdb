//! Ticker field: search input, candidate dropdown and selected chips.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};
use tracing::debug;

use super::tag_collection::TagCollection;
use super::ticker_search::{
    LookupRequest, LookupToken, SearchAction, SearchController, StaleResultPolicy,
};
use crate::api::types::Candidate;
use crate::config::SearchSettings;
use crate::ui::pointer::{ClickAwayListener, ListenerId, PointerRouter};
use crate::ui::theme::theme;

/// Height of the query input row, borders included.
const INPUT_HEIGHT: u16 = 3;

/// Action resulting from ticker field input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerAction {
    /// Perform this lookup and report back via `on_lookup_result`.
    Lookup(LookupRequest),
    /// A ticker was added to the selection.
    Added(String),
    /// A ticker was removed from the selection.
    Removed(String),
    /// Input was consumed without changing the selection.
    Handled,
}

/// The ticker field.
#[derive(Debug)]
pub struct TickerPicker {
    search: SearchController,
    tags: TagCollection,
    listener: ClickAwayListener,
    /// Field area from the last render.
    field_area: Rect,
}

impl TickerPicker {
    /// Create the field, seeded with `defaults`, and register it for outside clicks.
    pub fn new<S: AsRef<str>>(
        router: &PointerRouter,
        settings: &SearchSettings,
        defaults: &[S],
    ) -> Self {
        let mut tags = TagCollection::new();
        tags.seed(defaults);
        Self {
            search: SearchController::new(
                StaleResultPolicy::from_discard_flag(settings.discard_stale_results),
                settings.max_visible_candidates,
            ),
            tags,
            listener: router.install(),
            field_area: Rect::default(),
        }
    }

    /// The search half of the field.
    pub fn search(&self) -> &SearchController {
        &self.search
    }

    /// The selected tickers.
    pub fn tags(&self) -> &TagCollection {
        &self.tags
    }

    /// The selected tickers in display order.
    pub fn selected_tickers(&self) -> Vec<String> {
        self.tags.snapshot()
    }

    /// Id reported by the pointer router when a press lands outside this field.
    pub fn listener_id(&self) -> ListenerId {
        self.listener.id()
    }

    /// Hide the dropdown.
    pub fn on_click_outside(&mut self) {
        self.search.on_click_outside();
    }

    /// Hand a lookup outcome to the search controller.
    pub fn on_lookup_result(
        &mut self,
        token: LookupToken,
        result: Result<Vec<Candidate>, String>,
    ) -> bool {
        self.search.on_lookup_result(token, result)
    }

    /// Handle a key press while the field is focused.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<PickerAction> {
        if key.code == KeyCode::Backspace
            && key.modifiers == KeyModifiers::NONE
            && self.search.query().is_empty()
        {
            return self.tags.remove_last().map(|symbol| {
                debug!(symbol = %symbol, "Removed last ticker from empty query");
                PickerAction::Removed(symbol)
            });
        }

        self.search
            .handle_input(key, &mut self.tags)
            .map(Self::from_search_action)
    }

    /// Handle a left press inside the field: a chip's `×` or a dropdown row.
    pub fn handle_click(&mut self, column: u16, row: u16) -> Option<PickerAction> {
        if let Some(symbol) = self.tags.remove_target_at(column, row).map(str::to_string) {
            self.tags.remove(&symbol);
            return Some(PickerAction::Removed(symbol));
        }

        self.search
            .handle_click(column, row, &mut self.tags)
            .map(Self::from_search_action)
    }

    fn from_search_action(action: SearchAction) -> PickerAction {
        match action {
            SearchAction::Lookup(request) => PickerAction::Lookup(request),
            SearchAction::Committed {
                symbol,
                added: true,
            } => PickerAction::Added(symbol),
            SearchAction::Committed { added: false, .. }
            | SearchAction::Cleared
            | SearchAction::Handled => PickerAction::Handled,
        }
    }

    /// Height the field wants at the given width.
    pub fn desired_height(&self, width: u16) -> u16 {
        INPUT_HEIGHT + self.tags.rows_needed(width.saturating_sub(2)) + 2
    }

    /// Render the input and chips. The dropdown is drawn by `render_overlay`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let t = theme();
        self.field_area = area;

        let title = format!(" Tickers ({}) ", self.tags.len());
        let border = if focused { t.border_focused } else { t.border };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(1)])
            .split(inner);

        self.search.render_input(frame, chunks[0], focused);
        self.tags.render(frame, chunks[1]);
    }

    /// Render the dropdown over everything else and refresh the inside regions.
    pub fn render_overlay(&mut self, frame: &mut Frame, screen: Rect) {
        let input_area = Rect::new(
            self.field_area.x + 1,
            self.field_area.y + 1,
            self.field_area.width.saturating_sub(2),
            INPUT_HEIGHT.min(self.field_area.height.saturating_sub(2)),
        );

        match self.search.render_dropdown(frame, input_area, screen) {
            Some(dropdown) => self.listener.set_regions(&[self.field_area, dropdown]),
            None => self.listener.set_regions(&[self.field_area]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::DropdownState;
    use ratatui::{backend::TestBackend, Terminal};

    fn picker(router: &PointerRouter, defaults: &[&str]) -> TickerPicker {
        TickerPicker::new(router, &SearchSettings::default(), defaults)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(picker: &mut TickerPicker, text: &str) -> Option<PickerAction> {
        let mut last = None;
        for c in text.chars() {
            last = picker.handle_input(key(KeyCode::Char(c)));
        }
        last
    }

    fn draw(picker: &mut TickerPicker) {
        let backend = TestBackend::new(60, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let screen = frame.area();
                let area = Rect::new(0, 0, 60, picker.desired_height(60));
                picker.render(frame, area, true);
                picker.render_overlay(frame, screen);
            })
            .unwrap();
    }

    #[test]
    fn test_seeded_with_defaults() {
        let router = PointerRouter::new();
        let picker = picker(&router, &["TSLA", "NVDA", "MSFT"]);
        assert_eq!(picker.selected_tickers(), vec!["TSLA", "NVDA", "MSFT"]);
        assert_eq!(router.listener_count(), 1);
    }

    #[test]
    fn test_drop_unregisters_listener() {
        let router = PointerRouter::new();
        let p = picker(&router, &[]);
        drop(p);
        assert_eq!(router.listener_count(), 0);
    }

    #[test]
    fn test_typing_requests_lookup() {
        let router = PointerRouter::new();
        let mut picker = picker(&router, &[]);
        match type_text(&mut picker, "AA") {
            Some(PickerAction::Lookup(request)) => assert_eq!(request.query, "AA"),
            other => panic!("Expected lookup, got {:?}", other),
        }
    }

    #[test]
    fn test_keyboard_commit_adds_ticker() {
        let router = PointerRouter::new();
        let mut picker = picker(&router, &["TSLA"]);
        let Some(PickerAction::Lookup(request)) = type_text(&mut picker, "AA") else {
            panic!("Expected lookup");
        };
        picker.on_lookup_result(
            request.token,
            Ok(vec![Candidate::new("AAPL", "Apple Inc."), Candidate::new("AAL", "American Airlines")]),
        );

        picker.handle_input(key(KeyCode::Down));
        let action = picker.handle_input(key(KeyCode::Enter));
        assert_eq!(action, Some(PickerAction::Added("AAPL".to_string())));
        assert_eq!(picker.selected_tickers(), vec!["TSLA", "AAPL"]);
        assert_eq!(picker.search().query(), "");
    }

    #[test]
    fn test_committing_duplicate_is_handled() {
        let router = PointerRouter::new();
        let mut picker = picker(&router, &["AAPL"]);
        let Some(PickerAction::Lookup(request)) = type_text(&mut picker, "AAP") else {
            panic!("Expected lookup");
        };
        picker.on_lookup_result(request.token, Ok(vec![Candidate::new("AAPL", "Apple Inc.")]));

        picker.handle_input(key(KeyCode::Down));
        assert_eq!(picker.handle_input(key(KeyCode::Enter)), Some(PickerAction::Handled));
        assert_eq!(picker.tags().len(), 1);
    }

    #[test]
    fn test_backspace_on_empty_query_removes_last() {
        let router = PointerRouter::new();
        let mut picker = picker(&router, &["TSLA", "NVDA"]);
        let action = picker.handle_input(key(KeyCode::Backspace));
        assert_eq!(action, Some(PickerAction::Removed("NVDA".to_string())));
        assert_eq!(picker.selected_tickers(), vec!["TSLA"]);
    }

    #[test]
    fn test_backspace_with_query_edits_text() {
        let router = PointerRouter::new();
        let mut picker = picker(&router, &["TSLA"]);
        type_text(&mut picker, "AB");
        picker.handle_input(key(KeyCode::Backspace));
        assert_eq!(picker.search().query(), "A");
        assert_eq!(picker.tags().len(), 1);
    }

    #[test]
    fn test_backspace_with_nothing_selected() {
        let router = PointerRouter::new();
        let mut picker = picker(&router, &[]);
        assert_eq!(picker.handle_input(key(KeyCode::Backspace)), None);
    }

    #[test]
    fn test_render_registers_regions_and_clicks_remove_chip() {
        let router = PointerRouter::new();
        let mut picker = picker(&router, &["TSLA", "NVDA"]);
        draw(&mut picker);

        // Press inside the field is not an outside click
        assert!(router.dispatch_press(2, 1).is_empty());
        assert_eq!(router.dispatch_press(2, 20), vec![picker.listener_id()]);

        // Chips start at (1, 4); " TSLA × " puts the glyph at column 1 + 6
        let action = picker.handle_click(7, 4);
        assert_eq!(action, Some(PickerAction::Removed("TSLA".to_string())));
        assert_eq!(picker.selected_tickers(), vec!["NVDA"]);
    }

    #[test]
    fn test_dropdown_click_commits_candidate() {
        let router = PointerRouter::new();
        let mut picker = picker(&router, &[]);
        let Some(PickerAction::Lookup(request)) = type_text(&mut picker, "MS") else {
            panic!("Expected lookup");
        };
        picker.on_lookup_result(
            request.token,
            Ok(vec![Candidate::new("MSFT", "Microsoft"), Candidate::new("MSTR", "MicroStrategy")]),
        );
        draw(&mut picker);

        // Input spans rows 1-3, the dropdown border is row 4, candidates start at row 5
        assert!(router.dispatch_press(5, 6).is_empty());
        let action = picker.handle_click(5, 6);
        assert_eq!(action, Some(PickerAction::Added("MSTR".to_string())));
        assert_eq!(picker.search().state(), DropdownState::Idle);
    }

    #[test]
    fn test_outside_click_hides_dropdown() {
        let router = PointerRouter::new();
        let mut picker = picker(&router, &[]);
        let Some(PickerAction::Lookup(request)) = type_text(&mut picker, "MS") else {
            panic!("Expected lookup");
        };
        picker.on_lookup_result(request.token, Ok(vec![Candidate::new("MSFT", "Microsoft")]));
        draw(&mut picker);

        for id in router.dispatch_press(59, 23) {
            if id == picker.listener_id() {
                picker.on_click_outside();
            }
        }
        assert!(!picker.search().is_dropdown_visible());
        assert_eq!(picker.search().query(), "MS");
    }
}
