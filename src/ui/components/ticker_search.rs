//! Incremental ticker search with a keyboard-navigable dropdown.
//!
//! The controller owns the query text, the candidate list from the latest
//! applied lookup, the highlighted candidate and the dropdown state. Every
//! edit that leaves a non-empty query issues a new lookup; there is no
//! debounce and no cancellation. The parent performs the lookup and hands
//! the outcome back through [`SearchController::on_lookup_result`].
//!
//! Down/Up/Enter are only intercepted while there are candidates; every
//! other key edits the query.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing::{debug, trace, warn};

use super::input::TextInput;
use super::tag_collection::TagCollection;
use crate::api::types::Candidate;
use crate::events::SearchKey;
use crate::ui::theme::theme;

/// Default dropdown height in rows.
pub const DEFAULT_MAX_VISIBLE_CANDIDATES: usize = 8;

/// Identifies one issued lookup. Later lookups have larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupToken(u64);

/// A lookup the parent must perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Echo this back with the result.
    pub token: LookupToken,
    /// The trimmed query text.
    pub query: String,
}

/// What to do with a lookup result that arrives after a newer lookup was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleResultPolicy {
    /// Apply every result in arrival order; the last one to arrive wins,
    /// even if it answers an older query.
    #[default]
    Apply,
    /// Only apply the result of the most recently issued lookup.
    DiscardStale,
}

impl StaleResultPolicy {
    /// Policy for the `discard_stale_results` setting.
    pub fn from_discard_flag(discard: bool) -> Self {
        if discard {
            StaleResultPolicy::DiscardStale
        } else {
            StaleResultPolicy::Apply
        }
    }
}

/// Dropdown lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownState {
    /// Query is empty; nothing to show.
    #[default]
    Idle,
    /// A lookup is outstanding. `showing_previous` keeps the last results on
    /// screen until the new ones arrive.
    AwaitingResults { showing_previous: bool },
    /// Results are on screen.
    ShowingResults,
    /// Hidden by a click elsewhere or focus leaving the field; the list is kept.
    Dismissed,
}

impl DropdownState {
    /// Whether the dropdown is drawn in this state.
    pub fn is_visible(self) -> bool {
        matches!(
            self,
            DropdownState::ShowingResults
                | DropdownState::AwaitingResults {
                    showing_previous: true
                }
        )
    }
}

/// Outcome of a key or click handled by the search field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// The query changed and is non-empty; perform this lookup.
    Lookup(LookupRequest),
    /// The query became empty; the dropdown closed without a lookup.
    Cleared,
    /// A navigation key was consumed.
    Handled,
    /// A candidate was committed. `added` is false if it was already selected.
    Committed { symbol: String, added: bool },
}

/// Query text, candidates and highlight for the ticker field.
#[derive(Debug)]
pub struct SearchController {
    /// The query field.
    input: TextInput,
    /// Candidates from the last applied lookup.
    candidates: Vec<Candidate>,
    /// Highlighted candidate, always a valid index when set.
    highlighted: Option<usize>,
    /// Dropdown lifecycle state.
    state: DropdownState,
    /// How out-of-order results are treated.
    policy: StaleResultPolicy,
    /// Token for the next lookup.
    next_token: u64,
    /// Token of the most recently issued lookup.
    latest_token: Option<LookupToken>,
    /// First candidate shown in the dropdown window.
    scroll_offset: usize,
    /// Dropdown window height in rows.
    max_visible: usize,
    /// Where candidate rows were drawn last frame.
    rows_area: Option<Rect>,
}

impl SearchController {
    /// Create a controller with the given policy and dropdown height.
    pub fn new(policy: StaleResultPolicy, max_visible: usize) -> Self {
        let mut input = TextInput::new();
        input.set_placeholder("Type to search tickers...");
        Self {
            input,
            candidates: Vec::new(),
            highlighted: None,
            state: DropdownState::Idle,
            policy,
            next_token: 0,
            latest_token: None,
            scroll_offset: 0,
            max_visible: max_visible.max(1),
            rows_area: None,
        }
    }

    /// The raw query text.
    pub fn query(&self) -> &str {
        self.input.value()
    }

    /// Candidates from the last applied lookup.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Index of the highlighted candidate.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The highlighted candidate.
    pub fn highlighted_candidate(&self) -> Option<&Candidate> {
        self.highlighted.and_then(|idx| self.candidates.get(idx))
    }

    /// The dropdown lifecycle state.
    pub fn state(&self) -> DropdownState {
        self.state
    }

    /// Whether the dropdown is drawn.
    pub fn is_dropdown_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// Whether a lookup is outstanding.
    pub fn is_searching(&self) -> bool {
        matches!(self.state, DropdownState::AwaitingResults { .. })
    }

    /// First candidate index inside the dropdown window.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// The stale-result policy in effect.
    pub fn policy(&self) -> StaleResultPolicy {
        self.policy
    }

    fn transition(&mut self, next: DropdownState) {
        if self.state != next {
            trace!(from = ?self.state, to = ?next, "Dropdown transition");
            self.state = next;
        }
    }

    fn reset_candidates(&mut self) {
        self.candidates.clear();
        self.highlighted = None;
        self.scroll_offset = 0;
    }

    /// Replace the query text as if the user had typed it.
    pub fn set_query(&mut self, text: &str) -> Option<LookupRequest> {
        self.input.set_value(text);
        self.on_query_change()
    }

    /// React to the query text having changed.
    ///
    /// An empty (or whitespace-only) query closes the dropdown and clears the
    /// candidates without a lookup. Anything else issues a new lookup.
    pub fn on_query_change(&mut self) -> Option<LookupRequest> {
        let query = self.input.value().trim().to_string();

        if query.is_empty() {
            self.reset_candidates();
            self.transition(DropdownState::Idle);
            return None;
        }

        let token = LookupToken(self.next_token);
        self.next_token += 1;
        self.latest_token = Some(token);

        let next = match self.state {
            DropdownState::ShowingResults => DropdownState::AwaitingResults {
                showing_previous: true,
            },
            DropdownState::AwaitingResults { showing_previous } => {
                DropdownState::AwaitingResults { showing_previous }
            }
            DropdownState::Idle | DropdownState::Dismissed => DropdownState::AwaitingResults {
                showing_previous: false,
            },
        };
        self.transition(next);

        debug!(query = %query, ?token, "Issuing ticker lookup");
        Some(LookupRequest { token, query })
    }

    /// Apply the outcome of a lookup. Returns true if the candidates were replaced.
    ///
    /// Failures are logged and otherwise ignored: the previous list and
    /// visibility stay as they were.
    pub fn on_lookup_result(
        &mut self,
        token: LookupToken,
        result: Result<Vec<Candidate>, String>,
    ) -> bool {
        let candidates = match result {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(?token, error = %e, "Ticker lookup failed");
                if self.latest_token == Some(token) {
                    self.settle_after_failure();
                }
                return false;
            }
        };

        if self.policy == StaleResultPolicy::DiscardStale && self.latest_token != Some(token) {
            debug!(?token, latest = ?self.latest_token, "Discarding stale lookup result");
            return false;
        }

        match self.state {
            DropdownState::Idle => {
                debug!(?token, "Query is empty, ignoring lookup result");
                false
            }
            // Dismissed by an outside click: refresh the list but leave it
            // hidden until the query changes again.
            DropdownState::Dismissed => {
                self.replace_candidates(candidates);
                true
            }
            DropdownState::AwaitingResults { .. } | DropdownState::ShowingResults => {
                self.replace_candidates(candidates);
                self.transition(DropdownState::ShowingResults);
                true
            }
        }
    }

    /// Stop waiting once the latest lookup failed. The list on screen, if
    /// any, stays as it was.
    fn settle_after_failure(&mut self) {
        match self.state {
            DropdownState::AwaitingResults {
                showing_previous: true,
            } => self.transition(DropdownState::ShowingResults),
            DropdownState::AwaitingResults {
                showing_previous: false,
            } => self.transition(DropdownState::Dismissed),
            DropdownState::Idle | DropdownState::ShowingResults | DropdownState::Dismissed => {}
        }
    }

    fn replace_candidates(&mut self, candidates: Vec<Candidate>) {
        debug!(count = candidates.len(), "Candidates replaced");
        self.candidates = candidates;
        self.highlighted = None;
        self.scroll_offset = 0;
    }

    /// Handle a navigation key.
    ///
    /// Returns `None` when there are no candidates, leaving the key to the
    /// text field. Movement stops at either end; it never wraps.
    pub fn on_key(&mut self, key: SearchKey, tags: &mut TagCollection) -> Option<SearchAction> {
        if self.candidates.is_empty() {
            return None;
        }

        let last = self.candidates.len() - 1;
        match key {
            SearchKey::MoveDown => {
                let next = match self.highlighted {
                    None => Some(0),
                    Some(idx) if idx < last => Some(idx + 1),
                    Some(idx) => Some(idx),
                };
                self.set_highlight(next);
                Some(SearchAction::Handled)
            }
            SearchKey::MoveUp => {
                if let Some(idx) = self.highlighted.filter(|&idx| idx > 0) {
                    self.set_highlight(Some(idx - 1));
                }
                Some(SearchAction::Handled)
            }
            SearchKey::Confirm => match self.highlighted_candidate() {
                Some(candidate) => {
                    let symbol = candidate.symbol.clone();
                    let added = self.commit_selection(&symbol, tags);
                    Some(SearchAction::Committed { symbol, added })
                }
                None => Some(SearchAction::Handled),
            },
        }
    }

    fn set_highlight(&mut self, highlighted: Option<usize>) {
        if self.highlighted != highlighted {
            self.highlighted = highlighted;
            self.scroll_into_view();
        }
    }

    /// Move the dropdown window the least distance that shows the highlight.
    fn scroll_into_view(&mut self) {
        let Some(idx) = self.highlighted else {
            return;
        };
        if idx < self.scroll_offset {
            self.scroll_offset = idx;
        } else if idx >= self.scroll_offset + self.max_visible {
            self.scroll_offset = idx + 1 - self.max_visible;
        }
    }

    /// Hand `symbol` to the tag collection, then reset the field.
    ///
    /// Returns whether the symbol was newly added.
    pub fn commit_selection(&mut self, symbol: &str, tags: &mut TagCollection) -> bool {
        let added = tags.add(symbol);
        self.input.clear();
        self.reset_candidates();
        self.transition(DropdownState::Idle);
        added
    }

    /// Hide the dropdown. Query and candidates are kept.
    pub fn on_click_outside(&mut self) {
        match self.state {
            DropdownState::AwaitingResults { .. } | DropdownState::ShowingResults => {
                self.transition(DropdownState::Dismissed);
            }
            DropdownState::Idle | DropdownState::Dismissed => {}
        }
    }

    /// Handle a key press while the field is focused.
    ///
    /// Returns `None` if the key neither navigated nor changed the query.
    pub fn handle_input(&mut self, key: KeyEvent, tags: &mut TagCollection) -> Option<SearchAction> {
        if let Some(search_key) = SearchKey::from_key_event(&key) {
            if let Some(action) = self.on_key(search_key, tags) {
                return Some(action);
            }
        }

        if !self.input.handle_input(key) {
            return None;
        }

        Some(match self.on_query_change() {
            Some(request) => SearchAction::Lookup(request),
            None => SearchAction::Cleared,
        })
    }

    /// Commit the candidate drawn at the given cell, if the dropdown is open.
    pub fn handle_click(
        &mut self,
        column: u16,
        row: u16,
        tags: &mut TagCollection,
    ) -> Option<SearchAction> {
        let idx = self.candidate_at(column, row)?;
        let symbol = self.candidates[idx].symbol.clone();
        let added = self.commit_selection(&symbol, tags);
        Some(SearchAction::Committed { symbol, added })
    }

    fn candidate_at(&self, column: u16, row: u16) -> Option<usize> {
        if !self.is_dropdown_visible() {
            return None;
        }
        let area = self.rows_area?;
        if !area.contains((column, row).into()) {
            return None;
        }
        let idx = self.scroll_offset + (row - area.y) as usize;
        (idx < self.candidates.len()).then_some(idx)
    }

    /// Render the query field.
    pub fn render_input(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let label = if self.is_searching() {
            "Add ticker (searching...)"
        } else {
            "Add ticker"
        };
        self.input.render_with_label(frame, area, label, focused);
    }

    /// Render the dropdown below (or, if there is no room, above) the field.
    ///
    /// Returns the area covered, or `None` when the dropdown is hidden.
    pub fn render_dropdown(
        &mut self,
        frame: &mut Frame,
        input_area: Rect,
        screen_area: Rect,
    ) -> Option<Rect> {
        self.rows_area = None;
        if !self.is_dropdown_visible() {
            return None;
        }

        let t = theme();
        let rows = self.candidates.len().clamp(1, self.max_visible) as u16;
        let height = rows + 2;

        let space_below = screen_area
            .bottom()
            .saturating_sub(input_area.bottom());
        let space_above = input_area.y.saturating_sub(screen_area.y);
        let area = if space_below >= height || space_below >= space_above {
            Rect::new(input_area.x, input_area.bottom(), input_area.width, height.min(space_below))
        } else {
            let h = height.min(space_above);
            Rect::new(input_area.x, input_area.y - h, input_area.width, h)
        };
        if area.is_empty() {
            return None;
        }

        let title = if self.candidates.is_empty() {
            " No matches ".to_string()
        } else {
            match self.highlighted {
                Some(idx) => format!(" {}/{} ", idx + 1, self.candidates.len()),
                None => format!(" {} results ", self.candidates.len()),
            }
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border_focused));
        let inner = block.inner(area);

        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        if self.candidates.is_empty() {
            let empty = Paragraph::new("No matching tickers")
                .style(Style::default().fg(t.input_placeholder));
            frame.render_widget(empty, inner);
            return Some(area);
        }

        let lines: Vec<Line> = self
            .candidates
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(inner.height as usize)
            .map(|(idx, candidate)| {
                let mut line = Line::from(vec![
                    Span::styled(
                        candidate.symbol.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" - "),
                    Span::styled(candidate.name.clone(), Style::default().fg(t.dim)),
                ]);
                if self.highlighted == Some(idx) {
                    line = line.style(Style::default().bg(t.highlight_bg).fg(t.fg));
                }
                line
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
        self.rows_area = Some(inner);
        Some(area)
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(StaleResultPolicy::default(), DEFAULT_MAX_VISIBLE_CANDIDATES)
    }
}
