//! Checklist of available simulations.
//!
//! Items keep the order the backend listed them in, and so does the
//! selection returned by [`MultiSelect::selected_ids`].

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::api::types::SimulationOption;
use crate::ui::theme::theme;

/// A selectable item in the checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    /// Value submitted when checked.
    pub id: String,
    /// Text shown next to the checkbox.
    pub label: String,
}

impl SelectItem {
    /// Create a new select item.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl From<SimulationOption> for SelectItem {
    fn from(option: SimulationOption) -> Self {
        Self::new(option.id, option.name)
    }
}

/// A checklist that allows selecting multiple items.
#[derive(Debug)]
pub struct MultiSelect {
    /// The list of items to display.
    items: Vec<SelectItem>,
    /// Set of checked item IDs.
    selected: HashSet<String>,
    /// Currently focused item index.
    cursor: usize,
    /// Widget title.
    title: String,
    /// Shown instead of the list while there are no items.
    empty_message: String,
    /// List state for ratatui.
    list_state: ListState,
    /// Inner list area from the last render.
    rows_area: Option<Rect>,
}

impl MultiSelect {
    /// Create a new checklist.
    pub fn new(title: impl Into<String>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            items: Vec::new(),
            selected: HashSet::new(),
            cursor: 0,
            title: title.into(),
            empty_message: "No options available".to_string(),
            list_state,
            rows_area: None,
        }
    }

    /// Replace the items. Checked IDs that still exist stay checked.
    pub fn set_items(&mut self, items: Vec<SelectItem>) {
        self.selected
            .retain(|id| items.iter().any(|item| &item.id == id));
        self.items = items;
        self.cursor = 0;
        self.list_state.select(Some(0));
    }

    /// Set the text shown while the list is empty.
    pub fn set_empty_message(&mut self, message: impl Into<String>) {
        self.empty_message = message.into();
    }

    /// The items in display order.
    pub fn items(&self) -> &[SelectItem] {
        &self.items
    }

    /// Checked IDs in display order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| self.selected.contains(&item.id))
            .map(|item| item.id.clone())
            .collect()
    }

    /// Check if an item is checked.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Toggle the item at `index`.
    pub fn toggle(&mut self, index: usize) {
        if let Some(item) = self.items.get(index) {
            if !self.selected.remove(&item.id) {
                self.selected.insert(item.id.clone());
            }
        }
    }

    /// Toggle the focused item.
    pub fn toggle_current(&mut self) {
        self.toggle(self.cursor);
    }

    /// Check every item.
    pub fn select_all(&mut self) {
        for item in &self.items {
            self.selected.insert(item.id.clone());
        }
    }

    /// Uncheck every item.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Move cursor up.
    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    /// Move cursor down.
    pub fn move_down(&mut self) {
        if !self.items.is_empty() && self.cursor < self.items.len() - 1 {
            self.cursor += 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of checked items.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the input was handled.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Down, _) => {
                self.move_down();
                true
            }
            (KeyCode::Up, _) => {
                self.move_up();
                true
            }
            (KeyCode::Char(' '), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
                self.toggle_current();
                true
            }
            (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                if self.selected.len() == self.items.len() {
                    self.clear_selection();
                } else {
                    self.select_all();
                }
                true
            }
            _ => false,
        }
    }

    /// Toggle the row under a left press. Returns true if a row was hit.
    pub fn handle_click(&mut self, column: u16, row: u16) -> bool {
        let Some(area) = self.rows_area else {
            return false;
        };
        if !area.contains((column, row).into()) {
            return false;
        }
        let index = self.list_state.offset() + (row - area.y) as usize;
        if index >= self.items.len() {
            return false;
        }
        self.cursor = index;
        self.list_state.select(Some(index));
        self.toggle(index);
        true
    }

    /// Render the checklist.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let t = theme();
        let border_style = if focused {
            Style::default().fg(t.border_focused)
        } else {
            Style::default().fg(t.border)
        };

        let title = if self.selected.is_empty() {
            format!(" {} ", self.title)
        } else {
            format!(" {} ({}) ", self.title, self.selected.len())
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);
        self.rows_area = None;

        if self.items.is_empty() {
            let empty_item = ListItem::new(Line::from(Span::styled(
                self.empty_message.clone(),
                Style::default().fg(t.input_placeholder),
            )));
            frame.render_widget(List::new(vec![empty_item]).block(block), area);
            return;
        }

        let inner = block.inner(area);
        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let checked = self.selected.contains(&item.id);
                let (checkbox, style) = if checked {
                    ("[x]", Style::default().fg(t.success))
                } else {
                    ("[ ]", Style::default())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(checkbox, style),
                    Span::raw(" "),
                    Span::raw(item.label.clone()),
                ]))
            })
            .collect();

        let mut list = List::new(items).block(block);
        if focused {
            list = list
                .highlight_style(
                    Style::default()
                        .fg(t.fg)
                        .bg(t.highlight_bg)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
        }

        frame.render_stateful_widget(list, area, &mut self.list_state);
        self.rows_area = Some(inner);
    }
}

impl Default for MultiSelect {
    fn default() -> Self {
        Self::new("")
    }
}
