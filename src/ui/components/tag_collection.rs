//! Selected-ticker chips.
//!
//! Keeps the ordered, duplicate-free set of confirmed ticker symbols and
//! draws each one as a chip with its own `×` removal target.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use crate::ui::theme::theme;

/// Glyph drawn at the end of each chip; clicking it removes the tag.
const REMOVE_GLYPH: &str = "×";

/// Where one chip landed in the last layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ChipPlacement {
    /// Row offset inside the render area.
    row: u16,
    /// Column offset of the chip's first cell.
    col: u16,
    /// Index into `symbols`.
    index: usize,
}

impl ChipPlacement {
    /// Column offset of the removal glyph.
    fn remove_col(&self, symbol: &str) -> u16 {
        self.col + chip_width(symbol) - 2
    }
}

/// Rendered width of a chip: `" SYM × "`.
fn chip_width(symbol: &str) -> u16 {
    symbol.chars().count() as u16 + 4
}

/// Flow chips left to right, wrapping to a new row when one does not fit.
///
/// A chip wider than the whole row still gets a row of its own.
fn layout_chips(symbols: &[String], width: u16) -> Vec<ChipPlacement> {
    let mut placements = Vec::with_capacity(symbols.len());
    let (mut row, mut col) = (0u16, 0u16);

    for (index, symbol) in symbols.iter().enumerate() {
        let w = chip_width(symbol);
        if col > 0 && col + w > width {
            row += 1;
            col = 0;
        }
        placements.push(ChipPlacement { row, col, index });
        col += w + 1;
    }

    placements
}

/// The confirmed ticker selection.
///
/// Insertion order is display order; adding a present symbol is a no-op.
#[derive(Debug, Default)]
pub struct TagCollection {
    /// Selected symbols in insertion order.
    symbols: Vec<String>,
    /// Removal targets from the last render, in screen coordinates.
    remove_targets: Vec<(Rect, String)>,
}

impl TagCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol. Returns false if it was already selected.
    pub fn add(&mut self, symbol: &str) -> bool {
        if self.contains(symbol) {
            debug!(symbol, "Ticker already selected");
            return false;
        }
        self.symbols.push(symbol.to_string());
        debug!(symbol, count = self.symbols.len(), "Ticker selected");
        true
    }

    /// Remove a symbol. Returns false if it was not selected.
    pub fn remove(&mut self, symbol: &str) -> bool {
        match self.symbols.iter().position(|s| s == symbol) {
            Some(idx) => {
                self.symbols.remove(idx);
                self.remove_targets.retain(|(_, s)| s != symbol);
                debug!(symbol, count = self.symbols.len(), "Ticker removed");
                true
            }
            None => false,
        }
    }

    /// Remove and return the most recently added symbol.
    pub fn remove_last(&mut self) -> Option<String> {
        let last = self.symbols.last().cloned()?;
        self.remove(&last);
        Some(last)
    }

    /// Pre-populate with defaults, skipping duplicates like `add` does.
    pub fn seed<S: AsRef<str>>(&mut self, symbols: &[S]) {
        for symbol in symbols {
            self.add(symbol.as_ref());
        }
    }

    /// The current selection in display order.
    pub fn snapshot(&self) -> Vec<String> {
        self.symbols.clone()
    }

    /// The selection as a comma-joined request value, or `None` when empty.
    pub fn query_value(&self) -> Option<String> {
        if self.symbols.is_empty() {
            None
        } else {
            Some(self.symbols.join(","))
        }
    }

    /// Check whether a symbol is selected.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Number of selected symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Rows needed to show every chip at the given width. At least one.
    pub fn rows_needed(&self, width: u16) -> u16 {
        layout_chips(&self.symbols, width)
            .last()
            .map_or(1, |p| p.row + 1)
    }

    /// The symbol whose removal glyph is at the given cell, if any.
    pub fn remove_target_at(&self, column: u16, row: u16) -> Option<&str> {
        self.remove_targets
            .iter()
            .find(|(rect, _)| rect.contains((column, row).into()))
            .map(|(_, symbol)| symbol.as_str())
    }

    /// Render the chips, wrapping within `area`.
    ///
    /// Rows that do not fit are dropped and get no removal targets, nor do
    /// chips whose glyph falls past the right edge.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();
        self.remove_targets.clear();

        if self.symbols.is_empty() {
            let empty = Paragraph::new("No tickers selected")
                .style(Style::default().fg(t.input_placeholder));
            frame.render_widget(empty, area);
            return;
        }

        let chip_style = Style::default().fg(t.tag_fg).bg(t.tag_bg);
        let glyph_style = chip_style.add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line> = Vec::new();
        for placement in layout_chips(&self.symbols, area.width) {
            if placement.row >= area.height {
                break;
            }
            let symbol = &self.symbols[placement.index];

            while lines.len() <= placement.row as usize {
                lines.push(Line::default());
            }
            let line = &mut lines[placement.row as usize];
            if placement.col > 0 {
                line.spans.push(Span::raw(" "));
            }
            line.spans.push(Span::styled(format!(" {} ", symbol), chip_style));
            line.spans.push(Span::styled(REMOVE_GLYPH, glyph_style));
            line.spans.push(Span::styled(" ", chip_style));

            // A glyph clipped off the right edge is not clickable
            let remove_col = placement.remove_col(symbol);
            if remove_col < area.width {
                let target = Rect::new(area.x + remove_col, area.y + placement.row, 1, 1);
                self.remove_targets.push((target, symbol.clone()));
            }
        }

        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_collection_is_empty() {
        let tags = TagCollection::new();
        assert!(tags.is_empty());
        assert_eq!(tags.query_value(), None);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut tags = TagCollection::new();
        assert!(tags.add("NVDA"));
        assert!(tags.add("AAPL"));
        assert_eq!(tags.snapshot(), vec!["NVDA", "AAPL"]);
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut tags = TagCollection::new();
        tags.add("AAPL");
        assert!(!tags.add("AAPL"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_add_is_case_sensitive() {
        let mut tags = TagCollection::new();
        tags.add("brk.b");
        assert!(tags.add("BRK.B"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut tags = TagCollection::new();
        tags.add("MSFT");
        assert!(!tags.remove("GOOG"));
        assert_eq!(tags.snapshot(), vec!["MSFT"]);
    }

    #[test]
    fn test_add_twice_then_remove_leaves_nothing() {
        let mut tags = TagCollection::new();
        tags.add("AAPL");
        tags.add("AAPL");
        assert!(tags.remove("AAPL"));
        assert!(tags.is_empty());
        assert!(!tags.contains("AAPL"));
    }

    #[test]
    fn test_seed_keeps_order_and_dedups() {
        let mut tags = TagCollection::new();
        tags.seed(&["TSLA", "NVDA", "TSLA", "MSFT"]);
        assert_eq!(tags.snapshot(), vec!["TSLA", "NVDA", "MSFT"]);
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let mut tags = TagCollection::new();
        tags.seed(&["TSLA"]);
        let mut snap = tags.snapshot();
        snap.push("XYZ".to_string());
        assert_eq!(tags.snapshot(), vec!["TSLA"]);
    }

    #[test]
    fn test_remove_last() {
        let mut tags = TagCollection::new();
        tags.seed(&["TSLA", "NVDA"]);
        assert_eq!(tags.remove_last().as_deref(), Some("NVDA"));
        assert_eq!(tags.remove_last().as_deref(), Some("TSLA"));
        assert_eq!(tags.remove_last(), None);
    }

    #[test]
    fn test_query_value_joins_with_commas() {
        let mut tags = TagCollection::new();
        tags.seed(&["TSLA", "NVDA", "MSFT"]);
        assert_eq!(tags.query_value().as_deref(), Some("TSLA,NVDA,MSFT"));
    }

    #[test]
    fn test_layout_single_row() {
        // " TSLA × " is 8 wide, then one gap
        let placements = layout_chips(&symbols(&["TSLA", "NVDA"]), 40);
        assert_eq!(placements[0], ChipPlacement { row: 0, col: 0, index: 0 });
        assert_eq!(placements[1], ChipPlacement { row: 0, col: 9, index: 1 });
        assert_eq!(placements[0].remove_col("TSLA"), 6);
    }

    #[test]
    fn test_layout_wraps() {
        let placements = layout_chips(&symbols(&["TSLA", "NVDA", "MSFT"]), 17);
        assert_eq!(placements[1].row, 0);
        assert_eq!(placements[2], ChipPlacement { row: 1, col: 0, index: 2 });
    }

    #[test]
    fn test_layout_oversized_chip_gets_own_row() {
        let placements = layout_chips(&symbols(&["VERYLONGSYMBOL"]), 5);
        assert_eq!(placements[0], ChipPlacement { row: 0, col: 0, index: 0 });
    }

    #[test]
    fn test_rows_needed() {
        let mut tags = TagCollection::new();
        assert_eq!(tags.rows_needed(17), 1);
        tags.seed(&["TSLA", "NVDA", "MSFT"]);
        assert_eq!(tags.rows_needed(17), 2);
        assert_eq!(tags.rows_needed(80), 1);
    }

    #[test]
    fn test_remove_target_lookup() {
        let mut tags = TagCollection::new();
        tags.add("TSLA");
        tags.remove_targets.push((Rect::new(6, 3, 1, 1), "TSLA".to_string()));

        assert_eq!(tags.remove_target_at(6, 3), Some("TSLA"));
        assert_eq!(tags.remove_target_at(5, 3), None);

        tags.remove("TSLA");
        assert_eq!(tags.remove_target_at(6, 3), None);
    }

    #[test]
    fn test_clipped_remove_glyph_is_not_a_target() {
        let mut tags = TagCollection::new();
        tags.seed(&["VERYLONGSYMBOL", "AB"]);
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal
            .draw(|f| tags.render(f, Rect::new(0, 0, 10, 3)))
            .unwrap();

        // " VERYLONGSYMBOL × " puts its glyph at column 16, past the area
        assert_eq!(tags.remove_target_at(16, 0), None);
        assert_eq!(tags.remove_target_at(4, 1), Some("AB"));
    }
}
