//! Header spinner for slow backend calls.
//!
//! Simulations and cache maintenance can overlap, so the indicator keeps the
//! calls in flight and names the most recent one. Ticker lookups never show
//! here; they have their own "searching" label on the field.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::theme;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A backend call worth a spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Simulation,
    ClearCache,
    DeleteDataCache,
}

impl Activity {
    /// Text shown next to the spinner.
    pub fn label(self) -> &'static str {
        match self {
            Activity::Simulation => "Running simulation...",
            Activity::ClearCache => "Clearing cache...",
            Activity::DeleteDataCache => "Deleting data cache...",
        }
    }
}

/// Spinner over the calls currently in flight.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    in_flight: Vec<Activity>,
    frame: usize,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A call started.
    pub fn begin(&mut self, activity: Activity) {
        if self.in_flight.is_empty() {
            self.frame = 0;
        }
        self.in_flight.push(activity);
    }

    /// A call finished, successfully or not. Unknown activities are ignored.
    pub fn end(&mut self, activity: Activity) {
        if let Some(pos) = self.in_flight.iter().rposition(|&a| a == activity) {
            self.in_flight.remove(pos);
        }
    }

    /// Number of calls in flight.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_active(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Advance the spinner; called on every tick.
    pub fn tick(&mut self) {
        if self.is_active() {
            self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Spinner, latest call's label, and a count of the others. Empty when idle.
    pub fn text(&self) -> String {
        let Some(latest) = self.in_flight.last() else {
            return String::new();
        };
        let spinner = SPINNER_FRAMES[self.frame];
        match self.in_flight.len() - 1 {
            0 => format!("{} {}", spinner, latest.label()),
            others => format!("{} {} (+{} more)", spinner, latest.label(), others),
        }
    }

    /// Render right-aligned in the given area.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.is_active() {
            return;
        }

        let paragraph = Paragraph::new(self.text())
            .style(Style::default().fg(theme().accent))
            .alignment(Alignment::Right);
        frame.render_widget(paragraph, area);
    }
}
