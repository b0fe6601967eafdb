//! Simulation result panel.
//!
//! Lists every trace of the last successful run with its final balance.
//! The panel is cleared when a new run starts.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::api::types::{SimulationChart, Trace};
use crate::form::money::format_amount;
use crate::ui::theme::theme;

/// One summary row: account, points, last date, final balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSummary {
    pub name: String,
    pub points: String,
    pub last_date: String,
    pub final_value: String,
}

impl TraceSummary {
    fn from_trace(index: usize, trace: &Trace) -> Self {
        Self {
            name: trace
                .name
                .clone()
                .unwrap_or_else(|| format!("trace {}", index + 1)),
            points: trace.point_count().to_string(),
            last_date: trace.final_label().unwrap_or_else(|| "-".to_string()),
            final_value: trace
                .final_value()
                .map(format_money)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// `12345.678` becomes `"12,345.68"`.
fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    format_amount(&fixed).unwrap_or(fixed)
}

/// The result panel.
#[derive(Debug, Default)]
pub struct ResultView {
    chart: Option<SimulationChart>,
}

impl ResultView {
    /// Create an empty panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous result.
    pub fn clear(&mut self) {
        self.chart = None;
    }

    /// Show a new result.
    pub fn set_chart(&mut self, chart: SimulationChart) {
        self.chart = Some(chart);
    }

    /// The result on display.
    pub fn chart(&self) -> Option<&SimulationChart> {
        self.chart.as_ref()
    }

    /// Summary rows for the current result.
    pub fn summaries(&self) -> Vec<TraceSummary> {
        self.chart
            .as_ref()
            .map(|chart| {
                chart
                    .traces
                    .iter()
                    .enumerate()
                    .map(|(i, trace)| TraceSummary::from_trace(i, trace))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Render the panel. `running` shows a placeholder while a run is in flight.
    pub fn render(&self, frame: &mut Frame, area: Rect, running: bool) {
        let t = theme();
        let title = self
            .chart
            .as_ref()
            .and_then(SimulationChart::title)
            .map(|title| format!(" {} ", title))
            .unwrap_or_else(|| " Results ".to_string());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border));

        if self.chart.is_none() {
            let text = if running {
                "Running simulation..."
            } else {
                "Press Ctrl+R to run the selected simulations."
            };
            let placeholder = Paragraph::new(Line::from(text))
                .style(Style::default().fg(t.input_placeholder))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let header = Row::new(["Account", "Points", "Last date", "Final value"].map(|h| {
            Cell::from(h).style(Style::default().fg(t.accent).add_modifier(Modifier::BOLD))
        }));

        let rows: Vec<Row> = self
            .summaries()
            .into_iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.name).style(Style::default().fg(t.fg)),
                    Cell::from(s.points).style(Style::default().fg(t.dim)),
                    Cell::from(s.last_date).style(Style::default().fg(t.dim)),
                    Cell::from(s.final_value).style(Style::default().fg(t.success)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(18),
        ];
        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }
}
