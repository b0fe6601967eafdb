//! Toasts for backend outcomes and form validation.
//!
//! These stand in for modal alerts: they stack in the bottom-right corner
//! and expire on their own, errors lingering longest.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::error::AppError;

/// Toasts kept on screen at once.
const MAX_VISIBLE: usize = 3;

/// Widest toast, borders included.
const MAX_WIDTH: u16 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    /// Retrying may help (rate limit, backend unreachable).
    Warning,
    Error,
}

impl NotificationType {
    fn icon(self) -> &'static str {
        match self {
            NotificationType::Success => "✓",
            NotificationType::Warning => "⚠",
            NotificationType::Error => "✗",
        }
    }

    fn color(self) -> Color {
        match self {
            NotificationType::Success => Color::Green,
            NotificationType::Warning => Color::Yellow,
            NotificationType::Error => Color::Red,
        }
    }

    /// How long a toast of this type stays up.
    pub fn lifetime(self) -> Duration {
        match self {
            NotificationType::Success => Duration::from_secs(3),
            NotificationType::Warning => Duration::from_secs(5),
            NotificationType::Error => Duration::from_secs(6),
        }
    }
}

/// One toast.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
        }
    }

    /// Toast for an application error. Recoverable errors are warnings.
    pub fn from_error(error: &AppError) -> Self {
        let notification_type = if error.is_recoverable() {
            NotificationType::Warning
        } else {
            NotificationType::Error
        };
        Self::new(error.user_message(), notification_type)
    }

    /// Whether the toast has outlived its type's lifetime at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.notification_type.lifetime()
    }
}

/// The toast stack, newest last.
#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a toast, dropping the oldest past the limit.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        while self.notifications.len() > MAX_VISIBLE {
            self.notifications.pop_front();
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationType::Success));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationType::Error));
    }

    /// Drop expired toasts; called on every tick.
    pub fn tick(&mut self) {
        self.expire(Instant::now());
    }

    fn expire(&mut self, now: Instant) {
        self.notifications.retain(|n| !n.is_expired_at(now));
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    /// The most recent toast.
    pub fn latest(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    /// Render the stack in the bottom-right corner of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let width = MAX_WIDTH.min(area.width.saturating_sub(4));
        // Borders take two columns, the icon and its space two more
        let text_width = width.saturating_sub(4) as usize;

        let heights: Vec<u16> = self
            .notifications
            .iter()
            .map(|n| {
                let lines = if text_width > 0 {
                    (n.message.chars().count() + 2).div_ceil(text_width) as u16
                } else {
                    1
                };
                lines + 2
            })
            .collect();
        let total = heights
            .iter()
            .sum::<u16>()
            .min(area.height.saturating_sub(2));

        let stack = Rect::new(
            area.x + area.width.saturating_sub(width + 2),
            area.y + area.height.saturating_sub(total + 1),
            width,
            total,
        );
        let slots = Layout::default()
            .direction(Direction::Vertical)
            .constraints(heights.iter().map(|&h| Constraint::Length(h)))
            .split(stack);

        for (notification, slot) in self.notifications.iter().zip(slots.iter()) {
            render_toast(notification, frame, *slot);
        }
    }
}

fn render_toast(notification: &Notification, frame: &mut Frame, area: Rect) {
    let kind = notification.notification_type;
    let style = Style::default().fg(kind.color());
    let text = Line::from(vec![
        Span::styled(format!("{} ", kind.icon()), style.add_modifier(Modifier::BOLD)),
        Span::styled(notification.message.as_str(), style),
    ]);
    let toast = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).border_style(style))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(toast, area);
}
