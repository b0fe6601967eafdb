//! User interface components and views.

pub mod components;
pub mod pointer;
pub mod theme;
mod views;

pub use components::{LoadingIndicator, Notification, NotificationManager, TickerPicker};
pub use pointer::{ClickAwayListener, ListenerId, PointerRouter};
pub use theme::{init_theme, theme, Theme};
pub use views::{ResultView, TraceSummary};
