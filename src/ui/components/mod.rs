//! Reusable UI components.

mod help_bar;
mod input;
mod loading;
mod multiselect;
mod notification;
mod tag_collection;
mod ticker_picker;
mod ticker_search;

pub use help_bar::render_hints;
pub use input::TextInput;
pub use loading::{Activity, LoadingIndicator};
pub use multiselect::{MultiSelect, SelectItem};
pub use notification::{Notification, NotificationManager, NotificationType};
pub use tag_collection::TagCollection;
pub use ticker_picker::{PickerAction, TickerPicker};
pub use ticker_search::{
    DropdownState, LookupRequest, LookupToken, SearchAction, SearchController,
    StaleResultPolicy, DEFAULT_MAX_VISIBLE_CANDIDATES,
};
