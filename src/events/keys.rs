//! Key binding definitions.
//!
//! The search field gives special meaning to exactly three keys; everything
//! else falls through to text editing. Global shortcuts all carry Ctrl so
//! they never collide with typed characters.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Navigation keys understood by the ticker search dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// Highlight the next candidate.
    MoveDown,
    /// Highlight the previous candidate.
    MoveUp,
    /// Commit the highlighted candidate.
    Confirm,
}

impl SearchKey {
    /// Map a key event to a dropdown navigation key. Modified keys never match.
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        if key.modifiers != KeyModifiers::NONE {
            return None;
        }
        match key.code {
            KeyCode::Down => Some(SearchKey::MoveDown),
            KeyCode::Up => Some(SearchKey::MoveUp),
            KeyCode::Enter => Some(SearchKey::Confirm),
            _ => None,
        }
    }
}

/// Application-wide shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalKey {
    /// Leave the application.
    Quit,
    /// Submit the form and run the selected simulations.
    RunSimulation,
    /// Clear the backend's in-memory caches.
    ClearCache,
    /// Delete the backend's on-disk data cache.
    DeleteDataCache,
    /// Focus the next form field.
    NextField,
    /// Focus the previous form field.
    PreviousField,
}

impl GlobalKey {
    /// Map a key event to a global shortcut.
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => Some(GlobalKey::Quit),
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => Some(GlobalKey::RunSimulation),
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => Some(GlobalKey::ClearCache),
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => Some(GlobalKey::DeleteDataCache),
            (KeyCode::Tab, KeyModifiers::NONE) => Some(GlobalKey::NextField),
            (KeyCode::BackTab, _) => Some(GlobalKey::PreviousField),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_search_keys() {
        assert_eq!(
            SearchKey::from_key_event(&key(KeyCode::Down, KeyModifiers::NONE)),
            Some(SearchKey::MoveDown)
        );
        assert_eq!(
            SearchKey::from_key_event(&key(KeyCode::Up, KeyModifiers::NONE)),
            Some(SearchKey::MoveUp)
        );
        assert_eq!(
            SearchKey::from_key_event(&key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(SearchKey::Confirm)
        );
    }

    #[test]
    fn test_modified_keys_are_not_search_keys() {
        assert_eq!(
            SearchKey::from_key_event(&key(KeyCode::Down, KeyModifiers::SHIFT)),
            None
        );
        assert_eq!(
            SearchKey::from_key_event(&key(KeyCode::Enter, KeyModifiers::ALT)),
            None
        );
        assert_eq!(
            SearchKey::from_key_event(&key(KeyCode::Up, KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_letters_are_not_search_keys() {
        // j/k must reach the text field, unlike the vim-style lists elsewhere
        assert_eq!(
            SearchKey::from_key_event(&key(KeyCode::Char('j'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            SearchKey::from_key_event(&key(KeyCode::Char('k'), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_global_keys_need_control() {
        assert_eq!(
            GlobalKey::from_key_event(&key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(GlobalKey::RunSimulation)
        );
        assert_eq!(
            GlobalKey::from_key_event(&key(KeyCode::Char('r'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            GlobalKey::from_key_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(GlobalKey::Quit)
        );
    }

    #[test]
    fn test_tab_cycles_focus() {
        assert_eq!(
            GlobalKey::from_key_event(&key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(GlobalKey::NextField)
        );
        assert_eq!(
            GlobalKey::from_key_event(&key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(GlobalKey::PreviousField)
        );
    }
}
