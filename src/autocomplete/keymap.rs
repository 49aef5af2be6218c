//! Key bindings for the suggestion engine.

use crate::key::{self, Binding, KeyPress};
use crossterm::event::KeyCode;

/// Keys the engine reacts to on key-down.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Mark the next row.
    pub next_suggestion: Binding,
    /// Mark the previous row.
    pub prev_suggestion: Binding,
    /// Restore the typed text and close the panel.
    pub cancel: Binding,
    /// Commit the marked row.
    pub accept: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            next_suggestion: Binding::new(vec![KeyCode::Down]).with_help("↓", "next suggestion"),
            prev_suggestion: Binding::new(vec![KeyCode::Up]).with_help("↑", "prev suggestion"),
            cancel: Binding::new(vec![KeyCode::Esc]).with_help("esc", "cancel"),
            accept: Binding::new(vec![KeyCode::Enter, KeyCode::Tab]).with_help("enter", "select"),
        }
    }
}

/// The default key map.
pub fn default_key_map() -> KeyMap {
    KeyMap::default()
}

impl key::KeyMap for KeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next_suggestion, &self.prev_suggestion, &self.accept]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.next_suggestion, &self.prev_suggestion],
            vec![&self.accept, &self.cancel],
        ]
    }
}

/// Keys whose release never triggers a query: caret movement, arrows,
/// enter and escape.
pub(super) fn is_navigation_release(press: &KeyPress) -> bool {
    matches!(
        press.code,
        KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::Enter
            | KeyCode::Esc
    )
}
