//! Type-safe key bindings.
//!
//! A [`Binding`] groups one or more [`KeyPress`]es under a help label. Key maps
//! implement [`KeyMap`] so a help view can list them.
//!
//! ```rust
//! use bubbletea_autocomplete::key::{Binding, KeyPress};
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let next = Binding::new(vec![KeyCode::Down]).with_help("↓", "next suggestion");
//! assert!(next.matches(&KeyPress::from(KeyCode::Down)));
//!
//! let parsed = Binding::from_strs(&["ctrl+n"]);
//! assert!(parsed.matches(&KeyPress::new(KeyCode::Char('n'), KeyModifiers::CONTROL)));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    /// The key code.
    pub code: KeyCode,
    /// Held modifiers.
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    /// Creates a key press.
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Parses strings such as `"down"`, `"ctrl+n"` or `"a"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let mut parts: Vec<&str> = s.split('+').collect();
        let name = parts.pop()?;
        for m in parts {
            match m {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        let code = match name {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "space" => KeyCode::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(Self { code, modifiers })
    }
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self::new(code, modifiers)
    }
}

impl From<&KeyMsg> for KeyPress {
    fn from(msg: &KeyMsg) -> Self {
        Self::new(msg.key, msg.modifiers)
    }
}

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Short key label, e.g. `"↓"`.
    pub key: String,
    /// What the binding does.
    pub desc: String,
}

/// A named group of keys.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding from key codes or key presses.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Creates a binding from key strings; unparseable strings are skipped.
    pub fn from_strs(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().filter_map(|k| KeyPress::parse(k)).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Attaches help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether the binding is active.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// The bound keys.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// The help text.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether `press` triggers this binding.
    pub fn matches(&self, press: &KeyPress) -> bool {
        self.enabled() && self.keys.contains(press)
    }
}

/// Returns true if the key message triggers the binding.
pub fn matches_binding(msg: &KeyMsg, binding: &Binding) -> bool {
    binding.matches(&KeyPress::from(msg))
}

/// Key maps that can describe themselves for help views.
pub trait KeyMap {
    /// Bindings for the compact help line.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings grouped in columns for the expanded help view.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_modified_keys() {
        assert_eq!(KeyPress::parse("down"), Some(KeyPress::from(KeyCode::Down)));
        assert_eq!(
            KeyPress::parse("ctrl+p"),
            Some(KeyPress::new(KeyCode::Char('p'), KeyModifiers::CONTROL))
        );
        assert_eq!(KeyPress::parse("hyper+x"), None);
        assert_eq!(KeyPress::parse("nope"), None);
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut binding = Binding::new(vec![KeyCode::Esc]);
        assert!(binding.matches(&KeyCode::Esc.into()));
        binding.set_enabled(false);
        assert!(!binding.matches(&KeyCode::Esc.into()));
    }

    #[test]
    fn test_matches_binding_with_key_msg() {
        let binding = Binding::from_strs(&["enter", "tab"]);
        let msg = KeyMsg {
            key: KeyCode::Tab,
            modifiers: KeyModifiers::NONE,
        };
        assert!(matches_binding(&msg, &binding));
    }
}
