//! Suggestion boxes for text fields.
//!
//! The [`Engine`] binds a floating [`Panel`](crate::panel::Panel) to every
//! target field of a [`Document`](crate::document::Document) and turns the
//! events a host forwards into debounced queries, cached answers, rendered rows
//! and selections.
//!
//! # Event Flow
//!
//! 1. The host forwards key, focus, pointer and resize events as messages
//!    ([`FieldMsg`], [`PointerMsg`], [`ResizeMsg`], or raw `KeyMsg`s for the
//!    focused field).
//! 2. Key-up on a changed text of at least `min_chars` characters starts a
//!    debounce timer: a command that yields a [`DebounceMsg`]. Newer keystrokes
//!    supersede older timers.
//! 3. When the timer message comes back, the source is asked. A synchronous
//!    answer renders at once; an asynchronous one arrives as a
//!    [`SuggestionsMsg`] from the returned command.
//! 4. Arrow keys move the selected mark, enter/tab or a pointer press selects,
//!    escape restores the typed text.
//!
//! # Caching
//!
//! With caching enabled every answer is stored under its query and never
//! replaced. An exact hit renders immediately; if any shorter prefix (down to
//! `min_chars`) is cached with no suggestions, the source is skipped and the
//! panel stays closed.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_autocomplete::autocomplete::{Engine, Options};
//! use bubbletea_autocomplete::config::Config;
//! use bubbletea_autocomplete::document::{Document, Field, Rect};
//! use bubbletea_autocomplete::source::StaticSource;
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let mut doc = Document::new();
//! let field = doc.add_field(Field::new(Rect::new(0, 0, 24, 1)));
//! doc.focus(field);
//!
//! let source = StaticSource::new(["Berlin", "Bern", "Bonn"]);
//! let options = Options::new(field, source)
//!     .with_config(Config::default().with_min_chars(1).with_delay(0));
//! let mut engine = Engine::new(options, doc);
//!
//! // Typing 'b' schedules the debounce timer.
//! let key = KeyMsg { key: KeyCode::Char('b'), modifiers: KeyModifiers::NONE };
//! assert!(engine.update(Box::new(key)).is_some());
//! assert_eq!(engine.document().field(field).unwrap().value(), "b");
//! ```

pub mod focus;
pub mod keymap;
pub mod model;
pub mod navigation;
pub mod pointer;
pub mod query;
pub mod types;
pub mod view;


pub use keymap::{default_key_map, KeyMap};
pub use model::{Engine, Options};
pub use types::{
    DebounceMsg, FieldEvent, FieldMsg, OnSelect, Overflow, PointerMsg, ResizeMsg, SelectEvent,
    SelectTrigger, SettleAction, SettleMsg, SuggestionsMsg, Targets,
};
