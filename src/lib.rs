#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-autocomplete/")]

//! # bubbletea-autocomplete
//!
//! Autocomplete suggestion boxes for text fields, built as a component for
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) applications.
//!
//! ## Overview
//!
//! The crate binds a floating suggestion panel to one or more input fields and
//! handles everything between a keystroke and a selection:
//!
//! - **Debounced querying** against an application-supplied suggestion source
//! - **Per-field caching** with an empty-prefix short-circuit
//! - **Keyboard navigation** of the panel, with cancel and no wraparound
//! - **Pointer selection** that survives the blur a click causes
//! - **Resize handling** that keeps panels anchored below their fields
//!
//! Like every bubbletea component the engine follows the Elm Architecture:
//! events go in through `update()`, timers come back out as commands whose
//! messages are fed to `update()` again, and `view()` renders the panels.
//!
//! ## Components
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`autocomplete`] | The suggestion engine and its messages |
//! | [`document`] | The host surface: fields, focus, scroll, viewport |
//! | [`panel`] | The floating suggestion list |
//! | [`source`] | Suggestion sources and their one-shot responder |
//! | [`render`] | Suggestion items and row rendering |
//! | [`config`] | Plain-data configuration, loadable from TOML |
//! | [`key`] | Type-safe key bindings |
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_autocomplete::prelude::*;
//!
//! let mut doc = Document::new();
//! let city = doc.add_field(Field::new(Rect::new(0, 2, 30, 1)).with_class("city"));
//!
//! let options = Options::new(".city", StaticSource::new(["Berlin", "Bern", "Bonn"]))
//!     .with_config(Config::default().with_min_chars(2))
//!     .on_select(|event| println!("selected {}", event.value));
//!
//! let engine = Engine::new(options, doc);
//! assert_eq!(engine.fields(), vec![city]);
//! ```

pub mod autocomplete;
pub mod config;
pub mod document;
pub mod error;
pub mod key;
pub mod panel;
pub mod render;
pub mod selector;
pub mod source;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// - `focus()` sets the focused state and may return a command, for example a
///   query started by focusing an empty field
/// - `blur()` unsets it
/// - `focused()` reports it
///
/// ```rust
/// use bubbletea_autocomplete::prelude::*;
///
/// fn toggle<T: Component>(component: &mut T) {
///     if component.focused() {
///         component.blur();
///     } else {
///         let _cmd = component.focus();
///     }
/// }
///
/// let mut doc = Document::new();
/// let field = doc.add_field(Field::new(Rect::new(0, 0, 10, 1)));
/// let mut engine = Engine::new(Options::new(field, StaticSource::default()), doc);
/// toggle(&mut engine);
/// assert!(engine.focused());
/// toggle(&mut engine);
/// assert!(!engine.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred state.
    fn blur(&mut self);

    /// Returns the current focus state.
    fn focused(&self) -> bool;
}

pub use autocomplete::{Engine, Options, SelectEvent, SelectTrigger, Targets};
pub use config::{Config, ScrollBehavior};
pub use error::{Error, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::autocomplete::{
        Engine, FieldEvent, FieldMsg, Options, PointerMsg, ResizeMsg, SelectEvent, SelectTrigger,
        Targets,
    };
    pub use crate::config::{Config, ScrollBehavior};
    pub use crate::document::{Document, Field, FieldId, Rect};
    pub use crate::key::{Binding, KeyMap, KeyPress};
    pub use crate::panel::{Panel, PanelStyles};
    pub use crate::render::Suggestion;
    pub use crate::source::{FuzzySource, Responder, StaticSource, SuggestionSource};
    pub use crate::Component;
}
