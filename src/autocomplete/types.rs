//! Messages, events and callback types of the suggestion engine.

use crate::config::ScrollBehavior;
use crate::document::FieldId;
use crate::key::KeyPress;
use crate::panel::PanelId;
use crate::render::Suggestion;
use bubbletea_rs::Msg;

/// Which fields the engine binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    /// Fields matching a selector such as `".city"` or `"#from, #to"`.
    Selector(String),
    /// Explicit field handles.
    Fields(Vec<FieldId>),
}

impl From<FieldId> for Targets {
    fn from(field: FieldId) -> Self {
        Targets::Fields(vec![field])
    }
}

impl From<&str> for Targets {
    fn from(selector: &str) -> Self {
        Targets::Selector(selector.to_string())
    }
}

/// What committed a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectTrigger {
    /// Enter on a marked row.
    Enter,
    /// Tab on a marked row.
    Tab,
    /// Pointer press on a row.
    Pointer,
}

/// Passed to selection callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectEvent {
    /// The field the panel belongs to.
    pub field: FieldId,
    /// The selected row's value.
    pub value: String,
    /// The selected row's index.
    pub row: usize,
    /// The selected suggestion.
    pub item: Suggestion,
    /// How the selection was made.
    pub trigger: SelectTrigger,
}

/// Selection callback.
pub type OnSelect = Box<dyn FnMut(&SelectEvent) + Send>;

/// Events a host forwards for one bound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// A key went down. Navigation keys are handled here.
    KeyDown(KeyPress),
    /// A key was released after the field's text was updated.
    KeyUp(KeyPress),
    /// The field gained focus.
    Focus,
    /// The field lost focus.
    Blur,
}

/// A [`FieldEvent`] addressed to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMsg {
    /// Target field.
    pub field: FieldId,
    /// What happened.
    pub event: FieldEvent,
}

/// Pointer activity over a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMsg {
    /// The pointer is over the panel, on a row or between rows.
    Over {
        /// The panel.
        panel: PanelId,
        /// The row under the pointer.
        row: Option<usize>,
    },
    /// The pointer left the panel.
    Leave {
        /// The panel.
        panel: PanelId,
    },
    /// A button was pressed over the panel.
    Down {
        /// The panel.
        panel: PanelId,
        /// The row under the pointer.
        row: Option<usize>,
    },
}

/// The window was resized or the layout moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeMsg;

/// Debounce timer expiry for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceMsg {
    /// Instance id.
    pub id: usize,
    /// Timer generation; stale generations are ignored.
    pub tag: usize,
}

/// A source answered a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionsMsg {
    /// Instance id.
    pub id: usize,
    /// The query that was answered.
    pub query: String,
    /// The ordered suggestions.
    pub items: Vec<Suggestion>,
}

/// Short follow-up steps run after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleAction {
    /// Hide the panel after a keyboard selection.
    HideAfterSelect,
    /// Drop the hover mark after the pointer left the panel, if `row` still
    /// carries it.
    ClearHoverMark {
        /// The row marked when the pointer left.
        row: usize,
    },
    /// Hide the panel once more after a blur.
    HideAfterBlur,
    /// Give focus back to the field after a blur during a pointer press.
    Refocus,
}

/// A settle timer expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleMsg {
    /// Instance id.
    pub id: usize,
    /// Generation, checked for [`SettleAction::ClearHoverMark`] only.
    pub tag: usize,
    /// What to do.
    pub action: SettleAction,
}

/// How far a visible panel runs past the viewport bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow {
    /// Lines below the viewport.
    pub lines: i32,
    /// How the host should compensate.
    pub behavior: ScrollBehavior,
}

impl From<FieldMsg> for Msg {
    fn from(msg: FieldMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<PointerMsg> for Msg {
    fn from(msg: PointerMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<ResizeMsg> for Msg {
    fn from(msg: ResizeMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<DebounceMsg> for Msg {
    fn from(msg: DebounceMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<SuggestionsMsg> for Msg {
    fn from(msg: SuggestionsMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<SettleMsg> for Msg {
    fn from(msg: SettleMsg) -> Self {
        Box::new(msg) as Msg
    }
}
