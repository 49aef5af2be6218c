//! The host surface the suggestion engine binds to.
//!
//! A [`Document`] owns the input fields of a screen (their text, caret,
//! geometry and attributes), the page scroll offset, the viewport size, the
//! active (focused) element and the container that floating panels are
//! appended to. The engine borrows fields by [`FieldId`] and hands the document
//! back on teardown.
//!
//! ```rust
//! use bubbletea_autocomplete::document::{Document, Field, Rect};
//!
//! let mut doc = Document::new();
//! let id = doc.add_field(Field::new(Rect::new(2, 1, 30, 1)).with_id("city"));
//! doc.field_mut(id).unwrap().insert_str("Ber");
//! assert_eq!(doc.field(id).unwrap().value(), "Ber");
//! ```

use crate::panel::PanelId;
use crate::selector::Selector;
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

/// Name of the native completion attribute the engine disables while bound.
pub const AUTOCOMPLETE_ATTR: &str = "autocomplete";

/// Handle to a field inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

/// A rectangle in viewport coordinates (cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle.
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The bottom edge.
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// A single-line text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    id: Option<String>,
    classes: Vec<String>,
    value: String,
    // Byte offset, always on a grapheme boundary.
    caret: usize,
    rect: Rect,
    attributes: BTreeMap<String, String>,
}

impl Field {
    /// Creates an empty field occupying `rect`.
    pub fn new(rect: Rect) -> Self {
        Self {
            id: None,
            classes: Vec::new(),
            value: String::new(),
            caret: 0,
            rect,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the id attribute.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Sets the initial value with the caret at the end.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Sets an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The id attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The class list.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Current text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Caret position as a byte offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Geometry relative to the viewport.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Moves or resizes the field.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Reads an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Writes an attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes an attribute, returning its old value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Replaces the text and moves the caret to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.caret = self.value.len();
    }

    /// Inserts text at the caret.
    pub fn insert_str(&mut self, s: &str) {
        self.value.insert_str(self.caret, s);
        self.caret += s.len();
    }

    /// Deletes the grapheme before the caret.
    pub fn backspace(&mut self) {
        if let Some(start) = self.prev_boundary() {
            self.value.replace_range(start..self.caret, "");
            self.caret = start;
        }
    }

    /// Deletes the grapheme after the caret.
    pub fn delete(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.value.replace_range(self.caret..end, "");
        }
    }

    /// Moves the caret one grapheme left.
    pub fn move_left(&mut self) {
        if let Some(start) = self.prev_boundary() {
            self.caret = start;
        }
    }

    /// Moves the caret one grapheme right.
    pub fn move_right(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.caret = end;
        }
    }

    /// Moves the caret to the start.
    pub fn move_home(&mut self) {
        self.caret = 0;
    }

    /// Moves the caret to the end.
    pub fn move_end(&mut self) {
        self.caret = self.value.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.caret]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.caret..]
            .graphemes(true)
            .next()
            .map(|g| self.caret + g.len())
    }
}

/// The host surface: fields, focus, scroll, viewport and the panel container.
#[derive(Debug, Clone)]
pub struct Document {
    fields: Vec<Field>,
    container: Vec<PanelId>,
    active: Option<FieldId>,
    scroll: (i32, i32),
    viewport: (i32, i32),
    queryable: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with an 80x24 viewport.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            container: Vec::new(),
            active: None,
            scroll: (0, 0),
            viewport: (80, 24),
            queryable: true,
        }
    }

    /// Creates a document that cannot answer selector queries.
    pub fn without_query() -> Self {
        Self {
            queryable: false,
            ..Self::new()
        }
    }

    /// Adds a field and returns its handle.
    pub fn add_field(&mut self, field: Field) -> FieldId {
        self.fields.push(field);
        FieldId(self.fields.len() - 1)
    }

    /// Looks up a field.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.0)
    }

    /// Looks up a field mutably.
    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.get_mut(id.0)
    }

    /// Every field handle in document order.
    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> {
        (0..self.fields.len()).map(FieldId)
    }

    /// Whether the document can run selector queries. Engines bind nothing to
    /// a document that cannot.
    pub fn is_queryable(&self) -> bool {
        self.queryable
    }

    /// Handles of the fields matching `selector`, in document order. Returns
    /// `None` when the document cannot run queries.
    pub fn query_selector_all(&self, selector: &Selector) -> Option<Vec<FieldId>> {
        if !self.queryable {
            return None;
        }
        Some(
            self.fields
                .iter()
                .enumerate()
                .filter(|(_, f)| selector.matches(f.id(), f.classes()))
                .map(|(i, _)| FieldId(i))
                .collect(),
        )
    }

    /// The focused field.
    pub fn active(&self) -> Option<FieldId> {
        self.active
    }

    /// Focuses a field.
    pub fn focus(&mut self, id: FieldId) {
        if self.field(id).is_some() {
            self.active = Some(id);
        }
    }

    /// Clears focus.
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Page scroll offsets `(x, y)`.
    pub fn scroll(&self) -> (i32, i32) {
        self.scroll
    }

    /// Sets the page scroll offsets.
    pub fn set_scroll(&mut self, x: i32, y: i32) {
        self.scroll = (x, y);
    }

    /// Viewport size `(width, height)`.
    pub fn viewport(&self) -> (i32, i32) {
        self.viewport
    }

    /// Sets the viewport size.
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.viewport = (width, height);
    }

    /// Panels currently attached to the container, in append order.
    pub fn panels(&self) -> &[PanelId] {
        &self.container
    }

    pub(crate) fn append_panel(&mut self, panel: PanelId) {
        self.container.push(panel);
    }

    pub(crate) fn remove_panel(&mut self, panel: PanelId) -> bool {
        let before = self.container.len();
        self.container.retain(|p| *p != panel);
        before != self.container.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_editing_is_grapheme_aware() {
        let mut field = Field::new(Rect::default()).with_value("cafe\u{301}");
        field.backspace();
        assert_eq!(field.value(), "caf");
        field.move_home();
        field.delete();
        assert_eq!(field.value(), "af");
        field.move_right();
        field.insert_str("X");
        assert_eq!(field.value(), "aXf");
        assert_eq!(field.caret(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut field = Field::new(Rect::default()).with_value("ab");
        field.move_home();
        field.backspace();
        assert_eq!(field.value(), "ab");
    }

    #[test]
    fn test_query_selector_all() {
        let mut doc = Document::new();
        let a = doc.add_field(Field::new(Rect::default()).with_class("ac"));
        let _b = doc.add_field(Field::new(Rect::default()));
        let c = doc.add_field(Field::new(Rect::default()).with_id("c"));
        let sel = Selector::parse(".ac, #c").unwrap();
        assert_eq!(doc.query_selector_all(&sel), Some(vec![a, c]));
    }

    #[test]
    fn test_without_query() {
        let mut doc = Document::without_query();
        doc.add_field(Field::new(Rect::default()));
        let sel = Selector::parse("*").unwrap();
        assert_eq!(doc.query_selector_all(&sel), None);
        assert!(!doc.is_queryable());
        assert!(Document::new().is_queryable());
    }

    #[test]
    fn test_focus_unknown_field_is_ignored() {
        let mut doc = Document::new();
        doc.focus(FieldId(3));
        assert_eq!(doc.active(), None);
    }
}
