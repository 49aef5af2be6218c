//! The floating suggestion panel shown below a field.
//!
//! A panel holds typed row descriptors instead of markup to be searched: each
//! [`Row`] knows its index, the [`Suggestion`] it stands for, and its rendered
//! markup. At most one row carries the selected mark, shared by keyboard
//! navigation and pointer hover.

use crate::document::Rect;
use crate::render::Suggestion;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use unicode_width::UnicodeWidthChar;

/// Class every panel carries.
pub const PANEL_CLASS: &str = "autocomplete-suggestions";

static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

/// Identifies a panel in the document container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelId(usize);

/// One rendered suggestion row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Position in render order.
    pub index: usize,
    /// The suggestion the row stands for.
    pub item: Suggestion,
    /// Rendered markup, possibly several lines.
    pub markup: String,
}

impl Row {
    /// Height in lines.
    pub fn height(&self) -> usize {
        self.markup.lines().count().max(1)
    }
}

/// Styles used by [`Panel::view`].
#[derive(Debug, Clone)]
pub struct PanelStyles {
    /// Unselected rows.
    pub row: Style,
    /// The selected row.
    pub selected: Style,
}

impl Default for PanelStyles {
    fn default() -> Self {
        Self {
            row: Style::new()
                .background(Color::from("236"))
                .foreground(Color::from("252")),
            selected: Style::new()
                .background(Color::from("62"))
                .foreground(Color::from("230")),
        }
    }
}

/// A floating list of suggestion rows anchored below a field.
#[derive(Debug, Clone)]
pub struct Panel {
    /// Row styles.
    pub styles: PanelStyles,
    id: PanelId,
    classes: Vec<String>,
    visible: bool,
    rect: Rect,
    rows: Vec<Row>,
    selected: Option<usize>,
    scroll_top: usize,
    max_height: Option<usize>,
    row_height: Option<usize>,
}

impl Panel {
    /// Creates a hidden, empty panel.
    pub fn new(menu_class: &str) -> Self {
        let mut panel = Self {
            styles: PanelStyles::default(),
            id: PanelId(next_id()),
            classes: Vec::new(),
            visible: false,
            rect: Rect::default(),
            rows: Vec::new(),
            selected: None,
            scroll_top: 0,
            max_height: None,
            row_height: None,
        };
        panel.set_menu_class(menu_class);
        panel
    }

    /// The panel's id.
    pub fn id(&self) -> PanelId {
        self.id
    }

    /// The class list: the base class followed by the menu classes.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Replaces the menu classes.
    pub fn set_menu_class(&mut self, menu_class: &str) {
        self.classes = std::iter::once(PANEL_CLASS)
            .chain(menu_class.split_whitespace())
            .map(str::to_string)
            .collect();
    }

    /// Whether the panel is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Hides the panel; rows and selection are kept.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Position and size in page coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows in render order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Replaces all rows, dropping the selection.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.selected = None;
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.set_rows(Vec::new());
    }

    /// Index of the row carrying the selected mark.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The row carrying the selected mark.
    pub fn selected_row(&self) -> Option<&Row> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    /// Moves the selected mark; out-of-range indices clear it.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.rows.len());
    }

    /// First visible line.
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Cached maximum height in lines, known once the panel was shown.
    pub fn max_height(&self) -> Option<usize> {
        self.max_height
    }

    /// Cached row height in lines, taken from the first rendered row.
    pub fn row_height(&self) -> Option<usize> {
        self.row_height
    }

    /// Total height of all rows in lines.
    pub fn content_height(&self) -> usize {
        self.rows.iter().map(Row::height).sum()
    }

    /// Height of the visible band in lines.
    pub fn visible_height(&self) -> usize {
        let content = self.content_height();
        match self.max_height {
            Some(max) => content.min(max),
            None => content,
        }
    }

    /// Anchors the panel at `left`/`top` with the given width.
    pub(crate) fn place(&mut self, left: i32, top: i32, width: i32) {
        self.rect = Rect::new(left, top, width, self.visible_height() as i32);
    }

    /// Caches the maximum height and row height the first time they are known.
    pub(crate) fn measure(&mut self, max_height: usize) {
        if self.max_height.is_none() {
            self.max_height = Some(max_height);
        }
        if self.row_height.is_none() {
            self.row_height = self.rows.first().map(Row::height);
        }
        self.rect.height = self.visible_height() as i32;
    }

    /// Adjusts the scroll offset. Without a target row the panel scrolls to the
    /// top; otherwise only as far as needed to show the whole row.
    pub(crate) fn scroll_to(&mut self, target: Option<usize>) {
        let Some(row_height) = self.row_height else {
            return;
        };
        let Some(index) = target else {
            self.scroll_top = 0;
            return;
        };
        let max_height = self.max_height.unwrap_or(usize::MAX) as i64;
        let scroll_top = self.scroll_top as i64;
        let row_top = self.row_top(index) as i64 - scroll_top;
        let row_height = row_height as i64;
        if row_top + row_height - max_height > 0 {
            self.scroll_top = (row_top + row_height + scroll_top - max_height).max(0) as usize;
        } else if row_top < 0 {
            self.scroll_top = (row_top + scroll_top).max(0) as usize;
        }
    }

    fn row_top(&self, index: usize) -> usize {
        self.rows.iter().take(index).map(Row::height).sum()
    }

    /// Renders the visible band of rows, each line padded to the panel width.
    pub fn view(&self) -> String {
        if !self.visible {
            return String::new();
        }
        let width = self.rect.width.max(0) as usize;
        let lines = self.rows.iter().flat_map(|row| {
            let style = if self.selected == Some(row.index) {
                &self.styles.selected
            } else {
                &self.styles.row
            };
            row.markup
                .lines()
                .map(move |line| style.clone().inline(true).render(&fit(line, width)))
        });
        lines
            .skip(self.scroll_top)
            .take(self.visible_height())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// Pads to `width`; plain lines wider than `width` are cut at a character boundary.
fn fit(line: &str, width: usize) -> String {
    let visible = lipgloss::width_visible(line);
    if visible <= width {
        return format!("{}{}", line, " ".repeat(width - visible));
    }
    if line.contains('\x1b') {
        return line.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(&" ".repeat(width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row {
                index: i,
                item: Suggestion::new(format!("item{i}")),
                markup: format!("item{i}"),
            })
            .collect()
    }

    fn shown(n: usize, max_height: usize) -> Panel {
        let mut panel = Panel::new("");
        panel.set_rows(rows(n));
        panel.measure(max_height);
        panel.set_visible(true);
        panel.place(0, 0, 10);
        panel
    }

    #[test]
    fn test_classes_include_menu_class() {
        let mut panel = Panel::new("dark wide");
        assert_eq!(panel.classes(), &[PANEL_CLASS, "dark", "wide"]);
        panel.set_menu_class("");
        assert_eq!(panel.classes(), &[PANEL_CLASS]);
    }

    #[test]
    fn test_unique_ids() {
        assert_ne!(Panel::new("").id(), Panel::new("").id());
    }

    #[test]
    fn test_select_out_of_range_clears() {
        let mut panel = shown(3, 10);
        panel.select(Some(1));
        assert_eq!(panel.selected_row().map(|r| r.index), Some(1));
        panel.select(Some(7));
        assert_eq!(panel.selected(), None);
    }

    #[test]
    fn test_scroll_moves_minimally() {
        let mut panel = shown(10, 4);
        for i in 0..4 {
            panel.scroll_to(Some(i));
            assert_eq!(panel.scroll_top(), 0);
        }
        panel.scroll_to(Some(4));
        assert_eq!(panel.scroll_top(), 1);
        panel.scroll_to(Some(9));
        assert_eq!(panel.scroll_top(), 6);
        // Rows already inside the band leave the offset alone.
        panel.scroll_to(Some(7));
        assert_eq!(panel.scroll_top(), 6);
        panel.scroll_to(Some(2));
        assert_eq!(panel.scroll_top(), 2);
        panel.scroll_to(None);
        assert_eq!(panel.scroll_top(), 0);
    }

    #[test]
    fn test_row_height_from_first_row() {
        let mut panel = Panel::new("");
        panel.set_rows(vec![Row {
            index: 0,
            item: Suggestion::new("a"),
            markup: "a\nsub".to_string(),
        }]);
        panel.measure(10);
        assert_eq!(panel.row_height(), Some(2));
        assert_eq!(panel.max_height(), Some(10));
    }

    #[test]
    fn test_view_shows_visible_band() {
        let mut panel = shown(6, 3);
        panel.scroll_to(Some(4));
        let view = panel.view();
        assert_eq!(view.lines().count(), 3);
        assert!(view.contains("item2"));
        assert!(view.contains("item4"));
        assert!(!view.contains("item1"));
    }

    #[test]
    fn test_hidden_panel_renders_nothing() {
        let mut panel = shown(2, 3);
        panel.hide();
        assert_eq!(panel.view(), "");
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abcd");
        assert_eq!(fit("日本語", 5), "日本 ");
    }
}
