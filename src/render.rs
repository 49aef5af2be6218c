//! Suggestion items and row rendering.
//!
//! A render function turns one [`Suggestion`] plus the text that produced it
//! into the markup of a panel row. The default renderer highlights every
//! occurrence of each space-separated search term, case-insensitively, with
//! the search text's regex metacharacters escaped first.

use lipgloss_extras::prelude::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Mutex;

/// A single suggestion returned by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    value: String,
    label: Option<String>,
}

impl Suggestion {
    /// A suggestion whose label is its value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    /// A suggestion displayed with a different label than the value it inserts.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The text written into the field when selected.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The text shown in the panel.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }

    pub(crate) fn stripped(&self) -> Self {
        Self {
            value: strip(&self.value),
            label: self.label.as_deref().map(strip),
        }
    }
}

fn strip(s: &str) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(s)).into_owned()
}

impl From<&str> for Suggestion {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Suggestion {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Maps `(item, search_text)` to row markup.
pub type RenderFn = Box<dyn Fn(&Suggestion, &str) -> String + Send>;

// The last compiled pattern; consecutive rows of one render share a query.
static LAST_PATTERN: Lazy<Mutex<Option<(String, Option<Regex>)>>> = Lazy::new(|| Mutex::new(None));

/// Builds the case-insensitive alternation for `search`, or `None` when there
/// is nothing to highlight.
pub fn highlight_pattern(search: &str) -> Option<Regex> {
    let terms: Vec<String> = search
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    if terms.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i)({})", terms.join("|"))).ok()
}

fn cached_pattern(search: &str) -> Option<Regex> {
    let Ok(mut last) = LAST_PATTERN.lock() else {
        return highlight_pattern(search);
    };
    if let Some((key, re)) = last.as_ref() {
        if key == search {
            return re.clone();
        }
    }
    let re = highlight_pattern(search);
    *last = Some((search.to_string(), re.clone()));
    re
}

/// Wraps every match of the search terms in `text` with `wrap`.
///
/// ```rust
/// use bubbletea_autocomplete::render::highlight_matches;
///
/// let out = highlight_matches("New York", "new (y", |m| format!("<b>{m}</b>"));
/// assert_eq!(out, "<b>New</b> York");
/// ```
pub fn highlight_matches(text: &str, search: &str, wrap: impl Fn(&str) -> String) -> String {
    match cached_pattern(search) {
        Some(re) => re
            .replace_all(text, |caps: &regex::Captures| wrap(&caps[0]))
            .into_owned(),
        None => text.to_string(),
    }
}

/// The default row renderer: the label with matched terms in bold.
pub fn default_render(item: &Suggestion, search: &str) -> String {
    let style = Style::new().bold(true).inline(true);
    highlight_matches(item.label(), search, |m| style.render(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold(m: &str) -> String {
        format!("<b>{m}</b>")
    }

    #[test]
    fn test_highlight_is_case_insensitive_and_global() {
        assert_eq!(
            highlight_matches("Cat catalog", "cat", bold),
            "<b>Cat</b> <b>cat</b>alog"
        );
    }

    #[test]
    fn test_highlight_splits_on_spaces() {
        assert_eq!(
            highlight_matches("San Francisco", "fran san", bold),
            "<b>San</b> <b>Fran</b>cisco"
        );
    }

    #[test]
    fn test_metacharacters_are_escaped() {
        assert_eq!(highlight_matches("a.b axb", "a.b", bold), "<b>a.b</b> axb");
        assert_eq!(highlight_matches("f(x)", "(x", bold), "f<b>(x</b>)");
    }

    #[test]
    fn test_blank_search_leaves_text() {
        assert_eq!(highlight_matches("abc", "  ", bold), "abc");
        assert!(highlight_pattern("").is_none());
    }

    #[test]
    fn test_label_defaults_to_value() {
        let plain = Suggestion::new("berlin");
        assert_eq!(plain.label(), "berlin");
        let labelled = Suggestion::new("BER").with_label("Berlin Brandenburg");
        assert_eq!(labelled.value(), "BER");
        assert_eq!(labelled.label(), "Berlin Brandenburg");
    }

    #[test]
    fn test_stripped_removes_escape_sequences() {
        let item = Suggestion::new("\x1b[31mred\x1b[0m");
        assert_eq!(item.stripped().value(), "red");
    }
}
