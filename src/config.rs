//! Engine configuration.
//!
//! `Config` carries every plain-data option of the suggestion engine. It can be
//! built in code with the fluent `with_*` methods or deserialized from TOML:
//!
//! ```rust
//! use bubbletea_autocomplete::config::{Config, ScrollBehavior};
//!
//! let config = Config::from_toml_str(
//!     r#"
//! min_chars = 2
//! delay = 250
//! cache = false
//! menu_class = "dark wide"
//! scroll_behavior = "pad"
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.min_chars, 2);
//! assert_eq!(config.scroll_behavior, ScrollBehavior::Pad);
//!
//! let built = Config::default().with_min_chars(2).with_delay(250);
//! assert_eq!(built.delay(), std::time::Duration::from_millis(250));
//! ```
//!
//! The callbacks (source, render function, selection callback) are not plain
//! data and live on [`crate::autocomplete::Options`] instead.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// How the host compensates when an open panel runs past the viewport bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Do nothing; the panel may be clipped.
    #[default]
    None,
    /// Pad the page below the content so the panel fits.
    Pad,
    /// Scroll the page so the panel fits.
    Scroll,
}

/// Plain-data configuration shared by every bound field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum number of characters before a query is issued. Zero also
    /// queries on focus with an empty field.
    pub min_chars: usize,
    /// Debounce delay in milliseconds. Negative values behave as zero.
    pub delay: i64,
    /// Memoize responses per query and short-circuit on empty prefixes.
    pub cache: bool,
    /// Extra space-separated class names applied to every panel.
    pub menu_class: String,
    /// Horizontal panel offset relative to the field.
    pub offset_left: i32,
    /// Vertical panel offset relative to the field's bottom edge.
    pub offset_top: i32,
    /// Maximum visible panel height in lines.
    pub max_height: usize,
    /// Maximum number of suggestions kept from a response. Zero or less
    /// keeps everything.
    pub suggestion_limit: i32,
    /// Render item text as-is, escape sequences included. When false, ANSI
    /// sequences are stripped from item text first.
    pub item_as_markup: bool,
    /// Page compensation when the panel overflows the viewport.
    pub scroll_behavior: ScrollBehavior,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_chars: 3,
            delay: 150,
            cache: true,
            menu_class: String::new(),
            offset_left: 0,
            offset_top: 1,
            max_height: 10,
            suggestion_limit: 0,
            item_as_markup: false,
            scroll_behavior: ScrollBehavior::None,
        }
    }
}

impl Config {
    /// Parses a configuration from a TOML document. Missing keys keep their
    /// defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// The debounce delay, clamped at zero.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay.max(0) as u64)
    }

    /// The effective suggestion limit, `None` meaning unlimited.
    pub fn limit(&self) -> Option<usize> {
        if self.suggestion_limit > 0 {
            Some(self.suggestion_limit as usize)
        } else {
            None
        }
    }

    /// The individual menu class names.
    pub fn menu_classes(&self) -> impl Iterator<Item = &str> {
        self.menu_class.split_whitespace()
    }

    /// Adds one or more space-separated class names, skipping duplicates.
    pub fn add_menu_class(&mut self, names: &str) {
        let mut classes: Vec<String> = self.menu_classes().map(str::to_string).collect();
        for name in names.split_whitespace() {
            if !classes.iter().any(|c| c == name) {
                classes.push(name.to_string());
            }
        }
        self.menu_class = classes.join(" ");
    }

    /// Removes one or more space-separated class names.
    pub fn remove_menu_class(&mut self, names: &str) {
        let removed: Vec<&str> = names.split_whitespace().collect();
        let classes: Vec<&str> = self
            .menu_classes()
            .filter(|c| !removed.contains(c))
            .collect();
        self.menu_class = classes.join(" ");
    }

    /// Sets the minimum character threshold.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Sets the debounce delay in milliseconds.
    pub fn with_delay(mut self, delay: i64) -> Self {
        self.delay = delay;
        self
    }

    /// Enables or disables response caching.
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Adds menu class names to every panel.
    pub fn with_menu_class(mut self, names: &str) -> Self {
        self.add_menu_class(names);
        self
    }

    /// Sets the panel offsets relative to the field.
    pub fn with_offset(mut self, left: i32, top: i32) -> Self {
        self.offset_left = left;
        self.offset_top = top;
        self
    }

    /// Sets the maximum visible panel height in lines.
    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    /// Sets the suggestion limit. Zero or less disables it.
    pub fn with_suggestion_limit(mut self, limit: i32) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Renders items as markup instead of plain text.
    pub fn with_item_as_markup(mut self, item_as_markup: bool) -> Self {
        self.item_as_markup = item_as_markup;
        self
    }

    /// Sets the viewport overflow compensation.
    pub fn with_scroll_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.scroll_behavior = behavior;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_widget() {
        let config = Config::default();
        assert_eq!(config.min_chars, 3);
        assert_eq!(config.delay(), Duration::from_millis(150));
        assert!(config.cache);
        assert_eq!(config.offset_top, 1);
        assert_eq!(config.limit(), None);
        assert_eq!(config.scroll_behavior, ScrollBehavior::None);
    }

    #[test]
    fn test_negative_delay_is_zero() {
        let config = Config::default().with_delay(-40);
        assert_eq!(config.delay(), Duration::ZERO);
    }

    #[test]
    fn test_limit() {
        assert_eq!(Config::default().with_suggestion_limit(-1).limit(), None);
        assert_eq!(Config::default().with_suggestion_limit(5).limit(), Some(5));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("delay = 20\nscroll_behavior = \"scroll\"").unwrap();
        assert_eq!(config.delay, 20);
        assert_eq!(config.min_chars, 3);
        assert_eq!(config.scroll_behavior, ScrollBehavior::Scroll);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("min_chars = \"three\"").unwrap_err();
        assert!(matches!(err, crate::error::Error::Config(_)));
    }

    #[test]
    fn test_menu_class_add_remove() {
        let mut config = Config::default().with_menu_class("dark  wide");
        config.add_menu_class("wide tall");
        assert_eq!(config.menu_class, "dark wide tall");
        config.remove_menu_class("dark tall");
        assert_eq!(config.menu_class, "wide");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/autocomplete.toml").unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
