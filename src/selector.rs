//! Target selectors for picking fields out of a [`Document`](crate::document::Document).
//!
//! Supported forms: `#name` (field id), `.class`, `input` or `*` (every field),
//! and comma-separated lists of those.

use crate::error::{Error, Result};

/// One simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simple {
    /// Matches a field by its id attribute.
    Id(String),
    /// Matches fields carrying the class.
    Class(String),
    /// Matches every field.
    Any,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Simple>,
}

impl Selector {
    /// Parses a selector list.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = Vec::new();
        for raw in s.split(',') {
            let raw = raw.trim();
            let simple = if let Some(id) = raw.strip_prefix('#') {
                Simple::Id(ident(id, raw)?)
            } else if let Some(class) = raw.strip_prefix('.') {
                Simple::Class(ident(class, raw)?)
            } else if raw == "*" || raw == "input" {
                Simple::Any
            } else {
                return Err(Error::Selector(s.to_string()));
            };
            parts.push(simple);
        }
        Ok(Self { parts })
    }

    /// Whether a field with the given id and classes matches.
    pub fn matches(&self, id: Option<&str>, classes: &[String]) -> bool {
        self.parts.iter().any(|part| match part {
            Simple::Id(want) => id == Some(want.as_str()),
            Simple::Class(want) => classes.iter().any(|c| c == want),
            Simple::Any => true,
        })
    }
}

fn ident(name: &str, raw: &str) -> Result<String> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(name.to_string())
    } else {
        Err(Error::Selector(raw.to_string()))
    }
}
