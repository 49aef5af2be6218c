//! Error types for configuration loading and selector parsing.
//!
//! The event path of the suggestion engine never fails: a missing target, a
//! source that never answers, or a bad delay simply produce no suggestions.
//! Errors only surface from the fallible setup helpers.

use thiserror::Error;

/// Errors produced while loading configuration or parsing target selectors.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A target selector could not be parsed.
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
