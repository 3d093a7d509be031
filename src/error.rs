//! Error types for linemark

use thiserror::Error;

/// Result type alias for linemark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration problems found while building a rule set
///
/// These are the only failures the engine knows about. Once a
/// [`RuleSet`](crate::syntax::RuleSet) exists, scanning cannot fail.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid pattern `{pattern}` for {category}: {source}")]
    InvalidPattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern `{pattern}` for {category} matches the empty string")]
    EmptyMatch { category: String, pattern: String },

    #[error("Keyword class {0} contains an empty word")]
    EmptyKeyword(String),
}

/// Application error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid rules: {0}")]
    Rules(#[from] RuleError),

    #[error("Invalid language file {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid language definition {origin}: {message}")]
    Language { origin: String, message: String },

    #[error("Unknown language mode: {0}")]
    UnknownMode(String),

    #[error("Unknown style profile: {0}")]
    UnknownProfile(String),
}
