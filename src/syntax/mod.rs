//! Syntax highlighting engine
//!
//! Lines are classified into spans of named categories by a
//! [`RuleSet`]. Constructs that span lines (block comments, unterminated
//! strings) are tracked through an explicit [`ScanState`] carried from
//! one line to the next, and a [`TokenMarker`] keeps a document's spans
//! up to date as lines are edited. [`StyleProfiles`] turn categories
//! into display styles.

pub mod builtin;
mod category;
mod language;
mod manager;
mod marker;
mod rules;
mod scanner;
mod style;

pub use category::{Category, Span, PLAIN};
pub use language::LanguageMode;
pub use manager::ModeRegistry;
pub use marker::{Rescan, TokenMarker};
pub use rules::{
    BlockId, BlockRule, BlockSpec, IdentifierChars, KeywordClass, PatternToken, RuleMatch,
    RuleSet, RuleSetBuilder, ScanState, SymbolClass,
};
pub use scanner::{scan_line, LineTokens};
pub use style::{Color, Style, StyleProfiles, StyleTable};
