//! linemark - incremental line-based syntax highlighting
//!
//! A language is declared as a [`RuleSet`](syntax::RuleSet) of block,
//! keyword, pattern and symbol rules. Lines are scanned into category
//! spans one at a time, with an explicit [`ScanState`](syntax::ScanState)
//! carrying open blocks across line boundaries, and a
//! [`TokenMarker`](syntax::TokenMarker) re-scans only the lines an edit
//! can affect.

pub mod config;
pub mod error;
pub mod render;
pub mod syntax;

pub use error::{Error, Result, RuleError};
