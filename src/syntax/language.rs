//! Language modes
//!
//! A [`LanguageMode`] bundles a shared [`RuleSet`] with the file
//! extensions it applies to and the style profiles it ships with.
//! Modes are either built in (see `builtin`) or loaded from TOML files:
//!
//! ```toml
//! name = "GML"
//! extensions = ["gml"]
//!
//! [[block]]
//! category = "FORMAL_COMMENT"
//! start = '/\*'
//! followed_by = '\*'
//! end = '\*/'
//!
//! [[block]]
//! category = "LINE_COMMENT"
//! start = "//"          # no `end`: closes at end of line
//!
//! [[keywords]]
//! category = "CONSTRUCTS"
//! words = ["if", "else", "while"]
//!
//! [[pattern]]
//! category = "NUMERIC_LITERAL"
//! regex = "[0-9]+"
//!
//! [[symbols]]
//! category = "OPS_AND_SEPS"
//! chars = "{[()]};"
//!
//! [[profile]]
//! name = "Default"
//! styles.LINE_COMMENT = { fg = "#0d870d", italic = true }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;

use super::marker::TokenMarker;
use super::rules::{BlockSpec, RuleSet};
use super::style::{Color, Style, StyleProfiles, StyleTable};
use crate::error::{Error, Result};

/// A complete language mode for syntax highlighting
#[derive(Debug, Clone)]
pub struct LanguageMode {
    name: String,
    extensions: Vec<String>,
    rules: Arc<RuleSet>,
    profiles: StyleProfiles,
}

impl LanguageMode {
    /// Create a mode from a built rule set and its style profiles
    pub fn new(name: &str, rules: RuleSet, profiles: StyleProfiles) -> Self {
        Self {
            name: name.to_string(),
            extensions: Vec::new(),
            rules: Arc::new(rules),
            profiles,
        }
    }

    /// Builder: add file extensions
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions
            .extend(extensions.iter().map(|ext| ext.to_string()));
        self
    }

    /// Mode name, e.g. `"GML"`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File extensions (without the dot)
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Shared rule set
    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    /// Style profiles shipped with this mode
    pub fn profiles(&self) -> &StyleProfiles {
        &self.profiles
    }

    /// A fresh token marker for one document in this mode
    pub fn marker(&self) -> TokenMarker {
        TokenMarker::new(Arc::clone(&self.rules))
    }

    /// Load a mode from a TOML language file
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml(&source, &path.display().to_string())
    }

    /// Parse a mode from TOML source; `origin` names it in errors
    pub fn from_toml(source: &str, origin: &str) -> Result<Self> {
        let file: LanguageFile = toml::from_str(source).map_err(|err| Error::Toml {
            origin: origin.to_string(),
            source: err,
        })?;
        let mode = file.into_mode(origin)?;
        debug!("loaded language mode {} from {}", mode.name, origin);
        Ok(mode)
    }
}

/// On-disk shape of a language file
#[derive(Deserialize, Debug)]
struct LanguageFile {
    name: String,
    #[serde(default)]
    extensions: Vec<String>,
    identifier_chars: Option<String>,
    #[serde(default)]
    block: Vec<BlockDef>,
    #[serde(default)]
    keywords: Vec<KeywordsDef>,
    #[serde(default)]
    pattern: Vec<PatternDef>,
    #[serde(default)]
    symbols: Vec<SymbolsDef>,
    #[serde(default)]
    profile: Vec<ProfileDef>,
}

#[derive(Deserialize, Debug)]
struct BlockDef {
    category: String,
    start: String,
    followed_by: Option<String>,
    end: Option<String>,
    escape: Option<char>,
}

#[derive(Deserialize, Debug)]
struct KeywordsDef {
    category: String,
    words: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct PatternDef {
    category: String,
    regex: String,
}

#[derive(Deserialize, Debug)]
struct SymbolsDef {
    category: String,
    chars: String,
}

#[derive(Deserialize, Debug)]
struct ProfileDef {
    name: String,
    fallback: Option<StyleDef>,
    #[serde(default)]
    styles: HashMap<String, StyleDef>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct StyleDef {
    fg: Option<String>,
    bg: Option<String>,
    bold: bool,
    italic: bool,
    underline: bool,
    reverse: bool,
}

impl LanguageFile {
    fn into_mode(self, origin: &str) -> Result<LanguageMode> {
        let mut builder = RuleSet::builder();
        if let Some(extra) = &self.identifier_chars {
            builder = builder.identifier_chars(extra);
        }
        for block in &self.block {
            let mut spec = BlockSpec::new(&block.category, &block.start);
            if let Some(lookahead) = &block.followed_by {
                spec = spec.followed_by(lookahead);
            }
            if let Some(end) = &block.end {
                spec = spec.until(end);
            }
            if let Some(escape) = block.escape {
                spec = spec.escape(escape);
            }
            builder = builder.block(spec);
        }
        for class in self.keywords {
            builder = builder.keywords(&class.category, class.words);
        }
        for token in &self.pattern {
            builder = builder.pattern(&token.category, &token.regex);
        }
        for class in &self.symbols {
            builder = builder.symbols(&class.category, &class.chars);
        }
        let rules = builder.build()?;

        let mut profiles: Option<StyleProfiles> = None;
        for profile in &self.profile {
            let table = profile.to_table(origin)?;
            match profiles.as_mut() {
                Some(profiles) => profiles.register(table),
                None => profiles = Some(StyleProfiles::new(table)),
            }
        }

        let extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        Ok(LanguageMode::new(&self.name, rules, profiles.unwrap_or_default())
            .with_extensions(&extensions))
    }
}

impl ProfileDef {
    fn to_table(&self, origin: &str) -> Result<StyleTable> {
        let mut table = StyleTable::new(&self.name);
        if let Some(fallback) = &self.fallback {
            table = table.with_fallback(fallback.to_style(origin)?);
        }
        for (category, style) in &self.styles {
            table.set(category, style.to_style(origin)?);
        }
        Ok(table)
    }
}

impl StyleDef {
    fn to_style(&self, origin: &str) -> Result<Style> {
        Ok(Style {
            fg: parse_color(self.fg.as_deref(), origin)?,
            bg: parse_color(self.bg.as_deref(), origin)?,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            reverse: self.reverse,
        })
    }
}

fn parse_color(name: Option<&str>, origin: &str) -> Result<Color> {
    match name {
        None => Ok(Color::Default),
        Some(name) => Color::parse(name).ok_or_else(|| Error::Language {
            origin: origin.to_string(),
            message: format!("unknown color `{name}`"),
        }),
    }
}
