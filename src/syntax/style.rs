//! Display styles and style tables
//!
//! A [`StyleTable`] maps category names to styles. Several tables
//! (profiles) can be registered in [`StyleProfiles`] with one active at a
//! time. Lookups never fail: categories a table does not know get the
//! table's fallback style.

use std::collections::HashMap;

use super::category::Category;
use crate::error::{Error, Result};

/// Text colors: the ANSI 16-color palette plus 24-bit RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a color name (`"bright-blue"`) or hex triplet (`"#3674ba"`)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let name = s.to_lowercase().replace(['-', '_', ' '], "");
        let color = match name.as_str() {
            "default" => Color::Default,
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "brightblack" | "gray" | "grey" => Color::BrightBlack,
            "brightred" => Color::BrightRed,
            "brightgreen" => Color::BrightGreen,
            "brightyellow" => Color::BrightYellow,
            "brightblue" => Color::BrightBlue,
            "brightmagenta" => Color::BrightMagenta,
            "brightcyan" => Color::BrightCyan,
            "brightwhite" => Color::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Reverse video (swap fg/bg)
    pub reverse: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Create a 24-bit foreground style
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::fg(Color::Rgb(r, g, b))
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Builder: set underline
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A named mapping from category to style
#[derive(Debug, Clone)]
pub struct StyleTable {
    name: String,
    styles: HashMap<Category, Style>,
    fallback: Style,
}

impl StyleTable {
    /// Create an empty table; unknown categories use the terminal default
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            styles: HashMap::new(),
            fallback: Style::default(),
        }
    }

    /// Builder: add a category style
    pub fn with(mut self, category: &str, style: Style) -> Self {
        self.set(category, style);
        self
    }

    /// Builder: style for categories without an entry
    pub fn with_fallback(mut self, style: Style) -> Self {
        self.fallback = style;
        self
    }

    /// Set the style for a category
    pub fn set(&mut self, category: &str, style: Style) {
        self.styles.insert(Category::new(category), style);
    }

    /// Table name, e.g. `"Code::Blocks"`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Style for a category, falling back for unknown categories
    pub fn style_for(&self, category: &str) -> Style {
        self.styles.get(category).copied().unwrap_or(self.fallback)
    }

    /// Number of categories with an explicit style
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Registered style tables with one active
///
/// Switching profiles only affects rendering, never scanning.
#[derive(Debug, Clone)]
pub struct StyleProfiles {
    tables: Vec<StyleTable>,
    active: usize,
}

impl StyleProfiles {
    /// Create a profile set with `table` active
    pub fn new(table: StyleTable) -> Self {
        Self {
            tables: vec![table],
            active: 0,
        }
    }

    /// Register a table, replacing any table with the same name
    pub fn register(&mut self, table: StyleTable) {
        match self.tables.iter().position(|t| t.name == table.name) {
            Some(idx) => self.tables[idx] = table,
            None => self.tables.push(table),
        }
    }

    /// Make the named table active (case-insensitive)
    pub fn select(&mut self, name: &str) -> Result<()> {
        let idx = self
            .tables
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))?;
        self.active = idx;
        Ok(())
    }

    /// The active table
    pub fn active(&self) -> &StyleTable {
        &self.tables[self.active]
    }

    /// Style for a category in the active table
    pub fn style_for(&self, category: &str) -> Style {
        self.active().style_for(category)
    }

    /// Names of all registered tables, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

impl Default for StyleProfiles {
    fn default() -> Self {
        Self::new(StyleTable::new("Plain"))
    }
}
