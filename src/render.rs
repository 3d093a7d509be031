//! Terminal output for highlighted documents
//!
//! Spans are painted with crossterm styling commands queued onto any
//! [`Write`] sink, so the same code drives stdout and in-memory buffers.

use std::fmt::Write as _;
use std::io::Write;

use crossterm::{
    queue,
    style::{self, Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use unicode_width::UnicodeWidthChar;

use crate::error::Result;
use crate::syntax::{Color, LineTokens, RuleSet, Style, StyleProfiles};

/// Paints scanned lines using the active style profile
pub struct Painter<'a> {
    profiles: &'a StyleProfiles,
    tab_width: usize,
    line_numbers: bool,
}

impl<'a> Painter<'a> {
    pub fn new(profiles: &'a StyleProfiles) -> Self {
        Self {
            profiles,
            tab_width: 8,
            line_numbers: false,
        }
    }

    /// Builder: set tab width (at least 1)
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.max(1);
        self
    }

    /// Builder: prefix each line with its 1-based number
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    /// Paint every line followed by a newline
    ///
    /// `tokens` must come from scanning `lines`; lines without tokens are
    /// written unstyled.
    pub fn paint<W: Write, S: AsRef<str>>(
        &self,
        out: &mut W,
        lines: &[S],
        tokens: &[LineTokens],
    ) -> Result<()> {
        let number_width = lines.len().max(1).to_string().len();

        for (idx, line) in lines.iter().enumerate() {
            if self.line_numbers {
                queue!(
                    out,
                    SetAttribute(Attribute::Dim),
                    Print(format!("{:>number_width$} ", idx + 1)),
                    SetAttribute(Attribute::Reset)
                )?;
            }
            match tokens.get(idx) {
                Some(line_tokens) => self.paint_line(out, line.as_ref(), line_tokens)?,
                None => {
                    let (expanded, _) = expand_tabs(line.as_ref(), 0, self.tab_width);
                    queue!(out, Print(expanded))?;
                }
            }
            queue!(out, Print("\n"))?;
        }

        out.flush()?;
        Ok(())
    }

    /// Paint one line's spans, without the trailing newline
    pub fn paint_line<W: Write>(&self, out: &mut W, text: &str, tokens: &LineTokens) -> Result<()> {
        let mut col = 0;
        for span in &tokens.spans {
            let (expanded, next_col) = expand_tabs(span.text(text), col, self.tab_width);
            col = next_col;

            let style = self.profiles.style_for(span.category.as_str());
            if style.is_default() {
                queue!(out, Print(expanded))?;
            } else {
                apply_style(out, &style)?;
                queue!(out, Print(expanded), SetAttribute(Attribute::Reset))?;
            }
        }
        Ok(())
    }
}

/// Queue the commands that switch the terminal to `style`
pub fn apply_style<W: Write>(out: &mut W, style: &Style) -> Result<()> {
    if style.fg != Color::Default {
        queue!(out, SetForegroundColor(to_crossterm(style.fg)))?;
    }
    if style.bg != Color::Default {
        queue!(out, SetBackgroundColor(to_crossterm(style.bg)))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if style.reverse {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}

/// Map a palette color onto crossterm's naming
///
/// crossterm calls the normal-intensity ANSI colors `Dark*` and the
/// bright ones by their plain names.
fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Default => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::BrightBlack => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
        Color::Rgb(r, g, b) => style::Color::Rgb { r, g, b },
    }
}

/// Expand tabs in `text` starting at display column `start_col`
///
/// Returns the expanded text and the column after it. Tab stops are
/// every `tab_width` columns, counted from the start of the line.
pub fn expand_tabs(text: &str, start_col: usize, tab_width: usize) -> (String, usize) {
    let tab_width = tab_width.max(1);
    let mut result = String::with_capacity(text.len());
    let mut col = start_col;

    for ch in text.chars() {
        if ch == '\t' {
            let spaces = tab_width - (col % tab_width);
            result.extend(std::iter::repeat(' ').take(spaces));
            col += spaces;
        } else {
            result.push(ch);
            col += UnicodeWidthChar::width(ch).unwrap_or(1);
        }
    }

    (result, col)
}

/// Split raw text into lines, accepting `\n` and `\r\n`
///
/// A trailing newline does not produce an extra empty line, but empty
/// text is still one (empty) line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        lines.push("");
    }
    lines
}

/// Describe every non-plain span, one per output line
///
/// Format: `line:start..end CATEGORY "text"`, followed by
/// `line: open CATEGORY` when the line ends inside a block.
pub fn format_spans<S: AsRef<str>>(rules: &RuleSet, lines: &[S], tokens: &[LineTokens]) -> String {
    let mut out = String::new();

    for (idx, (line, line_tokens)) in lines.iter().zip(tokens).enumerate() {
        let text = line.as_ref();
        for span in line_tokens.spans.iter().filter(|span| !span.category.is_plain()) {
            let _ = writeln!(
                out,
                "{}:{}..{} {} {:?}",
                idx + 1,
                span.start,
                span.end,
                span.category,
                span.text(text)
            );
        }
        if let Some(block) = line_tokens.exit.open_block().and_then(|id| rules.block(id)) {
            let _ = writeln!(out, "{}: open {}", idx + 1, block.category());
        }
    }

    out
}
