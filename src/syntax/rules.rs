//! Rule families and the rule set that resolves them
//!
//! A [`RuleSet`] is built once per language mode through
//! [`RuleSetBuilder`] and is read-only afterwards. Declaration order is
//! preserved inside every rule family because ambiguity is resolved by
//! it: the first block rule, keyword class, pattern token or symbol
//! class that matches wins.

use std::collections::HashSet;

use log::debug;
use regex::Regex;

use super::category::Category;
use crate::error::RuleError;

/// Index of a block rule inside its rule set
pub type BlockId = usize;

/// Scan state carried from the end of one line into the next
///
/// At most one block rule is open at a line boundary; blocks do not nest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScanState {
    open: Option<BlockId>,
}

impl ScanState {
    /// State with no open block (the state before line 0)
    pub const NONE: ScanState = ScanState { open: None };

    /// Create state for being inside a block rule
    pub fn inside(block: BlockId) -> Self {
        Self { open: Some(block) }
    }

    /// The open block rule, if any
    pub fn open_block(&self) -> Option<BlockId> {
        self.open
    }

    /// Check if a block is open
    pub fn is_inside_block(&self) -> bool {
        self.open.is_some()
    }

    /// Check if we're in plain (no open block) state
    pub fn is_normal(&self) -> bool {
        self.open.is_none()
    }
}

/// Compile `pattern` so it only matches at the start of the haystack
fn anchored(category: &str, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(&format!(r"\A(?:{pattern})")).map_err(|source| RuleError::InvalidPattern {
        category: category.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

fn unanchored(category: &str, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
        category: category.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

/// Reject patterns whose match could never advance the scan
fn require_progress(category: &str, pattern: &str, regex: &Regex) -> Result<(), RuleError> {
    if regex.is_match("") {
        return Err(RuleError::EmptyMatch {
            category: category.to_string(),
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

/// How a block rule ends
#[derive(Debug)]
enum BlockEnd {
    /// Region ends after the next match of this pattern, possibly on a later line
    Pattern(Regex),
    /// Region always ends at the end of the line it started on
    EndOfLine,
}

/// A region bounded by independent start and end patterns
#[derive(Debug)]
pub struct BlockRule {
    category: Category,
    start: Regex,
    followed_by: Option<Regex>,
    end: BlockEnd,
    escape: Option<char>,
}

impl BlockRule {
    /// Category assigned to the whole region
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Whether the region always closes at the end of its line
    pub fn is_line_terminated(&self) -> bool {
        matches!(self.end, BlockEnd::EndOfLine)
    }

    /// Match the start pattern exactly at `pos`, returning the offset after it
    ///
    /// The optional lookahead must match right after the start text but is
    /// not consumed, so the end pattern is searched from the returned offset.
    pub fn match_start(&self, text: &str, pos: usize) -> Option<usize> {
        let m = self.start.find(&text[pos..])?;
        if m.is_empty() {
            return None;
        }
        let after = pos + m.end();
        match &self.followed_by {
            Some(lookahead) if !lookahead.is_match(&text[after..]) => None,
            _ => Some(after),
        }
    }

    /// Find the end of this region searching from `from`, respecting escapes
    ///
    /// Returns the offset just past the end text. Line-terminated rules
    /// always end at the line length.
    pub fn find_end(&self, text: &str, from: usize) -> Option<usize> {
        let end = match &self.end {
            BlockEnd::EndOfLine => return Some(text.len()),
            BlockEnd::Pattern(end) => end,
        };

        let mut pos = from;
        while pos <= text.len() {
            let m = end.find_at(text, pos)?;
            if self.is_escaped(&text[from..m.start()]) {
                // Skip past the escaped delimiter (at least one char)
                pos = match text[m.start()..].chars().next() {
                    Some(ch) => m.end().max(m.start() + ch.len_utf8()),
                    None => return None,
                };
                continue;
            }
            return Some(m.end());
        }
        None
    }

    /// Odd number of trailing escape chars means the next char is escaped
    fn is_escaped(&self, preceding: &str) -> bool {
        match self.escape {
            Some(escape) => preceding.chars().rev().take_while(|&c| c == escape).count() % 2 == 1,
            None => false,
        }
    }
}

/// A set of exact words sharing one category
#[derive(Debug)]
pub struct KeywordClass {
    category: Category,
    words: HashSet<String>,
}

impl KeywordClass {
    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Single characters that each form a one-character token
#[derive(Debug)]
pub struct SymbolClass {
    category: Category,
    chars: HashSet<char>,
}

impl SymbolClass {
    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }
}

/// A regex literal matched only at the current scan position
#[derive(Debug)]
pub struct PatternToken {
    category: Category,
    pattern: Regex,
}

impl PatternToken {
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Offset just past a non-empty match starting at `pos`
    pub fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        self.pattern
            .find(&text[pos..])
            .filter(|m| !m.is_empty())
            .map(|m| pos + m.end())
    }
}

/// Characters that make up identifiers (keyword candidates)
///
/// Alphanumerics and `_` always count; languages may add more. Digits
/// never start an identifier so numeric literals reach the pattern tokens.
#[derive(Debug, Clone, Default)]
pub struct IdentifierChars {
    extra: Vec<char>,
}

impl IdentifierChars {
    pub fn with_extra(extra: impl IntoIterator<Item = char>) -> Self {
        Self {
            extra: extra.into_iter().collect(),
        }
    }

    pub fn is_start(&self, ch: char) -> bool {
        ch == '_' || ch.is_alphabetic() || self.extra.contains(&ch)
    }

    pub fn is_part(&self, ch: char) -> bool {
        ch == '_' || ch.is_alphanumeric() || self.extra.contains(&ch)
    }

    /// End offset of the identifier run starting at `pos`, if one starts there
    pub fn run_at(&self, text: &str, pos: usize) -> Option<usize> {
        let mut chars = text[pos..].char_indices();
        let (_, first) = chars.next()?;
        if !self.is_start(first) {
            return None;
        }
        let end = chars
            .find(|&(_, ch)| !self.is_part(ch))
            .map_or(text.len(), |(offset, _)| pos + offset);
        Some(end)
    }
}

/// One classification step: a token and the state after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub start: usize,
    pub end: usize,
    pub category: &'a Category,
    pub exit: ScanState,
}

/// Immutable collection of all rule families for one language mode
#[derive(Debug)]
pub struct RuleSet {
    blocks: Vec<BlockRule>,
    keywords: Vec<KeywordClass>,
    patterns: Vec<PatternToken>,
    symbols: Vec<SymbolClass>,
    identifiers: IdentifierChars,
    plain: Category,
}

impl RuleSet {
    /// Start declaring a rule set
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Get a block rule by id
    pub fn block(&self, id: BlockId) -> Option<&BlockRule> {
        self.blocks.get(id)
    }

    pub fn blocks(&self) -> &[BlockRule] {
        &self.blocks
    }

    pub fn keyword_classes(&self) -> &[KeywordClass] {
        &self.keywords
    }

    pub fn pattern_tokens(&self) -> &[PatternToken] {
        &self.patterns
    }

    pub fn symbol_classes(&self) -> &[SymbolClass] {
        &self.symbols
    }

    pub fn identifier_chars(&self) -> &IdentifierChars {
        &self.identifiers
    }

    /// Category of unclassified text
    pub fn plain_category(&self) -> &Category {
        &self.plain
    }

    /// Classify the text at `pos` given the state entering it
    ///
    /// Priority order:
    /// 1. the end of the open block, if any (no end match means the rest
    ///    of the line belongs to the block and it stays open)
    /// 2. block starts, in declaration order
    /// 3. an identifier run, looked up in keyword classes in declaration order
    /// 4. pattern tokens, in declaration order
    /// 5. symbol classes
    /// 6. a single plain character
    ///
    /// `pos` must be a char boundary below `text.len()`. The returned match
    /// is non-empty unless it only closes an open block.
    pub fn match_at(&self, text: &str, pos: usize, state: ScanState) -> RuleMatch<'_> {
        if let Some(rule) = state.open_block().and_then(|id| self.blocks.get(id)) {
            return match rule.find_end(text, pos) {
                Some(end) => RuleMatch {
                    start: pos,
                    end,
                    category: &rule.category,
                    exit: ScanState::NONE,
                },
                None => RuleMatch {
                    start: pos,
                    end: text.len(),
                    category: &rule.category,
                    exit: state,
                },
            };
        }

        for (id, rule) in self.blocks.iter().enumerate() {
            if let Some(after_start) = rule.match_start(text, pos) {
                let (end, exit) = match rule.find_end(text, after_start) {
                    Some(end) => (end, ScanState::NONE),
                    None => (text.len(), ScanState::inside(id)),
                };
                return RuleMatch {
                    start: pos,
                    end,
                    category: &rule.category,
                    exit,
                };
            }
        }

        if let Some(end) = self.identifiers.run_at(text, pos) {
            let word = &text[pos..end];
            let category = self
                .keywords
                .iter()
                .find(|class| class.contains(word))
                .map_or(&self.plain, |class| &class.category);
            return RuleMatch {
                start: pos,
                end,
                category,
                exit: ScanState::NONE,
            };
        }

        for token in &self.patterns {
            if let Some(end) = token.match_at(text, pos) {
                return RuleMatch {
                    start: pos,
                    end,
                    category: &token.category,
                    exit: ScanState::NONE,
                };
            }
        }

        let ch = text[pos..].chars().next().unwrap_or('\0');
        let category = self
            .symbols
            .iter()
            .find(|class| class.contains(ch))
            .map_or(&self.plain, |class| &class.category);
        RuleMatch {
            start: pos,
            end: (pos + ch.len_utf8()).min(text.len()),
            category,
            exit: ScanState::NONE,
        }
    }
}

/// Declaration of a block rule, compiled by [`RuleSetBuilder::build`]
#[derive(Debug, Clone)]
pub struct BlockSpec {
    category: String,
    start: String,
    followed_by: Option<String>,
    end: Option<String>,
    escape: Option<char>,
}

impl BlockSpec {
    /// A block starting at `start` and running to the end of the line
    pub fn new(category: &str, start: &str) -> Self {
        Self {
            category: category.to_string(),
            start: start.to_string(),
            followed_by: None,
            end: None,
            escape: None,
        }
    }

    /// End the block at the next match of `end`, possibly on a later line
    pub fn until(mut self, end: &str) -> Self {
        self.end = Some(end.to_string());
        self
    }

    /// Only start when `lookahead` matches right after the start text
    ///
    /// The lookahead text is not consumed, so a doc comment declared as
    /// `/\*` followed by `\*` still closes on `/**/`.
    pub fn followed_by(mut self, lookahead: &str) -> Self {
        self.followed_by = Some(lookahead.to_string());
        self
    }

    /// Ignore end matches preceded by an odd number of `escape` chars
    pub fn escape(mut self, escape: char) -> Self {
        self.escape = Some(escape);
        self
    }

    fn compile(self) -> Result<BlockRule, RuleError> {
        let start = anchored(&self.category, &self.start)?;
        require_progress(&self.category, &self.start, &start)?;
        let followed_by = match &self.followed_by {
            Some(lookahead) => Some(anchored(&self.category, lookahead)?),
            None => None,
        };
        let end = match &self.end {
            Some(end) => BlockEnd::Pattern(unanchored(&self.category, end)?),
            None => BlockEnd::EndOfLine,
        };
        Ok(BlockRule {
            category: Category::new(self.category),
            start,
            followed_by,
            end,
            escape: self.escape,
        })
    }
}

/// Order-preserving builder for [`RuleSet`]
///
/// Patterns are only compiled in [`build`](Self::build), which is where
/// every configuration error surfaces.
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    blocks: Vec<BlockSpec>,
    keywords: Vec<(String, Vec<String>)>,
    patterns: Vec<(String, String)>,
    symbols: Vec<(String, HashSet<char>)>,
    identifiers: IdentifierChars,
}

impl RuleSetBuilder {
    /// Add a block rule; earlier rules win over later ones
    pub fn block(mut self, spec: BlockSpec) -> Self {
        self.blocks.push(spec);
        self
    }

    /// Add a keyword class
    pub fn keywords<I, S>(mut self, category: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords
            .push((category.to_string(), words.into_iter().map(Into::into).collect()));
        self
    }

    /// Add a pattern token matched only at the scan position
    pub fn pattern(mut self, category: &str, regex: &str) -> Self {
        self.patterns.push((category.to_string(), regex.to_string()));
        self
    }

    /// Add a symbol class made of every char in `chars`
    pub fn symbols(mut self, category: &str, chars: &str) -> Self {
        self.symbols.push((category.to_string(), chars.chars().collect()));
        self
    }

    /// Extra characters allowed in identifiers besides alphanumerics and `_`
    pub fn identifier_chars(mut self, extra: &str) -> Self {
        self.identifiers = IdentifierChars::with_extra(extra.chars());
        self
    }

    /// Compile every rule, reporting the first configuration error
    pub fn build(self) -> Result<RuleSet, RuleError> {
        let blocks = self
            .blocks
            .into_iter()
            .map(BlockSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let mut keywords = Vec::with_capacity(self.keywords.len());
        for (category, words) in self.keywords {
            if words.iter().any(|word| word.is_empty()) {
                return Err(RuleError::EmptyKeyword(category));
            }
            keywords.push(KeywordClass {
                category: Category::new(category),
                words: words.into_iter().collect(),
            });
        }

        let mut patterns = Vec::with_capacity(self.patterns.len());
        for (category, regex) in self.patterns {
            let pattern = anchored(&category, &regex)?;
            require_progress(&category, &regex, &pattern)?;
            patterns.push(PatternToken {
                category: Category::new(category),
                pattern,
            });
        }

        let symbols = self
            .symbols
            .into_iter()
            .map(|(category, chars)| SymbolClass {
                category: Category::new(category),
                chars,
            })
            .collect();

        debug!(
            "built rule set: {} blocks, {} keyword classes, {} pattern tokens",
            blocks.len(),
            keywords.len(),
            patterns.len()
        );

        Ok(RuleSet {
            blocks,
            keywords,
            patterns,
            symbols,
            identifiers: self.identifiers,
            plain: Category::plain(),
        })
    }
}
