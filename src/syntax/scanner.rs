//! Single-line scanning
//!
//! [`scan_line`] is a pure function of the line text, the state entering
//! the line and the rule set. It never fails: any text gets a complete
//! classification, with unmatched characters falling back to the plain
//! category.

use super::category::Span;
use super::rules::{RuleSet, ScanState};

/// Result of scanning a single line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTokens {
    /// State carried in from the previous line
    pub entry: ScanState,
    /// Ordered, non-overlapping spans covering the whole line
    pub spans: Vec<Span>,
    /// State to carry into the next line
    pub exit: ScanState,
}

/// Scan one line starting in `entry` state
///
/// The spans cover `text` exactly, left to right. Neighbouring plain
/// text is merged into one span; an empty line yields no spans and
/// passes `entry` through unchanged.
pub fn scan_line(rules: &RuleSet, text: &str, entry: ScanState) -> LineTokens {
    let mut spans: Vec<Span> = Vec::new();
    let mut state = entry;
    let mut pos = 0;

    while pos < text.len() {
        let step = rules.match_at(text, pos, state);
        state = step.exit;

        if step.end > step.start {
            match spans.last_mut() {
                Some(last)
                    if last.end == step.start
                        && last.category.is_plain()
                        && step.category.is_plain() =>
                {
                    last.end = step.end;
                }
                _ => spans.push(Span::new(step.start, step.end, step.category.clone())),
            }
        }

        pos = step.end;
    }

    LineTokens {
        entry,
        spans,
        exit: state,
    }
}

impl RuleSet {
    /// Scan one line of text; see [`scan_line`]
    pub fn scan_line(&self, text: &str, entry: ScanState) -> LineTokens {
        scan_line(self, text, entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::BlockSpec;

    fn test_rules() -> RuleSet {
        RuleSet::builder()
            .block(BlockSpec::new("FORMAL_COMMENT", r"/\*").followed_by(r"\*").until(r"\*/"))
            .block(BlockSpec::new("BLOCK_COMMENT", r"/\*").until(r"\*/"))
            .block(BlockSpec::new("LINE_COMMENT", "//"))
            .block(BlockSpec::new("DOUBLEQ_STRING", "\"").until("\""))
            .keywords("CONSTRUCTS", ["if", "then", "else"])
            .symbols("OPS_AND_SEPS", "{[()]}!%^&*-/+=?:~<>.,;")
            .pattern("NUMERIC_LITERAL", "[0-9]+")
            .pattern("HEX_LITERAL", r"\$[0-9A-Fa-f]+")
            .build()
            .unwrap()
    }

    fn categories<'a>(text: &'a str, tokens: &'a LineTokens) -> Vec<(&'a str, &'a str)> {
        tokens
            .spans
            .iter()
            .map(|span| (span.text(text), span.category.as_str()))
            .collect()
    }

    fn assert_covers(text: &str, tokens: &LineTokens) {
        let mut pos = 0;
        for span in &tokens.spans {
            assert_eq!(span.start, pos, "gap or overlap in {text:?}");
            assert!(span.end > span.start, "empty span in {text:?}");
            pos = span.end;
        }
        assert_eq!(pos, text.len(), "spans do not reach the end of {text:?}");
    }

    #[test]
    fn test_simple_line() {
        let rules = test_rules();
        let text = "if (a = 12) then b";
        let tokens = scan_line(&rules, text, ScanState::NONE);

        assert_covers(text, &tokens);
        assert!(tokens.exit.is_normal());
        assert_eq!(
            categories(text, &tokens),
            vec![
                ("if", "CONSTRUCTS"),
                (" ", "default"),
                ("(", "OPS_AND_SEPS"),
                ("a ", "default"),
                ("=", "OPS_AND_SEPS"),
                (" ", "default"),
                ("12", "NUMERIC_LITERAL"),
                (")", "OPS_AND_SEPS"),
                (" ", "default"),
                ("then", "CONSTRUCTS"),
                (" b", "default"),
            ]
        );
    }

    #[test]
    fn test_empty_line_keeps_state() {
        let rules = test_rules();
        let tokens = scan_line(&rules, "", ScanState::inside(1));
        assert!(tokens.spans.is_empty());
        assert_eq!(tokens.exit, ScanState::inside(1));

        let tokens = scan_line(&rules, "", ScanState::NONE);
        assert!(tokens.spans.is_empty());
        assert!(tokens.exit.is_normal());
    }

    #[test]
    fn test_open_block_without_end() {
        let rules = test_rules();
        let text = "if x = 12; // not code";
        let tokens = scan_line(&rules, text, ScanState::inside(1));
        assert_eq!(tokens.spans.len(), 1);
        assert_eq!(tokens.spans[0].start, 0);
        assert_eq!(tokens.spans[0].end, text.len());
        assert_eq!(tokens.spans[0].category, "BLOCK_COMMENT");
        assert_eq!(tokens.exit, ScanState::inside(1));
    }

    #[test]
    fn test_block_closing() {
        let rules = test_rules();
        let text = "tail */ more";
        let tokens = scan_line(&rules, text, ScanState::inside(1));
        assert_covers(text, &tokens);
        assert_eq!(
            categories(text, &tokens),
            vec![("tail */", "BLOCK_COMMENT"), (" more", "default")]
        );
        assert!(tokens.exit.is_normal());
    }

    #[test]
    fn test_block_opened_and_closed_on_one_line() {
        let rules = test_rules();
        let text = "a /* b */ c";
        let tokens = scan_line(&rules, text, ScanState::NONE);
        assert_eq!(
            categories(text, &tokens),
            vec![("a ", "default"), ("/* b */", "BLOCK_COMMENT"), (" c", "default")]
        );
        assert!(tokens.exit.is_normal());
    }

    #[test]
    fn test_block_left_open() {
        let rules = test_rules();
        let text = "else /* Everything is finally working.";
        let tokens = scan_line(&rules, text, ScanState::NONE);
        assert_covers(text, &tokens);
        assert_eq!(tokens.spans.last().unwrap().category, "BLOCK_COMMENT");
        assert_eq!(tokens.exit, ScanState::inside(1));
    }

    #[test]
    fn test_nested_start_is_inert() {
        let rules = test_rules();
        let text = "\"in /* string\" x";
        let tokens = scan_line(&rules, text, ScanState::NONE);
        assert_eq!(
            categories(text, &tokens),
            vec![("\"in /* string\"", "DOUBLEQ_STRING"), (" x", "default")]
        );
        assert!(tokens.exit.is_normal());
    }

    #[test]
    fn test_line_comment_closes_at_line_end() {
        let rules = test_rules();
        let text = "b = c; // That after all this time";
        let tokens = scan_line(&rules, text, ScanState::NONE);
        assert_covers(text, &tokens);
        let last = tokens.spans.last().unwrap();
        assert_eq!(last.text(text), "// That after all this time");
        assert_eq!(last.category, "LINE_COMMENT");
        assert!(tokens.exit.is_normal());
    }

    #[test]
    fn test_keyword_is_not_a_prefix_match() {
        let rules = test_rules();
        let tokens = scan_line(&rules, "ifdef", ScanState::NONE);
        assert_eq!(tokens.spans, vec![Span::new(0, 5, crate::syntax::Category::plain())]);
    }

    #[test]
    fn test_doc_comment_wins_over_plain_comment() {
        let rules = test_rules();
        let tokens = scan_line(&rules, "/** x */", ScanState::NONE);
        assert_eq!(tokens.spans.len(), 1);
        assert_eq!(tokens.spans[0].category, "FORMAL_COMMENT");

        let tokens = scan_line(&rules, "/* x */", ScanState::NONE);
        assert_eq!(tokens.spans.len(), 1);
        assert_eq!(tokens.spans[0].category, "BLOCK_COMMENT");

        let tokens = scan_line(&rules, "/** open", ScanState::NONE);
        assert_eq!(tokens.exit, ScanState::inside(0));

        let tokens = scan_line(&rules, "/**/ x", ScanState::NONE);
        assert_eq!(tokens.spans[0].text("/**/ x"), "/**/");
        assert!(tokens.exit.is_normal());
    }

    #[test]
    fn test_numeric_and_hex_literals() {
        let rules = test_rules();
        let tokens = scan_line(&rules, "$1A", ScanState::NONE);
        assert_eq!(tokens.spans.len(), 1);
        assert_eq!(tokens.spans[0].category, "HEX_LITERAL");
        assert_eq!(tokens.spans[0].end, 3);

        let tokens = scan_line(&rules, "12", ScanState::NONE);
        assert_eq!(tokens.spans.len(), 1);
        assert_eq!(tokens.spans[0].category, "NUMERIC_LITERAL");
    }

    #[test]
    fn test_non_ascii_text() {
        let rules = test_rules();
        let text = "é → if ü";
        let tokens = scan_line(&rules, text, ScanState::NONE);
        assert_covers(text, &tokens);
        assert!(tokens
            .spans
            .iter()
            .any(|span| span.category == "CONSTRUCTS" && span.text(text) == "if"));
    }

    #[test]
    fn test_deterministic() {
        let rules = test_rules();
        let text = "if a /* b";
        let first = scan_line(&rules, text, ScanState::NONE);
        let second = rules.scan_line(text, ScanState::NONE);
        assert_eq!(first, second);
    }
}
