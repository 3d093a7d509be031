//! C/C++ language mode

use crate::error::RuleError;
use crate::syntax::language::LanguageMode;
use crate::syntax::rules::{BlockSpec, RuleSet};
use crate::syntax::style::{Color, Style, StyleProfiles, StyleTable};

pub const COMMENT: &str = "comment";
pub const STRING: &str = "string";
pub const CHAR: &str = "char";
pub const NUMBER: &str = "number";
pub const KEYWORD: &str = "keyword";
pub const TYPE: &str = "type";
pub const PREPROCESSOR: &str = "preprocessor";
pub const OPERATOR: &str = "operator";
pub const PUNCTUATION: &str = "punctuation";

const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic",
    "_Bool", "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert",
    "_Thread_local",
];

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "bitand", "bitor", "bool", "catch", "class",
    "compl", "concept", "consteval", "constexpr", "constinit", "const_cast", "co_await",
    "co_return", "co_yield", "decltype", "delete", "dynamic_cast", "explicit", "export",
    "false", "friend", "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr",
    "operator", "or", "or_eq", "private", "protected", "public", "reinterpret_cast",
    "requires", "static_assert", "static_cast", "template", "this", "thread_local", "throw",
    "true", "try", "typeid", "typename", "using", "virtual", "xor", "xor_eq",
];

const TYPES: &[&str] = &[
    "size_t", "ptrdiff_t", "intptr_t", "uintptr_t", "int8_t", "int16_t", "int32_t", "int64_t",
    "uint8_t", "uint16_t", "uint32_t", "uint64_t", "FILE", "NULL",
];

/// Build the C/C++ rule set
pub fn c_rules() -> Result<RuleSet, RuleError> {
    RuleSet::builder()
        .block(BlockSpec::new(COMMENT, r"/\*").until(r"\*/"))
        .block(BlockSpec::new(COMMENT, "//"))
        .block(BlockSpec::new(STRING, "\"").until("\"").escape('\\'))
        .keywords(KEYWORD, KEYWORDS.iter().copied())
        .keywords(KEYWORD, CPP_KEYWORDS.iter().copied())
        .keywords(TYPE, TYPES.iter().copied())
        .pattern(PREPROCESSOR, r"#\s*[A-Za-z_]+")
        .pattern(CHAR, r"'(?:[^'\\]|\\.)'")
        .pattern(NUMBER, r"0[xX][0-9a-fA-F]+[uUlL]*")
        .pattern(NUMBER, r"\d+\.\d*(?:[eE][+-]?\d+)?[fFlL]?")
        .pattern(NUMBER, r"\.\d+(?:[eE][+-]?\d+)?[fFlL]?")
        .pattern(NUMBER, r"\d+[uUlL]*")
        .symbols(OPERATOR, "+-*/%&|^!<>=~?:")
        .symbols(PUNCTUATION, "{}[]();,.")
        .build()
}

/// ANSI palette, works on any terminal
fn terminal_profile() -> StyleTable {
    StyleTable::new("Terminal")
        .with(COMMENT, Style::fg(Color::BrightBlack).with_italic())
        .with(STRING, Style::fg(Color::Green))
        .with(CHAR, Style::fg(Color::Green))
        .with(NUMBER, Style::fg(Color::Cyan))
        .with(KEYWORD, Style::fg(Color::Magenta).with_bold())
        .with(TYPE, Style::fg(Color::Yellow))
        .with(PREPROCESSOR, Style::fg(Color::BrightMagenta))
        .with(OPERATOR, Style::fg(Color::BrightWhite))
}

/// Create the C/C++ language mode
pub fn c_mode() -> Result<LanguageMode, RuleError> {
    Ok(
        LanguageMode::new("C", c_rules()?, StyleProfiles::new(terminal_profile()))
            .with_extensions(&["c", "h", "cpp", "hpp", "cc", "cxx"]),
    )
}
