//! End-to-end checks of the public highlighting API

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use linemark::render::split_lines;
use linemark::syntax::builtin::{c, gml, DEMO_TEXT};
use linemark::syntax::{LanguageMode, LineTokens, ModeRegistry, RuleSet, ScanState, TokenMarker};
use linemark::Error;

const FRAGMENTS: &[&str] = &[
    "/* open",
    "close */ x = 2;",
    "x = 1; // note",
    "s = \"unterminated",
    "t = 'quoted'",
    "/** doc",
    "if (a) b = $FF;",
    "",
    "  \t",
    "*/",
    "while true { draw_text(0, 0, \"hi\"); }",
];

/// Small deterministic generator so failures reproduce
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }

    fn fragment(&mut self) -> String {
        FRAGMENTS[self.next(FRAGMENTS.len())].to_string()
    }
}

fn full_scan(rules: &Arc<RuleSet>, doc: &[String]) -> Vec<LineTokens> {
    TokenMarker::new(rules.clone()).scan_all(doc).to_vec()
}

/// Apply one random edit, returning the changed range in post-edit lines
fn random_edit(rng: &mut Lcg, doc: &mut Vec<String>) -> std::ops::Range<usize> {
    let at = rng.next(doc.len() + 1);
    match rng.next(3) {
        0 if at < doc.len() => {
            doc[at] = rng.fragment();
            at..at + 1
        }
        1 => {
            let count = 1 + rng.next(3);
            for i in 0..count {
                doc.insert(at + i, rng.fragment());
            }
            at..at + count
        }
        _ => {
            let count = rng.next(3).min(doc.len() - at.min(doc.len()));
            doc.drain(at..at + count);
            at..at
        }
    }
}

#[test]
fn demo_text_is_fully_covered() {
    let rules = gml::gml_rules().unwrap();
    let mut state = ScanState::NONE;

    for line in split_lines(DEMO_TEXT) {
        let tokens = rules.scan_line(line, state);
        let mut pos = 0;
        for span in &tokens.spans {
            assert_eq!(span.start, pos, "gap in {:?}", line);
            assert!(span.end > span.start);
            pos = span.end;
        }
        assert_eq!(pos, line.len());
        state = tokens.exit;
    }

    assert!(state.is_normal());
}

#[test]
fn incremental_matches_full_scan() {
    let rules = Arc::new(gml::gml_rules().unwrap());
    let mut rng = Lcg(7);
    let mut doc: Vec<String> = (0..20).map(|_| rng.fragment()).collect();
    let mut marker = TokenMarker::new(rules.clone());
    marker.scan_all(&doc);

    for step in 0..300 {
        let changed = random_edit(&mut rng, &mut doc);
        let invalidated = marker.lines_changed(changed.clone(), &doc);

        assert!(invalidated.start <= changed.start.min(doc.len()));
        assert_eq!(marker.lines(), full_scan(&rules, &doc).as_slice(), "step {}", step);
    }
}

#[test]
fn bounded_rescans_settle_to_full_scan() {
    let rules = Arc::new(gml::gml_rules().unwrap());
    let mut rng = Lcg(42);
    let mut doc: Vec<String> = (0..30).map(|_| rng.fragment()).collect();
    let mut marker = TokenMarker::new(rules.clone());
    marker.scan_all(&doc);

    for step in 0..100 {
        let changed = random_edit(&mut rng, &mut doc);
        let result = marker.lines_changed_within(changed, &doc, 2);
        assert_eq!(result.complete, marker.is_settled());

        // Sometimes edit again before the pending work is finished
        if rng.next(2) == 0 {
            continue;
        }
        while !marker.is_settled() {
            marker.resume(&doc, 3);
        }
        assert_eq!(marker.lines(), full_scan(&rules, &doc).as_slice(), "step {}", step);
    }

    while !marker.is_settled() {
        marker.resume(&doc, 3);
    }
    assert_eq!(marker.lines(), full_scan(&rules, &doc).as_slice());
}

#[test]
fn rule_set_is_shared_across_threads() {
    let rules = Arc::new(c::c_rules().unwrap());
    let source: Vec<String> = vec![
        "int main(void) {".into(),
        "    /* body".into(),
        "       more */ return 0x1F;".into(),
        "}".into(),
    ];
    let expected = full_scan(&rules, &source);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let rules = rules.clone();
            let source = source.clone();
            thread::spawn(move || full_scan(&rules, &source))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn switching_profiles_keeps_spans() {
    let mode = gml::gml_mode().unwrap();
    let lines = split_lines(DEMO_TEXT);
    let before = mode.marker().scan_all(&lines).to_vec();

    let mut profiles = mode.profiles().clone();
    assert_eq!(profiles.names(), vec!["Advanced", "Code::Blocks"]);
    let advanced = profiles.style_for(gml::LINE_COMMENT);
    profiles.select("code::blocks").unwrap();
    assert_ne!(profiles.style_for(gml::LINE_COMMENT), advanced);
    assert!(matches!(profiles.select("Solarized"), Err(Error::UnknownProfile(_))));

    assert_eq!(mode.marker().scan_all(&lines), before.as_slice());
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("linemark-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn languages_dir_loads_valid_files() {
    let dir = temp_dir("langs");
    fs::write(
        dir.join("ini.toml"),
        r##"
name = "INI"
extensions = ["ini"]

[[block]]
category = "comment"
start = ";"

[[pattern]]
category = "section"
regex = '\[[^\]]*\]'

[[symbols]]
category = "operator"
chars = "="

[[profile]]
name = "Default"
styles.comment = { fg = "#808080", italic = true }
styles.section = { fg = "bright-blue", bold = true }
"##,
    )
    .unwrap();
    fs::write(dir.join("broken.toml"), "name = \"Broken\"\n[[pattern]]\ncategory = \"x\"\nregex = \"a*\"\n")
        .unwrap();
    fs::write(dir.join("readme.txt"), "not a language").unwrap();

    let mut registry = ModeRegistry::new();
    assert_eq!(registry.load_dir(&dir).unwrap(), 1);
    assert!(registry.get("broken").is_none());

    let mode = registry.detect(std::path::Path::new("setup.ini")).unwrap();
    assert_eq!(mode.name(), "INI");

    let tokens = mode.rules().scan_line("[core] ; comment", ScanState::NONE);
    let categories: Vec<_> = tokens
        .spans
        .iter()
        .filter(|span| !span.category.is_plain())
        .map(|span| span.category.to_string())
        .collect();
    assert_eq!(categories, vec!["section", "comment"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_language_definitions_are_rejected() {
    let missing_name = LanguageMode::from_toml("extensions = [\"x\"]", "inline");
    assert!(matches!(missing_name, Err(Error::Toml { .. })));

    let unknown_color = LanguageMode::from_toml(
        "name = \"X\"\n[[profile]]\nname = \"P\"\nfallback = { fg = \"mauve\" }\n",
        "inline",
    );
    assert!(matches!(unknown_color, Err(Error::Language { .. })));

    let bad_regex = LanguageMode::from_toml(
        "name = \"X\"\n[[pattern]]\ncategory = \"n\"\nregex = \"(\"\n",
        "inline",
    );
    assert!(matches!(bad_regex, Err(Error::Rules(_))));
}
