//! Per-document token cache and incremental re-scanning
//!
//! The [`TokenMarker`] owns the scanned spans and the entry/exit scan
//! state of every line. Because each line's entry state is the previous
//! line's exit state, an edit can change the classification of lines
//! below it; [`TokenMarker::lines_changed`] rescans from the edit and
//! stops as soon as the carried state matches what the unedited suffix
//! already saw.
//!
//! The marker has a single writer (`&mut self`). The rule set is shared
//! and read-only, so many markers may use one rule set across threads.

use std::ops::Range;
use std::sync::Arc;

use log::{debug, trace};

use super::category::Span;
use super::rules::{RuleSet, ScanState};
use super::scanner::{scan_line, LineTokens};

/// Outcome of a (possibly bounded) re-scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rescan {
    /// Lines whose spans were recomputed and must be re-read
    pub invalidated: Range<usize>,
    /// False when the line budget ran out before the state resynchronized
    pub complete: bool,
}

/// Where an interrupted re-scan picks up again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    /// Next line to scan
    next: usize,
    /// Lines below this index are rescanned regardless of their state
    forced_until: usize,
}

/// Cached classification of a whole document
#[derive(Debug)]
pub struct TokenMarker {
    rules: Arc<RuleSet>,
    lines: Vec<LineTokens>,
    pending: Option<Pending>,
}

impl TokenMarker {
    /// Create an empty marker; call [`scan_all`](Self::scan_all) to fill it
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            rules,
            lines: Vec::new(),
            pending: None,
        }
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    /// Switch rule sets; the cache is dropped and must be rebuilt
    pub fn set_rules(&mut self, rules: Arc<RuleSet>) {
        self.rules = rules;
        self.lines.clear();
        self.pending = None;
    }

    /// Scan every line from the top of the document
    pub fn scan_all<S: AsRef<str>>(&mut self, lines: &[S]) -> &[LineTokens] {
        self.lines.clear();
        self.lines.reserve(lines.len());
        self.pending = None;

        let mut state = ScanState::NONE;
        for line in lines {
            let tokens = scan_line(&self.rules, line.as_ref(), state);
            state = tokens.exit;
            self.lines.push(tokens);
        }

        debug!("scanned {} lines", self.lines.len());
        &self.lines
    }

    /// Repair the cache after the lines in `changed` were edited
    ///
    /// `changed` is the half-open range of lines, in post-edit numbering,
    /// whose text changed or was inserted; a pure deletion is the empty
    /// range at the line that followed the deleted ones. Every line in
    /// `changed` is rescanned. Lines after it are rescanned only while
    /// the state carried into them differs from what they were last
    /// scanned with.
    ///
    /// Returns the range of lines whose spans were recomputed.
    pub fn lines_changed<S: AsRef<str>>(
        &mut self,
        changed: Range<usize>,
        lines: &[S],
    ) -> Range<usize> {
        self.lines_changed_within(changed, lines, usize::MAX).invalidated
    }

    /// Like [`lines_changed`](Self::lines_changed) but scans at most `budget` lines
    ///
    /// When the budget runs out the results so far stay valid and the
    /// remaining work is kept; continue it with [`resume`](Self::resume).
    /// A further edit before that folds the pending work into its own
    /// re-scan.
    pub fn lines_changed_within<S: AsRef<str>>(
        &mut self,
        changed: Range<usize>,
        lines: &[S],
        budget: usize,
    ) -> Rescan {
        let new_len = lines.len();
        let old_len = self.lines.len();
        let mut start = changed.start.min(new_len);
        let mut end = changed.end.clamp(start, new_len);
        let tail = new_len - end;

        let removed_end = if old_len < start + tail {
            // The cache cannot describe the pre-edit document
            debug!(
                "cache of {} lines does not match edit {:?} of {} lines, rescanning everything",
                old_len, changed, new_len
            );
            self.pending = None;
            start = 0;
            end = new_len;
            old_len
        } else {
            old_len - tail
        };

        let mut from = start;
        let mut forced_until = end;
        if let Some(pending) = self.pending.take() {
            // Translate pre-edit line numbers into post-edit ones
            let map = |line: usize| {
                if line < start {
                    line
                } else if line >= removed_end {
                    line - removed_end + end
                } else {
                    end
                }
            };
            from = from.min(map(pending.next));
            forced_until = forced_until.max(map(pending.next)).max(map(pending.forced_until));
        }

        self.lines.splice(
            start..removed_end,
            (start..end).map(|_| LineTokens::default()),
        );
        trace!(
            "lines {:?} replaced by {:?}, rescanning from {}",
            start..removed_end,
            start..end,
            from
        );

        self.rescan(lines, from, forced_until, budget)
    }

    /// Continue an interrupted re-scan for at most `budget` lines
    pub fn resume<S: AsRef<str>>(&mut self, lines: &[S], budget: usize) -> Rescan {
        match self.pending.take() {
            Some(_) if lines.len() != self.lines.len() => {
                debug!("document changed under a pending re-scan, rescanning everything");
                self.scan_all(lines);
                Rescan {
                    invalidated: 0..lines.len(),
                    complete: true,
                }
            }
            Some(pending) => self.rescan(lines, pending.next, pending.forced_until, budget),
            None => Rescan {
                invalidated: 0..0,
                complete: true,
            },
        }
    }

    /// Whether every cached line is consistent with its predecessor
    pub fn is_settled(&self) -> bool {
        self.pending.is_none()
    }

    fn rescan<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        from: usize,
        forced_until: usize,
        budget: usize,
    ) -> Rescan {
        let mut state = match from.checked_sub(1) {
            Some(prev) => self.lines[prev].exit,
            None => ScanState::NONE,
        };
        let mut line = from;
        let mut scanned = 0;

        while line < lines.len() {
            if line >= forced_until && self.lines[line].entry == state {
                break;
            }
            if scanned == budget {
                trace!("re-scan budget exhausted at line {}", line);
                self.pending = Some(Pending {
                    next: line,
                    forced_until,
                });
                return Rescan {
                    invalidated: from..line,
                    complete: false,
                };
            }

            let tokens = scan_line(&self.rules, lines[line].as_ref(), state);
            state = tokens.exit;
            self.lines[line] = tokens;
            line += 1;
            scanned += 1;
        }

        debug!("rescanned lines {:?}", from..line);
        Rescan {
            invalidated: from..line,
            complete: true,
        }
    }

    /// Number of cached lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Cached tokens of a line
    pub fn line(&self, idx: usize) -> Option<&LineTokens> {
        self.lines.get(idx)
    }

    /// Cached spans of a line
    pub fn spans(&self, idx: usize) -> Option<&[Span]> {
        self.lines.get(idx).map(|tokens| tokens.spans.as_slice())
    }

    /// State leaving a line
    pub fn exit_state(&self, idx: usize) -> Option<ScanState> {
        self.lines.get(idx).map(|tokens| tokens.exit)
    }

    /// All cached lines in order
    pub fn lines(&self) -> &[LineTokens] {
        &self.lines
    }
}
