//! Ticket analysis: complexity and coverage diagnostics
//!
//! Computes a complexity score, a number-frequency distribution and
//! per-pattern coverage counts over normalized ticket text. The parser
//! folds the resulting diagnostics into its warnings; callers can also
//! run the analyzer standalone.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::patterns;
use crate::segment::{self, LineClass};

/// Per-class line counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClassCounts {
    pub names: usize,
    pub totals: usize,
    pub bets: usize,
    pub blanks: usize,
}

/// Analyzer output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketAnalysis {
    /// Heuristic score in [0, 1): 0 for trivial tickets, approaching 1
    /// as lines, players and shorthand patterns accumulate
    pub complexity_score: f64,
    pub line_classes: LineClassCounts,
    /// How often each canonical number appears across bet lines
    pub number_frequency: BTreeMap<String, usize>,
    /// Match counts per shorthand pattern family
    pub pattern_coverage: BTreeMap<String, usize>,
}

static COVERAGE_PATTERNS: Lazy<[(&'static str, &'static Regex); 9]> = Lazy::new(|| {
    [
        ("volteo", &*patterns::VOLTEO),
        ("rango", &*patterns::RANGO),
        ("decena", &*patterns::DECENA),
        ("terminal", &*patterns::TERMINAL),
        ("pares_relativos", &*patterns::PARES_RELATIVOS),
        ("centenas_todas", &*patterns::CENTENAS_TODAS),
        ("parle_explicito", &*patterns::PARLE_EXPLICITO),
        ("parle_inline", &*patterns::PARLE_INLINE),
        ("candado", &*patterns::CANDADO),
    ]
});

/// Analyze normalized ticket text
pub fn analyze(text: &str) -> TicketAnalysis {
    let mut analysis = TicketAnalysis::default();
    let mut pattern_matches = 0usize;

    for line in text.split('\n') {
        match segment::classify_line(line) {
            LineClass::Blank => analysis.line_classes.blanks += 1,
            LineClass::Name => analysis.line_classes.names += 1,
            LineClass::Total => analysis.line_classes.totals += 1,
            LineClass::Bet => {
                analysis.line_classes.bets += 1;

                for (name, regex) in COVERAGE_PATTERNS.iter() {
                    let count = regex.find_iter(line).count();
                    if count > 0 {
                        *analysis.pattern_coverage.entry((*name).to_string()).or_insert(0) +=
                            count;
                        pattern_matches += count;
                    }
                }

                let (numbers_part, _) = crate::recognize::split_at_con(line);
                for token in numbers_part.split_whitespace() {
                    if token.chars().all(|c| c.is_ascii_digit())
                        && (2..=3).contains(&token.len())
                    {
                        *analysis
                            .number_frequency
                            .entry(token.to_string())
                            .or_insert(0) += 1;
                    }
                }
            }
        }
    }

    let raw = analysis.line_classes.bets as f64
        + analysis.line_classes.names as f64 * 0.5
        + pattern_matches as f64 * 2.0;
    analysis.complexity_score = raw / (raw + 10.0);
    analysis
}

impl TicketAnalysis {
    /// Warnings the parser attaches to its result metadata
    pub fn diagnostics(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.complexity_score > 0.8 {
            notes.push(format!(
                "high ticket complexity ({:.2})",
                self.complexity_score
            ));
        }
        for (number, count) in &self.number_frequency {
            if *count >= 5 {
                notes.push(format!("number '{number}' appears {count} times"));
            }
        }
        notes
    }
}
