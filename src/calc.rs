//! Monetary aggregation and reconciliation
//!
//! All money flows through `rust_decimal::Decimal`; binary floating point
//! never touches an amount. Summation is bottom-up: detail amounts into
//! jugada totals, jugada totals into the parse summary. Declared totals
//! reconcile against calculated ones with a 0.01 tolerance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{Jugada, ParseSummary};

/// Equality tolerance for declared-vs-calculated totals
pub fn tolerance() -> Decimal {
    dec!(0.01)
}

/// Mismatch band above which a total difference is an error, below which
/// (but above tolerance) it is only a warning
pub fn warning_band() -> Decimal {
    dec!(1.00)
}

/// Parse a monetary amount, accepting `.` or `,` as the decimal mark
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let canonical = text.trim().replace(',', ".");
    canonical.parse::<Decimal>().ok()
}

/// Inputs to the confidence score
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceInputs {
    pub syntax_errors: usize,
    pub syntax_warnings: usize,
    pub invalid_jugadas: usize,
    pub exact_match_jugadas: usize,
    pub total_jugadas: usize,
}

/// Confidence score in [0, 1]: starts at 1.0, punished by syntax problems
/// and invalid jugadas, rewarded by exact total matches.
pub fn confidence(inputs: ConfidenceInputs) -> f64 {
    let mut score = 1.0;
    score -= 0.1 * inputs.syntax_errors as f64;
    score -= 0.05 * inputs.syntax_warnings as f64;
    if inputs.total_jugadas > 0 {
        let total = inputs.total_jugadas as f64;
        score -= 0.3 * (inputs.invalid_jugadas as f64 / total);
        score += 0.2 * (inputs.exact_match_jugadas as f64 / total);
    }
    score.clamp(0.0, 1.0)
}

/// Build the aggregate summary over finalized jugadas
pub fn summarize(jugadas: &[Jugada], confidence: f64) -> ParseSummary {
    let total_calculated: Decimal = jugadas.iter().map(|j| j.total_calculated).sum();
    let declared: Vec<Decimal> = jugadas.iter().filter_map(|j| j.total_declared).collect();
    let total_declared: Option<Decimal> = if declared.is_empty() {
        None
    } else {
        Some(declared.iter().copied().sum())
    };
    let difference = match total_declared {
        Some(declared) => (total_calculated - declared).abs(),
        None => Decimal::ZERO,
    };
    ParseSummary {
        total_jugadas: jugadas.len(),
        total_calculated,
        total_declared,
        difference,
        is_valid: jugadas.iter().all(|j| j.is_valid),
        confidence,
    }
}

/// Count of jugadas whose declared total matches exactly (within tolerance)
pub fn exact_matches(jugadas: &[Jugada]) -> usize {
    jugadas
        .iter()
        .filter(|j| j.total_declared.is_some() && j.difference() < tolerance())
        .count()
}
