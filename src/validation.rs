//! Input validation framework
//!
//! Two entry points: `validate_syntax` runs cheaply over the raw text
//! before parsing, `validate_jugada` checks produced tickets after
//! recognition. Both feed the same `ValidationResult` shape; the parser
//! merges jugada-level findings into the owning `Jugada`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calc;
use crate::config::ParserConfig;
use crate::model::{BetKind, Jugada};
use crate::segment::{self, LineClass};

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid = self.is_valid && other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Line-by-line syntactic validation of (normalized) ticket text
pub fn validate_syntax(text: &str, config: &ParserConfig) -> ValidationResult {
    let mut result = ValidationResult::ok();
    if text.trim().is_empty() {
        result.error("Empty text");
        return result;
    }

    let mut total_lines = 0usize;

    for (index, line) in text.split('\n').enumerate() {
        let line_number = index + 1;
        match segment::classify_line(line) {
            LineClass::Blank | LineClass::Name => {}
            LineClass::Total => {
                total_lines += 1;
                if segment::total_amount(line).is_none() {
                    result.warn(format!("line {line_number}: total line without amount"));
                }
            }
            LineClass::Bet => check_bet_line(line, line_number, &mut result),
        }
    }

    // The segmenter's block count is authoritative for the player cap;
    // counting name lines here could disagree with it on anonymous blocks.
    let block_count = segment::count_blocks(text);
    if block_count > config.max_jugadores {
        result.error(format!(
            "ticket has {} player blocks, maximum is {}",
            block_count, config.max_jugadores
        ));
    }
    if total_lines > block_count.max(1) {
        result.warn(format!(
            "{total_lines} total lines for {block_count} player blocks"
        ));
    }
    result
}

fn check_bet_line(line: &str, line_number: usize, result: &mut ValidationResult) {
    let mut numbers: Vec<&str> = Vec::new();
    let mut has_amount_clause = false;
    let mut seen_con = false;

    for token in line.split_whitespace() {
        let lowered = token.to_lowercase();
        if lowered == "con" {
            seen_con = true;
            continue;
        }
        if token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            if seen_con {
                has_amount_clause = true;
                if let Some(amount) = calc::parse_amount(token) {
                    if amount == Decimal::ZERO {
                        result.warn(format!("line {line_number}: zero amount"));
                    }
                }
            } else if token.chars().all(|c| c.is_ascii_digit()) {
                if token.len() > 4 {
                    result.error(format!(
                        "line {line_number}: number '{token}' is out of range"
                    ));
                } else {
                    numbers.push(token);
                }
            }
        }
    }

    if numbers.is_empty() && seen_con {
        result.error(format!("line {line_number}: bet line without numbers"));
    }
    if !numbers.is_empty() && !has_amount_clause && !seen_con {
        // Recoverable through stake carryover, but worth surfacing.
        result.warn(format!("line {line_number}: bet line without an amount"));
    }
    let mut seen = std::collections::HashSet::new();
    for number in &numbers {
        if !seen.insert(*number) {
            result.warn(format!(
                "line {line_number}: number '{number}' repeated in the same line"
            ));
        }
    }
}

/// Semantic validation of a produced jugada
pub fn validate_jugada(jugada: &Jugada, config: &ParserConfig) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for detail in &jugada.details {
        let at = format!("line {}", detail.line_number);

        for number in &detail.numbers {
            let canonical =
                matches!(number.len(), 2 | 3) && number.chars().all(|c| c.is_ascii_digit());
            if !canonical {
                result.error(format!("{at}: number '{number}' is not canonical"));
            }
        }
        if detail.kind == BetKind::Centena && detail.numbers.iter().any(|n| n.len() != 3) {
            result.error(format!("{at}: centena numbers must have 3 digits"));
        }

        if detail.amount < Decimal::ZERO && !config.allow_negative {
            result.error(format!("{at}: negative amount {}", detail.amount));
        }
        if detail.amount > config.max_monto {
            result.warn(format!(
                "{at}: amount {} exceeds maximum {}",
                detail.amount, config.max_monto
            ));
        }

        if matches!(detail.kind, BetKind::Parle | BetKind::Candado) {
            match detail.combinations {
                None => result.error(format!("{at}: {:?} without combination count", detail.kind)),
                Some(combinations) if detail.pairs.is_none() => {
                    let expected = crate::model::pair_combinations(detail.numbers.len());
                    if combinations != expected {
                        result.error(format!(
                            "{at}: combination count {combinations} does not match {expected}"
                        ));
                    }
                }
                Some(_) => {}
            }
        }

        let mut seen = std::collections::HashSet::new();
        for number in &detail.numbers {
            if !seen.insert(number.as_str()) && detail.pairs.is_none() {
                result.warn(format!("{at}: number '{number}' duplicated"));
            }
        }
    }

    if let Some(declared) = jugada.total_declared {
        let difference = (jugada.total_calculated - declared).abs();
        if difference >= calc::tolerance() {
            let message = format!(
                "declared total {} differs from calculated {} by {}",
                declared, jugada.total_calculated, difference
            );
            if difference >= calc::warning_band() && config.validate_totals {
                result.error(message);
            } else {
                result.warn(message);
            }
        }
    }
    result
}
