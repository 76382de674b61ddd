//! Core data model for parsed tickets
//!
//! Everything a parse produces lives here: typed bet rows
//! (`DetalleApuesta`), per-player tickets (`Jugada`) and the aggregate
//! `ParseResult`. Entities are plain serde-serializable values owned by the
//! caller; the parser keeps no back-references into them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// The closed set of bet row types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BetKind {
    /// Straight bet on individual 2-digit numbers
    Fijo,
    /// Run bet alongside a fijo, on the same numbers
    Corrido,
    /// Pair-combination bet
    Parle,
    /// 3-digit-number bet
    Centena,
    /// All pairs of a set of numbers for a flat total price
    Candado,
    /// Bet produced by expanding a shorthand pattern
    Especial,
}

/// Shorthand pattern families recognized by the expander
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternType {
    Volteo,
    Rango,
    Decena,
    Terminal,
    ParesRelativos,
    CentenasTodas,
    Repeticion,
    Simple,
}

/// Provenance of an expanded shorthand token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    /// The token as written on the ticket
    pub original_token: String,
    /// The numbers the token expanded into
    pub expanded: Vec<String>,
    pub pattern_type: PatternType,
}

/// One typed row of a parsed bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetalleApuesta {
    pub kind: BetKind,
    /// Canonical digit strings, 2 or 3 digits, leading zeros significant
    pub numbers: Vec<String>,
    /// Total monetary value of the row
    pub amount: Decimal,
    /// Per-number or per-combination stake
    pub unit_amount: Decimal,
    /// Pairwise combination count, for Parle and Candado rows
    pub combinations: Option<u32>,
    /// Explicit parle pairs, in ticket order
    pub pairs: Option<Vec<(String, String)>>,
    pub original_line: String,
    pub line_number: usize,
    pub expansion: Option<Expansion>,
}

/// Number of unordered pairs over `n` items: C(n, 2)
pub fn pair_combinations(n: usize) -> u32 {
    (n * n.saturating_sub(1) / 2) as u32
}

impl DetalleApuesta {
    /// Row whose amount is `unit × |numbers|` (Fijo, Corrido, Centena)
    pub fn simple(
        kind: BetKind,
        numbers: Vec<String>,
        unit_amount: Decimal,
        original_line: &str,
        line_number: usize,
    ) -> Self {
        let amount = unit_amount * Decimal::from(numbers.len() as u64);
        Self {
            kind,
            numbers,
            amount,
            unit_amount,
            combinations: None,
            pairs: None,
            original_line: original_line.to_string(),
            line_number,
            expansion: None,
        }
    }

    /// Row for an expanded shorthand pattern, amount `unit × |numbers|`
    pub fn especial(
        numbers: Vec<String>,
        unit_amount: Decimal,
        expansion: Expansion,
        original_line: &str,
        line_number: usize,
    ) -> Self {
        let mut detail = Self::simple(
            BetKind::Especial,
            numbers,
            unit_amount,
            original_line,
            line_number,
        );
        detail.expansion = Some(expansion);
        detail
    }

    /// Implicit parle: stake per unordered pair over the number set
    pub fn parle_implicit(
        numbers: Vec<String>,
        unit_amount: Decimal,
        original_line: &str,
        line_number: usize,
    ) -> Self {
        let combinations = pair_combinations(numbers.len());
        let amount = unit_amount * Decimal::from(combinations);
        Self {
            kind: BetKind::Parle,
            numbers,
            amount,
            unit_amount,
            combinations: Some(combinations),
            pairs: None,
            original_line: original_line.to_string(),
            line_number,
            expansion: None,
        }
    }

    /// Explicit parle: stake per written pair
    pub fn parle_explicit(
        pairs: Vec<(String, String)>,
        unit_amount: Decimal,
        original_line: &str,
        line_number: usize,
    ) -> Self {
        let combinations = pairs.len() as u32;
        let amount = unit_amount * Decimal::from(combinations);
        let numbers = pairs
            .iter()
            .flat_map(|(a, b)| [a.clone(), b.clone()])
            .collect();
        Self {
            kind: BetKind::Parle,
            numbers,
            amount,
            unit_amount,
            combinations: Some(combinations),
            pairs: Some(pairs),
            original_line: original_line.to_string(),
            line_number,
            expansion: None,
        }
    }

    /// Candado: flat total split evenly across all pairs of the set
    pub fn candado(
        numbers: Vec<String>,
        total: Decimal,
        original_line: &str,
        line_number: usize,
    ) -> Result<Self> {
        let combinations = pair_combinations(numbers.len());
        if combinations == 0 {
            return Err(Error::calculation(
                "candado unit_amount",
                vec![total.to_string(), combinations.to_string()],
                "candado needs at least 2 numbers",
            ));
        }
        let unit_amount = total / Decimal::from(combinations);
        Ok(Self {
            kind: BetKind::Candado,
            numbers,
            amount: total,
            unit_amount,
            combinations: Some(combinations),
            pairs: None,
            original_line: original_line.to_string(),
            line_number,
            expansion: None,
        })
    }
}

/// Per-ticket metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JugadaMetadata {
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub line_count: usize,
    pub number_count: usize,
    pub bet_kinds: BTreeSet<BetKind>,
}

/// One player's complete ticket: name, bets, optional declared total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jugada {
    pub player_name: String,
    pub total_calculated: Decimal,
    pub total_declared: Option<Decimal>,
    pub original_lines: Vec<String>,
    pub details: Vec<DetalleApuesta>,
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub metadata: JugadaMetadata,
}

impl Jugada {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            total_calculated: Decimal::ZERO,
            total_declared: None,
            original_lines: Vec::new(),
            details: Vec::new(),
            is_valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            metadata: JugadaMetadata {
                timestamp: Utc::now(),
                processing_time_ms: 0,
                line_count: 0,
                number_count: 0,
                bet_kinds: BTreeSet::new(),
            },
        }
    }

    /// Recompute totals, metadata counters and validity from the details
    pub fn finalize(&mut self, tolerance: Decimal) {
        self.total_calculated = self.details.iter().map(|d| d.amount).sum();
        self.metadata.line_count = self.original_lines.len();
        self.metadata.number_count = self.details.iter().map(|d| d.numbers.len()).sum();
        self.metadata.bet_kinds = self.details.iter().map(|d| d.kind).collect();
        self.is_valid = match self.total_declared {
            None => true,
            Some(declared) => (self.total_calculated - declared).abs() < tolerance,
        };
    }

    /// Absolute declared-vs-calculated difference, zero when undeclared
    pub fn difference(&self) -> Decimal {
        self.total_declared
            .map(|declared| (self.total_calculated - declared).abs())
            .unwrap_or(Decimal::ZERO)
    }
}

/// Aggregate reconciliation over all jugadas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub total_jugadas: usize,
    pub total_calculated: Decimal,
    pub total_declared: Option<Decimal>,
    pub difference: Decimal,
    pub is_valid: bool,
    pub confidence: f64,
}

/// Parse-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseMetadata {
    pub parse_time_ms: u64,
    pub original_length: usize,
    pub processed_length: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub cache_stats: Option<crate::cache::CacheStats>,
}

/// Bet-type counters over a whole parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetStats {
    pub fijos: usize,
    pub corridos: usize,
    pub parles: usize,
    pub centenas: usize,
    pub candados: usize,
    pub especiales: usize,
    pub total_apuestas: usize,
    pub total_numeros: usize,
}

impl BetStats {
    pub fn collect(jugadas: &[Jugada]) -> Self {
        let mut stats = Self::default();
        for detail in jugadas.iter().flat_map(|j| j.details.iter()) {
            match detail.kind {
                BetKind::Fijo => stats.fijos += 1,
                BetKind::Corrido => stats.corridos += 1,
                BetKind::Parle => stats.parles += 1,
                BetKind::Centena => stats.centenas += 1,
                BetKind::Candado => stats.candados += 1,
                BetKind::Especial => stats.especiales += 1,
            }
            stats.total_apuestas += 1;
            stats.total_numeros += detail.numbers.len();
        }
        stats
    }
}

/// The complete outcome of one parse call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    pub jugadas: Vec<Jugada>,
    pub summary: ParseSummary,
    pub metadata: ParseMetadata,
    pub stats: BetStats,
}

impl ParseResult {
    /// Failure result: no jugadas, errors recorded, elapsed time kept
    pub fn failure(errors: Vec<String>, parse_time_ms: u64, original_length: usize) -> Self {
        Self {
            success: false,
            jugadas: Vec::new(),
            summary: ParseSummary {
                total_jugadas: 0,
                total_calculated: Decimal::ZERO,
                total_declared: None,
                difference: Decimal::ZERO,
                is_valid: false,
                confidence: 0.0,
            },
            metadata: ParseMetadata {
                parse_time_ms,
                original_length,
                processed_length: 0,
                warnings: Vec::new(),
                errors,
                cache_stats: None,
            },
            stats: BetStats::default(),
        }
    }
}
