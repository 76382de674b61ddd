//! Bet recognition: the prioritized dispatcher and its recognizers
//!
//! Each recognizer can claim a line and emit zero or more typed bet rows.
//! The dispatcher holds recognizers sorted by descending priority; for
//! every bet line it applies rewriting recognizers first (AutoCorrect is
//! never a final claimant) and then hands the line to the first claimant.
//! Built-ins are a closed enum; external recognizers register a
//! probe/produce/validate trio and slot into the same priority order.

pub mod autocorrect;
pub mod basic;
pub mod candado;
pub mod centena;
pub mod parle;
pub mod special;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::config::ParserConfig;
use crate::error::{Error, Result};
use crate::model::DetalleApuesta;
use crate::patterns;

static CON_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bcon\b").expect("con boundary"));

/// Per-block recognition state.
///
/// Carries the stake-carryover defaults: a line with numbers but no `con`
/// clause replays the most recent explicit fijo/corrido units of the same
/// block, falling back to the configured defaults.
pub struct BlockContext<'a> {
    pub config: &'a ParserConfig,
    pub line_number: usize,
    /// The line as it appeared before AutoCorrect rewrites
    pub original_line: String,
    pub last_fijo: Option<Decimal>,
    pub last_corrido: Option<Decimal>,
    pub warnings: Vec<String>,
}

impl<'a> BlockContext<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self {
            config,
            line_number: 0,
            original_line: String::new(),
            last_fijo: None,
            last_corrido: None,
            warnings: Vec::new(),
        }
    }

    /// Position the context on a new line of the block
    pub fn at_line(&mut self, line_number: usize, original_line: &str) {
        self.line_number = line_number;
        self.original_line = original_line.to_string();
    }

    /// Fijo unit for this line: explicit, carried over, or configured
    pub fn fijo_unit(&self, explicit: Option<Decimal>) -> Decimal {
        explicit
            .or(self.last_fijo)
            .unwrap_or(self.config.default_monto_fijo)
    }

    /// Corrido unit for a line without an explicit `y B` clause
    pub fn carried_corrido(&self) -> Option<Decimal> {
        let unit = self.last_corrido.unwrap_or(self.config.default_monto_corrido);
        (unit > Decimal::ZERO).then_some(unit)
    }

    /// Remember the units of an emitted fijo row
    pub fn note_fijo(&mut self, unit: Decimal) {
        self.last_fijo = Some(unit);
    }

    /// Remember (or clear) the corrido default after a fijo-bearing line
    pub fn note_corrido(&mut self, unit: Option<Decimal>) {
        self.last_corrido = unit;
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Capability probe for an external recognizer
pub type ProbeFn = dyn Fn(&str) -> bool + Send + Sync;
/// Producer for an external recognizer
pub type ProduceFn = dyn Fn(&str, &BlockContext) -> Result<Vec<DetalleApuesta>> + Send + Sync;
/// Post-production validator for an external recognizer
pub type ValidateFn = dyn Fn(&[DetalleApuesta]) -> bool + Send + Sync;

/// An externally registered recognizer: probe, producer, optional validator
#[derive(Clone)]
pub struct CustomRecognizer {
    pub name: String,
    pub priority: u8,
    probe: Arc<ProbeFn>,
    produce: Arc<ProduceFn>,
    validate: Option<Arc<ValidateFn>>,
}

impl CustomRecognizer {
    pub fn new(
        name: impl Into<String>,
        priority: u8,
        probe: impl Fn(&str) -> bool + Send + Sync + 'static,
        produce: impl Fn(&str, &BlockContext) -> Result<Vec<DetalleApuesta>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            probe: Arc::new(probe),
            produce: Arc::new(produce),
            validate: None,
        }
    }

    pub fn with_validator(
        mut self,
        validate: impl Fn(&[DetalleApuesta]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Arc::new(validate));
        self
    }
}

impl fmt::Debug for CustomRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRecognizer")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish()
    }
}

/// The closed set of built-in recognizers plus the extension point
#[derive(Debug, Clone)]
pub enum Recognizer {
    AutoCorrect,
    SpecialPatterns,
    Candado,
    Centena,
    Parle,
    BasicBet,
    Custom(CustomRecognizer),
}

impl Recognizer {
    pub fn name(&self) -> &str {
        match self {
            Self::AutoCorrect => "autocorrect",
            Self::SpecialPatterns => "special_patterns",
            Self::Candado => "candado",
            Self::Centena => "centena",
            Self::Parle => "parle",
            Self::BasicBet => "basic_bet",
            Self::Custom(custom) => &custom.name,
        }
    }

    pub fn priority(&self) -> u8 {
        match self {
            Self::AutoCorrect => 100,
            Self::SpecialPatterns => 90,
            Self::Candado => 80,
            Self::Centena => 70,
            Self::Parle => 60,
            Self::BasicBet => 50,
            Self::Custom(custom) => custom.priority,
        }
    }

    /// Rewriting recognizers transform the line and pass it on; they are
    /// never the final claimant.
    pub fn is_rewriter(&self) -> bool {
        matches!(self, Self::AutoCorrect)
    }

    pub fn rewrite(&self, line: &str) -> String {
        match self {
            Self::AutoCorrect => autocorrect::rewrite(line),
            _ => line.to_string(),
        }
    }

    pub fn claims(&self, line: &str, ctx: &BlockContext) -> bool {
        match self {
            Self::AutoCorrect => true,
            Self::SpecialPatterns => special::claims(line, ctx),
            Self::Candado => candado::claims(line),
            Self::Centena => centena::claims(line),
            Self::Parle => parle::claims(line),
            Self::BasicBet => basic::claims(line),
            Self::Custom(custom) => (custom.probe)(line),
        }
    }

    pub fn process(&self, line: &str, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
        match self {
            Self::AutoCorrect => Ok(Vec::new()),
            Self::SpecialPatterns => special::process(line, ctx),
            Self::Candado => candado::process(line, ctx),
            Self::Centena => centena::process(line, ctx),
            Self::Parle => parle::process(line, ctx),
            Self::BasicBet => basic::process(line, ctx),
            Self::Custom(custom) => {
                let details = (custom.produce)(line, ctx)?;
                if let Some(validate) = &custom.validate {
                    if !validate(&details) {
                        return Err(Error::parser_with_context(
                            format!("recognizer '{}' rejected its own output", custom.name),
                            line,
                        ));
                    }
                }
                Ok(details)
            }
        }
    }
}

/// Priority-ordered recognizer list, threaded into each parser instance
#[derive(Debug, Clone)]
pub struct RecognizerRegistry {
    recognizers: Vec<Recognizer>,
}

impl Default for RecognizerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RecognizerRegistry {
    /// The six built-in recognizers at their contractual priorities
    pub fn builtin() -> Self {
        Self {
            recognizers: vec![
                Recognizer::AutoCorrect,
                Recognizer::SpecialPatterns,
                Recognizer::Candado,
                Recognizer::Centena,
                Recognizer::Parle,
                Recognizer::BasicBet,
            ],
        }
    }

    /// Register an external recognizer, keeping descending priority order.
    /// Ties resolve in favor of earlier registrations.
    pub fn register(&mut self, custom: CustomRecognizer) {
        self.recognizers.push(Recognizer::Custom(custom));
        self.recognizers
            .sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Run one bet line through the chain. Returns the claimant name and
    /// its rows, or `None` when no recognizer claims the line.
    pub fn dispatch(
        &self,
        line: &str,
        ctx: &mut BlockContext,
    ) -> Result<Option<(String, Vec<DetalleApuesta>)>> {
        let mut working = line.to_string();
        for recognizer in &self.recognizers {
            if recognizer.is_rewriter() {
                working = recognizer.rewrite(&working);
                continue;
            }
            if recognizer.claims(&working, ctx) {
                trace!(
                    recognizer = recognizer.name(),
                    line = working.as_str(),
                    "line claimed"
                );
                let details = recognizer.process(&working, ctx)?;
                return Ok(Some((recognizer.name().to_string(), details)));
            }
        }
        Ok(None)
    }
}

/// Split a line at its first `con` keyword: (numbers part, stake part)
pub(crate) fn split_at_con(line: &str) -> (&str, Option<&str>) {
    match CON_BOUNDARY.find(line) {
        Some(found) => (&line[..found.start()], Some(&line[found.end()..])),
        None => (line, None),
    }
}

/// Extract canonical bet numbers from a line fragment.
///
/// 1-digit tokens are zero-padded, 2- and 3-digit tokens pass through,
/// 4-digit tokens split into two 2-digit numbers. Longer digit runs are
/// reported and skipped; non-numeric tokens are ignored.
pub(crate) fn extract_numbers(fragment: &str, warnings: &mut Vec<String>) -> Vec<String> {
    let mut numbers = Vec::new();
    for token in fragment.split_whitespace() {
        if !token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        match token.len() {
            0 => {}
            1 => numbers.push(format!("0{token}")),
            2 | 3 => numbers.push(token.to_string()),
            4 => {
                numbers.push(token[..2].to_string());
                numbers.push(token[2..].to_string());
            }
            _ => warnings.push(format!("number '{token}' is too long and was skipped")),
        }
    }
    numbers
}

/// The `con A [y B] [y C]` amounts of a line, in clause order
pub(crate) fn con_amounts(line: &str) -> (Option<Decimal>, Option<Decimal>, Option<Decimal>) {
    match patterns::CON_AMOUNTS.captures(line) {
        Some(caps) => {
            let amount = |i: usize| {
                caps.get(i)
                    .and_then(|m| crate::calc::parse_amount(m.as_str()))
            };
            (amount(1), amount(2), amount(3))
        }
        None => (None, None, None),
    }
}
