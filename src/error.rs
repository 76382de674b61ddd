//! Error types and handling for the bolita parser
//!
//! The public `parse` surface never returns these directly; failures are
//! folded into the returned `ParseResult`. Internally the pipeline
//! propagates this taxonomy so that strict mode and per-line recovery can
//! make consistent decisions.

use thiserror::Error;

/// Result type alias for bolita operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for classifying failures when reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Failures of the parse pipeline itself
    Parsing,
    /// Input failed syntactic or semantic validation
    Validation,
    /// A shorthand pattern could not be expanded
    Expansion,
    /// Monetary arithmetic failure
    Calculation,
    /// The parse exceeded its wall-clock budget
    Timeout,
    /// The configuration was rejected
    Configuration,
}

/// Bolita error types
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("parse error: {message}")]
    Parser {
        message: String,
        context: Option<String>,
    },

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("cannot expand '{token}': {reason}")]
    Expansion { token: String, reason: String },

    #[error("calculation error in {operation}: {reason}")]
    Calculation {
        operation: String,
        operands: Vec<String>,
        reason: String,
    },

    #[error("parse exceeded {budget_ms}ms budget at {stage}")]
    Timeout { budget_ms: u64, stage: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for a context-free parser error
    pub fn parser(message: impl Into<String>) -> Self {
        Error::Parser {
            message: message.into(),
            context: None,
        }
    }

    /// Parser error carrying the offending fragment
    pub fn parser_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Error::Parser {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Shorthand for an expansion failure on a single token
    pub fn expansion(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Expansion {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an arithmetic failure
    pub fn calculation(
        operation: impl Into<String>,
        operands: Vec<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Calculation {
            operation: operation.into(),
            operands,
            reason: reason.into(),
        }
    }

    /// Timeout carrying the wall-clock budget and the stage reached
    pub fn timeout(budget_ms: u64, stage: impl Into<String>) -> Self {
        Error::Timeout {
            budget_ms,
            stage: stage.into(),
        }
    }

    /// Get the error category for reporting
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Parser { .. } => ErrorCategory::Parsing,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Expansion { .. } => ErrorCategory::Expansion,
            Self::Calculation { .. } => ErrorCategory::Calculation,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Whether this error must abort the whole parse regardless of mode.
    ///
    /// Per-line expansion and validation problems are recoverable: they are
    /// recorded on the owning Jugada and the parse continues (unless strict
    /// mode promotes them). Timeouts and configuration rejections are not.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Config(_))
    }
}
