//! Bolita - a parser for informal lottery-bet ticket text
//!
//! Turns free-form, phone-transcribed bolita tickets (Spanish idiom:
//! fijos, corridos, parles, centenas, candados, plus shorthand sugar
//! like volteos, rangos, decenas and terminales) into a structured,
//! validated bet ledger with decimal-exact totals reconciled against the
//! declared amounts.
//!
//! The pipeline has four stages: lexical normalization, shorthand
//! expansion, block segmentation with prioritized bet recognition, and
//! monetary reconciliation. The whole surface is pure: same text and
//! configuration always produce the same ledger, and `parse` never
//! panics or returns an error type.
//!
//! ```
//! use bolita::{parse, ParserConfig};
//!
//! let result = parse("Juan\n05 10 con 20\nTotal: 40", None);
//! assert!(result.success);
//! assert_eq!(result.jugadas[0].player_name, "Juan");
//! assert!(result.jugadas[0].is_valid);
//!
//! let strict = parse("05 10 con 20", Some(ParserConfig::default()));
//! assert_eq!(strict.summary.total_calculated.to_string(), "40");
//! ```

pub mod analysis;
pub mod cache;
pub mod calc;
pub mod config;
pub mod error;
pub mod expand;
pub mod model;
pub mod parser;
pub mod patterns;
pub mod preprocess;
pub mod recognize;
pub mod segment;
pub mod validation;

// Re-export commonly used types
pub use cache::CacheStats;
pub use config::{CacheConfig, ParserConfig};
pub use error::{Error, ErrorCategory, Result};
pub use model::{
    BetKind, BetStats, DetalleApuesta, Expansion, Jugada, ParseMetadata, ParseResult,
    ParseSummary, PatternType,
};
pub use parser::{parse, validate, Parser};
pub use recognize::{CustomRecognizer, RecognizerRegistry};
pub use segment::BlockInfo;
pub use validation::ValidationResult;
