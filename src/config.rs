//! Parser configuration
//!
//! Centralized, validated configuration for the parse pipeline. The
//! serialized form doubles as the cache-key fingerprint, so every option
//! that changes parse output must live here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::error::{Error, Result};

/// Main parser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Promote per-line recognizer errors to fatal parse failures
    pub strict_mode: bool,
    /// Expand shorthand patterns (volteo, rango, decena, ...) during parsing
    pub auto_expand: bool,
    /// Treat a declared-vs-calculated mismatch of 1.00 or more as an error
    pub validate_totals: bool,
    /// Cap on player blocks per parse; exceeding it aborts the parse
    pub max_jugadores: usize,
    /// Currency symbol, display only
    pub currency_symbol: String,
    /// Canonical decimal mark for amounts in input and output
    pub decimal_separator: char,
    /// Permit negative amounts
    pub allow_negative: bool,
    /// Per-bet amount above which a warning is attached
    pub max_monto: Decimal,
    /// Stake used when a bet line omits its amount
    pub default_monto_fijo: Decimal,
    /// Corrido stake used when omitted; zero suppresses the implied corrido
    pub default_monto_corrido: Decimal,
    /// Wall-clock budget for a single parse call
    pub timeout: Duration,
    /// Cap on numbers produced by expanding a single line
    pub max_expansion: usize,
    pub cache: CacheConfig,
}

/// Result cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl: Duration,
    pub max_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            auto_expand: true,
            validate_totals: true,
            max_jugadores: 100,
            currency_symbol: "$".to_string(),
            decimal_separator: '.',
            allow_negative: false,
            max_monto: dec!(1_000_000),
            default_monto_fijo: dec!(1),
            default_monto_corrido: dec!(0),
            timeout: Duration::from_millis(5000),
            max_expansion: 1000,
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_millis(300_000),
            max_size: 1000,
        }
    }
}

impl ParserConfig {
    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be non-zero".to_string()));
        }
        if self.max_jugadores == 0 {
            return Err(Error::Config(
                "max_jugadores must be at least 1".to_string(),
            ));
        }
        if self.max_expansion == 0 {
            return Err(Error::Config(
                "max_expansion must be at least 1".to_string(),
            ));
        }
        if self.currency_symbol.is_empty() {
            return Err(Error::Config(
                "currency_symbol must not be empty".to_string(),
            ));
        }
        if self.decimal_separator != '.' && self.decimal_separator != ',' {
            return Err(Error::Config(format!(
                "decimal_separator '{}' is not supported",
                self.decimal_separator
            )));
        }
        if self.default_monto_fijo < Decimal::ZERO && !self.allow_negative {
            return Err(Error::Config(
                "default_monto_fijo is negative but allow_negative is off".to_string(),
            ));
        }
        Ok(())
    }

    /// Stable fingerprint of every output-affecting option.
    ///
    /// Combined with the input-text hash to form the cache key, so two
    /// parsers with different configs never share cached results.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        let digest = Sha256::digest(json.as_bytes());
        hex_encode(&digest)
    }
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contract() {
        let config = ParserConfig::default();
        assert!(!config.strict_mode);
        assert!(config.auto_expand);
        assert!(config.validate_totals);
        assert_eq!(config.max_jugadores, 100);
        assert_eq!(config.decimal_separator, '.');
        assert_eq!(config.default_monto_fijo, dec!(1));
        assert_eq!(config.default_monto_corrido, dec!(0));
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_size, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ParserConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_exotic_separator() {
        let config = ParserConfig {
            decimal_separator: ';',
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fingerprint_tracks_options() {
        let a = ParserConfig::default();
        let mut b = ParserConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.default_monto_fijo = dec!(5);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
