//! Parse orchestration
//!
//! Wires the pipeline together: cache lookup, normalization, syntactic
//! validation, block segmentation, per-block recognition with stake
//! carryover and timeout checks, semantic validation, and the final
//! summary/statistics assembly. The public surface never panics and
//! never returns `Err`; every failure is folded into the returned
//! `ParseResult`.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::analysis;
use crate::cache::{CacheStats, ParseCache};
use crate::calc::{self, ConfidenceInputs};
use crate::config::ParserConfig;
use crate::error::{Error, Result};
use crate::model::{BetStats, Jugada, ParseMetadata, ParseResult};
use crate::preprocess::Preprocessor;
use crate::recognize::{BlockContext, CustomRecognizer, RecognizerRegistry};
use crate::segment::{self, Block, BlockInfo};
use crate::validation::{self, ValidationResult};

/// The bolita ticket parser
pub struct Parser {
    config: ParserConfig,
    registry: RecognizerRegistry,
    preprocessor: Preprocessor,
    cache: Option<Arc<ParseCache>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self::with_registry(config, RecognizerRegistry::builtin())
    }

    /// Construct with an explicit recognizer registry. The registry is a
    /// plain value owned by this parser; there is no process-wide state.
    pub fn with_registry(config: ParserConfig, registry: RecognizerRegistry) -> Self {
        if let Err(err) = config.validate() {
            warn!(%err, "parser constructed with invalid configuration");
        }
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(ParseCache::new(&config.cache)));
        let preprocessor = Preprocessor::new(&config);
        Self {
            config,
            registry,
            preprocessor,
            cache,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Extension hook: register an external recognizer
    pub fn register_recognizer(&mut self, recognizer: CustomRecognizer) {
        self.registry.register(recognizer);
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Parse a ticket. Never panics; failures are encoded in the result.
    pub fn parse(&self, text: &str) -> ParseResult {
        let started = Instant::now();
        match self.parse_inner(text, started) {
            Ok(result) => result,
            Err(err) => {
                error!(%err, "parse failed");
                ParseResult::failure(
                    vec![err.to_string()],
                    started.elapsed().as_millis() as u64,
                    text.len(),
                )
            }
        }
    }

    /// Syntactic validation without bet recognition
    pub fn validate(&self, text: &str) -> ValidationResult {
        let processed = self.preprocessor.normalize(text);
        validation::validate_syntax(&processed, &self.config)
    }

    /// Segmentation only: the block structure of the ticket
    pub fn extract_structure(&self, text: &str) -> Result<Vec<BlockInfo>> {
        let processed = self.preprocessor.normalize(text);
        segment::extract_structure(&processed, self.config.max_jugadores)
    }

    fn parse_inner(&self, text: &str, started: Instant) -> Result<ParseResult> {
        self.config.validate()?;
        if text.trim().is_empty() {
            return Err(Error::parser("Empty text"));
        }

        let cache_key = self
            .cache
            .as_ref()
            .map(|_| ParseCache::key(text, &self.config));
        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(mut hit) = cache.get(key) {
                hit.metadata.parse_time_ms = started.elapsed().as_millis() as u64;
                hit.metadata.cache_stats = Some(cache.stats());
                return Ok(hit);
            }
        }

        let processed = self.preprocessor.normalize(text);
        let syntax = validation::validate_syntax(&processed, &self.config);
        if self.config.strict_mode && !syntax.is_valid {
            return Err(Error::Validation(syntax.errors));
        }
        let analysis = analysis::analyze(&processed);
        let blocks = segment::segment(&processed, self.config.max_jugadores)?;
        debug!(
            blocks = blocks.len(),
            syntax_errors = syntax.errors.len(),
            "recognizing blocks"
        );

        let mut jugadas: Vec<Jugada> = Vec::new();
        for block in &blocks {
            if started.elapsed() > self.config.timeout {
                return Err(Error::timeout(
                    self.config.timeout.as_millis() as u64,
                    format!("recognition, block {} of {}", jugadas.len() + 1, blocks.len()),
                ));
            }
            jugadas.push(self.process_block(block)?);
        }

        for jugada in &mut jugadas {
            jugada.finalize(calc::tolerance());
            let semantic = validation::validate_jugada(jugada, &self.config);
            jugada.warnings.extend(semantic.warnings);
            jugada.errors.extend(semantic.errors);
        }

        let confidence = calc::confidence(ConfidenceInputs {
            syntax_errors: syntax.errors.len(),
            syntax_warnings: syntax.warnings.len(),
            invalid_jugadas: jugadas.iter().filter(|j| !j.is_valid).count(),
            exact_match_jugadas: calc::exact_matches(&jugadas),
            total_jugadas: jugadas.len(),
        });
        let summary = calc::summarize(&jugadas, confidence);
        let stats = BetStats::collect(&jugadas);

        let mut metadata_errors = syntax.errors;
        for (index, jugada) in jugadas.iter().enumerate() {
            for err in &jugada.errors {
                metadata_errors.push(format!("block {}: {err}", index + 1));
            }
        }
        let mut metadata_warnings = syntax.warnings;
        metadata_warnings.extend(analysis.diagnostics());

        let mut result = ParseResult {
            success: true,
            jugadas,
            summary,
            metadata: ParseMetadata {
                parse_time_ms: started.elapsed().as_millis() as u64,
                original_length: text.len(),
                processed_length: processed.len(),
                warnings: metadata_warnings,
                errors: metadata_errors,
                cache_stats: None,
            },
            stats,
        };

        if let (Some(cache), Some(key)) = (&self.cache, cache_key) {
            cache.put(key, result.clone());
            result.metadata.cache_stats = Some(cache.stats());
        }
        Ok(result)
    }

    fn process_block(&self, block: &Block) -> Result<Jugada> {
        let block_started = Instant::now();
        let mut jugada = Jugada::new(block.player());
        jugada.total_declared = block.declared_total;
        jugada.warnings.extend(block.warnings.iter().cloned());

        let mut ctx = BlockContext::new(&self.config);
        for line in &block.lines {
            jugada.original_lines.push(line.text.clone());
            ctx.at_line(line.number, &line.text);
            match self.registry.dispatch(&line.text, &mut ctx) {
                Ok(Some((claimant, details))) => {
                    debug!(
                        claimant = claimant.as_str(),
                        line = line.number,
                        rows = details.len(),
                        "line recognized"
                    );
                    jugada.details.extend(details);
                }
                Ok(None) => {
                    jugada
                        .warnings
                        .push(format!("line {}: unclassified line", line.number));
                }
                Err(err) if err.is_fatal() || self.config.strict_mode => return Err(err),
                Err(err) => {
                    warn!(line = line.number, %err, "line failed, continuing");
                    jugada.errors.push(err.to_string());
                }
            }
        }
        jugada.warnings.append(&mut ctx.warnings);
        jugada.metadata.processing_time_ms = block_started.elapsed().as_millis() as u64;
        Ok(jugada)
    }
}

/// Parse with an optional configuration (defaults apply when omitted)
pub fn parse(text: &str, config: Option<ParserConfig>) -> ParseResult {
    Parser::new(config.unwrap_or_default()).parse(text)
}

/// Validate with an optional configuration
pub fn validate(text: &str, config: Option<ParserConfig>) -> ValidationResult {
    Parser::new(config.unwrap_or_default()).validate(text)
}
