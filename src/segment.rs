//! Block segmentation: partitioning a ticket into per-player blocks
//!
//! A block begins at a player-name line and runs until the next name line
//! or a blank separator after content. Tickets written without any name
//! line form a single block for the `Desconocido` player.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calc;
use crate::error::{Error, Result};
use crate::patterns;

/// Fallback player for tickets without a name line
pub const UNKNOWN_PLAYER: &str = "Desconocido";

/// Classification of a single preprocessed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Name,
    Total,
    Bet,
    Blank,
}

/// One content line of a block, with its 1-based position in the text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

/// A per-player segment of the ticket
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub player_name: Option<String>,
    pub lines: Vec<Line>,
    pub declared_total: Option<Decimal>,
    pub warnings: Vec<String>,
}

impl Block {
    fn named(name: &str) -> Self {
        Self {
            player_name: Some(name.to_string()),
            lines: Vec::new(),
            declared_total: None,
            warnings: Vec::new(),
        }
    }

    fn anonymous() -> Self {
        Self {
            player_name: None,
            lines: Vec::new(),
            declared_total: None,
            warnings: Vec::new(),
        }
    }

    fn has_content(&self) -> bool {
        self.player_name.is_some() || !self.lines.is_empty() || self.declared_total.is_some()
    }

    /// Player name, falling back to `Desconocido`
    pub fn player(&self) -> &str {
        self.player_name.as_deref().unwrap_or(UNKNOWN_PLAYER)
    }
}

/// Segmentation-only view of a block, for structure extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub player_name: String,
    pub first_line: usize,
    pub line_count: usize,
    pub declared_total: Option<Decimal>,
}

/// Name-line heuristic.
///
/// A trimmed line reads as a player name iff its length is 2..=35, it does
/// not start with a digit, none of its tokens is reserved by the grammar,
/// and its letter-to-length ratio exceeds `min_letter_ratio` (0.6 for
/// segmentation, 0.7 for case preservation in the preprocessor).
pub fn looks_like_player_name(line: &str, min_letter_ratio: f64) -> bool {
    let line = line.trim();
    let length = line.chars().count();
    if !(2..=35).contains(&length) {
        return false;
    }
    if line.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }
    if line.split_whitespace().any(patterns::is_reserved) {
        return false;
    }
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    letters as f64 / length as f64 > min_letter_ratio
}

/// Whether the line declares a block total
pub fn is_total_line(line: &str) -> bool {
    let lowered = line.trim().to_lowercase();
    lowered == "total" || lowered.starts_with("total ") || lowered.starts_with("total:")
        || lowered.starts_with("total=")
}

/// Classify one preprocessed line
pub fn classify_line(line: &str) -> LineClass {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineClass::Blank
    } else if is_total_line(trimmed) {
        LineClass::Total
    } else if looks_like_player_name(trimmed, 0.6) {
        LineClass::Name
    } else {
        LineClass::Bet
    }
}

/// Declared amount of a total line, when present and parseable
pub fn total_amount(line: &str) -> Option<Decimal> {
    patterns::TOTAL
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| calc::parse_amount(m.as_str()))
}

/// Partition preprocessed text into per-player blocks.
///
/// Aborts when the block count exceeds `max_jugadores`.
pub fn segment(text: &str, max_jugadores: usize) -> Result<Vec<Block>> {
    let blocks = split_blocks(text);
    if blocks.len() > max_jugadores {
        return Err(Error::parser(format!(
            "block count {} exceeds maximum {}",
            blocks.len(),
            max_jugadores
        )));
    }
    debug!(blocks = blocks.len(), "segmented ticket");
    Ok(blocks)
}

/// Number of blocks segmentation would produce, with no cap applied.
///
/// The syntactic validator uses this so that its `max_jugadores` check can
/// never disagree with the segmenter's fatal one.
pub fn count_blocks(text: &str) -> usize {
    split_blocks(text).len()
}

fn split_blocks(text: &str) -> Vec<Block> {
    let any_name = text
        .split('\n')
        .any(|line| classify_line(line) == LineClass::Name);

    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Option<Block> = None;

    for (index, raw_line) in text.split('\n').enumerate() {
        let line_number = index + 1;
        let trimmed = raw_line.trim();

        match classify_line(trimmed) {
            LineClass::Blank => {
                // Separator: close the running block. Without any name
                // line in the whole ticket everything stays together.
                if any_name {
                    if let Some(block) = current.take() {
                        if block.has_content() {
                            blocks.push(block);
                        }
                    }
                }
            }
            LineClass::Name => {
                if let Some(block) = current.take() {
                    if block.has_content() {
                        blocks.push(block);
                    }
                }
                current = Some(Block::named(trimmed));
            }
            LineClass::Total => {
                let block = current.get_or_insert_with(Block::anonymous);
                match total_amount(trimmed) {
                    Some(amount) if block.declared_total.is_none() => {
                        block.declared_total = Some(amount);
                    }
                    Some(_) => block.warnings.push(format!(
                        "line {line_number}: extra total line ignored"
                    )),
                    None => block
                        .warnings
                        .push(format!("line {line_number}: total line without amount")),
                }
            }
            LineClass::Bet => {
                let block = current.get_or_insert_with(Block::anonymous);
                block.lines.push(Line {
                    number: line_number,
                    text: trimmed.to_string(),
                });
            }
        }
    }
    if let Some(block) = current.take() {
        if block.has_content() {
            blocks.push(block);
        }
    }
    blocks
}

/// Segmentation-only structure extraction, no bet recognition
pub fn extract_structure(text: &str, max_jugadores: usize) -> Result<Vec<BlockInfo>> {
    let blocks = segment(text, max_jugadores)?;
    Ok(blocks
        .iter()
        .map(|block| BlockInfo {
            player_name: block.player().to_string(),
            first_line: block.lines.first().map(|l| l.number).unwrap_or(0),
            line_count: block.lines.len(),
            declared_total: block.declared_total,
        })
        .collect())
}
