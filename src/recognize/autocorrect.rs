//! AutoCorrect: textual repairs applied before any recognizer claims
//!
//! Rewrites common transcription habits into the canonical grammar.
//! Emits no rows; the corrected line flows to the rest of the chain.

use once_cell::sync::Lazy;
use regex::Regex;

static HYPHENATED_NUMBERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)-(\d)").expect("hyphenated numbers"));
static CURRENCY_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d)\s*(?:pesos|bss|bs)\b").expect("currency tail"));
static Y_MEDIA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s+y\s+media\b").expect("y media"));
static PARLE_WITHOUT_CON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bparle\s*[:=]?\s+(\d)").expect("parle without con"));

/// Apply every correction, in order, returning the rewritten line
pub fn rewrite(line: &str) -> String {
    let line = HYPHENATED_NUMBERS.replace_all(line, "$1 $2");
    let line = CURRENCY_TAIL.replace_all(&line, "$1");
    let line = Y_MEDIA.replace_all(&line, "$1.5");
    PARLE_WITHOUT_CON
        .replace_all(&line, "parle con $1")
        .into_owned()
}
