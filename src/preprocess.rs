//! Lexical normalization of raw ticket text
//!
//! Tickets arrive as free-form phone transcriptions: mixed line endings,
//! stray unicode spaces, letter/digit confusables, glued stake clauses.
//! This stage canonicalizes all of that so the segmenter and recognizers
//! work over a predictable alphabet. The whole stage is pure and
//! idempotent: normalizing already-normalized text is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::expand;
use crate::segment;

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("newline runs"));
static SPACE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\t\u{00A0}\u{1680}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}]")
        .expect("space class")
});
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("space runs"));
static STAR_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\*\s*").expect("star spacing"));
static PLUS_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\+\s*").expect("plus spacing"));
static X_BETWEEN_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\s*[x×]\s*(\d)").expect("x spacing"));
static HYPHEN_BETWEEN_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\s*-\s*(\d)").expect("hyphen spacing"));
static DOT_BETWEEN_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\s*\.\s*(\d)").expect("dot spacing"));
static COMMA_BETWEEN_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d),(\d)").expect("comma decimal"));
static DOT_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)\.(\d)").expect("dot decimal"));
static GLUED_CON: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcon(\d)").expect("glued con"));
static GLUED_Y: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)y(\d)").expect("glued y"));
static CURRENCY_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\s*(?:pesos|bss|bs)\b").expect("currency words"));

/// Characters a numeric token may be composed of before confusable repair
const CONFUSABLE_SET: &str = "0123456789oOøØοΟlI|";

/// Normalizes raw ticket text for segmentation and recognition
pub struct Preprocessor {
    config: ParserConfig,
}

impl Preprocessor {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Full preprocessing: normalization plus, when `auto_expand` is on,
    /// in-text expansion of shorthand patterns.
    ///
    /// The parse pipeline itself calls [`Preprocessor::normalize`] and lets
    /// the SpecialPatterns recognizer expand, so that `Especial` rows keep
    /// their provenance; this full form serves text-level consumers.
    pub fn preprocess(&self, text: &str) -> Result<String> {
        let staged = self.early_stages(text);
        let staged = if self.config.auto_expand {
            expand::expand_text(&staged, self.config.max_expansion)?
        } else {
            staged
        };
        Ok(self.late_stages(&staged))
    }

    /// Normalization without pattern expansion
    pub fn normalize(&self, text: &str) -> String {
        let staged = self.early_stages(text);
        let out = self.late_stages(&staged);
        debug!(
            original_len = text.len(),
            normalized_len = out.len(),
            "preprocessed ticket text"
        );
        out
    }

    /// Steps 1-5: line endings, whitespace, operators, confusables, case
    fn early_stages(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let text = NEWLINE_RUNS.replace_all(&text, "\n\n");

        let mut lines: Vec<String> = Vec::new();
        for (index, raw_line) in text.split('\n').enumerate() {
            let line = SPACE_CLASS.replace_all(raw_line, " ");
            let line = SPACE_RUNS.replace_all(&line, " ");
            let line = line.trim();

            let line = normalize_operators(line);
            let line = repair_confusables(&line);

            // First line keeps its casing when it reads as a player name,
            // with the stricter 0.7 letter ratio.
            let keep_case = index == 0 && segment::looks_like_player_name(&line, 0.7);
            let line = if keep_case { line } else { line.to_lowercase() };
            lines.push(line);
        }
        lines.join("\n")
    }

    /// Steps 7-8: monetary normalization and the conservative final filter
    fn late_stages(&self, text: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        for raw_line in text.split('\n') {
            let line = self.normalize_money(raw_line);
            let line: String = line
                .chars()
                .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ".,-*".contains(*c))
                .collect();
            let line = SPACE_RUNS.replace_all(&line, " ");
            let line = line.trim();

            // A line that only carried stripped junk disappears entirely;
            // genuinely blank lines survive as block separators.
            if line.is_empty() && !raw_line.trim().is_empty() {
                continue;
            }
            lines.push(line.to_string());
        }
        // Dropped lines can leave runs of blanks behind
        let joined = lines.join("\n");
        NEWLINE_RUNS.replace_all(&joined, "\n\n").into_owned()
    }

    fn normalize_money(&self, line: &str) -> String {
        let line = if self.config.decimal_separator == ',' {
            DOT_DECIMAL.replace_all(line, "$1,$2").into_owned()
        } else {
            COMMA_BETWEEN_DIGITS.replace_all(line, "$1.$2").into_owned()
        };
        let line = line.replace(['$', '€', '£'], "");
        let line = GLUED_CON.replace_all(&line, "con $1");
        let line = GLUED_Y.replace_all(&line, "$1 y $2");
        CURRENCY_WORDS.replace_all(&line, "$1").into_owned()
    }
}

fn normalize_operators(line: &str) -> String {
    let line = line.replace('×', "x");
    let line = STAR_SPACING.replace_all(&line, "*");
    let line = PLUS_SPACING.replace_all(&line, "+");
    let line = X_BETWEEN_DIGITS.replace_all(&line, "${1}x${2}");
    let line = HYPHEN_BETWEEN_DIGITS.replace_all(&line, "${1}-${2}");
    DOT_BETWEEN_DIGITS.replace_all(&line, "${1}.${2}").into_owned()
}

/// Repair o→0 and l→1 style confusables inside numeric tokens.
///
/// Only tokens that already contain a digit are touched; words like `con`
/// or a bare `o` ("or") pass through. Quote characters are stripped
/// everywhere.
fn repair_confusables(line: &str) -> String {
    let line = line.replace(['\'', '"', '`', '´'], "");
    line.split(' ')
        .map(|token| {
            let is_numeric_shape = !token.is_empty()
                && token.chars().all(|c| CONFUSABLE_SET.contains(c))
                && token.chars().any(|c| c.is_ascii_digit());
            if is_numeric_shape {
                token
                    .chars()
                    .map(|c| match c {
                        'o' | 'O' | 'ø' | 'Ø' | 'ο' | 'Ο' => '0',
                        'l' | 'I' | '|' => '1',
                        other => other,
                    })
                    .collect()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        Preprocessor::new(&ParserConfig::default()).normalize(text)
    }

    #[test]
    fn test_line_endings_collapse() {
        assert_eq!(normalize("05 con 1\r\n10 con 2"), "05 con 1\n10 con 2");
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_whitespace_and_trim() {
        assert_eq!(normalize("  05\t10   con\u{00A0}20 "), "05 10 con 20");
    }

    #[test]
    fn test_operator_spacing() {
        assert_eq!(normalize("25 * 33 parle con 5"), "25*33 parle con 5");
        assert_eq!(normalize("25 × 33 con 5"), "25x33 con 5");
        assert_eq!(normalize("05 - 10 con 2"), "05-10 con 2");
    }

    #[test]
    fn test_confusables_in_numeric_tokens() {
        assert_eq!(normalize("o5 1o con 2o"), "05 10 con 20");
        assert_eq!(normalize("l5 con 5"), "15 con 5");
        // Words keep their letters
        assert_eq!(normalize("05 con 5"), "05 con 5");
        assert_eq!(normalize("'05' \"10\" con 5"), "05 10 con 5");
    }

    #[test]
    fn test_case_folding_preserves_name_line() {
        let out = normalize("Juan Pérez\n05 10 CON 20");
        assert_eq!(out, "Juan Pérez\n05 10 con 20");
    }

    #[test]
    fn test_first_line_not_a_name_is_folded() {
        assert_eq!(normalize("05 10 CON 20"), "05 10 con 20");
        assert_eq!(normalize("TOTAL: 40"), "total 40");
    }

    #[test]
    fn test_monetary_normalization() {
        assert_eq!(normalize("05 con20"), "05 con 20");
        assert_eq!(normalize("05 10 con 20,50"), "05 10 con 20.50");
        assert_eq!(normalize("05 con 20y30"), "05 con 20 y 30");
        assert_eq!(normalize("05 con $20"), "05 con 20");
        assert_eq!(normalize("05 con$20"), "05 con 20");
        assert_eq!(normalize("05 con 20 pesos"), "05 con 20");
    }

    #[test]
    fn test_comma_separator_config() {
        let config = ParserConfig {
            decimal_separator: ',',
            ..Default::default()
        };
        let out = Preprocessor::new(&config).normalize("05 con 20.50");
        assert_eq!(out, "05 con 20,50");
    }

    #[test]
    fn test_final_filter_keeps_accents_drops_junk() {
        assert_eq!(normalize("María José\n05 con 2"), "María José\n05 con 2");
        assert_eq!(normalize("05 # 10 @ con !! 20"), "05 10 con 20");
        // A junk-only line vanishes without leaving a blank separator
        assert_eq!(normalize("05 con 2\n####\n10 con 3"), "05 con 2\n10 con 3");
    }

    #[test]
    fn test_blank_separators_survive() {
        let out = normalize("Juan\n05 con 2\n\nPedro\n10 con 3");
        assert_eq!(out, "Juan\n05 con 2\n\npedro\n10 con 3");
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "Juan Pérez\n05 10 con 20\nTotal: 40",
            "  o5 - 1o   CON 2o,5\n\n\n\n25 × 33 parle con 5",
            "María\n05 con $2 pesos\nt5 con 1",
            // A junk-only line between separators must not leave a blank run
            "05 con 2\n\n####\n\n10 con 3",
        ];
        let pre = Preprocessor::new(&ParserConfig::default());
        for sample in samples {
            let once = pre.normalize(sample);
            assert_eq!(pre.normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_preprocess_with_expansion() {
        let pre = Preprocessor::new(&ParserConfig::default());
        let out = pre.preprocess("10v con 10").unwrap();
        assert_eq!(out, "10 01 con 10");
        // Expanded text is a fixed point too
        assert_eq!(pre.preprocess(&out).unwrap(), out);
    }
}
