//! Patterns catalog: the closed domain grammar
//!
//! Every regex and keyword literal the pipeline dispatches on is defined
//! here and compiled exactly once. Recognizers, the preprocessor and the
//! segmenter all consume this table; nothing else in the crate constructs
//! a `Regex` for grammar purposes.

use once_cell::sync::Lazy;
use regex::Regex;

/// `NN v` — a number and its digit-reversal
pub static VOLTEO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([0-9]{1,2})\s*v\b").expect("VOLTEO pattern"));

/// `A al B` — inclusive range expanded to 2-digit numbers
pub static RANGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([0-9]{1,3})\s*al\s*([0-9]{1,3})\b").expect("RANGO pattern"));

/// `d X` — the ten numbers ending in digit X
pub static DECENA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bd\s*([0-9])\b").expect("DECENA pattern"));

/// `t X` — the ten numbers starting with digit X
pub static TERMINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bt\s*([0-9])\b").expect("TERMINAL pattern"));

/// `NN pr K` — relative pairs NN01..NN{K}
pub static PARES_RELATIVOS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([0-9]{1,2})\s*pr\s*([0-9]{1,3})\b").expect("PARES_RELATIVOS pattern"));

/// `NN [NN ...] por todas las centenas [con M]`
pub static CENTENAS_TODAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)((?:[0-9]{1,2}\s+)*[0-9]{1,2})\s+por\s+todas\s+las\s+centenas(?:\s+con\s+([0-9]+(?:[.,][0-9]+)?))?")
        .expect("CENTENAS_TODAS pattern")
});

/// `K veces NN` — NN repeated K times
pub static REPETICION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([0-9]{1,3})\s*veces\s*([0-9]{1,2})\b").expect("REPETICION pattern"));

/// `NN*NN` or `NN x NN` — one explicit parle pair
pub static PARLE_EXPLICITO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([0-9]{1,2})\s*[*x]\s*([0-9]{1,2})\b").expect("PARLE_EXPLICITO pattern"));

/// Trailing `p M` — implicit parle stake over the preceding numbers
pub static PARLE_INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bp\s*([0-9]+(?:[.,][0-9]+)?)\s*$").expect("PARLE_INLINE pattern"));

/// `parle con M` — composite parle stake clause
pub static PARLE_CON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bparle\s+con\s+([0-9]+(?:[.,][0-9]+)?)").expect("PARLE_CON pattern"));

/// `candado con M` — lock-bet total clause
pub static CANDADO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bcandado\s+con\s+([0-9]+(?:[.,][0-9]+)?)").expect("CANDADO pattern"));

/// Line of 3-digit numbers with one to three stake amounts
pub static CENTENA_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*((?:[0-9]{3}\s+)*[0-9]{3})\s+con\s+([0-9]+(?:[.,][0-9]+)?)(?:\s+y\s+([0-9]+(?:[.,][0-9]+)?))?(?:\s+y\s+([0-9]+(?:[.,][0-9]+)?))?\s*$",
    )
    .expect("CENTENA_LINE pattern")
});

/// `con A [y B] [y C]` — stake clause shared by several recognizers
pub static CON_AMOUNTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bcon\s+([0-9]+(?:[.,][0-9]+)?)(?:\s+y\s+([0-9]+(?:[.,][0-9]+)?))?(?:\s+y\s+([0-9]+(?:[.,][0-9]+)?))?")
        .expect("CON_AMOUNTS pattern")
});

/// Line-anchored declared total
pub static TOTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*total\b\s*[:=]?\s*([0-9]+(?:[.,][0-9]+)?)?\s*$").expect("TOTAL pattern")
});

/// A standalone digit run, 1 to 4 digits, as found on bet lines
pub static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,4}$").expect("NUMBER_TOKEN pattern"));

/// Tokens that can never appear in a player name line
pub const RESERVED_TOKENS: &[&str] = &[
    "con", "parle", "candado", "total", "fijo", "corrido", "al", "pr", "v", "d", "t",
];

/// Whether a whitespace-separated token is reserved by the grammar
pub fn is_reserved(token: &str) -> bool {
    let token = token.to_lowercase();
    RESERVED_TOKENS.iter().any(|r| *r == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volteo_matches() {
        let caps = VOLTEO.captures("10v con 10").unwrap();
        assert_eq!(&caps[1], "10");
        assert!(VOLTEO.is_match("7 v con 2"));
        // 'v' inside a word is not a volteo marker
        assert!(!VOLTEO.is_match("10 volteo"));
    }

    #[test]
    fn test_rango_matches() {
        let caps = RANGO.captures("5 al 10 con 2").unwrap();
        assert_eq!(&caps[1], "5");
        assert_eq!(&caps[2], "10");
    }

    #[test]
    fn test_decena_terminal() {
        assert_eq!(&DECENA.captures("d0 con 5").unwrap()[1], "0");
        assert_eq!(&TERMINAL.captures("t 7 con 5").unwrap()[1], "7");
        // The 'd' in candado must not trigger a decena
        assert!(!DECENA.is_match("05 10 candado con 30"));
        // Neither does 'total 40' read as a terminal
        assert!(!TERMINAL.is_match("total 40"));
    }

    #[test]
    fn test_repeticion() {
        let caps = REPETICION.captures("3 veces 25").unwrap();
        assert_eq!(&caps[1], "3");
        assert_eq!(&caps[2], "25");
    }

    #[test]
    fn test_parle_explicito() {
        let caps = PARLE_EXPLICITO.captures("25*33 parle con 5").unwrap();
        assert_eq!(&caps[1], "25");
        assert_eq!(&caps[2], "33");
        assert!(PARLE_EXPLICITO.is_match("25x33 con 5"));
    }

    #[test]
    fn test_parle_inline_is_anchored() {
        assert!(PARLE_INLINE.is_match("05 10 15 con 20 p5"));
        assert!(PARLE_INLINE.is_match("05 10 con 20 p 2.5"));
        // 'p' mid-line is not an inline parle
        assert!(!PARLE_INLINE.is_match("05 p5 con 20 extra"));
    }

    #[test]
    fn test_centenas_todas() {
        let caps = CENTENAS_TODAS
            .captures("25 80 por todas las centenas con 3")
            .unwrap();
        assert_eq!(&caps[1], "25 80");
        assert_eq!(&caps[2], "3");

        let caps = CENTENAS_TODAS.captures("25 por todas las centenas").unwrap();
        assert_eq!(&caps[1], "25");
        assert!(caps.get(2).is_none());
    }

    #[test]
    fn test_centena_line() {
        let caps = CENTENA_LINE.captures("123 456 con 10").unwrap();
        assert_eq!(&caps[1], "123 456");
        assert_eq!(&caps[2], "10");
        // Mixed 2- and 3-digit lines are not centena lines
        assert!(!CENTENA_LINE.is_match("05 123 con 10"));
    }

    #[test]
    fn test_total_line() {
        let caps = TOTAL.captures("total: 40").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "40");
        assert!(TOTAL.is_match("Total = 12.50"));
        assert!(TOTAL.is_match("total"));
        assert!(!TOTAL.is_match("subtotal 40"));
    }

    #[test]
    fn test_con_amounts() {
        let caps = CON_AMOUNTS.captures("05 10 con 20 y 30").unwrap();
        assert_eq!(&caps[1], "20");
        assert_eq!(&caps[2], "30");
        assert!(caps.get(3).is_none());
    }

    #[test]
    fn test_reserved_tokens() {
        assert!(is_reserved("con"));
        assert!(is_reserved("Total"));
        assert!(is_reserved("v"));
        assert!(!is_reserved("juan"));
        assert!(!is_reserved("maría"));
    }
}
