//! Shorthand pattern expansion
//!
//! The domain sugar (volteo, rango, decena, terminal, pares relativos,
//! centenas todas, repetición) expands here into explicit canonical
//! number lists. Two modes: value-mode functions that return the number
//! list for parsed arguments, and text-mode rewriting that replaces
//! matches in-place within a line. Output is bounded: a line whose
//! expanded form exceeds the configured cap is rejected.

use regex::Captures;
use tracing::warn;

use crate::error::{Error, Result};
use crate::patterns;

/// Zero-pad a digit string to canonical 2-digit form
pub fn pad2(token: &str) -> String {
    match token.len() {
        0 => "00".to_string(),
        1 => format!("0{token}"),
        _ => token.to_string(),
    }
}

/// Volteo: a number and its digit reversal
pub fn volteo(token: &str) -> Vec<String> {
    let padded = pad2(token);
    let reversed: String = padded.chars().rev().collect();
    vec![padded, reversed]
}

/// Rango: inclusive range expanded to 2-digit numbers, bounds swapped
/// when reversed. Bounds outside the 2-digit space are rejected.
pub fn rango(low: &str, high: &str) -> Result<Vec<String>> {
    let token = format!("{low} al {high}");
    let mut a: u32 = low
        .parse()
        .map_err(|_| Error::expansion(&token, "non-numeric bound"))?;
    let mut b: u32 = high
        .parse()
        .map_err(|_| Error::expansion(&token, "non-numeric bound"))?;
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    if b > 99 {
        return Err(Error::expansion(&token, "bound outside the 2-digit space"));
    }
    Ok((a..=b).map(|n| format!("{n:02}")).collect())
}

/// Decena: the ten numbers ending in digit `x`
pub fn decena(x: u8) -> Vec<String> {
    let units = x % 10;
    (0..10u8).map(|d| format!("{:02}", d * 10 + units)).collect()
}

/// Terminal: the ten numbers starting with digit `x`
pub fn terminal(x: u8) -> Vec<String> {
    let tens = x % 10;
    (0..10u8).map(|u| format!("{:02}", tens * 10 + u)).collect()
}

/// Relative pairs: `NN ∥ 01..K`, K capped at 100 (the hundredth pair
/// wraps to `NN00`). Emits 4-digit strings that the number extractor
/// splits into two 2-digit canonical numbers.
pub fn pares_relativos(base: &str, k: u32) -> Vec<String> {
    let padded = pad2(base);
    let count = k.min(100);
    (1..=count)
        .map(|i| format!("{}{:02}", padded, i % 100))
        .collect()
}

/// Centenas todas: every 2-digit number expanded into its ten 3-digit
/// forms `0NN..9NN`
pub fn centenas_todas(numbers: &[&str]) -> Vec<String> {
    numbers
        .iter()
        .flat_map(|nn| {
            let padded = pad2(nn);
            (0..10u8).map(move |c| format!("{c}{padded}"))
        })
        .collect()
}

/// Repetición: `NN` repeated `k` times
pub fn repeticion(k: usize, token: &str) -> Vec<String> {
    vec![pad2(token); k]
}

/// Count of standalone number tokens on a line
fn number_token_count(line: &str) -> usize {
    line.split_whitespace()
        .filter(|t| patterns::NUMBER_TOKEN.is_match(t))
        .count()
}

/// Text-mode expansion over a whole preprocessed text, line by line.
///
/// Patterns expand in the fixed order volteo, rango, decena, terminal,
/// pares relativos, centenas todas; a failed expansion leaves its token
/// unchanged. A line expanding past `cap` numbers is an error.
pub fn expand_text(text: &str, cap: usize) -> Result<String> {
    let mut lines = Vec::new();
    for line in text.split('\n') {
        lines.push(expand_line(line, cap)?);
    }
    Ok(lines.join("\n"))
}

/// Text-mode expansion of a single line
pub fn expand_line(line: &str, cap: usize) -> Result<String> {
    let expanded = patterns::VOLTEO
        .replace_all(line, |caps: &Captures| volteo(&caps[1]).join(" "))
        .into_owned();

    let expanded = patterns::RANGO
        .replace_all(&expanded, |caps: &Captures| {
            match rango(&caps[1], &caps[2]) {
                Ok(numbers) => numbers.join(" "),
                Err(err) => {
                    warn!(token = &caps[0], %err, "rango expansion failed");
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    let expanded = patterns::DECENA
        .replace_all(&expanded, |caps: &Captures| {
            decena(caps[1].parse::<u8>().unwrap_or(0)).join(" ")
        })
        .into_owned();

    let expanded = patterns::TERMINAL
        .replace_all(&expanded, |caps: &Captures| {
            terminal(caps[1].parse::<u8>().unwrap_or(0)).join(" ")
        })
        .into_owned();

    let expanded = patterns::PARES_RELATIVOS
        .replace_all(&expanded, |caps: &Captures| {
            pares_relativos(&caps[1], caps[2].parse::<u32>().unwrap_or(0)).join(" ")
        })
        .into_owned();

    let expanded = patterns::CENTENAS_TODAS
        .replace_all(&expanded, |caps: &Captures| {
            let bases: Vec<&str> = caps[1].split_whitespace().collect();
            let numbers = centenas_todas(&bases).join(" ");
            match caps.get(2) {
                Some(amount) => format!("{} con {}", numbers, amount.as_str()),
                None => numbers,
            }
        })
        .into_owned();

    if number_token_count(&expanded) > cap {
        return Err(Error::expansion(
            line,
            format!("expanded form exceeds {cap} numbers"),
        ));
    }
    Ok(expanded)
}
