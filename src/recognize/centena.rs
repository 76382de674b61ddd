//! Centena: 3-digit-number bets
//!
//! Claims lines made entirely of 3-digit numbers with a stake clause.
//! The composite form `NNN ... con Mc y Mf [y Mco]` also derives fijo
//! and corrido rows on the last two digits of each centena. Lines using
//! the `por todas las centenas` sugar land here when auto-expansion is
//! off (the SpecialPatterns recognizer outranks this one otherwise).

use crate::error::{Error, Result};
use crate::expand;
use crate::model::{BetKind, DetalleApuesta};
use crate::patterns;

use super::{con_amounts, extract_numbers, split_at_con, BlockContext};

pub fn claims(line: &str) -> bool {
    patterns::CENTENA_LINE.is_match(line)
        || patterns::CENTENAS_TODAS.is_match(line)
        || line.to_lowercase().contains("centena")
}

pub fn process(line: &str, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
    if let Some(caps) = patterns::CENTENA_LINE.captures(line) {
        return composite(&caps, ctx);
    }
    if let Some(caps) = patterns::CENTENAS_TODAS.captures(line) {
        return todas(&caps, line, ctx);
    }
    // Keyword form: `centena 123 456 con 5`
    let (numbers_part, _) = split_at_con(line);
    let numbers: Vec<String> = extract_numbers(numbers_part, &mut ctx.warnings)
        .into_iter()
        .filter(|n| n.len() == 3)
        .collect();
    if numbers.is_empty() {
        return Err(Error::parser_with_context(
            "centena line without 3-digit numbers",
            line,
        ));
    }
    let (stake, _, _) = con_amounts(line);
    let unit = ctx.fijo_unit(stake);
    Ok(vec![DetalleApuesta::simple(
        BetKind::Centena,
        numbers,
        unit,
        &ctx.original_line,
        ctx.line_number,
    )])
}

/// `NNN NNN ... con Mc [y Mf [y Mco]]`
fn composite(caps: &regex::Captures, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
    let numbers: Vec<String> = caps[1].split_whitespace().map(str::to_string).collect();
    let centena_unit = crate::calc::parse_amount(&caps[2]).ok_or_else(|| {
        Error::calculation(
            "centena stake",
            vec![caps[2].to_string()],
            "unparseable amount",
        )
    })?;
    let fijo_unit = caps.get(3).and_then(|m| crate::calc::parse_amount(m.as_str()));
    let corrido_unit = caps.get(4).and_then(|m| crate::calc::parse_amount(m.as_str()));

    let mut details = vec![DetalleApuesta::simple(
        BetKind::Centena,
        numbers.clone(),
        centena_unit,
        &ctx.original_line,
        ctx.line_number,
    )];

    // Derived rows bet the last two digits of each centena.
    let tails: Vec<String> = numbers.iter().map(|n| n[1..].to_string()).collect();
    if let Some(unit) = fijo_unit {
        details.push(DetalleApuesta::simple(
            BetKind::Fijo,
            tails.clone(),
            unit,
            &ctx.original_line,
            ctx.line_number,
        ));
        ctx.note_fijo(unit);
        ctx.note_corrido(corrido_unit);
    }
    if let Some(unit) = corrido_unit {
        details.push(DetalleApuesta::simple(
            BetKind::Corrido,
            tails,
            unit,
            &ctx.original_line,
            ctx.line_number,
        ));
    }
    Ok(details)
}

/// `NN ... por todas las centenas [con M]`, reached with expansion off
fn todas(
    caps: &regex::Captures,
    line: &str,
    ctx: &mut BlockContext,
) -> Result<Vec<DetalleApuesta>> {
    let bases: Vec<&str> = caps[1].split_whitespace().collect();
    let numbers = expand::centenas_todas(&bases);
    if numbers.len() > ctx.config.max_expansion {
        return Err(Error::expansion(
            line,
            format!(
                "expanded form has {} numbers, cap is {}",
                numbers.len(),
                ctx.config.max_expansion
            ),
        ));
    }
    let stake = caps
        .get(2)
        .and_then(|m| crate::calc::parse_amount(m.as_str()));
    let unit = ctx.fijo_unit(stake);
    Ok(vec![DetalleApuesta::simple(
        BetKind::Centena,
        numbers,
        unit,
        &ctx.original_line,
        ctx.line_number,
    )])
}
