//! Candado: all pairs of a number set for a flat total price
//!
//! Grammar: `NN NN [NN ...] [con F [y C]] candado con M`. The optional
//! leading stake clause emits fijo (and corrido) rows on the base
//! numbers; the candado row itself splits the flat total evenly across
//! the C(n,2) pairs.

use crate::error::{Error, Result};
use crate::model::{BetKind, DetalleApuesta};
use crate::patterns;

use super::{con_amounts, extract_numbers, split_at_con, BlockContext};

pub fn claims(line: &str) -> bool {
    line.to_lowercase().contains("candado")
}

pub fn process(line: &str, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
    let caps = patterns::CANDADO.captures(line).ok_or_else(|| {
        Error::parser_with_context("candado without a 'con' amount", line)
    })?;
    let total = crate::calc::parse_amount(&caps[1]).ok_or_else(|| {
        Error::calculation(
            "candado total",
            vec![caps[1].to_string()],
            "unparseable amount",
        )
    })?;

    let keyword_start = caps.get(0).expect("match 0").start();
    let before = &line[..keyword_start];
    let (numbers_part, _) = split_at_con(before);
    let numbers = extract_numbers(numbers_part, &mut ctx.warnings);
    if numbers.len() < 2 {
        return Err(Error::parser_with_context(
            "candado needs at least 2 numbers",
            line,
        ));
    }

    let mut details = Vec::new();
    let (fijo_stake, corrido_stake, _) = con_amounts(before);
    if let Some(fijo_unit) = fijo_stake {
        details.push(DetalleApuesta::simple(
            BetKind::Fijo,
            numbers.clone(),
            fijo_unit,
            &ctx.original_line,
            ctx.line_number,
        ));
        ctx.note_fijo(fijo_unit);
        ctx.note_corrido(corrido_stake);
        if let Some(corrido_unit) = corrido_stake {
            details.push(DetalleApuesta::simple(
                BetKind::Corrido,
                numbers.clone(),
                corrido_unit,
                &ctx.original_line,
                ctx.line_number,
            ));
        }
    }

    details.push(DetalleApuesta::candado(
        numbers,
        total,
        &ctx.original_line,
        ctx.line_number,
    )?);
    Ok(details)
}
