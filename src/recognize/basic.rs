//! BasicBet: plain number lists with a fijo (and optional corrido) stake
//!
//! The lowest-priority claimant. Handles `N N ... con A [y B]` and bare
//! number lines, which replay the block's carried-over stakes or the
//! configured defaults.

use crate::error::{Error, Result};
use crate::model::{BetKind, DetalleApuesta};

use super::{con_amounts, extract_numbers, split_at_con, BlockContext};

pub fn claims(line: &str) -> bool {
    let (numbers_part, _) = split_at_con(line);
    let mut ignored = Vec::new();
    !extract_numbers(numbers_part, &mut ignored).is_empty()
}

pub fn process(line: &str, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
    let (numbers_part, stake_part) = split_at_con(line);
    let numbers = extract_numbers(numbers_part, &mut ctx.warnings);
    if numbers.is_empty() {
        return Err(Error::parser_with_context("bet line without numbers", line));
    }

    let (fijo_stake, corrido_stake, _) = con_amounts(line);
    if stake_part.is_some() && fijo_stake.is_none() {
        ctx.warn(format!(
            "line {}: 'con' clause without a readable amount",
            ctx.line_number
        ));
    }

    let mut details = Vec::new();
    match fijo_stake {
        Some(fijo_unit) => {
            // Explicit stakes become the block's new defaults.
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
                    numbers,
                    corrido_unit,
                    &ctx.original_line,
                    ctx.line_number,
                ));
            }
        }
        None => {
            // Bare numbers replay the carried-over stakes.
            let fijo_unit = ctx.fijo_unit(None);
            details.push(DetalleApuesta::simple(
                BetKind::Fijo,
                numbers.clone(),
                fijo_unit,
                &ctx.original_line,
                ctx.line_number,
            ));
            if let Some(corrido_unit) = ctx.carried_corrido() {
                details.push(DetalleApuesta::simple(
                    BetKind::Corrido,
                    numbers,
                    corrido_unit,
                    &ctx.original_line,
                    ctx.line_number,
                ));
            }
        }
    }
    Ok(details)
}
