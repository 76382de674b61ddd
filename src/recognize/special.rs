//! SpecialPatterns: shorthand expansion with provenance
//!
//! Claims lines carrying volteo, rango, decena, terminal, pares
//! relativos or centenas-todas sugar, expands each match and emits one
//! `Especial` row per match, tagged with its expansion metadata. Bare
//! numbers sharing the line become a plain fijo at the same unit.

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::expand;
use crate::model::{BetKind, DetalleApuesta, Expansion, PatternType};
use crate::patterns;

use super::{con_amounts, extract_numbers, split_at_con, BlockContext};

/// The five pre-`con` patterns, in their contractual expansion order
fn ordered_patterns() -> [(&'static Regex, PatternType); 5] {
    [
        (&*patterns::VOLTEO, PatternType::Volteo),
        (&*patterns::RANGO, PatternType::Rango),
        (&*patterns::DECENA, PatternType::Decena),
        (&*patterns::TERMINAL, PatternType::Terminal),
        (&*patterns::PARES_RELATIVOS, PatternType::ParesRelativos),
    ]
}

pub fn claims(line: &str, ctx: &BlockContext) -> bool {
    if !ctx.config.auto_expand {
        return false;
    }
    let (pre_con, _) = split_at_con(line);
    ordered_patterns().iter().any(|(re, _)| re.is_match(pre_con))
        || patterns::CENTENAS_TODAS.is_match(line)
}

pub fn process(line: &str, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
    let (pre_con, _) = split_at_con(line);
    let (stake, _, _) = con_amounts(line);
    let line_unit = ctx.fijo_unit(stake);

    let mut details = Vec::new();
    let mut masked = pre_con.to_string();
    let mut expanded_total = 0usize;

    for (regex, pattern_type) in ordered_patterns() {
        for caps in regex.captures_iter(pre_con) {
            let whole = caps.get(0).expect("match 0");
            mask_span(&mut masked, whole.range());

            let expansion = match build_expansion(pattern_type, &caps) {
                Ok(expansion) => expansion,
                Err(err) => {
                    ctx.warn(format!("line {}: {err}", ctx.line_number));
                    continue;
                }
            };
            expanded_total += expansion.expanded.len();
            details.push(especial_row(expansion, line_unit, ctx));
        }
    }

    // Centenas-todas carries its own optional `con M`, so it matches the
    // whole line rather than the pre-con fragment.
    for caps in patterns::CENTENAS_TODAS.captures_iter(line) {
        let whole = caps.get(0).expect("match 0");
        let clamped = whole.start().min(masked.len())..whole.end().min(masked.len());
        mask_span(&mut masked, clamped);

        let bases: Vec<&str> = caps[1].split_whitespace().collect();
        let expanded = expand::centenas_todas(&bases);
        let unit = caps
            .get(2)
            .and_then(|m| crate::calc::parse_amount(m.as_str()))
            .unwrap_or(line_unit);
        expanded_total += expanded.len();
        let expansion = Expansion {
            original_token: whole.as_str().trim().to_string(),
            expanded,
            pattern_type: PatternType::CentenasTodas,
        };
        details.push(especial_row(expansion, unit, ctx));
    }

    if expanded_total > ctx.config.max_expansion {
        return Err(Error::expansion(
            line,
            format!(
                "expanded form has {expanded_total} numbers, cap is {}",
                ctx.config.max_expansion
            ),
        ));
    }

    // Bare numbers sharing the line with the patterns become a fijo row.
    let leftovers = extract_numbers(&masked, &mut ctx.warnings);
    if !leftovers.is_empty() {
        let detail = DetalleApuesta::simple(
            BetKind::Fijo,
            leftovers,
            line_unit,
            &ctx.original_line,
            ctx.line_number,
        );
        ctx.note_fijo(line_unit);
        details.push(detail);
    }

    Ok(details)
}

fn especial_row(
    expansion: Expansion,
    unit: Decimal,
    ctx: &BlockContext,
) -> DetalleApuesta {
    // Pares relativos emit 4-digit concatenations; the bet numbers are
    // their 2-digit halves, while the expansion keeps the originals.
    let mut ignored = Vec::new();
    let numbers = extract_numbers(&expansion.expanded.join(" "), &mut ignored);
    DetalleApuesta::especial(
        numbers,
        unit,
        expansion,
        &ctx.original_line,
        ctx.line_number,
    )
}

fn build_expansion(pattern_type: PatternType, caps: &regex::Captures) -> Result<Expansion> {
    let token = caps.get(0).expect("match 0").as_str().trim().to_string();
    let expanded = match pattern_type {
        PatternType::Volteo => expand::volteo(&caps[1]),
        PatternType::Rango => expand::rango(&caps[1], &caps[2])?,
        PatternType::Decena => expand::decena(caps[1].parse::<u8>().unwrap_or(0)),
        PatternType::Terminal => expand::terminal(caps[1].parse::<u8>().unwrap_or(0)),
        PatternType::ParesRelativos => {
            expand::pares_relativos(&caps[1], caps[2].parse::<u32>().unwrap_or(0))
        }
        _ => unreachable!("not a pre-con pattern"),
    };
    Ok(Expansion {
        original_token: token,
        expanded,
        pattern_type,
    })
}

fn mask_span(masked: &mut String, range: std::ops::Range<usize>) {
    if range.start < range.end && range.end <= masked.len() {
        masked.replace_range(range.clone(), &" ".repeat(range.end - range.start));
    }
}
