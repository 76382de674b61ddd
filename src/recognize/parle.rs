//! Parle: pair-combination bets
//!
//! Three forms share the recognizer: explicit pairs (`25*33 parle con
//! 5`), the inline suffix (`05 10 15 con 20 p5`) and the composite
//! clause (`05 10 con 20 parle con 5`). Implicit forms stake every
//! unordered pair of the number set; explicit forms stake each written
//! pair.

use crate::error::{Error, Result};
use crate::expand::pad2;
use crate::model::{BetKind, DetalleApuesta};
use crate::patterns;

use super::{con_amounts, extract_numbers, split_at_con, BlockContext};

pub fn claims(line: &str) -> bool {
    patterns::PARLE_EXPLICITO.is_match(line)
        || patterns::PARLE_INLINE.is_match(line)
        || line.to_lowercase().contains("parle")
}

pub fn process(line: &str, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
    if patterns::PARLE_EXPLICITO.is_match(line) {
        explicit(line, ctx)
    } else if let Some(found) = patterns::PARLE_INLINE.find(line) {
        inline(line, found.start(), ctx)
    } else {
        composite(line, ctx)
    }
}

/// `NN*NN [NN*NN ...] [parle] con M` — stake per written pair
fn explicit(line: &str, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
    let mut pairs = Vec::new();
    let mut remainder = line.to_string();
    for caps in patterns::PARLE_EXPLICITO.captures_iter(line) {
        pairs.push((pad2(&caps[1]), pad2(&caps[2])));
        let whole = caps.get(0).expect("match 0");
        remainder.replace_range(
            whole.range(),
            &" ".repeat(whole.end() - whole.start()),
        );
    }

    let unit = match parle_stake(&remainder) {
        Some(unit) => unit,
        None => {
            ctx.warn(format!(
                "line {}: parle without an amount, using default",
                ctx.line_number
            ));
            ctx.fijo_unit(None)
        }
    };
    Ok(vec![DetalleApuesta::parle_explicit(
        pairs,
        unit,
        &ctx.original_line,
        ctx.line_number,
    )])
}

/// `NN NN ... [con A [y B]] p M` — fijo stake plus a parle over the set
fn inline(line: &str, suffix_start: usize, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
    let caps = patterns::PARLE_INLINE
        .captures(line)
        .expect("claimed inline parle");
    let parle_unit = crate::calc::parse_amount(&caps[1]).ok_or_else(|| {
        Error::calculation(
            "parle stake",
            vec![caps[1].to_string()],
            "unparseable amount",
        )
    })?;
    with_base_stake(&line[..suffix_start], parle_unit, ctx)
}

/// `NN NN ... [con A [y B]] parle con M`
fn composite(line: &str, ctx: &mut BlockContext) -> Result<Vec<DetalleApuesta>> {
    let caps = patterns::PARLE_CON.captures(line).ok_or_else(|| {
        Error::parser_with_context("parle without a 'con' amount", line)
    })?;
    let parle_unit = crate::calc::parse_amount(&caps[1]).ok_or_else(|| {
        Error::calculation(
            "parle stake",
            vec![caps[1].to_string()],
            "unparseable amount",
        )
    })?;
    let clause = caps.get(0).expect("match 0");
    let mut base = line.to_string();
    base.replace_range(clause.range(), "");
    with_base_stake(&base, parle_unit, ctx)
}

/// Shared tail of the implicit forms: an optional fijo/corrido stake on
/// the base numbers, then the parle over their pairs.
fn with_base_stake(
    base: &str,
    parle_unit: rust_decimal::Decimal,
    ctx: &mut BlockContext,
) -> Result<Vec<DetalleApuesta>> {
    let (numbers_part, _) = split_at_con(base);
    let numbers = extract_numbers(numbers_part, &mut ctx.warnings);
    if numbers.len() < 2 {
        return Err(Error::parser_with_context(
            "parle needs at least 2 numbers",
            base.trim(),
        ));
    }

    let mut details = Vec::new();
    let (fijo_stake, corrido_stake, _) = con_amounts(base);
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

    details.push(DetalleApuesta::parle_implicit(
        numbers,
        parle_unit,
        &ctx.original_line,
        ctx.line_number,
    ));
    Ok(details)
}

/// Stake of an explicit parle: the `parle con M` clause or a bare `con M`
fn parle_stake(remainder: &str) -> Option<rust_decimal::Decimal> {
    if let Some(caps) = patterns::PARLE_CON.captures(remainder) {
        return crate::calc::parse_amount(&caps[1]);
    }
    con_amounts(remainder).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use rust_decimal_macros::dec;

    fn run(line: &str) -> Vec<DetalleApuesta> {
        let config = ParserConfig::default();
        let mut ctx = BlockContext::new(&config);
        ctx.at_line(1, line);
        process(line, &mut ctx).unwrap()
    }

    #[test]
    fn test_explicit_pair() {
        let details = run("25*33 parle con 5");
        assert_eq!(details.len(), 1);
        let parle = &details[0];
        assert_eq!(parle.kind, BetKind::Parle);
        assert_eq!(
            parle.pairs,
            Some(vec![("25".to_string(), "33".to_string())])
        );
        assert_eq!(parle.combinations, Some(1));
        assert_eq!(parle.amount, dec!(5));
        assert_eq!(parle.numbers, vec!["25", "33"]);
    }

    #[test]
    fn test_explicit_x_separator() {
        let details = run("25x33 con 5");
        assert_eq!(details[0].combinations, Some(1));
        assert_eq!(details[0].amount, dec!(5));
    }

    #[test]
    fn test_multiple_explicit_pairs() {
        let details = run("25*33 40*41 parle con 5");
        let parle = &details[0];
        assert_eq!(parle.combinations, Some(2));
        assert_eq!(parle.amount, dec!(10));
        assert_eq!(parle.numbers, vec!["25", "33", "40", "41"]);
    }

    #[test]
    fn test_inline_parle_with_fijo() {
        let details = run("05 10 15 con 20 p5");
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].kind, BetKind::Fijo);
        assert_eq!(details[0].amount, dec!(60));
        let parle = &details[1];
        assert_eq!(parle.kind, BetKind::Parle);
        assert_eq!(parle.numbers, vec!["05", "10", "15"]);
        assert_eq!(parle.combinations, Some(3));
        assert_eq!(parle.unit_amount, dec!(5));
        assert_eq!(parle.amount, dec!(15));
    }

    #[test]
    fn test_composite_parle() {
        let details = run("05 10 con 20 parle con 5");
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].kind, BetKind::Fijo);
        assert_eq!(details[0].amount, dec!(40));
        assert_eq!(details[1].kind, BetKind::Parle);
        assert_eq!(details[1].combinations, Some(1));
        assert_eq!(details[1].amount, dec!(5));
    }

    #[test]
    fn test_parle_only_line_has_no_fijo() {
        let details = run("05 10 15 parle con 4");
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].kind, BetKind::Parle);
        assert_eq!(details[0].amount, dec!(12));
    }

    #[test]
    fn test_parle_needs_two_numbers() {
        let config = ParserConfig::default();
        let mut ctx = BlockContext::new(&config);
        ctx.at_line(1, "05 parle con 4");
        assert!(process("05 parle con 4", &mut ctx).is_err());
    }

    #[test]
    fn test_claims() {
        assert!(claims("25*33 parle con 5"));
        assert!(claims("05 10 con 20 p5"));
        assert!(claims("05 10 parle con 4"));
        assert!(!claims("05 10 con 20"));
    }
}
