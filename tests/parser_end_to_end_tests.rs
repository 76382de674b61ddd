//! End-to-end parse scenarios over the public surface
//!
//! Exercises complete tickets through `parse`: every bet family, the
//! shorthand sugar, declared-total reconciliation and the boundary
//! behaviors, with exact expected field values.

use bolita::{BetKind, ParserConfig, PatternType};
use rust_decimal_macros::dec;

/// Parse with test tracing enabled, so failures show the pipeline log
fn parse(text: &str, config: Option<ParserConfig>) -> bolita::ParseResult {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    bolita::parse(text, config)
}

/// A plain fijo line for an anonymous player
#[test]
fn test_basic_fijo() {
    let result = parse("05 10 con 20", None);
    assert!(result.success);
    assert_eq!(result.jugadas.len(), 1);

    let jugada = &result.jugadas[0];
    assert_eq!(jugada.player_name, "Desconocido");
    assert_eq!(jugada.details.len(), 1);

    let fijo = &jugada.details[0];
    assert_eq!(fijo.kind, BetKind::Fijo);
    assert_eq!(fijo.numbers, vec!["05", "10"]);
    assert_eq!(fijo.unit_amount, dec!(20));
    assert_eq!(fijo.amount, dec!(40));
    assert_eq!(jugada.total_calculated, dec!(40));
    assert!(jugada.is_valid);
}

/// `con A y B` adds a corrido row on the same numbers
#[test]
fn test_fijo_and_corrido() {
    let result = parse("05 10 con 20 y 30", None);
    let jugada = &result.jugadas[0];
    assert_eq!(jugada.details.len(), 2);

    let fijo = &jugada.details[0];
    assert_eq!(fijo.kind, BetKind::Fijo);
    assert_eq!(fijo.numbers, vec!["05", "10"]);
    assert_eq!(fijo.amount, dec!(40));

    let corrido = &jugada.details[1];
    assert_eq!(corrido.kind, BetKind::Corrido);
    assert_eq!(corrido.numbers, vec!["05", "10"]);
    assert_eq!(corrido.amount, dec!(60));

    assert_eq!(jugada.total_calculated, dec!(100));
}

/// An explicit parle pair has a single combination
#[test]
fn test_explicit_parle() {
    let result = parse("25*33 parle con 5", None);
    let jugada = &result.jugadas[0];
    assert_eq!(jugada.details.len(), 1);

    let parle = &jugada.details[0];
    assert_eq!(parle.kind, BetKind::Parle);
    assert_eq!(
        parle.pairs,
        Some(vec![("25".to_string(), "33".to_string())])
    );
    assert_eq!(parle.combinations, Some(1));
    assert_eq!(parle.amount, dec!(5));
    assert_eq!(jugada.total_calculated, dec!(5));
}

/// The inline `p M` suffix stakes every pair of the preceding numbers
#[test]
fn test_inline_parle() {
    let result = parse("05 10 15 con 20 p5", None);
    let jugada = &result.jugadas[0];
    assert_eq!(jugada.details.len(), 2);

    let fijo = &jugada.details[0];
    assert_eq!(fijo.kind, BetKind::Fijo);
    assert_eq!(fijo.amount, dec!(60));

    let parle = &jugada.details[1];
    assert_eq!(parle.kind, BetKind::Parle);
    assert_eq!(parle.numbers, vec!["05", "10", "15"]);
    assert_eq!(parle.combinations, Some(3));
    assert_eq!(parle.unit_amount, dec!(5));
    assert_eq!(parle.amount, dec!(15));

    assert_eq!(jugada.total_calculated, dec!(75));
}

/// A volteo expands to the number and its reversal
#[test]
fn test_volteo() {
    let result = parse("10v con 10", None);
    let jugada = &result.jugadas[0];
    assert_eq!(jugada.details.len(), 1);

    let especial = &jugada.details[0];
    assert_eq!(especial.kind, BetKind::Especial);
    assert_eq!(especial.numbers, vec!["10", "01"]);
    assert_eq!(especial.unit_amount, dec!(10));
    assert_eq!(especial.amount, dec!(20));

    let expansion = especial.expansion.as_ref().unwrap();
    assert_eq!(expansion.pattern_type, PatternType::Volteo);
    assert_eq!(expansion.original_token, "10v");
}

/// A decena covers the ten numbers sharing a units digit
#[test]
fn test_decena() {
    let result = parse("d0 con 5", None);
    let jugada = &result.jugadas[0];
    let especial = &jugada.details[0];
    assert_eq!(especial.kind, BetKind::Especial);
    assert_eq!(
        especial.numbers,
        vec!["00", "10", "20", "30", "40", "50", "60", "70", "80", "90"]
    );
    assert_eq!(especial.unit_amount, dec!(5));
    assert_eq!(especial.amount, dec!(50));
}

/// Named ticket with a matching declared total
#[test]
fn test_named_ticket_with_total() {
    let result = parse("Juan\n05 10 con 20\nTotal: 40", None);
    assert!(result.success);
    assert_eq!(result.jugadas.len(), 1);

    let jugada = &result.jugadas[0];
    assert_eq!(jugada.player_name, "Juan");
    assert_eq!(jugada.total_declared, Some(dec!(40)));
    assert_eq!(jugada.total_calculated, dec!(40));
    assert!(jugada.is_valid);
    assert_eq!(result.summary.difference, dec!(0));
    assert!(result.summary.is_valid);
}

/// A declared total far from the calculated one fails reconciliation
#[test]
fn test_mismatched_total() {
    let result = parse("05 10 con 20\nTotal: 100", None);
    assert!(result.success);

    let jugada = &result.jugadas[0];
    assert!(!jugada.is_valid);
    assert_eq!(result.summary.difference, dec!(60));
    assert!(!result.summary.is_valid);
    assert!(result.summary.confidence < 0.9);
}

#[test]
fn test_rango() {
    let result = parse("5 al 8 con 2", None);
    let especial = &result.jugadas[0].details[0];
    assert_eq!(especial.numbers, vec!["05", "06", "07", "08"]);
    assert_eq!(especial.amount, dec!(8));
    assert_eq!(
        especial.expansion.as_ref().unwrap().pattern_type,
        PatternType::Rango
    );
}

#[test]
fn test_terminal() {
    let result = parse("t7 con 1", None);
    let especial = &result.jugadas[0].details[0];
    assert_eq!(especial.numbers.len(), 10);
    assert_eq!(especial.numbers[0], "70");
    assert_eq!(especial.numbers[9], "79");
    assert_eq!(especial.amount, dec!(10));
}

#[test]
fn test_candado() {
    let result = parse("05 10 15 con 5 y 3 candado con 30", None);
    let jugada = &result.jugadas[0];
    assert_eq!(jugada.details.len(), 3);

    assert_eq!(jugada.details[0].kind, BetKind::Fijo);
    assert_eq!(jugada.details[0].amount, dec!(15));
    assert_eq!(jugada.details[1].kind, BetKind::Corrido);
    assert_eq!(jugada.details[1].amount, dec!(9));

    let candado = &jugada.details[2];
    assert_eq!(candado.kind, BetKind::Candado);
    assert_eq!(candado.combinations, Some(3));
    assert_eq!(candado.unit_amount, dec!(10));
    assert_eq!(candado.amount, dec!(30));

    assert_eq!(jugada.total_calculated, dec!(54));
}

#[test]
fn test_centena_composite() {
    let result = parse("123 456 con 10 y 5 y 2", None);
    let jugada = &result.jugadas[0];
    assert_eq!(jugada.details.len(), 3);
    assert_eq!(jugada.details[0].kind, BetKind::Centena);
    assert_eq!(jugada.details[0].numbers, vec!["123", "456"]);
    assert_eq!(jugada.details[0].amount, dec!(20));
    assert_eq!(jugada.details[1].kind, BetKind::Fijo);
    assert_eq!(jugada.details[1].numbers, vec!["23", "56"]);
    assert_eq!(jugada.details[2].kind, BetKind::Corrido);
    assert_eq!(jugada.total_calculated, dec!(34));
}

#[test]
fn test_centenas_todas() {
    let result = parse("25 por todas las centenas con 3", None);
    let especial = &result.jugadas[0].details[0];
    assert_eq!(especial.kind, BetKind::Especial);
    assert_eq!(especial.numbers.len(), 10);
    assert_eq!(especial.numbers[0], "025");
    assert_eq!(especial.amount, dec!(30));
    assert_eq!(
        especial.expansion.as_ref().unwrap().pattern_type,
        PatternType::CentenasTodas
    );
}

/// Multi-player ticket: blocks stay in order with their own stakes
#[test]
fn test_multi_player_ticket() {
    let text = "Juan\n05 10 con 20\nTotal: 40\n\nMaría José\n25*33 parle con 5\n15 con 2\nTotal: 7";
    let result = parse(text, None);
    assert!(result.success);
    assert_eq!(result.jugadas.len(), 2);

    assert_eq!(result.jugadas[0].player_name, "Juan");
    assert!(result.jugadas[0].is_valid);

    let maria = &result.jugadas[1];
    assert_eq!(maria.player_name, "maría josé");
    assert_eq!(maria.total_calculated, dec!(7));
    assert!(maria.is_valid);

    assert_eq!(result.summary.total_jugadas, 2);
    assert_eq!(result.summary.total_calculated, dec!(47));
    assert_eq!(result.summary.total_declared, Some(dec!(47)));
    assert!(result.summary.is_valid);
    assert_eq!(result.stats.fijos, 2);
    assert_eq!(result.stats.parles, 1);
}

/// Accented first-line names survive preprocessing with casing intact
#[test]
fn test_accented_name_preserved() {
    let result = parse("María Ñáñez\n05 con 2", None);
    assert_eq!(result.jugadas[0].player_name, "María Ñáñez");
}

/// Messy input: confusables, currency, glued clauses, stray symbols
#[test]
fn test_messy_input_normalizes() {
    let result = parse("o5 1o con$20", None);
    assert!(result.success);
    let fijo = &result.jugadas[0].details[0];
    assert_eq!(fijo.numbers, vec!["05", "10"]);
    assert_eq!(fijo.unit_amount, dec!(20));
}

/// Stake carryover: bare lines replay the previous explicit stake
#[test]
fn test_stake_carryover() {
    let result = parse("Juan\n05 10 con 20 y 5\n15 25\n30 con 2", None);
    let jugada = &result.jugadas[0];
    // Line 2: fijo + corrido. Line 3 (bare): replays 20 y 5. Line 4: new fijo at 2.
    assert_eq!(jugada.details.len(), 5);
    assert_eq!(jugada.details[2].unit_amount, dec!(20));
    assert_eq!(jugada.details[3].kind, BetKind::Corrido);
    assert_eq!(jugada.details[3].unit_amount, dec!(5));
    assert_eq!(jugada.details[4].unit_amount, dec!(2));
}

/// Empty and whitespace-only input fail with the empty-text error
#[test]
fn test_empty_input() {
    for text in ["", "   ", "\n\n"] {
        let result = parse(text, None);
        assert!(!result.success);
        assert!(result.jugadas.is_empty());
        assert!(!result.summary.is_valid);
        assert!(result
            .metadata
            .errors
            .iter()
            .any(|e| e.contains("Empty text")));
    }
}

/// Exceeding max_jugadores aborts the whole parse
#[test]
fn test_too_many_players() {
    let config = ParserConfig {
        max_jugadores: 2,
        ..Default::default()
    };
    let text = "Ana\n05 con 1\n\nLuis\n06 con 1\n\nRosa\n07 con 1";
    let result = parse(text, Some(config));
    assert!(!result.success);
    assert!(result.jugadas.is_empty());
}

/// Determinism: two parses agree on everything but timings
#[test]
fn test_determinism() {
    let text = "Juan\n10v con 10\n5 al 8 con 2\n25*33 parle con 5\nTotal: 35";
    let first = parse(text, None);
    let second = parse(text, None);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.stats, second.stats);
    assert_eq!(first.jugadas.len(), second.jugadas.len());
    for (a, b) in first.jugadas.iter().zip(second.jugadas.iter()) {
        assert_eq!(a.details, b.details);
        assert_eq!(a.total_calculated, b.total_calculated);
        assert_eq!(a.warnings, b.warnings);
        assert_eq!(a.errors, b.errors);
    }
}

/// Serde round-trip of a full result
#[test]
fn test_result_serialization() {
    let result = parse("Juan\n05 10 con 20\nTotal: 40", None);
    let json = serde_json::to_string(&result).unwrap();
    let back: bolita::ParseResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, back);
}

/// Amount identity over every simple row in a busy ticket
#[test]
fn test_amount_identity() {
    let text = "Juan\nd0 con 5\n05 10 con 20 y 30\n123 con 7\nt3 con 2";
    let result = parse(text, None);
    assert!(result.success);
    for detail in result.jugadas.iter().flat_map(|j| j.details.iter()) {
        if !matches!(detail.kind, BetKind::Parle | BetKind::Candado) {
            let expected = detail.unit_amount * rust_decimal::Decimal::from(detail.numbers.len() as u64);
            assert!((detail.amount - expected).abs() < dec!(0.01));
        }
    }
}
