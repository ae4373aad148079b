use super::*;
use proptest::prelude::*;

#[test]
fn test_bet_kind_parse() {
    for (text, kind) in [
        ("number", BetKind::Number),
        ("Color", BetKind::Color),
        (" parity ", BetKind::Parity),
        ("range", BetKind::Range),
        ("straight", BetKind::Number),
    ] {
        assert_eq!(text.parse::<BetKind>().unwrap(), kind);
    }
    assert!(matches!(
        "split".parse::<BetKind>(),
        Err(BetError::UnknownKind { .. })
    ));
}

#[test]
fn test_bet_parse() {
    let bet = Bet::parse("color", Some("red"), 10.0).unwrap();
    assert_eq!(bet.kind, BetKind::Color);
    assert_eq!(bet.selection, Some(BetSelection::Color(Color::Red)));
    assert_eq!(bet.choice_label(), "red");

    let bet = Bet::parse("number", Some("17"), 5.0).unwrap();
    assert_eq!(bet.selection, Some(BetSelection::Number(17)));

    assert!(matches!(
        Bet::parse("number", Some("37"), 5.0),
        Err(BetError::InvalidChoice { .. })
    ));
    assert!(matches!(
        Bet::parse("parity", None, 5.0),
        Err(BetError::MissingChoice {
            kind: BetKind::Parity
        })
    ));
    assert!(matches!(
        Bet::parse("range", Some("middle"), 5.0),
        Err(BetError::InvalidChoice { .. })
    ));
    assert!(matches!(
        Bet::parse("color", Some("red"), 0.0),
        Err(BetError::InvalidAmount { .. })
    ));
}

#[test]
fn test_bet_from_shorthand() {
    assert_eq!(
        Bet::from_shorthand("black", 10.0).unwrap().selection,
        Some(BetSelection::Color(Color::Black))
    );
    assert_eq!(
        Bet::from_shorthand("EVEN", 10.0).unwrap().selection,
        Some(BetSelection::Parity(Parity::Even))
    );
    assert_eq!(
        Bet::from_shorthand("high", 10.0).unwrap().selection,
        Some(BetSelection::Range(RangeHalf::High))
    );
    assert_eq!(
        Bet::from_shorthand("0", 10.0).unwrap().selection,
        Some(BetSelection::Number(0))
    );
    assert!(Bet::from_shorthand("corner", 10.0).is_err());
    assert!(Bet::from_shorthand("", 10.0).is_err());
}

#[test]
fn test_parity_of() {
    assert_eq!(Parity::of(1), Parity::Odd);
    assert_eq!(Parity::of(36), Parity::Even);
}

#[test]
fn test_table_limits() {
    let limits = TableLimits::default();
    let bet = |amount| Bet::on(BetSelection::Color(Color::Red), amount);

    assert!(limits.validate(&bet(10.0), 100.0).is_ok());
    assert!(limits.validate(&bet(500.0), 500.0).is_ok());
    assert!(matches!(
        limits.validate(&bet(0.5), 100.0),
        Err(BetError::BelowTableMinimum { .. })
    ));
    assert!(matches!(
        limits.validate(&bet(501.0), 1_000.0),
        Err(BetError::AboveTableMaximum { .. })
    ));
    assert!(matches!(
        limits.validate(&bet(50.0), 20.0),
        Err(BetError::InsufficientBalance { .. })
    ));
    assert!(matches!(
        limits.validate(&bet(-1.0), 20.0),
        Err(BetError::InvalidAmount { .. })
    ));
}

#[test]
fn test_is_broke() {
    assert!(is_broke(0.0));
    assert!(is_broke(-5.0));
    assert!(!is_broke(0.01));
}

#[test]
fn test_red_numbers_are_distinct_and_in_range() {
    let mut seen = [false; 37];
    for n in RED_NUMBERS {
        assert!((1..=MAX_NUMBER).contains(&n));
        assert!(!seen[n as usize]);
        seen[n as usize] = true;
    }
}

proptest! {
    #[test]
    fn prop_number_selection_roundtrips(n in 0u8..=36) {
        let selection = BetSelection::parse(BetKind::Number, &n.to_string()).unwrap();
        prop_assert_eq!(selection, BetSelection::Number(n));
        prop_assert_eq!(selection.to_string(), n.to_string());
    }

    #[test]
    fn prop_limits_accept_stakes_within_bounds(amount in 1.0f64..=500.0, extra in 0.0f64..1_000.0) {
        let bet = Bet::on(BetSelection::Parity(Parity::Odd), amount);
        prop_assert!(TableLimits::default().validate(&bet, amount + extra).is_ok());
    }

    #[test]
    fn prop_limits_reject_stakes_above_balance(balance in 1.0f64..400.0, over in 0.01f64..100.0) {
        let bet = Bet::on(BetSelection::Range(RangeHalf::Low), balance + over);
        let rejected = matches!(
            TableLimits::default().validate(&bet, balance),
            Err(BetError::InsufficientBalance { .. }) | Err(BetError::AboveTableMaximum { .. })
        );
        prop_assert!(rejected);
    }
}
