//! Roulette wheel and bet evaluation.
//!
//! Bet kinds and gross payouts (stake included):
//! number = single pocket, 36x
//! color  = red or black, 2x
//! parity = odd or even, 2x
//! range  = low (1-18) or high (19-36), 2x
//!
//! Zero loses every bet except a number bet on 0.

use super::GameRng;
use powerspin_types::roulette::{
    Bet, BetKind, BetSelection, Color, ColorScheme, Outcome, Parity, RangeHalf, SpinResult,
    EVEN_MONEY_PAYOUT, LOW_RANGE_MAX, MAX_NUMBER, NUMBER_PAYOUT, WHEEL_SLOTS,
};

/// Single-zero wheel with a color table fixed at construction.
#[derive(Clone, Debug)]
pub struct Wheel {
    colors: [Color; WHEEL_SLOTS as usize],
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new(ColorScheme::default())
    }
}

impl Wheel {
    pub fn new(scheme: ColorScheme) -> Self {
        let mut colors = [Color::Green; WHEEL_SLOTS as usize];
        for (number, color) in colors.iter_mut().enumerate() {
            *color = scheme.color_of(number as u8);
        }
        Self { colors }
    }

    pub fn color_of(&self, number: u8) -> Color {
        self.colors
            .get(number as usize)
            .copied()
            .unwrap_or(Color::Green)
    }

    /// Spin the wheel.
    pub fn spin(&self, rng: &mut GameRng) -> SpinResult {
        let number = rng.spin_roulette();
        SpinResult {
            number,
            color: self.color_of(number),
        }
    }
}

/// Base payout and outcome of a bet against one spin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub payout: f64,
    pub outcome: Outcome,
}

/// Check if a bet wins for a given spin.
///
/// A bet whose selection is missing or does not match its kind never wins.
fn bet_wins(bet: &Bet, spin: &SpinResult) -> bool {
    match (bet.kind, bet.selection) {
        (BetKind::Number, Some(BetSelection::Number(n))) => n <= MAX_NUMBER && spin.number == n,
        // Green is never a winning color selection.
        (BetKind::Color, Some(BetSelection::Color(Color::Green))) => false,
        (BetKind::Color, Some(BetSelection::Color(color))) => spin.color == color,
        (BetKind::Parity, Some(BetSelection::Parity(parity))) => {
            spin.number != 0 && Parity::of(spin.number) == parity
        }
        (BetKind::Range, Some(BetSelection::Range(RangeHalf::Low))) => {
            spin.number >= 1 && spin.number <= LOW_RANGE_MAX
        }
        (BetKind::Range, Some(BetSelection::Range(RangeHalf::High))) => {
            spin.number > LOW_RANGE_MAX && spin.number <= MAX_NUMBER
        }
        _ => false,
    }
}

/// Get the gross payout factor for a bet kind.
fn payout_multiplier(kind: BetKind) -> f64 {
    match kind {
        BetKind::Number => NUMBER_PAYOUT,
        BetKind::Color | BetKind::Parity | BetKind::Range => EVEN_MONEY_PAYOUT,
    }
}

/// Evaluate a bet against a spin. Pure; never fails.
pub fn evaluate(bet: &Bet, spin: &SpinResult) -> Evaluation {
    if bet_wins(bet, spin) {
        Evaluation {
            payout: bet.amount * payout_multiplier(bet.kind),
            outcome: Outcome::Win,
        }
    } else {
        Evaluation {
            payout: 0.0,
            outcome: Outcome::Lose,
        }
    }
}
