use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error as ThisError;

use super::{Color, MAX_NUMBER};

#[derive(Debug, Clone, ThisError, PartialEq)]
pub enum BetError {
    #[error("unknown bet kind: {value}")]
    UnknownKind { value: String },
    #[error("invalid {kind} choice: {value}")]
    InvalidChoice { kind: BetKind, value: String },
    #[error("{kind} bet requires a choice")]
    MissingChoice { kind: BetKind },
    #[error("stake must be a positive finite amount (got {amount})")]
    InvalidAmount { amount: f64 },
    #[error("stake below table minimum (amount={amount}, min={min})")]
    BelowTableMinimum { amount: f64, min: f64 },
    #[error("stake above table maximum (amount={amount}, max={max})")]
    AboveTableMaximum { amount: f64, max: f64 },
    #[error("stake exceeds balance (amount={amount}, balance={balance})")]
    InsufficientBalance { amount: f64, balance: f64 },
}

/// Bet categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetKind {
    Number, // Single number, pays 36x stake
    Color,  // Red or black, pays 2x
    Parity, // Odd or even, pays 2x
    Range,  // 1-18 or 19-36, pays 2x
}

impl BetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetKind::Number => "number",
            BetKind::Color => "color",
            BetKind::Parity => "parity",
            BetKind::Range => "range",
        }
    }
}

impl fmt::Display for BetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetKind {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" | "straight" => Ok(BetKind::Number),
            "color" | "colour" => Ok(BetKind::Color),
            "parity" => Ok(BetKind::Parity),
            "range" => Ok(BetKind::Range),
            other => Err(BetError::UnknownKind {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn of(number: u8) -> Self {
        if number % 2 == 1 {
            Parity::Odd
        } else {
            Parity::Even
        }
    }
}

/// Half of the board covered by a range bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeHalf {
    Low,  // 1-18
    High, // 19-36
}

/// The value a bet is placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BetSelection {
    Number(u8),
    Color(Color),
    Parity(Parity),
    Range(RangeHalf),
}

impl BetSelection {
    /// Parse a choice for the given bet kind.
    pub fn parse(kind: BetKind, value: &str) -> Result<Self, BetError> {
        let normalized = value.trim().to_ascii_lowercase();
        let invalid = || BetError::InvalidChoice {
            kind,
            value: value.to_string(),
        };
        match kind {
            BetKind::Number => {
                let number: u8 = normalized.parse().map_err(|_| invalid())?;
                if number > MAX_NUMBER {
                    return Err(invalid());
                }
                Ok(BetSelection::Number(number))
            }
            BetKind::Color => normalized
                .parse::<Color>()
                .map(BetSelection::Color)
                .map_err(|_| invalid()),
            BetKind::Parity => match normalized.as_str() {
                "odd" => Ok(BetSelection::Parity(Parity::Odd)),
                "even" => Ok(BetSelection::Parity(Parity::Even)),
                _ => Err(invalid()),
            },
            BetKind::Range => match normalized.as_str() {
                "low" => Ok(BetSelection::Range(RangeHalf::Low)),
                "high" => Ok(BetSelection::Range(RangeHalf::High)),
                _ => Err(invalid()),
            },
        }
    }

    /// The bet kind this selection belongs to.
    pub fn kind(&self) -> BetKind {
        match self {
            BetSelection::Number(_) => BetKind::Number,
            BetSelection::Color(_) => BetKind::Color,
            BetSelection::Parity(_) => BetKind::Parity,
            BetSelection::Range(_) => BetKind::Range,
        }
    }
}

impl fmt::Display for BetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetSelection::Number(n) => write!(f, "{n}"),
            BetSelection::Color(c) => f.write_str(c.as_str()),
            BetSelection::Parity(Parity::Odd) => f.write_str("odd"),
            BetSelection::Parity(Parity::Even) => f.write_str("even"),
            BetSelection::Range(RangeHalf::Low) => f.write_str("low"),
            BetSelection::Range(RangeHalf::High) => f.write_str("high"),
        }
    }
}

/// A placed bet.
///
/// `kind` and `selection` are kept separate so that a bet whose selection does
/// not match its kind can still be represented; the evaluator scores such a bet
/// as a loss.
#[derive(Clone, Debug, PartialEq)]
pub struct Bet {
    pub kind: BetKind,
    pub selection: Option<BetSelection>,
    pub amount: f64,
}

impl Bet {
    pub fn new(kind: BetKind, selection: Option<BetSelection>, amount: f64) -> Self {
        Self {
            kind,
            selection,
            amount,
        }
    }

    /// Build a bet from a selection, deriving its kind.
    pub fn on(selection: BetSelection, amount: f64) -> Self {
        Self::new(selection.kind(), Some(selection), amount)
    }

    /// Parse a bet from a kind name and a choice, e.g. `("color", "red")`.
    pub fn parse(kind: &str, choice: Option<&str>, amount: f64) -> Result<Self, BetError> {
        let kind: BetKind = kind.parse()?;
        let choice = choice.ok_or(BetError::MissingChoice { kind })?;
        let selection = BetSelection::parse(kind, choice)?;
        validate_amount(amount)?;
        Ok(Self::on(selection, amount))
    }

    /// Parse a single-token bet: `red`, `black`, `odd`, `even`, `low`, `high`, or a number.
    pub fn from_shorthand(token: &str, amount: f64) -> Result<Self, BetError> {
        let normalized = token.trim().to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "red" | "black" | "green" => BetKind::Color,
            "odd" | "even" => BetKind::Parity,
            "low" | "high" => BetKind::Range,
            s if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => BetKind::Number,
            _ => {
                return Err(BetError::UnknownKind {
                    value: token.to_string(),
                })
            }
        };
        let selection = BetSelection::parse(kind, &normalized)?;
        validate_amount(amount)?;
        Ok(Self::on(selection, amount))
    }

    /// Text form of the selection as written to the round log (empty when absent).
    pub fn choice_label(&self) -> String {
        self.selection
            .map(|selection| selection.to_string())
            .unwrap_or_default()
    }
}

pub(crate) fn validate_amount(amount: f64) -> Result<(), BetError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BetError::InvalidAmount { amount });
    }
    Ok(())
}

/// Win/lose result of evaluating a bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
