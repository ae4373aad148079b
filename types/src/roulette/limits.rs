use serde::{Deserialize, Serialize};

use super::bet::validate_amount;
use super::{Bet, BetError, DEFAULT_TABLE_MAX, DEFAULT_TABLE_MIN};

/// Stake bounds enforced when a bet is placed at the table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_TABLE_MIN,
            max: DEFAULT_TABLE_MAX,
        }
    }
}

impl TableLimits {
    /// Check a bet against the table bounds and the player's balance.
    pub fn validate(&self, bet: &Bet, balance: f64) -> Result<(), BetError> {
        validate_amount(bet.amount)?;
        if bet.amount < self.min {
            return Err(BetError::BelowTableMinimum {
                amount: bet.amount,
                min: self.min,
            });
        }
        if bet.amount > self.max {
            return Err(BetError::AboveTableMaximum {
                amount: bet.amount,
                max: self.max,
            });
        }
        check_balance(bet, balance)
    }
}

/// Balance-only check used by the simulation path.
pub fn check_balance(bet: &Bet, balance: f64) -> Result<(), BetError> {
    if bet.amount > balance {
        return Err(BetError::InsufficientBalance {
            amount: bet.amount,
            balance,
        });
    }
    Ok(())
}

/// A bankroll at or below zero cannot keep playing.
pub fn is_broke(balance: f64) -> bool {
    balance <= 0.0
}
