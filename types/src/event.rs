//! Durable record of one played round.

use serde::{Deserialize, Serialize};

use crate::power::PowerModification;
use crate::roulette::{Bet, BetKind, Color, Outcome, SpinResult};

/// One round as written to the round log.
///
/// Field order is the column order of the tabular log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundEvent {
    pub round_index: u64,
    pub result: Outcome,
    pub number: u8,
    pub color: Color,
    pub bet_type: BetKind,
    pub bet_choice: String,
    pub stake: f64,
    pub base_payout: f64,
    pub payout: f64,
    pub net: f64,
    pub balance_after: f64,
    pub power_active: bool,
    pub power_multiplier: f64,
    pub power_extra_respins: u32,
    pub power_note: String,
    pub power_rule: String,
    /// Assigned by the log on append when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl RoundEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        round_index: u64,
        outcome: Outcome,
        spin: SpinResult,
        bet: &Bet,
        base_payout: f64,
        payout: f64,
        balance_after: f64,
        modification: &PowerModification,
    ) -> Self {
        Self {
            round_index,
            result: outcome,
            number: spin.number,
            color: spin.color,
            bet_type: bet.kind,
            bet_choice: bet.choice_label(),
            stake: bet.amount,
            base_payout,
            payout,
            net: payout - bet.amount,
            balance_after,
            power_active: modification.active,
            power_multiplier: modification.multiplier,
            power_extra_respins: modification.extra_respins,
            power_note: modification.note.clone(),
            power_rule: modification.rule_name.clone().unwrap_or_default(),
            timestamp: None,
        }
    }
}
