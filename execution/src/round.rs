//! Single-round pipeline: spin, evaluate, modify, settle.

use crate::casino::{evaluate, Evaluation, GameRng, PowerManager, Wheel};
use powerspin_types::power::{PowerModification, RoundContext};
use powerspin_types::roulette::{Bet, Color, SpinResult};

/// Tracks the run of consecutive spins landing on the same color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreakTracker {
    color: Option<Color>,
    length: u32,
}

impl StreakTracker {
    /// Record a spin color and return the updated streak length.
    pub fn observe(&mut self, color: Color) -> u32 {
        if self.color == Some(color) {
            self.length = self.length.saturating_add(1);
        } else {
            self.color = Some(color);
            self.length = 1;
        }
        self.length
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn length(&self) -> u32 {
        self.length
    }
}

/// Everything that happened in one round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOutcome {
    pub spin: SpinResult,
    pub evaluation: Evaluation,
    pub context: RoundContext,
    pub modification: PowerModification,
    pub payout: f64,
    pub net: f64,
}

/// Final payout and net change for a round.
///
/// Losses (base payout 0) are never boosted.
pub fn settle(base_payout: f64, modification: &PowerModification, stake: f64) -> (f64, f64) {
    let payout = modification.apply_to(base_payout);
    (payout, payout - stake)
}

/// Wheel, evaluator and power manager wired together.
pub struct RoundPipeline {
    wheel: Wheel,
    power: PowerManager,
}

impl RoundPipeline {
    pub fn new(wheel: Wheel, power: PowerManager) -> Self {
        Self { wheel, power }
    }

    pub fn power(&self) -> &PowerManager {
        &self.power
    }

    /// Play one round of `bet`, advancing `streak`.
    pub fn play(
        &mut self,
        round_index: u64,
        bet: &Bet,
        streak: &mut StreakTracker,
        rng: &mut GameRng,
    ) -> RoundOutcome {
        let spin = self.wheel.spin(rng);
        let streak_length = streak.observe(spin.color);
        let evaluation = evaluate(bet, &spin);

        let context = RoundContext {
            streak: streak_length,
            color: Some(spin.color),
            outcome: evaluation.outcome,
            base_payout: evaluation.payout,
        };
        let modification = self.power.maybe_apply(round_index, &context, rng);
        let (payout, net) = settle(evaluation.payout, &modification, bet.amount);

        RoundOutcome {
            spin,
            evaluation,
            context,
            modification,
            payout,
            net,
        }
    }
}
