//! Power-up rules and the manager that fires them.
//!
//! A rule turns a [`RoundContext`] into a [`PowerEffect`]. The
//! [`PowerManager`] decides whether any rule fires this round (trigger
//! policy), which one (weighted random choice), and bounds the result (cap
//! policy). New rule kinds only need to implement [`PowerRule`].

mod manager;
mod policy;

pub use manager::{PowerError, PowerManager, WeightedRule};
pub use policy::{Cap, CapPolicy, Trigger, TriggerPolicy};

use powerspin_types::power::{PowerEffect, RoundContext};

/// A payout modifier strategy.
pub trait PowerRule {
    /// Name recorded on the round when this rule fires.
    fn name(&self) -> &str;

    fn apply(&self, context: &RoundContext) -> PowerEffect;
}

impl<R: PowerRule + ?Sized> PowerRule for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply(&self, context: &RoundContext) -> PowerEffect {
        (**self).apply(context)
    }
}

/// Multiplies the payout by a fixed factor.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatMultiplier {
    pub factor: f64,
}

impl FlatMultiplier {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl PowerRule for FlatMultiplier {
    fn name(&self) -> &str {
        "FlatMultiplier"
    }

    fn apply(&self, _context: &RoundContext) -> PowerEffect {
        PowerEffect::multiplier(self.factor, format!("x{}", self.factor))
    }
}

/// Credits a fixed number of extra base payouts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BonusRespins {
    pub count: u32,
}

impl BonusRespins {
    pub fn new(count: u32) -> Self {
        Self { count }
    }
}

impl PowerRule for BonusRespins {
    fn name(&self) -> &str {
        "BonusRespins"
    }

    fn apply(&self, _context: &RoundContext) -> PowerEffect {
        PowerEffect::respins(self.count, format!("{}_respins", self.count))
    }
}

/// Boosts the multiplier once the current color streak reaches a threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct StreakBoost {
    pub threshold: u32,
    pub boost: f64,
}

impl StreakBoost {
    pub fn new(threshold: u32, boost: f64) -> Self {
        Self { threshold, boost }
    }
}

impl PowerRule for StreakBoost {
    fn name(&self) -> &str {
        "StreakBoost"
    }

    fn apply(&self, context: &RoundContext) -> PowerEffect {
        if context.streak >= self.threshold && context.color.is_some() {
            PowerEffect::multiplier(self.boost, format!("streak_{}", self.threshold))
        } else {
            PowerEffect::multiplier(1.0, "no_streak")
        }
    }
}
