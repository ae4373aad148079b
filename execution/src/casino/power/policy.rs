//! Trigger and cap policies.
//!
//! Both are pure: they look at the round and return a decision, nothing more.
//! Any matching closure can be used in place of the built-in variants.

use powerspin_types::power::{PowerModification, RoundContext};

/// Decides whether a power rule fires on a round.
pub trait TriggerPolicy {
    fn should_trigger(&self, round_index: u64, context: &RoundContext) -> bool;
}

impl<F> TriggerPolicy for F
where
    F: Fn(u64, &RoundContext) -> bool,
{
    fn should_trigger(&self, round_index: u64, context: &RoundContext) -> bool {
        self(round_index, context)
    }
}

/// Built-in trigger policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Trigger {
    #[default]
    Never,
    Always,
    /// Fires on the last round of every block of `n` (indices n-1, 2n-1, ...).
    EveryNth(u64),
    /// Fires while the current color streak is at least this long.
    StreakAtLeast(u32),
}

impl TriggerPolicy for Trigger {
    fn should_trigger(&self, round_index: u64, context: &RoundContext) -> bool {
        match *self {
            Trigger::Never => false,
            Trigger::Always => true,
            Trigger::EveryNth(0) => false,
            Trigger::EveryNth(n) => round_index % n == n - 1,
            Trigger::StreakAtLeast(min) => context.streak >= min,
        }
    }
}

/// Bounds a modification produced by a rule.
pub trait CapPolicy {
    fn cap(&self, modification: PowerModification, context: &RoundContext) -> PowerModification;
}

impl<F> CapPolicy for F
where
    F: Fn(PowerModification, &RoundContext) -> PowerModification,
{
    fn cap(&self, modification: PowerModification, context: &RoundContext) -> PowerModification {
        self(modification, context)
    }
}

/// Built-in cap policies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Cap {
    #[default]
    Uncapped,
    /// Clamp the multiplier to this ceiling and note the clamp.
    MaxMultiplier(f64),
}

impl CapPolicy for Cap {
    fn cap(&self, mut modification: PowerModification, _context: &RoundContext) -> PowerModification {
        match *self {
            Cap::Uncapped => modification,
            Cap::MaxMultiplier(max) => {
                if modification.multiplier > max {
                    modification.multiplier = max;
                    let clamp = format!("capped_to_{max:?}");
                    if modification.note.is_empty() {
                        modification.note = clamp;
                    } else {
                        modification.note.push(' ');
                        modification.note.push_str(&clamp);
                    }
                }
                modification
            }
        }
    }
}
