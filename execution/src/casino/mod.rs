//! Roulette table and power-up rules.

pub mod power;
pub mod roulette;

pub use crate::rng::GameRng;
pub use power::{
    BonusRespins, Cap, CapPolicy, FlatMultiplier, PowerError, PowerManager, PowerRule,
    StreakBoost, Trigger, TriggerPolicy, WeightedRule,
};
pub use roulette::{evaluate, Evaluation, Wheel};
