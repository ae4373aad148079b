//! Common types used throughout powerspin.
//!
//! The execution crate produces these values round by round and the simulator
//! persists and analyzes them. Nothing in here performs I/O or draws randomness.

pub mod event;
pub mod power;
pub mod roulette;

pub use event::RoundEvent;
pub use power::{PowerEffect, PowerModification, RoundContext};
pub use roulette::{
    check_balance, is_broke, Bet, BetError, BetKind, BetSelection, Color, ColorScheme, Outcome,
    Parity, RangeHalf, SpinResult, TableLimits,
};
