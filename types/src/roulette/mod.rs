//! Roulette domain types.
//!
//! Defines the wheel result, bet, outcome and table limit types consumed by the
//! execution layer and written to the round log.

mod bet;
mod constants;
mod limits;
mod spin;

pub use bet::*;
pub use constants::*;
pub use limits::*;
pub use spin::*;

#[cfg(test)]
mod tests;
