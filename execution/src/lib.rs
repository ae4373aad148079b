//! powerspin execution layer.
//!
//! This crate contains the deterministic round logic: the wheel, bet
//! evaluation, power-up rules and their manager, the single-round pipeline and
//! the multi-round simulation driver.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution.
//! - Only draw randomness from the [`GameRng`] handed to a component.
//! - A run is fully described by its seed, bet, rounds and power policies.
//!
//! ## Minimal run (example)
//! ```rust
//! use powerspin_execution::casino::{Cap, FlatMultiplier, PowerManager, Trigger, Wheel};
//! use powerspin_execution::{RoundPipeline, RunParams, Simulation};
//! use powerspin_types::roulette::{Bet, BetSelection, Color};
//!
//! let power = PowerManager::new(Trigger::EveryNth(5), Cap::MaxMultiplier(3.0))
//!     .with_rule(FlatMultiplier::new(2.0), 1.0)?;
//! let mut simulation = Simulation::new(
//!     RoundPipeline::new(Wheel::default(), power),
//!     RunParams {
//!         rounds: 20,
//!         seed: 42,
//!         starting_balance: 1_000.0,
//!         bet: Bet::on(BetSelection::Color(Color::Red), 10.0),
//!         progress_interval: None,
//!     },
//! );
//! let mut events = Vec::new();
//! let report = simulation.run(&mut events)?;
//! assert_eq!(report.rounds_played as usize, events.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod casino;
pub mod rng;
pub mod round;
pub mod simulation;

pub use casino::{evaluate, Evaluation, PowerError, PowerManager, PowerRule, Wheel};
pub use rng::GameRng;
pub use round::{settle, RoundOutcome, RoundPipeline, StreakTracker};
pub use simulation::{RoundSink, RunParams, RunningState, Simulation, SimulationReport, StopReason};
