//! Multi-round simulation driver.
//!
//! The driver owns the bankroll, the color streak and the random source for
//! the whole run. Rounds are strictly sequential: each one is spun, evaluated,
//! modified, settled and handed to the [`RoundSink`] before the next begins.
//! The run ends after the configured number of rounds, the first time the
//! balance drops to zero or below (that round is still recorded), or before a
//! round whose stake the balance can no longer cover.

use crate::casino::GameRng;
use crate::round::{RoundPipeline, StreakTracker};
use anyhow::Context;
use powerspin_types::event::RoundEvent;
use powerspin_types::roulette::{check_balance, is_broke, Bet, Color};
use tracing::{debug, info};

/// Destination for completed rounds.
pub trait RoundSink {
    fn record(&mut self, event: RoundEvent) -> anyhow::Result<()>;
}

impl RoundSink for Vec<RoundEvent> {
    fn record(&mut self, event: RoundEvent) -> anyhow::Result<()> {
        self.push(event);
        Ok(())
    }
}

/// Parameters of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunParams {
    pub rounds: u64,
    pub seed: u64,
    pub starting_balance: f64,
    pub bet: Bet,
    /// Log progress every this many rounds (disabled when `None`).
    pub progress_interval: Option<u64>,
}

/// Mutable state carried from round to round.
#[derive(Clone, Debug, PartialEq)]
pub struct RunningState {
    pub balance: f64,
    pub streak: StreakTracker,
    pub activation_count: u64,
}

impl RunningState {
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            streak: StreakTracker::default(),
            activation_count: 0,
        }
    }

    pub fn streak_color(&self) -> Option<Color> {
        self.streak.color()
    }

    pub fn streak_length(&self) -> u32 {
        self.streak.length()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// All configured rounds were played.
    Completed,
    /// The balance reached zero or below.
    Bankrupt,
    /// The stake exceeded the remaining balance before a round could start.
    InsufficientBalance,
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationReport {
    pub rounds_played: u64,
    pub final_balance: f64,
    pub activations: u64,
    pub stop_reason: StopReason,
}

pub struct Simulation {
    pipeline: RoundPipeline,
    rng: GameRng,
    params: RunParams,
    state: RunningState,
}

impl Simulation {
    pub fn new(pipeline: RoundPipeline, params: RunParams) -> Self {
        Self {
            rng: GameRng::new(params.seed),
            state: RunningState::new(params.starting_balance),
            pipeline,
            params,
        }
    }

    pub fn state(&self) -> &RunningState {
        &self.state
    }

    /// Play the run to completion, recording every round in `sink`.
    pub fn run(&mut self, sink: &mut impl RoundSink) -> anyhow::Result<SimulationReport> {
        info!(
            rounds = self.params.rounds,
            seed = self.params.seed,
            starting_balance = self.params.starting_balance,
            bet_type = %self.params.bet.kind,
            bet_choice = %self.params.bet.choice_label(),
            stake = self.params.bet.amount,
            "starting simulation"
        );

        let mut rounds_played = 0u64;
        let mut stop_reason = StopReason::Completed;
        for round_index in 0..self.params.rounds {
            if check_balance(&self.params.bet, self.state.balance).is_err() {
                info!(
                    round_index,
                    balance = self.state.balance,
                    stake = self.params.bet.amount,
                    "balance cannot cover stake"
                );
                stop_reason = StopReason::InsufficientBalance;
                break;
            }

            let outcome = self.pipeline.play(
                round_index,
                &self.params.bet,
                &mut self.state.streak,
                &mut self.rng,
            );
            self.state.balance += outcome.net;
            self.state.activation_count = self.pipeline.power().activations();
            rounds_played += 1;

            let event = RoundEvent::new(
                round_index,
                outcome.evaluation.outcome,
                outcome.spin,
                &self.params.bet,
                outcome.evaluation.payout,
                outcome.payout,
                self.state.balance,
                &outcome.modification,
            );
            sink.record(event)
                .with_context(|| format!("record round {round_index}"))?;

            debug!(
                round_index,
                number = outcome.spin.number,
                color = %outcome.spin.color,
                outcome = %outcome.evaluation.outcome,
                payout = outcome.payout,
                balance = self.state.balance,
                "round complete"
            );
            if let Some(interval) = self.params.progress_interval.filter(|n| *n > 0) {
                if round_index % interval == 0 {
                    info!(
                        round_index,
                        outcome = %outcome.evaluation.outcome,
                        payout = format_args!("{:.2}", outcome.payout),
                        balance = format_args!("{:.2}", self.state.balance),
                        "progress"
                    );
                }
            }

            if is_broke(self.state.balance) {
                info!(round_index, balance = self.state.balance, "bankrupt");
                stop_reason = StopReason::Bankrupt;
                break;
            }
        }

        let report = SimulationReport {
            rounds_played,
            final_balance: self.state.balance,
            activations: self.state.activation_count,
            stop_reason,
        };
        info!(
            rounds_played = report.rounds_played,
            final_balance = report.final_balance,
            activations = report.activations,
            stop_reason = ?report.stop_reason,
            "simulation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casino::{BonusRespins, Cap, FlatMultiplier, PowerManager, StreakBoost, Trigger, Wheel};
    use powerspin_types::roulette::{BetKind, BetSelection, Color};

    fn scenario_power() -> PowerManager {
        PowerManager::new(Trigger::EveryNth(5), Cap::MaxMultiplier(3.0))
            .with_rule(FlatMultiplier::new(2.0), 0.5)
            .unwrap()
            .with_rule(BonusRespins::new(1), 0.3)
            .unwrap()
            .with_rule(StreakBoost::new(3, 1.75), 0.2)
            .unwrap()
    }

    fn scenario(seed: u64, rounds: u64) -> Simulation {
        Simulation::new(
            RoundPipeline::new(Wheel::default(), scenario_power()),
            RunParams {
                rounds,
                seed,
                starting_balance: 1_000.0,
                bet: Bet::on(BetSelection::Color(Color::Red), 10.0),
                progress_interval: None,
            },
        )
    }

    struct FailingSink;

    impl RoundSink for FailingSink {
        fn record(&mut self, _event: RoundEvent) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn test_run_records_every_round() {
        let mut events = Vec::new();
        let report = scenario(42, 100).run(&mut events).unwrap();
        assert_eq!(report.rounds_played, events.len() as u64);
        assert!(events.len() <= 100);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.round_index, i as u64);
            assert_eq!(event.net, event.payout - event.stake);
            if event.base_payout == 0.0 {
                assert_eq!(event.payout, 0.0);
            }
            assert_eq!(event.power_active, i % 5 == 4);
        }
        let last = events.last().unwrap();
        assert_eq!(last.balance_after, report.final_balance);
        if report.stop_reason == StopReason::Completed {
            assert_eq!(events.len(), 100);
        }
    }

    #[test]
    fn test_balance_follows_net() {
        let mut events = Vec::new();
        scenario(7, 250).run(&mut events).unwrap();
        let mut balance = 1_000.0;
        for event in &events {
            balance += event.net;
            assert_eq!(event.balance_after, balance);
        }
    }

    #[test]
    fn test_same_seed_same_events() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        scenario(42, 500).run(&mut first).unwrap();
        scenario(42, 500).run(&mut second).unwrap();
        assert_eq!(first, second);

        let mut other = Vec::new();
        scenario(43, 500).run(&mut other).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_activation_count_matches_events() {
        let mut events = Vec::new();
        let mut simulation = scenario(3, 400);
        let report = simulation.run(&mut events).unwrap();
        let active = events.iter().filter(|e| e.power_active).count() as u64;
        assert_eq!(report.activations, active);
        assert_eq!(simulation.state().activation_count, active);
    }

    #[test]
    fn test_bankruptcy_stops_after_first_round() {
        let mut simulation = Simulation::new(
            RoundPipeline::new(Wheel::default(), PowerManager::default()),
            RunParams {
                rounds: 100,
                seed: 42,
                starting_balance: 10.0,
                // No selection: scored as a loss every round.
                bet: Bet::new(BetKind::Number, None, 10.0),
                progress_interval: None,
            },
        );
        let mut events = Vec::new();
        let report = simulation.run(&mut events).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(report.rounds_played, 1);
        assert_eq!(report.stop_reason, StopReason::Bankrupt);
        assert_eq!(events[0].balance_after, 0.0);
    }

    #[test]
    fn test_stake_above_balance_stops_before_round() {
        let mut simulation = Simulation::new(
            RoundPipeline::new(Wheel::default(), PowerManager::default()),
            RunParams {
                rounds: 10,
                seed: 1,
                starting_balance: 15.0,
                bet: Bet::new(BetKind::Number, None, 10.0),
                progress_interval: Some(1),
            },
        );
        let mut events = Vec::new();
        let report = simulation.run(&mut events).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(report.stop_reason, StopReason::InsufficientBalance);
        assert_eq!(report.final_balance, 5.0);
    }

    #[test]
    fn test_streak_state_tracks_colors() {
        let mut events = Vec::new();
        let mut simulation = scenario(11, 60);
        simulation.run(&mut events).unwrap();
        let last = events.last().unwrap();
        assert_eq!(simulation.state().streak_color(), Some(last.color));
        let expected = events
            .iter()
            .rev()
            .take_while(|e| e.color == last.color)
            .count() as u32;
        assert_eq!(simulation.state().streak_length(), expected);
    }

    #[test]
    fn test_sink_failure_propagates() {
        let err = scenario(1, 5).run(&mut FailingSink).unwrap_err();
        assert!(format!("{err:#}").contains("disk full"));
        assert!(err.to_string().contains("record round 0"));
    }
}
