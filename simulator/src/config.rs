//! Run configuration.
//!
//! A [`Config`] is read from YAML (every field optional) and checked into a
//! [`ValidatedConfig`], which carries parsed types ready for the simulation.

use powerspin_execution::casino::{
    BonusRespins, Cap, FlatMultiplier, PowerError, PowerManager, PowerRule, StreakBoost, Trigger,
    Wheel,
};
use powerspin_execution::{RoundPipeline, RunParams};
use powerspin_types::roulette::{Bet, BetError, ColorScheme, TableLimits};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, str::FromStr};
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_PREFIX: &str = "powerspin";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BetConfig {
    #[serde(default = "default_bet_kind")]
    pub kind: String,
    #[serde(default = "default_bet_choice")]
    pub choice: Option<String>,
    #[serde(default = "default_bet_amount")]
    pub amount: f64,
}

impl Default for BetConfig {
    fn default() -> Self {
        Self {
            kind: default_bet_kind(),
            choice: default_bet_choice(),
            amount: default_bet_amount(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerConfig {
    Never,
    Always,
    EveryNth(u64),
    StreakAtLeast(u32),
}

impl From<TriggerConfig> for Trigger {
    fn from(value: TriggerConfig) -> Self {
        match value {
            TriggerConfig::Never => Trigger::Never,
            TriggerConfig::Always => Trigger::Always,
            TriggerConfig::EveryNth(n) => Trigger::EveryNth(n),
            TriggerConfig::StreakAtLeast(n) => Trigger::StreakAtLeast(n),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapConfig {
    Uncapped,
    MaxMultiplier(f64),
}

impl From<CapConfig> for Cap {
    fn from(value: CapConfig) -> Self {
        match value {
            CapConfig::Uncapped => Cap::Uncapped,
            CapConfig::MaxMultiplier(max) => Cap::MaxMultiplier(max),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    FlatMultiplier { factor: f64 },
    BonusRespins { count: u32 },
    StreakBoost { threshold: u32, boost: f64 },
}

impl RuleKind {
    /// The multiplier parameter of this rule, if it has one.
    fn multiplier(&self) -> Option<(&'static str, f64)> {
        match *self {
            RuleKind::FlatMultiplier { factor } => Some(("factor", factor)),
            RuleKind::BonusRespins { .. } => None,
            RuleKind::StreakBoost { boost, .. } => Some(("boost", boost)),
        }
    }

    fn build(self) -> Box<dyn PowerRule> {
        match self {
            RuleKind::FlatMultiplier { factor } => Box::new(FlatMultiplier::new(factor)),
            RuleKind::BonusRespins { count } => Box::new(BonusRespins::new(count)),
            RuleKind::StreakBoost { threshold, boost } => {
                Box::new(StreakBoost::new(threshold, boost))
            }
        }
    }
}

/// One weighted entry of the power rule table.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RuleConfig {
    #[serde(flatten)]
    pub rule: RuleKind,
    pub weight: f64,
    /// Name recorded in the log when this rule fires (rule default when absent).
    #[serde(default)]
    pub name: Option<String>,
}

impl RuleConfig {
    fn new(rule: RuleKind, weight: f64) -> Self {
        Self {
            rule,
            weight,
            name: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_rounds")]
    pub rounds: u64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_starting_balance")]
    pub starting_balance: f64,
    #[serde(default)]
    pub bet: BetConfig,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default = "default_trigger", with = "serde_yaml::with::singleton_map")]
    pub trigger: TriggerConfig,
    #[serde(default = "default_cap", with = "serde_yaml::with::singleton_map")]
    pub cap: CapConfig,
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,
    #[serde(default)]
    pub table: TableLimits,
    /// Log progress every this many rounds when verbose (0 disables).
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub append: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_render_charts")]
    pub render_charts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            seed: default_seed(),
            starting_balance: default_starting_balance(),
            bet: BetConfig::default(),
            color_scheme: ColorScheme::default(),
            trigger: default_trigger(),
            cap: default_cap(),
            rules: default_rules(),
            table: TableLimits::default(),
            progress_interval: default_progress_interval(),
            verbose: false,
            prefix: None,
            append: false,
            log_level: default_log_level(),
            render_charts: default_render_charts(),
        }
    }
}

fn default_rounds() -> u64 {
    100
}

fn default_seed() -> u64 {
    42
}

fn default_starting_balance() -> f64 {
    1_000.0
}

fn default_bet_kind() -> String {
    "color".to_string()
}

fn default_bet_choice() -> Option<String> {
    Some("red".to_string())
}

fn default_bet_amount() -> f64 {
    10.0
}

fn default_trigger() -> TriggerConfig {
    TriggerConfig::EveryNth(5)
}

fn default_cap() -> CapConfig {
    CapConfig::MaxMultiplier(3.0)
}

fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::new(RuleKind::FlatMultiplier { factor: 2.0 }, 0.5),
        RuleConfig::new(RuleKind::BonusRespins { count: 1 }, 0.3),
        RuleConfig::new(
            RuleKind::StreakBoost {
                threshold: 3,
                boost: 1.75,
            },
            0.2,
        ),
    ]
}

fn default_progress_interval() -> u64 {
    1_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_render_charts() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("{field} must be a positive finite number (got {value})")]
    InvalidPositive { field: &'static str, value: f64 },
    #[error("table limits must satisfy 0 < min <= max (min={min}, max={max})")]
    InvalidTableLimits { min: f64, max: f64 },
    #[error("invalid bet")]
    InvalidBet(#[from] BetError),
    #[error("rules[{index}] is invalid")]
    InvalidRule {
        index: usize,
        #[source]
        source: PowerError,
    },
    #[error("rules[{index}].{field} must be finite and >= 0 (got {value})")]
    InvalidRuleParameter {
        index: usize,
        field: &'static str,
        value: f64,
    },
    #[error("prefix must not be empty")]
    EmptyPrefix,
}

/// A checked configuration.
#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub params: RunParams,
    pub color_scheme: ColorScheme,
    pub trigger: Trigger,
    pub cap: Cap,
    pub rules: Vec<RuleConfig>,
    pub table: TableLimits,
    pub prefix: String,
    pub append: bool,
    pub log_level: Level,
    pub render_charts: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "rounds",
                value: 0,
            });
        }
        ensure_positive("starting_balance", self.starting_balance)?;
        if !(self.table.min > 0.0 && self.table.min <= self.table.max)
            || !self.table.max.is_finite()
        {
            return Err(ConfigError::InvalidTableLimits {
                min: self.table.min,
                max: self.table.max,
            });
        }
        if let TriggerConfig::EveryNth(0) = self.trigger {
            return Err(ConfigError::InvalidNonZero {
                field: "trigger.every_nth",
                value: 0,
            });
        }
        if let CapConfig::MaxMultiplier(max) = self.cap {
            ensure_positive("cap.max_multiplier", max)?;
        }

        let bet = Bet::parse(&self.bet.kind, self.bet.choice.as_deref(), self.bet.amount)?;
        self.table.validate(&bet, self.starting_balance)?;

        for (index, rule) in self.rules.iter().enumerate() {
            if let Some((field, value)) = rule.rule.multiplier() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidRuleParameter {
                        index,
                        field,
                        value,
                    });
                }
            }
        }
        // Build once to surface weight errors now rather than at run time.
        build_power_manager(self.trigger.into(), self.cap.into(), &self.rules)?;

        let prefix = self.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if prefix.trim().is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        Ok(ValidatedConfig {
            params: RunParams {
                rounds: self.rounds,
                seed: self.seed,
                starting_balance: self.starting_balance,
                bet,
                progress_interval: self
                    .verbose
                    .then_some(self.progress_interval)
                    .filter(|n| *n > 0),
            },
            color_scheme: self.color_scheme,
            trigger: self.trigger.into(),
            cap: self.cap.into(),
            rules: self.rules,
            table: self.table,
            prefix,
            append: self.append,
            log_level,
            render_charts: self.render_charts,
        })
    }
}

impl ValidatedConfig {
    pub fn power_manager(&self) -> Result<PowerManager, ConfigError> {
        build_power_manager(self.trigger, self.cap, &self.rules)
    }

    /// Wheel and power manager for a fresh run.
    pub fn pipeline(&self) -> Result<RoundPipeline, ConfigError> {
        Ok(RoundPipeline::new(
            Wheel::new(self.color_scheme),
            self.power_manager()?,
        ))
    }

    pub fn json_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.json", self.prefix))
    }

    pub fn csv_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.csv", self.prefix))
    }
}

fn build_power_manager(
    trigger: Trigger,
    cap: Cap,
    rules: &[RuleConfig],
) -> Result<PowerManager, ConfigError> {
    let mut manager = PowerManager::new(trigger, cap);
    for (index, rule) in rules.iter().enumerate() {
        manager
            .add_named_rule(rule.rule.build(), rule.name.clone(), rule.weight)
            .map_err(|source| ConfigError::InvalidRule { index, source })?;
    }
    Ok(manager)
}

fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidPositive { field, value });
    }
    Ok(())
}
