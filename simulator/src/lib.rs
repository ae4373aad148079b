//! powerspin simulator: round log, analytics, charts and the run driver.
//!
//! The execution crate plays rounds; this crate decides where they go. Every
//! round is appended to a JSON-lines file and a CSV file ([`EventLog`]), and
//! once the run ends the CSV is summarized ([`analytics`]) and optionally
//! charted through a [`ChartRenderer`].

pub mod analytics;
pub mod charts;
pub mod config;
pub mod event_log;
pub mod runner;

pub use analytics::{analyze, summarize, AnalyticsError, Distributions, Summary};
pub use charts::{ChartData, ChartError, ChartRenderer, SeriesFileRenderer};
pub use config::{Config, ConfigError, ValidatedConfig};
pub use event_log::{EventLog, LogError, Record};
pub use runner::{run, RunOutput};
