//! Chart output for analyzed runs.
//!
//! Rendering sits behind [`ChartRenderer`] so analytics never depends on a
//! plotting backend. The bundled [`SeriesFileRenderer`] writes each chart as a
//! small JSON document holding exactly the data a plot would show.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

pub const DEFAULT_HISTOGRAM_BINS: usize = 40;

/// Data extracted from a round log, in log order.
#[derive(Clone, Copy, Debug)]
pub struct ChartData<'a> {
    pub outcomes: &'a BTreeMap<String, u64>,
    pub balances: &'a [f64],
    pub payouts: &'a [f64],
}

#[derive(Debug, ThisError)]
pub enum ChartError {
    #[error("failed to write chart {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode chart {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait ChartRenderer {
    /// Render every chart for `data`, naming outputs after `prefix`.
    /// Returns the paths written.
    fn render(&self, data: &ChartData<'_>, prefix: &str) -> Result<Vec<PathBuf>, ChartError>;
}

/// One histogram bin covering `[start, end)` (the last bin also includes `end`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

/// Equal-width histogram over the range of `values`.
///
/// A constant series is spread over `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if bins == 0 || lo > hi {
        return Vec::new();
    }
    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for v in values.iter().copied().filter(|v| v.is_finite()) {
        let index = (((v - lo) / width) as usize).min(bins - 1);
        out[index].count += 1;
    }
    out
}

#[derive(Serialize)]
struct BarChart<'a> {
    title: &'static str,
    x_label: &'static str,
    y_label: &'static str,
    bars: &'a BTreeMap<String, u64>,
}

#[derive(Serialize)]
struct LineChart<'a> {
    title: &'static str,
    x_label: &'static str,
    y_label: &'static str,
    series: &'a [f64],
}

#[derive(Serialize)]
struct HistogramChart {
    title: &'static str,
    x_label: &'static str,
    y_label: &'static str,
    bins: Vec<Bin>,
}

/// Writes `<prefix>_outcomes.json`, `<prefix>_balance.json` and
/// `<prefix>_payout_hist.json`.
#[derive(Clone, Copy, Debug)]
pub struct SeriesFileRenderer {
    bins: usize,
}

impl Default for SeriesFileRenderer {
    fn default() -> Self {
        Self {
            bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl ChartRenderer for SeriesFileRenderer {
    fn render(&self, data: &ChartData<'_>, prefix: &str) -> Result<Vec<PathBuf>, ChartError> {
        let outcomes = PathBuf::from(format!("{prefix}_outcomes.json"));
        write_json(
            &outcomes,
            &BarChart {
                title: "Outcome distribution",
                x_label: "Result",
                y_label: "Count",
                bars: data.outcomes,
            },
        )?;

        let balance = PathBuf::from(format!("{prefix}_balance.json"));
        write_json(
            &balance,
            &LineChart {
                title: "Bankroll / Balance over time",
                x_label: "Round index",
                y_label: "Balance",
                series: data.balances,
            },
        )?;

        let payouts = PathBuf::from(format!("{prefix}_payout_hist.json"));
        write_json(
            &payouts,
            &HistogramChart {
                title: "Payout distribution",
                x_label: "Payout",
                y_label: "Frequency",
                bins: histogram(data.payouts, self.bins),
            },
        )?;

        Ok(vec![outcomes, balance, payouts])
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ChartError> {
    let io_err = |source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| ChartError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)
}
