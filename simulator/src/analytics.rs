//! Post-run analytics over the CSV round log.
//!
//! Missing or unparsable numeric cells count as zero, and a power flag counts
//! as active when it reads `true`, `1`, `yes` or `active`.

use crate::charts::{ChartData, ChartRenderer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::{info, warn};

#[derive(Debug, ThisError)]
pub enum AnalyticsError {
    #[error("round log not found: {path}")]
    NotFound { path: PathBuf },
    #[error("failed to read round log {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Headline statistics of a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub rounds: u64,
    pub avg_payout: f64,
    pub median_payout: f64,
    pub stdev_payout: f64,
    pub power_activation_pct: f64,
}

/// Per-round series extracted from the log, in log order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Distributions {
    /// Count of rows per `result` value (`unknown` when the column is absent).
    pub outcomes: BTreeMap<String, u64>,
    pub balances: Vec<f64>,
    pub payouts: Vec<f64>,
    pub active_rounds: u64,
}

impl Distributions {
    pub fn rounds(&self) -> u64 {
        self.payouts.len() as u64
    }

    pub fn summary(&self) -> Summary {
        let rounds = self.rounds();
        let power_activation_pct = if rounds == 0 {
            0.0
        } else {
            self.active_rounds as f64 / rounds as f64 * 100.0
        };
        Summary {
            rounds,
            avg_payout: mean(&self.payouts),
            median_payout: median(&self.payouts),
            stdev_payout: pstdev(&self.payouts),
            power_activation_pct,
        }
    }

    pub fn chart_data(&self) -> ChartData<'_> {
        ChartData {
            outcomes: &self.outcomes,
            balances: &self.balances,
            payouts: &self.payouts,
        }
    }
}

/// Read the per-round series from a CSV log.
pub fn load(path: &Path) -> Result<Distributions, AnalyticsError> {
    if !path.exists() {
        return Err(AnalyticsError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let csv_err = |source| AnalyticsError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    // Byte records: a cell that is not UTF-8 is treated as unparsable, not fatal.
    let headers = reader.byte_headers().map_err(csv_err)?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name.as_bytes());
    let result_col = column("result");
    let payout_col = column("payout");
    let balance_col = column("balance_after");
    let active_col = column("power_active");

    let mut out = Distributions::default();
    for row in reader.byte_records() {
        let row = row.map_err(csv_err)?;
        let cell = |col: Option<usize>| {
            col.and_then(|i| row.get(i))
                .and_then(|bytes| std::str::from_utf8(bytes).ok())
        };

        let result = match result_col {
            Some(i) => row
                .get(i)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default(),
            None => "unknown".to_string(),
        };
        *out.outcomes.entry(result).or_default() += 1;

        let payout = parse_number(cell(payout_col), 0.0);
        out.payouts.push(payout);
        out.balances.push(parse_number(cell(balance_col), 0.0));
        if cell(active_col).is_some_and(is_active) {
            out.active_rounds += 1;
        }
    }
    Ok(out)
}

/// Summary statistics of a CSV log.
pub fn summarize(path: &Path) -> Result<Summary, AnalyticsError> {
    Ok(load(path)?.summary())
}

/// Summarize a log and, when a renderer is given and the log has rounds,
/// render its charts.
///
/// Rendering failures are logged and do not fail the analysis.
pub fn analyze(
    path: &Path,
    renderer: Option<&dyn ChartRenderer>,
    prefix: &str,
) -> Result<Summary, AnalyticsError> {
    let distributions = load(path)?;
    let summary = distributions.summary();
    if let Some(renderer) = renderer.filter(|_| distributions.rounds() > 0) {
        match renderer.render(&distributions.chart_data(), prefix) {
            Ok(paths) => info!(charts = paths.len(), prefix, "rendered charts"),
            Err(err) => warn!(error = %err, prefix, "chart rendering failed"),
        }
    }
    Ok(summary)
}

/// Parse a numeric cell, falling back to `default` when absent or malformed.
pub fn parse_number(value: Option<&str>, default: f64) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(default)
}

pub fn is_active(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "active"
    )
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation (0 for fewer than two values).
pub fn pstdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartError;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("log.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_statistics() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(pstdev(&[5.0]), 0.0);
        assert_eq!(mean(&[0.0, 20.0, 40.0]), 20.0);
        assert_eq!(median(&[40.0, 0.0, 20.0]), 20.0);
        assert_eq!(median(&[0.0, 20.0, 40.0, 10.0]), 15.0);
        assert_eq!(pstdev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
    }

    #[test]
    fn test_is_active() {
        for value in ["true", "True", "1", "yes", " active "] {
            assert!(is_active(value), "{value}");
        }
        for value in ["false", "0", "", "no"] {
            assert!(!is_active(value), "{value}");
        }
    }

    #[test]
    fn test_summarize() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "round_index,result,payout,base_payout,balance_after,power_active\n\
             0,lose,0,0,990,false\n\
             1,win,20,20,1000,false\n\
             2,win,40,20,1030,true\n\
             3,lose,0,0,1020,true\n",
        );
        let summary = summarize(&path).unwrap();
        assert_eq!(summary.rounds, 4);
        assert_eq!(summary.avg_payout, 15.0);
        assert_eq!(summary.median_payout, 10.0);
        assert_eq!(summary.power_activation_pct, 50.0);
        assert!((summary.stdev_payout - 275.0f64.sqrt()).abs() < 1e-12);

        let distributions = load(&path).unwrap();
        assert_eq!(distributions.outcomes["win"], 2);
        assert_eq!(distributions.outcomes["lose"], 2);
        assert_eq!(distributions.balances, vec![990.0, 1000.0, 1030.0, 1020.0]);
    }

    #[test]
    fn test_tolerates_missing_and_bad_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "payout,balance_after\n20,abc\noops\n10,5,extra\n");
        let distributions = load(&path).unwrap();
        assert_eq!(distributions.payouts, vec![20.0, 0.0, 10.0]);
        assert_eq!(distributions.balances, vec![0.0, 0.0, 5.0]);
        assert_eq!(distributions.outcomes["unknown"], 3);
        assert_eq!(distributions.summary().power_activation_pct, 0.0);
    }

    #[test]
    fn test_invalid_utf8_cell_counts_as_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        fs::write(&path, b"payout,balance_after\n20,990\n\xff\xfe,1000\n").unwrap();
        let distributions = load(&path).unwrap();
        assert_eq!(distributions.payouts, vec![20.0, 0.0]);
        assert_eq!(distributions.balances, vec![990.0, 1000.0]);
        assert_eq!(summarize(&path).unwrap().rounds, 2);
    }

    #[test]
    fn test_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "round_index,result,payout\n");
        let summary = summarize(&path).unwrap();
        assert_eq!(summary.rounds, 0);
        assert_eq!(summary.avg_payout, 0.0);
        assert_eq!(summary.power_activation_pct, 0.0);
    }

    #[test]
    fn test_not_found() {
        let dir = TempDir::new().unwrap();
        let err = summarize(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, AnalyticsError::NotFound { .. }));
    }

    struct Failing(Cell<u32>);

    impl ChartRenderer for Failing {
        fn render(&self, _data: &ChartData<'_>, _prefix: &str) -> Result<Vec<PathBuf>, ChartError> {
            self.0.set(self.0.get() + 1);
            Err(ChartError::Io {
                path: PathBuf::from("chart"),
                source: std::io::Error::other("no backend"),
            })
        }
    }

    #[test]
    fn test_renderer_failure_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "result,payout\nwin,20\n");
        let renderer = Failing(Cell::new(0));
        let summary = analyze(&path, Some(&renderer as &dyn ChartRenderer), "unused").unwrap();
        assert_eq!(summary.rounds, 1);
        assert_eq!(renderer.0.get(), 1);

        let summary = analyze(&path, None, "unused").unwrap();
        assert_eq!(summary.avg_payout, 20.0);

        // Nothing to chart in an empty log.
        let empty = write_csv(&dir, "result,payout\n");
        analyze(&empty, Some(&renderer as &dyn ChartRenderer), "unused").unwrap();
        assert_eq!(renderer.0.get(), 1);
    }
}
