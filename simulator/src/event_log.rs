//! Append-only round log, written as JSON lines and CSV side by side.
//!
//! Every appended event becomes one JSON object per line in the JSON file and
//! one row in the CSV file. The CSV column set is fixed by the first event
//! appended through this handle: later events that lack a column get an empty
//! cell, and keys that first appear in later events are dropped from the CSV
//! (they are still present in the JSON lines). Both files are flushed after
//! every append, so an interrupted run leaves a readable prefix of rounds.

use powerspin_execution::RoundSink;
use powerspin_types::event::RoundEvent;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::warn;

/// A flat key/value record as stored in the log, keys in insertion order.
pub type Record = Map<String, Value>;

const TIMESTAMP_KEY: &str = "timestamp";

#[derive(Debug, ThisError)]
pub enum LogError {
    #[error("failed to {action} {path}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write csv row to {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to encode event")]
    Encode(#[from] serde_json::Error),
    #[error("event must serialize to a key/value object")]
    NotAnObject,
}

fn io_error<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> LogError + 'a {
    move |source| LogError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}

/// Current UTC time in ISO-8601 with microseconds.
pub fn utc_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

pub struct EventLog {
    json_path: PathBuf,
    csv_path: PathBuf,
    json: File,
    csv: csv::Writer<File>,
    columns: Option<Vec<String>>,
    clock: fn() -> String,
}

impl EventLog {
    /// Open a log. When `append` is false, existing files are removed first.
    pub fn open(
        json_path: impl Into<PathBuf>,
        csv_path: impl Into<PathBuf>,
        append: bool,
    ) -> Result<Self, LogError> {
        let json_path = json_path.into();
        let csv_path = csv_path.into();
        if !append {
            remove_if_exists(&json_path)?;
            remove_if_exists(&csv_path)?;
        }

        let json = open_append(&json_path)?;
        let csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(open_append(&csv_path)?);

        Ok(Self {
            json_path,
            csv_path,
            json,
            csv,
            columns: None,
            clock: utc_timestamp,
        })
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// CSV columns, once the first event has been appended.
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Append any event that serializes to a flat object.
    pub fn append<T: Serialize>(&mut self, event: &T) -> Result<(), LogError> {
        match serde_json::to_value(event)? {
            Value::Object(record) => self.append_record(record),
            _ => Err(LogError::NotAnObject),
        }
    }

    pub fn append_record(&mut self, mut record: Record) -> Result<(), LogError> {
        if record.get(TIMESTAMP_KEY).map_or(true, Value::is_null) {
            record.insert(TIMESTAMP_KEY.to_string(), Value::String((self.clock)()));
        }

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        self.json
            .write_all(line.as_bytes())
            .and_then(|_| self.json.flush())
            .map_err(io_error("append to", &self.json_path))?;

        let write_header = self.columns.is_none() && is_empty(&self.csv_path)?;
        let columns = self
            .columns
            .get_or_insert_with(|| record.keys().cloned().collect());
        let csv_err = |source| LogError::Csv {
            path: self.csv_path.clone(),
            source,
        };
        if write_header {
            self.csv.write_record(columns.iter()).map_err(csv_err)?;
        }
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(cell).unwrap_or_default())
            .collect();
        self.csv.write_record(&row).map_err(csv_err)?;
        self.csv
            .flush()
            .map_err(io_error("flush", &self.csv_path))?;
        Ok(())
    }

    /// Read every record from the JSON-lines file. Corrupt lines are skipped.
    pub fn read_back(&self) -> Result<Vec<Record>, LogError> {
        read_records(&self.json_path)
    }

    /// Read every record that decodes as a [`RoundEvent`].
    pub fn read_events(&self) -> Result<Vec<RoundEvent>, LogError> {
        Ok(self
            .read_back()?
            .into_iter()
            .filter_map(|record| {
                match serde_json::from_value::<RoundEvent>(Value::Object(record)) {
                    Ok(event) => Some(event),
                    Err(err) => {
                        warn!(?err, "skipping record that is not a round event");
                        None
                    }
                }
            })
            .collect())
    }
}

impl RoundSink for EventLog {
    fn record(&mut self, event: RoundEvent) -> anyhow::Result<()> {
        self.append(&event)?;
        Ok(())
    }
}

/// Read records from a JSON-lines file. A missing file reads as empty.
pub fn read_records(path: &Path) -> Result<Vec<Record>, LogError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(io_error("open", path)(err)),
    };

    let mut records = Vec::new();
    // Split on raw bytes so a line that is not UTF-8 is skipped like any other.
    for (index, line) in BufReader::new(file).split(b'\n').enumerate() {
        let line = line.map_err(io_error("read", path))?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<Value>(&line) {
            Ok(Value::Object(record)) => records.push(record),
            Ok(_) => warn!(line = index + 1, "skipping non-object log line"),
            Err(err) => warn!(line = index + 1, %err, "skipping corrupt log line"),
        }
    }
    Ok(records)
}

/// Text of a CSV cell for a JSON value.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn open_append(path: &Path) -> Result<File, LogError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error("open", path))
}

fn remove_if_exists(path: &Path) -> Result<(), LogError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_error("remove", path)(err)),
    }
}

fn is_empty(path: &Path) -> Result<bool, LogError> {
    let metadata = fs::metadata(path).map_err(io_error("stat", path))?;
    Ok(metadata.len() == 0)
}
