//! Record sources
//!
//! The analyzer pulls records one at a time from a [`RecordSource`]. This
//! module provides sources for JSON lines, whole JSON documents and in-memory
//! records, plus the Extended JSON adapter that lets `serde_json::Value`
//! express every BSON element kind.

mod extjson;

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::analyze::{RawValue, SourceError};

/// Sequential, pull-based supplier of records
pub trait RecordSource {
    type Record: RawValue;

    /// Next record, `None` once the source is exhausted
    fn next_record(&mut self) -> Option<Result<Self::Record, SourceError>>;

    /// Total number of records, when known up front
    fn estimated_count(&self) -> Option<u64> {
        None
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    type Record = S::Record;

    fn next_record(&mut self) -> Option<Result<Self::Record, SourceError>> {
        (**self).next_record()
    }

    fn estimated_count(&self) -> Option<u64> {
        (**self).estimated_count()
    }
}

/// Source backed by an iterator of results
pub struct IterSource<I> {
    iter: I,
    estimate: Option<u64>,
}

impl<I> IterSource<I> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            estimate: None,
        }
    }

    pub fn with_estimate(mut self, count: u64) -> Self {
        self.estimate = Some(count);
        self
    }
}

impl<I, V> RecordSource for IterSource<I>
where
    I: Iterator<Item = Result<V, SourceError>>,
    V: RawValue,
{
    type Record = V;

    fn next_record(&mut self) -> Option<Result<V, SourceError>> {
        self.iter.next()
    }

    fn estimated_count(&self) -> Option<u64> {
        self.estimate
    }
}

/// Source over records already in memory
pub fn from_records<V: RawValue>(records: Vec<V>) -> impl RecordSource<Record = V> {
    let count = records.len() as u64;
    IterSource::new(records.into_iter().map(Ok::<V, SourceError>)).with_estimate(count)
}

/// Newline-delimited JSON reader
///
/// Blank lines are skipped. Line numbers in parse errors are 1-based.
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line: usize,
    estimate: Option<u64>,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            estimate: None,
        }
    }

    pub fn with_estimate(mut self, count: u64) -> Self {
        self.estimate = Some(count);
        self
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a JSON lines file
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordSource for JsonLinesSource<R> {
    type Record = Value;

    fn next_record(&mut self) -> Option<Result<Value, SourceError>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str(trimmed).map_err(|e| SourceError::Parse {
                    line: self.line,
                    message: e.to_string(),
                }),
            );
        }
    }

    fn estimated_count(&self) -> Option<u64> {
        self.estimate
    }
}

/// Reader for a single JSON document
///
/// A top-level array yields its elements as records; any other value is one
/// record. The whole input is parsed up front, so the record count is exact.
pub struct JsonDocumentSource {
    records: std::vec::IntoIter<Value>,
}

impl JsonDocumentSource {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let value: Value = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                SourceError::Io(e.to_string())
            } else {
                SourceError::Parse {
                    line: e.line(),
                    message: e.to_string(),
                }
            }
        })?;

        let records = match value {
            Value::Array(items) => items,
            other => vec![other],
        };
        Ok(Self {
            records: records.into_iter(),
        })
    }

    /// Open and parse a JSON file
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl RecordSource for JsonDocumentSource {
    type Record = Value;

    fn next_record(&mut self) -> Option<Result<Value, SourceError>> {
        self.records.next().map(Ok)
    }

    fn estimated_count(&self) -> Option<u64> {
        Some(self.records.len() as u64)
    }
}

/// Supported input encodings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// One JSON value per line
    #[default]
    JsonLines,
    /// A single JSON value or an array of values
    Json,
}

impl InputFormat {
    /// Guess the format from a file extension, defaulting to JSON lines
    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension.to_lowercase().as_str() {
            "json" => InputFormat::Json,
            _ => InputFormat::JsonLines,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::JsonLines => write!(f, "jsonl"),
            InputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" | "ndjson" => Ok(InputFormat::JsonLines),
            "json" => Ok(InputFormat::Json),
            other => Err(format!("unknown input format '{other}' (expected jsonl or json)")),
        }
    }
}

/// Boxed source of Extended JSON records
pub type DynSource = Box<dyn RecordSource<Record = Value>>;

/// Open a file as a record source
///
/// `format` overrides detection by extension.
pub fn open_path(path: &Path, format: Option<InputFormat>) -> Result<DynSource, SourceError> {
    let format = format.unwrap_or_else(|| InputFormat::from_path(path));
    debug!(path = %path.display(), %format, "Opening record source");

    Ok(match format {
        InputFormat::JsonLines => Box::new(JsonLinesSource::open(path)?),
        InputFormat::Json => Box::new(JsonDocumentSource::open(path)?),
    })
}

/// Read records from standard input
pub fn open_stdin(format: InputFormat) -> Result<DynSource, SourceError> {
    debug!(%format, "Reading records from stdin");

    let stdin = io::stdin().lock();
    Ok(match format {
        InputFormat::JsonLines => Box::new(JsonLinesSource::new(stdin)),
        InputFormat::Json => Box::new(JsonDocumentSource::from_reader(stdin)?),
    })
}
