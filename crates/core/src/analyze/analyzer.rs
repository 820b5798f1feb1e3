//! Analysis driver

use serde::Serialize;
use tracing::{debug, info, warn};

use super::config::AnalyzeConfig;
use super::error::AnalyzeError;
use super::types::{RunState, StatsTree};
use super::value::{ElementType, RawValue};
use super::walker::Walker;
use crate::source::RecordSource;

/// Document analysis engine
///
/// Folds records into a [`StatsTree`] one at a time. An analyzer is meant for
/// a single run; create a new one per analysis.
pub struct Analyzer {
    config: AnalyzeConfig,
    stats: StatsTree,
    state: RunState,
}

/// Result of an analysis run
///
/// `stats` and `state` are always usable. When `error` is set the run ended
/// early and the statistics cover only the records read before the failure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub stats: StatsTree,
    pub state: RunState,
    #[serde(skip)]
    pub error: Option<AnalyzeError>,
}

impl AnalysisReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Split into results and error, discarding partial results on failure
    pub fn into_result(self) -> Result<(StatsTree, RunState), AnalyzeError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok((self.stats, self.state)),
        }
    }
}

impl Analyzer {
    /// Create a new analyzer with default configuration
    pub fn new() -> Self {
        Self::with_config(AnalyzeConfig::default())
    }

    /// Create a new analyzer with custom configuration
    pub fn with_config(config: AnalyzeConfig) -> Self {
        let state = RunState::new(config.max_depth);
        Self {
            config,
            stats: StatsTree::new(),
            state,
        }
    }

    /// Fold a single record into the statistics
    ///
    /// On error the record's fields observed before the failure remain
    /// counted and the record still counts towards the total.
    pub fn add_record<V: RawValue>(&mut self, record: &V) -> Result<(), AnalyzeError> {
        self.state.total_records += 1;

        let result = match record.element_type() {
            ElementType::EmbeddedDocument => {
                Walker::new(&mut self.state).walk_document(record, &mut self.stats)
            }
            other => Err(AnalyzeError::invalid(
                other.name(),
                "a record must be an embedded document",
            )),
        }
        .map_err(|e| e.within("$"));

        if let Err(ref error) = result {
            self.state.invalid_records += 1;
            warn!(record = self.state.total_records, %error, "Skipping invalid record");
        }

        result
    }

    /// Pull every record from `source`
    pub fn run<S: RecordSource + ?Sized>(&mut self, source: &mut S) -> Result<(), AnalyzeError> {
        self.run_with_progress(source, |_| {})
    }

    /// Pull every record from `source`, reporting the running record count
    ///
    /// Invalid records are skipped unless the configuration says to stop.
    /// A source error always ends the run.
    pub fn run_with_progress<S, F>(
        &mut self,
        source: &mut S,
        mut on_record: F,
    ) -> Result<(), AnalyzeError>
    where
        S: RecordSource + ?Sized,
        F: FnMut(u64),
    {
        debug!(
            max_depth = ?self.config.max_depth,
            sample_size = self.config.sample_size,
            estimated = ?source.estimated_count(),
            "Starting analysis"
        );

        let result = self.pull_records(source, &mut on_record);

        info!(
            records = self.state.total_records,
            invalid = self.state.invalid_records,
            fields = self.stats.len(),
            max_depth = self.state.max_depth_seen,
            complete = result.is_ok(),
            "Analysis complete"
        );

        result
    }

    fn pull_records<S, F>(&mut self, source: &mut S, on_record: &mut F) -> Result<(), AnalyzeError>
    where
        S: RecordSource + ?Sized,
        F: FnMut(u64),
    {
        while !self.config.sample_exhausted(self.state.total_records) {
            let Some(next) = source.next_record() else {
                break;
            };
            let record = next?;

            let added = self.add_record(&record);
            on_record(self.state.total_records);
            if self.config.stop_on_invalid {
                added?;
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> &StatsTree {
        &self.stats
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Get the number of records processed
    pub fn record_count(&self) -> u64 {
        self.state.total_records
    }

    /// Finish the run and hand out its results
    pub fn finish(self, error: Option<AnalyzeError>) -> AnalysisReport {
        AnalysisReport {
            stats: self.stats,
            state: self.state,
            error,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze every record of `source`, gathering statistics down to `max_depth`
pub fn analyze<S: RecordSource + ?Sized>(
    source: &mut S,
    max_depth: Option<usize>,
) -> AnalysisReport {
    let config = AnalyzeConfig {
        max_depth,
        ..AnalyzeConfig::default()
    };
    analyze_with_config(source, config)
}

/// Analyze `source` with a custom configuration
pub fn analyze_with_config<S: RecordSource + ?Sized>(
    source: &mut S,
    config: AnalyzeConfig,
) -> AnalysisReport {
    let mut analyzer = Analyzer::with_config(config);
    let error = analyzer.run(source).err();
    analyzer.finish(error)
}
