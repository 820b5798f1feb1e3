//! Docstats Core - Schema statistics for semi-structured documents
//!
//! Provides:
//! - The analysis engine (type classification, per-field statistics,
//!   array aggregation, depth-bounded recursion)
//! - Record sources for JSON lines and JSON documents with MongoDB
//!   Extended JSON values
//! - Table and JSON report writers
//! - Progress reporting (feature `progress`)

pub mod analyze;
#[cfg(feature = "progress")]
pub mod progress;
pub mod render;
pub mod source;

pub use analyze::{
    AnalysisReport, AnalyzeConfig, AnalyzeError, Analyzer, ElementType, RawValue, RunState,
    SourceError, StatsTree, TypeKind, TypeStats, analyze, analyze_with_config,
};
pub use render::{OutputFormat, RenderError};
pub use source::{InputFormat, RecordSource};
