//! Document analysis engine
//!
//! This module walks a stream of semi-structured records and builds a
//! hierarchical summary of the types found under every field.
//!
//! ## Features
//!
//! - **Type taxonomy** - Every BSON element kind, with binary data split by subtype
//! - **Deduplication** - One observation per distinct type signature per field
//! - **Nested scopes** - Embedded documents get their own statistics, recursively
//! - **Array aggregation** - Member type tallies plus the union of member documents
//! - **Depth cutoff** - Stop gathering field statistics below a configured depth
//!
//! ## Example
//!
//! ```rust,ignore
//! use docstats_core::analyze::{Analyzer, AnalyzeConfig};
//! use serde_json::json;
//!
//! let mut analyzer = Analyzer::with_config(AnalyzeConfig::builder().max_depth(3).build());
//!
//! analyzer.add_record(&json!({"name": "Alice", "tags": ["a", "b"]}))?;
//! analyzer.add_record(&json!({"name": "Bob", "address": {"city": "Berlin"}}))?;
//!
//! let report = analyzer.finish(None);
//! for (field, observations) in report.stats.iter() {
//!     println!("{field}: {}", observations[0].display());
//! }
//! ```

mod accumulate;
mod analyzer;
mod array;
mod classify;
mod config;
mod error;
mod types;
mod value;
mod walker;

pub use analyzer::{AnalysisReport, Analyzer, analyze, analyze_with_config};
pub use classify::{TypeSignature, classify};
pub use config::{AnalyzeConfig, AnalyzeConfigBuilder};
pub use error::{AnalyzeError, SourceError};
pub use types::{RunState, StatsTree, TypeKind, TypeStats};
pub use value::{ElementType, RawValue, binary_subtype_name};
