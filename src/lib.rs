//! Docstats SDK - Schema statistics for document collections
//!
//! Provides unified interfaces for:
//! - Analyzing streams of semi-structured records
//! - Reading JSON lines and JSON documents with Extended JSON values
//! - Rendering per-field type statistics as tables or JSON
//!
//! Everything is re-exported from `docstats-core`; enable the `progress`
//! feature for the terminal progress reporter.

pub use docstats_core::*;
