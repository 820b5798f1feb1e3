//! Structured JSON report writer

use std::io::Write;

use serde::Serialize;

use super::RenderError;
use crate::analyze::{RunState, StatsTree};

/// Stats tree together with the run totals
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    total_objects: u64,
    max_depth: usize,
    #[serde(skip_serializing_if = "is_zero")]
    invalid_objects: u64,
    stats: &'a StatsTree,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

/// Write `stats` as pretty-printed JSON keyed by field name
pub fn write_json<W: Write>(out: &mut W, stats: &StatsTree) -> Result<(), RenderError> {
    serde_json::to_writer_pretty(&mut *out, stats)?;
    writeln!(out)?;
    Ok(())
}

/// Write `stats` wrapped in an object that also carries the run totals
pub fn write_json_envelope<W: Write>(
    out: &mut W,
    stats: &StatsTree,
    state: &RunState,
) -> Result<(), RenderError> {
    let envelope = Envelope {
        total_objects: state.total_records,
        max_depth: state.max_depth_seen,
        invalid_objects: state.invalid_records,
        stats,
    };
    serde_json::to_writer_pretty(&mut *out, &envelope)?;
    writeln!(out)?;
    Ok(())
}

/// Render `stats` as a JSON string
pub fn render_json(stats: &StatsTree) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(stats)?)
}
