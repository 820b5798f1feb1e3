//! Tabular report writer

use std::io::Write;

use super::RenderError;
use crate::analyze::{RunState, StatsTree};

const TITLE: &str = "Document Analysis";
const MIN_COLUMN_WIDTH: usize = 20;
const COUNT_WIDTH: usize = 10;
const OCCURRENCE_WIDTH: usize = 15;
const INDENT: &str = " > ";

struct Layout {
    name_width: usize,
    type_width: usize,
}

impl Layout {
    fn new(stats: &StatsTree, state: &RunState) -> Self {
        let nesting = nesting_levels(stats).saturating_sub(1);
        Self {
            name_width: (state.max_name_len + INDENT.len() * nesting).max(MIN_COLUMN_WIDTH),
            type_width: state.max_type_len.max(MIN_COLUMN_WIDTH),
        }
    }

    fn separator(&self) -> String {
        // " name | type | count | occurrence"
        "-".repeat(1 + self.name_width + 3 + self.type_width + 3 + COUNT_WIDTH + 3 + OCCURRENCE_WIDTH)
    }
}

/// Number of scope levels that carry rows
fn nesting_levels(stats: &StatsTree) -> usize {
    if stats.is_empty() {
        return 0;
    }
    let deepest = stats
        .iter()
        .flat_map(|(_, observations)| observations.iter())
        .filter_map(|observation| observation.props())
        .map(nesting_levels)
        .max()
        .unwrap_or(0);
    deepest + 1
}

/// Write `stats` as a depth-indented table
pub fn write_table<W: Write>(
    out: &mut W,
    stats: &StatsTree,
    state: &RunState,
) -> Result<(), RenderError> {
    let layout = Layout::new(stats, state);

    writeln!(out, "{TITLE}")?;
    let header = format!(
        " {:<nw$} | {:<tw$} | {:<COUNT_WIDTH$} | Occurrence[%]",
        "Name",
        "Type",
        "Count",
        nw = layout.name_width,
        tw = layout.type_width,
    );
    writeln!(out, "{}", header.trim_end())?;
    writeln!(out, "{}", layout.separator())?;

    write_rows(out, stats, state, &layout, 0)?;

    writeln!(out, "{}", layout.separator())?;
    writeln!(out, "Total objects: {}", state.total_records)?;
    writeln!(out, "Max depth: {}", state.max_depth_seen)?;
    if state.invalid_records > 0 {
        writeln!(out, "Invalid objects: {}", state.invalid_records)?;
    }
    writeln!(out)?;

    Ok(())
}

fn write_rows<W: Write>(
    out: &mut W,
    stats: &StatsTree,
    state: &RunState,
    layout: &Layout,
    level: usize,
) -> Result<(), RenderError> {
    let prefix = format!(" {}", INDENT.repeat(level));
    let name_width = layout.name_width - INDENT.len() * level;

    for (name, observations) in stats.iter() {
        for observation in observations {
            let row = format!(
                "{prefix}{:<name_width$} | {:<tw$} | {:<COUNT_WIDTH$} | {:<OCCURRENCE_WIDTH$.2}",
                name,
                observation.display(),
                observation.count,
                state.occurrence(observation.count),
                tw = layout.type_width,
            );
            writeln!(out, "{}", row.trim_end())?;

            if let Some(props) = observation.props() {
                write_rows(out, props, state, layout, level + 1)?;
            }
        }
    }

    Ok(())
}

/// Render `stats` as a table into a string
pub fn render_table(stats: &StatsTree, state: &RunState) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    write_table(&mut buf, stats, state)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
