//! Recursive descent over nested documents
//!
//! Depth is the only traversal state. Every call to [`Walker::walk_document`]
//! raises it by one for the duration of the call and restores it on every
//! exit path, so a record always leaves the run state at the depth it found
//! it.

use tracing::trace;

use super::error::AnalyzeError;
use super::types::{RunState, StatsTree};
use super::value::{ElementType, RawValue};

/// Traversal driver; borrows the run state for the duration of one record
pub(crate) struct Walker<'a> {
    pub(super) state: &'a mut RunState,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(state: &'a mut RunState) -> Self {
        Self { state }
    }

    /// Fold the fields of `document` into `scope`, one level below the current depth
    pub(crate) fn walk_document<V: RawValue>(
        &mut self,
        document: &V,
        scope: &mut StatsTree,
    ) -> Result<(), AnalyzeError> {
        self.state.current_depth += 1;
        let result = self.walk_fields(document, scope);
        self.state.current_depth -= 1;
        result
    }

    fn walk_fields<V: RawValue>(
        &mut self,
        document: &V,
        scope: &mut StatsTree,
    ) -> Result<(), AnalyzeError> {
        let depth = self.state.current_depth;
        self.state.max_depth_seen = self.state.max_depth_seen.max(depth);

        if self.state.beyond_limit(depth) {
            trace!(depth, "Depth cutoff reached, skipping field statistics");
            self.probe_document(document, depth);
            return Ok(());
        }

        let fields = document.document_fields().ok_or_else(|| {
            AnalyzeError::invalid(
                ElementType::EmbeddedDocument.name(),
                "its fields cannot be decoded",
            )
        })?;

        for (name, value) in fields {
            self.observe(scope, name, value)?;
        }

        Ok(())
    }

    /// Measure nesting below the cutoff without recording statistics
    ///
    /// Payloads that fail to decode end the probe for that branch; they are
    /// not reported since no statistics are gathered at this depth.
    fn probe_document<V: RawValue>(&mut self, document: &V, depth: usize) {
        let Some(fields) = document.document_fields() else {
            return;
        };
        for (_, value) in fields {
            self.probe_value(value, depth);
        }
    }

    fn probe_value<V: RawValue>(&mut self, value: &V, depth: usize) {
        match value.element_type() {
            ElementType::EmbeddedDocument => {
                self.state.max_depth_seen = self.state.max_depth_seen.max(depth + 1);
                self.probe_document(value, depth + 1);
            }
            // Nested arrays are not descended, as when gathering statistics.
            ElementType::Array => {
                for item in value.array_items().unwrap_or_default() {
                    if item.element_type() == ElementType::EmbeddedDocument {
                        self.probe_value(item, depth);
                    }
                }
            }
            _ => {}
        }
    }
}
