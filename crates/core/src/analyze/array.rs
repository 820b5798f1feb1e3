//! Array member aggregation
//!
//! Members are tallied by type label, and every member document is merged
//! into a single shared scope so that the union of member shapes appears as
//! one nested schema rather than one scope per index.

use std::collections::BTreeMap;

use super::classify::{TypeSignature, classify};
use super::error::AnalyzeError;
use super::types::StatsTree;
use super::value::{ElementType, RawValue};
use super::walker::Walker;

impl Walker<'_> {
    pub(crate) fn aggregate_array<V: RawValue>(
        &mut self,
        items: &mut BTreeMap<String, u64>,
        item_props: &mut Option<StatsTree>,
        array: &V,
    ) -> Result<(), AnalyzeError> {
        let members = array.array_items().ok_or_else(|| {
            AnalyzeError::invalid(ElementType::Array.name(), "its members cannot be decoded")
        })?;

        for member in members {
            let signature = classify(member).map_err(|e| e.within("[]"))?;
            *items.entry(signature.label()).or_insert(0) += 1;

            if signature == TypeSignature::Document {
                let props = item_props.get_or_insert_with(StatsTree::new);
                self.walk_document(member, props)
                    .map_err(|e| e.within("[]"))?;
            }
        }

        Ok(())
    }
}
