//! Folding one field observation into a scope

use std::collections::BTreeMap;

use super::classify::{TypeSignature, classify};
use super::error::AnalyzeError;
use super::types::{StatsTree, TypeKind, TypeStats, array_label};
use super::value::RawValue;
use super::walker::Walker;

impl Walker<'_> {
    /// Record that `name` held `value` in `scope`
    ///
    /// An existing observation with the same signature is incremented and,
    /// for containers, its nested statistics are merged with the value's
    /// contents. Otherwise a new observation is appended.
    pub(crate) fn observe<V: RawValue>(
        &mut self,
        scope: &mut StatsTree,
        name: &str,
        value: &V,
    ) -> Result<(), AnalyzeError> {
        let (observations, created) = scope.field_mut(name);
        if created {
            self.state.note_name(name);
        }

        let signature = classify(value).map_err(|e| e.within(name))?;

        let result = match observations
            .iter_mut()
            .find(|stats| stats.kind.signature() == signature)
        {
            Some(stats) => {
                stats.count += 1;
                self.fold_contents(stats, value)
            }
            None => {
                let mut stats = TypeStats::new(empty_kind(signature));
                let result = self.fold_contents(&mut stats, value);
                self.state.note_type_label(&stats.display());
                observations.push(stats);
                result
            }
        };

        result.map_err(|e| e.within(name))
    }

    /// Merge a container value's contents into the observation's nested stats
    fn fold_contents<V: RawValue>(
        &mut self,
        stats: &mut TypeStats,
        value: &V,
    ) -> Result<(), AnalyzeError> {
        match &mut stats.kind {
            TypeKind::Document { props } => self.walk_document(value, props),
            TypeKind::Array { items, item_props } => {
                let result = self.aggregate_array(items, item_props, value);
                // The label grows with every new member type.
                self.state.note_type_label(&array_label(items));
                result
            }
            TypeKind::Scalar(_) | TypeKind::Binary { .. } => Ok(()),
        }
    }
}

fn empty_kind(signature: TypeSignature) -> TypeKind {
    match signature {
        TypeSignature::Scalar(element_type) => TypeKind::Scalar(element_type),
        TypeSignature::Document => TypeKind::Document {
            props: StatsTree::new(),
        },
        TypeSignature::Array => TypeKind::Array {
            items: BTreeMap::new(),
            item_props: None,
        },
        TypeSignature::Binary(subtype) => TypeKind::Binary { subtype },
    }
}
