//! Stats tree and run state produced by an analysis run

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::value::{ElementType, binary_subtype_name};

/// Per-scope statistics: field name -> observed types
///
/// Fields are kept in lexicographic (byte) order, so every consumer iterates
/// them sorted regardless of the order records presented them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatsTree {
    fields: BTreeMap<String, Vec<TypeStats>>,
}

impl StatsTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observations recorded for `field`
    ///
    /// Empty if the field was never seen, or if it is registered but its only
    /// value failed to classify. A field is registered before its value is
    /// classified, so such a field still appears in the JSON output as `[]`.
    pub fn observations(&self, field: &str) -> &[TypeStats] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterate fields in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TypeStats])> {
        self.fields
            .iter()
            .map(|(name, stats)| (name.as_str(), stats.as_slice()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sum of occurrence counts across every type observed for `field`
    pub fn field_count(&self, field: &str) -> u64 {
        self.observations(field).iter().map(|s| s.count).sum()
    }

    /// Observation list for `field`, and whether it was newly registered
    pub(crate) fn field_mut(&mut self, field: &str) -> (&mut Vec<TypeStats>, bool) {
        let created = !self.fields.contains_key(field);
        (self.fields.entry(field.to_string()).or_default(), created)
    }
}

/// Statistics for one distinct type observed under one field
#[derive(Debug, Clone, PartialEq)]
pub struct TypeStats {
    /// Number of values with this type signature
    pub count: u64,
    /// The observed type
    pub kind: TypeKind,
}

/// Observed type, with nested statistics for containers
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// A value without children
    Scalar(ElementType),
    /// An embedded document and the statistics of its fields
    Document { props: StatsTree },
    /// An array, its member type tallies and the union of its member documents
    Array {
        items: BTreeMap<String, u64>,
        item_props: Option<StatsTree>,
    },
    /// Binary data of one subtype
    Binary { subtype: u8 },
}

impl TypeStats {
    pub(crate) fn new(kind: TypeKind) -> Self {
        Self { count: 1, kind }
    }

    /// Base type name
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            TypeKind::Scalar(element_type) => element_type.name(),
            TypeKind::Document { .. } => ElementType::EmbeddedDocument.name(),
            TypeKind::Array { .. } => ElementType::Array.name(),
            TypeKind::Binary { .. } => ElementType::Binary.name(),
        }
    }

    /// Label shown to users, e.g. `binary - UUID` or `array[string]`
    pub fn display(&self) -> String {
        match &self.kind {
            TypeKind::Binary { subtype } => binary_label(*subtype),
            TypeKind::Array { items, .. } => array_label(items),
            _ => self.type_name().to_string(),
        }
    }

    /// Nested scope: document fields, or the union of array member documents
    pub fn props(&self) -> Option<&StatsTree> {
        match &self.kind {
            TypeKind::Document { props } => Some(props),
            TypeKind::Array { item_props, .. } => item_props.as_ref(),
            _ => None,
        }
    }

    /// Member type tallies of an array observation
    pub fn items(&self) -> Option<&BTreeMap<String, u64>> {
        match &self.kind {
            TypeKind::Array { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Subtype name of a binary observation
    pub fn subtype_name(&self) -> Option<&'static str> {
        match &self.kind {
            TypeKind::Binary { subtype } => Some(binary_subtype_name(*subtype)),
            _ => None,
        }
    }
}

pub(crate) fn binary_label(subtype: u8) -> String {
    format!("{} - {}", ElementType::Binary.name(), binary_subtype_name(subtype))
}

pub(crate) fn array_label(items: &BTreeMap<String, u64>) -> String {
    if items.is_empty() {
        return ElementType::Array.name().to_string();
    }
    let labels: Vec<&str> = items.keys().map(String::as_str).collect();
    format!("{}[{}]", ElementType::Array.name(), labels.join(", "))
}

impl Serialize for TypeStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Type", self.type_name())?;
        map.serialize_entry("Count", &self.count)?;
        if let Some(props) = self.props() {
            map.serialize_entry("Props", props)?;
        }
        if let Some(items) = self.items() {
            map.serialize_entry("Items", items)?;
        }
        if let Some(subtype) = self.subtype_name() {
            map.serialize_entry("Subtype", subtype)?;
        }
        map.end()
    }
}

/// Run-wide counters threaded through the traversal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    /// Depth of the scope being analyzed (0 between records)
    pub current_depth: usize,
    /// Deepest nesting level observed in the input
    pub max_depth_seen: usize,
    /// Deepest scope that gathers field statistics
    pub depth_limit: Option<usize>,
    /// Length of the longest field name seen
    pub max_name_len: usize,
    /// Length of the longest type label seen
    pub max_type_len: usize,
    /// Records pulled from the source, including invalid ones
    pub total_records: u64,
    /// Records that failed with an invalid value
    pub invalid_records: u64,
}

impl RunState {
    pub fn new(depth_limit: Option<usize>) -> Self {
        Self {
            depth_limit,
            ..Self::default()
        }
    }

    /// Whether scopes at `depth` are beyond the configured cutoff
    pub fn beyond_limit(&self, depth: usize) -> bool {
        self.depth_limit.is_some_and(|limit| depth > limit)
    }

    pub(crate) fn note_name(&mut self, name: &str) {
        self.max_name_len = self.max_name_len.max(name.chars().count());
    }

    pub(crate) fn note_type_label(&mut self, label: &str) {
        self.max_type_len = self.max_type_len.max(label.chars().count());
    }

    /// Percentage of all records represented by `count`
    pub fn occurrence(&self, count: u64) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            count as f64 / self.total_records as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array_stats(labels: &[(&str, u64)]) -> TypeStats {
        TypeStats::new(TypeKind::Array {
            items: labels
                .iter()
                .map(|(label, count)| (label.to_string(), *count))
                .collect(),
            item_props: None,
        })
    }

    #[test]
    fn test_array_display_sorted_keys() {
        let stats = array_stats(&[("zeta", 1), ("alpha", 2), ("gamma", 3)]);
        assert_eq!(stats.display(), "array[alpha, gamma, zeta]");
    }

    #[test]
    fn test_array_display_empty() {
        let stats = array_stats(&[]);
        assert_eq!(stats.display(), "array");
    }

    #[test]
    fn test_binary_display() {
        let uuid = TypeStats::new(TypeKind::Binary { subtype: 0x04 });
        assert_eq!(uuid.display(), "binary - UUID");
        assert_eq!(uuid.type_name(), "binary");
        assert_eq!(uuid.subtype_name(), Some("UUID"));

        let unknown = TypeStats::new(TypeKind::Binary { subtype: 0xEE });
        assert_eq!(unknown.display(), "binary - Unknown");
    }

    #[test]
    fn test_scalar_has_no_children() {
        let stats = TypeStats::new(TypeKind::Scalar(ElementType::Int64));
        assert_eq!(stats.display(), "64-bit integer");
        assert!(stats.props().is_none());
        assert!(stats.items().is_none());
        assert!(stats.subtype_name().is_none());
    }

    #[test]
    fn test_field_mut_registers_once() {
        let mut tree = StatsTree::new();
        let (list, created) = tree.field_mut("name");
        assert!(created);
        list.push(TypeStats::new(TypeKind::Scalar(ElementType::String)));

        let (list, created) = tree.field_mut("name");
        assert!(!created);
        assert_eq!(list.len(), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_tree_iterates_sorted() {
        let mut tree = StatsTree::new();
        for name in ["zulu", "alpha", "Mike", "_id"] {
            tree.field_mut(name);
        }
        let names: Vec<&str> = tree.field_names().collect();
        assert_eq!(names, vec!["Mike", "_id", "alpha", "zulu"]);
    }

    #[test]
    fn test_serialize_shape() {
        let mut props = StatsTree::new();
        props
            .field_mut("c")
            .0
            .push(TypeStats::new(TypeKind::Scalar(ElementType::Int32)));

        let mut tree = StatsTree::new();
        tree.field_mut("b")
            .0
            .push(TypeStats::new(TypeKind::Document { props }));
        tree.field_mut("blob")
            .0
            .push(TypeStats::new(TypeKind::Binary { subtype: 0x05 }));

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["b"][0]["Type"], "embedded document");
        assert_eq!(json["b"][0]["Count"], 1);
        assert_eq!(json["b"][0]["Props"]["c"][0]["Type"], "32-bit integer");
        assert_eq!(json["blob"][0]["Subtype"], "MD5");
        assert!(json["blob"][0].get("Props").is_none());
    }

    #[test]
    fn test_occurrence() {
        let mut state = RunState::new(None);
        assert_eq!(state.occurrence(5), 0.0);
        state.total_records = 4;
        assert_eq!(state.occurrence(1), 25.0);
    }

    #[test]
    fn test_beyond_limit() {
        assert!(!RunState::new(None).beyond_limit(100));
        let state = RunState::new(Some(2));
        assert!(!state.beyond_limit(2));
        assert!(state.beyond_limit(3));
    }
}
