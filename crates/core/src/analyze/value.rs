//! Raw value capability consumed by the analyzer
//!
//! The analyzer never depends on a concrete document representation. Record
//! sources adapt their native values to [`RawValue`], which exposes a kind
//! tag plus typed accessors for the payloads the analyzer needs to descend
//! into (documents and arrays) or distinguish (binary subtypes).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Element kinds of the BSON type system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Double,
    String,
    EmbeddedDocument,
    Array,
    Binary,
    Undefined,
    ObjectId,
    Boolean,
    DateTime,
    Null,
    Regex,
    DbPointer,
    JavaScript,
    Symbol,
    CodeWithScope,
    Int32,
    Timestamp,
    Int64,
    Decimal128,
    MinKey,
    MaxKey,
}

impl ElementType {
    /// Human readable type name, as reported in analysis output
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Double => "double",
            ElementType::String => "string",
            ElementType::EmbeddedDocument => "embedded document",
            ElementType::Array => "array",
            ElementType::Binary => "binary",
            ElementType::Undefined => "undefined",
            ElementType::ObjectId => "objectID",
            ElementType::Boolean => "boolean",
            ElementType::DateTime => "UTC datetime",
            ElementType::Null => "null",
            ElementType::Regex => "regex",
            ElementType::DbPointer => "dbPointer",
            ElementType::JavaScript => "javascript",
            ElementType::Symbol => "symbol",
            ElementType::CodeWithScope => "code with scope",
            ElementType::Int32 => "32-bit integer",
            ElementType::Timestamp => "timestamp",
            ElementType::Int64 => "64-bit integer",
            ElementType::Decimal128 => "128-bit decimal",
            ElementType::MinKey => "min key",
            ElementType::MaxKey => "max key",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Known binary subtypes
const BINARY_SUBTYPES: &[(u8, &str)] = &[
    (0x00, "Generic binary subtype"),
    (0x01, "Function"),
    (0x02, "Binary (Old)"),
    (0x03, "UUID (Old)"),
    (0x04, "UUID"),
    (0x05, "MD5"),
    (0x06, "Encrypted BSON value"),
    (0x07, "Compressed BSON column"),
    (0x08, "Sensitive"),
    (0x09, "Vector"),
    (0x80, "User defined"),
];

/// Resolve a binary subtype byte to its name
///
/// Bytes without an entry in the subtype table resolve to `"Unknown"`.
pub fn binary_subtype_name(subtype: u8) -> &'static str {
    BINARY_SUBTYPES
        .iter()
        .find(|(code, _)| *code == subtype)
        .map(|(_, name)| *name)
        .unwrap_or("Unknown")
}

/// Narrow view over a source's native value type
///
/// Accessors return `None` when the payload does not decode according to the
/// value's [`ElementType`]; the analyzer reports that as an invalid record.
/// Accessors for a kind other than the value's own are never called.
pub trait RawValue {
    /// Kind tag of this value
    fn element_type(&self) -> ElementType;

    /// Fields of an embedded document, in their stored order
    fn document_fields(&self) -> Option<Vec<(&str, &Self)>>;

    /// Members of an array, in their stored order
    fn array_items(&self) -> Option<Vec<&Self>>;

    /// Subtype byte of a binary value
    fn binary_subtype(&self) -> Option<u8>;
}
