//! MongoDB Extended JSON adapter for `serde_json::Value`
//!
//! Plain JSON only has six kinds of values. Extended JSON encodes the
//! remaining BSON kinds as objects whose keys start with `$`, for example
//! `{"$oid": "..."}` or `{"$binary": {"base64": "...", "subType": "04"}}`.
//! Both the canonical and the relaxed forms are recognized. Objects that do
//! not match one of those shapes are embedded documents.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};

use crate::analyze::{ElementType, RawValue};

impl RawValue for Value {
    fn element_type(&self) -> ElementType {
        match self {
            Value::Null => ElementType::Null,
            Value::Bool(_) => ElementType::Boolean,
            Value::Number(n) => match n.as_i64() {
                Some(i) if i32::try_from(i).is_ok() => ElementType::Int32,
                Some(_) => ElementType::Int64,
                None if n.is_u64() => ElementType::Int64,
                None => ElementType::Double,
            },
            Value::String(_) => ElementType::String,
            Value::Array(_) => ElementType::Array,
            Value::Object(map) => wrapper_type(map).unwrap_or(ElementType::EmbeddedDocument),
        }
    }

    fn document_fields(&self) -> Option<Vec<(&str, &Self)>> {
        match self {
            Value::Object(map) if wrapper_type(map).is_none() => {
                Some(map.iter().map(|(k, v)| (k.as_str(), v)).collect())
            }
            _ => None,
        }
    }

    fn array_items(&self) -> Option<Vec<&Self>> {
        self.as_array().map(|items| items.iter().collect())
    }

    fn binary_subtype(&self) -> Option<u8> {
        let map = self.as_object()?;
        if let Some(uuid) = map.get("$uuid") {
            return uuid.as_str().filter(|s| is_uuid(s)).map(|_| 0x04);
        }
        match map.get("$binary")? {
            // Canonical: {"$binary": {"base64": "...", "subType": "xx"}}
            Value::Object(binary) => {
                decode_payload(binary.get("base64")?)?;
                parse_subtype(binary.get("subType")?)
            }
            // Legacy: {"$binary": "...", "$type": "xx"}
            payload @ Value::String(_) => {
                decode_payload(payload)?;
                parse_subtype(map.get("$type")?)
            }
            _ => None,
        }
    }
}

/// Element type of an Extended JSON wrapper object, if `map` is one
fn wrapper_type(map: &Map<String, Value>) -> Option<ElementType> {
    if !map.keys().next()?.starts_with('$') {
        return None;
    }

    let has = |key: &str| map.contains_key(key);
    let element_type = match map.len() {
        1 if has("$oid") => ElementType::ObjectId,
        1 if has("$date") => ElementType::DateTime,
        1 if has("$numberInt") => ElementType::Int32,
        1 if has("$numberLong") => ElementType::Int64,
        1 if has("$numberDouble") => ElementType::Double,
        1 if has("$numberDecimal") => ElementType::Decimal128,
        1 if has("$binary") || has("$uuid") => ElementType::Binary,
        1 if has("$regularExpression") => ElementType::Regex,
        1 if has("$timestamp") => ElementType::Timestamp,
        1 if has("$minKey") => ElementType::MinKey,
        1 if has("$maxKey") => ElementType::MaxKey,
        1 if has("$undefined") => ElementType::Undefined,
        1 if has("$symbol") => ElementType::Symbol,
        1 if has("$code") => ElementType::JavaScript,
        1 if has("$dbPointer") => ElementType::DbPointer,
        2 if has("$binary") && has("$type") => ElementType::Binary,
        2 if has("$regex") && has("$options") => ElementType::Regex,
        2 if has("$code") && has("$scope") => ElementType::CodeWithScope,
        _ => return None,
    };
    Some(element_type)
}

fn decode_payload(payload: &Value) -> Option<Vec<u8>> {
    STANDARD.decode(payload.as_str()?).ok()
}

fn parse_subtype(subtype: &Value) -> Option<u8> {
    let hex = subtype.as_str()?;
    if hex.is_empty() || hex.len() > 2 {
        return None;
    }
    u8::from_str_radix(hex, 16).ok()
}

fn is_uuid(s: &str) -> bool {
    let hex: String = s.chars().filter(|c| *c != '-').collect();
    s.len() == 36 && hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json_kinds() {
        assert_eq!(json!(null).element_type(), ElementType::Null);
        assert_eq!(json!(true).element_type(), ElementType::Boolean);
        assert_eq!(json!("s").element_type(), ElementType::String);
        assert_eq!(json!(42).element_type(), ElementType::Int32);
        assert_eq!(json!(-2147483648i64).element_type(), ElementType::Int32);
        assert_eq!(json!(4_294_967_296i64).element_type(), ElementType::Int64);
        assert_eq!(json!(u64::MAX).element_type(), ElementType::Int64);
        assert_eq!(json!(3.14).element_type(), ElementType::Double);
        assert_eq!(json!([]).element_type(), ElementType::Array);
        assert_eq!(json!({}).element_type(), ElementType::EmbeddedDocument);
    }

    #[test]
    fn test_extended_json_kinds() {
        let cases = vec![
            (json!({"$oid": "5f1d7f0e8c3b2a1d4e5f6a7b"}), ElementType::ObjectId),
            (json!({"$date": "2024-01-15T10:30:00Z"}), ElementType::DateTime),
            (json!({"$date": {"$numberLong": "1705314600000"}}), ElementType::DateTime),
            (json!({"$numberInt": "7"}), ElementType::Int32),
            (json!({"$numberLong": "4242"}), ElementType::Int64),
            (json!({"$numberDouble": "NaN"}), ElementType::Double),
            (json!({"$numberDecimal": "123.45"}), ElementType::Decimal128),
            (json!({"$regularExpression": {"pattern": "a", "options": "im"}}), ElementType::Regex),
            (json!({"$regex": "a", "$options": "i"}), ElementType::Regex),
            (json!({"$timestamp": {"t": 1, "i": 2}}), ElementType::Timestamp),
            (json!({"$minKey": 1}), ElementType::MinKey),
            (json!({"$maxKey": 1}), ElementType::MaxKey),
            (json!({"$undefined": true}), ElementType::Undefined),
            (json!({"$symbol": "sym"}), ElementType::Symbol),
            (json!({"$code": "var x = 1;"}), ElementType::JavaScript),
            (json!({"$code": "f()", "$scope": {"x": 1}}), ElementType::CodeWithScope),
            (
                json!({"$dbPointer": {"$ref": "db.coll", "$id": {"$oid": "5f1d7f0e8c3b2a1d4e5f6a7b"}}}),
                ElementType::DbPointer,
            ),
            (json!({"$binary": {"base64": "AQI=", "subType": "00"}}), ElementType::Binary),
            (json!({"$binary": "AQI=", "$type": "80"}), ElementType::Binary),
            (json!({"$uuid": "550e8400-e29b-41d4-a716-446655440000"}), ElementType::Binary),
        ];

        for (value, expected) in cases {
            assert_eq!(value.element_type(), expected, "value: {value}");
        }
    }

    #[test]
    fn test_dollar_keys_that_are_not_wrappers() {
        // Unknown operators and extra keys are ordinary documents.
        assert_eq!(
            json!({"$set": {"a": 1}}).element_type(),
            ElementType::EmbeddedDocument
        );
        assert_eq!(
            json!({"$oid": "x", "other": 1}).element_type(),
            ElementType::EmbeddedDocument
        );
    }

    #[test]
    fn test_binary_subtypes() {
        let canonical = json!({"$binary": {"base64": "AQI=", "subType": "04"}});
        assert_eq!(canonical.binary_subtype(), Some(0x04));

        let single_digit = json!({"$binary": {"base64": "AQI=", "subType": "5"}});
        assert_eq!(single_digit.binary_subtype(), Some(0x05));

        let legacy = json!({"$binary": "AQI=", "$type": "80"});
        assert_eq!(legacy.binary_subtype(), Some(0x80));

        let uuid = json!({"$uuid": "550e8400-e29b-41d4-a716-446655440000"});
        assert_eq!(uuid.binary_subtype(), Some(0x04));
    }

    #[test]
    fn test_undecodable_binary() {
        let bad_base64 = json!({"$binary": {"base64": "@@@", "subType": "00"}});
        assert_eq!(bad_base64.binary_subtype(), None);

        let bad_subtype = json!({"$binary": {"base64": "AQI=", "subType": "zz"}});
        assert_eq!(bad_subtype.binary_subtype(), None);

        let long_subtype = json!({"$binary": {"base64": "AQI=", "subType": "100"}});
        assert_eq!(long_subtype.binary_subtype(), None);

        let missing_subtype = json!({"$binary": {"base64": "AQI="}});
        assert_eq!(missing_subtype.binary_subtype(), None);

        let bad_uuid = json!({"$uuid": "not-a-uuid"});
        assert_eq!(bad_uuid.binary_subtype(), None);
    }

    #[test]
    fn test_document_fields() {
        let doc = json!({"b": {"c": 2}, "a": 1, "c": null});
        let fields = doc.document_fields().unwrap();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);

        assert!(json!({"$oid": "5f1d7f0e8c3b2a1d4e5f6a7b"}).document_fields().is_none());
        assert!(json!([1]).document_fields().is_none());
    }

    #[test]
    fn test_parsed_fields_keep_input_order() {
        let doc: Value = serde_json::from_str(r#"{"z": 1, "m": 2, "a": 3}"#).unwrap();
        let names: Vec<&str> = doc
            .document_fields()
            .unwrap()
            .iter()
            .map(|(name, _)| *name)
            .collect();
        assert_eq!(names, vec!["z", "m", "a"]);
    }

    #[test]
    fn test_array_items() {
        let array = json!([1, "two", null]);
        assert_eq!(array.array_items().unwrap().len(), 3);
        assert!(json!({"a": 1}).array_items().is_none());
    }
}
