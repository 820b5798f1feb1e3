//! Value classification

use super::error::AnalyzeError;
use super::types::{TypeKind, binary_label};
use super::value::{ElementType, RawValue};

/// Identity of an observation within one field's list
///
/// Documents and arrays are singletons per field; binaries are keyed by
/// subtype; every other kind by its element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    Scalar(ElementType),
    Document,
    Array,
    Binary(u8),
}

impl TypeSignature {
    /// Label used when tallying array members
    pub fn label(&self) -> String {
        match self {
            TypeSignature::Scalar(element_type) => element_type.name().to_string(),
            TypeSignature::Document => ElementType::EmbeddedDocument.name().to_string(),
            TypeSignature::Array => ElementType::Array.name().to_string(),
            TypeSignature::Binary(subtype) => binary_label(*subtype),
        }
    }
}

impl TypeKind {
    /// Signature this observation deduplicates on
    pub fn signature(&self) -> TypeSignature {
        match self {
            TypeKind::Scalar(element_type) => TypeSignature::Scalar(*element_type),
            TypeKind::Document { .. } => TypeSignature::Document,
            TypeKind::Array { .. } => TypeSignature::Array,
            TypeKind::Binary { subtype } => TypeSignature::Binary(*subtype),
        }
    }
}

/// Classify a value into its type signature
///
/// Binary values must carry a decodable subtype; documents and arrays are
/// decoded later, when the analyzer descends into them.
pub fn classify<V: RawValue + ?Sized>(value: &V) -> Result<TypeSignature, AnalyzeError> {
    let signature = match value.element_type() {
        ElementType::EmbeddedDocument => TypeSignature::Document,
        ElementType::Array => TypeSignature::Array,
        ElementType::Binary => {
            let subtype = value
                .binary_subtype()
                .ok_or_else(|| AnalyzeError::invalid("binary", "its payload cannot be decoded"))?;
            TypeSignature::Binary(subtype)
        }
        other => TypeSignature::Scalar(other),
    };
    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_scalars() {
        assert_eq!(
            classify(&json!("text")).unwrap(),
            TypeSignature::Scalar(ElementType::String)
        );
        assert_eq!(
            classify(&json!(null)).unwrap(),
            TypeSignature::Scalar(ElementType::Null)
        );
        assert_eq!(
            classify(&json!(7)).unwrap(),
            TypeSignature::Scalar(ElementType::Int32)
        );
    }

    #[test]
    fn test_classify_containers() {
        assert_eq!(
            classify(&json!({"a": 1})).unwrap(),
            TypeSignature::Document
        );
        assert_eq!(classify(&json!([1, 2])).unwrap(), TypeSignature::Array);
    }

    #[test]
    fn test_classify_binary_labels() {
        let uuid = json!({"$binary": {"base64": "AQI=", "subType": "04"}});
        let sig = classify(&uuid).unwrap();
        assert_eq!(sig, TypeSignature::Binary(0x04));
        assert_eq!(sig.label(), "binary - UUID");

        let custom = json!({"$binary": {"base64": "AQI=", "subType": "ee"}});
        let sig = classify(&custom).unwrap();
        assert_eq!(sig, TypeSignature::Binary(0xEE));
        assert_eq!(sig.label(), "binary - Unknown");
    }

    #[test]
    fn test_classify_undecodable_binary() {
        let broken = json!({"$binary": {"base64": "not base64!", "subType": "00"}});
        let err = classify(&broken).unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::InvalidRecord { tag: "binary", .. }
        ));
    }

    #[test]
    fn test_signature_roundtrip_through_kind() {
        assert_eq!(
            TypeKind::Binary { subtype: 3 }.signature(),
            TypeSignature::Binary(3)
        );
        assert_eq!(
            TypeKind::Scalar(ElementType::Boolean).signature(),
            TypeSignature::Scalar(ElementType::Boolean)
        );
    }
}
