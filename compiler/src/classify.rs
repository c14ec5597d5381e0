use crate::types::TypeExpr;
use crate::utils::quote;
use fieldwire_schema::{Cardinality, ClassifiedType, ScalarKind};

/// The protobuf-representable scalar universe, keyed by schema type name.
pub const SCALAR_TYPES: [(&str, ScalarKind); 9] = [
    ("int32", ScalarKind::Int32),
    ("uint32", ScalarKind::UInt32),
    ("int64", ScalarKind::Int64),
    ("uint64", ScalarKind::UInt64),
    ("bool", ScalarKind::Bool),
    ("float", ScalarKind::Float),
    ("double", ScalarKind::Double),
    ("string", ScalarKind::String),
    ("bytes", ScalarKind::Bytes),
];

/// Why a declared type failed classification. Carried back to the pipeline,
/// which anchors it at the field and keeps processing siblings.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeFault {
    /// The type is outside the representable universe.
    Unavailable(String),
    /// The map key type is not in the restricted key set. Anchored at the
    /// key, and names the key type.
    InvalidMapKey(String),
}

impl TypeFault {
    pub fn message(&self, field_name: &str) -> String {
        match self {
            TypeFault::Unavailable(ty) => format!(
                "The type {} of field {} is not available in the protobuf type universe",
                quote(ty),
                quote(field_name)
            ),
            TypeFault::InvalidMapKey(ty) => format!(
                "The type {} cannot be used as a map key for field {}",
                quote(ty),
                quote(field_name)
            ),
        }
    }
}

fn resolve_scalar(name: &str) -> Option<ScalarKind> {
    SCALAR_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, kind)| *kind)
}

fn resolve_element(ty: &TypeExpr) -> Result<ScalarKind, TypeFault> {
    match ty {
        TypeExpr::Name(name) => {
            resolve_scalar(name).ok_or_else(|| TypeFault::Unavailable(name.clone()))
        }
        other => Err(TypeFault::Unavailable(other.to_string())),
    }
}

/// Decide whether a declared type is representable. Strips at most one
/// layer of `optional`; collections nest scalars only; map keys come from
/// the restricted key set.
pub fn classify(declared: &TypeExpr) -> Result<ClassifiedType, TypeFault> {
    let (optional, inner) = match declared {
        TypeExpr::Optional(inner) => (true, &**inner),
        other => (false, other),
    };

    let cardinality = match inner {
        // optional-of-optional never parses from the schema syntax, but the
        // type model can express it, so reject it here.
        TypeExpr::Optional(_) => return Err(TypeFault::Unavailable(inner.to_string())),
        TypeExpr::Name(name) => Cardinality::Singular(
            resolve_scalar(name).ok_or_else(|| TypeFault::Unavailable(name.clone()))?,
        ),
        TypeExpr::Repeated(element) => Cardinality::Repeated(resolve_element(element)?),
        TypeExpr::Map(key, value) => {
            let key_kind = match &**key {
                TypeExpr::Name(name) => resolve_scalar(name)
                    .ok_or_else(|| TypeFault::InvalidMapKey(name.clone()))?,
                other => return Err(TypeFault::InvalidMapKey(other.to_string())),
            };
            if !key_kind.valid_map_key() {
                return Err(TypeFault::InvalidMapKey(key.to_string()));
            }
            Cardinality::Map(key_kind, resolve_element(value)?)
        }
    };

    Ok(ClassifiedType {
        cardinality,
        optional,
    })
}
