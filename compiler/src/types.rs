use fieldwire_schema::NumericDetail;
use serde::Serialize;
use std::fmt;

/// A declared field type as written in the schema, before classification.
/// Type names stay unresolved strings here; deciding whether a name is in
/// the representable scalar universe is the classifier's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeExpr {
    Name(String),
    Optional(Box<TypeExpr>),
    Repeated(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => write!(f, "{}", name),
            TypeExpr::Optional(inner) => write!(f, "optional {}", inner),
            TypeExpr::Repeated(inner) => write!(f, "repeated {}", inner),
            TypeExpr::Map(key, value) => write!(f, "map<{}, {}>", key, value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name:          String,
    pub line:          usize,
    pub column:        usize,
    pub declared_type: TypeExpr,
    pub explicit_tag:  Option<u32>,
    pub detail:        Option<NumericDetail>,
}

/// One `message` declaration: an ordered field list plus the reservation
/// set accumulated from its `reserved` statements. Field order is
/// irrelevant to the wire format but drives deterministic auto-tagging and
/// generated-code ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageSpec {
    pub name:     String,
    pub line:     usize,
    pub column:   usize,
    pub fields:   Vec<FieldSpec>,
    pub reserved: Vec<u32>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Schema {
    pub messages: Vec<MessageSpec>,
}
