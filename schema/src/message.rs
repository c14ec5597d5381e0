use serde::Serialize;

/// The scalar universe a field may draw from. Anything outside this set is
/// rejected by the compiler's type classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarKind {
    Int32,
    UInt32,
    Int64,
    UInt64,
    Bool,
    Float,
    Double,
    String,
    Bytes,
}

impl ScalarKind {
    /// Map keys are restricted to the integral/bool/string subset.
    pub fn valid_map_key(&self) -> bool {
        !matches!(self, ScalarKind::Bytes | ScalarKind::Float | ScalarKind::Double)
    }

    /// Whether a numeric wire-detail hint applies to this kind at all.
    pub fn detail_eligible(&self) -> bool {
        matches!(
            self,
            ScalarKind::Int32 | ScalarKind::Int64 | ScalarKind::UInt32 | ScalarKind::UInt64
        )
    }

    pub fn proto_name(&self) -> &'static str {
        match self {
            ScalarKind::Int32 => "int32",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::Int64 => "int64",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::Bool => "bool",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
        }
    }
}

/// Optional wire-shape hint for the integral kinds. `Signed`/`SignedFixed`
/// are meaningful for `Int32`/`Int64`, `Fixed` for `UInt32`/`UInt64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumericDetail {
    Default,
    Signed,
    SignedFixed,
    Fixed,
}

impl NumericDetail {
    pub fn token(&self) -> &'static str {
        match self {
            NumericDetail::Default => "default",
            NumericDetail::Signed => "signed",
            NumericDetail::SignedFixed => "signedFixed",
            NumericDetail::Fixed => "fixed",
        }
    }
}

/// The concrete wire primitive a field decodes/encodes through, folded from
/// `(ScalarKind, NumericDetail)` by the message emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WireKind {
    Int32,
    Sint32,
    Sfixed32,
    UInt32,
    Fixed32,
    Int64,
    Sint64,
    Sfixed64,
    UInt64,
    Fixed64,
    Bool,
    Float,
    Double,
    String,
    Bytes,
}

impl WireKind {
    /// Fold a scalar kind and its detail hint into the wire primitive.
    /// An incompatible detail falls back to the kind's default primitive;
    /// the compiler has already flagged it by the time this runs.
    pub fn select(kind: ScalarKind, detail: NumericDetail) -> WireKind {
        match (kind, detail) {
            (ScalarKind::Int32, NumericDetail::Signed) => WireKind::Sint32,
            (ScalarKind::Int32, NumericDetail::SignedFixed) => WireKind::Sfixed32,
            (ScalarKind::Int32, _) => WireKind::Int32,
            (ScalarKind::Int64, NumericDetail::Signed) => WireKind::Sint64,
            (ScalarKind::Int64, NumericDetail::SignedFixed) => WireKind::Sfixed64,
            (ScalarKind::Int64, _) => WireKind::Int64,
            (ScalarKind::UInt32, NumericDetail::Fixed) => WireKind::Fixed32,
            (ScalarKind::UInt32, _) => WireKind::UInt32,
            (ScalarKind::UInt64, NumericDetail::Fixed) => WireKind::Fixed64,
            (ScalarKind::UInt64, _) => WireKind::UInt64,
            (ScalarKind::Bool, _) => WireKind::Bool,
            (ScalarKind::Float, _) => WireKind::Float,
            (ScalarKind::Double, _) => WireKind::Double,
            (ScalarKind::String, _) => WireKind::String,
            (ScalarKind::Bytes, _) => WireKind::Bytes,
        }
    }

    /// The scalar kind this primitive carries, ignoring the wire shape.
    pub fn scalar_kind(&self) -> ScalarKind {
        match self {
            WireKind::Int32 | WireKind::Sint32 | WireKind::Sfixed32 => ScalarKind::Int32,
            WireKind::UInt32 | WireKind::Fixed32 => ScalarKind::UInt32,
            WireKind::Int64 | WireKind::Sint64 | WireKind::Sfixed64 => ScalarKind::Int64,
            WireKind::UInt64 | WireKind::Fixed64 => ScalarKind::UInt64,
            WireKind::Bool => ScalarKind::Bool,
            WireKind::Float => ScalarKind::Float,
            WireKind::Double => ScalarKind::Double,
            WireKind::String => ScalarKind::String,
            WireKind::Bytes => ScalarKind::Bytes,
        }
    }

    /// Suffix used to pick the runtime primitive in generated source, e.g.
    /// `Sint32` → `decode_singular_sint32_field`.
    pub fn method_suffix(&self) -> &'static str {
        match self {
            WireKind::Int32 => "int32",
            WireKind::Sint32 => "sint32",
            WireKind::Sfixed32 => "sfixed32",
            WireKind::UInt32 => "uint32",
            WireKind::Fixed32 => "fixed32",
            WireKind::Int64 => "int64",
            WireKind::Sint64 => "sint64",
            WireKind::Sfixed64 => "sfixed64",
            WireKind::UInt64 => "uint64",
            WireKind::Fixed64 => "fixed64",
            WireKind::Bool => "bool",
            WireKind::Float => "float",
            WireKind::Double => "double",
            WireKind::String => "string",
            WireKind::Bytes => "bytes",
        }
    }
}

/// How a field's wire name relates to its declared identifier. `Same` means
/// the identifier had no uppercase code points and is used verbatim;
/// `Standard` carries the snake_case conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WireName {
    Same(String),
    Standard(String),
}

impl WireName {
    pub fn proto(&self) -> &str {
        match self {
            WireName::Same(name) | WireName::Standard(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    Singular(ScalarKind),
    Repeated(ScalarKind),
    Map(ScalarKind, ScalarKind),
}

/// A field type that survived classification: a cardinality over the scalar
/// universe, plus at most one layer of explicit presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedType {
    pub cardinality: Cardinality,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedField {
    pub name: String,
    pub wire_name: WireName,
    pub tag: u32,
    pub ty: ClassifiedType,
    pub detail: NumericDetail,
}

impl GeneratedField {
    /// Wire primitive for a singular or repeated field's element.
    pub fn wire_kind(&self) -> WireKind {
        match self.ty.cardinality {
            Cardinality::Singular(kind) | Cardinality::Repeated(kind) => {
                WireKind::select(kind, self.detail)
            }
            // Map entries never carry a numeric detail.
            Cardinality::Map(_, value) => WireKind::select(value, NumericDetail::Default),
        }
    }

    pub fn map_wire_kinds(&self) -> Option<(WireKind, WireKind)> {
        match self.ty.cardinality {
            Cardinality::Map(key, value) => Some((
                WireKind::select(key, NumericDetail::Default),
                WireKind::select(value, NumericDetail::Default),
            )),
            _ => None,
        }
    }
}

/// The immutable output of the compiler: one descriptor per message, a pure
/// function of the schema plus its reservation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedMessage {
    pub name: String,
    pub fields: Vec<GeneratedField>,
}

impl GeneratedMessage {
    /// Ordered tag → wire-name association used for text/JSON-style lookup.
    pub fn name_map(&self) -> Vec<(u32, &WireName)> {
        self.fields.iter().map(|f| (f.tag, &f.wire_name)).collect()
    }

    /// Locate a field by its tag number, with its declaration index.
    pub fn field_by_tag(&self, tag: u32) -> Option<(usize, &GeneratedField)> {
        self.fields.iter().enumerate().find(|(_, f)| f.tag == tag)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
