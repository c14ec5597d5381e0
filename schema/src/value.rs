use crate::message::{Cardinality, ClassifiedType, GeneratedMessage, ScalarKind};
use crate::wire::{FieldDecoder, FieldVisitor, UnknownFields, WireError};

/// This type holds dynamic field data.
///
/// Values can represent anything a generated message stores and are moved
/// through the decoder/visitor seams by [`MessageValue`]. The actual byte
/// layout is the concern of whatever wire-format runtime sits behind those
/// seams; a `FieldValue` is wire-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<FieldValue>),
    Map(Vec<(FieldValue, FieldValue)>),
}

impl FieldValue {
    /// The zero value for a scalar kind (0, false, empty string/bytes).
    pub fn zero_scalar(kind: ScalarKind) -> FieldValue {
        match kind {
            ScalarKind::Bool => FieldValue::Bool(false),
            ScalarKind::Int32 => FieldValue::Int32(0),
            ScalarKind::UInt32 => FieldValue::UInt32(0),
            ScalarKind::Int64 => FieldValue::Int64(0),
            ScalarKind::UInt64 => FieldValue::UInt64(0),
            ScalarKind::Float => FieldValue::Float(0.0),
            ScalarKind::Double => FieldValue::Double(0.0),
            ScalarKind::String => FieldValue::String(String::new()),
            ScalarKind::Bytes => FieldValue::Bytes(Vec::new()),
        }
    }

    /// The zero value for a classified field type: the scalar zero for
    /// singular fields, an empty collection otherwise.
    pub fn zero(ty: &ClassifiedType) -> FieldValue {
        match ty.cardinality {
            Cardinality::Singular(kind) => FieldValue::zero_scalar(kind),
            Cardinality::Repeated(_) => FieldValue::List(Vec::new()),
            Cardinality::Map(_, _) => FieldValue::Map(Vec::new()),
        }
    }

    /// Whether this value equals its type's zero value. Non-optional fields
    /// with a zero value are skipped during traversal.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Bool(v) => !v,
            FieldValue::Int32(v) => *v == 0,
            FieldValue::UInt32(v) => *v == 0,
            FieldValue::Int64(v) => *v == 0,
            FieldValue::UInt64(v) => *v == 0,
            FieldValue::Float(v) => *v == 0.0,
            FieldValue::Double(v) => *v == 0.0,
            FieldValue::String(v) => v.is_empty(),
            FieldValue::Bytes(v) => v.is_empty(),
            FieldValue::List(v) => v.is_empty(),
            FieldValue::Map(v) => v.is_empty(),
        }
    }

    /// A convenience method to extract the value out of a [Bool](#variant.Bool).
    /// Returns `false` for other value kinds.
    pub fn as_bool(&self) -> bool {
        match *self {
            FieldValue::Bool(value) => value,
            _ => false,
        }
    }

    /// A convenience method to extract the value out of an [Int32](#variant.Int32).
    /// Returns `0` for other value kinds.
    pub fn as_int32(&self) -> i32 {
        match *self {
            FieldValue::Int32(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of a [UInt32](#variant.UInt32).
    /// Returns `0` for other value kinds.
    pub fn as_uint32(&self) -> u32 {
        match *self {
            FieldValue::UInt32(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of an [Int64](#variant.Int64).
    /// Returns `0` for other value kinds.
    pub fn as_int64(&self) -> i64 {
        match *self {
            FieldValue::Int64(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of a [UInt64](#variant.UInt64).
    /// Returns `0` for other value kinds.
    pub fn as_uint64(&self) -> u64 {
        match *self {
            FieldValue::UInt64(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of a [Float](#variant.Float).
    /// Returns `0.0` for other value kinds.
    pub fn as_float(&self) -> f32 {
        match *self {
            FieldValue::Float(value) => value,
            _ => 0.0,
        }
    }

    /// A convenience method to extract the value out of a [Double](#variant.Double).
    /// Returns `0.0` for other value kinds.
    pub fn as_double(&self) -> f64 {
        match *self {
            FieldValue::Double(value) => value,
            _ => 0.0,
        }
    }

    /// A convenience method to extract the value out of a [String](#variant.String).
    /// Returns `""` for other value kinds.
    pub fn as_string(&self) -> &str {
        match self {
            FieldValue::String(value) => value,
            _ => "",
        }
    }

    /// A convenience method to extract the value out of a [Bytes](#variant.Bytes).
    /// Returns an empty slice for other value kinds.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FieldValue::Bytes(value) => value,
            _ => &[],
        }
    }

    /// A convenience method to extract the elements out of a [List](#variant.List).
    /// Returns an empty slice for other value kinds.
    pub fn as_list(&self) -> &[FieldValue] {
        match self {
            FieldValue::List(value) => value,
            _ => &[],
        }
    }

    /// A convenience method to extract the entries out of a [Map](#variant.Map).
    /// Returns an empty slice for other value kinds.
    pub fn as_map(&self) -> &[(FieldValue, FieldValue)] {
        match self {
            FieldValue::Map(value) => value,
            _ => &[],
        }
    }
}

/// Dynamic storage for one message instance, laid out against a
/// [`GeneratedMessage`] descriptor.
///
/// Every field owns one slot. Regular fields are always populated (with the
/// zero value until set); optional fields use `None` as the distinct "never
/// set" state, so an unset optional is indistinguishable on the wire from an
/// absent field even when its value would equal the zero value.
#[derive(Debug, Clone)]
pub struct MessageValue {
    slots: Vec<Option<FieldValue>>,
    unknown: UnknownFields,
}

impl MessageValue {
    /// Create a message with every regular field at its zero value and every
    /// optional field unset.
    pub fn new(desc: &GeneratedMessage) -> MessageValue {
        let slots = desc
            .fields
            .iter()
            .map(|field| {
                if field.ty.optional {
                    None
                } else {
                    Some(FieldValue::zero(&field.ty))
                }
            })
            .collect();
        MessageValue {
            slots,
            unknown: UnknownFields::new(),
        }
    }

    /// Non-nullable accessor: the stored value, or the field type's zero
    /// value when an optional field is unset.
    pub fn get(&self, desc: &GeneratedMessage, index: usize) -> FieldValue {
        match &self.slots[index] {
            Some(value) => value.clone(),
            None => FieldValue::zero(&desc.fields[index].ty),
        }
    }

    pub fn set(&mut self, index: usize, value: FieldValue) {
        self.slots[index] = Some(value);
    }

    /// Presence predicate for optional fields. Regular fields are always
    /// considered present.
    pub fn has(&self, index: usize) -> bool {
        self.slots[index].is_some()
    }

    /// Reset an optional field to its unset state.
    pub fn clear(&mut self, index: usize) {
        self.slots[index] = None;
    }

    pub fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown
    }

    /// Decode a message from the decoder seam: read field tags until
    /// exhausted, dispatch by tag, and delegate each value read to the
    /// wire-format runtime. Tags the descriptor does not know are preserved
    /// in the unknown-field carrier, not dropped.
    pub fn decode<D: FieldDecoder>(
        desc: &GeneratedMessage,
        decoder: &mut D,
    ) -> Result<MessageValue, WireError> {
        let mut message = MessageValue::new(desc);

        while let Some(tag) = decoder.next_field_tag()? {
            match desc.field_by_tag(tag) {
                Some((index, field)) => match field.ty.cardinality {
                    Cardinality::Singular(kind) => {
                        let mut value = FieldValue::zero_scalar(kind);
                        decoder.decode_singular_field(field.wire_kind(), tag, &mut value)?;
                        message.slots[index] = Some(value);
                    }
                    Cardinality::Repeated(_) => {
                        let mut values = match message.slots[index].take() {
                            Some(FieldValue::List(values)) => values,
                            _ => Vec::new(),
                        };
                        decoder.decode_repeated_field(field.wire_kind(), tag, &mut values)?;
                        message.slots[index] = Some(FieldValue::List(values));
                    }
                    Cardinality::Map(_, _) => {
                        let (key_kind, value_kind) = field
                            .map_wire_kinds()
                            .ok_or_else(|| WireError::Corrupt("map descriptor".to_string()))?;
                        let mut entries = match message.slots[index].take() {
                            Some(FieldValue::Map(entries)) => entries,
                            _ => Vec::new(),
                        };
                        decoder.decode_map_field(key_kind, value_kind, tag, &mut entries)?;
                        message.slots[index] = Some(FieldValue::Map(entries));
                    }
                },
                None => decoder.decode_unknown_field(tag, &mut message.unknown)?,
            }
        }

        Ok(message)
    }

    /// Encode-side walk: visit each field in declaration order, skipping
    /// regular fields that equal their zero value. Optional fields are
    /// emitted if and only if they are present, regardless of value.
    /// Unknown fields are flushed last.
    pub fn traverse<V: FieldVisitor>(
        &self,
        desc: &GeneratedMessage,
        visitor: &mut V,
    ) -> Result<(), WireError> {
        for (index, field) in desc.fields.iter().enumerate() {
            let value = match &self.slots[index] {
                Some(value) => value,
                None => continue,
            };
            if !field.ty.optional && value.is_zero() {
                continue;
            }
            match field.ty.cardinality {
                Cardinality::Singular(_) => {
                    visitor.visit_singular_field(field.wire_kind(), field.tag, value)?;
                }
                Cardinality::Repeated(_) => {
                    visitor.visit_repeated_field(field.wire_kind(), field.tag, value.as_list())?;
                }
                Cardinality::Map(_, _) => {
                    let (key_kind, value_kind) = field
                        .map_wire_kinds()
                        .ok_or_else(|| WireError::Corrupt("map descriptor".to_string()))?;
                    visitor.visit_map_field(key_kind, value_kind, field.tag, value.as_map())?;
                }
            }
        }
        self.unknown.traverse(visitor)
    }
}

// Field-by-field comparison in declaration order, short-circuiting on the
// first mismatch, with the unknown-field carrier as the final term.
impl PartialEq for MessageValue {
    fn eq(&self, other: &MessageValue) -> bool {
        if self.slots.len() != other.slots.len() {
            return false;
        }
        for (lhs, rhs) in self.slots.iter().zip(other.slots.iter()) {
            if lhs != rhs {
                return false;
            }
        }
        self.unknown == other.unknown
    }
}
