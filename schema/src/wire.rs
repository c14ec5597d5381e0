//! The seam between generated messages and an external wire-format runtime.
//!
//! The compiler never performs bit-level varint or length-delimited
//! encoding. Everything a message needs from the wire goes through the
//! [`FieldDecoder`] and [`FieldVisitor`] traits; a protobuf runtime supplies
//! the real byte-level implementation. [`RecordBuffer`] is an in-memory
//! implementation of both seams, used for lossless round-trips in tests and
//! tooling.

use crate::message::{ScalarKind, WireKind};
use crate::value::FieldValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("Wire type mismatch for tag {tag}: expected {expected}")]
    TypeMismatch { tag: u32, expected: &'static str },

    #[error("Unexpected field tag {found} (expected {expected})")]
    UnexpectedTag { expected: u32, found: u32 },

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Decode-side seam. One call per field occurrence; the runtime owns the
/// actual scalar parsing.
pub trait FieldDecoder {
    /// The next field tag in the stream, or `None` when exhausted.
    fn next_field_tag(&mut self) -> Result<Option<u32>, WireError>;

    fn decode_singular_field(
        &mut self,
        kind: WireKind,
        tag: u32,
        value: &mut FieldValue,
    ) -> Result<(), WireError>;

    fn decode_repeated_field(
        &mut self,
        kind: WireKind,
        tag: u32,
        values: &mut Vec<FieldValue>,
    ) -> Result<(), WireError>;

    fn decode_map_field(
        &mut self,
        key_kind: WireKind,
        value_kind: WireKind,
        tag: u32,
        entries: &mut Vec<(FieldValue, FieldValue)>,
    ) -> Result<(), WireError>;

    /// Consume a field the current descriptor does not know and preserve it
    /// in the unknown-field carrier.
    fn decode_unknown_field(
        &mut self,
        tag: u32,
        unknown: &mut UnknownFields,
    ) -> Result<(), WireError>;
}

/// Encode-side seam, keyed by field tag.
pub trait FieldVisitor {
    fn visit_singular_field(
        &mut self,
        kind: WireKind,
        tag: u32,
        value: &FieldValue,
    ) -> Result<(), WireError>;

    fn visit_repeated_field(
        &mut self,
        kind: WireKind,
        tag: u32,
        values: &[FieldValue],
    ) -> Result<(), WireError>;

    fn visit_map_field(
        &mut self,
        key_kind: WireKind,
        value_kind: WireKind,
        tag: u32,
        entries: &[(FieldValue, FieldValue)],
    ) -> Result<(), WireError>;

    fn visit_unknown_fields(&mut self, unknown: &UnknownFields) -> Result<(), WireError>;
}

/// Opaque storage for wire data whose tags the current descriptor does not
/// recognize. Round-trips through decode, traverse, and equality.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnknownFields {
    entries: Vec<(u32, FieldValue)>,
}

impl UnknownFields {
    pub fn new() -> UnknownFields {
        UnknownFields::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, tag: u32, value: FieldValue) {
        self.entries.push((tag, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u32, FieldValue)> {
        self.entries.iter()
    }

    /// Flush the carrier through the visitor.
    pub fn traverse<V: FieldVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), WireError> {
        if self.entries.is_empty() {
            return Ok(());
        }
        visitor.visit_unknown_fields(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Payload {
    Singular(FieldValue),
    Repeated(Vec<FieldValue>),
    Map(Vec<(FieldValue, FieldValue)>),
}

#[derive(Debug, Clone, PartialEq)]
struct Record {
    tag: u32,
    payload: Payload,
}

/// An in-memory field stream implementing both wire seams: visiting records
/// fields in order, decoding replays them. Useful for round-trip tests and
/// tooling that needs lossless transport without a byte-level codec.
#[derive(Debug, Clone, Default)]
pub struct RecordBuffer {
    records: Vec<Record>,
    cursor: usize,
}

impl RecordBuffer {
    pub fn new() -> RecordBuffer {
        RecordBuffer::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Rewind the replay cursor so the buffer can be decoded again.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn take_record(&mut self, tag: u32) -> Result<Payload, WireError> {
        let record = self
            .records
            .get(self.cursor)
            .ok_or_else(|| WireError::Corrupt("read past end of record stream".to_string()))?;
        if record.tag != tag {
            return Err(WireError::UnexpectedTag {
                expected: tag,
                found: record.tag,
            });
        }
        self.cursor += 1;
        Ok(self.records[self.cursor - 1].payload.clone())
    }
}

fn value_matches(kind: ScalarKind, value: &FieldValue) -> bool {
    matches!(
        (kind, value),
        (ScalarKind::Bool, FieldValue::Bool(_))
            | (ScalarKind::Int32, FieldValue::Int32(_))
            | (ScalarKind::UInt32, FieldValue::UInt32(_))
            | (ScalarKind::Int64, FieldValue::Int64(_))
            | (ScalarKind::UInt64, FieldValue::UInt64(_))
            | (ScalarKind::Float, FieldValue::Float(_))
            | (ScalarKind::Double, FieldValue::Double(_))
            | (ScalarKind::String, FieldValue::String(_))
            | (ScalarKind::Bytes, FieldValue::Bytes(_))
    )
}

impl FieldVisitor for RecordBuffer {
    fn visit_singular_field(
        &mut self,
        kind: WireKind,
        tag: u32,
        value: &FieldValue,
    ) -> Result<(), WireError> {
        if !value_matches(kind.scalar_kind(), value) {
            return Err(WireError::TypeMismatch {
                tag,
                expected: kind.method_suffix(),
            });
        }
        self.records.push(Record {
            tag,
            payload: Payload::Singular(value.clone()),
        });
        Ok(())
    }

    fn visit_repeated_field(
        &mut self,
        kind: WireKind,
        tag: u32,
        values: &[FieldValue],
    ) -> Result<(), WireError> {
        for value in values {
            if !value_matches(kind.scalar_kind(), value) {
                return Err(WireError::TypeMismatch {
                    tag,
                    expected: kind.method_suffix(),
                });
            }
        }
        self.records.push(Record {
            tag,
            payload: Payload::Repeated(values.to_vec()),
        });
        Ok(())
    }

    fn visit_map_field(
        &mut self,
        key_kind: WireKind,
        value_kind: WireKind,
        tag: u32,
        entries: &[(FieldValue, FieldValue)],
    ) -> Result<(), WireError> {
        for (key, value) in entries {
            if !value_matches(key_kind.scalar_kind(), key)
                || !value_matches(value_kind.scalar_kind(), value)
            {
                return Err(WireError::TypeMismatch {
                    tag,
                    expected: "map entry",
                });
            }
        }
        self.records.push(Record {
            tag,
            payload: Payload::Map(entries.to_vec()),
        });
        Ok(())
    }

    fn visit_unknown_fields(&mut self, unknown: &UnknownFields) -> Result<(), WireError> {
        for (tag, value) in unknown.iter() {
            let payload = match value {
                FieldValue::List(values) => Payload::Repeated(values.clone()),
                FieldValue::Map(entries) => Payload::Map(entries.clone()),
                other => Payload::Singular(other.clone()),
            };
            self.records.push(Record { tag: *tag, payload });
        }
        Ok(())
    }
}

impl FieldDecoder for RecordBuffer {
    fn next_field_tag(&mut self) -> Result<Option<u32>, WireError> {
        Ok(self.records.get(self.cursor).map(|record| record.tag))
    }

    fn decode_singular_field(
        &mut self,
        kind: WireKind,
        tag: u32,
        value: &mut FieldValue,
    ) -> Result<(), WireError> {
        match self.take_record(tag)? {
            Payload::Singular(stored) if value_matches(kind.scalar_kind(), &stored) => {
                *value = stored;
                Ok(())
            }
            _ => Err(WireError::TypeMismatch {
                tag,
                expected: kind.method_suffix(),
            }),
        }
    }

    fn decode_repeated_field(
        &mut self,
        kind: WireKind,
        tag: u32,
        values: &mut Vec<FieldValue>,
    ) -> Result<(), WireError> {
        match self.take_record(tag)? {
            Payload::Repeated(stored) => {
                for value in &stored {
                    if !value_matches(kind.scalar_kind(), value) {
                        return Err(WireError::TypeMismatch {
                            tag,
                            expected: kind.method_suffix(),
                        });
                    }
                }
                values.extend(stored);
                Ok(())
            }
            _ => Err(WireError::TypeMismatch {
                tag,
                expected: kind.method_suffix(),
            }),
        }
    }

    fn decode_map_field(
        &mut self,
        key_kind: WireKind,
        value_kind: WireKind,
        tag: u32,
        entries: &mut Vec<(FieldValue, FieldValue)>,
    ) -> Result<(), WireError> {
        match self.take_record(tag)? {
            Payload::Map(stored) => {
                for (key, value) in &stored {
                    if !value_matches(key_kind.scalar_kind(), key)
                        || !value_matches(value_kind.scalar_kind(), value)
                    {
                        return Err(WireError::TypeMismatch {
                            tag,
                            expected: "map entry",
                        });
                    }
                }
                entries.extend(stored);
                Ok(())
            }
            _ => Err(WireError::TypeMismatch {
                tag,
                expected: "map entry",
            }),
        }
    }

    fn decode_unknown_field(
        &mut self,
        tag: u32,
        unknown: &mut UnknownFields,
    ) -> Result<(), WireError> {
        let value = match self.take_record(tag)? {
            Payload::Singular(value) => value,
            Payload::Repeated(values) => FieldValue::List(values),
            Payload::Map(entries) => FieldValue::Map(entries),
        };
        unknown.push(tag, value);
        Ok(())
    }
}
