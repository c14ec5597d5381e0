//! Typed convenience surface over the dynamic wire seams.
//!
//! Generated message code calls per-primitive methods
//! (`decode_singular_sint32_field`, `visit_singular_string_field`, ...)
//! the way protobuf runtimes name them. Each method is a default
//! implementation bridging to the kind-parameterized [`FieldDecoder`] /
//! [`FieldVisitor`] seam, so any wire-format runtime that implements the
//! dynamic seam gets the whole typed surface for free.

use std::collections::HashMap;
use std::hash::Hash;

use crate::message::WireKind;
use crate::value::FieldValue;
use crate::wire::{FieldDecoder, FieldVisitor, WireError};

/// Conversion between a concrete Rust scalar and its dynamic value, with the
/// default wire primitive used for map keys and values (map entries never
/// carry a numeric detail).
pub trait MapScalar: Sized {
    const KIND: WireKind;
    fn into_value(self) -> FieldValue;
    fn from_value(value: &FieldValue) -> Self;
}

macro_rules! map_scalar {
    ($ty:ty, $kind:ident, $variant:ident, $from:expr) => {
        impl MapScalar for $ty {
            const KIND: WireKind = WireKind::$kind;
            fn into_value(self) -> FieldValue {
                FieldValue::$variant(self)
            }
            fn from_value(value: &FieldValue) -> Self {
                $from(value)
            }
        }
    };
}

map_scalar!(i32, Int32, Int32, |v: &FieldValue| v.as_int32());
map_scalar!(u32, UInt32, UInt32, |v: &FieldValue| v.as_uint32());
map_scalar!(i64, Int64, Int64, |v: &FieldValue| v.as_int64());
map_scalar!(u64, UInt64, UInt64, |v: &FieldValue| v.as_uint64());
map_scalar!(bool, Bool, Bool, |v: &FieldValue| v.as_bool());
map_scalar!(f32, Float, Float, |v: &FieldValue| v.as_float());
map_scalar!(f64, Double, Double, |v: &FieldValue| v.as_double());
map_scalar!(String, String, String, |v: &FieldValue| v.as_string().to_string());
map_scalar!(Vec<u8>, Bytes, Bytes, |v: &FieldValue| v.as_bytes().to_vec());

macro_rules! typed_methods {
    ($(($decode_singular:ident, $decode_optional:ident, $decode_repeated:ident,
        $visit_singular:ident, $visit_repeated:ident,
        $ty:ty, $kind:ident, $variant:ident, $from:expr)),* $(,)?) => {
        /// Per-primitive decode methods, named after the wire primitive the
        /// way protobuf runtimes name them. Blanket-implemented for every
        /// [`FieldDecoder`].
        pub trait ScalarDecoder: FieldDecoder {
            $(
                fn $decode_singular(&mut self, tag: u32, value: &mut $ty) -> Result<(), WireError> {
                    let mut dynamic = FieldValue::$variant(std::mem::take(value));
                    self.decode_singular_field(WireKind::$kind, tag, &mut dynamic)?;
                    *value = $from(&dynamic);
                    Ok(())
                }

                /// Optional fields decode into the nullable backing slot so
                /// presence survives the round trip.
                fn $decode_optional(&mut self, tag: u32, value: &mut Option<$ty>) -> Result<(), WireError> {
                    let mut slot = <$ty>::default();
                    self.$decode_singular(tag, &mut slot)?;
                    *value = Some(slot);
                    Ok(())
                }

                fn $decode_repeated(&mut self, tag: u32, values: &mut Vec<$ty>) -> Result<(), WireError> {
                    let mut dynamic = Vec::new();
                    self.decode_repeated_field(WireKind::$kind, tag, &mut dynamic)?;
                    values.extend(dynamic.iter().map($from));
                    Ok(())
                }
            )*

            fn decode_map_typed_field<K, V>(
                &mut self,
                tag: u32,
                map: &mut HashMap<K, V>,
            ) -> Result<(), WireError>
            where
                K: MapScalar + Eq + Hash,
                V: MapScalar,
            {
                let mut entries = Vec::new();
                self.decode_map_field(K::KIND, V::KIND, tag, &mut entries)?;
                for (key, value) in entries {
                    map.insert(K::from_value(&key), V::from_value(&value));
                }
                Ok(())
            }
        }

        impl<D: FieldDecoder + ?Sized> ScalarDecoder for D {}

        /// Per-primitive visit methods, mirror image of [`ScalarDecoder`].
        /// Blanket-implemented for every [`FieldVisitor`].
        pub trait ScalarVisitor: FieldVisitor {
            $(
                fn $visit_singular(&mut self, value: &$ty, tag: u32) -> Result<(), WireError> {
                    let dynamic = FieldValue::$variant(value.clone());
                    self.visit_singular_field(WireKind::$kind, tag, &dynamic)
                }

                fn $visit_repeated(&mut self, values: &[$ty], tag: u32) -> Result<(), WireError> {
                    let dynamic: Vec<FieldValue> = values
                        .iter()
                        .map(|value| FieldValue::$variant(value.clone()))
                        .collect();
                    self.visit_repeated_field(WireKind::$kind, tag, &dynamic)
                }
            )*

            fn visit_map_typed_field<K, V>(
                &mut self,
                map: &HashMap<K, V>,
                tag: u32,
            ) -> Result<(), WireError>
            where
                K: MapScalar + Eq + Hash + Clone,
                V: MapScalar + Clone,
            {
                let entries: Vec<(FieldValue, FieldValue)> = map
                    .iter()
                    .map(|(key, value)| (key.clone().into_value(), value.clone().into_value()))
                    .collect();
                self.visit_map_field(K::KIND, V::KIND, tag, &entries)
            }
        }

        impl<V: FieldVisitor + ?Sized> ScalarVisitor for V {}
    };
}

typed_methods!(
    (decode_singular_int32_field, decode_optional_int32_field, decode_repeated_int32_field,
     visit_singular_int32_field, visit_repeated_int32_field,
     i32, Int32, Int32, |v: &FieldValue| v.as_int32()),
    (decode_singular_sint32_field, decode_optional_sint32_field, decode_repeated_sint32_field,
     visit_singular_sint32_field, visit_repeated_sint32_field,
     i32, Sint32, Int32, |v: &FieldValue| v.as_int32()),
    (decode_singular_sfixed32_field, decode_optional_sfixed32_field, decode_repeated_sfixed32_field,
     visit_singular_sfixed32_field, visit_repeated_sfixed32_field,
     i32, Sfixed32, Int32, |v: &FieldValue| v.as_int32()),
    (decode_singular_uint32_field, decode_optional_uint32_field, decode_repeated_uint32_field,
     visit_singular_uint32_field, visit_repeated_uint32_field,
     u32, UInt32, UInt32, |v: &FieldValue| v.as_uint32()),
    (decode_singular_fixed32_field, decode_optional_fixed32_field, decode_repeated_fixed32_field,
     visit_singular_fixed32_field, visit_repeated_fixed32_field,
     u32, Fixed32, UInt32, |v: &FieldValue| v.as_uint32()),
    (decode_singular_int64_field, decode_optional_int64_field, decode_repeated_int64_field,
     visit_singular_int64_field, visit_repeated_int64_field,
     i64, Int64, Int64, |v: &FieldValue| v.as_int64()),
    (decode_singular_sint64_field, decode_optional_sint64_field, decode_repeated_sint64_field,
     visit_singular_sint64_field, visit_repeated_sint64_field,
     i64, Sint64, Int64, |v: &FieldValue| v.as_int64()),
    (decode_singular_sfixed64_field, decode_optional_sfixed64_field, decode_repeated_sfixed64_field,
     visit_singular_sfixed64_field, visit_repeated_sfixed64_field,
     i64, Sfixed64, Int64, |v: &FieldValue| v.as_int64()),
    (decode_singular_uint64_field, decode_optional_uint64_field, decode_repeated_uint64_field,
     visit_singular_uint64_field, visit_repeated_uint64_field,
     u64, UInt64, UInt64, |v: &FieldValue| v.as_uint64()),
    (decode_singular_fixed64_field, decode_optional_fixed64_field, decode_repeated_fixed64_field,
     visit_singular_fixed64_field, visit_repeated_fixed64_field,
     u64, Fixed64, UInt64, |v: &FieldValue| v.as_uint64()),
    (decode_singular_bool_field, decode_optional_bool_field, decode_repeated_bool_field,
     visit_singular_bool_field, visit_repeated_bool_field,
     bool, Bool, Bool, |v: &FieldValue| v.as_bool()),
    (decode_singular_float_field, decode_optional_float_field, decode_repeated_float_field,
     visit_singular_float_field, visit_repeated_float_field,
     f32, Float, Float, |v: &FieldValue| v.as_float()),
    (decode_singular_double_field, decode_optional_double_field, decode_repeated_double_field,
     visit_singular_double_field, visit_repeated_double_field,
     f64, Double, Double, |v: &FieldValue| v.as_double()),
    (decode_singular_string_field, decode_optional_string_field, decode_repeated_string_field,
     visit_singular_string_field, visit_repeated_string_field,
     String, String, String, |v: &FieldValue| v.as_string().to_string()),
    (decode_singular_bytes_field, decode_optional_bytes_field, decode_repeated_bytes_field,
     visit_singular_bytes_field, visit_repeated_bytes_field,
     Vec<u8>, Bytes, Bytes, |v: &FieldValue| v.as_bytes().to_vec()),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::RecordBuffer;

    #[test]
    fn test_typed_singular_round_trip() {
        let mut buffer = RecordBuffer::new();
        buffer.visit_singular_sint32_field(&-42, 1).unwrap();
        buffer
            .visit_singular_string_field(&"hi".to_string(), 2)
            .unwrap();

        let mut n = 0i32;
        buffer.decode_singular_sint32_field(1, &mut n).unwrap();
        assert_eq!(n, -42);

        let mut s = String::new();
        buffer.decode_singular_string_field(2, &mut s).unwrap();
        assert_eq!(s, "hi");
    }

    #[test]
    fn test_typed_optional_sets_presence() {
        let mut buffer = RecordBuffer::new();
        buffer.visit_singular_bytes_field(&vec![], 4).unwrap();

        let mut slot: Option<Vec<u8>> = None;
        buffer.decode_optional_bytes_field(4, &mut slot).unwrap();
        assert_eq!(slot, Some(vec![]));
    }

    #[test]
    fn test_typed_repeated_round_trip() {
        let mut buffer = RecordBuffer::new();
        buffer.visit_repeated_uint64_field(&[7, 8, 9], 3).unwrap();

        let mut values = Vec::new();
        buffer.decode_repeated_uint64_field(3, &mut values).unwrap();
        assert_eq!(values, vec![7, 8, 9]);
    }

    #[test]
    fn test_typed_map_round_trip() {
        let mut map = HashMap::new();
        map.insert("unit".to_string(), "A-1".to_string());
        map.insert("shelf".to_string(), "B-2".to_string());

        let mut buffer = RecordBuffer::new();
        buffer.visit_map_typed_field(&map, 5).unwrap();

        let mut decoded: HashMap<String, String> = HashMap::new();
        buffer.decode_map_typed_field(5, &mut decoded).unwrap();
        assert_eq!(decoded, map);
    }
}
