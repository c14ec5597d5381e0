//! Runtime support for Fieldwire-generated messages: compiled message
//! descriptors, dynamic field values, the decoder/visitor seams an external
//! wire-format runtime plugs into, and the unknown-field carrier.
//!
//! ```
//! use fieldwire_schema::*;
//!
//! let desc = GeneratedMessage {
//!     name: "Point".to_owned(),
//!     fields: vec![
//!         GeneratedField {
//!             name: "x".to_owned(),
//!             wire_name: WireName::Same("x".to_owned()),
//!             tag: 1,
//!             ty: ClassifiedType {
//!                 cardinality: Cardinality::Singular(ScalarKind::Int32),
//!                 optional: false,
//!             },
//!             detail: NumericDetail::Default,
//!         },
//!     ],
//! };
//!
//! let mut point = MessageValue::new(&desc);
//! point.set(0, FieldValue::Int32(-7));
//!
//! let mut buffer = RecordBuffer::new();
//! point.traverse(&desc, &mut buffer).unwrap();
//! let decoded = MessageValue::decode(&desc, &mut buffer).unwrap();
//! assert_eq!(decoded, point);
//! assert_eq!(decoded.get(&desc, 0).as_int32(), -7);
//! ```

pub mod message;
pub mod runtime;
pub mod value;
pub mod wire;

pub use message::*;
pub use runtime::*;
pub use value::*;
pub use wire::*;

/// Field numbers protobuf permanently reserves for its own wire format.
/// Auto-assignment never hands these out.
pub const RESERVED_TAG_RANGE: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// The largest field number a message may use.
pub const MAX_FIELD_TAG: u32 = 536_870_911;
