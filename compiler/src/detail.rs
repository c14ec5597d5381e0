use crate::types::FieldSpec;
use fieldwire_schema::{Cardinality, ClassifiedType, NumericDetail, ScalarKind};

/// An incompatible numeric-detail hint. Reported against the field but
/// never blocks emission; the declared detail is recorded as-is and the
/// wire-kind fold falls back to the kind's default primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailFault {
    pub kind:   ScalarKind,
    pub detail: NumericDetail,
}

impl DetailFault {
    pub fn message(&self) -> String {
        format!(
            "Can't apply parameter \"{}\" to type {}",
            self.detail.token(),
            self.kind.proto_name()
        )
    }
}

/// Check a field's numeric-detail hint against its classified scalar kind.
///
/// Kinds outside the detail-eligible set ignore any hint entirely; a hint
/// on a string or bool field is not worth a diagnostic.
pub fn validate_detail(field: &FieldSpec, ty: &ClassifiedType) -> Option<DetailFault> {
    let detail = field.detail?;

    let kind = match ty.cardinality {
        Cardinality::Singular(kind) | Cardinality::Repeated(kind) => kind,
        // Map entries have no detail slot of their own.
        Cardinality::Map(_, _) => return None,
    };

    if !kind.detail_eligible() {
        return None;
    }

    let compatible = match detail {
        NumericDetail::Default => true,
        NumericDetail::Signed | NumericDetail::SignedFixed => {
            matches!(kind, ScalarKind::Int32 | ScalarKind::Int64)
        }
        NumericDetail::Fixed => matches!(kind, ScalarKind::UInt32 | ScalarKind::UInt64),
    };

    if compatible {
        None
    } else {
        Some(DetailFault { kind, detail })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeExpr;

    fn field(type_name: &str, detail: Option<NumericDetail>) -> FieldSpec {
        FieldSpec {
            name: "n".to_string(),
            line: 1,
            column: 1,
            declared_type: TypeExpr::Name(type_name.to_string()),
            explicit_tag: None,
            detail,
        }
    }

    fn singular(kind: ScalarKind) -> ClassifiedType {
        ClassifiedType {
            cardinality: Cardinality::Singular(kind),
            optional: false,
        }
    }

    #[test]
    fn test_signed_requires_signed_kind() {
        let fault = validate_detail(
            &field("uint32", Some(NumericDetail::Signed)),
            &singular(ScalarKind::UInt32),
        )
        .unwrap();
        assert_eq!(fault.message(), "Can't apply parameter \"signed\" to type uint32");

        assert!(validate_detail(
            &field("int64", Some(NumericDetail::SignedFixed)),
            &singular(ScalarKind::Int64),
        )
        .is_none());
    }

    #[test]
    fn test_fixed_requires_unsigned_kind() {
        assert!(validate_detail(
            &field("int32", Some(NumericDetail::Fixed)),
            &singular(ScalarKind::Int32),
        )
        .is_some());

        assert!(validate_detail(
            &field("uint64", Some(NumericDetail::Fixed)),
            &singular(ScalarKind::UInt64),
        )
        .is_none());
    }

    #[test]
    fn test_default_always_valid() {
        for kind in [ScalarKind::Int32, ScalarKind::UInt32, ScalarKind::Int64, ScalarKind::UInt64] {
            assert!(validate_detail(
                &field("n", Some(NumericDetail::Default)),
                &singular(kind),
            )
            .is_none());
        }
    }

    #[test]
    fn test_non_numeric_kinds_ignore_hints() {
        // No diagnostic no matter the hint.
        assert!(validate_detail(
            &field("string", Some(NumericDetail::Fixed)),
            &singular(ScalarKind::String),
        )
        .is_none());
        assert!(validate_detail(
            &field("bool", Some(NumericDetail::Signed)),
            &singular(ScalarKind::Bool),
        )
        .is_none());
    }

    #[test]
    fn test_repeated_elements_checked() {
        let ty = ClassifiedType {
            cardinality: Cardinality::Repeated(ScalarKind::UInt32),
            optional: false,
        };
        assert!(validate_detail(&field("uint32", Some(NumericDetail::Signed)), &ty).is_some());
        assert!(validate_detail(&field("uint32", Some(NumericDetail::Fixed)), &ty).is_none());
    }

    #[test]
    fn test_no_hint_no_fault() {
        assert!(validate_detail(&field("int32", None), &singular(ScalarKind::Int32)).is_none());
    }
}
