use crate::classify::classify;
use crate::detail::validate_detail;
use crate::error::Diagnostics;
use crate::names::wire_name;
use crate::tags::{allocate, check_explicit_tags};
use crate::types::MessageSpec;
use fieldwire_schema::{GeneratedField, GeneratedMessage, NumericDetail};

/// Compose the pipeline outputs for one message declaration.
///
/// Classification runs first and is best-effort: a field that fails is
/// reported and dropped, and the remaining stages never see it, so it
/// appears in none of the generated artifacts. Tag allocation, detail
/// validation, and name mapping then run over the surviving fields in
/// declaration order.
pub fn emit_message(spec: &MessageSpec, diagnostics: &mut Diagnostics) -> GeneratedMessage {
    let mut survivors = Vec::with_capacity(spec.fields.len());
    let mut types = Vec::with_capacity(spec.fields.len());

    for field in &spec.fields {
        match classify(&field.declared_type) {
            Ok(ty) => {
                survivors.push(field.clone());
                types.push(ty);
            }
            Err(fault) => {
                diagnostics.error(field.line, field.column, fault.message(&field.name));
            }
        }
    }

    check_explicit_tags(&survivors, &spec.reserved, diagnostics);
    let tags = allocate(&survivors, &spec.reserved);

    let fields = survivors
        .iter()
        .zip(types)
        .zip(tags)
        .map(|((field, ty), tag)| {
            if let Some(fault) = validate_detail(field, &ty) {
                // Flagged but still emitted, with the declared detail kept;
                // wire-kind selection falls back to the default primitive.
                diagnostics.warning(field.line, field.column, fault.message());
            }
            GeneratedField {
                name: field.name.clone(),
                wire_name: wire_name(&field.name),
                tag,
                ty,
                detail: field.detail.unwrap_or(NumericDetail::Default),
            }
        })
        .collect();

    GeneratedMessage {
        name: spec.name.clone(),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldSpec, TypeExpr};
    use fieldwire_schema::{Cardinality, ScalarKind, WireKind, WireName};

    fn field(name: &str, declared_type: TypeExpr) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            line: 1,
            column: 1,
            declared_type,
            explicit_tag: None,
            detail: None,
        }
    }

    fn spec(fields: Vec<FieldSpec>, reserved: Vec<u32>) -> MessageSpec {
        MessageSpec {
            name: "Test".to_string(),
            line: 1,
            column: 1,
            fields,
            reserved,
        }
    }

    #[test]
    fn test_basic_emission() {
        let spec = spec(
            vec![
                field("name", TypeExpr::Name("string".into())),
                field("age", TypeExpr::Name("uint32".into())),
                field("isMember", TypeExpr::Name("bool".into())),
            ],
            vec![],
        );
        let mut diagnostics = Diagnostics::new();
        let message = emit_message(&spec, &mut diagnostics);

        assert!(diagnostics.items().is_empty());
        let tags: Vec<u32> = message.fields.iter().map(|f| f.tag).collect();
        assert_eq!(tags, vec![1, 2, 3]);

        let name_map = message.name_map();
        assert_eq!(name_map[0], (1, &WireName::Same("name".to_string())));
        assert_eq!(name_map[1], (2, &WireName::Same("age".to_string())));
        assert_eq!(name_map[2], (3, &WireName::Standard("is_member".to_string())));
    }

    #[test]
    fn test_failed_field_excluded_from_all_artifacts() {
        let spec = spec(
            vec![
                field("account", TypeExpr::Name("Account".into())),
                field("name", TypeExpr::Name("string".into())),
            ],
            vec![],
        );
        let mut diagnostics = Diagnostics::new();
        let message = emit_message(&spec, &mut diagnostics);

        assert_eq!(diagnostics.items().len(), 1);
        assert!(!diagnostics.has_fatal());
        // The surviving field takes tag 1; the rejected field is nowhere.
        assert_eq!(message.fields.len(), 1);
        assert_eq!(message.fields[0].name, "name");
        assert_eq!(message.fields[0].tag, 1);
        assert_eq!(message.name_map().len(), 1);
    }

    #[test]
    fn test_detail_flagged_but_emitted() {
        let mut bad = field("count", TypeExpr::Name("uint32".into()));
        bad.detail = Some(fieldwire_schema::NumericDetail::Signed);
        let spec = spec(vec![bad], vec![]);

        let mut diagnostics = Diagnostics::new();
        let message = emit_message(&spec, &mut diagnostics);

        assert_eq!(diagnostics.items().len(), 1);
        assert!(!diagnostics.has_fatal());
        assert_eq!(message.fields.len(), 1);
        // Declared detail recorded; wire kind falls back to the default.
        assert_eq!(message.fields[0].detail, fieldwire_schema::NumericDetail::Signed);
        assert_eq!(message.fields[0].wire_kind(), WireKind::UInt32);
    }

    #[test]
    fn test_wire_kind_fold() {
        let mut delta = field("delta", TypeExpr::Name("int64".into()));
        delta.detail = Some(fieldwire_schema::NumericDetail::SignedFixed);
        let spec = spec(vec![delta], vec![]);

        let mut diagnostics = Diagnostics::new();
        let message = emit_message(&spec, &mut diagnostics);
        assert!(diagnostics.items().is_empty());
        assert_eq!(message.fields[0].wire_kind(), WireKind::Sfixed64);
    }

    #[test]
    fn test_map_emission() {
        let spec = spec(
            vec![field(
                "bookNumber",
                TypeExpr::Map(
                    Box::new(TypeExpr::Name("string".into())),
                    Box::new(TypeExpr::Name("string".into())),
                ),
            )],
            vec![],
        );
        let mut diagnostics = Diagnostics::new();
        let message = emit_message(&spec, &mut diagnostics);

        let field = &message.fields[0];
        assert_eq!(
            field.ty.cardinality,
            Cardinality::Map(ScalarKind::String, ScalarKind::String)
        );
        assert_eq!(
            field.map_wire_kinds(),
            Some((WireKind::String, WireKind::String))
        );
        assert_eq!(field.wire_name, WireName::Standard("book_number".to_string()));
    }

    #[test]
    fn test_emission_is_deterministic() {
        let build = || {
            spec(
                vec![
                    field("a", TypeExpr::Name("uint32".into())),
                    field("b", TypeExpr::Name("string".into())),
                ],
                vec![1],
            )
        };
        let mut d1 = Diagnostics::new();
        let mut d2 = Diagnostics::new();
        assert_eq!(emit_message(&build(), &mut d1), emit_message(&build(), &mut d2));
    }
}
