use crate::names::to_snake_case;
use fieldwire_schema::{Cardinality, GeneratedField, GeneratedMessage, ScalarKind};

/// Maps a scalar kind to its Rust storage type.
fn rust_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Int32 => "i32",
        ScalarKind::UInt32 => "u32",
        ScalarKind::Int64 => "i64",
        ScalarKind::UInt64 => "u64",
        ScalarKind::Bool => "bool",
        ScalarKind::Float => "f32",
        ScalarKind::Double => "f64",
        ScalarKind::String => "String",
        ScalarKind::Bytes => "Vec<u8>",
    }
}

/// Escapes Rust reserved keywords by suffixing with an underscore.
fn escape_rust_keyword(s: &str) -> String {
    let keywords = [
        "as", "break", "const", "continue", "crate", "else",
        "enum", "extern", "false", "fn", "for", "if", "impl",
        "in", "let", "loop", "match", "mod", "move", "mut",
        "pub", "ref", "return", "self", "Self", "static",
        "struct", "super", "trait", "true", "type", "unsafe",
        "use", "where", "while",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

fn rust_field_name(field: &GeneratedField) -> String {
    escape_rust_keyword(&to_snake_case(&field.name))
}

/// Whether the field stores through a nullable backing slot. Presence for
/// repeated and map fields is emptiness, so `optional` only changes the
/// storage of singular fields.
fn has_backing_slot(field: &GeneratedField) -> bool {
    field.ty.optional && matches!(field.ty.cardinality, Cardinality::Singular(_))
}

fn storage_type(field: &GeneratedField) -> String {
    match field.ty.cardinality {
        Cardinality::Singular(kind) if field.ty.optional => {
            format!("Option<{}>", rust_type(kind))
        }
        Cardinality::Singular(kind) => rust_type(kind).to_string(),
        Cardinality::Repeated(kind) => format!("Vec<{}>", rust_type(kind)),
        Cardinality::Map(key, value) => {
            format!("HashMap<{}, {}>", rust_type(key), rust_type(value))
        }
    }
}

fn has_map_field(message: &GeneratedMessage) -> bool {
    message
        .fields
        .iter()
        .any(|f| matches!(f.ty.cardinality, Cardinality::Map(_, _)))
}

/// Generates the storage struct. Optional fields get a private backing slot
/// behind accessors; everything else is a public field. The unknown-field
/// carrier is always last.
fn generate_struct(message: &GeneratedMessage) -> String {
    let struct_name = escape_rust_keyword(&message.name);
    let mut fields = Vec::new();

    for field in &message.fields {
        let visibility = if has_backing_slot(field) { "" } else { "pub " };
        fields.push(format!(
            "    {}{}: {},",
            visibility,
            rust_field_name(field),
            storage_type(field)
        ));
    }
    fields.push("    pub unknown_fields: UnknownFields,".to_string());

    format!(
        "#[derive(Debug, Clone, Default)]\npub struct {} {{\n{}\n}}\n",
        struct_name,
        fields.join("\n")
    )
}

/// Generates the presence accessors for one optional field: a
/// zero-substituting getter plus `set_`/`has_`/`clear_`.
fn generate_accessors(field: &GeneratedField) -> String {
    let name = rust_field_name(field);
    let kind = match field.ty.cardinality {
        Cardinality::Singular(kind) => kind,
        _ => unreachable!("accessors are only generated for singular fields"),
    };
    let ty = rust_type(kind);

    let getter = match kind {
        ScalarKind::String => format!(
            "    pub fn {}(&self) -> &str {{\n        self.{}.as_deref().unwrap_or_default()\n    }}",
            name, name
        ),
        ScalarKind::Bytes => format!(
            "    pub fn {}(&self) -> &[u8] {{\n        self.{}.as_deref().unwrap_or_default()\n    }}",
            name, name
        ),
        _ => format!(
            "    pub fn {}(&self) -> {} {{\n        self.{}.unwrap_or_default()\n    }}",
            name, ty, name
        ),
    };

    format!(
        "{}\n\n    pub fn set_{}(&mut self, value: {}) {{\n        self.{} = Some(value);\n    }}\n\n    pub fn has_{}(&self) -> bool {{\n        self.{}.is_some()\n    }}\n\n    pub fn clear_{}(&mut self) {{\n        self.{} = None;\n    }}",
        getter, name, ty, name, name, name, name, name
    )
}

/// Generates the tag → wire-name association used for text-format lookup.
fn generate_name_map(message: &GeneratedMessage) -> String {
    let entries: Vec<String> = message
        .fields
        .iter()
        .map(|f| format!("({}, \"{}\")", f.tag, f.wire_name.proto()))
        .collect();
    format!(
        "    pub const NAME_MAP: &'static [(u32, &'static str)] = &[{}];",
        entries.join(", ")
    )
}

fn decode_arm(field: &GeneratedField) -> String {
    let name = rust_field_name(field);
    match field.ty.cardinality {
        Cardinality::Map(_, _) => format!(
            "            {} => decoder.decode_map_typed_field({}, &mut self.{})?,",
            field.tag, field.tag, name
        ),
        Cardinality::Repeated(_) => format!(
            "            {} => decoder.decode_repeated_{}_field({}, &mut self.{})?,",
            field.tag,
            field.wire_kind().method_suffix(),
            field.tag,
            name
        ),
        Cardinality::Singular(_) if has_backing_slot(field) => format!(
            "            {} => decoder.decode_optional_{}_field({}, &mut self.{})?,",
            field.tag,
            field.wire_kind().method_suffix(),
            field.tag,
            name
        ),
        Cardinality::Singular(_) => format!(
            "            {} => decoder.decode_singular_{}_field({}, &mut self.{})?,",
            field.tag,
            field.wire_kind().method_suffix(),
            field.tag,
            name
        ),
    }
}

/// Generates the decode routine: a tag-dispatch loop that preserves
/// unrecognized tags instead of dropping them.
fn generate_decode(message: &GeneratedMessage) -> String {
    let arms: Vec<String> = message.fields.iter().map(decode_arm).collect();
    format!(
        "    pub fn decode_message<D: ScalarDecoder + ?Sized>(&mut self, decoder: &mut D) -> Result<(), WireError> {{\n        while let Some(tag) = decoder.next_field_tag()? {{\n            match tag {{\n{}\n                _ => decoder.decode_unknown_field(tag, &mut self.unknown_fields)?,\n            }}\n        }}\n        Ok(())\n    }}",
        arms.join("\n")
    )
}

fn traverse_step(field: &GeneratedField) -> String {
    let name = rust_field_name(field);
    let suffix = field.wire_kind().method_suffix();
    match field.ty.cardinality {
        Cardinality::Map(_, _) => format!(
            "        if !self.{}.is_empty() {{\n            visitor.visit_map_typed_field(&self.{}, {})?;\n        }}",
            name, name, field.tag
        ),
        Cardinality::Repeated(_) => format!(
            "        if !self.{}.is_empty() {{\n            visitor.visit_repeated_{}_field(&self.{}, {})?;\n        }}",
            name, suffix, name, field.tag
        ),
        Cardinality::Singular(_) if has_backing_slot(field) => format!(
            "        if let Some(value) = &self.{} {{\n            visitor.visit_singular_{}_field(value, {})?;\n        }}",
            name, suffix, field.tag
        ),
        Cardinality::Singular(kind) => {
            let guard = match kind {
                ScalarKind::Bool => format!("self.{}", name),
                ScalarKind::Float | ScalarKind::Double => format!("self.{} != 0.0", name),
                ScalarKind::String | ScalarKind::Bytes => format!("!self.{}.is_empty()", name),
                _ => format!("self.{} != 0", name),
            };
            format!(
                "        if {} {{\n            visitor.visit_singular_{}_field(&self.{}, {})?;\n        }}",
                guard, suffix, name, field.tag
            )
        }
    }
}

/// Generates the traverse routine: fields in declaration order, zero values
/// suppressed, present optionals always emitted, unknown fields flushed
/// last.
fn generate_traverse(message: &GeneratedMessage) -> String {
    let steps: Vec<String> = message.fields.iter().map(traverse_step).collect();
    format!(
        "    pub fn traverse<V: ScalarVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), WireError> {{\n{}\n        self.unknown_fields.traverse(visitor)?;\n        Ok(())\n    }}",
        steps.join("\n")
    )
}

/// Generates the equality impl: every stored field, unknown fields last.
fn generate_eq(message: &GeneratedMessage) -> String {
    let struct_name = escape_rust_keyword(&message.name);
    let mut clauses: Vec<String> = message
        .fields
        .iter()
        .map(|f| {
            let name = rust_field_name(f);
            format!("self.{} == other.{}", name, name)
        })
        .collect();
    clauses.push("self.unknown_fields == other.unknown_fields".to_string());

    format!(
        "impl PartialEq for {} {{\n    fn eq(&self, other: &Self) -> bool {{\n        {}\n    }}\n}}\n",
        struct_name,
        clauses.join("\n            && ")
    )
}

fn generate_message(message: &GeneratedMessage) -> String {
    let struct_name = escape_rust_keyword(&message.name);
    let mut sections = Vec::new();

    sections.push(generate_struct(message));

    let mut impl_items = vec![generate_name_map(message)];
    for field in message.fields.iter().filter(|f| has_backing_slot(f)) {
        impl_items.push(generate_accessors(field));
    }
    impl_items.push(generate_decode(message));
    impl_items.push(generate_traverse(message));
    sections.push(format!(
        "impl {} {{\n{}\n}}\n",
        struct_name,
        impl_items.join("\n\n")
    ));

    sections.push(generate_eq(message));
    sections.join("\n")
}

/// Compiles message descriptors into Rust source as a string. The output is
/// a pure function of the descriptors, so regenerating an unchanged schema
/// yields byte-identical source.
pub fn generate_rust(messages: &[GeneratedMessage]) -> String {
    let mut rust_code: Vec<String> = Vec::new();

    rust_code.push("// Generated file, do not edit.".to_string());
    rust_code.push("".to_string());
    if messages.iter().any(has_map_field) {
        rust_code.push("use std::collections::HashMap;".to_string());
        rust_code.push("".to_string());
    }
    rust_code.push(
        "use fieldwire_schema::{ScalarDecoder, ScalarVisitor, UnknownFields, WireError};"
            .to_string(),
    );
    rust_code.push("".to_string());

    for message in messages {
        rust_code.push(generate_message(message));
    }

    rust_code.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwire_schema::{ClassifiedType, NumericDetail};

    fn field(
        name: &str,
        tag: u32,
        cardinality: Cardinality,
        optional: bool,
        detail: NumericDetail,
    ) -> GeneratedField {
        GeneratedField {
            name: name.to_string(),
            wire_name: crate::names::wire_name(name),
            tag,
            ty: ClassifiedType {
                cardinality,
                optional,
            },
            detail,
        }
    }

    fn card() -> GeneratedMessage {
        GeneratedMessage {
            name: "LibraryCard".to_string(),
            fields: vec![
                field(
                    "name",
                    1,
                    Cardinality::Singular(ScalarKind::String),
                    false,
                    NumericDetail::Default,
                ),
                field(
                    "age",
                    2,
                    Cardinality::Singular(ScalarKind::UInt32),
                    true,
                    NumericDetail::Default,
                ),
                field(
                    "borrowedBook",
                    3,
                    Cardinality::Repeated(ScalarKind::String),
                    false,
                    NumericDetail::Default,
                ),
                field(
                    "bookNumber",
                    4,
                    Cardinality::Map(ScalarKind::String, ScalarKind::String),
                    false,
                    NumericDetail::Default,
                ),
                field(
                    "delta",
                    5,
                    Cardinality::Singular(ScalarKind::Int32),
                    false,
                    NumericDetail::Signed,
                ),
            ],
        }
    }

    #[test]
    fn test_struct_storage() {
        let source = generate_rust(&[card()]);
        assert!(source.contains("pub struct LibraryCard {"));
        assert!(source.contains("    pub name: String,"));
        // Optional backing slot is private.
        assert!(source.contains("    age: Option<u32>,"));
        assert!(!source.contains("pub age: Option<u32>"));
        assert!(source.contains("    pub borrowed_book: Vec<String>,"));
        assert!(source.contains("    pub book_number: HashMap<String, String>,"));
        assert!(source.contains("    pub unknown_fields: UnknownFields,"));
        assert!(source.contains("use std::collections::HashMap;"));
    }

    #[test]
    fn test_optional_accessors() {
        let source = generate_rust(&[card()]);
        assert!(source.contains("pub fn age(&self) -> u32 {"));
        assert!(source.contains("self.age.unwrap_or_default()"));
        assert!(source.contains("pub fn set_age(&mut self, value: u32) {"));
        assert!(source.contains("pub fn has_age(&self) -> bool {"));
        assert!(source.contains("pub fn clear_age(&mut self) {"));
    }

    #[test]
    fn test_name_map_artifact() {
        let source = generate_rust(&[card()]);
        assert!(source.contains(
            "pub const NAME_MAP: &'static [(u32, &'static str)] = \
             &[(1, \"name\"), (2, \"age\"), (3, \"borrowed_book\"), (4, \"book_number\"), (5, \"delta\")];"
        ));
    }

    #[test]
    fn test_decode_dispatch() {
        let source = generate_rust(&[card()]);
        assert!(source.contains("1 => decoder.decode_singular_string_field(1, &mut self.name)?,"));
        assert!(source.contains("2 => decoder.decode_optional_uint32_field(2, &mut self.age)?,"));
        assert!(source
            .contains("3 => decoder.decode_repeated_string_field(3, &mut self.borrowed_book)?,"));
        assert!(source.contains("4 => decoder.decode_map_typed_field(4, &mut self.book_number)?,"));
        // Detail hint picks the sint32 primitive.
        assert!(source.contains("5 => decoder.decode_singular_sint32_field(5, &mut self.delta)?,"));
        assert!(source.contains("_ => decoder.decode_unknown_field(tag, &mut self.unknown_fields)?,"));
    }

    #[test]
    fn test_traverse_guards() {
        let source = generate_rust(&[card()]);
        // Zero suppression for regular fields, presence for optionals.
        assert!(source.contains("if !self.name.is_empty() {"));
        assert!(source.contains("if let Some(value) = &self.age {"));
        assert!(source.contains("visitor.visit_singular_uint32_field(value, 2)?;"));
        assert!(source.contains("if self.delta != 0 {"));
        assert!(source.contains("visitor.visit_singular_sint32_field(&self.delta, 5)?;"));
        // Unknown fields flushed after the known ones.
        assert!(source.contains("self.unknown_fields.traverse(visitor)?;"));
    }

    #[test]
    fn test_equality_includes_unknown_fields() {
        let source = generate_rust(&[card()]);
        assert!(source.contains("impl PartialEq for LibraryCard {"));
        assert!(source.contains("self.unknown_fields == other.unknown_fields"));
    }

    #[test]
    fn test_keyword_field_names_escaped() {
        let message = GeneratedMessage {
            name: "Flags".to_string(),
            fields: vec![field(
                "type",
                1,
                Cardinality::Singular(ScalarKind::Bool),
                false,
                NumericDetail::Default,
            )],
        };
        let source = generate_rust(&[message]);
        assert!(source.contains("pub type_: bool,"));
        assert!(source.contains("if self.type_ {"));
        // The wire name keeps the declared spelling.
        assert!(source.contains("(1, \"type\")"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_rust(&[card()]), generate_rust(&[card()]));
    }
}
