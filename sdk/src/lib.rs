//! fieldwire
//!
//! This crate is the user-facing surface over the Fieldwire compiler and
//! runtime.
//!
//! - `compile_schema` / `generate_rust` (re-exported from the compiler)
//! - Message descriptors and the dynamic wire seams (re-exported from the
//!   schema crate)
//! - Helpers for rendering descriptors as JSON

pub use fieldwire_compiler::{compile_schema, generate_rust, CompileError, CompileOutput};
pub use fieldwire_schema::{
    FieldDecoder, FieldVisitor, GeneratedField, GeneratedMessage, RecordBuffer, ScalarDecoder,
    ScalarVisitor, UnknownFields, WireError,
};

/// Compile schema text and render the resulting descriptors and diagnostics
/// as pretty-printed JSON.
pub fn describe_to_json(text: &str) -> Result<String, CompileError> {
    let output = fieldwire_compiler::compile_schema(text)?;
    Ok(serde_json::to_string_pretty(&output).unwrap())
}

pub mod error {
    pub use fieldwire_compiler::error::{CompileError, Diagnostic, DiagnosticReport, Severity};
}

pub mod schema {
    pub use fieldwire_schema::{
        Cardinality, ClassifiedType, GeneratedField, GeneratedMessage, NumericDetail, ScalarKind,
        WireKind, WireName,
    };
}

pub mod runtime {
    pub use fieldwire_schema::{
        FieldDecoder, FieldValue, FieldVisitor, MapScalar, MessageValue, RecordBuffer,
        ScalarDecoder, ScalarVisitor, UnknownFields, WireError,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_to_json() {
        let json = describe_to_json(
            "message LibraryCard {\n\
             \x20 string name;\n\
             \x20 bool isMember;\n\
             }",
        )
        .unwrap();

        assert!(json.contains("\"name\": \"LibraryCard\""));
        assert!(json.contains("\"tag\": 2"));
        assert!(json.contains("\"Standard\": \"is_member\""));
        assert!(json.contains("\"diagnostics\": []"));
    }

    #[test]
    fn test_describe_to_json_propagates_errors() {
        assert!(matches!(
            describe_to_json("struct Account { }"),
            Err(CompileError::UnsupportedSyntax { .. })
        ));
    }
}
