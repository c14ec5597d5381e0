use crate::emitter::emit_message;
use crate::error::{CompileError, Diagnostic, Diagnostics};
use crate::parser::parse_schema;
use crate::tokenizer::tokenize_schema;
use crate::types::Schema;
use fieldwire_schema::GeneratedMessage;
use serde::Serialize;

/// The compiler's result: one descriptor per message plus every non-fatal
/// finding collected along the way.
#[derive(Debug, Serialize)]
pub struct CompileOutput {
    pub messages: Vec<GeneratedMessage>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile schema text end to end: tokenize, parse, then run every message
/// through the emission pipeline.
pub fn compile_schema(text: &str) -> Result<CompileOutput, CompileError> {
    let tokens = tokenize_schema(text)?;
    let schema = parse_schema(&tokens)?;
    compile_parsed(&schema)
}

/// Compile an already-parsed schema. Per-field problems are collected as
/// diagnostics and the pipeline keeps going; fatal findings (explicit tag
/// collisions, reserved explicit tags) fail the whole schema once every
/// message has been examined.
pub fn compile_parsed(schema: &Schema) -> Result<CompileOutput, CompileError> {
    let mut diagnostics = Diagnostics::new();
    let messages: Vec<GeneratedMessage> = schema
        .messages
        .iter()
        .map(|message| emit_message(message, &mut diagnostics))
        .collect();

    if diagnostics.has_fatal() {
        return Err(CompileError::Invalid {
            report: diagnostics.into_report(),
        });
    }

    Ok(CompileOutput {
        messages,
        diagnostics: diagnostics.into_items(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use fieldwire_schema::WireName;

    #[test]
    fn test_end_to_end_compile() {
        let output = compile_schema(
            "message LibraryCard {\n\
             \x20 string name;\n\
             \x20 uint32 age;\n\
             \x20 bool isMember;\n\
             }",
        )
        .unwrap();

        assert!(output.diagnostics.is_empty());
        let message = &output.messages[0];
        assert_eq!(message.name, "LibraryCard");
        let tags: Vec<u32> = message.fields.iter().map(|f| f.tag).collect();
        assert_eq!(tags, vec![1, 2, 3]);
        assert_eq!(
            message.fields[2].wire_name,
            WireName::Standard("is_member".to_string())
        );
    }

    #[test]
    fn test_bad_field_is_a_diagnostic_not_an_error() {
        let output = compile_schema(
            "message Card {\n\
             \x20 Account account;\n\
             \x20 string name;\n\
             }",
        )
        .unwrap();

        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].severity, Severity::Error);
        assert_eq!(output.messages[0].fields.len(), 1);
    }

    #[test]
    fn test_fatal_diagnostics_fail_the_schema() {
        let err = compile_schema(
            "message Card {\n\
             \x20 string a = 4;\n\
             \x20 string b = 4;\n\
             }",
        )
        .unwrap_err();

        match err {
            CompileError::Invalid { report } => {
                assert!(report.items.iter().any(|d| d.severity == Severity::Fatal));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors_propagate() {
        assert!(matches!(
            compile_schema("message {"),
            Err(CompileError::ParseError { .. })
        ));
    }
}
