use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    /// A declaration kind the compiler refuses outright (class/struct/enum
    /// and friends). Rejects the whole schema, not a single field.
    #[error("Unsupported declaration at line {line}, column {column}: {msg}")]
    UnsupportedSyntax {
        msg:    String,
        line:   usize,
        column: usize,
    },

    /// An explicit-tag annotation whose argument is absent or not a
    /// positive integer.
    #[error("Invalid tag argument at line {line}, column {column}: {msg}")]
    MissingTagArgument {
        msg:    String,
        line:   usize,
        column: usize,
    },

    /// The schema parsed but fatal validation diagnostics were collected.
    #[error("Schema is invalid:\n{report}")]
    Invalid { report: DiagnosticReport },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Reported, field still emitted (e.g. an incompatible numeric detail).
    Warning,
    /// Reported, field excluded from every generated artifact.
    Error,
    /// Reported, and the whole schema fails once the pipeline finishes.
    Fatal,
}

/// One classification/validation finding, anchored at a source position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line:     usize,
    pub column:   usize,
    pub message:  String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error | Severity::Fatal => "error",
        };
        write!(
            f,
            "{} at line {}, column {}: {}",
            label, self.line, self.column, self.message
        )
    }
}

/// Best-effort collector: per-field problems land here and the pipeline
/// keeps going, so a schema author sees every problem in one pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn push(&mut self, severity: Severity, line: usize, column: usize, message: String) {
        self.items.push(Diagnostic {
            severity,
            line,
            column,
            message,
        });
    }

    pub fn warning(&mut self, line: usize, column: usize, message: String) {
        self.push(Severity::Warning, line, column, message);
    }

    pub fn error(&mut self, line: usize, column: usize, message: String) {
        self.push(Severity::Error, line, column, message);
    }

    pub fn fatal(&mut self, line: usize, column: usize, message: String) {
        self.push(Severity::Fatal, line, column, message);
    }

    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Fatal)
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_report(self) -> DiagnosticReport {
        DiagnosticReport { items: self.items }
    }

    pub fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }
}

/// The rendered form of a failed schema's findings, carried inside
/// [`CompileError::Invalid`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub items: Vec<Diagnostic>,
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}
