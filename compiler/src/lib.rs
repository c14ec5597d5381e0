//! Schema compiler: parses field declarations, classifies their types
//! against the protobuf scalar universe, allocates wire tags around
//! reservations, validates numeric wire details, and generates Rust message
//! code over the fieldwire runtime.

pub mod classify;
pub mod compiler;
pub mod detail;
pub mod emitter;
pub mod error;
pub mod gen_rust;
pub mod names;
pub mod parser;
pub mod tags;
pub mod tokenizer;
pub mod types;
pub mod utils;

pub use compiler::{compile_schema, CompileOutput};
pub use error::{CompileError, Diagnostic, DiagnosticReport, Severity};
pub use gen_rust::generate_rust;
