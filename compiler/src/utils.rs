use crate::error::CompileError;

pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap()
}

pub fn parse_error(msg: &str, line: usize, column: usize) -> CompileError {
    CompileError::ParseError {
        msg: msg.to_string(),
        line,
        column,
    }
}
