use crate::error::CompileError;
use crate::utils::{parse_error, quote};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref TOKEN_REGEX:   Regex = Regex::new(
        r"((?:-|\b)\d+\b|[=;{}<>,]|\[(?:signedFixed|signed|fixed|default)\]|\b[A-Za-z_][A-Za-z0-9_]*\b|//.*|\s+)"
    ).unwrap();
    pub static ref WHITESPACE_RX: Regex = Regex::new(r"^(//.*|\s+)$").unwrap();
}

#[derive(Debug, PartialEq)]
pub struct Token {
    pub text:   String,
    pub line:   usize,
    pub column: usize,
}

/// Split schema text into tokens with line/column positions. Anything the
/// token pattern cannot account for is a parse error.
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut last_end = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let end   = mat.end();
        let part  = mat.as_str();

        if start > last_end {
            let unexpected = &text[last_end..start];
            return Err(parse_error(
                &format!("Syntax error: {}", quote(unexpected)),
                line,
                column,
            ));
        }

        if !WHITESPACE_RX.is_match(part) && !part.starts_with("//") {
            tokens.push(Token {
                text:   part.to_string(),
                line,
                column,
            });
        }

        // Update line/column
        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.len() + 1;
            }
        } else {
            column += part.len();
        }

        last_end = end;
    }

    if last_end != text.len() {
        let unexpected = &text[last_end..];
        return Err(parse_error(
            &format!("Syntax error: {}", quote(unexpected)),
            line,
            column,
        ));
    }

    // Append EOF token
    tokens.push(Token {
        text:   "".to_string(),
        line,
        column,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_field() {
        let input = "uint32 age = 2;";
        let expected = vec![
            Token { text: "uint32".into(), line: 1, column: 1 },
            Token { text: "age".into(),    line: 1, column: 8 },
            Token { text: "=".into(),      line: 1, column: 12 },
            Token { text: "2".into(),      line: 1, column: 14 },
            Token { text: ";".into(),      line: 1, column: 15 },
            Token { text: "".into(),       line: 1, column: 16 },
        ];
        let got = tokenize_schema(input).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_tokenize_detail_attribute() {
        let input = "[signedFixed]";
        let expected = vec![
            Token { text: "[signedFixed]".into(), line: 1, column: 1 },
            Token { text: "".into(),              line: 1, column: 14 },
        ];
        let got = tokenize_schema(input).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_tokenize_map_punctuation() {
        let input = "map<string, uint64>";
        let tokens = tokenize_schema(input).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["map", "<", "string", ",", "uint64", ">", ""]);
    }

    #[test]
    fn test_tokenize_tracks_lines() {
        let input = "message M {\n    bool ok;\n}";
        let tokens = tokenize_schema(input).unwrap();
        let ok = tokens.iter().find(|t| t.text == "ok").unwrap();
        assert_eq!(ok.line, 2);
        assert_eq!(ok.column, 10);
    }

    #[test]
    fn test_tokenize_comments_skipped() {
        let input = "// header\nbool ok; // trailing\n";
        let tokens = tokenize_schema(input).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["bool", "ok", ";", ""]);
    }

    #[test]
    fn test_tokenize_unexpected_text() {
        let input = "bool ok = 1 @";
        let err = tokenize_schema(input).unwrap_err();
        assert!(
            matches!(err, CompileError::ParseError { .. }),
            "expected a ParseError but got {:?}",
            err
        );
    }
}
