use crate::{
    error::CompileError,
    tokenizer::Token,
    types::{FieldSpec, MessageSpec, Schema, TypeExpr},
    utils::{parse_error, quote},
};
use fieldwire_schema::NumericDetail;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER:        Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref EQUALS:            Regex = Regex::new(r"^=$").unwrap();
    static ref SEMICOLON:         Regex = Regex::new(r"^;$").unwrap();
    static ref COMMA:             Regex = Regex::new(r"^,$").unwrap();
    static ref INTEGER:           Regex = Regex::new(r"^-?\d+$").unwrap();
    static ref LEFT_BRACE:        Regex = Regex::new(r"^\{$").unwrap();
    static ref RIGHT_BRACE:       Regex = Regex::new(r"^\}$").unwrap();
    static ref LEFT_ANGLE:        Regex = Regex::new(r"^<$").unwrap();
    static ref RIGHT_ANGLE:       Regex = Regex::new(r"^>$").unwrap();
    static ref DETAIL_TOKEN:      Regex = Regex::new(r"^\[(signed|signedFixed|fixed|default)\]$").unwrap();
    static ref MESSAGE_KEYWORD:   Regex = Regex::new(r"^message$").unwrap();
    static ref RESERVED_KEYWORD:  Regex = Regex::new(r"^reserved$").unwrap();
    static ref OPTIONAL_KEYWORD:  Regex = Regex::new(r"^optional$").unwrap();
    static ref REPEATED_KEYWORD:  Regex = Regex::new(r"^repeated$").unwrap();
    static ref MAP_KEYWORD:       Regex = Regex::new(r"^map$").unwrap();
    static ref EOF:               Regex = Regex::new(r"^$").unwrap();
}

fn current_token<'a>(tokens: &'a [Token], index: usize) -> &'a Token {
    tokens.get(index).expect("Unexpected end of tokens")
}

fn eat(tokens: &[Token], index: &mut usize, test: &Regex) -> bool {
    if test.is_match(&current_token(tokens, *index).text) {
        *index += 1;
        true
    } else {
        false
    }
}

fn expect(
    tokens: &[Token],
    index: &mut usize,
    test: &Regex,
    expected: &str,
) -> Result<(), CompileError> {
    if !eat(tokens, index, test) {
        let tok = current_token(tokens, *index);
        return Err(parse_error(
            &format!("Expected {} but found {}", expected, quote(&tok.text)),
            tok.line,
            tok.column,
        ));
    }
    Ok(())
}

fn parse_type(tokens: &[Token], index: &mut usize) -> Result<TypeExpr, CompileError> {
    if eat(tokens, index, &OPTIONAL_KEYWORD) {
        let inner = parse_inner_type(tokens, index)?;
        return Ok(TypeExpr::Optional(Box::new(inner)));
    }
    parse_inner_type(tokens, index)
}

// The parser accepts nestings the type universe forbids (repeated of
// repeated, map of map); the classifier rejects them per field so every
// broken field in a schema gets its own diagnostic.
fn parse_inner_type(tokens: &[Token], index: &mut usize) -> Result<TypeExpr, CompileError> {
    if eat(tokens, index, &REPEATED_KEYWORD) {
        let element = parse_inner_type(tokens, index)?;
        return Ok(TypeExpr::Repeated(Box::new(element)));
    }
    if eat(tokens, index, &MAP_KEYWORD) {
        expect(tokens, index, &LEFT_ANGLE, "\"<\"")?;
        let key = parse_inner_type(tokens, index)?;
        expect(tokens, index, &COMMA, "\",\"")?;
        let value = parse_inner_type(tokens, index)?;
        expect(tokens, index, &RIGHT_ANGLE, "\">\"")?;
        return Ok(TypeExpr::Map(Box::new(key), Box::new(value)));
    }
    let tok = current_token(tokens, *index);
    expect(tokens, index, &IDENTIFIER, "type name")?;
    Ok(TypeExpr::Name(tok.text.clone()))
}

/// A malformed reservation entry aborts the whole schema; there is no
/// sensible partial interpretation of a reservation list.
fn parse_reserved(
    tokens: &[Token],
    index: &mut usize,
    reserved: &mut Vec<u32>,
) -> Result<(), CompileError> {
    loop {
        let tok = current_token(tokens, *index);
        expect(tokens, index, &INTEGER, "reserved field number")?;
        let id = tok.text.parse::<u32>().map_err(|_| {
            parse_error(
                &format!("Invalid reserved field number {}", quote(&tok.text)),
                tok.line,
                tok.column,
            )
        })?;
        reserved.push(id);
        if !eat(tokens, index, &COMMA) {
            break;
        }
    }
    expect(tokens, index, &SEMICOLON, "\";\"")?;
    Ok(())
}

fn parse_explicit_tag(tokens: &[Token], index: &mut usize) -> Result<Option<u32>, CompileError> {
    if !eat(tokens, index, &EQUALS) {
        return Ok(None);
    }
    let tok = current_token(tokens, *index);
    if !eat(tokens, index, &INTEGER) {
        return Err(CompileError::MissingTagArgument {
            msg:    format!("Expected field number but found {}", quote(&tok.text)),
            line:   tok.line,
            column: tok.column,
        });
    }
    match tok.text.parse::<u32>() {
        Ok(tag) if tag >= 1 => Ok(Some(tag)),
        _ => Err(CompileError::MissingTagArgument {
            msg:    format!("Field number {} must be a positive integer", quote(&tok.text)),
            line:   tok.line,
            column: tok.column,
        }),
    }
}

fn detail_from_token(text: &str) -> Option<NumericDetail> {
    match text {
        "[default]" => Some(NumericDetail::Default),
        "[signed]" => Some(NumericDetail::Signed),
        "[signedFixed]" => Some(NumericDetail::SignedFixed),
        "[fixed]" => Some(NumericDetail::Fixed),
        _ => None,
    }
}

pub fn parse_schema(tokens: &[Token]) -> Result<Schema, CompileError> {
    let mut messages = Vec::new();
    let mut index = 0;

    while index < tokens.len() && !eat(tokens, &mut index, &EOF) {
        if !eat(tokens, &mut index, &MESSAGE_KEYWORD) {
            // Reference-type and other non-message declarations are rejected
            // for the whole schema.
            let tok = current_token(tokens, index);
            return Err(CompileError::UnsupportedSyntax {
                msg:    format!(
                    "{} declarations are not supported; only \"message\" records can be compiled",
                    quote(&tok.text)
                ),
                line:   tok.line,
                column: tok.column,
            });
        }

        let name_tok = current_token(tokens, index);
        expect(tokens, &mut index, &IDENTIFIER, "identifier")?;
        expect(tokens, &mut index, &LEFT_BRACE, "\"{\"")?;

        let mut fields = Vec::new();
        let mut reserved = Vec::new();

        while !eat(tokens, &mut index, &RIGHT_BRACE) {
            if eat(tokens, &mut index, &RESERVED_KEYWORD) {
                parse_reserved(tokens, &mut index, &mut reserved)?;
                continue;
            }

            let declared_type = parse_type(tokens, &mut index)?;

            let f_tok = current_token(tokens, index);
            expect(tokens, &mut index, &IDENTIFIER, "identifier")?;

            let explicit_tag = parse_explicit_tag(tokens, &mut index)?;

            let detail_tok = current_token(tokens, index);
            let detail = if DETAIL_TOKEN.is_match(&detail_tok.text) {
                index += 1;
                detail_from_token(&detail_tok.text)
            } else {
                None
            };

            expect(tokens, &mut index, &SEMICOLON, "\";\"")?;

            fields.push(FieldSpec {
                name:          f_tok.text.clone(),
                line:          f_tok.line,
                column:        f_tok.column,
                declared_type,
                explicit_tag,
                detail,
            });
        }

        messages.push(MessageSpec {
            name:   name_tok.text.clone(),
            line:   name_tok.line,
            column: name_tok.column,
            fields,
            reserved,
        });
    }

    Ok(Schema { messages })
}
