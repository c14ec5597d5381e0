use fieldwire_schema::WireName;

/// Derive the wire-format name for a declared field identifier.
///
/// Identifiers with no uppercase code point pass through verbatim as
/// `Same`; anything else is converted to snake_case and tagged `Standard`.
/// The mapping only feeds text/JSON-style field lookup; it never affects
/// numeric tag assignment.
pub fn wire_name(field_name: &str) -> WireName {
    if field_name.chars().any(|c| c.is_uppercase()) {
        WireName::Standard(to_snake_case(field_name))
    } else {
        WireName::Same(field_name.to_string())
    }
}

/// Insert `_` before each uppercase character (lower-cased), except when it
/// is the first character.
pub fn to_snake_case(s: &str) -> String {
    let mut snake = String::new();
    for c in s.chars() {
        if c.is_uppercase() {
            if !snake.is_empty() {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_names_pass_through() {
        assert_eq!(wire_name("name"), WireName::Same("name".to_string()));
        assert_eq!(wire_name("age"), WireName::Same("age".to_string()));
        assert_eq!(
            wire_name("snake_case_already"),
            WireName::Same("snake_case_already".to_string())
        );
    }

    #[test]
    fn test_camel_case_converted() {
        assert_eq!(
            wire_name("isMember"),
            WireName::Standard("is_member".to_string())
        );
        assert_eq!(
            wire_name("borrowedBook"),
            WireName::Standard("borrowed_book".to_string())
        );
        assert_eq!(
            wire_name("bookNumber"),
            WireName::Standard("book_number".to_string())
        );
    }

    #[test]
    fn test_leading_uppercase_gets_no_underscore() {
        assert_eq!(wire_name("Name"), WireName::Standard("name".to_string()));
    }

    #[test]
    fn test_consecutive_uppercase() {
        // Each uppercase letter gets its own underscore; acronyms are not
        // special-cased.
        assert_eq!(
            wire_name("sessionID"),
            WireName::Standard("session_i_d".to_string())
        );
    }
}
