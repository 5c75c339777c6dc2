//! SQL identifier rules for tables and columns touched by schema patches.
//!
//! DDL statements cannot bind identifiers as parameters, so every table or
//! column name is checked here before it is spliced into SQL text.

use crate::error::CoreError;

/// PostgreSQL truncates identifiers longer than this (NAMEDATALEN - 1).
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Check that `value` is a plain, unquoted, lower-case SQL identifier.
///
/// Accepted: `[a-z_][a-z0-9_]*`, at most [`MAX_IDENTIFIER_LEN`] bytes.
/// Upper-case letters are rejected because `information_schema` stores
/// unquoted names folded to lower case; allowing them would make the
/// existence check and the DDL disagree.
///
/// # Examples
///
/// ```
/// use backstore_core::naming::validate_identifier;
///
/// assert!(validate_identifier("terms_accepted").is_ok());
/// assert!(validate_identifier("users; DROP TABLE users").is_err());
/// ```
pub fn validate_identifier(value: &str) -> Result<(), CoreError> {
    let invalid = |reason| CoreError::InvalidIdentifier {
        value: value.to_string(),
        reason,
    };

    let first = value.chars().next().ok_or_else(|| invalid("must not be empty"))?;

    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(invalid("longer than 63 bytes"));
    }
    if !(first.is_ascii_lowercase() || first == '_') {
        return Err(invalid("must start with a lower-case letter or underscore"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(invalid("may only contain a-z, 0-9 and underscore"));
    }

    Ok(())
}

/// Wrap an already-validated identifier in double quotes.
pub fn quote_identifier(value: &str) -> String {
    format!("\"{value}\"")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("terms_accepted").is_ok());
        assert!(validate_identifier("_internal").is_ok());
        assert!(validate_identifier("table2").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_matches!(
            validate_identifier(""),
            Err(CoreError::InvalidIdentifier { reason: "must not be empty", .. })
        );
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(validate_identifier("1users").is_err());
    }

    #[test]
    fn rejects_upper_case() {
        assert!(validate_identifier("Users").is_err());
        assert!(validate_identifier("termsAccepted").is_err());
    }

    #[test]
    fn rejects_injection_attempts() {
        assert!(validate_identifier("users; DROP TABLE users").is_err());
        assert!(validate_identifier("users\"").is_err());
        assert!(validate_identifier("a b").is_err());
        assert!(validate_identifier("a-b").is_err());
    }

    #[test]
    fn rejects_overlong() {
        assert!(validate_identifier(&"a".repeat(MAX_IDENTIFIER_LEN)).is_ok());
        assert!(validate_identifier(&"a".repeat(MAX_IDENTIFIER_LEN + 1)).is_err());
    }

    #[test]
    fn error_message_names_the_value() {
        let err = validate_identifier("Bad").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid identifier \"Bad\": must start with a lower-case letter or underscore"
        );
    }

    #[test]
    fn quotes_identifier() {
        assert_eq!(quote_identifier("users"), "\"users\"");
    }
}
