//! Centralized identifier and value quoting.
//!
//! All SQL assembled by this crate routes identifiers and string values
//! through this module. Identifiers cannot be passed as parameters in
//! prepared statements, so the safe way to build dynamic catalog/DDL SQL
//! is validate-then-quote with escape-by-doubling. Scattered ad hoc quoting
//! helpers are exactly how injection slips in when table and column names
//! originate from migration code.

use crate::error::{AdapterError, Result};

/// Maximum identifier length accepted by the engine.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier before quoting.
///
/// Rejects empty identifiers, identifiers containing null bytes, and
/// identifiers exceeding the engine's maximum length.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AdapterError::InvalidArgument(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(AdapterError::InvalidArgument(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(AdapterError::InvalidArgument(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote an identifier with double quotes, doubling embedded quotes.
pub fn quote_ident(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote a possibly owner-qualified table name, quoting each part.
pub fn quote_table(name: &str) -> Result<String> {
    match split_owner_qualified(name) {
        (Some(owner), bare) => Ok(format!("{}.{}", quote_ident(owner)?, quote_ident(bare)?)),
        (None, bare) => quote_ident(bare),
    }
}

/// Qualify a bare object name with its owner, quoting both parts.
pub fn qualify(owner: &str, name: &str) -> Result<String> {
    Ok(format!("{}.{}", quote_ident(owner)?, quote_ident(name)?))
}

/// Split an owner-qualified name into `(owner, bare_name)`.
///
/// A name without a dot has no owner part.
pub fn split_owner_qualified(name: &str) -> (Option<&str>, &str) {
    match name.split_once('.') {
        Some((owner, bare)) => (Some(owner), bare),
        None => (None, name),
    }
}

/// Quote a string value as a SQL literal, doubling embedded single quotes.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("accounts").is_ok());
        assert!(validate_identifier("my_table").is_ok());
        assert!(validate_identifier("Table123").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        assert!(validate_identifier("").is_err());
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        assert!(validate_identifier("table\0name").is_err());
    }

    #[test]
    fn test_validate_identifier_rejects_too_long() {
        let long_name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(validate_identifier(&long_name).is_err());
        let max_name = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier(&max_name).is_ok());
    }

    #[test]
    fn test_quote_ident_escapes_double_quote() {
        assert_eq!(quote_ident("accounts").unwrap(), "\"accounts\"");
        assert_eq!(quote_ident("a\"b").unwrap(), "\"a\"\"b\"");
    }

    #[test]
    fn test_quote_table_qualified() {
        assert_eq!(
            quote_table("DBA.accounts").unwrap(),
            "\"DBA\".\"accounts\""
        );
        assert_eq!(quote_table("accounts").unwrap(), "\"accounts\"");
    }

    #[test]
    fn test_split_owner_qualified() {
        assert_eq!(
            split_owner_qualified("DBA.accounts"),
            (Some("DBA"), "accounts")
        );
        assert_eq!(split_owner_qualified("accounts"), (None, "accounts"));
    }

    #[test]
    fn test_quote_string_escapes() {
        assert_eq!(quote_string("abc"), "'abc'");
        assert_eq!(quote_string("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_injection_attempt_safely_quoted() {
        let quoted = quote_ident("Robert\"; DROP TABLE Students;--").unwrap();
        assert_eq!(quoted, "\"Robert\"\"; DROP TABLE Students;--\"");
    }
}
