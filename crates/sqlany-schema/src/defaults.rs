//! Classification of raw catalog default values.
//!
//! The catalog stores a column default as raw text. A default is either a
//! literal (numeric, or a single-quoted string) passed through unchanged,
//! or a computed expression invoking an engine builtin, normalized to
//! upper case (e.g. `current timestamp` → `CURRENT TIMESTAMP`).

use std::sync::LazyLock;

use regex::Regex;

use crate::core::schema::ColumnDefault;

/// Optional sign, digits, optional fraction, optional exponent.
static NUMERIC_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+(\.\d*)?([eE][+-]?\d+)?$").unwrap());

/// Single-quoted string with doubled-quote escapes.
static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^'(?:[^']|'')*'$").unwrap());

/// Classify raw catalog default text.
///
/// Returns `None` when the column has no default at all.
pub fn classify_default(raw: Option<&str>) -> Option<ColumnDefault> {
    let raw = raw?;
    if NUMERIC_LITERAL.is_match(raw) || STRING_LITERAL.is_match(raw) {
        Some(ColumnDefault::Literal(raw.to_string()))
    } else {
        Some(ColumnDefault::Function(raw.to_uppercase()))
    }
}
