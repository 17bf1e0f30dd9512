//! Parsing utilities for option strings
//!
//! Callers often carry formats and axes around as strings ("csr", "obs",
//! "0"). This module maps those spellings onto the typed options with no
//! allocation.

use crate::{Axis, CoreError, MatrixFormat};

/// Parse a matrix layout name
///
/// Accepts "csr"/"row-major", "csc"/"column-major" and "coo", ignoring
/// ASCII case. "coo" parses, but is rejected later by option validation
/// because pages are always compressed.
pub fn parse_format(format_str: &str) -> Result<MatrixFormat, CoreError> {
    let s = format_str.trim();

    if s.is_empty() {
        return Err(CoreError::InvalidFormat);
    }

    if eq_any(s, &["csr", "row-major", "row_major"]) {
        return Ok(MatrixFormat::Csr);
    }

    if eq_any(s, &["csc", "column-major", "column_major", "col-major"]) {
        return Ok(MatrixFormat::Csc);
    }

    if s.eq_ignore_ascii_case("coo") {
        return Ok(MatrixFormat::Coo);
    }

    Err(CoreError::InvalidFormat)
}

/// Parse a query axis
///
/// Accepts the numeric form (0 = observations, 1 = features) and the
/// names "obs"/"primary" and "var"/"secondary".
pub fn parse_axis(axis_str: &str) -> Result<Axis, CoreError> {
    let s = axis_str.trim();

    match s {
        "0" => return Ok(Axis::Primary),
        "1" => return Ok(Axis::Secondary),
        _ => {}
    }

    if s.bytes().all(|b| b.is_ascii_digit()) && !s.is_empty() {
        return Err(CoreError::InvalidAxis);
    }

    if eq_any(s, &["obs", "primary", "rows"]) {
        return Ok(Axis::Primary);
    }

    if eq_any(s, &["var", "secondary", "cols"]) {
        return Ok(Axis::Secondary);
    }

    Err(CoreError::UnparsableValue)
}

fn eq_any(s: &str, candidates: &[&str]) -> bool {
    candidates.iter().any(|c| s.eq_ignore_ascii_case(c))
}
