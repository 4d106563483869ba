// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Free-text sanitization for contact form fields.
//!
//! Sanitized text is interpolated into an HTML mail body, so literal angle
//! brackets are stripped along with the C0 control range and DEL. Leading
//! and trailing whitespace is trimmed after stripping.
//!
//! The submitter's email address does not pass through here; it is shape-
//! checked by the validator instead and used verbatim in mail headers.

/// Sanitize a free-text field.
///
/// Removes every character in the C0 control range plus DEL, removes
/// literal `<` and `>`, then trims surrounding whitespace. A whitespace-only
/// or control-only input reduces to the empty string.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_ascii_control() && *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitize an optional field.
///
/// Absent input, or input that reduces to the empty string, yields `None`
/// so the composer can omit the field entirely.
pub fn sanitize_opt(raw: Option<&str>) -> Option<String> {
    let cleaned = sanitize(raw?);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
