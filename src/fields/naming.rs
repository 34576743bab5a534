//! Field name normalization
//!
//! Mapped fields carry a machine-safe `name` derived from the human label:
//! diacritics stripped, uppercased, everything outside `[A-Z0-9]` collapsed
//! to single underscores. The same routine feeds the `{{NAME}}` placeholder
//! tokens inserted into Word content.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Literal used when normalization yields an empty identifier
const EMPTY_PLACEHOLDER: &str = "FIELD";

/// Normalize a human label into a machine-safe identifier.
///
/// Idempotent: normalizing an already-normalized name returns it unchanged.
/// May return an empty string; callers that need a non-empty name must
/// supply a numbered fallback.
pub fn normalize_name(input: &str) -> String {
    let stripped: String = input
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut out = String::with_capacity(stripped.len());
    let mut pending_separator = false;
    for c in stripped.chars() {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }
    out
}

/// Wrap a normalized name in the placeholder delimiter pair.
///
/// Used both for live preview in the field editor and for literal insertion
/// into Word content.
pub fn placeholder_token(name: &str) -> String {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        format!("{{{{{}}}}}", EMPTY_PLACEHOLDER)
    } else {
        format!("{{{{{}}}}}", normalized)
    }
}
