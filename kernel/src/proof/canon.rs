//! Canonical JSON bytes: the single serialization-for-hashing implementation.
//!
//! All hashing flows that involve JSON route through this module, so two
//! logically equal values always hash the same.
//!
//! # Canonicalization rules
//!
//! 1. Object keys are sorted lexicographically (byte order).
//! 2. No extraneous whitespace (compact form: `{"a":1,"b":2}`).
//! 3. Strings are JSON-escaped per RFC 8259 §7; non-ASCII passes through as UTF-8.
//! 4. Integers (`i64` / `u64`) are written in decimal.
//! 5. Floats with no fractional part and magnitude below 2^53 are written as
//!    integers (`55.0` → `55`), so a cost that happens to be whole encodes the
//!    same whether it was built from an integer or a float. Other floats use
//!    the shortest round-trip decimal form without exponent (`54.5`).
//! 6. `null`, `true`, `false` are written literally.

use std::io::Write;

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Error type for canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// A JSON number could not be read back as i64, u64 or a finite f64.
    UnrepresentableNumber { raw: String },
}

impl std::fmt::Display for CanonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrepresentableNumber { raw } => {
                write!(f, "unrepresentable number in canonical JSON: {raw}")
            }
        }
    }
}

impl std::error::Error for CanonError {}

/// Produce canonical JSON bytes from a `serde_json::Value`.
///
/// # Errors
///
/// Returns [`CanonError::UnrepresentableNumber`] if a number is neither an
/// integer nor a finite float.
pub fn canonical_json_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    let mut buf = Vec::new();
    write_value(&mut buf, value)?;
    Ok(buf)
}

fn write_value(buf: &mut Vec<u8>, value: &serde_json::Value) -> Result<(), CanonError> {
    match value {
        serde_json::Value::Null => buf.extend_from_slice(b"null"),
        serde_json::Value::Bool(true) => buf.extend_from_slice(b"true"),
        serde_json::Value::Bool(false) => buf.extend_from_slice(b"false"),
        serde_json::Value::Number(n) => write_number(buf, n)?,
        serde_json::Value::String(s) => write_string(buf, s),
        serde_json::Value::Array(arr) => {
            buf.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item)?;
            }
            buf.push(b']');
        }
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            buf.push(b'{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key);
                buf.push(b':');
                write_value(buf, &map[*key])?;
            }
            buf.push(b'}');
        }
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn write_number(buf: &mut Vec<u8>, n: &serde_json::Number) -> Result<(), CanonError> {
    if let Some(i) = n.as_i64() {
        let _ = write!(buf, "{i}");
        return Ok(());
    }
    if let Some(u) = n.as_u64() {
        let _ = write!(buf, "{u}");
        return Ok(());
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f.trunc() == f && f.abs() < MAX_EXACT_INTEGER {
                // -0.0 collapses to 0 here as well.
                let _ = write!(buf, "{}", f as i64);
            } else {
                let _ = write!(buf, "{f}");
            }
            Ok(())
        }
        _ => Err(CanonError::UnrepresentableNumber { raw: n.to_string() }),
    }
}

fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for ch in s.chars() {
        match ch {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if c < '\u{0020}' => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => {
                let mut utf8_buf = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8_buf).as_bytes());
            }
        }
    }
    buf.push(b'"');
}
