//! Canonical proof payload serialization.
//!
//! The proof signature covers the exact byte output of [`proof_payload`]:
//! key-sorted compact JSON with no whitespace. Reordering keys or coercing
//! the timestamp to a string produces a different byte stream and breaks
//! signature compatibility, so this module's output format is a wire
//! contract shared with every verifier replica.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Write;

use crate::error::CryptoError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProofPayload<'a> {
    nonce: &'a str,
    solution: &'a str,
    public_id: &'a str,
    timestamp: i64,
}

/// Build the canonical signing input for a proof.
///
/// `solution` is the joined solution set for the whole batch, not a
/// per-challenge answer.
pub fn proof_payload(nonce: &str, solution: &str, public_id: &str, timestamp: i64) -> String {
    let payload = ProofPayload {
        nonce,
        solution,
        public_id,
        timestamp,
    };
    // String and integer fields only, so canonicalization cannot fail
    to_canonical_string(&payload).expect("proof payload contains no floats")
}

/// Serialize a value to canonical JSON.
///
/// Rules: object keys sorted lexicographically by UTF-8 bytes, arrays
/// preserve order, no whitespace, floats rejected.
///
/// # Errors
///
/// Returns [`CryptoError::FloatNotAllowed`] if any float is present.
pub fn to_canonical_string<T: Serialize>(value: &T) -> Result<String, CryptoError> {
    let value = serde_json::to_value(value)?;
    let mut out = String::new();
    write_value(&mut out, &value)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), CryptoError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                return Err(CryptoError::FloatNotAllowed);
            }
            out.push_str(&n.to_string());
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        Value::Object(fields) => write_object(out, fields)?,
    }
    Ok(())
}

fn write_object(out: &mut String, fields: &Map<String, Value>) -> Result<(), CryptoError> {
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));

    out.push('{');
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(out, key);
        out.push(':');
        write_value(out, &fields[*key])?;
    }
    out.push('}');
    Ok(())
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_proof_payload_golden() {
        let payload = proof_payload("ab12", "42\nparis", "deadbeef00112233aabb", 1700000000000);
        assert_eq!(
            payload,
            r#"{"nonce":"ab12","publicId":"deadbeef00112233aabb","solution":"42\nparis","timestamp":1700000000000}"#
        );
    }

    #[test]
    fn test_payload_is_deterministic() {
        let a = proof_payload("ff", "x", "id", 1);
        let b = proof_payload("ff", "x", "id", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sorted_keys() {
        let value = json!({"z": 1, "a": 2, "m": 3});
        assert_eq!(to_canonical_string(&value).unwrap(), r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_nested_objects_sorted() {
        let value = json!({"b": {"y": 1, "x": 2}, "a": [3, 1]});
        assert_eq!(
            to_canonical_string(&value).unwrap(),
            r#"{"a":[3,1],"b":{"x":2,"y":1}}"#
        );
    }

    #[test]
    fn test_float_rejected() {
        let value = json!({"score": 0.5});
        assert!(matches!(
            to_canonical_string(&value),
            Err(CryptoError::FloatNotAllowed)
        ));
    }

    #[test]
    fn test_string_escaping() {
        let value = json!({"text": "line1\nline2\t\"quoted\"\\"});
        let canonical = to_canonical_string(&value).unwrap();
        assert_eq!(canonical, r#"{"text":"line1\nline2\t\"quoted\"\\"}"#);
    }

    #[test]
    fn test_no_whitespace() {
        let value = json!({"a": [1, 2], "b": {"c": 3}});
        let canonical = to_canonical_string(&value).unwrap();
        assert!(!canonical.contains(' '));
        assert!(!canonical.contains('\n'));
    }
}
