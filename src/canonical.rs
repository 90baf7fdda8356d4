//! Canonical JSON serialization for certificate-record hashing.
//!
//! The serialization here IS the hashing ABI: keys sorted at every nesting
//! level by raw code point, no whitespace, ASCII-only output with `\uXXXX`
//! escapes (surrogate pairs above `0xFFFF`). Any deviation breaks agreement
//! with the issuer's own hashes.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Recursively serialize a JSON value to its canonical byte form.
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out.into_bytes()
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_canonical_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical_string(key, out);
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
    }
}

/// Write a JSON string literal with ASCII-only escaping.
fn write_canonical_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if (c as u32) < 0x80 => out.push(c),
            c => {
                let cp = c as u32;
                if cp <= 0xFFFF {
                    out.push_str(&format!("\\u{:04x}", cp));
                } else {
                    let v = cp - 0x10000;
                    let high = 0xD800 + (v >> 10);
                    let low = 0xDC00 + (v & 0x3FF);
                    out.push_str(&format!("\\u{:04x}\\u{:04x}", high, low));
                }
            }
        }
    }
    out.push('"');
}

/// Strip the hashing-surface fields from a record per its `op`, producing the
/// body that was actually hashed to form `certificate_id`.
pub fn hashing_body(record: &Value) -> Value {
    let mut obj: Map<String, Value> = record.as_object().cloned().unwrap_or_default();
    obj.remove("certificate_id");
    obj.remove("chain_hash");
    if obj.get("op").and_then(Value::as_str) == Some("seal") {
        obj.remove("seal_id");
        obj.remove("label");
    }
    Value::Object(obj)
}

/// SHA-256 of arbitrary bytes, rendered as 64 lowercase hex digits.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Recompute `certificate_id` for a record: SHA-256 of the canonical hashing body.
pub fn compute_certificate_id(record: &Value) -> String {
    let body = hashing_body(record);
    sha256_hex(&canonical_bytes(&body))
}
