//! Canonical JSON serialization.
//!
//! The canonical string is what gets hashed, so every implementation must
//! produce it byte for byte:
//!
//!   - objects: keys sorted by Unicode code point, values canonicalized
//!   - arrays: element order preserved, elements canonicalized
//!   - scalars: compact JSON, no inserted whitespace
//!
//! Strings use `serde_json` escaping (`"`, `\`, and control characters only;
//! non-ASCII is emitted raw), which matches `JSON.stringify`.
//!
//! Numbers: integers print as plain decimals.  Floats follow the
//! ECMAScript Number-to-String rules that `JSON.stringify` uses: shortest
//! round-trip digits, plain notation for 1e-7 <= |x| < 1e21 (`1.0` -> `1`,
//! `1e16` -> `10000000000000000`, `0.000001` -> `0.000001`), otherwise
//! `d.ddde+N` / `d.ddde-N`.  `-0.0` prints as `0`.  Prefer integers and
//! strings in claims.

use serde_json::{Number, Value};

/// Render `value` as canonical JSON.
///
/// Total and pure: any `serde_json::Value` has exactly one canonical form.
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(out, n),
        // Display on a JSON value is its compact encoding.
        Value::String(_) => out.push_str(&value.to_string()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            // Byte order of UTF-8 is code point order.
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: &Number) {
    match n.as_f64() {
        Some(f) if n.is_f64() => write_float(out, f),
        _ => out.push_str(&n.to_string()),
    }
}

fn write_float(out: &mut String, f: f64) {
    if !f.is_finite() {
        out.push_str("null");
        return;
    }
    if f == 0.0 {
        out.push('0');
        return;
    }
    if f < 0.0 {
        out.push('-');
    }

    // Shortest round-trip digits, e.g. "1.23456e2".
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let k = digits.len() as i32;
    // value = 0.<digits> * 10^n
    let n = exp.parse::<i32>().unwrap_or(0) + 1;

    if k <= n && n <= 21 {
        out.push_str(digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        out.push_str(digits);
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if n - 1 < 0 { '-' } else { '+' });
        out.push_str(&(n - 1).abs().to_string());
    }
}
