//! Currency formatting for raw market-data values
//!
//! Raw values arrive as JSON: plain numbers, numeric strings, or Yahoo's
//! `{ "raw": n, "fmt": "..." }` wrapper. Anything that does not resolve to a
//! finite number renders as an empty string.

use serde_json::Value;

const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;

/// Smallest magnitude rendered on the million scale (`$0.10M`).
const MILLION_SCALE_FLOOR: f64 = 1e5;

/// Resolve a raw JSON value to a finite number
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        Value::Object(map) => map.get("raw").and_then(as_number),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// Render a value as a scale-suffixed currency string.
///
/// `2.5e9` → `$2.50B`, `7.5e5` → `$0.75M`, `42.5` → `$42.50`, `"abc"` → `""`.
pub fn format_money(value: &Value) -> String {
    as_number(value).map(format_amount).unwrap_or_default()
}

/// Numeric counterpart of [`format_money`]
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return String::new();
    }

    let magnitude = amount.abs();

    // pick the scale on the displayed value so 999_999_999 is $1.00B, not $1000.00M
    let (scaled, suffix) = if magnitude >= BILLION || round_cents(magnitude / MILLION) >= 1000.0 {
        (magnitude / BILLION, "B")
    } else if magnitude >= MILLION_SCALE_FLOOR || round_cents(magnitude) >= MILLION_SCALE_FLOOR {
        (magnitude / MILLION, "M")
    } else {
        (magnitude, "")
    };

    with_sign(amount, format!("${:.2}{}", scaled, suffix))
}

/// Render earnings per share as `$X.XX`, or `""` when the value is falsy
/// (absent, null, zero, false or an empty string) or not numeric.
pub fn format_eps(value: &Value) -> String {
    match as_number(value) {
        Some(eps) if eps != 0.0 => with_sign(eps, format!("${:.2}", eps.abs())),
        _ => String::new(),
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn with_sign(amount: f64, formatted: String) -> String {
    // -0.001 rounds to $0.00 and should not print as negative
    if amount < 0.0 && formatted.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        format!("-{}", formatted)
    } else {
        formatted
    }
}
