//! Best-effort JSON extraction from free-form model output
//!
//! Models wrap their JSON in markdown fences, lead with prose, or trail
//! commentary after it. Fenced blocks are tried first, then the text is
//! scanned for the first balanced `{...}` span that decodes as an object.

use crate::error::MetricsError;
use crate::Result;
use serde_json::{Map, Value};

/// Locate and decode the first JSON object in `raw`.
pub fn extract_json_object(raw: &str) -> Result<Map<String, Value>> {
    if let Some(object) = from_fenced_blocks(raw) {
        return Ok(object);
    }

    scan_balanced_objects(raw).ok_or(MetricsError::NoJsonObject)
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Try each ``` fenced block in order
fn from_fenced_blocks(text: &str) -> Option<Map<String, Value>> {
    let mut rest = text;

    while let Some(start) = rest.find("```") {
        // skip the info string, e.g. ```json
        let after_fence = rest[start + 3..].trim_start_matches(|c: char| c.is_ascii_alphanumeric());

        let (body, remainder) = match after_fence.find("```") {
            Some(end) => (&after_fence[..end], &after_fence[end + 3..]),
            None => (after_fence, ""),
        };

        if let Some(object) = parse_object(body).or_else(|| scan_balanced_objects(body)) {
            return Some(object);
        }

        rest = remainder;
    }

    None
}

/// Scan for balanced brace spans, skipping braces inside string literals
fn scan_balanced_objects(text: &str) -> Option<Map<String, Value>> {
    let bytes = text.as_bytes();

    for (start, _) in text.match_indices('{') {
        let Some(end) = balanced_end(bytes, start) else {
            continue;
        };

        if let Some(object) = parse_object(&text[start..=end]) {
            return Some(object);
        }
    }

    None
}

/// Index of the `}` closing the brace at `start`
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}
