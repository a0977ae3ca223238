//! Lenient field decoders for provider payloads
//!
//! Provider APIs are inconsistent about numeric fields: the same field may
//! arrive as a number, a numeric string, or null.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a count, defaulting to 0 when missing or unparseable
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(to_u64)
        .map(|n| n.min(u32::MAX as u64) as u32)
        .unwrap_or(0))
}

/// Decode an optional byte count
pub fn lenient_u64_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_u64))
}

fn to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => leading_digits(s).parse().ok(),
        _ => None,
    }
}

/// The run of ASCII digits at the start of `s`, ignoring leading whitespace
fn leading_digits(s: &str) -> &str {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_u32")]
        count: u32,
        #[serde(default, deserialize_with = "lenient_u64_opt")]
        bytes: Option<u64>,
    }

    fn parse(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_and_strings() {
        let s = parse(r#"{"count": 12, "bytes": "1073741824"}"#);
        assert_eq!(s.count, 12);
        assert_eq!(s.bytes, Some(1 << 30));

        let s = parse(r#"{"count": "7", "bytes": 2048}"#);
        assert_eq!(s.count, 7);
        assert_eq!(s.bytes, Some(2048));
    }

    #[test]
    fn test_missing_and_garbage_default() {
        let s = parse(r#"{}"#);
        assert_eq!(s.count, 0);
        assert_eq!(s.bytes, None);

        let s = parse(r#"{"count": "lots", "bytes": null}"#);
        assert_eq!(s.count, 0);
        assert_eq!(s.bytes, None);

        let s = parse(r#"{"count": -3}"#);
        assert_eq!(s.count, 0);
    }

    #[test]
    fn test_numeric_prefix_is_kept() {
        let s = parse(r#"{"count": "12abc", "bytes": " 734003200 bytes"}"#);
        assert_eq!(s.count, 12);
        assert_eq!(s.bytes, Some(734_003_200));

        let s = parse(r#"{"count": "abc12", "bytes": "-5"}"#);
        assert_eq!(s.count, 0);
        assert_eq!(s.bytes, None);
    }
}
