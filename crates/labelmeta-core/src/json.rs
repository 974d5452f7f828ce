//! Stable JSON encoding for persisted documents

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;

/// Serialize with four-space indentation and sorted object keys
///
/// Values are routed through [`serde_json::Value`], whose map keeps keys in
/// sorted order, so the same logical content always yields the same bytes.
pub fn to_stable_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_four_space_indent() {
        let text = to_stable_json(&json!({"a": 1})).unwrap();
        assert_eq!(text, "{\n    \"a\": 1\n}");
    }

    #[test]
    fn test_keys_sorted() {
        #[derive(Serialize)]
        struct Doc {
            zeta: u8,
            alpha: u8,
        }
        let text = to_stable_json(&Doc { zeta: 1, alpha: 2 }).unwrap();
        assert!(text.find("alpha").unwrap() < text.find("zeta").unwrap());
    }

    #[test]
    fn test_deterministic_output() {
        let a = json!({"labels": [], "document": "a.png"});
        let b = json!({"document": "a.png", "labels": []});
        assert_eq!(to_stable_json(&a).unwrap(), to_stable_json(&b).unwrap());
    }
}
