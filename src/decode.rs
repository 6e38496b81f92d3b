//! Inbound payload decoding.

use std::borrow::Cow;

use crate::connection::Payload;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Turn a received frame into text.
///
/// Text frames are already valid UTF-8 and are borrowed as-is. Binary frames
/// are read as UTF-8, with invalid sequences replaced by U+FFFD. Never fails.
pub fn decode_payload(payload: &Payload) -> Cow<'_, str> {
    match payload {
        Payload::Text(text) => Cow::Borrowed(text.as_str()),
        Payload::Binary(bytes) => decode_bytes(bytes),
    }
}

pub fn decode_bytes(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}

/// Decode and parse a payload as JSON.
///
/// On failure the decoded text is returned alongside the parse error so the
/// caller can show what was received.
pub fn parse_payload(payload: &Payload) -> Result<serde_json::Value, (String, serde_json::Error)> {
    let text = decode_payload(payload);
    serde_json::from_str(&text).map_err(|e| (text.into_owned(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_unchanged() {
        let payload = Payload::Text("héllo \u{1F600}".to_string());
        assert!(matches!(decode_payload(&payload), Cow::Borrowed("héllo \u{1F600}")));
    }

    #[test]
    fn test_valid_binary_is_utf8() {
        let payload = Payload::Binary("中文".as_bytes().to_vec());
        assert_eq!(decode_payload(&payload), "中文");
    }

    #[test]
    fn test_invalid_binary_is_replaced() {
        let payload = Payload::Binary(vec![b'o', b'k', 0xFF, 0xFE, b'!']);
        assert_eq!(decode_payload(&payload), "ok\u{FFFD}\u{FFFD}!");
    }

    #[test]
    fn test_truncated_sequence_is_replaced() {
        // First two bytes of a three byte sequence.
        assert_eq!(decode_bytes(&[0xE4, 0xB8]), "\u{FFFD}");
    }

    #[test]
    fn test_bom_is_stripped() {
        assert_eq!(decode_bytes(b"\xEF\xBB\xBF{}"), "{}");
    }

    #[test]
    fn test_parse_payload() {
        let value = parse_payload(&Payload::Binary(br#"{"a":1}"#.to_vec())).unwrap();
        assert_eq!(value["a"], 1);

        let (raw, _) = parse_payload(&Payload::Text("not json".to_string())).unwrap_err();
        assert_eq!(raw, "not json");
    }
}
