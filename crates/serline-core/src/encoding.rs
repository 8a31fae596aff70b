//! Best-effort decoding of received bytes for console display.

/// Decodes a received line for printing. Valid UTF-8 passes through;
/// anything else goes through encoding detection so legacy-encoded
/// devices still print something readable.
pub fn decode_text(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    encoding.decode(bytes).0.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        assert_eq!(decode_text(b"hello"), "hello");
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode_text(b""), "");
    }

    #[test]
    fn non_utf8_still_decodes_to_something() {
        // GBK-encoded Chinese text, invalid as UTF-8.
        let gbk = [0xC4, 0xE3, 0xBA, 0xC3];
        let decoded = decode_text(&gbk);
        assert!(!decoded.is_empty());
    }
}
