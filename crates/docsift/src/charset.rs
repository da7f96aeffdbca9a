//! Character-encoding detection and decoding.
//!
//! Detection order: byte-order mark, BOM-less UTF-16 heuristic, strict UTF-8
//! validation, then a statistical guess over legacy encodings via `chardetng`.
//! Reported names are the canonical `encoding_rs` names (`UTF-8`, `UTF-16LE`,
//! `windows-1252`, ...). Everything operates on an in-memory slice.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{DocsiftError, Result};

/// Bytes inspected by the BOM-less UTF-16 heuristic.
const SNIFF_LIMIT: usize = 2048;

/// Detect the character encoding of `content`.
///
/// Fails with a detection error on empty input; any non-empty input resolves
/// to some encoding (legacy single-byte guesses never fail).
pub fn detect_encoding(content: &[u8]) -> Result<&'static Encoding> {
    if content.is_empty() {
        return Err(DocsiftError::detection(
            "cannot detect charset of empty content",
        ));
    }

    if let Some((encoding, _bom_len)) = Encoding::for_bom(content) {
        return Ok(encoding);
    }

    if let Some(encoding) = sniff_utf16(content) {
        return Ok(encoding);
    }

    if std::str::from_utf8(content).is_ok() {
        return Ok(UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(content, true);
    Ok(detector.guess(None, true))
}

/// Detect the encoding of `content` and return its canonical name.
pub fn detect_charset(content: &[u8]) -> Result<&'static str> {
    detect_encoding(content).map(Encoding::name)
}

/// Decode `content` to a UTF-8 string using the detected encoding.
///
/// Malformed sequences are replaced rather than failing. Returns the decoded
/// text and the name of the charset used; a leading BOM matching that charset
/// is not part of the output.
pub fn decode_text(content: &[u8]) -> Result<(String, &'static str)> {
    if content.is_empty() {
        return Ok((String::new(), UTF_8.name()));
    }
    let encoding = detect_encoding(content)?;
    let (decoded, actual, _had_errors) = encoding.decode(content);
    Ok((decoded.into_owned(), actual.name()))
}

/// Heuristic for BOM-less UTF-16: ASCII-range text encoded as UTF-16 has a
/// zero byte in every other position, on the high side of each code unit.
fn sniff_utf16(content: &[u8]) -> Option<&'static Encoding> {
    if content.len() < 4 || content.len() % 2 != 0 {
        return None;
    }
    let sample = &content[..content.len().min(SNIFF_LIMIT)];
    let pairs = sample.len() / 2;

    let mut zeros_even = 0usize;
    let mut zeros_odd = 0usize;
    for (i, byte) in sample.iter().enumerate() {
        if *byte == 0 {
            if i % 2 == 0 {
                zeros_even += 1;
            } else {
                zeros_odd += 1;
            }
        }
    }

    // Require the zero bytes to dominate one side and be nearly absent on
    // the other; mixed zeros are more likely binary data.
    let threshold = pairs / 2;
    if zeros_odd >= threshold && zeros_even <= pairs / 16 {
        Some(UTF_16LE)
    } else if zeros_even >= threshold && zeros_odd <= pairs / 16 {
        Some(UTF_16BE)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str, with_bom: bool) -> Vec<u8> {
        let mut bytes = Vec::new();
        if with_bom {
            bytes.extend_from_slice(&[0xFF, 0xFE]);
        }
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_empty_input_fails_detection() {
        let err = detect_charset(b"").unwrap_err();
        assert!(matches!(err, DocsiftError::Detection { .. }));
    }

    #[test]
    fn test_utf8_bom() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice("hello".as_bytes());
        assert_eq!(detect_charset(&content).unwrap(), "UTF-8");
    }

    #[test]
    fn test_utf16le_bom() {
        let content = utf16le("Just some text.", true);
        assert_eq!(detect_charset(&content).unwrap(), "UTF-16LE");
    }

    #[test]
    fn test_utf16be_bom() {
        let mut content = vec![0xFE, 0xFF];
        for unit in "Just some text.".encode_utf16() {
            content.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(detect_charset(&content).unwrap(), "UTF-16BE");
    }

    #[test]
    fn test_bomless_utf16le_heuristic() {
        let content = utf16le("Just some plain ASCII text, no byte-order mark.", false);
        assert_eq!(detect_charset(&content).unwrap(), "UTF-16LE");
    }

    #[test]
    fn test_plain_ascii_is_utf8() {
        assert_eq!(detect_charset(b"Just some text.").unwrap(), "UTF-8");
    }

    #[test]
    fn test_multibyte_utf8() {
        assert_eq!(detect_charset("héllo wörld ünïcode".as_bytes()).unwrap(), "UTF-8");
    }

    #[test]
    fn test_legacy_single_byte_falls_back_to_guess() {
        // "Algún pequeño trozo de texto." in windows-1252
        let (content, _, _) = encoding_rs::WINDOWS_1252.encode("Algún pequeño trozo de texto.");
        let name = detect_charset(&content).unwrap();
        assert_ne!(name, "UTF-8");
        let (decoded, _) = decode_text(&content).unwrap();
        assert_eq!(decoded, "Algún pequeño trozo de texto.");
    }

    #[test]
    fn test_decode_strips_bom() {
        let content = utf16le("Just some text.", true);
        let (decoded, charset) = decode_text(&content).unwrap();
        assert_eq!(decoded, "Just some text.");
        assert_eq!(charset, "UTF-16LE");
    }

    #[test]
    fn test_binary_data_is_not_utf16() {
        let content: Vec<u8> = vec![0x00, 0x01, 0x02, 0x00, 0xFF, 0x00, 0x10, 0x00];
        assert!(sniff_utf16(&content).is_none());
    }
}
