//! Charset detection and transcoding through the full API.

use docsift::{detect_charset, detect_type, extract_text, DocsiftError, ExtractOptions};
use serial_test::serial;
use tempfile::tempdir;

fn utf16le_bytes(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

#[tokio::test]
async fn detects_utf16le_charset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("utf16.txt");
    std::fs::write(&path, utf16le_bytes("Just some text.")).unwrap();

    assert_eq!(detect_charset(&path).await.unwrap(), "UTF-16LE");
}

#[tokio::test]
#[serial]
async fn transcodes_utf16le_to_utf8() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("utf16.txt");
    std::fs::write(&path, utf16le_bytes("Just some text.")).unwrap();

    let text = extract_text(&path, &ExtractOptions::default()).await.unwrap();
    assert_eq!(text, "Just some text.\n\n");
}

#[tokio::test]
#[serial]
async fn decodes_windows_1252() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin.txt");
    let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode("Algún pequeño trozo de texto.");
    std::fs::write(&path, encoded.as_ref()).unwrap();

    let text = extract_text(&path, &ExtractOptions::default()).await.unwrap();
    assert_eq!(text, "Algún pequeño trozo de texto.\n\n");
}

#[tokio::test]
async fn type_with_charset_suffix_for_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("utf16.txt");
    std::fs::write(&path, utf16le_bytes("Just some text.")).unwrap();

    assert_eq!(
        detect_type(&path, true).await.unwrap(),
        "text/plain; charset=UTF-16LE"
    );
}

#[tokio::test]
async fn charset_detection_fails_on_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, b"").unwrap();

    let err = detect_charset(&path).await.unwrap_err();
    assert!(matches!(err, DocsiftError::Detection { .. }));
}
