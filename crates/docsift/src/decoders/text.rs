//! Plain-text decoder.

use async_trait::async_trait;

use crate::plugins::{DecodeContext, DecodeMode, Decoder, Plugin};
use crate::types::{properties, DecodedDocument, Metadata};
use crate::{charset, text, Result};

/// Decoder for plain text and text-like formats.
///
/// Registered for the `text/*` wildcard, so any textual subtype without a
/// dedicated decoder lands here. Detects the charset, transcodes to UTF-8,
/// and reports the charset as `Content-Encoding`.
pub struct PlainTextDecoder;

impl Plugin for PlainTextDecoder {
    fn name(&self) -> &str {
        "text-decoder"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Decoder for PlainTextDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument> {
        let (decoded, detected_charset) = charset::decode_text(content)?;

        let mut metadata = Metadata::new();
        metadata.add(properties::CONTENT_ENCODING, detected_charset);

        let content = match ctx.mode {
            DecodeMode::Full => text::normalize(&decoded),
            DecodeMode::MetadataOnly => String::new(),
        };

        Ok(DecodedDocument {
            content,
            media_type: media_type.to_string(),
            metadata,
        })
    }

    fn supported_media_types(&self) -> &[&str] {
        &[
            "text/plain",
            "text/csv",
            "text/markdown",
            "text/tab-separated-values",
            "text/*",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractOptions;

    fn ctx(mode: DecodeMode) -> DecodeContext {
        DecodeContext::new(mode, ExtractOptions::default())
    }

    #[tokio::test]
    async fn test_ascii_text() {
        let doc = PlainTextDecoder
            .decode(b"Just some text.", "text/plain", &ctx(DecodeMode::Full))
            .await
            .unwrap();
        assert_eq!(doc.content, "Just some text.\n\n");
        assert_eq!(doc.metadata.first(properties::CONTENT_ENCODING), Some("UTF-8"));
    }

    #[tokio::test]
    async fn test_utf16le_transcoded() {
        let mut content = vec![0xFF, 0xFE];
        for unit in "Just some text.".encode_utf16() {
            content.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = PlainTextDecoder
            .decode(&content, "text/plain", &ctx(DecodeMode::Full))
            .await
            .unwrap();
        assert_eq!(doc.content, "Just some text.\n\n");
        assert_eq!(doc.metadata.first(properties::CONTENT_ENCODING), Some("UTF-16LE"));
    }

    #[tokio::test]
    async fn test_crlf_normalized() {
        let doc = PlainTextDecoder
            .decode(b"line one\r\nline two\r\n", "text/plain", &ctx(DecodeMode::Full))
            .await
            .unwrap();
        assert_eq!(doc.content, "line one\nline two\n\n");
    }

    #[tokio::test]
    async fn test_metadata_only_skips_content() {
        let doc = PlainTextDecoder
            .decode(b"Just some text.", "text/plain", &ctx(DecodeMode::MetadataOnly))
            .await
            .unwrap();
        assert!(doc.content.is_empty());
        assert_eq!(doc.metadata.first(properties::CONTENT_ENCODING), Some("UTF-8"));
    }

    #[tokio::test]
    async fn test_empty_content() {
        let doc = PlainTextDecoder
            .decode(b"", "text/plain", &ctx(DecodeMode::Full))
            .await
            .unwrap();
        assert!(doc.content.is_empty());
    }
}
