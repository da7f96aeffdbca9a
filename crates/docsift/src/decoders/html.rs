//! HTML decoder.
//!
//! HTML converts to markdown-flavoured readable text rather than a bare tag
//! strip, so headings, list items, and links keep their shape.

use async_trait::async_trait;

use crate::plugins::{DecodeContext, DecodeMode, Decoder, Plugin};
use crate::types::{properties, DecodedDocument, Metadata};
use crate::{charset, text, DocsiftError, Result};

pub struct HtmlDecoder;

impl Plugin for HtmlDecoder {
    fn name(&self) -> &str {
        "html-decoder"
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
impl Decoder for HtmlDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument> {
        let (decoded, detected_charset) = charset::decode_text(content)?;

        let mut metadata = Metadata::new();
        metadata.add(properties::CONTENT_ENCODING, detected_charset);

        let content = match ctx.mode {
            DecodeMode::Full => {
                let markdown = html_to_markdown_rs::convert(&decoded, None)
                    .map_err(|e| DocsiftError::extraction_with_source("HTML conversion failed", e))?;
                text::normalize(&markdown)
            }
            DecodeMode::MetadataOnly => String::new(),
        };

        Ok(DecodedDocument {
            content,
            media_type: media_type.to_string(),
            metadata,
        })
    }

    fn supported_media_types(&self) -> &[&str] {
        &["text/html", "application/xhtml+xml"]
    }
}
