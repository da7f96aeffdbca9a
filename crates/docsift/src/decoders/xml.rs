//! XML decoder: streaming markup strip.
//!
//! XML input surfaces its character data, never raw markup. Word-2003-style
//! XML documents (misdeclared under legacy word-processor types but sniffed
//! as XML) route here through the type-override rules and come out as the
//! text runs of the document.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::plugins::{DecodeContext, DecodeMode, Decoder, Plugin};
use crate::types::{properties, DecodedDocument, Metadata};
use crate::{charset, text, DocsiftError, Result};

pub struct XmlDecoder;

impl Plugin for XmlDecoder {
    fn name(&self) -> &str {
        "xml-decoder"
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
impl Decoder for XmlDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument> {
        let (decoded, detected_charset) = charset::decode_text(content)?;
        let segments = strip_markup(&decoded)?;

        let mut metadata = Metadata::new();
        metadata.add(properties::CONTENT_ENCODING, detected_charset);

        let content = match ctx.mode {
            DecodeMode::Full => text::normalize(&segments.join("\n")),
            DecodeMode::MetadataOnly => String::new(),
        };

        Ok(DecodedDocument {
            content,
            media_type: media_type.to_string(),
            metadata,
        })
    }

    fn supported_media_types(&self) -> &[&str] {
        &["application/xml", "text/xml", "image/svg+xml"]
    }
}

/// Collect character data from an XML document, dropping all markup.
fn strip_markup(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut segments = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let unescaped = e
                    .xml_content()
                    .map_err(|e| DocsiftError::corrupt_with_source("invalid XML character data", e))?;
                if !unescaped.trim().is_empty() {
                    segments.push(unescaped.trim().to_string());
                }
            }
            Ok(Event::CData(e)) => {
                let data = String::from_utf8_lossy(&e.into_inner()).trim().to_string();
                if !data.is_empty() {
                    segments.push(data);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DocsiftError::corrupt_with_source("malformed XML document", e));
            }
        }
    }
    Ok(segments)
}
