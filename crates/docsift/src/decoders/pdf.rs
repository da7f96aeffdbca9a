//! PDF decoder.
//!
//! Text comes out page by page in page order; the Info dictionary feeds
//! metadata. Encrypted documents are refused with an encrypted-document
//! error, not a parse error, so callers can distinguish "needs a password"
//! from "broken file". Type detection never touches this path: an encrypted
//! PDF still detects as `application/pdf`.

use async_trait::async_trait;
use lopdf::{Dictionary, Document, Object};

use crate::plugins::{DecodeContext, DecodeMode, Decoder, Plugin};
use crate::types::{DecodedDocument, Metadata};
use crate::{text, DocsiftError, Result};

/// Info-dictionary keys surfaced as metadata, in output order.
const INFO_KEYS: [(&[u8], &str); 6] = [
    (b"Title", "title"),
    (b"Author", "author"),
    (b"Subject", "subject"),
    (b"Keywords", "keywords"),
    (b"Creator", "creator"),
    (b"Producer", "producer"),
];

pub struct PdfDecoder;

impl Plugin for PdfDecoder {
    fn name(&self) -> &str {
        "pdf-decoder"
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
impl Decoder for PdfDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument> {
        let doc = Document::load_mem(content).map_err(classify_load_error)?;
        if doc.is_encrypted() {
            return Err(DocsiftError::encrypted(
                "PDF is password-protected; cannot extract content",
            ));
        }

        let pages = doc.get_pages();

        let mut metadata = Metadata::new();
        if let Some(info) = info_dictionary(&doc) {
            for (key, name) in INFO_KEYS {
                if let Ok(Object::String(bytes, _)) = info.get(key) {
                    let value = decode_pdf_string(bytes);
                    if !value.is_empty() {
                        metadata.add(name, value);
                    }
                }
            }
        }
        metadata.add("pageCount", pages.len().to_string());

        let content = match ctx.mode {
            DecodeMode::Full => {
                let mut out = String::new();
                for page_num in pages.keys() {
                    // Pages without a text stream are skipped, not fatal.
                    if let Ok(page_text) = doc.extract_text(&[*page_num]) {
                        out.push_str(&page_text);
                        out.push('\n');
                    }
                }
                text::normalize(&out)
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
        &["application/pdf"]
    }
}

/// Split lopdf load failures into encrypted vs corrupt.
fn classify_load_error(err: lopdf::Error) -> DocsiftError {
    if is_encryption_message(&err.to_string()) {
        DocsiftError::encrypted("PDF is password-protected; cannot extract content")
    } else {
        DocsiftError::corrupt_with_source("failed to parse PDF", err)
    }
}

/// lopdf reports encryption problems as load errors with varying payloads;
/// match on the message rather than the variant.
fn is_encryption_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("encrypt") || message.contains("decrypt") || message.contains("password")
}

/// Resolve the trailer's Info entry, which may be a direct dictionary or a
/// reference.
fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    match info {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        other => other.as_dict().ok(),
    }
}

/// PDF text strings are UTF-16BE with a BOM or a latin-1-compatible
/// single-byte encoding.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let (decoded, _, _) = encoding_rs::UTF_16BE.decode(bytes);
        decoded.into_owned()
    } else {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        }
    }
}
