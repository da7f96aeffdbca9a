//! Public extraction API.
//!
//! File-based operations read the file once and run the pipeline over the
//! in-memory bytes; `_bytes` variants accept a caller-held buffer directly.
//! Every operation is a single pass; `extract` returns text and metadata
//! from the same decode.

use std::path::Path;

use crate::core::io::{read_file_async, resource_basename};
use crate::core::pipeline;
use crate::mime::MediaType;
use crate::plugins::{DecodeContext, DecodeMode};
use crate::types::{DecodedDocument, ExtractOptions, Metadata};
use crate::{charset, mime, Result};

/// Fallback resource name for anonymous buffers.
const UNTITLED: &str = "untitled";

/// Detect the media type of a file.
///
/// With `include_charset`, textual types get a `; charset=NAME` suffix from
/// charset detection. Detection is signature-first and works on
/// extensionless files; it never decrypts, so encrypted documents still
/// report their type.
pub async fn detect_type(path: impl AsRef<Path>, include_charset: bool) -> Result<String> {
    let content = read_file_async(path.as_ref()).await?;
    let name = path.as_ref().to_string_lossy();
    detect_type_impl(&content, Some(&name), include_charset)
}

/// Detect the media type of an in-memory buffer.
///
/// `name_hint` is only consulted when the bytes are inconclusive.
pub async fn detect_type_bytes(
    content: &[u8],
    name_hint: Option<&str>,
    include_charset: bool,
) -> Result<String> {
    detect_type_impl(content, name_hint, include_charset)
}

/// Detect the character encoding of a file.
pub async fn detect_charset(path: impl AsRef<Path>) -> Result<String> {
    let content = read_file_async(path.as_ref()).await?;
    Ok(charset::detect_charset(&content)?.to_string())
}

/// Detect the character encoding of an in-memory buffer.
pub async fn detect_charset_bytes(content: &[u8]) -> Result<String> {
    Ok(charset::detect_charset(content)?.to_string())
}

/// Extract normalized text from a file.
pub async fn extract_text(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<String> {
    extract(path, options).await.map(|doc| doc.content)
}

/// Extract normalized text from an in-memory buffer.
pub async fn extract_text_bytes(
    content: &[u8],
    name_hint: Option<&str>,
    options: &ExtractOptions,
) -> Result<String> {
    extract_bytes(content, name_hint, options).await.map(|doc| doc.content)
}

/// Extract metadata from a file without assembling text content.
pub async fn extract_metadata(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<Metadata> {
    let content = read_file_async(path.as_ref()).await?;
    let name = path.as_ref().to_string_lossy();
    let ctx = DecodeContext::new(DecodeMode::MetadataOnly, options.clone());
    Ok(pipeline::decode_resource(&content, &name, &ctx).await?.metadata)
}

/// Extract metadata from an in-memory buffer.
pub async fn extract_metadata_bytes(
    content: &[u8],
    name_hint: Option<&str>,
    options: &ExtractOptions,
) -> Result<Metadata> {
    let ctx = DecodeContext::new(DecodeMode::MetadataOnly, options.clone());
    let name = name_hint.unwrap_or(UNTITLED);
    Ok(pipeline::decode_resource(content, name, &ctx).await?.metadata)
}

/// Extract text and metadata from a file in one pass.
pub async fn extract(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<DecodedDocument> {
    let content = read_file_async(path.as_ref()).await?;
    let name = path.as_ref().to_string_lossy();
    let ctx = DecodeContext::new(DecodeMode::Full, options.clone());
    pipeline::decode_resource(&content, &name, &ctx).await
}

/// Extract text and metadata from an in-memory buffer in one pass.
pub async fn extract_bytes(
    content: &[u8],
    name_hint: Option<&str>,
    options: &ExtractOptions,
) -> Result<DecodedDocument> {
    let ctx = DecodeContext::new(DecodeMode::Full, options.clone());
    let name = name_hint.unwrap_or(UNTITLED);
    pipeline::decode_resource(content, name, &ctx).await
}

fn detect_type_impl(content: &[u8], name_hint: Option<&str>, include_charset: bool) -> Result<String> {
    let hint = name_hint.map(resource_basename);
    let essence = mime::detect_media_type(content, hint);
    if include_charset {
        if let Some(media_type) = MediaType::parse(&essence) {
            if media_type.is_textual() {
                let detected = charset::detect_charset(content)?;
                return Ok(format!("{}; charset={}", essence, detected));
            }
        }
    }
    Ok(essence)
}
