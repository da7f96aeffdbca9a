//! Container decoders: zip and tar traversal.
//!
//! Every entry goes back through the full pipeline (detect, resolve,
//! decode), so a text file inside a zip inside a tar decodes exactly like a
//! top-level text file. Output concatenates entry name and child text in
//! entry order; nested containers flatten depth-first inline. An entry whose
//! detected type has no decoder contributes its name only. Nesting past
//! `max_archive_depth` fails the whole extraction.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use tracing::debug;

use crate::core::pipeline;
use crate::plugins::{DecodeContext, DecodeMode, Decoder, Plugin};
use crate::types::{DecodedDocument, Metadata};
use crate::{text, DocsiftError, Result};

pub struct ZipDecoder;

impl Plugin for ZipDecoder {
    fn name(&self) -> &str {
        "zip-decoder"
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
impl Decoder for ZipDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument> {
        check_depth(ctx)?;

        let mut archive = zip::ZipArchive::new(Cursor::new(content))
            .map_err(|e| DocsiftError::corrupt_with_source("invalid zip archive", e))?;

        let mut entries = Vec::new();
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| DocsiftError::corrupt_with_source("unreadable zip entry", e))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)?;
            entries.push((name, bytes));
        }

        assemble(entries, media_type, ctx).await
    }

    fn supported_media_types(&self) -> &[&str] {
        &["application/zip", "application/x-zip-compressed"]
    }
}

pub struct TarDecoder;

impl Plugin for TarDecoder {
    fn name(&self) -> &str {
        "tar-decoder"
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
impl Decoder for TarDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument> {
        check_depth(ctx)?;

        let mut archive = tar::Archive::new(Cursor::new(content));
        let mut entries = Vec::new();
        let iter = archive
            .entries()
            .map_err(|e| DocsiftError::corrupt_with_source("invalid tar archive", e))?;
        for entry in iter {
            let mut entry = entry.map_err(|e| DocsiftError::corrupt_with_source("unreadable tar entry", e))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let name = entry
                .path()
                .map_err(|e| DocsiftError::corrupt_with_source("invalid tar entry path", e))?
                .display()
                .to_string();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            entries.push((name, bytes));
        }

        assemble(entries, media_type, ctx).await
    }

    fn supported_media_types(&self) -> &[&str] {
        &["application/x-tar", "application/x-gtar"]
    }
}

fn check_depth(ctx: &DecodeContext) -> Result<()> {
    if ctx.depth >= ctx.options.max_archive_depth {
        return Err(DocsiftError::extraction(format!(
            "container nesting exceeds the depth limit of {}",
            ctx.options.max_archive_depth
        )));
    }
    Ok(())
}

/// Re-dispatch each entry through the pipeline and concatenate the results
/// in entry order.
async fn assemble(
    entries: Vec<(String, Vec<u8>)>,
    media_type: &str,
    ctx: &DecodeContext,
) -> Result<DecodedDocument> {
    let mut metadata = Metadata::new();
    metadata.add("entryCount", entries.len().to_string());

    if ctx.mode == DecodeMode::MetadataOnly {
        return Ok(DecodedDocument {
            content: String::new(),
            media_type: media_type.to_string(),
            metadata,
        });
    }

    let mut out = String::new();
    for (name, bytes) in entries {
        out.push_str(&name);
        out.push('\n');
        match pipeline::decode_embedded(&bytes, &name, ctx.child()).await {
            Ok(child) => {
                let trimmed = child.content.trim_end();
                if !trimmed.is_empty() {
                    out.push_str(trimmed);
                    out.push('\n');
                }
            }
            Err(DocsiftError::UnsupportedFormat(child_type)) => {
                debug!(entry = name.as_str(), media_type = child_type.as_str(), "skipping unsupported container entry");
            }
            Err(e) => return Err(e),
        }
        out.push('\n');
    }

    Ok(DecodedDocument {
        content: text::normalize(&out),
        media_type: media_type.to_string(),
        metadata,
    })
}
