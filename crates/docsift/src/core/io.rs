//! File I/O utilities.
//!
//! Extraction always works from one in-memory buffer, so the file-based API
//! reads here once and hands the bytes to the pipeline.

use std::path::Path;

use tokio::fs;

use crate::{DocsiftError, Result};

/// Read a file asynchronously.
///
/// # Errors
///
/// Returns `DocsiftError::Io` for I/O errors (these always bubble up).
pub async fn read_file_async(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    fs::read(path.as_ref()).await.map_err(DocsiftError::Io)
}

/// Basename of a resource address: the final path segment, with both `/`
/// and `\` treated as separators.
pub fn resource_basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
