//! Single orchestration path for every extraction.
//!
//! One pass over one in-memory buffer: sniff the media type, apply the
//! declared-type override rules, seed the dispatcher-owned metadata, look
//! up a decoder, decode, and merge decoder metadata after the seeded
//! entries. Container decoders re-enter here for each entry, so embedded
//! resources get the identical treatment.

use tracing::debug;

use crate::core::io::resource_basename;
use crate::plugins::{get_decoder_registry, DecodeContext};
use crate::types::{properties, DecodedDocument, Metadata};
use crate::{decoders, mime, DocsiftError, Result};

/// Decode one resource. Fail-fast: any error yields no partial result.
pub(crate) async fn decode_resource(
    content: &[u8],
    resource_name: &str,
    ctx: &DecodeContext,
) -> Result<DecodedDocument> {
    decoders::ensure_initialized()?;

    let sniffed = mime::detect_media_type(content, Some(resource_name));
    let effective = mime::effective_media_type(&sniffed, ctx.options.content_type.as_deref());
    debug!(
        resource = resource_name,
        sniffed = sniffed.as_str(),
        effective = effective.as_str(),
        depth = ctx.depth,
        "dispatching resource"
    );

    let decoder = {
        let registry = get_decoder_registry();
        let guard = registry
            .read()
            .map_err(|_| DocsiftError::extraction("decoder registry lock poisoned"))?;
        guard.get(&effective)?
    };

    let mut metadata = Metadata::new();
    metadata.add(properties::RESOURCE_NAME, resource_basename(resource_name));
    metadata.add(properties::CONTENT_TYPE, effective.as_str());

    let decoded = decoder.decode(content, &effective, ctx).await?;
    metadata.merge(decoded.metadata);

    Ok(DecodedDocument {
        content: decoded.content,
        media_type: effective,
        metadata,
    })
}

/// Re-entry point for container entries. The child context already dropped
/// any caller-declared content type; embedded entries are always sniffed.
pub(crate) async fn decode_embedded(
    content: &[u8],
    resource_name: &str,
    ctx: DecodeContext,
) -> Result<DecodedDocument> {
    decode_resource(content, resource_name, &ctx).await
}
