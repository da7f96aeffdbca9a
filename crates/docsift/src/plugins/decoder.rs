//! Decoder plugin trait and per-request decode context.

use async_trait::async_trait;

use crate::plugins::Plugin;
use crate::types::{DecodedDocument, ExtractOptions};
use crate::Result;

/// What a decoder is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Text content and metadata.
    Full,
    /// Metadata only; decoders skip assembling content.
    MetadataOnly,
}

/// Per-request state handed to decoders.
///
/// Carries the requested [`DecodeMode`], the current container nesting depth,
/// and the caller's options. One context lives for one extraction call.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    pub mode: DecodeMode,
    /// Container nesting depth. `0` for the top-level resource.
    pub depth: usize,
    pub options: ExtractOptions,
}

impl DecodeContext {
    pub fn new(mode: DecodeMode, options: ExtractOptions) -> Self {
        Self {
            mode,
            depth: 0,
            options,
        }
    }

    /// Context for an embedded container entry: one level deeper, and the
    /// caller-declared content type no longer applies.
    pub fn child(&self) -> Self {
        let mut options = self.options.clone();
        options.content_type = None;
        Self {
            mode: self.mode,
            depth: self.depth + 1,
            options,
        }
    }
}

/// Format decoder plugin.
///
/// Decoders are stateless between calls and selected by media type through
/// the [`DecoderRegistry`](crate::plugins::DecoderRegistry). A decoder
/// returning content leaves normalization guarantees intact: LF line endings,
/// no BOM, and one trailing blank line for non-empty text.
///
/// # Thread Safety
///
/// Decoders must be `Send + Sync`; one instance serves concurrent requests.
#[async_trait]
pub trait Decoder: Plugin {
    /// Decode `content` of the given effective media type.
    ///
    /// `media_type` is the bare essence (no parameters). The returned
    /// document's metadata holds decoder-discovered properties only; the
    /// dispatcher owns `resourceName` and `Content-Type`.
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument>;

    /// Media types this decoder handles: exact essences or `prefix/*`
    /// wildcards (e.g. `"image/*"`).
    fn supported_media_types(&self) -> &[&str];

    /// Selection priority when several decoders claim a media type.
    ///
    /// Higher wins. Built-in decoders use 50; register with a higher value
    /// to override one.
    fn priority(&self) -> i32 {
        50
    }
}
