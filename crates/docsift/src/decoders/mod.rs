//! Built-in format decoders.
//!
//! All built-ins register at priority 50. A host can override any of them by
//! registering its own decoder for the same media type with a higher
//! priority.

pub mod archive;
pub mod doc;
pub mod html;
pub mod image;
pub mod office;
pub mod pdf;
pub mod text;
pub mod xml;

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::plugins::get_decoder_registry;
use crate::{DocsiftError, Result};

pub use archive::{TarDecoder, ZipDecoder};
pub use doc::DocDecoder;
pub use html::HtmlDecoder;
pub use image::ImageDecoder;
pub use office::{DocxDecoder, OdtDecoder};
pub use pdf::PdfDecoder;
pub use text::PlainTextDecoder;
pub use xml::XmlDecoder;

static DECODERS_INITIALIZED: Lazy<std::result::Result<(), String>> =
    Lazy::new(|| register_default_decoders().map_err(|e| e.to_string()));

/// Register all built-in decoders in the global registry.
pub fn register_default_decoders() -> Result<()> {
    let registry = get_decoder_registry();
    let mut registry = registry
        .write()
        .map_err(|_| DocsiftError::extraction("decoder registry lock poisoned"))?;

    registry.register(Arc::new(PlainTextDecoder))?;
    registry.register(Arc::new(XmlDecoder))?;
    registry.register(Arc::new(HtmlDecoder))?;
    registry.register(Arc::new(PdfDecoder))?;
    registry.register(Arc::new(DocxDecoder))?;
    registry.register(Arc::new(OdtDecoder))?;
    registry.register(Arc::new(DocDecoder))?;
    registry.register(Arc::new(ImageDecoder))?;
    registry.register(Arc::new(ZipDecoder))?;
    registry.register(Arc::new(TarDecoder))?;

    Ok(())
}

/// Make sure the built-in decoders are registered.
///
/// Called on every pipeline entry; the first call does the work. If a test
/// has cleared the global registry, the built-ins are registered again.
pub fn ensure_initialized() -> Result<()> {
    match &*DECODERS_INITIALIZED {
        Ok(()) => {
            let registry = get_decoder_registry();
            let empty = registry
                .read()
                .map_err(|_| DocsiftError::extraction("decoder registry lock poisoned"))?
                .list()
                .is_empty();
            if empty {
                register_default_decoders()?;
            }
            Ok(())
        }
        Err(message) => Err(DocsiftError::extraction(format!(
            "built-in decoder registration failed: {}",
            message
        ))),
    }
}
