//! Image decoder.
//!
//! Images are a valid terminal case: text content is empty, never an error,
//! and the probe results (format, dimensions) land in metadata. Bytes that
//! claim an image type but do not decode are a corrupt document.

use async_trait::async_trait;
use image::GenericImageView;

use crate::plugins::{DecodeContext, Decoder, Plugin};
use crate::types::{DecodedDocument, Metadata};
use crate::{DocsiftError, Result};

pub struct ImageDecoder;

impl Plugin for ImageDecoder {
    fn name(&self) -> &str {
        "image-decoder"
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
impl Decoder for ImageDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, _ctx: &DecodeContext) -> Result<DecodedDocument> {
        let format = image::guess_format(content)
            .map_err(|e| DocsiftError::corrupt_with_source("unrecognized image data", e))?;
        let img = image::load_from_memory(content)
            .map_err(|e| DocsiftError::corrupt_with_source("failed to decode image", e))?;
        let (width, height) = img.dimensions();

        let mut metadata = Metadata::new();
        metadata.add("Image Format", format.to_mime_type());
        metadata.add("Image Width", width.to_string());
        metadata.add("Image Height", height.to_string());

        Ok(DecodedDocument {
            content: String::new(),
            media_type: media_type.to_string(),
            metadata,
        })
    }

    fn supported_media_types(&self) -> &[&str] {
        &["image/*"]
    }
}
