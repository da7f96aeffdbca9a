//! Office document decoders: OOXML wordprocessing (DOCX) and ODF text (ODT).
//!
//! Both formats are zip containers holding XML parts. Text comes from the
//! main document part (`word/document.xml` / `content.xml`); document
//! properties come from the property parts (`docProps/core.xml` and
//! `docProps/app.xml` / `meta.xml`).

use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::plugins::{DecodeContext, DecodeMode, Decoder, Plugin};
use crate::types::{DecodedDocument, Metadata};
use crate::{mime, text, DocsiftError, Result};

/// Property elements read from `docProps/core.xml`, by local element name.
const CORE_PROPERTIES: [(&str, &str); 6] = [
    ("title", "title"),
    ("subject", "subject"),
    ("creator", "creator"),
    ("keywords", "keywords"),
    ("created", "created"),
    ("modified", "modified"),
];

/// Property elements read from `docProps/app.xml`.
const APP_PROPERTIES: [(&str, &str); 1] = [("Application", "Application-Name")];

/// Property elements read from ODF `meta.xml`.
const ODF_PROPERTIES: [(&str, &str); 5] = [
    ("title", "title"),
    ("subject", "subject"),
    ("creator", "creator"),
    ("date", "modified"),
    ("generator", "Application-Name"),
];

pub struct DocxDecoder;

impl Plugin for DocxDecoder {
    fn name(&self) -> &str {
        "docx-decoder"
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
impl Decoder for DocxDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument> {
        let mut archive = open_container(content)?;

        let mut metadata = Metadata::new();
        if let Some(core) = read_part(&mut archive, "docProps/core.xml")? {
            collect_properties(&core, &CORE_PROPERTIES, &mut metadata)?;
        }
        if let Some(app) = read_part(&mut archive, "docProps/app.xml")? {
            collect_properties(&app, &APP_PROPERTIES, &mut metadata)?;
        }

        let content = match ctx.mode {
            DecodeMode::Full => {
                let document = read_part(&mut archive, "word/document.xml")?.ok_or_else(|| {
                    DocsiftError::corrupt("OOXML container has no word/document.xml part")
                })?;
                text::normalize(&wordprocessing_text(&document)?)
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
        &[mime::DOCX_MIME_TYPE]
    }
}

pub struct OdtDecoder;

impl Plugin for OdtDecoder {
    fn name(&self) -> &str {
        "odt-decoder"
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
impl Decoder for OdtDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument> {
        let mut archive = open_container(content)?;

        let mut metadata = Metadata::new();
        if let Some(meta) = read_part(&mut archive, "meta.xml")? {
            collect_properties(&meta, &ODF_PROPERTIES, &mut metadata)?;
        }

        let content = match ctx.mode {
            DecodeMode::Full => {
                let document = read_part(&mut archive, "content.xml")?
                    .ok_or_else(|| DocsiftError::corrupt("ODF container has no content.xml part"))?;
                text::normalize(&wordprocessing_text(&document)?)
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
        &[mime::ODT_MIME_TYPE]
    }
}

fn open_container(content: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(content))
        .map_err(|e| DocsiftError::corrupt_with_source("invalid office container", e))
}

/// Read one named part out of the container; `None` when the part is absent.
fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(DocsiftError::corrupt_with_source(format!("cannot read part '{}'", name), e)),
    };
    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

/// Extract paragraph text from a wordprocessing XML part.
///
/// Works for both OOXML (`w:p`/`w:t`, with `w:tab` and `w:br` runs) and ODF
/// (`text:p`/`text:h`, with `text:tab` and `text:line-break`): only local
/// names are inspected, and ODF paragraphs carry their text directly.
fn wordprocessing_text(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut out = String::new();
    let mut paragraph_depth = 0usize;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" | b"h" => paragraph_depth += 1,
                _ => {}
            },
            Ok(Event::Empty(e)) if paragraph_depth > 0 => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"line-break" => out.push('\n'),
                b"s" => out.push(' '),
                _ => {}
            },
            Ok(Event::Text(e)) if paragraph_depth > 0 => {
                let unescaped = e
                    .xml_content()
                    .map_err(|e| DocsiftError::corrupt_with_source("invalid XML character data", e))?;
                out.push_str(&unescaped);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" | b"h" => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    out.push('\n');
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DocsiftError::corrupt_with_source("malformed document part", e));
            }
        }
        buf.clear();
    }
    Ok(out)
}

/// Collect flat property elements from an XML part into metadata.
///
/// `table` maps local element names to metadata property names; element
/// character data becomes the value.
fn collect_properties(xml: &[u8], table: &[(&str, &str)], metadata: &mut Metadata) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut current: Option<&str> = None;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let local = e.local_name();
                current = table
                    .iter()
                    .find(|(element, _)| element.as_bytes() == local.as_ref())
                    .map(|(_, property)| *property);
            }
            Ok(Event::Text(e)) => {
                if let Some(property) = current {
                    let unescaped = e.xml_content().map_err(|e| {
                        DocsiftError::corrupt_with_source("invalid XML character data", e)
                    })?;
                    let value = unescaped.trim();
                    if !value.is_empty() {
                        metadata.add(property, value);
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DocsiftError::corrupt_with_source("malformed properties part", e));
            }
        }
        buf.clear();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::DecodeMode;
    use crate::types::ExtractOptions;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn build_docx(body_runs: &[&str]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut cursor);
        let options = FileOptions::<'_, ()>::default();

        writer
            .start_file("[Content_Types].xml", options)
            .unwrap();
        writer
            .write_all(b"<?xml version=\"1.0\"?><Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"/>")
            .unwrap();

        writer.start_file("docProps/core.xml", options).unwrap();
        writer
            .write_all(
                b"<?xml version=\"1.0\"?>\
                <cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
                xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\
                <dc:title>Test Document</dc:title>\
                <dc:creator>A. Writer</dc:creator>\
                </cp:coreProperties>",
            )
            .unwrap();

        writer.start_file("docProps/app.xml", options).unwrap();
        writer
            .write_all(
                b"<?xml version=\"1.0\"?>\
                <Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\
                <Application>TestSuite Office</Application>\
                </Properties>",
            )
            .unwrap();

        let mut body = String::new();
        for run in body_runs {
            body.push_str(&format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", run));
        }
        writer.start_file("word/document.xml", options).unwrap();
        writer
            .write_all(
                format!(
                    "<?xml version=\"1.0\"?>\
                    <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
                    <w:body>{}</w:body></w:document>",
                    body
                )
                .as_bytes(),
            )
            .unwrap();

        writer.finish().unwrap();
        cursor.into_inner()
    }

    fn ctx(mode: DecodeMode) -> DecodeContext {
        DecodeContext::new(mode, ExtractOptions::default())
    }

    #[tokio::test]
    async fn test_docx_paragraph_text() {
        let content = build_docx(&["First paragraph.", "Second paragraph."]);
        let doc = DocxDecoder
            .decode(&content, mime::DOCX_MIME_TYPE, &ctx(DecodeMode::Full))
            .await
            .unwrap();
        assert_eq!(doc.content, "First paragraph.\nSecond paragraph.\n\n");
    }

    #[tokio::test]
    async fn test_docx_core_and_app_properties() {
        let content = build_docx(&["Body."]);
        let doc = DocxDecoder
            .decode(&content, mime::DOCX_MIME_TYPE, &ctx(DecodeMode::Full))
            .await
            .unwrap();
        assert_eq!(doc.metadata.first("title"), Some("Test Document"));
        assert_eq!(doc.metadata.first("creator"), Some("A. Writer"));
        assert_eq!(doc.metadata.first("Application-Name"), Some("TestSuite Office"));
    }

    #[tokio::test]
    async fn test_docx_metadata_only_has_no_content() {
        let content = build_docx(&["Body."]);
        let doc = DocxDecoder
            .decode(&content, mime::DOCX_MIME_TYPE, &ctx(DecodeMode::MetadataOnly))
            .await
            .unwrap();
        assert!(doc.content.is_empty());
        assert_eq!(doc.metadata.first("title"), Some("Test Document"));
    }

    #[tokio::test]
    async fn test_not_a_zip_is_corrupt() {
        let err = DocxDecoder
            .decode(b"not a zip at all", mime::DOCX_MIME_TYPE, &ctx(DecodeMode::Full))
            .await
            .unwrap_err();
        assert!(matches!(err, DocsiftError::CorruptDocument { .. }));
    }

    #[tokio::test]
    async fn test_zip_without_document_part_is_corrupt() {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut cursor);
        let options = FileOptions::<'_, ()>::default();
        writer.start_file("unrelated.txt", options).unwrap();
        writer.write_all(b"hello").unwrap();
        writer.finish().unwrap();
        let content = cursor.into_inner();

        let err = DocxDecoder
            .decode(&content, mime::DOCX_MIME_TYPE, &ctx(DecodeMode::Full))
            .await
            .unwrap_err();
        assert!(matches!(err, DocsiftError::CorruptDocument { .. }));
    }

    #[tokio::test]
    async fn test_odt_content_and_meta() {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut cursor);
        let options = FileOptions::<'_, ()>::default();

        writer.start_file("mimetype", options).unwrap();
        writer
            .write_all(mime::ODT_MIME_TYPE.as_bytes())
            .unwrap();

        writer.start_file("meta.xml", options).unwrap();
        writer
            .write_all(
                b"<?xml version=\"1.0\"?>\
                <office:document-meta xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\" \
                xmlns:meta=\"urn:oasis:names:tc:opendocument:xmlns:meta:1.0\" \
                xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\
                <office:meta><dc:creator>B. Writer</dc:creator>\
                <meta:generator>TestSuite Writer</meta:generator></office:meta>\
                </office:document-meta>",
            )
            .unwrap();

        writer.start_file("content.xml", options).unwrap();
        writer
            .write_all(
                b"<?xml version=\"1.0\"?>\
                <office:document-content xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\" \
                xmlns:text=\"urn:oasis:names:tc:opendocument:xmlns:text:1.0\">\
                <office:body><office:text>\
                <text:p>Hello from ODT.</text:p>\
                </office:text></office:body></office:document-content>",
            )
            .unwrap();

        writer.finish().unwrap();
        let content = cursor.into_inner();

        let doc = OdtDecoder
            .decode(&content, mime::ODT_MIME_TYPE, &ctx(DecodeMode::Full))
            .await
            .unwrap();
        assert_eq!(doc.content, "Hello from ODT.\n\n");
        assert_eq!(doc.metadata.first("creator"), Some("B. Writer"));
        assert_eq!(doc.metadata.first("Application-Name"), Some("TestSuite Writer"));
    }
}
