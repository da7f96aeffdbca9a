//! Media-type detection and declared-type override rules.
//!
//! Detection is signature-first: magic bytes, then a structured-text sniff of
//! a decoded prefix, then a plain-text heuristic, and only then the file
//! extension. A resource therefore detects identically with or without an
//! extension, and re-detection of the same bytes is idempotent.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::charset;

pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";
pub const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";
pub const XML_MIME_TYPE: &str = "application/xml";
pub const HTML_MIME_TYPE: &str = "text/html";
pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const ZIP_MIME_TYPE: &str = "application/zip";
pub const TAR_MIME_TYPE: &str = "application/x-tar";
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const ODT_MIME_TYPE: &str = "application/vnd.oasis.opendocument.text";
pub const MSWORD_MIME_TYPE: &str = "application/msword";

/// Bytes of the prefix handed to the textual sniff.
const TEXT_SNIFF_LIMIT: usize = 4096;

static EXT_TO_MIME: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("txt", PLAIN_TEXT_MIME_TYPE);
    m.insert("text", PLAIN_TEXT_MIME_TYPE);
    m.insert("md", "text/markdown");
    m.insert("markdown", "text/markdown");
    m.insert("csv", "text/csv");
    m.insert("tsv", "text/tab-separated-values");
    m.insert("xml", XML_MIME_TYPE);
    m.insert("html", HTML_MIME_TYPE);
    m.insert("htm", HTML_MIME_TYPE);
    m.insert("pdf", PDF_MIME_TYPE);
    m.insert("doc", MSWORD_MIME_TYPE);
    m.insert("docx", DOCX_MIME_TYPE);
    m.insert("odt", ODT_MIME_TYPE);
    m.insert("zip", ZIP_MIME_TYPE);
    m.insert("tar", TAR_MIME_TYPE);
    m.insert("png", "image/png");
    m.insert("jpg", "image/jpeg");
    m.insert("jpeg", "image/jpeg");
    m.insert("gif", "image/gif");
    m.insert("bmp", "image/bmp");
    m.insert("tif", "image/tiff");
    m.insert("tiff", "image/tiff");
    m.insert("webp", "image/webp");
    m
});

/// A parsed media type: `type/subtype` essence plus an optional charset
/// parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    essence: String,
    charset: Option<String>,
}

impl MediaType {
    /// Parse a media-type string such as `text/plain` or
    /// `text/plain; charset=UTF-8`. Returns `None` when the essence is not
    /// a `type/subtype` pair.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let essence = parts.next()?.trim().to_ascii_lowercase();
        let (top, sub) = essence.split_once('/')?;
        if top.is_empty() || sub.is_empty() || sub.contains('/') {
            return None;
        }
        let mut charset = None;
        for param in parts {
            if let Some((key, value)) = param.split_once('=') {
                if key.trim().eq_ignore_ascii_case("charset") {
                    charset = Some(value.trim().trim_matches('"').to_string());
                }
            }
        }
        Some(Self { essence, charset })
    }

    pub fn essence(&self) -> &str {
        &self.essence
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn top_level(&self) -> &str {
        self.essence.split('/').next().unwrap_or(&self.essence)
    }

    pub fn subtype(&self) -> &str {
        self.essence.split('/').nth(1).unwrap_or("")
    }

    /// Whether this is an XML-derived type: `application/xml`, `text/xml`,
    /// or any `+xml` suffix type.
    pub fn is_xml(&self) -> bool {
        self.essence == XML_MIME_TYPE
            || self.essence == "text/xml"
            || self.subtype().ends_with("+xml")
    }

    /// Whether charset detection is meaningful for this type.
    pub fn is_textual(&self) -> bool {
        self.top_level() == "text" || self.is_xml()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.charset {
            Some(charset) => write!(f, "{}; charset={}", self.essence, charset),
            None => write!(f, "{}", self.essence),
        }
    }
}

/// Detect the media type of `content`, consulting `name_hint` only when the
/// bytes themselves are inconclusive.
pub fn detect_media_type(content: &[u8], name_hint: Option<&str>) -> String {
    if let Some(kind) = infer::get(content) {
        return kind.mime_type().to_string();
    }

    if !content.is_empty() {
        let prefix = &content[..content.len().min(TEXT_SNIFF_LIMIT)];
        if let Ok((decoded, _)) = charset::decode_text(prefix) {
            if let Some(markup) = sniff_markup(&decoded) {
                return markup.to_string();
            }
            if looks_textual(&decoded) {
                return PLAIN_TEXT_MIME_TYPE.to_string();
            }
        }
    }

    if let Some(name) = name_hint {
        if let Some(mime) = mime_type_for_name(name) {
            return mime;
        }
    }

    debug!("no signature, text shape, or extension matched; defaulting to octet-stream");
    OCTET_STREAM_MIME_TYPE.to_string()
}

/// Resolve the effective media type from the sniffed type and an optional
/// caller-declared one. Parameters on the declared type are dropped; the
/// result is always a bare essence.
///
/// - no declared type: sniffed wins;
/// - declared `application/octet-stream`: says nothing, sniffed wins;
/// - sniffed is XML-derived but the declaration is not `application/xml`
///   itself: the declaration is considered stale (Word-2003-style XML saved
///   under a legacy type) and the sniffed type wins;
/// - otherwise the declaration wins.
pub fn effective_media_type(sniffed: &str, declared: Option<&str>) -> String {
    let Some(declared_raw) = declared else {
        return sniffed.to_string();
    };
    let Some(declared) = MediaType::parse(declared_raw) else {
        warn!(declared = declared_raw, "ignoring unparseable declared content type");
        return sniffed.to_string();
    };
    if declared.essence() == OCTET_STREAM_MIME_TYPE {
        return sniffed.to_string();
    }
    if let Some(sniffed_mt) = MediaType::parse(sniffed) {
        if sniffed_mt.is_xml() && declared.essence() != XML_MIME_TYPE {
            debug!(
                declared = declared.essence(),
                sniffed, "content sniffs as XML; overriding declared type"
            );
            return sniffed_mt.essence().to_string();
        }
    }
    declared.essence().to_string()
}

/// Look up a media type from a resource name's extension, falling back to
/// the `mime_guess` database for extensions outside the built-in table.
pub fn mime_type_for_name(name: &str) -> Option<String> {
    let ext = name.rsplit('.').next()?.to_ascii_lowercase();
    if ext == name {
        return None;
    }
    if let Some(mime) = EXT_TO_MIME.get(ext.as_str()) {
        return Some((*mime).to_string());
    }
    mime_guess::from_ext(&ext).first().map(|m| m.essence_str().to_string())
}

fn sniff_markup(text: &str) -> Option<&'static str> {
    let trimmed = text.trim_start_matches('\u{FEFF}').trim_start();
    let mut end = trimmed.len().min(256);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    let lower = trimmed[..end].to_ascii_lowercase();
    if lower.starts_with("<?xml") {
        return Some(XML_MIME_TYPE);
    }
    if lower.starts_with("<!doctype html") || lower.starts_with("<html") {
        return Some(HTML_MIME_TYPE);
    }
    None
}

/// Mostly-printable check on decoded text. Control characters other than
/// whitespace and replacement characters from lossy decoding count against
/// the content.
fn looks_textual(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let mut total = 0usize;
    let mut suspect = 0usize;
    for ch in text.chars() {
        total += 1;
        let control = ch.is_control() && ch != '\n' && ch != '\r' && ch != '\t';
        if control || ch == '\u{FFFD}' {
            suspect += 1;
        }
    }
    suspect * 20 < total
}
