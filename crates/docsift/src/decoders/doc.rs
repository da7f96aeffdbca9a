//! Legacy Word decoder.
//!
//! `.doc` files are OLE2 compound files; the `WordDocument` stream opens
//! with the File Information Block (FIB), which carries the encryption flag
//! and the byte range of the document text. Password-protected documents are
//! refused with an encrypted-document error before any text is touched.
//! Document properties come from the `\x05SummaryInformation` property-set
//! stream.

use std::io::{Cursor, Read, Seek};

use async_trait::async_trait;
use tracing::debug;

use crate::plugins::{DecodeContext, DecodeMode, Decoder, Plugin};
use crate::types::{DecodedDocument, Metadata};
use crate::{charset, mime, text, DocsiftError, Result};

const FIB_MAGIC: u16 = 0xA5EC;
const FIB_FLAG_ENCRYPTED: u16 = 0x0100;
const FIB_MIN_LEN: usize = 0x20;

/// Summary-information property ids surfaced as metadata, in output order.
const SUMMARY_PROPERTIES: [(u32, &str); 6] = [
    (0x02, "title"),
    (0x03, "subject"),
    (0x04, "creator"),
    (0x05, "keywords"),
    (0x0C, "created"),
    (0x0D, "modified"),
];

const VT_LPSTR: u32 = 30;
const VT_LPWSTR: u32 = 31;
const VT_FILETIME: u32 = 64;

pub struct DocDecoder;

impl Plugin for DocDecoder {
    fn name(&self) -> &str {
        "doc-decoder"
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
impl Decoder for DocDecoder {
    async fn decode(&self, content: &[u8], media_type: &str, ctx: &DecodeContext) -> Result<DecodedDocument> {
        let mut container = cfb::CompoundFile::open(Cursor::new(content))
            .map_err(|e| DocsiftError::corrupt_with_source("invalid OLE2 container", e))?;

        let word_stream = match read_stream(&mut container, "WordDocument")? {
            Some(bytes) => bytes,
            // A compound file without a WordDocument stream is some other
            // OLE2 product (spreadsheet, installer); only a resource that
            // claimed to be Word is corrupt.
            None if media_type == mime::MSWORD_MIME_TYPE => {
                return Err(DocsiftError::corrupt(
                    "OLE2 container has no WordDocument stream",
                ));
            }
            None => return Err(DocsiftError::unsupported_format(media_type)),
        };

        let fib = Fib::parse(&word_stream)?;
        if fib.encrypted {
            return Err(DocsiftError::encrypted(
                "Word document is password-protected; cannot extract content",
            ));
        }

        let mut metadata = Metadata::new();
        if let Some(summary) = read_stream(&mut container, "\u{5}SummaryInformation")? {
            collect_summary_properties(&summary, &mut metadata);
        }

        let content = match ctx.mode {
            DecodeMode::Full => {
                let raw = fib.text_range(&word_stream)?;
                let (decoded, _) = charset::decode_text(raw)?;
                text::normalize(&scrub_text(&decoded))
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
        &[mime::MSWORD_MIME_TYPE, "application/x-ole-storage"]
    }
}

fn read_stream<R: Read + Seek>(
    container: &mut cfb::CompoundFile<R>,
    name: &str,
) -> Result<Option<Vec<u8>>> {
    if !container.is_stream(name) {
        return Ok(None);
    }
    let mut stream = container
        .open_stream(name)
        .map_err(|e| DocsiftError::corrupt_with_source(format!("cannot read stream '{}'", name.trim_start_matches('\u{5}')), e))?;
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

/// The handful of FIB fields extraction needs.
struct Fib {
    encrypted: bool,
    fc_min: usize,
    fc_mac: usize,
}

impl Fib {
    fn parse(stream: &[u8]) -> Result<Self> {
        if stream.len() < FIB_MIN_LEN {
            return Err(DocsiftError::corrupt("WordDocument stream is truncated"));
        }
        if u16_at(stream, 0x00) != FIB_MAGIC {
            return Err(DocsiftError::corrupt(
                "WordDocument stream is not a Word binary document",
            ));
        }
        let flags = u16_at(stream, 0x0A);
        Ok(Self {
            encrypted: flags & FIB_FLAG_ENCRYPTED != 0,
            fc_min: u32_at(stream, 0x18) as usize,
            fc_mac: u32_at(stream, 0x1C) as usize,
        })
    }

    /// The contiguous document-text bytes, `fcMin..fcMac`.
    fn text_range<'a>(&self, stream: &'a [u8]) -> Result<&'a [u8]> {
        if self.fc_min > self.fc_mac || self.fc_mac > stream.len() {
            return Err(DocsiftError::corrupt(
                "document text range lies outside the WordDocument stream",
            ));
        }
        Ok(&stream[self.fc_min..self.fc_mac])
    }
}

/// Translate Word's in-text control characters: paragraph, cell, and line
/// marks become newlines; field and object placeholders are dropped.
fn scrub_text(decoded: &str) -> String {
    let mut out = String::with_capacity(decoded.len());
    for ch in decoded.chars() {
        match ch {
            '\r' | '\u{7}' | '\u{B}' | '\u{C}' => out.push('\n'),
            '\n' | '\t' => out.push(ch),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Best-effort read of the OLE property-set stream. Malformed property sets
/// lose metadata, never the extraction.
fn collect_summary_properties(stream: &[u8], metadata: &mut Metadata) {
    // PropertySetStream header: byte order, format, OS version, CLSID,
    // section count, then the first section's FMTID and offset.
    let Some(section_start) = u32_at_checked(stream, 0x2C).map(|v| v as usize) else {
        debug!("summary-information stream too short; skipping properties");
        return;
    };
    let Some(count) = u32_at_checked(stream, section_start + 4) else {
        return;
    };

    for (id, name) in SUMMARY_PROPERTIES {
        for entry in 0..count as usize {
            let entry_offset = section_start + 8 + entry * 8;
            if u32_at_checked(stream, entry_offset) != Some(id) {
                continue;
            }
            let Some(value_offset) = u32_at_checked(stream, entry_offset + 4) else {
                continue;
            };
            if let Some(value) = read_property_value(stream, section_start + value_offset as usize) {
                metadata.add(name, value);
            }
        }
    }
}

fn read_property_value(stream: &[u8], offset: usize) -> Option<String> {
    let vt = u32_at_checked(stream, offset)? & 0xFFFF;
    match vt {
        VT_LPSTR => {
            let len = u32_at_checked(stream, offset + 4)? as usize;
            let bytes = stream.get(offset + 8..offset + 8 + len)?;
            let trimmed: &[u8] = match bytes.iter().position(|&b| b == 0) {
                Some(nul) => &bytes[..nul],
                None => bytes,
            };
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(trimmed);
            let value = decoded.trim().to_string();
            (!value.is_empty()).then_some(value)
        }
        VT_LPWSTR => {
            let cch = u32_at_checked(stream, offset + 4)? as usize;
            let bytes = stream.get(offset + 8..offset + 8 + cch * 2)?;
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .take_while(|&unit| unit != 0)
                .collect();
            let value = String::from_utf16_lossy(&units).trim().to_string();
            (!value.is_empty()).then_some(value)
        }
        VT_FILETIME => {
            let low = u32_at_checked(stream, offset + 4)? as u64;
            let high = u32_at_checked(stream, offset + 8)? as u64;
            format_filetime((high << 32) | low)
        }
        _ => None,
    }
}

/// Format a FILETIME (100ns intervals since 1601-01-01 UTC) as ISO 8601.
fn format_filetime(filetime: u64) -> Option<String> {
    if filetime == 0 {
        return None;
    }
    const EPOCH_DELTA_SECS: u64 = 11_644_473_600;
    let unix = (filetime / 10_000_000).checked_sub(EPOCH_DELTA_SECS)? as i64;
    let days = unix.div_euclid(86_400);
    let tod = unix.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    Some(format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        tod / 3_600,
        (tod / 60) % 60,
        tod % 60
    ))
}

/// Gregorian date from days since 1970-01-01 (civil-from-days conversion).
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn u32_at_checked(bytes: &[u8], offset: usize) -> Option<u32> {
    let slice = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}
