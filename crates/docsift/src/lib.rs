//! # docsift
//!
//! Document content-extraction engine: given a local file or an in-memory
//! buffer, docsift detects the media type and character encoding by sniffing
//! bytes, dispatches to a format decoder, and returns normalized UTF-8 text
//! plus ordered multi-valued metadata. Container formats (zip, tar) are
//! traversed recursively; every entry goes through the same pipeline as a
//! top-level file.
//!
//! ## Quick start
//!
//! ```no_run
//! use docsift::{extract_text, ExtractOptions};
//!
//! # async fn run() -> docsift::Result<()> {
//! let text = extract_text("report.pdf", &ExtractOptions::default()).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```
//!
//! Detection without extraction:
//!
//! ```no_run
//! # async fn run() -> docsift::Result<()> {
//! let media_type = docsift::detect_type("archive", true).await?;
//! assert_eq!(media_type, "application/zip");
//! # Ok(())
//! # }
//! ```
//!
//! Language detection is pure and synchronous:
//!
//! ```
//! let detected = docsift::detect_language("This is just some text in English.");
//! assert_eq!(detected.language, "en");
//! ```
//!
//! ## Architecture
//!
//! - [`mime`] - signature-first media-type detection and the declared-type
//!   override rules
//! - [`charset`] - BOM, UTF-16 heuristic, UTF-8 validation, and legacy
//!   encoding guesses
//! - [`plugins`] - the decoder plugin contract and the priority-based
//!   registry
//! - [`decoders`] - built-in decoders (text, XML, HTML, PDF, DOCX, ODT,
//!   legacy Word, images, zip, tar)
//! - [`core`] - file I/O, the dispatch pipeline, and the public operations
//! - [`language`] - natural-language identification
//!
//! Format support is extensible: implement [`plugins::Decoder`] and register
//! it in the global registry, optionally with a higher priority to override
//! a built-in decoder.

pub mod charset;
pub mod core;
pub mod decoders;
pub mod error;
pub mod language;
pub mod mime;
pub mod plugins;
pub mod text;
pub mod types;

pub use core::extractor::{
    detect_charset, detect_charset_bytes, detect_type, detect_type_bytes, extract, extract_bytes,
    extract_metadata, extract_metadata_bytes, extract_text, extract_text_bytes,
};
pub use error::{DocsiftError, Result};
pub use language::detect_language;
pub use mime::MediaType;
pub use types::{DecodedDocument, ExtractOptions, LanguageDetection, Metadata};
