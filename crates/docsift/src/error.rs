//! Error types for docsift.
//!
//! All fallible operations return [`Result`], an alias over [`DocsiftError`].
//!
//! # Error Handling Philosophy
//!
//! **System errors MUST always bubble up unchanged:**
//! - `DocsiftError::Io` (from `std::io::Error`) - File system errors, permission errors
//! - These indicate real system problems that users need to know about
//! - Never wrap or suppress these - they must surface to enable bug reports
//!
//! **Application errors are wrapped with context:**
//! - `Detection` - Media-type or charset detection failures
//! - `UnsupportedFormat` - No decoder registered for a media type
//! - `EncryptedDocument` - Password-protected input
//! - `CorruptDocument` - Structurally invalid input for its detected type
//! - `Extraction` - Decoder failures that fit no more specific category
//!
//! # Example
//!
//! ```rust
//! use docsift::{DocsiftError, Result};
//!
//! fn require_content(bytes: &[u8]) -> Result<()> {
//!     if bytes.is_empty() {
//!         return Err(DocsiftError::detection("empty input"));
//!     }
//!     Ok(())
//! }
//! ```
use thiserror::Error;

/// Result type alias using `DocsiftError`.
pub type Result<T> = std::result::Result<T, DocsiftError>;

/// Main error type for all docsift operations.
///
/// # Variants
///
/// - `Io` - File system and I/O errors (always bubble up)
/// - `Detection` - Media-type or charset detection failures
/// - `UnsupportedFormat` - Detected media type has no registered decoder
/// - `EncryptedDocument` - Content is password-protected
/// - `CorruptDocument` - Content is structurally invalid for its detected type
/// - `Extraction` - Decoder failures with no more specific category
/// - `Validation` - Invalid input parameters or plugin registration data
/// - `Plugin` - Plugin lifecycle errors
#[derive(Debug, Error)]
pub enum DocsiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Detection error: {message}")]
    Detection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Encrypted document: {0}")]
    EncryptedDocument(String),

    #[error("Corrupt document: {message}")]
    CorruptDocument {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Extraction error: {message}")]
    Extraction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Plugin error in '{plugin_name}': {message}")]
    Plugin { message: String, plugin_name: String },
}

impl From<serde_json::Error> for DocsiftError {
    fn from(err: serde_json::Error) -> Self {
        DocsiftError::Extraction {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $name_with_source:ident, $variant:ident) => {
        #[doc = concat!("Create a `", stringify!($variant), "` error.")]
        pub fn $name<S: Into<String>>(message: S) -> Self {
            Self::$variant {
                message: message.into(),
                source: None,
            }
        }

        #[doc = concat!("Create a `", stringify!($variant), "` error with a source cause.")]
        pub fn $name_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
            message: S,
            source: E,
        ) -> Self {
            Self::$variant {
                message: message.into(),
                source: Some(Box::new(source)),
            }
        }
    };
}

impl DocsiftError {
    error_constructor!(detection, detection_with_source, Detection);
    error_constructor!(corrupt, corrupt_with_source, CorruptDocument);
    error_constructor!(extraction, extraction_with_source, Extraction);
    error_constructor!(validation, validation_with_source, Validation);

    /// Create an `EncryptedDocument` error.
    pub fn encrypted<S: Into<String>>(message: S) -> Self {
        Self::EncryptedDocument(message.into())
    }

    /// Create an `UnsupportedFormat` error for a media type.
    pub fn unsupported_format<S: Into<String>>(media_type: S) -> Self {
        Self::UnsupportedFormat(media_type.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DocsiftError = io_err.into();
        assert!(matches!(err, DocsiftError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_detection_error() {
        let err = DocsiftError::detection("could not determine charset");
        assert_eq!(err.to_string(), "Detection error: could not determine charset");
    }

    #[test]
    fn test_detection_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad data");
        let err = DocsiftError::detection_with_source("could not determine charset", source);
        assert_eq!(err.to_string(), "Detection error: could not determine charset");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unsupported_format_error() {
        let err = DocsiftError::unsupported_format("application/octet-stream");
        assert_eq!(err.to_string(), "Unsupported format: application/octet-stream");
    }

    #[test]
    fn test_encrypted_document_error() {
        let err = DocsiftError::encrypted("document requires a password");
        assert_eq!(err.to_string(), "Encrypted document: document requires a password");
    }

    #[test]
    fn test_corrupt_document_error_with_source() {
        let source = std::io::Error::other("truncated stream");
        let err = DocsiftError::corrupt_with_source("invalid zip archive", source);
        assert_eq!(err.to_string(), "Corrupt document: invalid zip archive");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_extraction_error() {
        let err = DocsiftError::extraction("decoder failed");
        assert_eq!(err.to_string(), "Extraction error: decoder failed");
    }

    #[test]
    fn test_validation_error() {
        let err = DocsiftError::validation("invalid plugin name");
        assert_eq!(err.to_string(), "Validation error: invalid plugin name");
    }
}
