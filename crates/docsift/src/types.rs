//! Core result and configuration types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Well-known metadata property names.
pub mod properties {
    /// Basename of the resource the content came from.
    pub const RESOURCE_NAME: &str = "resourceName";
    /// Effective media type after detection and override resolution.
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// Character encoding of textual content.
    pub const CONTENT_ENCODING: &str = "Content-Encoding";
}

/// Ordered, multi-valued document metadata.
///
/// Property names keep insertion order; each name maps to an ordered list of
/// string values. [`Metadata::add`] appends (duplicates accumulate),
/// [`Metadata::set`] replaces the whole value list.
///
/// Serializes as a JSON object of string arrays, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: IndexMap<String, Vec<String>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for a property, keeping any existing values.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.entries.entry(name.to_string()).or_default().push(value.into());
    }

    /// Replace all values of a property with a single value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_string(), vec![value.into()]);
    }

    /// All values for a property, in insertion order.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// First value for a property.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    /// Property names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct property names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append all entries from `other` after the existing ones.
    ///
    /// Values under a name already present are appended to that name's list.
    pub fn merge(&mut self, other: Metadata) {
        for (name, values) in other.entries {
            self.entries.entry(name).or_default().extend(values);
        }
    }
}

/// Result of one extraction: normalized text, the effective media type, and
/// the accumulated metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedDocument {
    /// Canonical UTF-8 text. Empty for non-textual terminals such as images.
    pub content: String,
    /// Effective media type essence, e.g. `application/pdf`.
    pub media_type: String,
    pub metadata: Metadata,
}

/// Per-call extraction options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Caller-declared content type. Subject to the override rules in
    /// [`crate::mime::effective_media_type`]; `None` means trust detection.
    pub content_type: Option<String>,
    /// Maximum container nesting depth before extraction fails.
    pub max_archive_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            content_type: None,
            max_archive_depth: 8,
        }
    }
}

/// Result of natural-language detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageDetection {
    /// ISO 639-1 code, or `"und"` when undetermined.
    pub language: String,
    /// Whether the detector considers the identification reliable.
    pub reasonably_certain: bool,
}
