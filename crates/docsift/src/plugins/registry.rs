//! Decoder registration and discovery.
//!
//! Decoders register under every media type they support, keyed by priority.
//! Lookup prefers an exact media-type match, then scans `prefix/*` wildcard
//! registrations; within one media type the highest priority wins. The global
//! registry is populated once at first use and treated as read-only
//! afterwards, so concurrent extractions only take read locks.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::plugins::Decoder;
use crate::{DocsiftError, Result};

/// Validate a plugin name before registration.
///
/// Names cannot be empty or contain whitespace.
fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DocsiftError::validation("Plugin name cannot be empty"));
    }
    if name.contains(char::is_whitespace) {
        return Err(DocsiftError::validation(format!(
            "Plugin name '{}' cannot contain whitespace",
            name
        )));
    }
    Ok(())
}

/// Registry for decoder plugins.
///
/// # Thread Safety
///
/// The registry itself is not synchronized; the global instance wraps it in
/// a `RwLock`.
pub struct DecoderRegistry {
    decoders: HashMap<String, BTreeMap<i32, Arc<dyn Decoder>>>,
    name_index: HashMap<String, Vec<(String, i32)>>,
}

impl DecoderRegistry {
    /// Create a new empty decoder registry.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
            name_index: HashMap::new(),
        }
    }

    /// Register a decoder for all media types it supports.
    ///
    /// # Errors
    ///
    /// Fails when the plugin name is invalid, when another decoder already
    /// holds one of the media types at the same priority, or when
    /// `initialize` fails; the decoder is not registered in any case.
    pub fn register(&mut self, decoder: Arc<dyn Decoder>) -> Result<()> {
        let name = decoder.name().to_string();
        let priority = decoder.priority();
        let media_types: Vec<String> = decoder
            .supported_media_types()
            .iter()
            .map(|s| s.to_string())
            .collect();

        validate_plugin_name(&name)?;

        // Reject collisions up front so a failed registration leaves the
        // registry untouched.
        for media_type in &media_types {
            if let Some(priority_map) = self.decoders.get(media_type) {
                if priority_map.contains_key(&priority) {
                    return Err(DocsiftError::validation(format!(
                        "A decoder for '{}' at priority {} is already registered",
                        media_type, priority
                    )));
                }
            }
        }

        decoder.initialize()?;

        let mut index_entries = Vec::new();
        for media_type in &media_types {
            self.decoders
                .entry(media_type.clone())
                .or_default()
                .insert(priority, Arc::clone(&decoder));
            index_entries.push((media_type.clone(), priority));
        }
        self.name_index.insert(name, index_entries);

        Ok(())
    }

    /// Get the highest priority decoder for a media type.
    ///
    /// Exact registrations win over wildcard ones.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` when no registration covers the media type.
    pub fn get(&self, media_type: &str) -> Result<Arc<dyn Decoder>> {
        if let Some(priority_map) = self.decoders.get(media_type) {
            if let Some((_priority, decoder)) = priority_map.iter().next_back() {
                return Ok(Arc::clone(decoder));
            }
        }

        let mut best_match: Option<(i32, Arc<dyn Decoder>)> = None;
        for (registered, priority_map) in &self.decoders {
            if !registered.ends_with("/*") {
                continue;
            }
            let prefix = &registered[..registered.len() - 1];
            if !media_type.starts_with(prefix) {
                continue;
            }
            if let Some((priority, decoder)) = priority_map.iter().next_back() {
                let replace = match &best_match {
                    None => true,
                    Some((current, _)) => *priority > *current,
                };
                if replace {
                    best_match = Some((*priority, Arc::clone(decoder)));
                }
            }
        }

        if let Some((_priority, decoder)) = best_match {
            return Ok(decoder);
        }

        Err(DocsiftError::UnsupportedFormat(media_type.to_string()))
    }

    /// List all registered decoder names.
    pub fn list(&self) -> Vec<String> {
        self.name_index.keys().cloned().collect()
    }

    /// Remove a decoder from the registry, calling `shutdown` on it.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index_entries = match self.name_index.remove(name) {
            Some(entries) => entries,
            None => return Ok(()),
        };

        let mut decoder_to_shutdown: Option<Arc<dyn Decoder>> = None;
        for (media_type, priority) in index_entries {
            if let Some(priority_map) = self.decoders.get_mut(&media_type) {
                if let Some(decoder) = priority_map.remove(&priority) {
                    if decoder_to_shutdown.is_none() {
                        decoder_to_shutdown = Some(decoder);
                    }
                }
                if priority_map.is_empty() {
                    self.decoders.remove(&media_type);
                }
            }
        }

        if let Some(decoder) = decoder_to_shutdown {
            decoder.shutdown()?;
        }

        Ok(())
    }

    /// Shutdown all decoders and clear the registry.
    pub fn shutdown_all(&mut self) -> Result<()> {
        let names = self.list();
        for name in names {
            self.remove(&name)?;
        }
        Ok(())
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global decoder registry singleton.
pub static DECODER_REGISTRY: Lazy<Arc<RwLock<DecoderRegistry>>> =
    Lazy::new(|| Arc::new(RwLock::new(DecoderRegistry::new())));

/// Get the global decoder registry.
pub fn get_decoder_registry() -> Arc<RwLock<DecoderRegistry>> {
    DECODER_REGISTRY.clone()
}
