//! Plugin system: decoder trait, registration, and discovery.
//!
//! Format support is pluggable. A decoder implements [`Plugin`] (lifecycle)
//! and [`Decoder`] (media types, priority, decode), and registers in the
//! [`DecoderRegistry`]. Built-in decoders live in [`crate::decoders`] and
//! register themselves on first use; a host can register its own decoder
//! with a higher priority to override a built-in one.

pub mod decoder;
pub mod registry;
pub mod traits;

pub use decoder::{DecodeContext, DecodeMode, Decoder};
pub use registry::{get_decoder_registry, DecoderRegistry, DECODER_REGISTRY};
pub use traits::Plugin;
