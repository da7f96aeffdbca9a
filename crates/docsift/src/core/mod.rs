//! Core orchestration: file I/O, the extraction pipeline, and the public
//! entry points.

pub mod extractor;
pub mod io;
pub(crate) mod pipeline;
