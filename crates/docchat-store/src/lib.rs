//! # docchat-store
//!
//! Vector index implementations for docchat. The in-memory
//! [`MemoryIndex`] is the only backend: indexes here live for a session and
//! are rebuilt wholesale on every ingest, which is exactly what its atomic
//! generation swap provides.

pub mod memory;

pub use memory::MemoryIndex;
