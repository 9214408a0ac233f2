//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Entity extraction (GLiNER over ONNX Runtime, offline lexicon)
//! - Media sources (YouTube results page, MediaWiki API, in-memory fixtures)
//! - HTTP boundary and CLI wiring

pub mod adapter;
pub mod api;

pub use adapter::*;
