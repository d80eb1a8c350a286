#![forbid(unsafe_code)]
//! textflow-core: record model, errors, and configuration for the textflow engine.
//!
//! Everything that flows through an operator graph is described here:
//! attributes and schemas, tuples positioned against a schema, and spans
//! annotating character ranges of textual fields. All of these are immutable
//! value objects; "modifying" one always builds a new value.
//!
//! This crate does no I/O and holds no runtime state.

pub mod attribute;
pub mod config;
pub mod error;
pub mod prelude;
pub mod schema;
pub mod span;
pub mod tuple;

/// Engine version string for provenance (run summaries etc.).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
