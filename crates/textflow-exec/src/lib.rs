#![forbid(unsafe_code)]
//! textflow-exec: synchronous pipeline driver and run summaries.
//!
//! The driver owns the engine configuration, wires it into the operators it
//! builds, and drains an operator tree through the pull protocol on a single
//! thread.

pub mod runtime;

pub use runtime::{Engine, ExecError, RunId, RunSummary};
