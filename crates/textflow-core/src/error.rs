use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    // Raised while tuples are flowing, never at wiring/open time. A dataflow
    // error means the graph is structurally wrong (e.g. a label-producing
    // operator was never attached upstream).
    #[error("Dataflow error: {0}")]
    Dataflow(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}
