//! Operator trait + common interfaces.
//!
//! Every operator is a two-state machine (Closed, Opened) driven through a
//! synchronous pull protocol: `open` recursively opens upstream operators and
//! fixes the output schema, `pull` yields tuples until exhaustion, `close`
//! releases resources upstream-first. Schema computation is a pure function
//! over input schemas so callers can probe a pipeline's shape before running
//! it.

use textflow_core::prelude::Schema;
use textflow_core::tuple::Tuple;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    /// Structural misuse: rewiring a live pipeline, missing upstream, invalid
    /// branch count, unsupported match target, invalid predicate.
    #[error("configuration error: {0}")]
    Config(String),

    /// Schema transformation failure: duplicate output attribute, missing
    /// required input attribute, type mismatch.
    #[error("schema error: {0}")]
    Schema(String),

    /// Raised mid-pull when the graph turns out to be structurally wrong
    /// (e.g. a referenced label was never produced upstream). Fatal to the
    /// pull, never swallowed.
    #[error("dataflow error: {0}")]
    Dataflow(String),
}

impl From<textflow_core::error::Error> for OpError {
    fn from(e: textflow_core::error::Error) -> Self {
        use textflow_core::error::Error;
        match e {
            Error::Config(msg) => OpError::Config(msg),
            Error::Schema(msg) => OpError::Schema(msg),
            Error::Dataflow(msg) => OpError::Dataflow(msg),
            Error::Invariant(msg) => OpError::Dataflow(msg),
        }
    }
}

/// Lifecycle state shared by all operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorState {
    #[default]
    Closed,
    Opened,
}

/// Trait that all operators must implement.
///
/// Invariants:
/// - `open` and `close` are idempotent.
/// - `pull` is only valid while Opened; `output_schema` only after `open`.
/// - `transform_schema` is pure and callable without opening anything.
pub trait Operator: Send {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Given input schemas, return the output schema this operator would
    /// produce. Enforces that every attribute the operator reads exists in
    /// the input and that every attribute it introduces does not.
    fn transform_schema(&self, input_schemas: &[Schema]) -> Result<Schema, OpError>;

    /// Open upstream operators, compute the output schema, compile state.
    /// Returns immediately if already opened.
    fn open(&mut self) -> Result<(), OpError>;

    /// Next tuple, or `None` once exhausted. Only valid between `open` and
    /// `close`.
    fn pull(&mut self) -> Result<Option<Tuple>, OpError>;

    /// Close upstream operators and release resources. Returns immediately
    /// if already closed. Safe to call mid-stream; unread buffered data is
    /// not an error.
    fn close(&mut self) -> Result<(), OpError>;

    /// Output schema fixed by `open`.
    fn output_schema(&self) -> Result<&Schema, OpError>;
}

/// Boxed operator for dynamic dispatch across operator kinds.
pub type BoxedOperator = Box<dyn Operator>;

/// Shared check for single-input schema transforms.
pub(crate) fn expect_one_input<'a>(
    name: &str,
    input_schemas: &'a [Schema],
) -> Result<&'a Schema, OpError> {
    match input_schemas {
        [schema] => Ok(schema),
        _ => Err(OpError::Schema(format!(
            "{} expects exactly one input schema, got {}",
            name,
            input_schemas.len()
        ))),
    }
}
