#![forbid(unsafe_code)]
//! textflow-operators: pull-protocol operators for the textflow engine.
//!
//! Design intent:
//! - Keep this crate pure and synchronous (no async, no I/O).
//! - Every operator implements the same four-call protocol
//!   (`open`/`pull`/`close`/`output_schema`) plus a pure schema transform,
//!   so sources, matchers, and connector branches compose freely.
//! - Schema and wiring mistakes surface at `open`, before any data flows.

pub mod connector;
pub mod matchers;
pub mod source;
pub mod traits;
pub mod unary;

pub use connector::{BroadcastBranch, BroadcastConnector};
pub use matchers::keyword::{KeywordMatcher, KeywordPredicate};
pub use matchers::regex::{RegexMatcher, RegexPredicate};
pub use matchers::PatternKind;
pub use source::TupleSource;
pub use traits::{BoxedOperator, OpError, Operator, OperatorState};
pub use unary::{TupleProcessor, UnaryOperator};
