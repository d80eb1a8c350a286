//! Convenient re-exports for downstream crates.

pub use crate::attribute::{Attribute, AttributeType};
pub use crate::config::EngineConfig;
pub use crate::error::{Error, Result};
pub use crate::schema::Schema;
pub use crate::span::Span;
pub use crate::tuple::{Field, Tuple};
