//! Attribute names and declared field types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a tuple field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    Integer,
    Long,
    Double,
    Boolean,
    String,
    Text,
    Date,
    DateTime,
    /// A list of [`crate::span::Span`] annotations.
    List,
    Id,
}

impl AttributeType {
    /// STRING and TEXT are the only types matchers may scan.
    pub fn is_textual(&self) -> bool {
        matches!(self, AttributeType::String | AttributeType::Text)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::Integer => "integer",
            AttributeType::Long => "long",
            AttributeType::Double => "double",
            AttributeType::Boolean => "boolean",
            AttributeType::String => "string",
            AttributeType::Text => "text",
            AttributeType::Date => "date",
            AttributeType::DateTime => "datetime",
            AttributeType::List => "list",
            AttributeType::Id => "id",
        };
        write!(f, "{}", name)
    }
}

/// A named, typed column of a schema. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    attribute_type: AttributeType,
}

impl Attribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute_type(&self) -> AttributeType {
        self.attribute_type
    }
}
