//! Ordered, uniquely-named attribute sets.
//!
//! Attribute-name comparisons are case-insensitive (ASCII) everywhere:
//! uniqueness at construction, lookups, and duplicate detection when
//! appending. One policy, applied uniformly.

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::error::{Error, Result};

/// Immutable, ordered set of attributes with unique names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    /// Build a schema, rejecting duplicate attribute names.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        for (i, attr) in attributes.iter().enumerate() {
            if attributes[..i]
                .iter()
                .any(|a| a.name().eq_ignore_ascii_case(attr.name()))
            {
                return Err(Error::Schema(format!(
                    "duplicate attribute '{}'",
                    attr.name()
                )));
            }
        }
        Ok(Self { attributes })
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Position of the attribute with the given name, if any.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.name().eq_ignore_ascii_case(name))
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.index_of(name).map(|i| &self.attributes[i])
    }

    pub fn attribute_at(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// New schema with one more attribute at the end. Fails on a name clash.
    pub fn with_appended(&self, attribute: Attribute) -> Result<Schema> {
        if self.contains(attribute.name()) {
            return Err(Error::Schema(format!(
                "duplicate attribute '{}'",
                attribute.name()
            )));
        }
        let mut attributes = self.attributes.clone();
        attributes.push(attribute);
        Ok(Schema { attributes })
    }
}
