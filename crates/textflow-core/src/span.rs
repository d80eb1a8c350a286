//! Character-offset match annotations.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A match annotation over one textual field of a tuple.
///
/// `start` and `end` are character offsets (not byte offsets) into the value
/// of the field named by `attribute_name`. `key` identifies what produced the
/// match (the query keyword, the raw regex, or a label name); `value` is the
/// matched substring itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    attribute_name: String,
    start: usize,
    end: usize,
    key: String,
    value: String,
}

impl Span {
    /// Build a span, rejecting inverted offsets. Producers are responsible
    /// for `end` staying within the field value they matched against.
    pub fn new(
        attribute_name: impl Into<String>,
        start: usize,
        end: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        if start > end {
            return Err(Error::Invariant(format!(
                "span start {} exceeds end {}",
                start, end
            )));
        }
        Ok(Self {
            attribute_name: attribute_name.into(),
            start,
            end,
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Length of the annotated range, in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
