//! Keyword matcher: scan-based literal substring search.
//!
//! The query string is escaped and compiled as a literal regex, which gives
//! case-insensitive matching for free instead of hand-rolled folding.

use ::regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use textflow_core::attribute::{Attribute, AttributeType};
use textflow_core::prelude::Schema;
use textflow_core::tuple::{Field, Tuple};

use crate::matchers::{annotated_schema, check_match_targets, find_spans};
use crate::traits::OpError;
use crate::unary::TupleProcessor;

/// Immutable configuration of a [`KeywordMatcher`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordPredicate {
    /// Literal query string to scan for.
    pub query: String,
    /// STRING/TEXT attributes to scan.
    pub attribute_names: Vec<String>,
    /// Match ignoring case.
    pub ignore_case: bool,
    /// Name of the span-list attribute appended to matching tuples.
    pub spans_attribute: String,
}

pub struct KeywordMatcher {
    predicate: KeywordPredicate,
    compiled: Option<::regex::Regex>,
}

impl KeywordMatcher {
    pub fn new(predicate: KeywordPredicate) -> Self {
        Self {
            predicate,
            compiled: None,
        }
    }

    pub fn predicate(&self) -> &KeywordPredicate {
        &self.predicate
    }
}

impl TupleProcessor for KeywordMatcher {
    fn name(&self) -> &'static str {
        "keyword_matcher"
    }

    fn transform_schema(&self, input_schema: &Schema) -> Result<Schema, OpError> {
        annotated_schema(
            input_schema,
            &self.predicate.attribute_names,
            &self.predicate.spans_attribute,
        )
    }

    fn set_up(&mut self, input_schema: &Schema) -> Result<(), OpError> {
        if self.predicate.query.is_empty() {
            return Err(OpError::Config("keyword matcher has an empty query".into()));
        }
        if self.predicate.spans_attribute.trim().is_empty() {
            return Err(OpError::Config(
                "keyword matcher has an empty spans attribute name".into(),
            ));
        }
        check_match_targets(
            "keyword matcher",
            input_schema,
            &self.predicate.attribute_names,
        )?;

        let literal = ::regex::escape(&self.predicate.query);
        let re = RegexBuilder::new(&literal)
            .case_insensitive(self.predicate.ignore_case)
            .build()
            .map_err(|e| OpError::Config(format!("query failed to compile: {}", e)))?;
        self.compiled = Some(re);
        Ok(())
    }

    fn process_one(&mut self, tuple: &Tuple) -> Result<Option<Tuple>, OpError> {
        let re = self
            .compiled
            .as_ref()
            .ok_or_else(|| OpError::Dataflow("keyword matcher used before set_up".into()))?;

        let mut spans = Vec::new();
        for name in &self.predicate.attribute_names {
            let field = tuple.field_by_name(name).ok_or_else(|| {
                OpError::Dataflow(format!("attribute '{}' missing from tuple", name))
            })?;
            let text = field.as_str().ok_or_else(|| {
                OpError::Dataflow(format!("attribute '{}' is not textual", name))
            })?;
            find_spans(re, name, text, &self.predicate.query, &mut spans)?;
        }

        if spans.is_empty() {
            return Ok(None);
        }
        let attribute = Attribute::new(&self.predicate.spans_attribute, AttributeType::List);
        let annotated = tuple.with_appended(attribute, Field::List(spans))?;
        Ok(Some(annotated))
    }

    fn clean_up(&mut self) -> Result<(), OpError> {
        self.compiled = None;
        Ok(())
    }
}
