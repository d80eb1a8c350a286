//! Regex matcher: plain patterns and the labeled-regex rewrite path.
//!
//! A plain pattern compiles once at set-up. A labeled pattern references
//! spans produced upstream (`<drug> taken`): at match time the distinct span
//! values of each referenced label are escaped, joined into an alternation
//! group, and substituted for the label marker, and the resulting concrete
//! pattern is compiled and matched. Because label values vary per tuple the
//! concrete pattern recompiles per tuple; a bounded cache keyed by the
//! rewritten pattern string absorbs repeats.

use std::collections::HashMap;

use ::regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use textflow_core::attribute::{Attribute, AttributeType};
use textflow_core::prelude::{Schema, Span};
use textflow_core::tuple::{Field, Tuple};

use crate::matchers::labeled::{alternation_group, prepare, substitute, PreparedPattern};
use crate::matchers::{annotated_schema, check_match_targets, find_spans, PatternKind};
use crate::traits::OpError;
use crate::unary::TupleProcessor;

pub const DEFAULT_PATTERN_CACHE_CAPACITY: usize = 64;

/// Immutable configuration of a [`RegexMatcher`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegexPredicate {
    /// Raw pattern, possibly containing `<label>` markers.
    pub pattern: String,
    /// STRING/TEXT attributes to scan.
    pub attribute_names: Vec<String>,
    /// Compile with case-insensitive matching.
    pub ignore_case: bool,
    /// Name of the span-list attribute appended to matching tuples.
    pub spans_attribute: String,
}

enum CompiledPattern {
    Plain(Regex),
    Labeled(PreparedPattern),
}

/// Bounded compiled-pattern cache for the labeled path. When full it resets
/// wholesale; label vocabularies are small in practice, so the reset is a
/// rare event rather than a churn point.
struct PatternCache {
    map: HashMap<String, Regex>,
    capacity: usize,
}

impl PatternCache {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    fn get_or_compile(&mut self, pattern: &str, ignore_case: bool) -> Result<Regex, OpError> {
        if let Some(re) = self.map.get(pattern) {
            return Ok(re.clone());
        }
        if self.map.len() >= self.capacity {
            self.map.clear();
        }
        let re = RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| {
                OpError::Dataflow(format!(
                    "rewritten pattern '{}' failed to compile: {}",
                    pattern, e
                ))
            })?;
        self.map.insert(pattern.to_string(), re.clone());
        Ok(re)
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}

/// Span-producing regex matcher. Wrap in
/// [`crate::unary::UnaryOperator`] to obtain a full operator.
pub struct RegexMatcher {
    predicate: RegexPredicate,
    compiled: Option<CompiledPattern>,
    cache: PatternCache,
}

impl RegexMatcher {
    pub fn new(predicate: RegexPredicate) -> Self {
        Self {
            predicate,
            compiled: None,
            cache: PatternCache::new(DEFAULT_PATTERN_CACHE_CAPACITY),
        }
    }

    pub fn with_pattern_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = PatternCache::new(capacity);
        self
    }

    pub fn predicate(&self) -> &RegexPredicate {
        &self.predicate
    }

    /// Classification of the configured pattern; available after set-up.
    pub fn pattern_kind(&self) -> Option<PatternKind> {
        match self.compiled.as_ref()? {
            CompiledPattern::Plain(_) => Some(PatternKind::Plain),
            CompiledPattern::Labeled(prepared) => Some(prepared.kind),
        }
    }

    fn validate_predicate(&self) -> Result<(), OpError> {
        if self.predicate.pattern.is_empty() {
            return Err(OpError::Config("regex matcher has an empty pattern".into()));
        }
        if self.predicate.spans_attribute.trim().is_empty() {
            return Err(OpError::Config(
                "regex matcher has an empty spans attribute name".into(),
            ));
        }
        Ok(())
    }
}

impl TupleProcessor for RegexMatcher {
    fn name(&self) -> &'static str {
        "regex_matcher"
    }

    fn transform_schema(&self, input_schema: &Schema) -> Result<Schema, OpError> {
        annotated_schema(
            input_schema,
            &self.predicate.attribute_names,
            &self.predicate.spans_attribute,
        )
    }

    fn set_up(&mut self, input_schema: &Schema) -> Result<(), OpError> {
        self.validate_predicate()?;
        check_match_targets("regex matcher", input_schema, &self.predicate.attribute_names)?;

        let prepared = prepare(&self.predicate.pattern)?;
        let compiled = match prepared.kind {
            PatternKind::Plain => {
                let re = RegexBuilder::new(&prepared.cleaned)
                    .case_insensitive(self.predicate.ignore_case)
                    .build()
                    .map_err(|e| {
                        OpError::Config(format!(
                            "invalid pattern '{}': {}",
                            self.predicate.pattern, e
                        ))
                    })?;
                CompiledPattern::Plain(re)
            }
            PatternKind::LabeledUnqualified | PatternKind::LabeledQualified => {
                // Probe-compile with a placeholder per label so a malformed
                // pattern skeleton fails at open, before any data flows.
                let probe_groups: HashMap<String, String> = prepared
                    .labels
                    .iter()
                    .map(|l| (l.clone(), "(x)".to_string()))
                    .collect();
                let probe = substitute(&prepared.cleaned, &probe_groups);
                RegexBuilder::new(&probe)
                    .case_insensitive(self.predicate.ignore_case)
                    .build()
                    .map_err(|e| {
                        OpError::Config(format!(
                            "invalid pattern '{}': {}",
                            self.predicate.pattern, e
                        ))
                    })?;
                CompiledPattern::Labeled(prepared)
            }
        };
        self.compiled = Some(compiled);
        Ok(())
    }

    fn process_one(&mut self, tuple: &Tuple) -> Result<Option<Tuple>, OpError> {
        let compiled = self
            .compiled
            .as_ref()
            .ok_or_else(|| OpError::Dataflow("regex matcher used before set_up".into()))?;

        let spans = match compiled {
            CompiledPattern::Plain(re) => {
                let mut spans = Vec::new();
                for name in &self.predicate.attribute_names {
                    let text = text_field(tuple, name)?;
                    find_spans(re, name, text, &self.predicate.pattern, &mut spans)?;
                }
                spans
            }
            CompiledPattern::Labeled(prepared) => {
                match_labeled(&mut self.cache, &self.predicate, prepared, tuple)?
            }
        };

        if spans.is_empty() {
            return Ok(None);
        }
        let attribute = Attribute::new(&self.predicate.spans_attribute, AttributeType::List);
        let annotated = tuple.with_appended(attribute, Field::List(spans))?;
        Ok(Some(annotated))
    }

    fn clean_up(&mut self) -> Result<(), OpError> {
        self.compiled = None;
        self.cache.clear();
        Ok(())
    }
}

/// The labeled match path: resolve label values from the tuple, escape and
/// substitute them, compile the concrete pattern, and run find-all over the
/// configured attributes.
fn match_labeled(
    cache: &mut PatternCache,
    predicate: &RegexPredicate,
    prepared: &PreparedPattern,
    tuple: &Tuple,
) -> Result<Vec<Span>, OpError> {
    let mut groups: HashMap<String, String> = HashMap::new();
    for label in &prepared.labels {
        let field = tuple
            .field_by_name(label)
            .ok_or_else(|| OpError::Dataflow(format!("label '{}' not found in tuple", label)))?;
        let span_list = field.as_span_list().ok_or_else(|| {
            OpError::Dataflow(format!("label '{}' resolves to a non-list attribute", label))
        })?;
        let mut values: Vec<String> = Vec::new();
        for span in span_list {
            if !values.iter().any(|v| v == span.value()) {
                values.push(span.value().to_string());
            }
        }
        if values.is_empty() {
            // No upstream value for this label: nothing the pattern could
            // match in this tuple.
            return Ok(Vec::new());
        }
        groups.insert(label.clone(), alternation_group(&values));
    }

    let concrete = substitute(&prepared.cleaned, &groups);
    let re = cache.get_or_compile(&concrete, predicate.ignore_case)?;

    let mut spans = Vec::new();
    for name in &predicate.attribute_names {
        let text = text_field(tuple, name)?;
        find_spans(&re, name, text, &predicate.pattern, &mut spans)?;
    }
    Ok(spans)
}

/// Textual field content, post-validation. A non-string field here means the
/// tuple disagrees with the schema the operator was opened against.
fn text_field<'a>(tuple: &'a Tuple, name: &str) -> Result<&'a str, OpError> {
    let field = tuple
        .field_by_name(name)
        .ok_or_else(|| OpError::Dataflow(format!("attribute '{}' missing from tuple", name)))?;
    field
        .as_str()
        .ok_or_else(|| OpError::Dataflow(format!("attribute '{}' is not textual", name)))
}
