//! Span-producing matcher operators.
//!
//! Both matchers are [`crate::unary::TupleProcessor`] implementations: they
//! scan configured STRING/TEXT attributes of each tuple, emit one
//! character-offset [`Span`] per occurrence, and append the collected spans
//! as a new list attribute. A tuple with zero matches is discarded by the
//! single-input template, which is normal control flow rather than an error.

pub mod keyword;
mod labeled;
pub mod regex;

use ::regex::Regex;

use textflow_core::prelude::{Schema, Span};

use crate::traits::OpError;

/// How a raw regex pattern is classified once at set-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// No label markers; compiled once, matched directly.
    Plain,
    /// Label markers and nothing outside `[A-Za-z0-9<> ]`.
    LabeledUnqualified,
    /// Label markers plus other regex metacharacters; needs the full
    /// per-tuple rewrite path.
    LabeledQualified,
}

/// Run a global find-all over `text`, appending one span per match.
///
/// The regex crate reports byte offsets; spans carry character offsets, so
/// the walk converts incrementally (matches arrive in increasing order,
/// which keeps this a single pass over `text`).
pub(crate) fn find_spans(
    re: &Regex,
    attribute_name: &str,
    text: &str,
    key: &str,
    out: &mut Vec<Span>,
) -> Result<(), OpError> {
    let mut chars_seen = 0usize;
    let mut last_byte = 0usize;
    for m in re.find_iter(text) {
        let start = chars_seen + text[last_byte..m.start()].chars().count();
        let end = start + m.as_str().chars().count();
        chars_seen = end;
        last_byte = m.end();
        out.push(Span::new(attribute_name, start, end, key, m.as_str())?);
    }
    Ok(())
}

/// Schema-side validation shared by the matchers: every scanned attribute
/// must exist; the result attribute must not.
pub(crate) fn annotated_schema(
    input: &Schema,
    attribute_names: &[String],
    spans_attribute: &str,
) -> Result<Schema, OpError> {
    for name in attribute_names {
        if !input.contains(name) {
            return Err(OpError::Schema(format!(
                "missing attribute '{}' in input schema",
                name
            )));
        }
    }
    let appended = input.with_appended(textflow_core::attribute::Attribute::new(
        spans_attribute,
        textflow_core::attribute::AttributeType::List,
    ))?;
    Ok(appended)
}

/// Open-time validation shared by the matchers: only STRING/TEXT attributes
/// are legal match targets.
pub(crate) fn check_match_targets(
    operator: &str,
    input: &Schema,
    attribute_names: &[String],
) -> Result<(), OpError> {
    if attribute_names.is_empty() {
        return Err(OpError::Config(format!(
            "{} has no attributes configured to scan",
            operator
        )));
    }
    for name in attribute_names {
        if name.trim().is_empty() {
            return Err(OpError::Config(format!(
                "{} has an empty attribute name configured",
                operator
            )));
        }
        // transform_schema already guaranteed existence.
        if let Some(attr) = input.attribute(name) {
            if !attr.attribute_type().is_textual() {
                return Err(OpError::Config(format!(
                    "{} cannot match against attribute '{}' of type {}",
                    operator,
                    name,
                    attr.attribute_type()
                )));
            }
        }
    }
    Ok(())
}
