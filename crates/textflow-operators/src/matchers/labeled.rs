//! Label machinery for the regex matcher.
//!
//! A label marker is `<name>`: an opening `<`, any run of characters other
//! than `<`, `>`, and `\`, then a closing `>`. Label names are trimmed of
//! surrounding whitespace during preprocessing, and every `<rawName>`
//! occurrence is rewritten to `<trimmedName>` so match-time substitution only
//! ever sees trimmed names.

use std::collections::HashMap;

use ::regex::{Captures, Regex};
use once_cell::sync::Lazy;

use crate::matchers::PatternKind;
use crate::traits::OpError;

static LABEL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^<>\\]*>").expect("label marker pattern is valid"));

/// A raw pattern classified and preprocessed once at set-up.
#[derive(Debug, Clone)]
pub(crate) struct PreparedPattern {
    pub kind: PatternKind,
    /// The pattern with every label rewritten to its trimmed name. Equal to
    /// the raw pattern for plain patterns.
    pub cleaned: String,
    /// Referenced label names, deduplicated, in order of first occurrence.
    pub labels: Vec<String>,
}

/// Classify `raw` and rewrite its label markers.
pub(crate) fn prepare(raw: &str) -> Result<PreparedPattern, OpError> {
    if !LABEL_MARKER.is_match(raw) {
        return Ok(PreparedPattern {
            kind: PatternKind::Plain,
            cleaned: raw.to_string(),
            labels: Vec::new(),
        });
    }

    let mut labels: Vec<String> = Vec::new();
    let cleaned = LABEL_MARKER
        .replace_all(raw, |caps: &Captures| {
            let marker = &caps[0];
            let name = marker[1..marker.len() - 1].trim().to_string();
            if !labels.iter().any(|l| l == &name) {
                labels.push(name.clone());
            }
            format!("<{}>", name)
        })
        .into_owned();

    if labels.iter().any(|l| l.is_empty()) {
        return Err(OpError::Config(format!(
            "pattern '{}' contains an empty label marker",
            raw
        )));
    }

    let unqualified = raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '<' | '>' | ' '));
    let kind = if unqualified {
        PatternKind::LabeledUnqualified
    } else {
        PatternKind::LabeledQualified
    };

    Ok(PreparedPattern {
        kind,
        cleaned,
        labels,
    })
}

/// Build the `(v1|v2|...)` replacement group for one label. Every value is
/// escaped so it matches literally no matter what regex metacharacters it
/// contains.
pub(crate) fn alternation_group(values: &[String]) -> String {
    let escaped: Vec<String> = values.iter().map(|v| ::regex::escape(v)).collect();
    format!("({})", escaped.join("|"))
}

/// Substitute replacement groups for every label marker in a cleaned
/// pattern. Markers without a replacement are left untouched.
pub(crate) fn substitute(cleaned: &str, groups: &HashMap<String, String>) -> String {
    LABEL_MARKER
        .replace_all(cleaned, |caps: &Captures| {
            let marker = &caps[0];
            let name = marker[1..marker.len() - 1].trim();
            match groups.get(name) {
                Some(group) => group.clone(),
                None => marker.to_string(),
            }
        })
        .into_owned()
}
