//! Parameter reference substitution over document content.
//!
//! A reference is `{{ name }}` or `{{ name[index] }}`. Without an index the
//! first value of the parameter is used. Text that does not follow this
//! grammar is literal.

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{MessageError, MessageResult};
use crate::model::ParameterSet;

const REFERENCE_PATTERN: &str =
    r"\{\{\s*(?P<name>[A-Za-z0-9_.\-]+)\s*(?:\[\s*(?P<index>[0-9]+)\s*\])?\s*\}\}";

#[allow(clippy::expect_used)] // literal pattern
fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("reference pattern compiles"))
}

/// One parameter reference found in document text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterReference {
    /// Referenced parameter name.
    pub name: String,
    /// Explicit value index, `None` for the first value.
    pub index: Option<usize>,
    /// Token as written in the document, braces included.
    pub token: String,
}

impl ParameterReference {
    /// Parse a complete reference token such as `{{ commands[1] }}`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let captures = reference_pattern().captures(token)?;
        let whole = captures.get(0)?;
        if whole.start() != 0 || whole.end() != token.len() {
            return None;
        }
        Self::from_captures(&captures)
    }

    fn from_captures(captures: &Captures<'_>) -> Option<Self> {
        let token = captures.get(0)?.as_str().to_string();
        let name = captures.name("name")?.as_str().to_string();
        // Indices too large for usize cannot select anything.
        let index = captures
            .name("index")
            .map(|digits| digits.as_str().parse::<usize>().unwrap_or(usize::MAX));
        Some(Self { name, index, token })
    }
}

impl fmt::Display for ParameterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Replace every reference inside `content` with its parameter value.
///
/// Object keys, numbers, booleans and null are copied unchanged. The first
/// reference without a value, in document order, fails the whole call with
/// `UnresolvedParameter`. Inserted values are not expanded, and a reference
/// they carry to a missing parameter fails the call as well.
pub fn substitute(content: &Value, parameters: &ParameterSet) -> MessageResult<Value> {
    match content {
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| {
                substitute(value, parameters).map(|resolved| (key.clone(), resolved))
            })
            .collect::<MessageResult<Map<String, Value>>>()
            .map(Value::Object),
        Value::Array(items) => items
            .iter()
            .map(|item| substitute(item, parameters))
            .collect::<MessageResult<Vec<Value>>>()
            .map(Value::Array),
        Value::String(text) => substitute_text(text, parameters).map(Value::String),
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(content.clone()),
    }
}

/// Substitute the references of a single string.
pub fn substitute_text(text: &str, parameters: &ParameterSet) -> MessageResult<String> {
    if !text.contains("{{") {
        return Ok(text.to_string());
    }
    let mut resolved = String::with_capacity(text.len());
    let mut copied_up_to = 0;
    for captures in reference_pattern().captures_iter(text) {
        let (Some(whole), Some(reference)) =
            (captures.get(0), ParameterReference::from_captures(&captures))
        else {
            continue;
        };
        let value = parameters
            .select(&reference)
            .ok_or_else(|| MessageError::unresolved(&reference.name, &reference.token))?;
        resolved.push_str(text.get(copied_up_to..whole.start()).unwrap_or_default());
        resolved.push_str(value);
        copied_up_to = whole.end();
    }
    resolved.push_str(text.get(copied_up_to..).unwrap_or_default());
    ensure_resolvable(&resolved, parameters)?;
    Ok(resolved)
}

/// Fail on any reference left in assembled text that cannot be resolved.
///
/// Inserted values are not expanded, but they must not smuggle in a
/// reference to a missing parameter.
fn ensure_resolvable(text: &str, parameters: &ParameterSet) -> MessageResult<()> {
    let leftover = reference_pattern()
        .captures_iter(text)
        .filter_map(|captures| ParameterReference::from_captures(&captures))
        .find(|reference| parameters.select(reference).is_none());
    match leftover {
        Some(reference) => Err(MessageError::unresolved(&reference.name, &reference.token)),
        None => Ok(()),
    }
}

/// Every reference in `content`, in document order.
#[must_use]
pub fn find_references(content: &Value) -> Vec<ParameterReference> {
    let mut found = Vec::new();
    collect_references(content, &mut found);
    found
}

fn collect_references(content: &Value, found: &mut Vec<ParameterReference>) {
    match content {
        Value::Object(fields) => {
            for value in fields.values() {
                collect_references(value, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, found);
            }
        }
        Value::String(text) => found.extend(
            reference_pattern()
                .captures_iter(text)
                .filter_map(|captures| ParameterReference::from_captures(&captures)),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
