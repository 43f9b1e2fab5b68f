//! Inbound command envelope and its parameter values.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{MessageError, MessageResult};
use crate::params::ParameterReference;

/// Runtime parameter values keyed by parameter name.
///
/// Each parameter holds an ordered list of values. On the wire a value may
/// be a bare string, which is read as a single-element list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterSet(BTreeMap<String, Vec<String>>);

impl ParameterSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the values of `name`, replacing any previous ones.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.0.insert(name.into(), values);
    }

    /// Builder form of [`ParameterSet::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.insert(name, values);
        self
    }

    /// All values of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Value selected by a reference: the indexed value, or the first one.
    #[must_use]
    pub fn select(&self, reference: &ParameterReference) -> Option<&str> {
        self.get(&reference.name)?
            .get(reference.index.unwrap_or(0))
            .map(String::as_str)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Read the `Parameters` section of a command envelope.
    pub fn from_wire(section: &Map<String, Value>) -> MessageResult<Self> {
        let mut parameters = Self::new();
        for (name, value) in section {
            let values = match value {
                Value::String(single) => vec![single.clone()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            MessageError::malformed(format!(
                                "parameter `{name}` must only contain strings"
                            ))
                        })
                    })
                    .collect::<MessageResult<Vec<_>>>()?,
                other => {
                    return Err(MessageError::malformed(format!(
                        "parameter `{name}` must be a string or a list of strings, got {}",
                        json_kind(other)
                    )));
                }
            };
            parameters.insert(name.clone(), values);
        }
        Ok(parameters)
    }
}

impl ParameterSet {
    /// Fill in parameters the message omits from the defaults declared in
    /// `document_content.parameters.<name>.default`.
    ///
    /// Values already present always win. Only string and string-list
    /// defaults are taken; declarations of any other shape are skipped.
    #[must_use]
    pub fn with_document_defaults(mut self, document_content: &Value) -> Self {
        let Some(declarations) = document_content
            .get("parameters")
            .and_then(Value::as_object)
        else {
            return self;
        };
        for (name, declaration) in declarations {
            if self.0.contains_key(name) {
                continue;
            }
            if let Some(values) = declaration.get("default").and_then(declared_default) {
                self.0.insert(name.clone(), values);
            }
        }
        self
    }
}

fn declared_default(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(single) => Some(vec![single.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

impl FromIterator<(String, Vec<String>)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for ParameterSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ParameterSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let section = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_wire(&section).map_err(D::Error::custom)
    }
}

/// One inbound command, as handed to the execution engine.
///
/// Produced by [`crate::parser::parse_message_with_params`]; after parsing,
/// `document_content` holds no parameter reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandPayload {
    /// Control-plane identifier of the command.
    pub command_id: String,
    /// Name of the document the command runs.
    pub document_name: String,
    /// Plugin configuration tree.
    pub document_content: Value,
    /// Runtime parameter values.
    pub parameters: ParameterSet,
    /// Bucket receiving plugin output, empty when output upload is off.
    pub output_s3_bucket_name: String,
    /// Key prefix for uploaded plugin output.
    pub output_s3_key_prefix: String,
}

// =============================================================================
// Wire Representation
// =============================================================================

/// Envelope exactly as the control plane sends it.
///
/// Field order matches the shared wire schema so re-encoded payloads keep
/// the same layout.
#[derive(Deserialize, Serialize)]
struct WireCommandPayload {
    #[serde(rename = "Parameters", default)]
    parameters: Option<Map<String, Value>>,
    #[serde(rename = "DocumentContent")]
    document_content: Value,
    #[serde(rename = "CommandId")]
    command_id: String,
    #[serde(rename = "DocumentName")]
    document_name: String,
    #[serde(rename = "OutputS3KeyPrefix", default)]
    output_s3_key_prefix: Option<String>,
    #[serde(rename = "OutputS3BucketName", default)]
    output_s3_bucket_name: Option<String>,
}

impl TryFrom<WireCommandPayload> for CommandPayload {
    type Error = MessageError;

    fn try_from(wire: WireCommandPayload) -> MessageResult<Self> {
        if wire.command_id.trim().is_empty() {
            return Err(MessageError::malformed("CommandId must not be empty"));
        }
        if !wire.document_content.is_object() {
            return Err(MessageError::malformed(format!(
                "DocumentContent must be an object, got {}",
                json_kind(&wire.document_content)
            )));
        }
        let parameters = match wire.parameters {
            Some(section) => ParameterSet::from_wire(&section)?,
            None => ParameterSet::new(),
        };
        Ok(Self {
            command_id: wire.command_id,
            document_name: wire.document_name,
            document_content: wire.document_content,
            parameters,
            output_s3_bucket_name: wire.output_s3_bucket_name.unwrap_or_default(),
            output_s3_key_prefix: wire.output_s3_key_prefix.unwrap_or_default(),
        })
    }
}

impl From<CommandPayload> for WireCommandPayload {
    fn from(payload: CommandPayload) -> Self {
        let parameters = payload
            .parameters
            .iter()
            .map(|(name, values)| {
                let values = values.iter().cloned().map(Value::String).collect();
                (name.to_string(), Value::Array(values))
            })
            .collect();
        Self {
            parameters: Some(parameters),
            document_content: payload.document_content,
            command_id: payload.command_id,
            document_name: payload.document_name,
            output_s3_key_prefix: Some(payload.output_s3_key_prefix),
            output_s3_bucket_name: Some(payload.output_s3_bucket_name),
        }
    }
}

impl CommandPayload {
    /// Decode the envelope without touching parameter references.
    pub(crate) fn decode(raw: &[u8]) -> MessageResult<Self> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|err| MessageError::malformed(format!("invalid json: {err}")))?;
        if !value.is_object() {
            return Err(MessageError::malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        let wire: WireCommandPayload = serde_json::from_value(value)
            .map_err(|err| MessageError::malformed(err.to_string()))?;
        Self::try_from(wire)
    }
}

impl Serialize for CommandPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        WireCommandPayload::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CommandPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = WireCommandPayload::deserialize(deserializer)?;
        Self::try_from(wire).map_err(D::Error::custom)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
