//! Fluent builder APIs for constructing test fixtures.

use agent_message::{
    format_timestamp, parse_timestamp, PluginOutcome, PluginResult, PluginRuntimeStatus,
    ResultStatus, Timestamp,
};
use serde_json::{json, Map, Value};
use uuid::Uuid;

// ============================================================================
// CommandMessageBuilder
// ============================================================================

/// Builder for raw inbound command messages in wire form.
///
/// Produces the JSON envelope as a [`Value`] so tests can also build
/// messages the parser must reject.
///
/// # Example
///
/// ```ignore
/// let raw = CommandMessageBuilder::new("Doc")
///     .with_parameter("commands", &["ls", "pwd"])
///     .with_content(json!({"runCommand": "{{ commands[1] }}"}))
///     .to_bytes();
/// ```
#[derive(Debug, Clone)]
pub struct CommandMessageBuilder {
    command_id: String,
    document_name: String,
    document_content: Value,
    parameters: Map<String, Value>,
    output_s3_bucket_name: Option<String>,
    output_s3_key_prefix: Option<String>,
}

impl CommandMessageBuilder {
    /// New message with a random command id and empty content.
    #[must_use]
    pub fn new(document_name: &str) -> Self {
        Self {
            command_id: Uuid::new_v4().to_string(),
            document_name: document_name.to_string(),
            document_content: json!({}),
            parameters: Map::new(),
            output_s3_bucket_name: None,
            output_s3_key_prefix: None,
        }
    }

    #[must_use]
    pub fn with_command_id(mut self, command_id: &str) -> Self {
        self.command_id = command_id.to_string();
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: Value) -> Self {
        self.document_content = content;
        self
    }

    /// Add a list-valued parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: &str, values: &[&str]) -> Self {
        self.parameters.insert(name.to_string(), json!(values));
        self
    }

    /// Add a parameter written as a bare string.
    #[must_use]
    pub fn with_scalar_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters.insert(name.to_string(), json!(value));
        self
    }

    #[must_use]
    pub fn with_output_location(mut self, bucket_name: &str, key_prefix: &str) -> Self {
        self.output_s3_bucket_name = Some(bucket_name.to_string());
        self.output_s3_key_prefix = Some(key_prefix.to_string());
        self
    }

    #[must_use]
    pub fn command_id(&self) -> &str {
        &self.command_id
    }

    #[must_use]
    pub fn build(&self) -> Value {
        let mut envelope = Map::new();
        envelope.insert("Parameters".into(), Value::Object(self.parameters.clone()));
        envelope.insert("DocumentContent".into(), self.document_content.clone());
        envelope.insert("CommandId".into(), json!(self.command_id));
        envelope.insert("DocumentName".into(), json!(self.document_name));
        if let Some(prefix) = &self.output_s3_key_prefix {
            envelope.insert("OutputS3KeyPrefix".into(), json!(prefix));
        }
        if let Some(bucket) = &self.output_s3_bucket_name {
            envelope.insert("OutputS3BucketName".into(), json!(bucket));
        }
        Value::Object(envelope)
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.build()).expect("message serializes")
    }
}

// ============================================================================
// PluginResultBuilder
// ============================================================================

/// Builder for [`PluginResult`] values.
///
/// Starts as a successful plugin with empty output, code 0 and zero times.
#[derive(Debug, Clone, Default)]
pub struct PluginResultBuilder {
    result: PluginResult,
}

impl PluginResultBuilder {
    #[must_use]
    pub fn success(output: &str) -> Self {
        Self {
            result: PluginResult::new(ResultStatus::Success, PluginOutcome::completed(output)),
        }
    }

    #[must_use]
    pub fn failed(error: &str) -> Self {
        Self {
            result: PluginResult::new(ResultStatus::Failed, PluginOutcome::failed(error))
                .with_code(1),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: ResultStatus) -> Self {
        self.result.status = status;
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.result.code = code;
        self
    }

    /// Start and end times in canonical text form.
    #[must_use]
    pub fn with_times(mut self, start: &str, end: &str) -> Self {
        self.result.start_date_time = parse_timestamp(start).expect("valid start time");
        self.result.end_date_time = parse_timestamp(end).expect("valid end time");
        self
    }

    #[must_use]
    pub fn with_output_location(mut self, bucket_name: &str, key_prefix: &str) -> Self {
        self.result = self.result.with_output_location(bucket_name, key_prefix);
        self
    }

    #[must_use]
    pub fn build(self) -> PluginResult {
        self.result
    }
}

// ============================================================================
// RuntimeStatusBuilder
// ============================================================================

/// Builder for [`PluginRuntimeStatus`] records as found in reply payloads.
#[derive(Debug, Clone)]
pub struct RuntimeStatusBuilder {
    status: PluginRuntimeStatus,
}

impl RuntimeStatusBuilder {
    #[must_use]
    pub fn new(name: &str, status: ResultStatus) -> Self {
        let zero = format_timestamp(Timestamp::zero());
        Self {
            status: PluginRuntimeStatus {
                status,
                name: name.to_string(),
                start_date_time: zero.clone(),
                end_date_time: zero,
                ..PluginRuntimeStatus::default()
            },
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: &str) -> Self {
        self.status.output = output.to_string();
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.status.code = code;
        self
    }

    #[must_use]
    pub fn build(self) -> PluginRuntimeStatus {
        self.status
    }
}
