//! Plugin results as reported by the execution engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::times::Timestamp;

/// Execution status of a plugin or of a whole document.
///
/// Serialized with the exact strings of the shared wire schema; the unset
/// status is the empty string.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ResultStatus {
    /// No status reported yet.
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Finished without error.
    Success,
    /// Finished with an error.
    Failed,
    /// Currently running.
    InProgress,
    /// Accepted, waiting to run.
    Pending,
    /// Stopped on request before finishing.
    Cancelled,
    /// Stopped after exceeding its time limit.
    TimedOut,
    /// Finished without error and asked for a reboot.
    SuccessAndReboot,
    /// Never started, typically because an earlier step failed.
    NotStarted,
}

impl ResultStatus {
    /// Wire string of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::InProgress => "InProgress",
            Self::Pending => "Pending",
            Self::Cancelled => "Cancelled",
            Self::TimedOut => "TimedOut",
            Self::SuccessAndReboot => "SuccessAndReboot",
            Self::NotStarted => "NotStarted",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a plugin run produced: its output, or a description of why it failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginOutcome {
    /// The plugin ran.
    Completed {
        /// What it produced, possibly empty.
        output: String,
    },
    /// The plugin failed.
    Failed {
        /// Why it failed.
        error: String,
    },
}

impl PluginOutcome {
    /// Successful outcome with `output`.
    pub fn completed(output: impl Into<String>) -> Self {
        Self::Completed {
            output: output.into(),
        }
    }

    /// Failed outcome described by `error`.
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Output of a completed run.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Completed { output } => Some(output),
            Self::Failed { .. } => None,
        }
    }

    /// Failure description of a failed run.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

impl Default for PluginOutcome {
    fn default() -> Self {
        Self::completed(String::new())
    }
}

/// Raw result of one plugin run, as reported by the execution engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PluginResult {
    /// Status reported by the plugin.
    pub status: ResultStatus,
    /// Exit code reported by the plugin.
    pub code: i32,
    /// Output or failure description.
    pub outcome: PluginOutcome,
    /// When the plugin started; zero when unknown.
    pub start_date_time: Timestamp,
    /// When the plugin finished; zero when unknown.
    pub end_date_time: Timestamp,
    /// Bucket the plugin uploaded its output to, empty when none.
    pub output_s3_bucket_name: String,
    /// Key prefix of the uploaded output.
    pub output_s3_key_prefix: String,
}

impl PluginResult {
    /// Result with `status` and `outcome`, code 0 and zero times.
    #[must_use]
    pub fn new(status: ResultStatus, outcome: PluginOutcome) -> Self {
        Self {
            status,
            outcome,
            ..Self::default()
        }
    }

    /// Set the exit code.
    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    /// Set start and end times.
    #[must_use]
    pub fn with_times(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.start_date_time = start;
        self.end_date_time = end;
        self
    }

    /// Set where the plugin uploaded its output.
    #[must_use]
    pub fn with_output_location(
        mut self,
        bucket_name: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Self {
        self.output_s3_bucket_name = bucket_name.into();
        self.output_s3_key_prefix = key_prefix.into();
        self
    }
}

// =============================================================================
// Serde Representation
// =============================================================================

/// Flat JSON form of a plugin result, used by tooling that feeds results in.
///
/// `error` takes precedence: when both fields are present the output is
/// dropped.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct PluginResultRecord {
    #[serde(default)]
    status: ResultStatus,
    #[serde(default)]
    code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default)]
    start_date_time: Timestamp,
    #[serde(default)]
    end_date_time: Timestamp,
    #[serde(default)]
    output_s3_bucket_name: String,
    #[serde(default)]
    output_s3_key_prefix: String,
}

impl From<PluginResultRecord> for PluginResult {
    fn from(record: PluginResultRecord) -> Self {
        let outcome = match (record.error, record.output) {
            (Some(error), _) => PluginOutcome::Failed { error },
            (None, output) => PluginOutcome::Completed {
                output: output.unwrap_or_default(),
            },
        };
        Self {
            status: record.status,
            code: record.code,
            outcome,
            start_date_time: record.start_date_time,
            end_date_time: record.end_date_time,
            output_s3_bucket_name: record.output_s3_bucket_name,
            output_s3_key_prefix: record.output_s3_key_prefix,
        }
    }
}

impl From<PluginResult> for PluginResultRecord {
    fn from(result: PluginResult) -> Self {
        let (output, error) = match result.outcome {
            PluginOutcome::Completed { output } => (Some(output), None),
            PluginOutcome::Failed { error } => (None, Some(error)),
        };
        Self {
            status: result.status,
            code: result.code,
            output,
            error,
            start_date_time: result.start_date_time,
            end_date_time: result.end_date_time,
            output_s3_bucket_name: result.output_s3_bucket_name,
            output_s3_key_prefix: result.output_s3_key_prefix,
        }
    }
}

impl Serialize for PluginResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        PluginResultRecord::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PluginResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        PluginResultRecord::deserialize(deserializer).map(PluginResult::from)
    }
}
