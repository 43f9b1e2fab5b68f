//! Outbound reply envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ResultStatus;

/// Identity of the agent sending a reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentInfo {
    /// Locale of the agent, e.g. `en-US`.
    pub lang: String,
    /// Agent product name.
    pub name: String,
    /// Agent version.
    pub version: String,
    /// Operating system family.
    pub os: String,
    /// Operating system version.
    #[serde(rename = "osver")]
    pub os_version: String,
}

/// Normalized, externally reported outcome of one plugin.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginRuntimeStatus {
    /// Status copied from the plugin result.
    pub status: ResultStatus,
    /// Exit code copied from the plugin result.
    pub code: i32,
    /// Plugin name; empty until the status is keyed by plugin.
    pub name: String,
    /// Plugin output, or the failure description when the plugin errored.
    pub output: String,
    /// Canonical UTC timestamp text.
    pub start_date_time: String,
    /// Canonical UTC timestamp text.
    pub end_date_time: String,
    /// Bucket holding the uploaded plugin output.
    pub output_s3_bucket_name: String,
    /// Key prefix of the uploaded plugin output.
    pub output_s3_key_prefix: String,
}

/// Metadata block of a reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdditionalInfo {
    /// Agent that produced the reply.
    pub agent: AgentInfo,
    /// Canonical UTC timestamp text of the reply.
    pub date_time: String,
    /// Number of plugins per status string.
    pub runtime_status_counts: BTreeMap<String, u32>,
}

/// Outbound reply envelope for one execution cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplyPayload {
    /// Agent identity, reply time and status counts.
    pub additional_info: AdditionalInfo,
    /// Status aggregated over every plugin in `runtime_status`.
    pub document_status: ResultStatus,
    /// Runtime status per plugin name.
    pub runtime_status: BTreeMap<String, PluginRuntimeStatus>,
}
