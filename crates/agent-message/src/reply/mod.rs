//! Plugin results to runtime statuses, runtime statuses to reply envelopes.

use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{MessageError, MessageResult};
use crate::log::MessageLog;
use crate::model::{
    AdditionalInfo, AgentInfo, PluginOutcome, PluginResult, PluginRuntimeStatus, ReplyPayload,
    ResultStatus,
};
use crate::times::{format_timestamp, Timestamp};

/// Document status precedence, most significant first.
const STATUS_PRECEDENCE: [ResultStatus; 7] = [
    ResultStatus::InProgress,
    ResultStatus::Pending,
    ResultStatus::Failed,
    ResultStatus::TimedOut,
    ResultStatus::Cancelled,
    ResultStatus::SuccessAndReboot,
    ResultStatus::Success,
];

/// Convert one plugin result into its reported runtime status.
///
/// Infallible: a failed plugin is reported through a non-empty `output`
/// describing the failure, everything else is copied or formatted.
pub fn prepare_runtime_status(log: &MessageLog, result: &PluginResult) -> PluginRuntimeStatus {
    log.scope(|| {
        let output = match &result.outcome {
            PluginOutcome::Completed { output } => output.clone(),
            PluginOutcome::Failed { error } => {
                warn!(status = %result.status, code = result.code, error = %error, "plugin reported an error");
                failure_output(result.status, error)
            }
        };
        PluginRuntimeStatus {
            status: result.status,
            code: result.code,
            name: String::new(),
            output,
            start_date_time: format_timestamp(result.start_date_time),
            end_date_time: format_timestamp(result.end_date_time),
            output_s3_bucket_name: result.output_s3_bucket_name.clone(),
            output_s3_key_prefix: result.output_s3_key_prefix.clone(),
        }
    })
}

fn failure_output(status: ResultStatus, error: &str) -> String {
    if !error.trim().is_empty() {
        return error.to_string();
    }
    match status {
        ResultStatus::Unset => "plugin failed".to_string(),
        status => format!("plugin failed with status {status}"),
    }
}

/// Runtime statuses for a collection of results, each named after its key.
pub fn prepare_runtime_statuses(
    log: &MessageLog,
    results: &BTreeMap<String, PluginResult>,
) -> BTreeMap<String, PluginRuntimeStatus> {
    results
        .iter()
        .map(|(plugin, result)| {
            let status = PluginRuntimeStatus {
                name: plugin.clone(),
                ..prepare_runtime_status(log, result)
            };
            (plugin.clone(), status)
        })
        .collect()
}

/// Assemble the reply envelope for one execution cycle.
///
/// `runtime_statuses` is embedded unchanged. `agent_version` is accepted for
/// wire-schema compatibility and not written anywhere. Emits no events, so
/// it needs no [`MessageLog`].
pub fn prepare_reply_payload(
    _agent_version: &str,
    runtime_statuses: BTreeMap<String, PluginRuntimeStatus>,
    date_time: Timestamp,
    agent: AgentInfo,
) -> ReplyPayload {
    let document_status = aggregate_document_status(&runtime_statuses);
    let runtime_status_counts = count_statuses(&runtime_statuses);
    ReplyPayload {
        additional_info: AdditionalInfo {
            agent,
            date_time: format_timestamp(date_time),
            runtime_status_counts,
        },
        document_status,
        runtime_status: runtime_statuses,
    }
}

/// Number of plugins per status string.
#[must_use]
pub fn count_statuses(
    runtime_statuses: &BTreeMap<String, PluginRuntimeStatus>,
) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for status in runtime_statuses.values() {
        let count: &mut u32 = counts.entry(status.status.as_str().to_string()).or_default();
        *count = count.saturating_add(1);
    }
    counts
}

/// Overall status of a document from the statuses of its plugins.
///
/// In progress or pending work dominates, then failures, then reboot
/// requests. An empty map is a success; a map with nothing but unset or
/// not-started plugins has not started.
#[must_use]
pub fn aggregate_document_status(
    runtime_statuses: &BTreeMap<String, PluginRuntimeStatus>,
) -> ResultStatus {
    if runtime_statuses.is_empty() {
        return ResultStatus::Success;
    }
    STATUS_PRECEDENCE
        .into_iter()
        .find(|candidate| {
            runtime_statuses
                .values()
                .any(|status| status.status == *candidate)
        })
        .unwrap_or(ResultStatus::NotStarted)
}

/// Wire bytes of a reply.
pub fn encode_reply_payload(reply: &ReplyPayload) -> MessageResult<Vec<u8>> {
    serde_json::to_vec(reply)
        .map_err(|err| MessageError::malformed(format!("failed to encode reply payload: {err}")))
}

/// Decode reply wire bytes; unknown status strings are malformed.
pub fn parse_reply_payload(raw: &[u8]) -> MessageResult<ReplyPayload> {
    serde_json::from_slice(raw)
        .map_err(|err| MessageError::malformed(format!("invalid reply payload: {err}")))
}
