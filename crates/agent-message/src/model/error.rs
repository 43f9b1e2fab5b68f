//! Error record for JSON output.

use serde::{Deserialize, Serialize};

/// Machine-readable error record emitted by the CLI in `--json` mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable error code such as `E_MALFORMED_MESSAGE`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Structured details (offending parameter, timestamp text, ...).
    pub context: Option<serde_json::Value>,
}
