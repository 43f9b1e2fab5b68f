//! Error types and stable error codes.

use crate::model::ErrorInfo;
use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

/// Result of every fallible translation step.
pub type MessageResult<T> = Result<T, MessageError>;

/// Stable error codes shared by the library, the CLI and JSON error output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Wire bytes did not decode into the expected envelope.
    MalformedMessage,
    /// A parameter reference had no matching value.
    UnresolvedParameter,
    /// A textual timestamp was not in canonical form.
    InvalidTimestamp,
    /// A configuration or input file could not be read.
    Io,
}

impl ErrorCode {
    /// Every code, in exit-code order.
    pub const ALL: [Self; 4] = [
        Self::MalformedMessage,
        Self::UnresolvedParameter,
        Self::InvalidTimestamp,
        Self::Io,
    ];

    /// Stable string form, e.g. `E_MALFORMED_MESSAGE`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedMessage => "E_MALFORMED_MESSAGE",
            Self::UnresolvedParameter => "E_UNRESOLVED_PARAMETER",
            Self::InvalidTimestamp => "E_INVALID_TIMESTAMP",
            Self::Io => "E_IO",
        }
    }

    /// Inverse of [`ErrorCode::as_str`].
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == code)
    }

    /// Process exit code used by the CLI for this error.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::MalformedMessage => 2,
            Self::UnresolvedParameter => 3,
            Self::InvalidTimestamp => 4,
            Self::Io => 5,
        }
    }
}

/// Failure raised while decoding or encoding a message.
///
/// Plugin execution failures are never represented here: they travel as
/// data inside [`crate::model::PluginOutcome`].
#[derive(Debug, Error, Diagnostic)]
pub enum MessageError {
    #[error("malformed message: {reason}")]
    #[diagnostic(
        code(agent_message::malformed_message),
        help("the message must be a JSON object with CommandId, DocumentName and DocumentContent")
    )]
    MalformedMessage {
        /// What was wrong with the bytes.
        reason: String,
    },

    #[error("unresolved parameter reference {reference} (parameter `{name}`)")]
    #[diagnostic(
        code(agent_message::unresolved_parameter),
        help("add `{name}` to the message Parameters section")
    )]
    UnresolvedParameter {
        /// Parameter the reference names.
        name: String,
        /// Reference token as written.
        reference: String,
    },

    #[error("invalid timestamp `{text}`: {reason}")]
    #[diagnostic(
        code(agent_message::invalid_timestamp),
        help("timestamps use the form 2006-01-02T15:04:05.000Z")
    )]
    InvalidTimestamp {
        /// Rejected input.
        text: String,
        /// Why it was rejected.
        reason: String,
    },

    #[error("{message}")]
    #[diagnostic(code(agent_message::io))]
    Io {
        /// What was being read.
        message: String,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

impl MessageError {
    /// [`MessageError::MalformedMessage`] with `reason`.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }

    /// [`MessageError::UnresolvedParameter`] for `reference`.
    pub fn unresolved(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnresolvedParameter {
            name: name.into(),
            reference: reference.into(),
        }
    }

    /// [`MessageError::InvalidTimestamp`] for `text`.
    pub fn invalid_timestamp(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// [`MessageError::Io`] wrapping `source`.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Stable code of this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedMessage { .. } => ErrorCode::MalformedMessage,
            Self::UnresolvedParameter { .. } => ErrorCode::UnresolvedParameter,
            Self::InvalidTimestamp { .. } => ErrorCode::InvalidTimestamp,
            Self::Io { .. } => ErrorCode::Io,
        }
    }

    /// CLI exit code of this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    fn context(&self) -> Option<Value> {
        match self {
            Self::MalformedMessage { reason } => Some(serde_json::json!({ "reason": reason })),
            Self::UnresolvedParameter { name, reference } => Some(serde_json::json!({
                "parameter": name,
                "reference": reference,
            })),
            Self::InvalidTimestamp { text, reason } => Some(serde_json::json!({
                "text": text,
                "reason": reason,
            })),
            Self::Io { source, .. } => Some(serde_json::json!({ "source": source.to_string() })),
        }
    }

    /// JSON error record with code, message and structured context.
    #[must_use]
    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code().as_str().to_string(),
            message: self.to_string(),
            context: self.context(),
        }
    }
}
