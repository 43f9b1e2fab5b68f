//! Agent-Message: wire-format translation for a remote command agent.
//!
//! This crate turns an inbound command message into a concrete
//! [`CommandPayload`] with every parameter reference resolved, and turns the
//! per-plugin results of an execution cycle back into the outbound
//! [`ReplyPayload`] sent to the control plane.
//!
//! Every operation is a pure, synchronous transformation. Diagnostics go
//! through an explicitly passed [`MessageLog`].

#![forbid(unsafe_code)]

pub mod agent;
pub mod error;
pub mod log;
pub mod model;
pub mod params;
pub mod parser;
pub mod reply;
pub mod times;

pub use crate::error::{ErrorCode, MessageError, MessageResult};
pub use crate::log::MessageLog;
pub use crate::model::*;
pub use crate::parser::parse_message_with_params;
pub use crate::reply::{prepare_reply_payload, prepare_runtime_status};
pub use crate::times::{format_timestamp, parse_timestamp, Timestamp};
