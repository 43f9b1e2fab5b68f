//! Test utilities and fixtures for agent-message integration tests.
//!
//! - [`CommandMessageBuilder`] - Fluent API for inbound command messages
//! - [`PluginResultBuilder`] - Fluent API for plugin results
//! - [`RuntimeStatusBuilder`] - Fluent API for runtime status records
//! - [`temp_dir`] - Create unique temporary directories
//! - [`write_json`] - Serialize any value to a JSON file
//!
//! # Example
//!
//! ```ignore
//! use agent_message_fixtures::{CommandMessageBuilder, temp_dir, write_json};
//!
//! let dir = temp_dir("parse");
//! let message = CommandMessageBuilder::new("AWS-RunShellScript")
//!     .with_parameter("commands", &["echo hi"])
//!     .with_content(serde_json::json!({"run": "{{ commands }}"}))
//!     .build();
//! write_json(&dir.join("message.json"), &message);
//! ```

// Test fixtures crate - relaxed lints for test utilities
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]

pub mod builders;
pub mod helpers;

pub use builders::{CommandMessageBuilder, PluginResultBuilder, RuntimeStatusBuilder};
pub use helpers::{temp_dir, write_json};
