//! Common test helper functions.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Create a unique temporary directory for a test.
///
/// The name combines `prefix`, the current time and the process id, so
/// parallel runs do not collide. The caller removes it.
#[must_use]
pub fn temp_dir(prefix: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "agent-message-{prefix}-{}-{stamp}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("failed to create temp directory");
    dir
}

/// Serialize `value` as pretty JSON into `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) {
    let data = serde_json::to_vec_pretty(value).expect("failed to serialize fixture");
    fs::write(path, data).expect("failed to write fixture file");
}
