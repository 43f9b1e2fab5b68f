//! Agent identity configuration.

use std::fs;
use std::path::Path;

use crate::error::{MessageError, MessageResult};
use crate::model::AgentInfo;

/// Name reported when no agent file overrides it.
pub const DEFAULT_AGENT_NAME: &str = "agent-message";
/// Locale reported when no agent file overrides it.
pub const DEFAULT_LANG: &str = "en-US";

impl AgentInfo {
    /// Identity of this build on the current platform.
    ///
    /// The OS version is left empty; it is host configuration, not build
    /// information.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            name: DEFAULT_AGENT_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            os_version: String::new(),
        }
    }
}

/// Field-by-field overrides, applied on top of a loaded or detected identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentInfoOverrides {
    /// Replacement for [`AgentInfo::lang`].
    pub lang: Option<String>,
    /// Replacement for [`AgentInfo::name`].
    pub name: Option<String>,
    /// Replacement for [`AgentInfo::version`].
    pub version: Option<String>,
    /// Replacement for [`AgentInfo::os`].
    pub os: Option<String>,
    /// Replacement for [`AgentInfo::os_version`].
    pub os_version: Option<String>,
}

impl AgentInfoOverrides {
    /// Replace the fields of `agent` that have an override.
    #[must_use]
    pub fn apply(self, mut agent: AgentInfo) -> AgentInfo {
        if let Some(lang) = self.lang {
            agent.lang = lang;
        }
        if let Some(name) = self.name {
            agent.name = name;
        }
        if let Some(version) = self.version {
            agent.version = version;
        }
        if let Some(os) = self.os {
            agent.os = os;
        }
        if let Some(os_version) = self.os_version {
            agent.os_version = os_version;
        }
        agent
    }
}

/// Load an agent identity from a JSON or YAML file, chosen by extension.
///
/// Fields missing from the file keep their empty defaults.
pub fn load_agent_info_file(path: &Path) -> MessageResult<AgentInfo> {
    let data = fs::read_to_string(path).map_err(|err| {
        MessageError::io(
            format!("failed to read agent file {}", path.display()),
            err,
        )
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        serde_yml::from_str(&data)
            .map_err(|err| MessageError::malformed(format!("failed to parse agent yaml: {err}")))
    } else {
        serde_json::from_str(&data)
            .map_err(|err| MessageError::malformed(format!("failed to parse agent json: {err}")))
    }
}
