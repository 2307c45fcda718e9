//! Round control configuration from TOML (`[round]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoundConfig {
    /// Per-agent analysis timeout in seconds (0 disables the timeout)
    pub agent_timeout_secs: u64,
    /// Consult agents concurrently
    pub concurrent: bool,
    /// Flag decisions whose votes oppose each other
    pub detect_conflicts: bool,
}

impl Default for FileRoundConfig {
    fn default() -> Self {
        Self {
            agent_timeout_secs: 30,
            concurrent: true,
            detect_conflicts: false,
        }
    }
}

impl FileRoundConfig {
    pub fn agent_timeout(&self) -> Option<Duration> {
        (self.agent_timeout_secs > 0).then(|| Duration::from_secs(self.agent_timeout_secs))
    }
}
