//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-like fields stay as strings so that [`FileConfig::validate`] can
//! report unknown values instead of failing the whole load.

mod audit;
mod consensus;
mod round;

pub use audit::FileAuditConfig;
pub use consensus::FileConsensusConfig;
pub use round::FileRoundConfig;

use magi_application::RoundParams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal problem found in the loaded configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending key, e.g. `consensus.tie_break`
    pub field: String,
    pub value: String,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Voting policy settings
    pub consensus: FileConsensusConfig,
    /// Round control settings
    pub round: FileRoundConfig,
    /// Audit log settings
    pub audit: FileAuditConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Issues are warnings: every field has a usable fallback, except an
    /// unsupported policy, which is kept and fails when a round evaluates it.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.consensus.parse_tie_break().1);
        issues.extend(self.consensus.policy_issue());
        issues
    }

    /// Round parameters for the orchestrator
    pub fn to_round_params(&self) -> RoundParams {
        RoundParams::default()
            .with_agent_timeout(self.round.agent_timeout())
            .with_concurrent(self.round.concurrent)
            .with_detect_conflicts(self.round.detect_conflicts)
            .with_tie_break(self.consensus.parse_tie_break().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_domain::TieBreak;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[consensus]
policy = "weighted"
tie_break = "hold"

[round]
agent_timeout_secs = 5
concurrent = false
detect_conflicts = true

[audit]
path = "logs/decisions.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.consensus.policy, "weighted");
        assert_eq!(config.round.agent_timeout_secs, 5);
        assert!(!config.round.concurrent);
        assert!(config.round.detect_conflicts);
        assert_eq!(
            config.audit.path,
            Some(PathBuf::from("logs/decisions.jsonl"))
        );

        let params = config.to_round_params();
        assert_eq!(params.agent_timeout, Some(Duration::from_secs(5)));
        assert!(!params.concurrent);
        assert!(params.detect_conflicts);
        assert_eq!(params.tie_break, TieBreak::Hold);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[round]
concurrent = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.round.concurrent);
        // Defaults should apply
        assert_eq!(config.consensus.policy, "majority");
        assert_eq!(config.round.agent_timeout_secs, 30);
        assert!(config.audit.path.is_none());
    }

    #[test]
    fn test_default_round_params_match_application_defaults() {
        assert_eq!(FileConfig::default().to_round_params(), RoundParams::default());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[consensus]
policy = "ranked"
tie_break = "random"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.field == "consensus.tie_break"));
        assert!(issues.iter().any(|i| i.field == "consensus.policy"));
    }
}
