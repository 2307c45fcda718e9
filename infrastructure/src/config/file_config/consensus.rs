//! Voting policy configuration from TOML (`[consensus]` section)
//!
//! ```toml
//! [consensus]
//! policy = "majority"        # or "weighted"
//! tie_break = "first_seen"   # or "hold"
//! ```

use super::ConfigIssue;
use magi_domain::{TieBreak, VotingPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// Voting policy identifier
    pub policy: String,
    /// How ties at the top of the count are resolved
    pub tie_break: String,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            policy: VotingPolicy::Majority.to_string(),
            tie_break: TieBreak::FirstSeen.to_string(),
        }
    }
}

impl FileConsensusConfig {
    /// Parse the policy string; unknown identifiers are kept as unsupported
    pub fn parse_policy(&self) -> VotingPolicy {
        VotingPolicy::from(self.policy.clone())
    }

    /// Parse the tie-break string, falling back to first-seen on unknown values
    pub fn parse_tie_break(&self) -> (TieBreak, Vec<ConfigIssue>) {
        match self.tie_break.parse() {
            Ok(tie_break) => (tie_break, Vec::new()),
            Err(_) => (
                TieBreak::default(),
                vec![ConfigIssue {
                    field: "consensus.tie_break".to_string(),
                    value: self.tie_break.clone(),
                    message: format!(
                        "unknown value '{}', falling back to '{}'",
                        self.tie_break,
                        TieBreak::default()
                    ),
                }],
            ),
        }
    }

    pub(super) fn policy_issue(&self) -> Option<ConfigIssue> {
        let policy = self.parse_policy();
        if policy.is_supported() {
            return None;
        }
        Some(ConfigIssue {
            field: "consensus.policy".to_string(),
            value: self.policy.clone(),
            message: format!(
                "unsupported policy '{}'; rounds will fail (supported: majority, weighted)",
                self.policy
            ),
        })
    }
}
