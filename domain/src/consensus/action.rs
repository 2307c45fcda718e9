//! Recommendation values an agent can vote for

use serde::{Deserialize, Serialize};

/// A recommendation (Value Object)
///
/// Closed set for this core. Serialized as the uppercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    /// The safe default
    #[default]
    Hold,
}

impl Action {
    /// Get the canonical string form ("BUY", "SELL", "HOLD")
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }

    /// Parse an action leniently: anything unrecognized becomes `Hold`.
    ///
    /// This is how free-form analyst output is mapped onto a vote.
    pub fn parse_or_hold(s: &str) -> Action {
        s.parse().unwrap_or(Action::Hold)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Action::Buy),
            "SELL" => Ok(Action::Sell),
            "HOLD" => Ok(Action::Hold),
            other => Err(format!("Unknown action: {}. Valid: BUY, SELL, HOLD", other)),
        }
    }
}
