//! CLI command definitions

use clap::{Parser, ValueEnum};
use magi_domain::{TieBreak, VotingPolicy};
use std::path::PathBuf;

/// Output format for consensus results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Decision with the per-agent breakdown
    Full,
    /// Only the final action and summary
    Summary,
    /// JSON response body
    Json,
}

/// Built-in agents selectable with `--agent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    /// Threshold rule on the latest price
    Fundamental,
    /// Latest price against the moving average
    Technical,
    /// Direction of the most recent move
    Sentiment,
    /// Agent without analysis capability (always a neutral vote)
    Inert,
}

impl AgentKind {
    /// Display name used for the agent's votes
    pub fn agent_name(&self) -> &'static str {
        match self {
            AgentKind::Fundamental => "Fundamental",
            AgentKind::Technical => "Technical",
            AgentKind::Sentiment => "Sentiment",
            AgentKind::Inert => "Inert",
        }
    }
}

/// CLI arguments for magi
#[derive(Parser, Debug)]
#[command(name = "magi")]
#[command(author, version, about = "Multi-agent consensus - several analysts vote on one decision")]
#[command(long_about = r#"
magi consults a set of analysis agents about a subject (e.g. a ticker
symbol), collects one BUY / SELL / HOLD vote from each, and reduces the
votes to a single decision with a voting policy.

An agent that fails or times out casts a neutral HOLD vote; it never
aborts the round.

Configuration files are loaded from (in priority order):
1. MAGI_* environment variables (e.g. MAGI_ROUND__CONCURRENT=false)
2. --config <path>     Explicit config file
3. ./magi.toml         Project-level config
4. ~/.config/magi/config.toml   Global config

Example:
  magi 7203.T
  magi AAPL --policy weighted --agent fundamental --agent technical
  magi 7203.T --analysis-result '{"action":"sell","confidence":0.8,"reasoning":"Margins are contracting"}'
  magi 7203.T --output json --audit-log logs/decisions.jsonl
"#)]
pub struct Cli {
    /// Subject to analyze (e.g. a ticker symbol)
    pub subject: Option<String>,

    /// Voting policy: majority or weighted
    #[arg(short, long, value_name = "POLICY")]
    pub policy: Option<VotingPolicy>,

    /// How ties are resolved: first_seen or hold
    #[arg(long, value_name = "RULE")]
    pub tie_break: Option<TieBreak>,

    /// Pre-computed analysis (JSON) that replaces the first agent's own
    #[arg(long, value_name = "JSON")]
    pub analysis_result: Option<String>,

    /// Agents to consult, in order (can be specified multiple times)
    #[arg(short, long = "agent", value_enum, value_name = "KIND")]
    pub agents: Vec<AgentKind>,

    /// Per-agent timeout in seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Consult agents one after another instead of concurrently
    #[arg(long)]
    pub sequential: bool,

    /// Flag the decision when votes oppose each other
    #[arg(long)]
    pub detect_conflicts: bool,

    /// Append each decision to this JSONL audit log
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Omit the per-agent breakdown
    #[arg(long)]
    pub no_reasoning: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["magi", "7203.T"]).unwrap();
        assert_eq!(cli.subject.as_deref(), Some("7203.T"));
        assert!(cli.agents.is_empty());
        assert_eq!(cli.output, OutputFormat::Full);
        assert!(cli.policy.is_none());
        assert!(!cli.sequential);
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "magi",
            "AAPL",
            "--policy",
            "weighted",
            "--tie-break",
            "hold",
            "--agent",
            "fundamental",
            "-a",
            "inert",
            "--timeout",
            "5",
            "--sequential",
            "--output",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.policy, Some(VotingPolicy::Weighted));
        assert_eq!(cli.tie_break, Some(TieBreak::Hold));
        assert_eq!(cli.agents, vec![AgentKind::Fundamental, AgentKind::Inert]);
        assert_eq!(cli.timeout, Some(5));
        assert!(cli.sequential);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_policy_is_accepted_by_parser() {
        let cli = Cli::try_parse_from(["magi", "AAPL", "--policy", "borda"]).unwrap();
        assert_eq!(
            cli.policy,
            Some(VotingPolicy::Unsupported("borda".to_string()))
        );
    }

    #[test]
    fn test_rejects_unknown_agent_and_tie_break() {
        assert!(Cli::try_parse_from(["magi", "AAPL", "--agent", "oracle"]).is_err());
        assert!(Cli::try_parse_from(["magi", "AAPL", "--tie-break", "random"]).is_err());
    }
}
