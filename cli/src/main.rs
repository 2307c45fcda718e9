//! CLI entrypoint for magi
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use magi_application::{Agent, ConsensusOrchestrator, RoundContext, RoundParams};
use magi_domain::{AnalysisReport, Subject, ValidationError};
use magi_infrastructure::{
    ConfigLoader, FileConfig, FundamentalAnalyst, JsonlAuditSink, PriceFeed, SentimentAnalyst,
    StaticPriceFeed, TechnicalAnalyst, default_agents,
};
use magi_presentation::{
    AgentKind, Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    let subject = match cli.subject.as_deref() {
        Some(s) => Subject::new(s)?,
        None => bail!("Subject is required, e.g. `magi 7203.T`. Use --help for usage."),
    };

    let mut ctx = RoundContext::new(subject.clone());
    if let Some(raw) = &cli.analysis_result {
        let report: AnalysisReport = serde_json::from_str(raw)
            .context("--analysis-result must be a JSON object with at least an `action` field")?;
        ctx = ctx.with_analysis_result(report);
    }

    // === Dependency Injection ===
    let feed: Arc<dyn PriceFeed> = Arc::new(StaticPriceFeed::default());
    let agents = build_agents(&cli.agents, feed)?;
    let policy = cli
        .policy
        .clone()
        .unwrap_or_else(|| config.consensus.parse_policy());

    // Ctrl-C cancels the round
    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let mut orchestrator = ConsensusOrchestrator::new(agents, policy)
        .with_params(round_params(&cli, &config))
        .with_cancellation(token);

    if let Some(path) = cli.audit_log.as_ref().or(config.audit.path.as_ref()) {
        match JsonlAuditSink::open(path) {
            Ok(sink) => {
                info!("Audit log: {}", sink.path().display());
                orchestrator = orchestrator.with_audit_sink(Arc::new(sink));
            }
            Err(e) => warn!("Audit log disabled, could not open {}: {}", path.display(), e),
        }
    }

    info!(
        "Starting magi: {} agent(s) ({} analyzable), policy {}",
        orchestrator.agents().len(),
        orchestrator
            .agents()
            .iter()
            .filter(|a| a.is_analyzable())
            .count(),
        orchestrator.policy().description()
    );

    // Execute with or without progress reporting
    let decision = if cli.quiet {
        orchestrator.reach_consensus(ctx).await?
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        orchestrator
            .reach_consensus_with_progress(ctx, &progress)
            .await?
    } else {
        orchestrator
            .reach_consensus_with_progress(ctx, &SimpleProgress)
            .await?
    };

    // Output results
    let show_reasoning = !cli.no_reasoning;
    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&subject, &decision, show_reasoning),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&subject, &decision),
        OutputFormat::Json => ConsoleFormatter::format_json(&subject, &decision, show_reasoning),
    };

    println!("{}", output);

    Ok(())
}

/// Install the tracing subscriber: stderr always, plus daily files in `log_dir`
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "magi.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

/// File configuration with CLI flags layered on top
fn round_params(cli: &Cli, config: &FileConfig) -> RoundParams {
    let mut params = config.to_round_params();

    if let Some(secs) = cli.timeout {
        params = params.with_agent_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }
    if cli.sequential {
        params = params.with_concurrent(false);
    }
    if cli.detect_conflicts {
        params = params.with_detect_conflicts(true);
    }
    if let Some(tie_break) = cli.tie_break {
        params = params.with_tie_break(tie_break);
    }

    params
}

/// Agents in the requested order, or the default set when none are requested
fn build_agents(
    kinds: &[AgentKind],
    feed: Arc<dyn PriceFeed>,
) -> Result<Vec<Agent>, ValidationError> {
    if kinds.is_empty() {
        return default_agents(feed);
    }

    kinds
        .iter()
        .map(|kind| {
            let name = kind.agent_name();
            match kind {
                AgentKind::Fundamental => {
                    Agent::analyzable(name, FundamentalAnalyst::new(Arc::clone(&feed)))
                }
                AgentKind::Technical => {
                    Agent::analyzable(name, TechnicalAnalyst::new(Arc::clone(&feed)))
                }
                AgentKind::Sentiment => {
                    Agent::analyzable(name, SentimentAnalyst::new(Arc::clone(&feed)))
                }
                AgentKind::Inert => Agent::inert(name),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_domain::TieBreak;

    fn feed() -> Arc<dyn PriceFeed> {
        Arc::new(StaticPriceFeed::default())
    }

    #[test]
    fn test_build_agents_defaults() {
        let agents = build_agents(&[], feed()).unwrap();
        let names: Vec<&str> = agents.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Fundamental", "Technical", "Sentiment"]);
    }

    #[test]
    fn test_build_agents_in_requested_order() {
        let agents = build_agents(&[AgentKind::Inert, AgentKind::Technical], feed()).unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].name(), "Inert");
        assert!(!agents[0].is_analyzable());
        assert_eq!(agents[1].name(), "Technical");
        assert!(agents[1].is_analyzable());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "magi",
            "AAPL",
            "--timeout",
            "0",
            "--sequential",
            "--detect-conflicts",
            "--tie-break",
            "hold",
        ]);
        let params = round_params(&cli, &FileConfig::default());
        assert_eq!(params.agent_timeout, None);
        assert!(!params.concurrent);
        assert!(params.detect_conflicts);
        assert_eq!(params.tie_break, TieBreak::Hold);
    }

    #[test]
    fn test_config_used_without_flags() {
        let cli = Cli::parse_from(["magi", "AAPL"]);
        let mut config = FileConfig::default();
        config.round.agent_timeout_secs = 7;
        let params = round_params(&cli, &config);
        assert_eq!(params.agent_timeout, Some(Duration::from_secs(7)));
        assert!(params.concurrent);
    }
}
