//! Progress reporting for consensus rounds

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use magi_application::ports::progress::RoundProgress;
use magi_domain::{AgentVote, FinalDecision, Subject};
use std::sync::Mutex;

/// Reports progress during a round with a progress bar (drawn on stderr)
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundProgress for ProgressReporter {
    fn on_round_start(&self, subject: &Subject, agent_count: usize) {
        let pb = ProgressBar::new(agent_count as u64);
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Consulting agents on {}", subject));
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_agent_complete(&self, agent_name: &str, vote: &AgentVote, succeeded: bool) {
        let Ok(bar) = self.bar.lock() else { return };
        if let Some(pb) = bar.as_ref() {
            let status = if succeeded {
                format!("{} {} {}", "v".green(), agent_name, vote.action())
            } else {
                format!("{} {} (neutral vote)", "x".red(), agent_name)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, decision: &FinalDecision) {
        let Ok(mut bar) = self.bar.lock() else { return };
        if let Some(pb) = bar.take() {
            pb.finish_with_message(format!(
                "{} {}",
                "Consensus reached:".green(),
                decision.final_action()
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl RoundProgress for SimpleProgress {
    fn on_round_start(&self, subject: &Subject, agent_count: usize) {
        eprintln!(
            "{} {} ({} agents)",
            "->".cyan(),
            format!("Consulting agents on {}", subject).bold(),
            agent_count
        );
    }

    fn on_agent_complete(&self, agent_name: &str, vote: &AgentVote, succeeded: bool) {
        if succeeded {
            eprintln!("  {} {} {}", "v".green(), agent_name, vote.action());
        } else {
            eprintln!("  {} {} (failed, neutral vote)", "x".red(), agent_name);
        }
    }

    fn on_round_complete(&self, _decision: &FinalDecision) {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_domain::Action;

    #[test]
    fn test_reporter_lifecycle() {
        let reporter = ProgressReporter::new();
        let subject = Subject::new("7203.T").unwrap();
        let vote = AgentVote::new("Fundamental", Action::Buy, 0.7, "Fundamental rule on price 1015")
            .unwrap();

        reporter.on_round_start(&subject, 2);
        reporter.on_agent_complete("Fundamental", &vote, true);
        reporter.on_agent_complete("Sentiment", &AgentVote::failed("Sentiment").unwrap(), false);
        {
            let bar = reporter.bar.lock().unwrap();
            assert_eq!(bar.as_ref().unwrap().position(), 2);
        }

        let decision = FinalDecision::new(
            Action::Buy,
            vec![vote],
            "1 agent vote collected; final action: BUY",
        )
        .unwrap();
        reporter.on_round_complete(&decision);
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
