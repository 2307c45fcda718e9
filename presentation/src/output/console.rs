//! Console output formatter for consensus decisions

use crate::output::report::DecisionReport;
use colored::{ColoredString, Colorize};
use magi_domain::{Action, FinalDecision, Subject};

/// Formats decisions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the decision with the per-agent breakdown
    pub fn format(subject: &Subject, decision: &FinalDecision, show_reasoning: bool) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("MAGI Consensus"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Subject:".cyan().bold(), subject));

        if show_reasoning {
            output.push_str(&Self::section_header("Votes"));
            for vote in decision.votes() {
                let title = format!("── {} ──", vote.agent_name());
                let title = if vote.is_failure() {
                    title.red().bold()
                } else {
                    title.yellow().bold()
                };
                output.push_str(&format!(
                    "\n{}\n{} ({:.2})  {}\n",
                    title,
                    Self::action_label(vote.action()),
                    vote.confidence(),
                    vote.reasoning().dimmed()
                ));
            }
        }

        output.push_str(&Self::section_header("Decision"));
        output.push_str(&format!(
            "\n{} {}\n",
            "Final action:".bold(),
            Self::action_label(decision.final_action())
        ));
        if let Some(confidence) = decision.weighted_confidence() {
            output.push_str(&format!("{} {:.2}\n", "Confidence:".bold(), confidence));
        }
        output.push_str(&format!("{} {}\n", "Tally:".bold(), Self::tally(decision)));
        if decision.has_conflict() {
            output.push_str(&format!("{}\n", "Votes are in conflict".yellow().bold()));
        }
        output.push_str(&format!("\n{}\n", decision.summary()));

        output.push_str(&Self::footer());

        output
    }

    /// Format as a JSON response body
    pub fn format_json(subject: &Subject, decision: &FinalDecision, include_reasoning: bool) -> String {
        let report = DecisionReport::new(subject, decision, include_reasoning);
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final action and summary only (concise output)
    pub fn format_summary(subject: &Subject, decision: &FinalDecision) -> String {
        format!(
            "{} {} {}\n{}\n",
            subject.to_string().bold(),
            "->".dimmed(),
            Self::action_label(decision.final_action()),
            decision.summary()
        )
    }

    fn action_label(action: Action) -> ColoredString {
        match action {
            Action::Buy => action.as_str().green().bold(),
            Action::Sell => action.as_str().red().bold(),
            Action::Hold => action.as_str().yellow().bold(),
        }
    }

    fn tally(decision: &FinalDecision) -> String {
        let counts = decision
            .tally()
            .iter()
            .map(|(action, count)| format!("{} {}", action, count))
            .collect::<Vec<_>>()
            .join(", ");
        if decision.vote_count() > 1 && decision.is_unanimous() {
            format!("{} (unanimous)", counts)
        } else {
            counts
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
