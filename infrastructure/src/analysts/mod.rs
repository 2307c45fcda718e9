//! Reference analysts
//!
//! Three rule-based [`Analyst`](magi_application::Analyst) implementations
//! over a [`PriceFeed`]. They are deterministic given the feed and serve as
//! the default agent set of the CLI.

mod fundamental;
mod price_feed;
mod sentiment;
mod technical;

pub use fundamental::FundamentalAnalyst;
pub use price_feed::{DEMO_HISTORY, PriceFeed, PriceSnapshot, StaticPriceFeed};
pub use sentiment::SentimentAnalyst;
pub use technical::TechnicalAnalyst;

use magi_application::Agent;
use magi_domain::ValidationError;
use std::sync::Arc;

/// The default agent set: Fundamental, Technical, Sentiment (in that order)
pub fn default_agents(feed: Arc<dyn PriceFeed>) -> Result<Vec<Agent>, ValidationError> {
    Ok(vec![
        Agent::analyzable("Fundamental", FundamentalAnalyst::new(Arc::clone(&feed)))?,
        Agent::analyzable("Technical", TechnicalAnalyst::new(Arc::clone(&feed)))?,
        Agent::analyzable("Sentiment", SentimentAnalyst::new(feed))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{JsonlAuditSink, read_records};
    use magi_application::{ConsensusOrchestrator, RoundContext};
    use magi_domain::{Action, Subject, VotingPolicy};

    #[test]
    fn test_default_agents_order() {
        let agents = default_agents(Arc::new(StaticPriceFeed::default())).unwrap();
        let names: Vec<&str> = agents.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Fundamental", "Technical", "Sentiment"]);
        assert!(agents.iter().all(|a| a.is_analyzable()));
    }

    #[tokio::test]
    async fn test_demo_round_is_audited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let sink = Arc::new(JsonlAuditSink::open(&path).unwrap());

        let orchestrator = ConsensusOrchestrator::new(
            default_agents(Arc::new(StaticPriceFeed::default())).unwrap(),
            VotingPolicy::Majority,
        )
        .with_audit_sink(sink);

        let ctx = RoundContext::new(Subject::new("7203.T").unwrap());
        let decision = orchestrator.reach_consensus(ctx).await.unwrap();

        assert_eq!(decision.final_action(), Action::Buy);
        assert!(decision.is_unanimous());
        let confidences: Vec<f64> = decision.votes().iter().map(|v| v.confidence()).collect();
        assert_eq!(confidences, vec![0.7, 0.65, 0.55]);

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].votes, decision.votes());
    }
}
