//! Direction of the most recent price move

use super::price_feed::PriceFeed;
use async_trait::async_trait;
use magi_application::{AgentError, Analyst};
use magi_domain::{Action, AnalysisReport, Subject};
use std::sync::Arc;
use tracing::debug;

pub struct SentimentAnalyst {
    feed: Arc<dyn PriceFeed>,
}

impl SentimentAnalyst {
    pub fn new(feed: Arc<dyn PriceFeed>) -> Self {
        Self { feed }
    }
}

#[async_trait]
impl Analyst for SentimentAnalyst {
    async fn analyze(&self, subject: &Subject) -> Result<AnalysisReport, AgentError> {
        let snapshot = self.feed.snapshot(subject).await?;

        let Some(change) = snapshot.last_change() else {
            return Ok(AnalysisReport::new(
                Action::Hold.as_str(),
                0.5,
                "insufficient price history",
            ));
        };
        debug!(subject = %subject, change, "Reading latest price move");

        let report = if change > 0.0 {
            AnalysisReport::new(Action::Buy.as_str(), 0.55, "recent uptick")
        } else if change < 0.0 {
            AnalysisReport::new(Action::Sell.as_str(), 0.55, "recent downtick")
        } else {
            AnalysisReport::new(Action::Hold.as_str(), 0.5, "no change since previous close")
        };
        Ok(report)
    }
}
