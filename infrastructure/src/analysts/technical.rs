//! Latest price against the simple average of the history

use super::price_feed::PriceFeed;
use async_trait::async_trait;
use magi_application::{AgentError, Analyst};
use magi_domain::{Action, AnalysisReport, Subject};
use std::sync::Arc;
use tracing::debug;

pub struct TechnicalAnalyst {
    feed: Arc<dyn PriceFeed>,
}

impl TechnicalAnalyst {
    pub fn new(feed: Arc<dyn PriceFeed>) -> Self {
        Self { feed }
    }
}

#[async_trait]
impl Analyst for TechnicalAnalyst {
    async fn analyze(&self, subject: &Subject) -> Result<AnalysisReport, AgentError> {
        let snapshot = self.feed.snapshot(subject).await?;

        let (Some(average), Some(&last)) = (snapshot.average(), snapshot.history.last()) else {
            return Ok(AnalysisReport::new(
                Action::Hold.as_str(),
                0.5,
                "no price history available",
            ));
        };
        debug!(subject = %subject, last, average, "Comparing price to moving average");

        let report = if last > average {
            AnalysisReport::new(Action::Buy.as_str(), 0.65, "price above moving average")
        } else if last < average {
            AnalysisReport::new(Action::Sell.as_str(), 0.6, "price below moving average")
        } else {
            AnalysisReport::new(Action::Hold.as_str(), 0.5, "price at moving average")
        };
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysts::price_feed::{PriceSnapshot, StaticPriceFeed};

    async fn analyze(history: Vec<f64>) -> AnalysisReport {
        let feed = StaticPriceFeed::new(PriceSnapshot::from_history(history));
        TechnicalAnalyst::new(Arc::new(feed))
            .analyze(&Subject::new("7203.T").unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_against_average() {
        let buy = analyze(vec![1000.0, 1005.0, 1010.0, 1008.0, 1015.0]).await;
        assert_eq!(buy.parsed_action(), Action::Buy);
        assert_eq!(buy.confidence, Some(0.65));

        let sell = analyze(vec![1010.0, 1000.0]).await;
        assert_eq!(sell.parsed_action(), Action::Sell);
        assert_eq!(sell.confidence, Some(0.6));

        let flat = analyze(vec![1000.0, 1000.0]).await;
        assert_eq!(flat.parsed_action(), Action::Hold);
    }

    #[tokio::test]
    async fn test_empty_history_holds() {
        let report = analyze(vec![]).await;
        assert_eq!(report.parsed_action(), Action::Hold);
        assert_eq!(report.confidence, Some(0.5));
        assert!(report.into_vote("Technical").is_ok());
    }
}
