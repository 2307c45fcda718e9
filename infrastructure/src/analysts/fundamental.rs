//! Threshold rule on the latest price

use super::price_feed::PriceFeed;
use async_trait::async_trait;
use magi_application::{AgentError, Analyst};
use magi_domain::{Action, AnalysisReport, Subject};
use std::sync::Arc;
use tracing::debug;

const BUY_ABOVE: f64 = 1005.0;
const SELL_BELOW: f64 = 1002.0;

pub struct FundamentalAnalyst {
    feed: Arc<dyn PriceFeed>,
}

impl FundamentalAnalyst {
    pub fn new(feed: Arc<dyn PriceFeed>) -> Self {
        Self { feed }
    }
}

#[async_trait]
impl Analyst for FundamentalAnalyst {
    async fn analyze(&self, subject: &Subject) -> Result<AnalysisReport, AgentError> {
        let price = self.feed.snapshot(subject).await?.price;

        let (action, confidence) = if price > BUY_ABOVE {
            (Action::Buy, 0.7)
        } else if price < SELL_BELOW {
            (Action::Sell, 0.6)
        } else {
            (Action::Hold, 0.5)
        };
        debug!(subject = %subject, price, action = %action, "Fundamental rule applied");

        Ok(AnalysisReport::new(
            action.as_str(),
            confidence,
            format!("Fundamental rule on price {}", price),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysts::price_feed::{PriceSnapshot, StaticPriceFeed};

    async fn analyze(price: f64) -> AnalysisReport {
        let feed = StaticPriceFeed::new(PriceSnapshot {
            price,
            history: vec![],
        });
        FundamentalAnalyst::new(Arc::new(feed))
            .analyze(&Subject::new("7203.T").unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_thresholds() {
        let buy = analyze(1015.0).await;
        assert_eq!(buy.parsed_action(), Action::Buy);
        assert_eq!(buy.confidence, Some(0.7));
        assert_eq!(buy.reasoning.as_deref(), Some("Fundamental rule on price 1015"));

        let sell = analyze(1000.0).await;
        assert_eq!(sell.parsed_action(), Action::Sell);
        assert_eq!(sell.confidence, Some(0.6));

        // Boundaries are exclusive
        assert_eq!(analyze(1005.0).await.parsed_action(), Action::Hold);
        assert_eq!(analyze(1002.0).await.parsed_action(), Action::Hold);
    }
}
