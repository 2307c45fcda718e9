//! Market data source consumed by the reference analysts

use async_trait::async_trait;
use magi_application::AgentError;
use magi_domain::Subject;

/// Deterministic demo history, oldest first
pub const DEMO_HISTORY: [f64; 5] = [1000.0, 1005.0, 1010.0, 1008.0, 1015.0];

/// Point-in-time price data for one subject
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSnapshot {
    /// Latest price
    pub price: f64,
    /// Closing prices, oldest first
    pub history: Vec<f64>,
}

impl PriceSnapshot {
    /// Snapshot whose price is the last history point (0.0 if empty)
    pub fn from_history(history: Vec<f64>) -> Self {
        Self {
            price: history.last().copied().unwrap_or(0.0),
            history,
        }
    }

    /// Simple average of the history
    pub fn average(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.history.iter().sum::<f64>() / self.history.len() as f64)
    }

    /// Change between the last two history points
    pub fn last_change(&self) -> Option<f64> {
        match self.history.as_slice() {
            [.., previous, last] => Some(last - previous),
            _ => None,
        }
    }
}

/// Source of price data
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn snapshot(&self, subject: &Subject) -> Result<PriceSnapshot, AgentError>;
}

/// Feed that returns the same snapshot for every subject
#[derive(Debug, Clone)]
pub struct StaticPriceFeed {
    snapshot: PriceSnapshot,
}

impl StaticPriceFeed {
    pub fn new(snapshot: PriceSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Default for StaticPriceFeed {
    fn default() -> Self {
        Self::new(PriceSnapshot::from_history(DEMO_HISTORY.to_vec()))
    }
}

#[async_trait]
impl PriceFeed for StaticPriceFeed {
    async fn snapshot(&self, _subject: &Subject) -> Result<PriceSnapshot, AgentError> {
        Ok(self.snapshot.clone())
    }
}
