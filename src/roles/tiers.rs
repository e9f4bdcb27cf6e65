//! Points-to-tier mapping.

use crate::config::schema::{TierRule, TierStrategy, TiersConfig};

/// Ordered tier table with a configurable assignment strategy.
#[derive(Debug, Clone)]
pub struct TierTable {
    strategy: TierStrategy,
    /// Rules in ascending `min_points` order (validated at config load).
    rules: Vec<TierRule>,
}

impl TierTable {
    pub fn from_config(config: &TiersConfig) -> Self {
        Self {
            strategy: config.strategy,
            rules: config.rules.clone(),
        }
    }

    /// Whether any rule grants `role_id`.
    pub fn contains_role(&self, role_id: &str) -> bool {
        self.rules.iter().any(|rule| rule.role_id == role_id)
    }

    /// The set of role ids an account with `points` should hold.
    ///
    /// Under `HighestOnly` the last matching threshold wins and the result
    /// has at most one element; under `Cumulative` every reached tier is
    /// included.
    pub fn tiers_for(&self, points: f64) -> Vec<&str> {
        match self.strategy {
            TierStrategy::HighestOnly => self
                .rules
                .iter()
                .rev()
                .find(|rule| points >= rule.min_points)
                .map(|rule| vec![rule.role_id.as_str()])
                .unwrap_or_default(),
            TierStrategy::Cumulative => self
                .rules
                .iter()
                .filter(|rule| points >= rule.min_points)
                .map(|rule| rule.role_id.as_str())
                .collect(),
        }
    }
}
