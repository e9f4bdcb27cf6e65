//! Role synchronizer: applies the tier set implied by a points change.

use std::sync::Arc;

use crate::observability::metrics;
use crate::roles::platform::{RolePlatform, RoleSyncError};
use crate::roles::tiers::TierTable;

/// Maps a points change onto platform add/remove tier operations.
#[derive(Clone)]
pub struct RoleSynchronizer {
    platform: Arc<dyn RolePlatform>,
    table: TierTable,
}

impl RoleSynchronizer {
    pub fn new(platform: Arc<dyn RolePlatform>, table: TierTable) -> Self {
        Self { platform, table }
    }

    /// Bring the account's tier membership in line with `new_points`.
    ///
    /// Tiers implied by `previous_points` but not by `new_points` are
    /// removed; newly implied tiers are added. Because the platform
    /// operations are idempotent, repeating a sync with identical inputs
    /// leaves the platform state unchanged.
    ///
    /// The first platform failure aborts the pass and is returned, but
    /// points truth lives in the record store; callers treat this as
    /// non-fatal and rely on external reconciliation.
    pub async fn sync(
        &self,
        previous_points: f64,
        new_points: f64,
        account_id: &str,
    ) -> Result<(), RoleSyncError> {
        let previous = self.table.tiers_for(previous_points);
        let target = self.table.tiers_for(new_points);

        let result = self.apply(account_id, &previous, &target).await;

        match &result {
            Ok(()) => {
                tracing::info!(
                    account_id = %account_id,
                    previous_points,
                    new_points,
                    target = ?target,
                    "Role sync applied"
                );
                metrics::record_role_sync(true);
            }
            Err(e) => {
                tracing::warn!(account_id = %account_id, error = %e, "Role sync failed");
                metrics::record_role_sync(false);
            }
        }
        result
    }

    async fn apply(
        &self,
        account_id: &str,
        previous: &[&str],
        target: &[&str],
    ) -> Result<(), RoleSyncError> {
        for role_id in previous {
            if !target.contains(role_id) {
                self.platform.remove_tier(account_id, role_id).await?;
            }
        }
        for role_id in target {
            if !previous.contains(role_id) {
                self.platform.add_tier(account_id, role_id).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{TierRule, TierStrategy, TiersConfig};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records platform mutations and simulates idempotent role state.
    #[derive(Default)]
    struct RecordingPlatform {
        held: Mutex<Vec<String>>,
        ops: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RolePlatform for RecordingPlatform {
        async fn add_tier(&self, _account_id: &str, role_id: &str) -> Result<(), RoleSyncError> {
            self.ops.lock().unwrap().push(format!("add:{}", role_id));
            let mut held = self.held.lock().unwrap();
            if !held.iter().any(|r| r == role_id) {
                held.push(role_id.to_string());
            }
            Ok(())
        }

        async fn remove_tier(&self, _account_id: &str, role_id: &str) -> Result<(), RoleSyncError> {
            self.ops.lock().unwrap().push(format!("remove:{}", role_id));
            self.held.lock().unwrap().retain(|r| r != role_id);
            Ok(())
        }
    }

    fn table() -> TierTable {
        TierTable::from_config(&TiersConfig {
            strategy: TierStrategy::HighestOnly,
            rules: vec![
                TierRule {
                    role_id: "bronze".into(),
                    min_points: 10.0,
                },
                TierRule {
                    role_id: "gold".into(),
                    min_points: 1000.0,
                },
            ],
        })
    }

    #[tokio::test]
    async fn test_promotion_swaps_tiers() {
        let platform = Arc::new(RecordingPlatform::default());
        let sync = RoleSynchronizer::new(platform.clone(), table());

        sync.sync(0.0, 50.0, "u1").await.unwrap();
        assert_eq!(*platform.held.lock().unwrap(), vec!["bronze"]);

        sync.sync(50.0, 5000.0, "u1").await.unwrap();
        assert_eq!(*platform.held.lock().unwrap(), vec!["gold"]);
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let platform = Arc::new(RecordingPlatform::default());
        let sync = RoleSynchronizer::new(platform.clone(), table());

        sync.sync(0.0, 50.0, "u1").await.unwrap();
        let state_after_first = platform.held.lock().unwrap().clone();

        sync.sync(0.0, 50.0, "u1").await.unwrap();
        assert_eq!(*platform.held.lock().unwrap(), state_after_first);
    }

    #[tokio::test]
    async fn test_no_change_issues_no_ops() {
        let platform = Arc::new(RecordingPlatform::default());
        let sync = RoleSynchronizer::new(platform.clone(), table());

        sync.sync(20.0, 30.0, "u1").await.unwrap();
        assert!(platform.ops.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_demotion_below_first_tier() {
        let platform = Arc::new(RecordingPlatform::default());
        let sync = RoleSynchronizer::new(platform.clone(), table());

        sync.sync(0.0, 50.0, "u1").await.unwrap();
        sync.sync(50.0, 0.0, "u1").await.unwrap();
        assert!(platform.held.lock().unwrap().is_empty());
    }
}
