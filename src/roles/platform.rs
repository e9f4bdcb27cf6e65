//! Platform role mutation boundary.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from platform role mutation. Best-effort: the workflow logs
/// these and continues.
#[derive(Debug, Error)]
pub enum RoleSyncError {
    #[error("Platform rejected role change: {0}")]
    Rejected(String),

    #[error("Platform unreachable: {0}")]
    Unreachable(String),
}

/// Capability for mutating externally visible tier membership.
///
/// Both operations are idempotent: re-adding a held tier or removing an
/// absent one is a no-op, not an error.
#[async_trait]
pub trait RolePlatform: Send + Sync {
    async fn add_tier(&self, account_id: &str, role_id: &str) -> Result<(), RoleSyncError>;
    async fn remove_tier(&self, account_id: &str, role_id: &str) -> Result<(), RoleSyncError>;
}

/// Platform stub used when no connector is wired up. Role changes are
/// logged and dropped; a periodic external job reconciles real role state
/// from the record store.
pub struct NoopPlatform;

#[async_trait]
impl RolePlatform for NoopPlatform {
    async fn add_tier(&self, account_id: &str, role_id: &str) -> Result<(), RoleSyncError> {
        tracing::debug!(account_id = %account_id, role_id = %role_id, "add_tier (noop platform)");
        Ok(())
    }

    async fn remove_tier(&self, account_id: &str, role_id: &str) -> Result<(), RoleSyncError> {
        tracing::debug!(account_id = %account_id, role_id = %role_id, "remove_tier (noop platform)");
        Ok(())
    }
}
