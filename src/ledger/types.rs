//! Ledger-specific types and error definitions.

use async_trait::async_trait;
use thiserror::Error;

/// Outcome of querying a wallet's holdings of the tracked asset.
#[derive(Debug, Clone, PartialEq)]
pub enum HoldingsResult {
    /// The wallet holds this (non-negative) balance.
    Amount(f64),
    /// The ledger confirms the account but it has not established the
    /// required trust line. Definitive and non-retryable; the user must
    /// set the trust line before holdings can exist.
    NoTrustline,
    /// Network or node failure. Retryable; callers proceed with a zero
    /// placeholder and flag the claim for later reconciliation.
    Unknown,
}

/// Errors that can occur while talking to a ledger node.
///
/// These never surface to the workflow directly: the resolver collapses
/// every failure into [`HoldingsResult::Unknown`] after logging.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transport or request failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered but the payload was not understood.
    #[error("Malformed RPC response: {0}")]
    Malformed(String),
}

/// Capability for resolving a wallet address to a holdings snapshot.
///
/// The production implementation queries the ledger over JSON-RPC; tests
/// substitute scripted results.
#[async_trait]
pub trait ResolveHoldings: Send + Sync {
    async fn resolve(&self, address: &str) -> HoldingsResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = LedgerError::Rpc("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_result_equality() {
        assert_eq!(HoldingsResult::Amount(1.5), HoldingsResult::Amount(1.5));
        assert_ne!(HoldingsResult::NoTrustline, HoldingsResult::Unknown);
    }
}
