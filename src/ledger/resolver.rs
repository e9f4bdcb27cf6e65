//! Holdings resolver backed by ledger JSON-RPC with timeout and failover.
//!
//! # Responsibilities
//! - Query `account_lines` for the tracked asset's trust line
//! - Handle timeouts and network errors gracefully
//! - Map the wire response into the tri-state [`HoldingsResult`]

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::schema::LedgerConfig;
use crate::ledger::types::{HoldingsResult, LedgerError, ResolveHoldings};
use crate::observability::metrics;

/// Ledger RPC client wrapper with failover support.
#[derive(Clone)]
pub struct HoldingsResolver {
    client: reqwest::Client,
    /// RPC endpoints (primary + failovers).
    endpoints: Vec<String>,
    config: LedgerConfig,
    timeout_duration: Duration,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: RpcResult,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    lines: Vec<TrustLine>,
}

#[derive(Debug, Deserialize)]
struct TrustLine {
    /// Counterparty of the line (the issuer, from the holder's view).
    account: String,
    currency: String,
    balance: String,
}

impl HoldingsResolver {
    /// Create a new resolver from ledger configuration.
    pub fn new(config: LedgerConfig) -> Self {
        let timeout_duration = Duration::from_secs(config.request_timeout_secs);

        let mut endpoints = vec![config.rpc_url.clone()];
        for url_str in &config.failover_urls {
            if url_str.parse::<url::Url>().is_ok() {
                endpoints.push(url_str.clone());
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            currency = %config.currency,
            issuer = %config.issuer,
            "Holdings resolver initialized"
        );

        Self {
            client: reqwest::Client::new(),
            endpoints,
            config,
            timeout_duration,
        }
    }

    /// Query `account_lines` against one endpoint.
    async fn query_endpoint(&self, endpoint: &str, address: &str) -> Result<RpcResult, LedgerError> {
        let body = json!({
            "method": "account_lines",
            "params": [{
                "account": address,
                "peer": self.config.issuer,
                "ledger_index": "validated",
            }],
        });

        let fut = self.client.post(endpoint).json(&body).send();
        let response = match timeout(self.timeout_duration, fut).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => return Err(LedgerError::Rpc(e.to_string())),
            Err(_) => return Err(LedgerError::Timeout(self.config.request_timeout_secs)),
        };

        let parsed: RpcResponse = match timeout(self.timeout_duration, response.json()).await {
            Ok(Ok(p)) => p,
            Ok(Err(e)) => return Err(LedgerError::Malformed(e.to_string())),
            Err(_) => return Err(LedgerError::Timeout(self.config.request_timeout_secs)),
        };

        Ok(parsed.result)
    }

    /// Interpret a successful `account_lines` result.
    ///
    /// An `actNotFound` error means no trust line can exist for the account,
    /// so it maps to `NoTrustline` rather than a transport failure.
    fn interpret(&self, result: RpcResult) -> HoldingsResult {
        if let Some(error) = result.error {
            if error == "actNotFound" {
                return HoldingsResult::NoTrustline;
            }
            tracing::warn!(error = %error, "Ledger RPC returned an error result");
            return HoldingsResult::Unknown;
        }

        if result.status != "success" {
            tracing::warn!(status = %result.status, "Unexpected ledger RPC status");
            return HoldingsResult::Unknown;
        }

        let line = result.lines.iter().find(|l| {
            l.currency == self.config.currency
                && (self.config.issuer.is_empty() || l.account == self.config.issuer)
        });

        match line {
            Some(line) => match line.balance.parse::<f64>() {
                // Any non-negative value is a balance; the ledger reports the
                // holder's side of the line so negatives are clamped.
                Ok(balance) => HoldingsResult::Amount(balance.max(0.0)),
                Err(e) => {
                    tracing::warn!(balance = %line.balance, error = %e, "Unparseable trust line balance");
                    HoldingsResult::Unknown
                }
            },
            None => HoldingsResult::NoTrustline,
        }
    }
}

#[async_trait]
impl ResolveHoldings for HoldingsResolver {
    async fn resolve(&self, address: &str) -> HoldingsResult {
        for (i, endpoint) in self.endpoints.iter().enumerate() {
            match self.query_endpoint(endpoint, address).await {
                Ok(result) => {
                    let holdings = self.interpret(result);
                    metrics::record_holdings_result(match holdings {
                        HoldingsResult::Amount(_) => "amount",
                        HoldingsResult::NoTrustline => "no_trustline",
                        HoldingsResult::Unknown => "unknown",
                    });
                    return holdings;
                }
                Err(e) => {
                    tracing::warn!(endpoint_idx = i, error = %e, "Ledger RPC failed, trying next endpoint");
                }
            }
        }

        tracing::warn!(address = %address, "All ledger RPC endpoints failed");
        metrics::record_holdings_result("unknown");
        HoldingsResult::Unknown
    }
}

impl std::fmt::Debug for HoldingsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldingsResolver")
            .field("rpc_url", &self.config.rpc_url)
            .field("currency", &self.config.currency)
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}
