//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bot.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the wallet-linking bot.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BotConfig {
    /// Inbound event gateway settings (bind address, timeouts).
    pub gateway: GatewayConfig,

    /// Ledger network settings (RPC endpoints, tracked asset).
    pub ledger: LedgerConfig,

    /// Wallet claim policy settings.
    pub claims: ClaimsConfig,

    /// Tier role mapping.
    pub tiers: TiersConfig,

    /// Administrator account ids.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Inbound gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Ledger network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Currency code of the tracked asset.
    pub currency: String,

    /// Issuer account of the tracked asset. Wallets must hold a trust line
    /// against this issuer to have a balance.
    pub issuer: String,

    /// RPC request timeout in seconds. On expiry the query degrades to an
    /// unknown-holdings result rather than blocking the claim.
    pub request_timeout_secs: u64,

    /// Base URL of the public ledger explorer, used in remediation links
    /// sent to users (address is appended).
    pub explorer_url_base: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://s1.ripple.com:51234".to_string(),
            failover_urls: Vec::new(),
            currency: "XYZ".to_string(),
            issuer: String::new(),
            request_timeout_secs: 10,
            explorer_url_base: "https://xrpscan.com/account".to_string(),
        }
    }
}

/// Wallet claim policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClaimsConfig {
    /// Maximum number of wallets one account may claim without an admin
    /// override.
    pub max_wallets_per_account: usize,

    /// Path of the JSON document file backing the record store. Empty
    /// disables persistence (in-memory only).
    pub store_path: String,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            max_wallets_per_account: 3,
            store_path: "wallet_records.json".to_string(),
        }
    }
}

/// Strategy for translating points into platform tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TierStrategy {
    /// The account holds only the highest tier its points reach.
    #[default]
    HighestOnly,
    /// The account holds every tier its points reach.
    Cumulative,
}

/// A single tier threshold. Tiers are listed in ascending `min_points`
/// order; the last matching threshold wins under `HighestOnly`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TierRule {
    /// Platform role identifier for this tier.
    pub role_id: String,

    /// Minimum points required to hold this tier.
    pub min_points: f64,
}

/// Tier role mapping configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TiersConfig {
    /// Tier assignment strategy.
    pub strategy: TierStrategy,

    /// Ordered tier thresholds (ascending `min_points`).
    pub rules: Vec<TierRule>,
}

impl Default for TiersConfig {
    fn default() -> Self {
        Self {
            strategy: TierStrategy::HighestOnly,
            rules: vec![
                TierRule {
                    role_id: "holder".to_string(),
                    min_points: 1.0,
                },
                TierRule {
                    role_id: "whale".to_string(),
                    min_points: 10_000.0,
                },
            ],
        }
    }
}

/// Administrator configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Platform account ids allowed to run admin commands. Checked by the
    /// command router before any admin handler is invoked.
    pub admin_ids: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
