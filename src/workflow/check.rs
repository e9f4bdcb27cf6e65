//! Read-only wallet holdings check. No state is mutated.

use std::sync::Arc;

use crate::ledger::types::{HoldingsResult, ResolveHoldings};
use crate::workflow::address::{extract_address, format_points};

/// Outcome of a check request.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    InvalidAddressFormat,
    Points { address: String, points: f64 },
    NoTrustline { address: String },
    Unavailable { address: String },
}

impl CheckOutcome {
    pub fn user_message(&self, explorer_url_base: &str) -> String {
        match self {
            CheckOutcome::InvalidAddressFormat => {
                "Could not get the wallet address, please check the format and try again, for \
                 example 'checkwallet WALLETADDRESSHERE'"
                    .to_string()
            }
            CheckOutcome::Points { address, points } => format!(
                "The wallet has {} points 👉 {}/{}",
                format_points(*points),
                explorer_url_base,
                address
            ),
            CheckOutcome::NoTrustline { address } => format!(
                "Seems like the wallet doesn't have the project trustline, please verify the \
                 trustline is set and try again 👉 {}/{}",
                explorer_url_base, address
            ),
            CheckOutcome::Unavailable { address } => format!(
                "There was an issue getting the wallet holdings from the ledger network, please \
                 try later or use 👉 {}/{}",
                explorer_url_base, address
            ),
        }
    }
}

/// Resolve-only view of a wallet, for the `checkwallet` command.
#[derive(Clone)]
pub struct WalletCheck {
    resolver: Arc<dyn ResolveHoldings>,
}

impl WalletCheck {
    pub fn new(resolver: Arc<dyn ResolveHoldings>) -> Self {
        Self { resolver }
    }

    pub async fn check(&self, raw_text: &str) -> CheckOutcome {
        let Some(address) = extract_address(raw_text) else {
            return CheckOutcome::InvalidAddressFormat;
        };

        match self.resolver.resolve(address).await {
            HoldingsResult::Amount(points) => CheckOutcome::Points {
                address: address.to_string(),
                points,
            },
            HoldingsResult::NoTrustline => CheckOutcome::NoTrustline {
                address: address.to_string(),
            },
            HoldingsResult::Unknown => CheckOutcome::Unavailable {
                address: address.to_string(),
            },
        }
    }
}
