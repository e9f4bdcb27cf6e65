//! The wallet-linking state machine.

use std::sync::Arc;

use crate::ledger::types::{HoldingsResult, ResolveHoldings};
use crate::observability::events::EventRecorder;
use crate::roles::synchronizer::RoleSynchronizer;
use crate::store::records::WalletRecordStore;
use crate::store::types::{AccountMeta, ClaimOutcome, WalletClaim};
use crate::workflow::address::{extract_address, format_points};

/// Terminal outcome of a link attempt. Each variant maps to a distinct
/// user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// The claim was persisted. `degraded` means the ledger was
    /// unreachable and the wallet was recorded with a zero placeholder.
    Linked { points: f64, degraded: bool },
    /// The supplied text did not contain a syntactically valid address.
    InvalidAddressFormat,
    /// The ledger confirmed the wallet lacks the project trust line.
    NoTrustlineFound { address: String },
    /// The address belongs to a different account; moderator resolution
    /// required.
    AddressAlreadyClaimedByOther,
    /// The account is at its claim limit; moderator resolution required.
    TooManyClaimsForAccount,
}

impl LinkOutcome {
    /// The message shown to the requesting user.
    pub fn user_message(&self, explorer_url_base: &str) -> String {
        match self {
            LinkOutcome::Linked { degraded: true, .. } => {
                "Wallet linked! There was an error trying to get your holdings from the ledger \
                 network. Your role will be updated automatically once the network is working. \
                 You do not need to do anything else."
                    .to_string()
            }
            LinkOutcome::Linked { points, .. } => {
                format!(
                    "Found your {} points! Updated server roles 🚀",
                    format_points(*points)
                )
            }
            LinkOutcome::InvalidAddressFormat => {
                "Could not get your wallet address, please check the format and try again, for \
                 example 'linkwallet WALLETADDRESSHERE'"
                    .to_string()
            }
            LinkOutcome::NoTrustlineFound { address } => {
                format!(
                    "Seems like you don't have the project trustline yet, please retry once it \
                     has been added 👉 {}/{}",
                    explorer_url_base, address
                )
            }
            LinkOutcome::AddressAlreadyClaimedByOther => {
                "This address has been claimed before, if it wasn't done by you please message a \
                 mod with ownership proof to claim it"
                    .to_string()
            }
            LinkOutcome::TooManyClaimsForAccount => {
                "You seem to have claimed too many addresses, please message a mod with \
                 ownership proof to claim more"
                    .to_string()
            }
        }
    }
}

/// Terminal outcome of an admin wallet removal.
#[derive(Debug, Clone, PartialEq)]
pub enum UnlinkOutcome {
    /// The wallet was removed and the previous owner's roles resynced.
    Removed { owner: String },
    InvalidAddressFormat,
    /// No account has claimed this address.
    NotFound,
}

impl UnlinkOutcome {
    pub fn user_message(&self) -> String {
        match self {
            UnlinkOutcome::Removed { .. } => {
                "Wallet deleted! Updated the previous owner's points and roles 🚀".to_string()
            }
            UnlinkOutcome::InvalidAddressFormat => {
                "Could not get the wallet address, please check the format and try again, for \
                 example 'admindeletewallet WALLETADDRESSHERE'"
                    .to_string()
            }
            UnlinkOutcome::NotFound => {
                "Could not find that wallet in the system, please check the address and try again"
                    .to_string()
            }
        }
    }
}

/// Orchestrates parse → resolve → persist → sync-role → respond.
#[derive(Clone)]
pub struct WalletLinkWorkflow {
    resolver: Arc<dyn ResolveHoldings>,
    store: Arc<WalletRecordStore>,
    roles: RoleSynchronizer,
    recorder: Arc<dyn EventRecorder>,
}

impl WalletLinkWorkflow {
    pub fn new(
        resolver: Arc<dyn ResolveHoldings>,
        store: Arc<WalletRecordStore>,
        roles: RoleSynchronizer,
        recorder: Arc<dyn EventRecorder>,
    ) -> Self {
        Self {
            resolver,
            store,
            roles,
            recorder,
        }
    }

    /// Link a wallet to the caller's own account.
    pub async fn link(
        &self,
        account_id: &str,
        meta: &AccountMeta,
        raw_text: &str,
    ) -> LinkOutcome {
        self.run(account_id, meta, raw_text, false).await
    }

    /// Admin variant: link a wallet to a looked-up target account. The
    /// caller's authorization is the router's responsibility; the store's
    /// conflict and limit rejections are bypassed, reassigning a claimed
    /// address.
    pub async fn link_as_admin(
        &self,
        target_account_id: &str,
        meta: &AccountMeta,
        raw_text: &str,
    ) -> LinkOutcome {
        self.run(target_account_id, meta, raw_text, true).await
    }

    /// Admin variant: remove a wallet from the system entirely and bring
    /// the previous owner's roles back in line with their remaining claims.
    pub async fn remove(&self, raw_text: &str) -> UnlinkOutcome {
        let Some(address) = extract_address(raw_text) else {
            return UnlinkOutcome::InvalidAddressFormat;
        };

        let Some(owner) = self.store.account_for_address(address) else {
            return UnlinkOutcome::NotFound;
        };

        let previous_points = self.store.total_points(&owner);
        self.store.remove_claim(address);
        let new_points = self.store.total_points(&owner);

        if self
            .roles
            .sync(previous_points, new_points, &owner)
            .await
            .is_err()
        {
            tracing::debug!(account_id = %owner, "Role sync failed after wallet removal");
        }

        self.recorder.record_event(
            "deleteWallet-success",
            &[("walletAddress", address), ("accountId", &owner)],
        );

        UnlinkOutcome::Removed { owner }
    }

    async fn run(
        &self,
        account_id: &str,
        meta: &AccountMeta,
        raw_text: &str,
        admin_override: bool,
    ) -> LinkOutcome {
        // ParseAddress
        let Some(address) = extract_address(raw_text) else {
            return LinkOutcome::InvalidAddressFormat;
        };

        // ResolveHoldings
        let claim = match self.resolver.resolve(address).await {
            HoldingsResult::Amount(points) => WalletClaim::new(address, points),
            HoldingsResult::NoTrustline => {
                self.recorder.record_event(
                    "linkWallet-no-trustline",
                    &[("walletAddress", address), ("accountId", account_id)],
                );
                return LinkOutcome::NoTrustlineFound {
                    address: address.to_string(),
                };
            }
            HoldingsResult::Unknown => WalletClaim::pending(address),
        };
        let points = claim.points;
        let degraded = claim.pending_refresh;

        // Persist
        let previous_points = self.store.total_points(account_id);
        match self.store.upsert_claim(account_id, meta, claim, admin_override) {
            ClaimOutcome::Success => {}
            ClaimOutcome::AddressAlreadyClaimedByOther => {
                self.recorder.record_event(
                    "linkWallet-claimed-by-another-user",
                    &[("walletAddress", address), ("accountId", account_id)],
                );
                return LinkOutcome::AddressAlreadyClaimedByOther;
            }
            ClaimOutcome::TooManyClaimsForAccount => {
                self.recorder.record_event(
                    "linkWallet-too-many-claimed",
                    &[("walletAddress", address), ("accountId", account_id)],
                );
                return LinkOutcome::TooManyClaimsForAccount;
            }
        }

        // SyncRole: awaited for telemetry but never fatal. Errors are
        // logged inside the synchronizer.
        let new_points = self.store.total_points(account_id);
        if self
            .roles
            .sync(previous_points, new_points, account_id)
            .await
            .is_err()
        {
            tracing::debug!(account_id = %account_id, "Role sync failed, points recorded");
        }

        self.recorder.record_event(
            "linkWallet-success",
            &[("walletAddress", address), ("accountId", account_id)],
        );

        LinkOutcome::Linked { points, degraded }
    }
}
