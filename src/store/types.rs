//! Record store data model.

use serde::{Deserialize, Serialize};

/// A wallet address claimed by an account, with a holdings snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletClaim {
    /// Ledger account identifier, validated before reaching the store.
    pub address: String,

    /// Snapshot of the wallet's holdings of the tracked asset.
    pub points: f64,

    /// Reserved for future cryptographic proof-of-ownership. Always false
    /// at creation.
    pub verified: bool,

    /// True when the snapshot was taken while the ledger was unreachable
    /// and holds a zero placeholder awaiting reconciliation.
    #[serde(default)]
    pub pending_refresh: bool,
}

impl WalletClaim {
    /// Create a claim with a resolved holdings snapshot.
    pub fn new(address: impl Into<String>, points: f64) -> Self {
        Self {
            address: address.into(),
            points,
            verified: false,
            pending_refresh: false,
        }
    }

    /// Create a claim recorded during a ledger outage: zero points, flagged
    /// for a later refresh.
    pub fn pending(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            points: 0.0,
            verified: false,
            pending_refresh: true,
        }
    }
}

/// Platform identity metadata attached to an account record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountMeta {
    pub username: String,
    pub discriminator: String,
}

/// An account and the wallets it owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountRecord {
    /// Unique external identity key (platform user id).
    pub account_id: String,

    pub username: String,
    pub discriminator: String,

    /// Previous name/discriminator, kept for audit only.
    pub previous_username: String,
    pub previous_discriminator: String,

    /// Aggregate across all wallets. Invariant: equals the sum of `points`
    /// over `wallets` after every successful mutation.
    pub total_points: f64,

    /// Claimed wallets. Each address is unique system-wide.
    pub wallets: Vec<WalletClaim>,
}

impl AccountRecord {
    pub fn new(account_id: impl Into<String>, meta: &AccountMeta) -> Self {
        Self {
            account_id: account_id.into(),
            username: meta.username.clone(),
            discriminator: meta.discriminator.clone(),
            previous_username: String::new(),
            previous_discriminator: String::new(),
            total_points: 0.0,
            wallets: Vec::new(),
        }
    }

    /// Refresh identity metadata, archiving the old name when it changed.
    pub fn apply_meta(&mut self, meta: &AccountMeta) {
        if self.username != meta.username || self.discriminator != meta.discriminator {
            self.previous_username = std::mem::take(&mut self.username);
            self.previous_discriminator = std::mem::take(&mut self.discriminator);
            self.username = meta.username.clone();
            self.discriminator = meta.discriminator.clone();
        }
    }

    /// Add or replace the claim for `claim.address` and recompute the total.
    pub fn put_claim(&mut self, claim: WalletClaim) {
        match self.wallets.iter_mut().find(|w| w.address == claim.address) {
            Some(existing) => *existing = claim,
            None => self.wallets.push(claim),
        }
        self.recompute_total();
    }

    /// Drop the claim for `address`, if present, and recompute the total.
    pub fn remove_claim(&mut self, address: &str) -> Option<WalletClaim> {
        let idx = self.wallets.iter().position(|w| w.address == address)?;
        let removed = self.wallets.remove(idx);
        self.recompute_total();
        Some(removed)
    }

    pub fn recompute_total(&mut self) {
        self.total_points = self.wallets.iter().map(|w| w.points).sum();
    }
}

/// Result of a claim update attempt. This taxonomy is the conflict
/// resolution contract and is preserved exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Success,
    /// The address already belongs to a different account and the caller is
    /// not an admin. No mutation occurred.
    AddressAlreadyClaimedByOther,
    /// The account is at its claim limit and the address is new. No
    /// mutation occurred.
    TooManyClaimsForAccount,
}
