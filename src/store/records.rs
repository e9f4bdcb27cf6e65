//! Concurrent wallet record store with file persistence.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use crate::observability::metrics;
use crate::store::types::{AccountMeta, AccountRecord, ClaimOutcome, WalletClaim};

/// A thread-safe store of account records with a system-wide address index.
///
/// Lock ordering: the address index entry is always acquired before any
/// account entry, and at most one account entry is held at a time.
#[derive(Clone, Default)]
pub struct WalletRecordStore {
    /// account id → record.
    accounts: Arc<DashMap<String, AccountRecord>>,
    /// wallet address → owning account id. The entry guard on this map is
    /// the conditional-write point that resolves same-address races.
    owners: Arc<DashMap<String, String>>,
    max_wallets_per_account: usize,
    persistence_path: Option<String>,
}

impl WalletRecordStore {
    /// Create a new empty store.
    pub fn new(max_wallets_per_account: usize, persistence_path: Option<String>) -> Self {
        Self {
            accounts: Arc::new(DashMap::new()),
            owners: Arc::new(DashMap::new()),
            max_wallets_per_account,
            persistence_path,
        }
    }

    /// Load from file if it exists; the address index is rebuilt from the
    /// loaded records.
    pub fn load_from_file(max_wallets_per_account: usize, path: &str) -> std::io::Result<Self> {
        let store = Self::new(max_wallets_per_account, Some(path.to_string()));
        if Path::new(path).exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let records: Vec<AccountRecord> = serde_json::from_reader(reader)?;

            for record in records {
                for wallet in &record.wallets {
                    store
                        .owners
                        .insert(wallet.address.clone(), record.account_id.clone());
                }
                store.accounts.insert(record.account_id.clone(), record);
            }
            tracing::info!("Loaded {} account records from store file", store.accounts.len());
        }
        Ok(store)
    }

    /// Save to file.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);

            let records = self.accounts_snapshot();
            serde_json::to_writer(writer, &records)?;
            tracing::debug!("Saved {} account records to store file", records.len());
        }
        Ok(())
    }

    /// Snapshot of every account record, sorted by account id.
    pub fn accounts_snapshot(&self) -> Vec<AccountRecord> {
        let mut records: Vec<AccountRecord> = self
            .accounts
            .iter()
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| a.account_id.cmp(&b.account_id));
        records
    }

    /// Create or update the claim binding `claim.address` to `account_id`.
    ///
    /// Outcome branches, in order:
    /// 1. Address owned by a different account and no admin override →
    ///    [`ClaimOutcome::AddressAlreadyClaimedByOther`], no mutation.
    /// 2. Account at its claim limit, address new, no admin override →
    ///    [`ClaimOutcome::TooManyClaimsForAccount`], no mutation.
    /// 3. Otherwise add/replace the claim, recompute the total, persist the
    ///    identity metadata, and return [`ClaimOutcome::Success`]. With an
    ///    admin override a claimed address is reassigned and removed from
    ///    its previous owner.
    ///
    /// Authorization for `admin_override` is the caller's responsibility;
    /// the store never checks who is asking.
    pub fn upsert_claim(
        &self,
        account_id: &str,
        meta: &AccountMeta,
        claim: WalletClaim,
        admin_override: bool,
    ) -> ClaimOutcome {
        // Held for the whole mutation: serializes racing claims for one
        // address so at most one of them wins.
        let owner_entry = self.owners.entry(claim.address.clone());

        let previous_owner = match &owner_entry {
            Entry::Occupied(o) => Some(o.get().clone()),
            Entry::Vacant(_) => None,
        };

        if let Some(owner) = &previous_owner {
            if owner != account_id && !admin_override {
                metrics::record_claim_outcome("already_claimed");
                return ClaimOutcome::AddressAlreadyClaimedByOther;
            }
        }

        {
            let account_entry = self.accounts.entry(account_id.to_string());
            match account_entry {
                Entry::Occupied(mut occupied) => {
                    let record = occupied.get_mut();
                    let new_to_account = !record.wallets.iter().any(|w| w.address == claim.address);
                    if new_to_account
                        && !admin_override
                        && record.wallets.len() >= self.max_wallets_per_account
                    {
                        metrics::record_claim_outcome("too_many_claims");
                        return ClaimOutcome::TooManyClaimsForAccount;
                    }
                    record.apply_meta(meta);
                    record.put_claim(claim.clone());
                }
                Entry::Vacant(vacant) => {
                    let mut record = AccountRecord::new(account_id, meta);
                    record.put_claim(claim.clone());
                    vacant.insert(record);
                }
            }
        }

        // Admin reassignment: detach the claim from its previous owner. The
        // account entry above has been released, so only one account entry
        // is ever held.
        if let Some(owner) = &previous_owner {
            if owner != account_id {
                if let Some(mut record) = self.accounts.get_mut(owner) {
                    record.remove_claim(&claim.address);
                }
                tracing::info!(
                    address = %claim.address,
                    from = %owner,
                    to = %account_id,
                    "Wallet claim reassigned by admin override"
                );
            }
        }

        match owner_entry {
            Entry::Occupied(mut o) => {
                *o.get_mut() = account_id.to_string();
            }
            Entry::Vacant(v) => {
                v.insert(account_id.to_string());
            }
        }

        metrics::record_claim_outcome("success");
        self.persist();
        ClaimOutcome::Success
    }

    /// Remove a claim from the system entirely. Admin-only surface; not
    /// reachable from the user workflow. Returns the previous owner.
    pub fn remove_claim(&self, address: &str) -> Option<String> {
        let (_, owner) = self.owners.remove(address)?;
        if let Some(mut record) = self.accounts.get_mut(&owner) {
            record.remove_claim(address);
        }
        tracing::info!(address = %address, owner = %owner, "Wallet claim removed");
        self.persist();
        Some(owner)
    }

    /// Owning account id for an address, if claimed.
    pub fn account_for_address(&self, address: &str) -> Option<String> {
        self.owners.get(address).map(|r| r.value().clone())
    }

    /// Snapshot of an account record.
    pub fn get_account(&self, account_id: &str) -> Option<AccountRecord> {
        self.accounts.get(account_id).map(|r| r.value().clone())
    }

    /// Snapshot of the wallets claimed by an account.
    pub fn wallets_for_account(&self, account_id: &str) -> Vec<WalletClaim> {
        self.accounts
            .get(account_id)
            .map(|r| r.value().wallets.clone())
            .unwrap_or_default()
    }

    /// Current aggregate points for an account (0 if unknown).
    pub fn total_points(&self, account_id: &str) -> f64 {
        self.accounts
            .get(account_id)
            .map(|r| r.value().total_points)
            .unwrap_or(0.0)
    }

    /// Number of accounts in the store.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn persist(&self) {
        if let Err(e) = self.save_to_file() {
            tracing::warn!(error = %e, "Failed to persist wallet records");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> AccountMeta {
        AccountMeta {
            username: name.to_string(),
            discriminator: "0001".to_string(),
        }
    }

    #[test]
    fn test_first_claim_creates_account() {
        let store = WalletRecordStore::new(3, None);
        let outcome = store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rA", 150.0), false);

        assert_eq!(outcome, ClaimOutcome::Success);
        let record = store.get_account("u1").unwrap();
        assert_eq!(record.total_points, 150.0);
        assert_eq!(store.account_for_address("rA").as_deref(), Some("u1"));
        assert_eq!(store.wallets_for_account("u1").len(), 1);
    }

    #[test]
    fn test_address_unique_across_accounts() {
        let store = WalletRecordStore::new(3, None);
        store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rA", 150.0), false);

        let outcome = store.upsert_claim("u2", &meta("bob"), WalletClaim::new("rA", 150.0), false);
        assert_eq!(outcome, ClaimOutcome::AddressAlreadyClaimedByOther);

        // No mutation on rejection.
        assert!(store.get_account("u2").is_none());
        assert_eq!(store.account_for_address("rA").as_deref(), Some("u1"));
    }

    #[test]
    fn test_reclaim_own_address_is_refresh() {
        let store = WalletRecordStore::new(1, None);
        store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rA", 150.0), false);

        // Same address again: not a new claim, the limit does not apply.
        let outcome = store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rA", 200.0), false);
        assert_eq!(outcome, ClaimOutcome::Success);

        let record = store.get_account("u1").unwrap();
        assert_eq!(record.wallets.len(), 1);
        assert_eq!(record.total_points, 200.0);
    }

    #[test]
    fn test_claim_limit() {
        let store = WalletRecordStore::new(2, None);
        store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rA", 1.0), false);
        store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rB", 2.0), false);

        let outcome = store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rC", 3.0), false);
        assert_eq!(outcome, ClaimOutcome::TooManyClaimsForAccount);

        let record = store.get_account("u1").unwrap();
        assert_eq!(record.wallets.len(), 2);
        assert_eq!(record.total_points, 3.0);
        assert!(store.account_for_address("rC").is_none());
    }

    #[test]
    fn test_admin_override_bypasses_limit() {
        let store = WalletRecordStore::new(1, None);
        store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rA", 1.0), false);

        let outcome = store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rB", 2.0), true);
        assert_eq!(outcome, ClaimOutcome::Success);
        assert_eq!(store.get_account("u1").unwrap().wallets.len(), 2);
    }

    #[test]
    fn test_admin_override_reassigns_address() {
        let store = WalletRecordStore::new(3, None);
        store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rA", 150.0), false);
        store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rB", 50.0), false);

        let outcome = store.upsert_claim("u2", &meta("bob"), WalletClaim::new("rA", 150.0), true);
        assert_eq!(outcome, ClaimOutcome::Success);

        assert_eq!(store.account_for_address("rA").as_deref(), Some("u2"));
        let alice = store.get_account("u1").unwrap();
        assert_eq!(alice.wallets.len(), 1);
        assert_eq!(alice.total_points, 50.0);
        let bob = store.get_account("u2").unwrap();
        assert_eq!(bob.total_points, 150.0);
    }

    #[test]
    fn test_remove_claim() {
        let store = WalletRecordStore::new(3, None);
        store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rA", 150.0), false);

        assert_eq!(store.remove_claim("rA").as_deref(), Some("u1"));
        assert!(store.account_for_address("rA").is_none());
        assert_eq!(store.get_account("u1").unwrap().total_points, 0.0);

        assert!(store.remove_claim("rA").is_none());
    }

    #[test]
    fn test_same_address_race_has_one_winner() {
        let store = WalletRecordStore::new(3, None);

        for round in 0..50 {
            let address = format!("rRace{}", round);
            let s1 = store.clone();
            let s2 = store.clone();
            let a1 = address.clone();
            let a2 = address.clone();

            let t1 = std::thread::spawn(move || {
                s1.upsert_claim("u1", &meta("alice"), WalletClaim::new(a1, 10.0), false)
            });
            let t2 = std::thread::spawn(move || {
                s2.upsert_claim("u2", &meta("bob"), WalletClaim::new(a2, 10.0), false)
            });

            let o1 = t1.join().unwrap();
            let o2 = t2.join().unwrap();

            let successes = [o1, o2]
                .iter()
                .filter(|o| **o == ClaimOutcome::Success)
                .count();
            assert_eq!(successes, 1, "round {}: outcomes {:?} {:?}", round, o1, o2);

            // The address is owned by exactly one account.
            let owner = store.account_for_address(&address).unwrap();
            let other = if owner == "u1" { "u2" } else { "u1" };
            if let Some(record) = store.get_account(other) {
                assert!(!record.wallets.iter().any(|w| w.address == address));
            }
        }
    }

    #[test]
    fn test_claim_limit_holds_under_concurrency() {
        let store = WalletRecordStore::new(2, None);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let s = store.clone();
                std::thread::spawn(move || {
                    s.upsert_claim(
                        "u1",
                        &meta("alice"),
                        WalletClaim::new(format!("rConc{}", i), 1.0),
                        false,
                    )
                })
            })
            .collect();

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = outcomes
            .iter()
            .filter(|o| **o == ClaimOutcome::Success)
            .count();

        assert_eq!(successes, 2);
        assert_eq!(store.get_account("u1").unwrap().wallets.len(), 2);
    }

    #[test]
    fn test_persistence_round_trip() {
        let path = "test_wallet_records.json";
        let _ = std::fs::remove_file(path);

        let store = WalletRecordStore::new(3, Some(path.to_string()));
        store.upsert_claim("u1", &meta("alice"), WalletClaim::new("rA", 150.25), false);
        store.save_to_file().unwrap();

        let loaded = WalletRecordStore::load_from_file(3, path).unwrap();
        let record = loaded.get_account("u1").unwrap();
        assert_eq!(record.total_points, 150.25);
        assert_eq!(loaded.account_for_address("rA").as_deref(), Some("u1"));

        std::fs::remove_file(path).unwrap_or_default();
    }
}
