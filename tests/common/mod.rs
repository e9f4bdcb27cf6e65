//! Shared fixtures for integration testing.
#![allow(dead_code)]

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};

use ledger_link::commands::handlers::{
    AdminDeleteWalletHandler, AdminLinkWalletHandler, CheckWalletHandler, GetUserHandler,
    GetUsersForRoleHandler, GetWalletHandler, HelpHandler, LinkWalletHandler,
};
use ledger_link::commands::router::{CommandHandler, CommandRouter};
use ledger_link::config::schema::TiersConfig;
use ledger_link::ledger::types::{HoldingsResult, ResolveHoldings};
use ledger_link::observability::events::NoopRecorder;
use ledger_link::roles::platform::{RolePlatform, RoleSyncError};
use ledger_link::roles::synchronizer::RoleSynchronizer;
use ledger_link::roles::tiers::TierTable;
use ledger_link::store::records::WalletRecordStore;
use ledger_link::workflow::check::WalletCheck;
use ledger_link::workflow::identity::Directory;
use ledger_link::workflow::link::WalletLinkWorkflow;

pub const EXPLORER: &str = "https://example.org/account";

/// Ledger stub returning a scripted result per address; unscripted
/// addresses behave like a network outage.
#[derive(Default)]
pub struct ScriptedLedger {
    pub results: DashMap<String, HoldingsResult>,
}

impl ScriptedLedger {
    pub fn with(results: &[(&str, HoldingsResult)]) -> Arc<Self> {
        let ledger = Self::default();
        for (address, result) in results {
            ledger.results.insert(address.to_string(), result.clone());
        }
        Arc::new(ledger)
    }
}

#[async_trait]
impl ResolveHoldings for ScriptedLedger {
    async fn resolve(&self, address: &str) -> HoldingsResult {
        self.results
            .get(address)
            .map(|r| r.value().clone())
            .unwrap_or(HoldingsResult::Unknown)
    }
}

/// Platform stub that tracks held tiers per account, idempotently.
#[derive(Default)]
pub struct RecordingPlatform {
    held: Mutex<Vec<(String, String)>>,
}

impl RecordingPlatform {
    pub fn tiers_of(&self, account_id: &str) -> Vec<String> {
        self.held
            .lock()
            .unwrap()
            .iter()
            .filter(|(account, _)| account == account_id)
            .map(|(_, role)| role.clone())
            .collect()
    }
}

#[async_trait]
impl RolePlatform for RecordingPlatform {
    async fn add_tier(&self, account_id: &str, role_id: &str) -> Result<(), RoleSyncError> {
        let mut held = self.held.lock().unwrap();
        let entry = (account_id.to_string(), role_id.to_string());
        if !held.contains(&entry) {
            held.push(entry);
        }
        Ok(())
    }

    async fn remove_tier(&self, account_id: &str, role_id: &str) -> Result<(), RoleSyncError> {
        self.held
            .lock()
            .unwrap()
            .retain(|(account, role)| !(account == account_id && role == role_id));
        Ok(())
    }
}

/// Directory stub backed by a map of (username, discriminator) → id.
#[derive(Default)]
pub struct StaticDirectory {
    pub entries: DashMap<(String, String), String>,
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn lookup_account_id(&self, username: &str, discriminator: &str) -> Option<String> {
        self.entries
            .get(&(username.to_string(), discriminator.to_string()))
            .map(|r| r.value().clone())
    }
}

/// Wire a complete command router over the given collaborators.
pub fn build_router(
    resolver: Arc<dyn ResolveHoldings>,
    store: Arc<WalletRecordStore>,
    platform: Arc<dyn RolePlatform>,
    directory: Arc<dyn Directory>,
    admin_ids: Vec<String>,
) -> Arc<CommandRouter> {
    let tiers = TierTable::from_config(&TiersConfig::default());
    let roles = RoleSynchronizer::new(platform, tiers.clone());
    let workflow = Arc::new(WalletLinkWorkflow::new(
        resolver.clone(),
        store.clone(),
        roles,
        Arc::new(NoopRecorder),
    ));

    let admin_ids = Arc::new(admin_ids);
    let handlers: Vec<Arc<dyn CommandHandler>> = vec![
        Arc::new(AdminLinkWalletHandler {
            workflow: workflow.clone(),
            directory: directory.clone(),
            explorer_url_base: EXPLORER.to_string(),
        }),
        Arc::new(AdminDeleteWalletHandler {
            workflow: workflow.clone(),
        }),
        Arc::new(GetUsersForRoleHandler {
            store: store.clone(),
            tiers,
        }),
        Arc::new(GetWalletHandler {
            store: store.clone(),
            directory,
        }),
        Arc::new(GetUserHandler { store }),
        Arc::new(LinkWalletHandler {
            workflow,
            explorer_url_base: EXPLORER.to_string(),
        }),
        Arc::new(CheckWalletHandler {
            check: WalletCheck::new(resolver),
            explorer_url_base: EXPLORER.to_string(),
        }),
        Arc::new(HelpHandler {
            admin_ids: admin_ids.clone(),
        }),
    ];

    Arc::new(CommandRouter::new(handlers, admin_ids, Arc::new(NoopRecorder)))
}
