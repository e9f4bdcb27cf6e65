//! Wallet-linking bot gateway binary.
//!
//! # Architecture Overview
//!
//! ```text
//!   inbound event (HTTP gateway)
//!        │
//!        ▼
//!   ┌──────────────┐   ordered predicates,   ┌──────────────────┐
//!   │CommandRouter │ ──first match claims──▶ │ command handlers │
//!   └──────────────┘                         └────────┬─────────┘
//!                                                     │
//!                                                     ▼
//!                                          ┌────────────────────┐
//!                                          │ WalletLinkWorkflow │
//!                                          └────────┬───────────┘
//!                          ┌────────────────────────┼──────────────────────┐
//!                          ▼                        ▼                      ▼
//!                 ┌────────────────┐      ┌──────────────────┐   ┌──────────────────┐
//!                 │HoldingsResolver│      │ WalletRecordStore│   │ RoleSynchronizer │
//!                 │ (ledger RPC)   │      │ (conflict checks)│   │ (tier add/remove)│
//!                 └────────────────┘      └──────────────────┘   └──────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use ledger_link::commands::handlers::{
    AdminDeleteWalletHandler, AdminLinkWalletHandler, CheckWalletHandler, GetUserHandler,
    GetUsersForRoleHandler, GetWalletHandler, HelpHandler, LinkWalletHandler,
};
use ledger_link::commands::router::{CommandHandler, CommandRouter};
use ledger_link::config::loader::load_config;
use ledger_link::config::schema::BotConfig;
use ledger_link::http::GatewayServer;
use ledger_link::ledger::resolver::HoldingsResolver;
use ledger_link::lifecycle::Shutdown;
use ledger_link::observability::events::{EventRecorder, TracingRecorder};
use ledger_link::observability::{logging, metrics};
use ledger_link::roles::platform::NoopPlatform;
use ledger_link::roles::synchronizer::RoleSynchronizer;
use ledger_link::roles::tiers::TierTable;
use ledger_link::store::records::WalletRecordStore;
use ledger_link::workflow::check::WalletCheck;
use ledger_link::workflow::identity::{Directory, EmptyDirectory};
use ledger_link::workflow::link::WalletLinkWorkflow;

#[derive(Parser, Debug)]
#[command(name = "ledger-link", about = "Wallet-linking bot gateway")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BotConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ledger-link starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = if config.claims.store_path.is_empty() {
        WalletRecordStore::new(config.claims.max_wallets_per_account, None)
    } else {
        WalletRecordStore::load_from_file(
            config.claims.max_wallets_per_account,
            &config.claims.store_path,
        )?
    };
    let store = Arc::new(store);

    tracing::info!(
        accounts = store.account_count(),
        max_wallets = config.claims.max_wallets_per_account,
        "Record store ready"
    );

    let resolver = Arc::new(HoldingsResolver::new(config.ledger.clone()));
    let recorder: Arc<dyn EventRecorder> = Arc::new(TracingRecorder);
    let tiers = TierTable::from_config(&config.tiers);
    let roles = RoleSynchronizer::new(Arc::new(NoopPlatform), tiers.clone());
    let workflow = Arc::new(WalletLinkWorkflow::new(
        resolver.clone(),
        store.clone(),
        roles,
        recorder.clone(),
    ));

    let explorer = config.ledger.explorer_url_base.clone();
    let admin_ids = Arc::new(config.admin.admin_ids.clone());
    let directory: Arc<dyn Directory> = Arc::new(EmptyDirectory);

    // Registration order is match precedence.
    let handlers: Vec<Arc<dyn CommandHandler>> = vec![
        Arc::new(AdminLinkWalletHandler {
            workflow: workflow.clone(),
            directory: directory.clone(),
            explorer_url_base: explorer.clone(),
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
        Arc::new(GetUserHandler {
            store: store.clone(),
        }),
        Arc::new(LinkWalletHandler {
            workflow: workflow.clone(),
            explorer_url_base: explorer.clone(),
        }),
        Arc::new(CheckWalletHandler {
            check: WalletCheck::new(resolver.clone()),
            explorer_url_base: explorer.clone(),
        }),
        Arc::new(HelpHandler {
            admin_ids: admin_ids.clone(),
        }),
    ];
    let commands = Arc::new(CommandRouter::new(handlers, admin_ids, recorder));

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown;
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                shutdown.trigger();
            }
        }
    });

    let listener = TcpListener::bind(&config.gateway.bind_address).await?;
    let server = GatewayServer::new(&config.gateway, commands);
    server.run(listener, server_shutdown).await?;

    store.save_to_file()?;
    tracing::info!("Shutdown complete");
    Ok(())
}
