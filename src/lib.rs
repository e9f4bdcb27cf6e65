//! Wallet-Linking Bot Core
//!
//! Links a chat user's ledger wallet address to their account identity,
//! verifies token holdings against the ledger network, and synchronizes a
//! tier role derived from those holdings.

pub mod commands;
pub mod config;
pub mod http;
pub mod ledger;
pub mod lifecycle;
pub mod observability;
pub mod roles;
pub mod store;
pub mod workflow;

pub use config::schema::BotConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
