//! Wallet record store.
//!
//! # Responsibilities
//! - Persist wallet-to-account bindings
//! - Enforce system-wide address uniqueness at write time
//! - Enforce the per-account claim limit
//! - Report structured claim outcomes
//!
//! # Design Decisions
//! - The address-ownership check and the mutation are one atomically
//!   isolated step (a conditional write keyed by address), so exactly one
//!   of two racing claims for the same address wins
//! - Per-account mutation is serialized, so the claim limit holds under
//!   concurrency
//! - No lock is ever held across a network call
//! - The backing document store is opaque: a JSON file behind the store API

pub mod records;
pub mod types;

pub use records::WalletRecordStore;
pub use types::{AccountMeta, AccountRecord, ClaimOutcome, WalletClaim};
