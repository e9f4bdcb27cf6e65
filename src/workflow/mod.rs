//! Wallet-linking workflow.
//!
//! # Data Flow
//! ```text
//! inbound claim request
//!     → address.rs (syntactic validation / extraction from free text)
//!     → ledger resolver (holdings snapshot)
//!     → record store (conflict-checked upsert)
//!     → role synchronizer (best-effort)
//!     → outbound result message
//! ```
//!
//! # Design Decisions
//! - Linear state machine, terminal on first return; every terminal
//!   outcome maps to a distinct user message
//! - A transient ledger failure never blocks the claim: the wallet is
//!   recorded with a zero placeholder and flagged for a later refresh
//! - Role sync errors are logged and never change the workflow outcome

pub mod address;
pub mod check;
pub mod identity;
pub mod link;

pub use check::{CheckOutcome, WalletCheck};
pub use identity::{CallerIdentity, Directory, EmptyDirectory};
pub use link::{LinkOutcome, UnlinkOutcome, WalletLinkWorkflow};
