//! Ledger network integration.
//!
//! # Data Flow
//! ```text
//! wallet address
//!     → resolver.rs (account_lines query, primary + failover endpoints)
//!     → HoldingsResult (amount / no trust line / unknown)
//! ```
//!
//! # Design Decisions
//! - The tri-state result is an explicit tagged variant, never a numeric
//!   sentinel: any non-negative balance is `Amount`, a confirmed missing
//!   trust line is `NoTrustline`, and every transport-level failure is
//!   `Unknown`
//! - `NoTrustline` is a definitive business outcome; `Unknown` is transient
//!   and must not block a claim
//! - All queries carry a bounded timeout and degrade to `Unknown` on expiry

pub mod resolver;
pub mod types;

pub use resolver::HoldingsResolver;
pub use types::{HoldingsResult, LedgerError, ResolveHoldings};
