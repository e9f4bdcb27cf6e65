//! Inbound command dispatch.
//!
//! # Design Decisions
//! - Handlers are an explicit ordered list of predicates; the router owns
//!   a per-request "claimed" flag and stops at the first match. No global
//!   dispatcher state exists.
//! - Registration order is precedence: the admin link handler is
//!   registered before the plain link handler, and the role-listing
//!   handler before the wallet-owner lookup, because the earlier trigger
//!   text contains the later one.
//! - Admin authorization is verified by the router before an admin-only
//!   handler runs, never inside the store or workflow.

pub mod handlers;
pub mod router;

pub use router::{CommandHandler, CommandRouter, Dispatch, InboundEvent};
