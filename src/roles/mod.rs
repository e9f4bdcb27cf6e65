//! Tier role synchronization.
//!
//! # Data Flow
//! ```text
//! (previous_points, new_points)
//!     → tiers.rs (strategy maps points to a tier set)
//!     → synchronizer.rs (diff, idempotent add/remove against the platform)
//! ```
//!
//! # Design Decisions
//! - The strategy (highest-only vs cumulative) is configuration, never
//!   hard-coded
//! - Platform mutation is best-effort: failures are logged and returned as
//!   `RoleSyncError`, never rolled back into the record store
//! - `add_tier` / `remove_tier` are idempotent at the platform boundary

pub mod platform;
pub mod synchronizer;
pub mod tiers;

pub use platform::{NoopPlatform, RolePlatform, RoleSyncError};
pub use synchronizer::RoleSynchronizer;
pub use tiers::TierTable;
