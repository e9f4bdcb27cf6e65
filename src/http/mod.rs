//! Inbound event gateway.
//!
//! The message-platform connector is out of scope; this HTTP surface is
//! the normalized boundary it would feed. One endpoint accepts claim and
//! command events, already shaped as `{caller, text, target?}` regardless
//! of whether they began life as free text or a structured interaction.

pub mod server;

pub use server::GatewayServer;
