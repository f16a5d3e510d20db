//! # Gambit server
//!
//! Authoritative WebSocket server for Gambit, a turn-based bluffing card
//! game for 2–6 players. Players declare champion abilities they may be
//! bluffing about; opponents challenge; the engine arbitrates claims
//! through a shared challenge → proof → loss pipeline, and every timed
//! window resolves exactly once — by player input or by deadline.
//!
//! The stack, bottom up: `gambit-transport` (WebSocket framing),
//! `gambit-protocol` (wire types and codec), `gambit-engine` (the pure
//! rules core), `gambit-room` (one actor task per room plus the
//! registry), and this crate (connection handling and the accept loop).

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use server::{GambitServer, GambitServerBuilder};
