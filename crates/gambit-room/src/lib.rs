//! Room lifecycle for Gambit.
//!
//! Each room runs as an isolated Tokio task (actor model) owning one
//! authoritative [`gambit_engine::Game`]. User intents and fired deadlines
//! arrive through the same ordered channel, so no two mutations of a game
//! ever interleave.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — allocates codes, creates and destroys rooms
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomInfo`] — room metadata snapshot
//! - [`RoomError`] — what can go wrong talking to a room

mod error;
mod registry;
mod room;

pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{PlayerSender, RoomHandle, RoomInfo};
