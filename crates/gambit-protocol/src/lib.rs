//! Wire protocol for the Gambit game server.
//!
//! This crate defines the language that clients and the server speak:
//!
//! - **Types** ([`Envelope`], [`SystemMessage`], [`Intent`], identity
//!   newtypes, the [`Champion`] catalog) — the structures on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how they become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer knows nothing about rooms or game rules; it only
//! defines shapes. Game state and server events live in `gambit-engine`
//! and ride through [`Payload::Game`] as opaque bytes.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    CardId, Champion, Envelope, Intent, Payload, PlayerId, RoomCode,
    SkillKind, StealResponseChoice, SystemMessage,
};
