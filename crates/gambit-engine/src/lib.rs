//! Game rules and room state machine for Gambit.
//!
//! This crate is the authoritative core of the game: the card catalog, the
//! per-room [`Game`] aggregate, turn scheduling with AFK defaults, the
//! action dispatcher, and the shared challenge → proof → loss pipeline that
//! every claim resolves through.
//!
//! It is deliberately synchronous and I/O-free. The room layer owns a
//! `Game`, feeds it player intents and expired deadline tokens, broadcasts
//! the snapshots, and sleeps until the deadline the game last armed. Every
//! timed window resolves exactly once: either a player's input transitions
//! the phase (arming a new deadline and making the old token stale), or the
//! deadline fires and applies the default.

mod card;
mod challenge;
mod dispatch;
mod error;
mod event;
mod state;
mod turn;

#[cfg(test)]
mod test_support;

pub use card::{Card, COPIES_PER_CHAMPION, DECK_SIZE, build_deck, shuffle};
pub use challenge::ClaimOutcome;
pub use dispatch::{
    AKALI_COST, EXECUTE_COST, REVIVE_COST, STEAL_MAX, TAKE_TWO_GAIN,
    VLADIMIR_GAIN,
};
pub use error::{ActionError, JoinError};
pub use event::{CardBrief, Event, Notice};
pub use state::{
    BlockKind, ClaimOrigin, Deadline, Game, JoinKind, LOG_CAP, LogEntry,
    MAX_PLAYERS, MIN_PLAYERS, PendingBlock, PendingChallenge, PendingKill,
    PendingLoss, PendingProof, PendingSteal, PendingSwap, Phase, Player,
    Timings,
};
