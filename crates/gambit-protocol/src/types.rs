//! Core wire types for the Gambit protocol.
//!
//! Everything in this module travels between client and server as JSON:
//! identity newtypes, the champion catalog, the closed set of in-game
//! intents, and the envelope framing around them. The shapes here are the
//! contract with the client — the serde attributes are load-bearing.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable player identity, chosen by the client and kept across
/// reconnections. Two connections presenting the same `PlayerId` are the
/// same seat.
///
/// `#[serde(transparent)]` serializes this as the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A six-digit room code, allocated by the server when a room is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

impl RoomCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identity of one physical card. Cards of the same champion are
/// interchangeable rules-wise; the id only answers "is this exact card in
/// that hand".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{:016x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Champions
// ---------------------------------------------------------------------------

/// The five champion types in the deck (three copies of each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Champion {
    Vladimir,
    Braum,
    Garen,
    Akali,
    TwistedFate,
}

impl Champion {
    /// All champions, in catalog order.
    pub const ALL: [Champion; 5] = [
        Champion::Vladimir,
        Champion::Braum,
        Champion::Garen,
        Champion::Akali,
        Champion::TwistedFate,
    ];

    /// Static description of the champion's active skill.
    pub fn skill_text(self) -> &'static str {
        match self {
            Champion::Vladimir => "Take 3 coins from the bank.",
            Champion::Braum => "No active skill.",
            Champion::Garen => "Steal 2 coins from another player.",
            Champion::Akali => {
                "Pay 3 coins to strike a player not protected by Braum."
            }
            Champion::TwistedFate => {
                "Swap one card from your hand with the deck."
            }
        }
    }

    /// Static description of the champion's passive (blocking) ability.
    pub fn passive_text(self) -> &'static str {
        match self {
            Champion::Vladimir => "Can block another player's 'take 2 coins'.",
            Champion::Braum => "Can block Akali's strike.",
            Champion::Garen => "Cannot be stolen from by Garen.",
            Champion::Akali => "No passive.",
            Champion::TwistedFate => "Cannot be stolen from by Garen.",
        }
    }
}

impl fmt::Display for Champion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Champion::Vladimir => "Vladimir",
            Champion::Braum => "Braum",
            Champion::Garen => "Garen",
            Champion::Akali => "Akali",
            Champion::TwistedFate => "Twisted Fate",
        };
        write!(f, "{name}")
    }
}

/// The declarable skills. Braum is passive-only, so he has no entry here —
/// a declaration names one of these four, never an arbitrary champion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    Vladimir,
    Garen,
    Akali,
    TwistedFate,
}

impl SkillKind {
    /// The champion a declaration of this skill implicitly claims to hold.
    pub fn champion(self) -> Champion {
        match self {
            SkillKind::Vladimir => Champion::Vladimir,
            SkillKind::Garen => Champion::Garen,
            SkillKind::Akali => Champion::Akali,
            SkillKind::TwistedFate => Champion::TwistedFate,
        }
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// The target's three possible answers to a declared Garen steal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StealResponseChoice {
    /// Challenge the Garen claim directly.
    #[serde(rename = "challenge")]
    Challenge,
    /// Claim to hold Garen (steal-immune).
    #[serde(rename = "blockGaren")]
    BlockAsGaren,
    /// Claim to hold Twisted Fate (steal-immune).
    #[serde(rename = "blockTF")]
    BlockAsTwistedFate,
}

/// Every in-game action a player can submit.
///
/// One closed enum, exhaustively matched by the dispatcher: adding or
/// removing an intent is a compile-time-checked change. The wire names
/// (`take1`, `pay7Kill`, …) are the client contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Intent {
    /// Take one coin. Always allowed on your turn.
    #[serde(rename = "take1")]
    TakeOne,

    /// Try to take two coins; any Vladimir claimant may block.
    #[serde(rename = "take2")]
    TakeTwo,

    /// Pay 7 coins to execute: the target must discard a card of their
    /// choice.
    #[serde(rename = "pay7Kill")]
    Execute { target_id: PlayerId },

    /// Pay 10 coins to draw a second card (only with exactly one in hand).
    #[serde(rename = "pay10Revive")]
    Revive,

    /// Declare a champion skill, claiming to hold that champion.
    #[serde(rename = "useSkill")]
    UseSkill {
        skill: SkillKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_id: Option<PlayerId>,
    },

    /// Execution target picks which card to discard.
    #[serde(rename = "chooseKillCard")]
    ChooseKillCard { card_id: CardId },

    /// Claim Vladimir to block a pending "take 2".
    #[serde(rename = "blockTake2")]
    BlockTakeTwo,

    /// Claim Braum to block a pending Akali strike (target only).
    #[serde(rename = "blockAkali")]
    BlockAkali,

    /// The Garen target's structured response (challenge or counter-claim).
    #[serde(rename = "garenResponse")]
    StealResponse { choice: StealResponseChoice },

    /// Twisted Fate caster picks which card to swap into the deck.
    #[serde(rename = "tfSwap")]
    SwapCard { card_id: CardId },

    /// Accept an open challenge window (first come, first served).
    #[serde(rename = "challenge")]
    Challenge,

    /// The challenged claimant reveals a card as proof.
    #[serde(rename = "proofReveal")]
    RevealProof { card_id: CardId },

    /// The losing side of a challenge discards a card face-down.
    #[serde(rename = "loseOne")]
    LoseCard { card_id: CardId },
}

// ---------------------------------------------------------------------------
// System messages
// ---------------------------------------------------------------------------

/// Framework-level messages: room lifecycle and keep-alive. Game moves ride
/// in [`Payload::Game`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum SystemMessage {
    // -- Client → server --
    /// Create a new room; the caller becomes host.
    CreateRoom {
        nickname: String,
        player_id: PlayerId,
    },

    /// Join (or rejoin) an existing room by code.
    JoinRoom {
        code: RoomCode,
        nickname: String,
        player_id: PlayerId,
    },

    /// Host-only: deal and begin the turn loop.
    StartGame,

    /// Keep-alive. The server echoes `client_time` back for RTT.
    Heartbeat { client_time: u64 },

    /// Clean goodbye, with a human-readable reason for the logs.
    Disconnect { reason: String },

    // -- Server → client --
    /// Reply to `CreateRoom`.
    RoomCreated { code: RoomCode },

    /// Reply to `JoinRoom`. `rejoined` is set when an existing seat was
    /// restored.
    RoomJoined { code: RoomCode, rejoined: bool },

    /// Reply to `Heartbeat`.
    HeartbeatAck { client_time: u64, server_time: u64 },

    /// Something went wrong. `code` follows HTTP conventions.
    Error { code: u16, message: String },
}

// ---------------------------------------------------------------------------
// Envelope framing
// ---------------------------------------------------------------------------

/// The content of an envelope: a system message, or opaque game bytes
/// (an `Intent` client→server, an engine event server→client) that the
/// framing layer passes through without interpreting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    System(SystemMessage),
    Game(Vec<u8>),
}

/// The top-level wire wrapper. Every message on the socket is one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Sender-local, auto-incrementing sequence number.
    pub seq: u64,
    /// Milliseconds since the sender started.
    pub timestamp: u64,
    /// The actual content.
    pub payload: Payload,
}

// =========================================================================
// Tests
// =========================================================================
