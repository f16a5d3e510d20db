//! The per-room game aggregate: players, deck, phase machine, pending
//! records, log, and the deadline token.
//!
//! `Game` is plain data plus invariant-preserving methods. It is owned and
//! mutated by exactly one room actor; everything the transport layer sees is
//! a serialized snapshot taken at broadcast time. Exactly one pending record
//! is populated for each waiting phase and is cleared in the same transition
//! that leaves the phase; the challenge context additionally persists through
//! the proof and loss windows it drives.

use std::collections::VecDeque;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use gambit_protocol::{Champion, PlayerId, RoomCode, SkillKind};
use serde::{Deserialize, Serialize};

use crate::card::{self, Card};
use crate::error::JoinError;

/// Minimum players required to start a game.
pub const MIN_PLAYERS: usize = 2;

/// Maximum seats in a room.
pub const MAX_PLAYERS: usize = 6;

/// The log keeps this many entries; older ones are dropped.
pub const LOG_CAP: usize = 200;

/// Milliseconds since the Unix epoch, for display timestamps.
pub(crate) fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Timings
// ---------------------------------------------------------------------------

/// Durations for every timed window. Tests shrink these; production uses
/// the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Timings {
    /// A full turn in the `Action` phase.
    pub turn: Duration,
    /// Execution target picking a discard.
    pub kill_choice: Duration,
    /// Window for a Vladimir claim against "take 2".
    pub block_take2: Duration,
    /// Window for a Braum claim against Akali.
    pub block_akali: Duration,
    /// Twisted Fate caster picking a swap.
    pub tf_swap: Duration,
    /// Open challenge window.
    pub challenge: Duration,
    /// Claimant picking a proof card.
    pub proof: Duration,
    /// Challenge loser picking a discard.
    pub loss: Duration,
    /// Garen target picking a response.
    pub steal_response: Duration,
    /// Disconnected seat retention.
    pub reconnect_grace: Duration,
    /// How long a finished room lingers before the registry destroys it.
    pub finished_linger: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            turn: Duration::from_secs(20),
            kill_choice: Duration::from_secs(8),
            block_take2: Duration::from_secs(7),
            block_akali: Duration::from_secs(7),
            tf_swap: Duration::from_secs(10),
            challenge: Duration::from_secs(7),
            proof: Duration::from_secs(8),
            loss: Duration::from_secs(8),
            steal_response: Duration::from_secs(7),
            reconnect_grace: Duration::from_secs(60),
            finished_linger: Duration::from_secs(300),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The room's phase. Exactly one is active at any time; every phase except
/// `Action` and `Finished` waits on one player choice with a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Action,
    AwaitKillChoice,
    AwaitBlockTake2,
    AwaitBlockAkali,
    AwaitTfDiscard,
    AwaitGarenResponse,
    AwaitChallenge,
    AwaitProof,
    AwaitLoseOne,
    Finished,
}

// ---------------------------------------------------------------------------
// Pending records
// ---------------------------------------------------------------------------

/// An execution in progress: `target` must pick a card to discard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingKill {
    pub by: PlayerId,
    pub target: PlayerId,
}

/// A blockable action waiting for its block window to close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum PendingBlock {
    /// "Take 2" is out; any Vladimir claimant may stop it.
    #[serde(rename = "take2")]
    TakeTwo { actor: PlayerId },
    /// An Akali strike is out; only the target may claim Braum.
    #[serde(rename = "akali")]
    Akali { actor: PlayerId, target: PlayerId },
}

/// Twisted Fate caster picking which card to swap into the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSwap {
    pub actor: PlayerId,
}

/// A declared Garen steal waiting on the target's structured response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSteal {
    pub actor: PlayerId,
    pub target: PlayerId,
}

/// Which block a block-claim asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[serde(rename = "take2")]
    TakeTwo,
    #[serde(rename = "garenSteal")]
    GarenSteal,
    #[serde(rename = "akali")]
    Akali,
}

/// What a challengeable claim originally asserted. Carried from the moment
/// a claim is made until the pipeline finalizes, so the resolver knows which
/// effect to apply or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClaimOrigin {
    /// A declared champion skill.
    Skill {
        skill: SkillKind,
        actor: PlayerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<PlayerId>,
    },
    /// A block asserted against someone else's action. `actor` is the
    /// original actor whose effect the block would suppress.
    Block {
        block: BlockKind,
        claimant: PlayerId,
        actor: PlayerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<PlayerId>,
    },
}

impl ClaimOrigin {
    /// The player whose claim must be proven if challenged.
    pub fn claimant(&self) -> &PlayerId {
        match self {
            ClaimOrigin::Skill { actor, .. } => actor,
            ClaimOrigin::Block { claimant, .. } => claimant,
        }
    }
}

/// An open challenge window, and — once accepted — the shared context the
/// proof and loss windows resolve against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChallenge {
    pub origin: ClaimOrigin,
    /// The champion the claimant must reveal to win the challenge.
    pub claim: Champion,
    /// When set, only this player may challenge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_challenger: Option<PlayerId>,
    /// First accepted challenger; later acceptances are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenger: Option<PlayerId>,
}

/// The claimant is picking which card to reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingProof {
    pub claimant: PlayerId,
    pub claim: Champion,
}

/// The challenge loser is picking which card to discard face-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLoss {
    pub player: PlayerId,
}

// ---------------------------------------------------------------------------
// Players and log
// ---------------------------------------------------------------------------

/// One seat in the room. Identity survives reconnection; the live socket is
/// the room actor's business, not the game state's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub coins: u32,
    pub hand: Vec<Card>,
    pub afk_streak: u8,
    pub alive: bool,
    pub connected: bool,
    /// Epoch ms of the disconnect that started the current grace period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disconnected_at: Option<u64>,
}

impl Player {
    fn new(id: PlayerId, nickname: String) -> Self {
        Self {
            id,
            nickname,
            coins: 0,
            hand: Vec::new(),
            afk_streak: 0,
            alive: true,
            connected: true,
            disconnected_at: None,
        }
    }
}

/// One public log line. Never names a card that is still hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ts: u64,
    pub text: String,
}

/// Whether a join created a seat or restored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    New,
    Rejoined,
}

// ---------------------------------------------------------------------------
// Deadline token
// ---------------------------------------------------------------------------

/// The single armed deadline for the current phase. The sequence number is
/// bumped on every arm/disarm, so a timer firing for a superseded phase can
/// be recognized as stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    pub seq: u64,
    pub at: Instant,
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// Authoritative state of one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub code: RoomCode,
    /// Seats in join order; turn order never changes after joining.
    pub players: Vec<Player>,
    pub deck: Vec<Card>,
    /// Kept for snapshot-shape stability; removed cards return to the deck
    /// instead of accumulating here.
    pub discard: Vec<Card>,
    pub turn_index: usize,
    pub phase: Phase,
    /// Epoch ms when the current window expires; 0 when nothing is armed.
    /// Display only — the authoritative deadline is the token below.
    pub timer_expire: u64,
    pub banner: String,
    pub log: VecDeque<LogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<PlayerId>,
    pub started: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_kill: Option<PendingKill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_block: Option<PendingBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_swap: Option<PendingSwap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_steal: Option<PendingSteal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_challenge: Option<PendingChallenge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_proof: Option<PendingProof>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_loss: Option<PendingLoss>,

    #[serde(skip)]
    pub timings: Timings,
    #[serde(skip)]
    deadline: Option<Deadline>,
    #[serde(skip)]
    deadline_seq: u64,
    /// When the game finished, for registry garbage collection.
    #[serde(skip)]
    pub finished_at: Option<Instant>,
}

impl Game {
    pub fn new(code: RoomCode, timings: Timings) -> Self {
        Self {
            code,
            players: Vec::new(),
            deck: Vec::new(),
            discard: Vec::new(),
            turn_index: 0,
            phase: Phase::Action,
            timer_expire: 0,
            banner: String::new(),
            log: VecDeque::new(),
            host: None,
            started: false,
            winner: None,
            pending_kill: None,
            pending_block: None,
            pending_swap: None,
            pending_steal: None,
            pending_challenge: None,
            pending_proof: None,
            pending_loss: None,
            timings,
            deadline: None,
            deadline_seq: 0,
            finished_at: None,
        }
    }

    // -- Lookup helpers ---------------------------------------------------

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// The player whose turn it is, if the seat exists.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.turn_index)
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub(crate) fn nickname(&self, id: &PlayerId) -> String {
        self.player(id)
            .map(|p| p.nickname.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Returns true when the player exists, is alive, and has cards.
    pub(crate) fn is_live_target(&self, id: &PlayerId) -> bool {
        self.player(id).is_some_and(|p| p.alive)
    }

    // -- Log and banner ---------------------------------------------------

    pub(crate) fn push_log(&mut self, text: impl Into<String>) {
        self.log.push_back(LogEntry {
            ts: epoch_ms(),
            text: text.into(),
        });
        while self.log.len() > LOG_CAP {
            self.log.pop_front();
        }
    }

    // -- Deadline token ---------------------------------------------------

    /// Arms the phase deadline `after` from now, superseding any previous
    /// one. Every armed window goes through here so the sequence number
    /// stays monotonic.
    pub(crate) fn arm(&mut self, after: Duration) {
        self.deadline_seq += 1;
        self.deadline = Some(Deadline {
            seq: self.deadline_seq,
            at: Instant::now() + after,
        });
        self.timer_expire = epoch_ms() + after.as_millis() as u64;
    }

    /// Cancels the phase deadline. The bump makes any already-queued firing
    /// stale.
    pub(crate) fn disarm(&mut self) {
        self.deadline_seq += 1;
        self.deadline = None;
        self.timer_expire = 0;
    }

    /// The currently armed deadline, if any.
    pub fn armed(&self) -> Option<Deadline> {
        self.deadline
    }

    /// True if `seq` identifies the live deadline. A mismatch means the
    /// phase already moved on and the firing must be ignored.
    pub(crate) fn deadline_is_live(&self, seq: u64) -> bool {
        self.deadline.is_some_and(|d| d.seq == seq)
    }

    // -- Deck plumbing ----------------------------------------------------

    /// Returns a removed card to the deck and reshuffles, so deck order is
    /// unpredictable after every return.
    pub(crate) fn return_to_deck(&mut self, card: Card) {
        self.deck.push(card);
        card::shuffle(&mut self.deck);
    }

    pub(crate) fn draw_one(&mut self) -> Option<Card> {
        self.deck.pop()
    }

    // -- Elimination and game end -----------------------------------------

    /// Marks a player dead once their hand empties. Safe to call on any id
    /// from any resolution path; does nothing for already-dead players.
    pub(crate) fn check_elimination(&mut self, id: &PlayerId) {
        let Some(player) = self.player_mut(id) else {
            return;
        };
        if player.alive && player.hand.is_empty() {
            player.alive = false;
            let nickname = player.nickname.clone();
            self.push_log(format!("{nickname} is out of the game"));
        }
    }

    /// Checks the win condition. When at most one player is left alive the
    /// game freezes: phase becomes `Finished`, every pending record is
    /// cleared, the deadline is disarmed, and no later input mutates state.
    /// Returns true if the game is (now) over.
    pub(crate) fn maybe_end(&mut self) -> bool {
        if !self.started {
            return false;
        }
        if self.alive_count() > 1 {
            return false;
        }
        let winner = self.players.iter().find(|p| p.alive).cloned();
        self.phase = Phase::Finished;
        self.started = false;
        self.banner = match &winner {
            Some(p) => format!("{} wins!", p.nickname),
            None => "Draw — nobody is left standing".to_string(),
        };
        self.winner = winner.map(|p| p.id);
        let banner = self.banner.clone();
        self.push_log(banner);
        self.pending_kill = None;
        self.pending_block = None;
        self.pending_swap = None;
        self.pending_steal = None;
        self.pending_challenge = None;
        self.pending_proof = None;
        self.pending_loss = None;
        self.disarm();
        self.finished_at = Some(Instant::now());
        true
    }

    // -- Seats ------------------------------------------------------------

    /// Adds a player, or restores the seat of a known identity (clearing
    /// its disconnect state). New seats are rejected once the game has
    /// started or the room is full. The first seat becomes host.
    pub fn join(
        &mut self,
        id: PlayerId,
        nickname: String,
    ) -> Result<JoinKind, JoinError> {
        if let Some(player) = self.player_mut(&id) {
            if !nickname.is_empty() {
                player.nickname = nickname;
            }
            player.connected = true;
            player.disconnected_at = None;
            let nickname = player.nickname.clone();
            self.push_log(format!("{nickname} reconnected"));
            return Ok(JoinKind::Rejoined);
        }
        if self.started || self.phase == Phase::Finished {
            return Err(JoinError::InProgress);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(JoinError::RoomFull);
        }
        let is_host = self.host.is_none();
        if is_host {
            self.host = Some(id.clone());
        }
        self.push_log(if is_host {
            format!("{nickname} joined the room (host)")
        } else {
            format!("{nickname} joined the room")
        });
        self.players.push(Player::new(id, nickname));
        Ok(JoinKind::New)
    }

    /// Records that a player's connection dropped. The seat survives until
    /// the grace period expires.
    pub fn mark_disconnected(&mut self, id: &PlayerId) {
        if let Some(player) = self.player_mut(id) {
            player.connected = false;
            player.disconnected_at = Some(epoch_ms());
        }
    }

    /// Called when a disconnect grace period elapses. In the lobby the seat
    /// is removed outright (host passes to the oldest remaining seat); in a
    /// running game the player is eliminated and the win condition is
    /// rechecked. Returns true if state changed.
    pub fn grace_elapsed(&mut self, id: &PlayerId) -> bool {
        if self.phase == Phase::Finished {
            return false;
        }
        let Some(idx) = self.players.iter().position(|p| &p.id == id) else {
            return false;
        };
        if self.players[idx].connected {
            return false;
        }
        if !self.started {
            let removed = self.players.remove(idx);
            self.push_log(format!("{} left the lobby", removed.nickname));
            if self.host.as_ref() == Some(&removed.id) {
                self.host = self.players.first().map(|p| p.id.clone());
            }
            return true;
        }
        if !self.players[idx].alive {
            return false;
        }
        self.players[idx].alive = false;
        let nickname = self.players[idx].nickname.clone();
        self.push_log(format!("{nickname} never came back — eliminated"));
        self.maybe_end();
        true
    }

    pub fn finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{lobby, pid};

    // =====================================================================
    // Log ring
    // =====================================================================

    #[test]
    fn test_push_log_caps_at_two_hundred_entries() {
        let mut game = Game::new(RoomCode::new("000000"), Timings::default());
        for i in 0..250 {
            game.push_log(format!("entry {i}"));
        }
        assert_eq!(game.log.len(), LOG_CAP);
        // Oldest entries are the ones dropped.
        assert_eq!(game.log.front().unwrap().text, "entry 50");
        assert_eq!(game.log.back().unwrap().text, "entry 249");
    }

    // =====================================================================
    // join()
    // =====================================================================

    #[test]
    fn test_join_first_player_becomes_host() {
        let mut game = Game::new(RoomCode::new("000000"), Timings::default());
        let kind = game.join(pid("a"), "ada".into()).unwrap();
        assert_eq!(kind, JoinKind::New);
        assert_eq!(game.host, Some(pid("a")));
    }

    #[test]
    fn test_join_known_identity_restores_seat() {
        let mut game = lobby(&["a", "b"]);
        game.mark_disconnected(&pid("b"));
        assert!(!game.player(&pid("b")).unwrap().connected);

        let kind = game.join(pid("b"), "b".into()).unwrap();
        assert_eq!(kind, JoinKind::Rejoined);
        let player = game.player(&pid("b")).unwrap();
        assert!(player.connected);
        assert!(player.disconnected_at.is_none());
        // No duplicate seat.
        assert_eq!(game.players.len(), 2);
    }

    #[test]
    fn test_join_rejects_seventh_player() {
        let mut game = lobby(&["a", "b", "c", "d", "e", "f"]);
        let result = game.join(pid("g"), "g".into());
        assert!(matches!(result, Err(JoinError::RoomFull)));
    }

    #[test]
    fn test_join_unknown_identity_rejected_after_start() {
        let mut game = lobby(&["a", "b"]);
        game.start(&pid("a")).unwrap();
        let result = game.join(pid("c"), "c".into());
        assert!(matches!(result, Err(JoinError::InProgress)));
        // A known identity can still rejoin mid-game.
        assert!(game.join(pid("b"), "b".into()).is_ok());
    }

    // =====================================================================
    // Grace period
    // =====================================================================

    #[test]
    fn test_grace_elapsed_in_lobby_removes_seat_and_passes_host() {
        let mut game = lobby(&["a", "b"]);
        game.mark_disconnected(&pid("a"));

        assert!(game.grace_elapsed(&pid("a")));
        assert_eq!(game.players.len(), 1);
        assert_eq!(game.host, Some(pid("b")));
    }

    #[test]
    fn test_grace_elapsed_in_game_eliminates_and_rechecks_win() {
        let mut game = lobby(&["a", "b"]);
        game.start(&pid("a")).unwrap();
        game.mark_disconnected(&pid("b"));

        assert!(game.grace_elapsed(&pid("b")));
        assert!(!game.player(&pid("b")).unwrap().alive);
        // Only one player left — game over.
        assert_eq!(game.phase, Phase::Finished);
        assert_eq!(game.winner, Some(pid("a")));
    }

    #[test]
    fn test_grace_elapsed_noop_after_reconnect() {
        let mut game = lobby(&["a", "b"]);
        game.start(&pid("a")).unwrap();
        game.mark_disconnected(&pid("b"));
        game.join(pid("b"), "b".into()).unwrap();

        assert!(!game.grace_elapsed(&pid("b")));
        assert!(game.player(&pid("b")).unwrap().alive);
    }

    // =====================================================================
    // Deadline token
    // =====================================================================

    #[test]
    fn test_arm_supersedes_previous_deadline() {
        let mut game = Game::new(RoomCode::new("000000"), Timings::default());
        game.arm(Duration::from_secs(5));
        let first = game.armed().unwrap();

        game.arm(Duration::from_secs(5));
        let second = game.armed().unwrap();

        assert!(second.seq > first.seq);
        assert!(!game.deadline_is_live(first.seq));
        assert!(game.deadline_is_live(second.seq));
    }

    #[test]
    fn test_disarm_invalidates_queued_firing() {
        let mut game = Game::new(RoomCode::new("000000"), Timings::default());
        game.arm(Duration::from_secs(5));
        let armed = game.armed().unwrap();

        game.disarm();
        assert!(!game.deadline_is_live(armed.seq));
        assert_eq!(game.timer_expire, 0);
    }

    // =====================================================================
    // maybe_end()
    // =====================================================================

    #[test]
    fn test_maybe_end_ignores_unstarted_games() {
        let mut game = lobby(&["a"]);
        assert!(!game.maybe_end());
        assert_eq!(game.phase, Phase::Action);
    }

    #[test]
    fn test_maybe_end_declares_last_player_winner() {
        let mut game = lobby(&["a", "b", "c"]);
        game.start(&pid("a")).unwrap();
        game.player_mut(&pid("b")).unwrap().alive = false;
        game.player_mut(&pid("c")).unwrap().alive = false;

        assert!(game.maybe_end());
        assert_eq!(game.phase, Phase::Finished);
        assert_eq!(game.winner, Some(pid("a")));
        assert!(!game.started);
        assert!(game.armed().is_none());
        assert!(game.finished_at.is_some());
    }

    #[test]
    fn test_maybe_end_with_no_survivors_is_a_draw() {
        let mut game = lobby(&["a", "b"]);
        game.start(&pid("a")).unwrap();
        game.player_mut(&pid("a")).unwrap().alive = false;
        game.player_mut(&pid("b")).unwrap().alive = false;

        assert!(game.maybe_end());
        assert_eq!(game.winner, None);
        assert!(game.banner.contains("Draw"));
    }

    // =====================================================================
    // Snapshot serialization
    // =====================================================================

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let mut game = lobby(&["a", "b"]);
        game.start(&pid("a")).unwrap();
        let json = serde_json::to_string(&game).unwrap();
        let back: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(back.players.len(), 2);
        assert_eq!(back.deck.len(), game.deck.len());
        assert_eq!(back.phase, game.phase);
    }

    #[test]
    fn test_snapshot_uses_camel_case_keys() {
        let game = lobby(&["a"]);
        let json: serde_json::Value = serde_json::to_value(&game).unwrap();
        assert!(json.get("turnIndex").is_some());
        assert!(json.get("timerExpire").is_some());
        assert!(json.get("turn_index").is_none());
    }
}
