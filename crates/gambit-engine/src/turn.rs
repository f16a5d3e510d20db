//! Turn scheduling: starting the game, advancing the turn pointer, and the
//! AFK penalty applied when a turn deadline fires with no action taken.

use gambit_protocol::PlayerId;

use crate::card::build_deck;
use crate::error::ActionError;
use crate::state::{Game, MIN_PLAYERS, Phase};

/// Cards dealt to each player at game start.
const OPENING_HAND: usize = 2;

/// Consecutive expired turns before a player is eliminated.
const AFK_LIMIT: u8 = 3;

impl Game {
    /// Host-only: deals a fresh game and begins the turn loop. Also serves
    /// as the rematch entry point after a finished game — every seat is
    /// reset before dealing.
    pub fn start(&mut self, actor: &PlayerId) -> Result<(), ActionError> {
        if self.host.as_ref() != Some(actor) {
            return Err(ActionError::NotHost);
        }
        if self.started {
            return Err(ActionError::AlreadyStarted);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(ActionError::TooFewPlayers(MIN_PLAYERS));
        }

        for player in &mut self.players {
            player.coins = 0;
            player.hand.clear();
            player.afk_streak = 0;
            player.alive = true;
        }
        self.deck = build_deck();
        self.discard.clear();
        for _ in 0..OPENING_HAND {
            for i in 0..self.players.len() {
                if let Some(card) = self.deck.pop() {
                    self.players[i].hand.push(card);
                }
            }
        }

        self.turn_index = 0;
        self.phase = Phase::Action;
        self.started = true;
        self.winner = None;
        self.finished_at = None;
        self.banner.clear();
        self.push_log("Game started");
        let turn = self.timings.turn;
        self.arm(turn);
        Ok(())
    }

    /// Moves the turn pointer to the next living player (wrapping), enters
    /// the `Action` phase, and arms the turn deadline. Callers must have
    /// already handled game end; if nobody is alive this leaves the state
    /// untouched.
    pub(crate) fn advance_turn(&mut self) {
        let n = self.players.len();
        for i in 1..=n {
            let next = (self.turn_index + i) % n;
            if self.players[next].alive {
                self.turn_index = next;
                self.phase = Phase::Action;
                self.banner.clear();
                let turn = self.timings.turn;
                self.arm(turn);
                return;
            }
        }
    }

    /// Clears the current player's AFK streak. Called by every accepted
    /// turn-scoped action.
    pub(crate) fn mark_acted(&mut self) {
        if let Some(player) = self.players.get_mut(self.turn_index) {
            player.afk_streak = 0;
        }
    }

    /// The turn deadline fired with no action taken: one coin of pity, one
    /// strike, and at [`AFK_LIMIT`] strikes the player is out.
    pub(crate) fn on_turn_expired(&mut self) {
        let Some(current) = self.players.get_mut(self.turn_index) else {
            self.advance_turn();
            return;
        };
        if !current.alive {
            self.advance_turn();
            return;
        }

        current.coins += 1;
        current.afk_streak += 1;
        let nickname = current.nickname.clone();
        let streak = current.afk_streak;
        self.push_log(format!("{nickname} idled — +1 coin"));
        if streak >= AFK_LIMIT {
            if let Some(current) = self.players.get_mut(self.turn_index) {
                current.alive = false;
            }
            self.push_log(format!(
                "{nickname} idled {AFK_LIMIT} turns in a row — eliminated"
            ));
        }
        if self.maybe_end() {
            return;
        }
        self.advance_turn();
    }
}

// =========================================================================
// Tests
// =========================================================================
