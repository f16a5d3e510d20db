//! The action dispatcher: the single entry point for every player intent,
//! and the deadline dispatcher that resolves expired windows.
//!
//! Two authority tracks. Phase-scoped intents (card choices, blocks,
//! challenge responses) are authorized against the role recorded in the
//! active pending record, regardless of whose turn it is. Turn-scoped
//! intents require the `Action` phase, a started game, and the turn holder.

use gambit_protocol::{
    CardId, Champion, Intent, PlayerId, SkillKind, StealResponseChoice,
};
use rand::Rng;

use crate::error::ActionError;
use crate::event::{CardBrief, Event, Notice};
use crate::state::{
    BlockKind, ClaimOrigin, Game, PendingBlock, PendingKill, PendingSteal,
    PendingSwap, Phase,
};

/// Coins to execute another player's card.
pub const EXECUTE_COST: u32 = 7;

/// Coins to draw back up to two cards.
pub const REVIVE_COST: u32 = 10;

/// Coins Akali's strike costs, refunded never.
pub const AKALI_COST: u32 = 3;

/// Coins Vladimir's skill grants.
pub const VLADIMIR_GAIN: u32 = 3;

/// Coins "take 2" grants when unblocked.
pub const TAKE_TWO_GAIN: u32 = 2;

/// Most coins Garen can steal at once.
pub const STEAL_MAX: u32 = 2;

impl Game {
    /// Validates and applies one player intent. On success the returned
    /// notices are private messages for specific players; the caller
    /// broadcasts the new state to the room. On error nothing changed and
    /// only the requester is told why.
    pub fn submit(
        &mut self,
        actor: &PlayerId,
        intent: Intent,
    ) -> Result<Vec<Notice>, ActionError> {
        if self.phase == Phase::Finished {
            return Err(ActionError::GameOver);
        }
        match intent {
            // Phase-scoped: authorized by the pending record.
            Intent::ChooseKillCard { card_id } => {
                self.choose_kill_card(actor, card_id)
            }
            Intent::BlockTakeTwo => self.block_take_two(actor),
            Intent::BlockAkali => self.block_akali(actor),
            Intent::StealResponse { choice } => {
                self.steal_response(actor, choice)
            }
            Intent::SwapCard { card_id } => self.swap_card(actor, card_id),
            Intent::Challenge => self.accept_challenge(actor),
            Intent::RevealProof { card_id } => {
                self.reveal_proof(actor, card_id)
            }
            Intent::LoseCard { card_id } => self.lose_card(actor, card_id),

            // Turn-scoped: only the turn holder, only in `Action`.
            Intent::TakeOne => {
                self.require_turn(actor)?;
                Ok(self.take_one())
            }
            Intent::TakeTwo => {
                self.require_turn(actor)?;
                Ok(self.take_two())
            }
            Intent::Execute { target_id } => {
                self.require_turn(actor)?;
                self.execute(target_id)
            }
            Intent::Revive => {
                self.require_turn(actor)?;
                self.revive()
            }
            Intent::UseSkill { skill, target_id } => {
                self.require_turn(actor)?;
                self.use_skill(skill, target_id)
            }
        }
    }

    /// Resolves the armed deadline identified by `seq`. Returns `None` when
    /// the firing is stale — the phase already moved on — which must be a
    /// silent no-op so a timer racing a user action can never double-resolve
    /// a window.
    pub fn deadline_elapsed(&mut self, seq: u64) -> Option<Vec<Notice>> {
        if !self.deadline_is_live(seq) {
            return None;
        }
        self.disarm();
        let notices = match self.phase {
            Phase::Action => {
                self.on_turn_expired();
                Vec::new()
            }
            Phase::AwaitKillChoice => self.on_kill_choice_expired(),
            Phase::AwaitBlockTake2 => {
                self.on_block_take2_expired();
                Vec::new()
            }
            Phase::AwaitBlockAkali => self.on_block_akali_expired(),
            Phase::AwaitTfDiscard => {
                self.on_swap_expired();
                Vec::new()
            }
            Phase::AwaitGarenResponse => {
                self.on_steal_response_expired();
                Vec::new()
            }
            Phase::AwaitChallenge => self.on_challenge_expired(),
            Phase::AwaitProof => self.on_proof_expired(),
            Phase::AwaitLoseOne => self.on_loss_expired(),
            Phase::Finished => return None,
        };
        Some(notices)
    }

    fn require_turn(&self, actor: &PlayerId) -> Result<(), ActionError> {
        if !self.started {
            return Err(ActionError::NotStarted);
        }
        if self.phase != Phase::Action {
            return Err(ActionError::WrongPhase);
        }
        match self.current_player() {
            Some(p) if &p.id == actor => Ok(()),
            _ => Err(ActionError::NotYourTurn),
        }
    }

    // -- Turn-scoped actions ----------------------------------------------

    fn take_one(&mut self) -> Vec<Notice> {
        self.mark_acted();
        let nickname = match self.players.get_mut(self.turn_index) {
            Some(p) => {
                p.coins += 1;
                p.nickname.clone()
            }
            None => return Vec::new(),
        };
        self.push_log(format!("{nickname} takes 1 coin"));
        self.advance_turn();
        Vec::new()
    }

    fn take_two(&mut self) -> Vec<Notice> {
        self.mark_acted();
        let Some(current) = self.players.get(self.turn_index) else {
            return Vec::new();
        };
        let actor = current.id.clone();
        let nickname = current.nickname.clone();

        self.phase = Phase::AwaitBlockTake2;
        self.pending_block = Some(PendingBlock::TakeTwo { actor });
        let window = self.timings.block_take2;
        self.arm(window);
        self.banner = format!(
            "{nickname} goes for 2 coins — a Vladimir may block ({}s)",
            window.as_secs()
        );
        self.push_log(format!("{nickname} goes for 2 coins"));
        Vec::new()
    }

    fn execute(
        &mut self,
        target_id: PlayerId,
    ) -> Result<Vec<Notice>, ActionError> {
        let target = self
            .player(&target_id)
            .ok_or(ActionError::InvalidTarget)?;
        if !target.alive {
            return Err(ActionError::InvalidTarget);
        }
        if target.hand.is_empty() {
            return Err(ActionError::TargetHandEmpty);
        }
        let Some(current) = self.players.get(self.turn_index) else {
            return Err(ActionError::NotYourTurn);
        };
        if current.coins < EXECUTE_COST {
            return Err(ActionError::InsufficientCoins {
                needed: EXECUTE_COST,
            });
        }

        let by = current.id.clone();
        let nickname = current.nickname.clone();
        if let Some(current) = self.players.get_mut(self.turn_index) {
            current.coins -= EXECUTE_COST;
        }
        self.mark_acted();
        self.push_log(format!(
            "{nickname} pays {EXECUTE_COST} coins for an execution"
        ));
        Ok(self.open_execution(by, target_id))
    }

    fn revive(&mut self) -> Result<Vec<Notice>, ActionError> {
        let Some(current) = self.players.get(self.turn_index) else {
            return Err(ActionError::NotYourTurn);
        };
        if current.coins < REVIVE_COST {
            return Err(ActionError::InsufficientCoins {
                needed: REVIVE_COST,
            });
        }
        if current.hand.len() != 1 {
            return Err(ActionError::ReviveHandSize);
        }
        if self.deck.is_empty() {
            return Err(ActionError::DeckEmpty);
        }

        let nickname = current.nickname.clone();
        let card = self.deck.pop();
        if let Some(current) = self.players.get_mut(self.turn_index) {
            current.coins -= REVIVE_COST;
            if let Some(card) = card {
                current.hand.push(card);
            }
        }
        self.mark_acted();
        self.push_log(format!(
            "{nickname} pays {REVIVE_COST} coins and draws a champion"
        ));
        self.advance_turn();
        Ok(Vec::new())
    }

    fn use_skill(
        &mut self,
        skill: SkillKind,
        target_id: Option<PlayerId>,
    ) -> Result<Vec<Notice>, ActionError> {
        let Some(current) = self.players.get(self.turn_index) else {
            return Err(ActionError::NotYourTurn);
        };
        let actor = current.id.clone();
        let nickname = current.nickname.clone();

        match skill {
            SkillKind::Vladimir => {
                self.mark_acted();
                self.banner = format!(
                    "{nickname} claims Vladimir for +{VLADIMIR_GAIN} — open to challenge ({}s)",
                    self.timings.challenge.as_secs()
                );
                self.push_log(format!(
                    "{nickname} claims Vladimir: take {VLADIMIR_GAIN} coins"
                ));
                Ok(self.open_challenge(
                    ClaimOrigin::Skill {
                        skill,
                        actor,
                        target: None,
                    },
                    Champion::Vladimir,
                    None,
                    None,
                ))
            }

            SkillKind::Garen => {
                let target_id =
                    target_id.ok_or(ActionError::InvalidTarget)?;
                if target_id == actor {
                    return Err(ActionError::SelfTarget);
                }
                if !self.is_live_target(&target_id) {
                    return Err(ActionError::InvalidTarget);
                }
                self.mark_acted();
                let target_nickname = self.nickname(&target_id);
                self.phase = Phase::AwaitGarenResponse;
                self.pending_steal = Some(PendingSteal {
                    actor,
                    target: target_id,
                });
                let window = self.timings.steal_response;
                self.arm(window);
                self.banner = format!(
                    "{nickname} claims Garen to steal from {target_nickname} — challenge or block ({}s)",
                    window.as_secs()
                );
                self.push_log(format!(
                    "{nickname} claims Garen: steal from {target_nickname}"
                ));
                Ok(Vec::new())
            }

            SkillKind::Akali => {
                if current.coins < AKALI_COST {
                    return Err(ActionError::InsufficientCoins {
                        needed: AKALI_COST,
                    });
                }
                let target_id =
                    target_id.ok_or(ActionError::InvalidTarget)?;
                if target_id == actor {
                    return Err(ActionError::SelfTarget);
                }
                if !self.is_live_target(&target_id) {
                    return Err(ActionError::InvalidTarget);
                }
                if self
                    .player(&target_id)
                    .is_none_or(|p| p.hand.is_empty())
                {
                    return Err(ActionError::TargetHandEmpty);
                }

                if let Some(current) =
                    self.players.get_mut(self.turn_index)
                {
                    current.coins -= AKALI_COST;
                }
                self.mark_acted();
                let target_nickname = self.nickname(&target_id);
                self.banner = format!(
                    "{nickname} claims Akali against {target_nickname} — {target_nickname} may challenge ({}s)",
                    self.timings.challenge.as_secs()
                );
                self.push_log(format!(
                    "{nickname} claims Akali ({AKALI_COST} coins paid)"
                ));
                Ok(self.open_challenge(
                    ClaimOrigin::Skill {
                        skill,
                        actor,
                        target: Some(target_id.clone()),
                    },
                    Champion::Akali,
                    Some(target_id),
                    None,
                ))
            }

            SkillKind::TwistedFate => {
                if current.hand.is_empty() {
                    return Err(ActionError::HandEmpty);
                }
                self.mark_acted();
                self.banner = format!(
                    "{nickname} claims Twisted Fate for a swap — open to challenge ({}s)",
                    self.timings.challenge.as_secs()
                );
                self.push_log(format!(
                    "{nickname} claims Twisted Fate: swap a card"
                ));
                Ok(self.open_challenge(
                    ClaimOrigin::Skill {
                        skill,
                        actor,
                        target: None,
                    },
                    Champion::TwistedFate,
                    None,
                    None,
                ))
            }
        }
    }

    // -- Phase-scoped responses -------------------------------------------

    fn choose_kill_card(
        &mut self,
        actor: &PlayerId,
        card_id: CardId,
    ) -> Result<Vec<Notice>, ActionError> {
        if self.phase != Phase::AwaitKillChoice {
            return Err(ActionError::WrongPhase);
        }
        let Some(pending) = &self.pending_kill else {
            return Err(ActionError::WrongPhase);
        };
        if &pending.target != actor {
            return Err(ActionError::NotYourCall);
        }
        let target_id = pending.target.clone();
        let idx = self
            .player(&target_id)
            .and_then(|p| p.hand.iter().position(|c| c.id == card_id))
            .ok_or(ActionError::CardNotFound)?;

        let card = match self.player_mut(&target_id) {
            Some(p) => p.hand.remove(idx),
            None => return Err(ActionError::CardNotFound),
        };
        self.return_to_deck(card);

        let nickname = self.nickname(&target_id);
        self.push_log(format!(
            "{nickname} discarded a card back into the deck"
        ));
        self.banner.clear();
        self.pending_kill = None;
        let notices =
            vec![(target_id.clone(), Event::KillPromptClosed)];

        self.check_elimination(&target_id);
        if self.maybe_end() {
            return Ok(notices);
        }
        self.advance_turn();
        Ok(notices)
    }

    fn block_take_two(
        &mut self,
        actor: &PlayerId,
    ) -> Result<Vec<Notice>, ActionError> {
        if self.phase != Phase::AwaitBlockTake2 {
            return Err(ActionError::WrongPhase);
        }
        let Some(PendingBlock::TakeTwo { actor: original }) =
            &self.pending_block
        else {
            return Err(ActionError::WrongPhase);
        };
        let original = original.clone();
        let blocker = self
            .player(actor)
            .ok_or(ActionError::UnknownPlayer)?;
        if !blocker.alive {
            return Err(ActionError::NotYourCall);
        }
        if actor == &original {
            return Err(ActionError::SelfBlock);
        }

        let blocker_nickname = blocker.nickname.clone();
        let original_nickname = self.nickname(&original);
        self.pending_block = None;
        self.banner = format!(
            "{blocker_nickname} claims Vladimir to block — {original_nickname} may challenge ({}s)",
            self.timings.challenge.as_secs()
        );
        self.push_log(format!(
            "{blocker_nickname} claims Vladimir to block the 2 coins"
        ));
        Ok(self.open_challenge(
            ClaimOrigin::Block {
                block: BlockKind::TakeTwo,
                claimant: actor.clone(),
                actor: original.clone(),
                target: None,
            },
            Champion::Vladimir,
            Some(original),
            None,
        ))
    }

    fn block_akali(
        &mut self,
        actor: &PlayerId,
    ) -> Result<Vec<Notice>, ActionError> {
        if self.phase != Phase::AwaitBlockAkali {
            return Err(ActionError::WrongPhase);
        }
        let Some(PendingBlock::Akali { actor: attacker, target }) =
            &self.pending_block
        else {
            return Err(ActionError::WrongPhase);
        };
        if target != actor {
            return Err(ActionError::NotYourCall);
        }
        let attacker = attacker.clone();
        let target = target.clone();

        let target_nickname = self.nickname(&target);
        let attacker_nickname = self.nickname(&attacker);
        self.pending_block = None;
        self.banner = format!(
            "{target_nickname} claims Braum to defend — {attacker_nickname} may challenge ({}s)",
            self.timings.challenge.as_secs()
        );
        self.push_log(format!(
            "{target_nickname} claims Braum to defend"
        ));
        Ok(self.open_challenge(
            ClaimOrigin::Block {
                block: BlockKind::Akali,
                claimant: target.clone(),
                actor: attacker.clone(),
                target: Some(target),
            },
            Champion::Braum,
            Some(attacker),
            None,
        ))
    }

    fn steal_response(
        &mut self,
        actor: &PlayerId,
        choice: StealResponseChoice,
    ) -> Result<Vec<Notice>, ActionError> {
        if self.phase != Phase::AwaitGarenResponse {
            return Err(ActionError::WrongPhase);
        }
        let Some(pending) = &self.pending_steal else {
            return Err(ActionError::WrongPhase);
        };
        if &pending.target != actor {
            return Err(ActionError::NotYourCall);
        }
        let garen_actor = pending.actor.clone();
        let target = pending.target.clone();
        self.pending_steal = None;

        let actor_nickname = self.nickname(&garen_actor);
        let target_nickname = self.nickname(&target);

        match choice {
            StealResponseChoice::Challenge => {
                self.banner = format!(
                    "{target_nickname} challenges — {actor_nickname} must prove Garen ({}s)",
                    self.timings.proof.as_secs()
                );
                self.push_log(format!(
                    "{target_nickname} challenges the Garen claim"
                ));
                Ok(self.open_challenge(
                    ClaimOrigin::Skill {
                        skill: SkillKind::Garen,
                        actor: garen_actor,
                        target: Some(target.clone()),
                    },
                    Champion::Garen,
                    None,
                    Some(target),
                ))
            }
            StealResponseChoice::BlockAsGaren
            | StealResponseChoice::BlockAsTwistedFate => {
                let claim = match choice {
                    StealResponseChoice::BlockAsGaren => Champion::Garen,
                    _ => Champion::TwistedFate,
                };
                self.banner = format!(
                    "{target_nickname} claims {claim} to block the steal — {actor_nickname} may challenge ({}s)",
                    self.timings.challenge.as_secs()
                );
                self.push_log(format!(
                    "{target_nickname} claims {claim} to block the steal"
                ));
                Ok(self.open_challenge(
                    ClaimOrigin::Block {
                        block: BlockKind::GarenSteal,
                        claimant: target.clone(),
                        actor: garen_actor.clone(),
                        target: Some(target),
                    },
                    claim,
                    Some(garen_actor),
                    None,
                ))
            }
        }
    }

    fn swap_card(
        &mut self,
        actor: &PlayerId,
        card_id: CardId,
    ) -> Result<Vec<Notice>, ActionError> {
        if self.phase != Phase::AwaitTfDiscard {
            return Err(ActionError::WrongPhase);
        }
        let Some(pending) = &self.pending_swap else {
            return Err(ActionError::WrongPhase);
        };
        if &pending.actor != actor {
            return Err(ActionError::NotYourCall);
        }
        let actor_id = pending.actor.clone();

        // A caster who died or emptied their hand mid-window forfeits the
        // swap and play moves on.
        if self
            .player(&actor_id)
            .is_none_or(|p| !p.alive || p.hand.is_empty())
        {
            self.banner.clear();
            self.pending_swap = None;
            self.advance_turn();
            return Ok(Vec::new());
        }

        let idx = self
            .player(&actor_id)
            .and_then(|p| p.hand.iter().position(|c| c.id == card_id))
            .ok_or(ActionError::CardNotFound)?;
        let card = match self.player_mut(&actor_id) {
            Some(p) => p.hand.remove(idx),
            None => return Err(ActionError::CardNotFound),
        };
        self.return_to_deck(card);
        if let Some(card) = self.draw_one() {
            if let Some(p) = self.player_mut(&actor_id) {
                p.hand.push(card);
            }
        }

        let nickname = self.nickname(&actor_id);
        self.push_log(format!(
            "{nickname} swapped one card with the deck"
        ));
        self.banner.clear();
        self.pending_swap = None;
        self.advance_turn();
        Ok(Vec::new())
    }

    // -- Window openers shared with the challenge pipeline ----------------

    /// Opens the kill-choice window: `target` must pick a discard. Also
    /// sends the private prompt, since the broadcast alone may race it.
    pub(crate) fn open_execution(
        &mut self,
        by: PlayerId,
        target: PlayerId,
    ) -> Vec<Notice> {
        self.phase = Phase::AwaitKillChoice;
        let window = self.timings.kill_choice;
        self.arm(window);
        let by_nickname = self.nickname(&by);
        let target_nickname = self.nickname(&target);
        self.banner = format!(
            "{by_nickname} strikes {target_nickname} — picking a card to discard ({}s)",
            window.as_secs()
        );
        let cards: Vec<CardBrief> = self
            .player(&target)
            .map(|p| {
                p.hand
                    .iter()
                    .map(|c| CardBrief {
                        id: c.id,
                        champion: c.champion,
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.pending_kill = Some(PendingKill {
            by,
            target: target.clone(),
        });
        vec![(target, Event::KillPrompt { cards })]
    }

    /// Opens the Twisted Fate swap window for `actor`.
    pub(crate) fn open_swap(&mut self, actor: PlayerId) -> Vec<Notice> {
        self.phase = Phase::AwaitTfDiscard;
        let window = self.timings.tf_swap;
        self.arm(window);
        let nickname = self.nickname(&actor);
        self.banner = format!(
            "{nickname} is choosing a card to swap ({}s)",
            window.as_secs()
        );
        self.pending_swap = Some(PendingSwap { actor });
        Vec::new()
    }

    /// Opens the Braum defense window: only `target` may claim the block.
    pub(crate) fn open_block_akali(
        &mut self,
        actor: PlayerId,
        target: PlayerId,
    ) -> Vec<Notice> {
        self.phase = Phase::AwaitBlockAkali;
        let window = self.timings.block_akali;
        self.arm(window);
        let actor_nickname = self.nickname(&actor);
        let target_nickname = self.nickname(&target);
        self.banner = format!(
            "{actor_nickname} strikes {target_nickname} with Akali — Braum may defend ({}s)",
            window.as_secs()
        );
        self.pending_block = Some(PendingBlock::Akali { actor, target });
        Vec::new()
    }

    /// Transfers up to [`STEAL_MAX`] coins from `target` to `actor`.
    pub(crate) fn steal_coins(
        &mut self,
        actor: &PlayerId,
        target: &PlayerId,
    ) -> u32 {
        let amount = self
            .player(target)
            .map(|p| p.coins.min(STEAL_MAX))
            .unwrap_or(0);
        if let Some(target) = self.player_mut(target) {
            target.coins -= amount;
        }
        if let Some(actor) = self.player_mut(actor) {
            actor.coins += amount;
        }
        amount
    }

    // -- Deadline defaults for ability windows ----------------------------

    fn on_kill_choice_expired(&mut self) -> Vec<Notice> {
        let Some(pending) = self.pending_kill.take() else {
            self.advance_turn();
            return Vec::new();
        };
        self.banner.clear();

        let hand_len = self
            .player(&pending.target)
            .map(|p| p.hand.len())
            .unwrap_or(0);
        if hand_len == 0 || self.player(&pending.by).is_none() {
            if self.maybe_end() {
                return Vec::new();
            }
            self.advance_turn();
            return Vec::new();
        }

        let idx = rand::rng().random_range(0..hand_len);
        if let Some(card) = self
            .player_mut(&pending.target)
            .map(|p| p.hand.remove(idx))
        {
            self.return_to_deck(card);
        }
        let nickname = self.nickname(&pending.target);
        self.push_log(format!(
            "{nickname} ran out of time — a random card was discarded"
        ));
        let notices =
            vec![(pending.target.clone(), Event::KillPromptClosed)];

        self.check_elimination(&pending.target);
        if self.maybe_end() {
            return notices;
        }
        self.advance_turn();
        notices
    }

    fn on_block_take2_expired(&mut self) {
        let Some(PendingBlock::TakeTwo { actor }) =
            self.pending_block.take()
        else {
            self.advance_turn();
            return;
        };
        self.banner.clear();
        if self.player(&actor).is_some_and(|p| p.alive) {
            if let Some(player) = self.player_mut(&actor) {
                player.coins += TAKE_TWO_GAIN;
            }
            let nickname = self.nickname(&actor);
            self.push_log(format!(
                "no block — {nickname} takes {TAKE_TWO_GAIN} coins"
            ));
        }
        self.advance_turn();
    }

    fn on_block_akali_expired(&mut self) -> Vec<Notice> {
        let Some(PendingBlock::Akali { actor, target }) =
            self.pending_block.take()
        else {
            self.advance_turn();
            return Vec::new();
        };
        self.banner.clear();
        if !self.is_live_target(&actor) || !self.is_live_target(&target) {
            self.advance_turn();
            return Vec::new();
        }
        self.push_log("no defense — the Akali strike lands");
        self.open_execution(actor, target)
    }

    fn on_swap_expired(&mut self) {
        let Some(pending) = self.pending_swap.take() else {
            self.advance_turn();
            return;
        };
        self.banner.clear();

        let hand_len = self
            .player(&pending.actor)
            .filter(|p| p.alive)
            .map(|p| p.hand.len())
            .unwrap_or(0);
        if hand_len == 0 {
            self.advance_turn();
            return;
        }

        let idx = rand::rng().random_range(0..hand_len);
        if let Some(card) = self
            .player_mut(&pending.actor)
            .map(|p| p.hand.remove(idx))
        {
            self.return_to_deck(card);
        }
        if let Some(card) = self.draw_one() {
            if let Some(p) = self.player_mut(&pending.actor) {
                p.hand.push(card);
            }
        }
        let nickname = self.nickname(&pending.actor);
        self.push_log(format!(
            "{nickname} ran out of time — swapped a random card"
        ));
        self.advance_turn();
    }

    fn on_steal_response_expired(&mut self) {
        let Some(pending) = self.pending_steal.take() else {
            self.advance_turn();
            return;
        };
        self.banner.clear();
        if !self.is_live_target(&pending.actor)
            || !self.is_live_target(&pending.target)
        {
            self.advance_turn();
            return;
        }

        let amount = self.steal_coins(&pending.actor, &pending.target);
        let actor_nickname = self.nickname(&pending.actor);
        let target_nickname = self.nickname(&pending.target);
        self.push_log(format!(
            "no response — {actor_nickname} steals {amount} coins from {target_nickname}"
        ));
        self.advance_turn();
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fire, lobby, pid, rig, total_cards};

    // =====================================================================
    // Authority tracks
    // =====================================================================

    #[test]
    fn test_submit_rejects_before_start() {
        let mut game = lobby(&["a", "b"]);
        let result = game.submit(&pid("a"), Intent::TakeOne);
        assert_eq!(result, Err(ActionError::NotStarted));
    }

    #[test]
    fn test_submit_rejects_out_of_turn_actor() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        let result = game.submit(&pid("b"), Intent::TakeOne);
        assert_eq!(result, Err(ActionError::NotYourTurn));
        assert_eq!(game.player(&pid("b")).unwrap().coins, 0);
    }

    #[test]
    fn test_submit_rejects_everything_after_finish() {
        let mut game = rig(&[
            ("a", &[Champion::Braum]),
            ("b", &[Champion::Akali]),
        ]);
        game.player_mut(&pid("b")).unwrap().alive = false;
        assert!(game.maybe_end());

        for intent in [
            Intent::TakeOne,
            Intent::Challenge,
            Intent::ChooseKillCard { card_id: CardId(1) },
        ] {
            assert_eq!(
                game.submit(&pid("a"), intent),
                Err(ActionError::GameOver)
            );
        }
    }

    #[test]
    fn test_phase_scoped_intent_rejected_in_action_phase() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        let result = game.submit(&pid("a"), Intent::Challenge);
        assert_eq!(result, Err(ActionError::WrongPhase));
    }

    // =====================================================================
    // Take 1 / Take 2
    // =====================================================================

    #[test]
    fn test_take_one_grants_coin_and_ends_turn() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.submit(&pid("a"), Intent::TakeOne).unwrap();
        assert_eq!(game.player(&pid("a")).unwrap().coins, 1);
        assert_eq!(game.turn_index, 1);
        assert_eq!(game.phase, Phase::Action);
    }

    #[test]
    fn test_take_two_opens_block_window_without_paying_yet() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.submit(&pid("a"), Intent::TakeTwo).unwrap();
        assert_eq!(game.phase, Phase::AwaitBlockTake2);
        assert_eq!(game.player(&pid("a")).unwrap().coins, 0);
        assert!(matches!(
            game.pending_block,
            Some(PendingBlock::TakeTwo { .. })
        ));
    }

    #[test]
    fn test_take_two_pays_out_on_unblocked_deadline() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.submit(&pid("a"), Intent::TakeTwo).unwrap();
        fire(&mut game);

        assert_eq!(game.player(&pid("a")).unwrap().coins, 2);
        assert_eq!(game.phase, Phase::Action);
        assert_eq!(game.turn_index, 1);
        assert!(game.pending_block.is_none());
    }

    // =====================================================================
    // Execute
    // =====================================================================

    #[test]
    fn test_execute_requires_seven_coins() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("a")).unwrap().coins = 6;
        let result = game.submit(
            &pid("a"),
            Intent::Execute {
                target_id: pid("b"),
            },
        );
        assert_eq!(
            result,
            Err(ActionError::InsufficientCoins { needed: 7 })
        );
        assert_eq!(game.phase, Phase::Action);
    }

    #[test]
    fn test_execute_rejects_dead_target() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
            ("c", &[Champion::Garen, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("b")).unwrap().alive = false;
        game.player_mut(&pid("a")).unwrap().coins = 7;
        let result = game.submit(
            &pid("a"),
            Intent::Execute {
                target_id: pid("b"),
            },
        );
        assert_eq!(result, Err(ActionError::InvalidTarget));
    }

    #[test]
    fn test_execute_opens_kill_choice_with_private_prompt() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("a")).unwrap().coins = 7;
        let notices = game
            .submit(
                &pid("a"),
                Intent::Execute {
                    target_id: pid("b"),
                },
            )
            .unwrap();

        assert_eq!(game.player(&pid("a")).unwrap().coins, 0);
        assert_eq!(game.phase, Phase::AwaitKillChoice);
        assert_eq!(notices.len(), 1);
        let (to, event) = &notices[0];
        assert_eq!(to, &pid("b"));
        assert!(
            matches!(event, Event::KillPrompt { cards } if cards.len() == 2)
        );
    }

    #[test]
    fn test_kill_choice_discards_chosen_card() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("a")).unwrap().coins = 7;
        game.submit(
            &pid("a"),
            Intent::Execute {
                target_id: pid("b"),
            },
        )
        .unwrap();

        let card_id = game.player(&pid("b")).unwrap().hand[0].id;
        let notices = game
            .submit(&pid("b"), Intent::ChooseKillCard { card_id })
            .unwrap();

        assert_eq!(game.player(&pid("b")).unwrap().hand.len(), 1);
        assert!(
            notices
                .iter()
                .any(|(to, e)| to == &pid("b")
                    && matches!(e, Event::KillPromptClosed))
        );
        assert_eq!(game.phase, Phase::Action);
        assert_eq!(total_cards(&game), 15);
    }

    #[test]
    fn test_kill_choice_rejects_non_target_chooser() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("a")).unwrap().coins = 7;
        game.submit(
            &pid("a"),
            Intent::Execute {
                target_id: pid("b"),
            },
        )
        .unwrap();

        let card_id = game.player(&pid("b")).unwrap().hand[0].id;
        let result =
            game.submit(&pid("a"), Intent::ChooseKillCard { card_id });
        assert_eq!(result, Err(ActionError::NotYourCall));
        assert_eq!(game.player(&pid("b")).unwrap().hand.len(), 2);
    }

    #[test]
    fn test_kill_choice_deadline_discards_random_card() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("a")).unwrap().coins = 7;
        game.submit(
            &pid("a"),
            Intent::Execute {
                target_id: pid("b"),
            },
        )
        .unwrap();

        let notices = fire(&mut game);
        assert_eq!(game.player(&pid("b")).unwrap().hand.len(), 1);
        assert!(
            notices
                .iter()
                .any(|(_, e)| matches!(e, Event::KillPromptClosed))
        );
        assert_eq!(game.phase, Phase::Action);
        assert_eq!(total_cards(&game), 15);
    }

    #[test]
    fn test_execution_of_last_card_eliminates_and_ends_game() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali]),
        ]);
        game.player_mut(&pid("a")).unwrap().coins = 7;
        game.submit(
            &pid("a"),
            Intent::Execute {
                target_id: pid("b"),
            },
        )
        .unwrap();
        let card_id = game.player(&pid("b")).unwrap().hand[0].id;
        game.submit(&pid("b"), Intent::ChooseKillCard { card_id })
            .unwrap();

        assert!(!game.player(&pid("b")).unwrap().alive);
        assert_eq!(game.phase, Phase::Finished);
        assert_eq!(game.winner, Some(pid("a")));
    }

    // =====================================================================
    // Revive
    // =====================================================================

    #[test]
    fn test_revive_draws_one_and_ends_turn() {
        let mut game = rig(&[
            ("a", &[Champion::Braum]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("a")).unwrap().coins = 10;
        game.submit(&pid("a"), Intent::Revive).unwrap();

        let a = game.player(&pid("a")).unwrap();
        assert_eq!(a.coins, 0);
        assert_eq!(a.hand.len(), 2);
        assert_eq!(game.turn_index, 1);
        assert_eq!(total_cards(&game), 15);
    }

    #[test]
    fn test_revive_requires_exactly_one_card() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("a")).unwrap().coins = 10;
        let result = game.submit(&pid("a"), Intent::Revive);
        assert_eq!(result, Err(ActionError::ReviveHandSize));
    }

    // =====================================================================
    // Skill preconditions
    // =====================================================================

    #[test]
    fn test_garen_rejects_self_target() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        let result = game.submit(
            &pid("a"),
            Intent::UseSkill {
                skill: SkillKind::Garen,
                target_id: Some(pid("a")),
            },
        );
        assert_eq!(result, Err(ActionError::SelfTarget));
    }

    #[test]
    fn test_akali_requires_three_coins() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("a")).unwrap().coins = 2;
        let result = game.submit(
            &pid("a"),
            Intent::UseSkill {
                skill: SkillKind::Akali,
                target_id: Some(pid("b")),
            },
        );
        assert_eq!(
            result,
            Err(ActionError::InsufficientCoins { needed: 3 })
        );
    }

    #[test]
    fn test_twisted_fate_requires_cards_in_hand() {
        let mut game = rig(&[
            ("a", &[]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        // Keep a alive despite the empty hand for the precondition check.
        game.player_mut(&pid("a")).unwrap().alive = true;
        let result = game.submit(
            &pid("a"),
            Intent::UseSkill {
                skill: SkillKind::TwistedFate,
                target_id: None,
            },
        );
        assert_eq!(result, Err(ActionError::HandEmpty));
    }

    // =====================================================================
    // Garen response window
    // =====================================================================

    #[test]
    fn test_garen_declaration_opens_response_window() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.submit(
            &pid("a"),
            Intent::UseSkill {
                skill: SkillKind::Garen,
                target_id: Some(pid("b")),
            },
        )
        .unwrap();

        assert_eq!(game.phase, Phase::AwaitGarenResponse);
        assert_eq!(
            game.pending_steal,
            Some(PendingSteal {
                actor: pid("a"),
                target: pid("b"),
            })
        );
    }

    #[test]
    fn test_garen_response_deadline_completes_the_steal() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.player_mut(&pid("b")).unwrap().coins = 1;
        game.submit(
            &pid("a"),
            Intent::UseSkill {
                skill: SkillKind::Garen,
                target_id: Some(pid("b")),
            },
        )
        .unwrap();
        fire(&mut game);

        // Steal is capped by what the target has.
        assert_eq!(game.player(&pid("a")).unwrap().coins, 1);
        assert_eq!(game.player(&pid("b")).unwrap().coins, 0);
        assert_eq!(game.phase, Phase::Action);
    }

    #[test]
    fn test_garen_response_rejects_non_target() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
            ("c", &[Champion::Garen, Champion::Vladimir]),
        ]);
        game.submit(
            &pid("a"),
            Intent::UseSkill {
                skill: SkillKind::Garen,
                target_id: Some(pid("b")),
            },
        )
        .unwrap();

        let result = game.submit(
            &pid("c"),
            Intent::StealResponse {
                choice: StealResponseChoice::Challenge,
            },
        );
        assert_eq!(result, Err(ActionError::NotYourCall));
    }

    // =====================================================================
    // Twisted Fate swap window
    // =====================================================================

    #[test]
    fn test_swap_exchanges_card_and_keeps_hand_size() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.submit(
            &pid("a"),
            Intent::UseSkill {
                skill: SkillKind::TwistedFate,
                target_id: None,
            },
        )
        .unwrap();
        // Nobody challenges.
        fire(&mut game);
        assert_eq!(game.phase, Phase::AwaitTfDiscard);

        let card_id = game.player(&pid("a")).unwrap().hand[0].id;
        game.submit(&pid("a"), Intent::SwapCard { card_id }).unwrap();

        let a = game.player(&pid("a")).unwrap();
        assert_eq!(a.hand.len(), 2);
        assert!(a.hand.iter().all(|c| c.id != card_id));
        assert_eq!(game.phase, Phase::Action);
        assert_eq!(total_cards(&game), 15);
    }

    #[test]
    fn test_swap_deadline_swaps_random_card() {
        let mut game = rig(&[
            ("a", &[Champion::Braum, Champion::Garen]),
            ("b", &[Champion::Akali, Champion::Vladimir]),
        ]);
        game.submit(
            &pid("a"),
            Intent::UseSkill {
                skill: SkillKind::TwistedFate,
                target_id: None,
            },
        )
        .unwrap();
        fire(&mut game); // challenge window closes
        fire(&mut game); // swap window times out

        assert_eq!(game.player(&pid("a")).unwrap().hand.len(), 2);
        assert_eq!(game.phase, Phase::Action);
        assert_eq!(total_cards(&game), 15);
    }
}
