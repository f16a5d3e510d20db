//! The shared bluffing pipeline: challenge window → proof window → loss
//! window → per-origin finalization.
//!
//! Every claim in the game — the four declarable skills and the three block
//! counter-claims — funnels through this one state machine. Only
//! [`Game::finalize`] branches on where the claim came from; everything
//! before it is origin-agnostic. A proof that matches the claim upholds it
//! and costs the challenger one card; a failed proof rejects the claim and
//! the revealed card, returned without replacement, is the claimant's
//! penalty.

use gambit_protocol::{CardId, Champion, PlayerId, SkillKind};
use rand::Rng;

use crate::dispatch::{TAKE_TWO_GAIN, VLADIMIR_GAIN};
use crate::error::ActionError;
use crate::event::Notice;
use crate::state::{
    BlockKind, ClaimOrigin, Game, PendingChallenge, PendingLoss,
    PendingProof, Phase,
};

/// How a resolved claim came out. Consumed by the per-origin resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The claim stood: uncontested, or proven under challenge.
    Upheld,
    /// The claim was caught: the claimant failed to prove it.
    Rejected,
}

impl Game {
    /// Opens a challenge window over `origin`. With `pre_chosen` set the
    /// window is skipped entirely and that player is seated as challenger —
    /// used when a response flow already produced the challenger.
    pub(crate) fn open_challenge(
        &mut self,
        origin: ClaimOrigin,
        claim: Champion,
        allowed_challenger: Option<PlayerId>,
        pre_chosen: Option<PlayerId>,
    ) -> Vec<Notice> {
        let claimant = origin.claimant().clone();
        let straight_to_proof = pre_chosen.is_some();
        self.pending_challenge = Some(PendingChallenge {
            origin,
            claim,
            allowed_challenger,
            challenger: pre_chosen,
        });
        if straight_to_proof {
            return self.open_proof(claimant, claim);
        }
        self.phase = Phase::AwaitChallenge;
        let window = self.timings.challenge;
        self.arm(window);
        Vec::new()
    }

    fn open_proof(
        &mut self,
        claimant: PlayerId,
        claim: Champion,
    ) -> Vec<Notice> {
        let window = self.timings.proof;
        let nickname = self.nickname(&claimant);
        self.banner = format!(
            "{nickname} must reveal {claim} to prove the claim ({}s)",
            window.as_secs()
        );
        self.pending_proof = Some(PendingProof { claimant, claim });
        self.phase = Phase::AwaitProof;
        self.arm(window);
        Vec::new()
    }

    /// A player accepts the open challenge window. First come, first
    /// served; eligibility honours `allowed_challenger` when set.
    pub(crate) fn accept_challenge(
        &mut self,
        actor: &PlayerId,
    ) -> Result<Vec<Notice>, ActionError> {
        if self.phase != Phase::AwaitChallenge {
            // A race loser: the first challenger was already seated and
            // the pipeline moved on to proof (or loss).
            if matches!(self.phase, Phase::AwaitProof | Phase::AwaitLoseOne)
                && self
                    .pending_challenge
                    .as_ref()
                    .is_some_and(|pc| pc.challenger.is_some())
            {
                return Err(ActionError::ChallengeTaken);
            }
            return Err(ActionError::WrongPhase);
        }
        let Some(pending) = &self.pending_challenge else {
            return Err(ActionError::WrongPhase);
        };
        let challenger = self
            .player(actor)
            .ok_or(ActionError::UnknownPlayer)?;
        if !challenger.alive {
            return Err(ActionError::NotYourCall);
        }
        if let Some(allowed) = &pending.allowed_challenger {
            if allowed != actor {
                return Err(ActionError::NotYourCall);
            }
        } else if pending.origin.claimant() == actor {
            return Err(ActionError::SelfChallenge);
        }
        if pending.challenger.is_some() {
            return Err(ActionError::ChallengeTaken);
        }

        let claim = pending.claim;
        let claimant = pending.origin.claimant().clone();
        if let Some(pending) = &mut self.pending_challenge {
            pending.challenger = Some(actor.clone());
        }
        let challenger_nickname = self.nickname(actor);
        let claimant_nickname = self.nickname(&claimant);
        self.push_log(format!(
            "{challenger_nickname} challenges — {claimant_nickname} must prove {claim}"
        ));
        Ok(self.open_proof(claimant, claim))
    }

    /// The claimant reveals a specific card as proof.
    pub(crate) fn reveal_proof(
        &mut self,
        actor: &PlayerId,
        card_id: CardId,
    ) -> Result<Vec<Notice>, ActionError> {
        if self.phase != Phase::AwaitProof {
            return Err(ActionError::WrongPhase);
        }
        let Some(pending) = &self.pending_proof else {
            return Err(ActionError::WrongPhase);
        };
        if &pending.claimant != actor {
            return Err(ActionError::NotYourCall);
        }
        let claimant = pending.claimant.clone();
        let claim = pending.claim;
        let idx = self
            .player(&claimant)
            .and_then(|p| p.hand.iter().position(|c| c.id == card_id))
            .ok_or(ActionError::CardNotFound)?;
        Ok(self.resolve_reveal(claimant, claim, idx))
    }

    /// Reveals the card at `idx`, settles the proof, and routes into the
    /// loss window or finalization. The revealed card always returns to the
    /// deck (reshuffled); only a successful proof draws a replacement.
    fn resolve_reveal(
        &mut self,
        claimant: PlayerId,
        claim: Champion,
        idx: usize,
    ) -> Vec<Notice> {
        let Some(player) = self.player_mut(&claimant) else {
            return Vec::new();
        };
        if idx >= player.hand.len() {
            return Vec::new();
        }
        let card = player.hand.remove(idx);
        let revealed = card.champion;
        let success = revealed == claim;

        let nickname = self.nickname(&claimant);
        self.push_log(format!("{nickname} reveals {revealed}"));
        self.return_to_deck(card);
        if success {
            if let Some(card) = self.draw_one() {
                if let Some(player) = self.player_mut(&claimant) {
                    player.hand.push(card);
                }
            }
        }
        self.check_elimination(&claimant);
        self.pending_proof = None;
        if self.maybe_end() {
            return Vec::new();
        }

        if success {
            self.push_log(format!("the {claim} claim is proven"));
            let challenger = self
                .pending_challenge
                .as_ref()
                .and_then(|pc| pc.challenger.clone());
            match challenger {
                Some(challenger) => self.open_loss(challenger),
                None => self.finalize(ClaimOutcome::Upheld),
            }
        } else {
            self.push_log(format!(
                "{nickname} was bluffing — the {claim} claim is rejected"
            ));
            self.finalize(ClaimOutcome::Rejected)
        }
    }

    fn open_loss(&mut self, player: PlayerId) -> Vec<Notice> {
        let window = self.timings.loss;
        let nickname = self.nickname(&player);
        self.banner = format!(
            "{nickname} lost the challenge — picking a card to give up ({}s)",
            window.as_secs()
        );
        self.pending_loss = Some(PendingLoss { player });
        self.phase = Phase::AwaitLoseOne;
        self.arm(window);
        Vec::new()
    }

    /// The challenge loser discards a chosen card face-down.
    pub(crate) fn lose_card(
        &mut self,
        actor: &PlayerId,
        card_id: CardId,
    ) -> Result<Vec<Notice>, ActionError> {
        if self.phase != Phase::AwaitLoseOne {
            return Err(ActionError::WrongPhase);
        }
        let Some(pending) = &self.pending_loss else {
            return Err(ActionError::WrongPhase);
        };
        if &pending.player != actor {
            return Err(ActionError::NotYourCall);
        }
        let loser = pending.player.clone();
        let idx = self
            .player(&loser)
            .and_then(|p| p.hand.iter().position(|c| c.id == card_id))
            .ok_or(ActionError::CardNotFound)?;

        let card = match self.player_mut(&loser) {
            Some(p) => p.hand.remove(idx),
            None => return Err(ActionError::CardNotFound),
        };
        self.return_to_deck(card);
        let nickname = self.nickname(&loser);
        self.push_log(format!("{nickname} lost a card (face-down)"));
        self.check_elimination(&loser);
        self.pending_loss = None;
        self.banner.clear();
        if self.maybe_end() {
            return Ok(Vec::new());
        }
        Ok(self.finalize(ClaimOutcome::Upheld))
    }

    // -- Deadline defaults ------------------------------------------------

    /// No one challenged in time: the claim stands uncontested.
    pub(crate) fn on_challenge_expired(&mut self) -> Vec<Notice> {
        let Some(pending) = self.pending_challenge.take() else {
            self.advance_turn();
            return Vec::new();
        };
        self.push_log("no challenge — the claim stands");
        self.banner.clear();
        self.continue_uncontested(pending.origin)
    }

    /// The claimant never picked a proof card: reveal one at random, or
    /// treat an empty hand as automatic failure.
    pub(crate) fn on_proof_expired(&mut self) -> Vec<Notice> {
        let Some(pending) = self.pending_proof.clone() else {
            self.advance_turn();
            return Vec::new();
        };
        let hand_len = self
            .player(&pending.claimant)
            .filter(|p| p.alive)
            .map(|p| p.hand.len())
            .unwrap_or(0);
        if hand_len == 0 {
            self.push_log(
                "proof window expired with nothing to reveal — claim rejected",
            );
            self.pending_proof = None;
            return self.finalize(ClaimOutcome::Rejected);
        }
        let nickname = self.nickname(&pending.claimant);
        self.push_log(format!(
            "{nickname} ran out of time — revealing a random card"
        ));
        let idx = rand::rng().random_range(0..hand_len);
        self.resolve_reveal(pending.claimant, pending.claim, idx)
    }

    /// The loser never picked: remove one of their cards at random.
    pub(crate) fn on_loss_expired(&mut self) -> Vec<Notice> {
        let Some(pending) = self.pending_loss.take() else {
            self.advance_turn();
            return Vec::new();
        };
        let loser = pending.player;
        self.banner.clear();

        let hand_len = self
            .player(&loser)
            .filter(|p| p.alive)
            .map(|p| p.hand.len())
            .unwrap_or(0);
        if hand_len == 0 {
            self.check_elimination(&loser);
            if self.maybe_end() {
                return Vec::new();
            }
            return self.finalize(ClaimOutcome::Upheld);
        }

        let idx = rand::rng().random_range(0..hand_len);
        if let Some(card) =
            self.player_mut(&loser).map(|p| p.hand.remove(idx))
        {
            self.return_to_deck(card);
        }
        let nickname = self.nickname(&loser);
        self.push_log(format!(
            "{nickname} ran out of time — a random card was lost (face-down)"
        ));
        self.check_elimination(&loser);
        if self.maybe_end() {
            return Vec::new();
        }
        self.finalize(ClaimOutcome::Upheld)
    }

    // -- Resolution -------------------------------------------------------

    /// The claim was never contested: apply its standing outcome.
    fn continue_uncontested(&mut self, origin: ClaimOrigin) -> Vec<Notice> {
        match origin {
            ClaimOrigin::Skill { skill, actor, target } => {
                if !self.is_live_target(&actor) {
                    self.advance_turn();
                    return Vec::new();
                }
                match skill {
                    SkillKind::Vladimir => {
                        if let Some(player) = self.player_mut(&actor) {
                            player.coins += VLADIMIR_GAIN;
                        }
                        let nickname = self.nickname(&actor);
                        self.push_log(format!(
                            "{nickname} takes {VLADIMIR_GAIN} coins (Vladimir)"
                        ));
                        self.advance_turn();
                        Vec::new()
                    }
                    SkillKind::Garen => {
                        if let Some(target) = target
                            .filter(|t| self.is_live_target(t))
                        {
                            let amount =
                                self.steal_coins(&actor, &target);
                            let actor_nickname = self.nickname(&actor);
                            let target_nickname =
                                self.nickname(&target);
                            self.push_log(format!(
                                "{actor_nickname} steals {amount} coins from {target_nickname}"
                            ));
                        }
                        self.advance_turn();
                        Vec::new()
                    }
                    SkillKind::Akali => match target.filter(|t| {
                        self.player(t).is_some_and(|p| {
                            p.alive && !p.hand.is_empty()
                        })
                    }) {
                        Some(target) => {
                            self.open_block_akali(actor, target)
                        }
                        None => {
                            self.advance_turn();
                            Vec::new()
                        }
                    },
                    SkillKind::TwistedFate => self.open_swap(actor),
                }
            }
            ClaimOrigin::Block { block, .. } => {
                match block {
                    BlockKind::TakeTwo => {
                        self.push_log(
                            "the Vladimir block stands — no coins taken",
                        );
                    }
                    BlockKind::GarenSteal => {
                        self.push_log(
                            "the block stands — the steal is off",
                        );
                    }
                    BlockKind::Akali => {
                        self.push_log(
                            "the Braum defense stands — the strike is off",
                        );
                    }
                }
                self.advance_turn();
                Vec::new()
            }
        }
    }

    /// Settles the claim after the pipeline ran its course. Skill claims
    /// apply their effect when upheld and fizzle when rejected; block
    /// claims invert the polarity — upheld suppresses the original effect,
    /// rejected lets it proceed.
    pub(crate) fn finalize(&mut self, outcome: ClaimOutcome) -> Vec<Notice> {
        let Some(pending) = self.pending_challenge.take() else {
            self.advance_turn();
            return Vec::new();
        };
        let upheld = outcome == ClaimOutcome::Upheld;
        self.banner.clear();

        match pending.origin {
            ClaimOrigin::Skill { skill, actor, target } => {
                if !self.is_live_target(&actor) {
                    self.advance_turn();
                    return Vec::new();
                }
                match skill {
                    SkillKind::Vladimir => {
                        if upheld {
                            if let Some(player) = self.player_mut(&actor)
                            {
                                player.coins += VLADIMIR_GAIN;
                            }
                            let nickname = self.nickname(&actor);
                            self.push_log(format!(
                                "{nickname} takes {VLADIMIR_GAIN} coins (Vladimir)"
                            ));
                        } else {
                            self.push_log(
                                "the Vladimir claim fizzles — no coins",
                            );
                        }
                        self.advance_turn();
                        Vec::new()
                    }
                    SkillKind::Garen => {
                        let Some(target) = target
                            .filter(|t| self.is_live_target(t))
                        else {
                            self.advance_turn();
                            return Vec::new();
                        };
                        if upheld {
                            let amount =
                                self.steal_coins(&actor, &target);
                            let actor_nickname = self.nickname(&actor);
                            let target_nickname =
                                self.nickname(&target);
                            self.push_log(format!(
                                "{actor_nickname} steals {amount} coins from {target_nickname}"
                            ));
                        } else {
                            self.push_log(
                                "the Garen claim fizzles — the steal is off",
                            );
                        }
                        self.advance_turn();
                        Vec::new()
                    }
                    SkillKind::Akali => {
                        if !upheld {
                            self.push_log(
                                "the Akali claim fizzles — the strike is off",
                            );
                            self.advance_turn();
                            return Vec::new();
                        }
                        match target.filter(|t| {
                            self.player(t).is_some_and(|p| {
                                p.alive && !p.hand.is_empty()
                            })
                        }) {
                            Some(target) => {
                                self.open_block_akali(actor, target)
                            }
                            None => {
                                self.advance_turn();
                                Vec::new()
                            }
                        }
                    }
                    SkillKind::TwistedFate => {
                        if upheld {
                            self.open_swap(actor)
                        } else {
                            self.push_log(
                                "the Twisted Fate claim fizzles — no swap",
                            );
                            self.advance_turn();
                            Vec::new()
                        }
                    }
                }
            }

            ClaimOrigin::Block { block, actor, target, .. } => match block {
                BlockKind::TakeTwo => {
                    if self.is_live_target(&actor) {
                        if upheld {
                            self.push_log(
                                "the Vladimir block holds — no coins taken",
                            );
                        } else {
                            if let Some(player) = self.player_mut(&actor)
                            {
                                player.coins += TAKE_TWO_GAIN;
                            }
                            let nickname = self.nickname(&actor);
                            self.push_log(format!(
                                "the block was a bluff — {nickname} takes {TAKE_TWO_GAIN} coins"
                            ));
                        }
                    }
                    self.advance_turn();
                    Vec::new()
                }
                BlockKind::GarenSteal => {
                    let target_live = target
                        .as_ref()
                        .is_some_and(|t| self.is_live_target(t));
                    if self.is_live_target(&actor) && target_live {
                        if upheld {
                            self.push_log(
                                "the block holds — the steal is off",
                            );
                        } else if let Some(target) = &target {
                            let amount =
                                self.steal_coins(&actor, target);
                            let actor_nickname = self.nickname(&actor);
                            let target_nickname = self.nickname(target);
                            self.push_log(format!(
                                "the block was a bluff — {actor_nickname} steals {amount} coins from {target_nickname}"
                            ));
                        }
                    }
                    self.advance_turn();
                    Vec::new()
                }
                BlockKind::Akali => {
                    let Some(target) = target
                        .filter(|t| self.is_live_target(t))
                    else {
                        self.advance_turn();
                        return Vec::new();
                    };
                    if !self.is_live_target(&actor) {
                        self.advance_turn();
                        return Vec::new();
                    }
                    if upheld {
                        self.push_log(
                            "the Braum defense holds — the strike is off",
                        );
                        self.advance_turn();
                        Vec::new()
                    } else {
                        self.push_log(
                            "the defense was a bluff — the strike lands",
                        );
                        self.open_execution(actor, target)
                    }
                }
            },
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
