//! Shared fixtures for the engine's unit tests.
//!
//! Deadline-driven behavior is tested without sleeping: every armed window
//! exposes its sequence token, so a test "expires" it by calling
//! `deadline_elapsed` directly. Hands are stacked explicitly when a test
//! needs to control what a reveal can show; the rest of the catalog goes
//! into the deck so conservation checks stay exact.

use std::collections::HashMap;

use gambit_protocol::{CardId, Champion, PlayerId, RoomCode};

use crate::card::{self, COPIES_PER_CHAMPION, Card};
use crate::event::Notice;
use crate::state::{Game, Phase, Timings};

pub(crate) fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

/// A room in the lobby with the given players joined (first is host).
pub(crate) fn lobby(names: &[&str]) -> Game {
    let mut game = Game::new(RoomCode::new("123456"), Timings::default());
    for name in names {
        game.join(pid(name), name.to_string())
            .expect("fixture join should succeed");
    }
    game
}

/// A started game with stacked hands. Each seat gets exactly the listed
/// champions (ids are sequential); every other card of the fifteen-card
/// catalog goes into the deck, so `total_cards` is 15 from the start.
/// Turn order follows the seat order, starting at the first seat.
pub(crate) fn rig(seats: &[(&str, &[Champion])]) -> Game {
    let names: Vec<&str> = seats.iter().map(|(n, _)| *n).collect();
    let mut game = lobby(&names);

    let mut remaining: HashMap<Champion, usize> = Champion::ALL
        .into_iter()
        .map(|c| (c, COPIES_PER_CHAMPION))
        .collect();
    let mut next_id = 1u64;

    for (name, hand) in seats {
        let mut cards = Vec::with_capacity(hand.len());
        for champion in *hand {
            cards.push(Card {
                id: CardId(next_id),
                champion: *champion,
            });
            next_id += 1;
            let left = remaining
                .get_mut(champion)
                .expect("champion is in the catalog");
            assert!(*left > 0, "fixture uses more than 3 copies of {champion}");
            *left -= 1;
        }
        let player = game
            .player_mut(&pid(name))
            .expect("fixture seat exists");
        player.hand = cards;
        player.alive = !player.hand.is_empty();
    }

    let mut deck = Vec::new();
    for (champion, count) in remaining {
        for _ in 0..count {
            deck.push(Card {
                id: CardId(next_id),
                champion,
            });
            next_id += 1;
        }
    }
    card::shuffle(&mut deck);
    game.deck = deck;

    game.started = true;
    game.phase = Phase::Action;
    game.turn_index = 0;
    let turn = game.timings.turn;
    game.arm(turn);
    game
}

/// Total cards across deck, discard, and every hand — must always be 15
/// once a game is underway.
pub(crate) fn total_cards(game: &Game) -> usize {
    game.deck.len()
        + game.discard.len()
        + game.players.iter().map(|p| p.hand.len()).sum::<usize>()
}

/// Expires the currently armed deadline and asserts it was live.
pub(crate) fn fire(game: &mut Game) -> Vec<Notice> {
    let armed = game.armed().expect("a deadline should be armed");
    game.deadline_elapsed(armed.seq)
        .expect("the armed deadline should be live")
}
