//! The card catalog and deck construction.
//!
//! The deck is fixed: three copies of each of the five champions, fifteen
//! cards total. Cards never leave the game — everything removed from a hand
//! goes back into the deck, which is reshuffled on every return so reveal
//! order leaks nothing.

use gambit_protocol::{CardId, Champion};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Copies of each champion in a fresh deck.
pub const COPIES_PER_CHAMPION: usize = 3;

/// Total cards in a fresh deck.
pub const DECK_SIZE: usize = COPIES_PER_CHAMPION * Champion::ALL.len();

/// One physical card. Fungible within its champion type; the id only
/// matters for "this exact card is in that hand".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub champion: Champion,
}

impl Card {
    pub fn new(champion: Champion) -> Self {
        Self {
            id: CardId(rand::rng().random()),
            champion,
        }
    }
}

/// Builds a freshly shuffled fifteen-card deck with new card identities.
pub fn build_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for champion in Champion::ALL {
        for _ in 0..COPIES_PER_CHAMPION {
            deck.push(Card::new(champion));
        }
    }
    shuffle(&mut deck);
    deck
}

/// Unbiased in-place shuffle. Used for the initial deck and again whenever
/// any card returns to it.
pub fn shuffle<T>(items: &mut [T]) {
    items.shuffle(&mut rand::rng());
}
