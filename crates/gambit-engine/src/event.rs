//! Server → client game events.
//!
//! The room actor broadcasts a full [`Event::State`] snapshot after every
//! mutation; the other variants are private notices delivered to exactly
//! one player. They ride the wire as `Payload::Game` bytes.

use gambit_protocol::{CardId, Champion, PlayerId};
use serde::{Deserialize, Serialize};

use crate::state::Game;

/// Just enough of a card to render a pick list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBrief {
    pub id: CardId,
    pub champion: Champion,
}

/// A game event for one or all clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Event {
    /// Full state snapshot, broadcast to the whole room.
    State { game: Box<Game> },

    /// Private to the execution target: pick a card to discard. Sent
    /// alongside the broadcast because the snapshot alone may race the
    /// prompt.
    KillPrompt { cards: Vec<CardBrief> },

    /// Private to the execution target: the discard window resolved, by
    /// choice or by timeout.
    KillPromptClosed,

    /// Private to the requester: the action was rejected.
    ActionRejected { reason: String },
}

/// A private notice: deliver `event` to exactly `player`.
pub type Notice = (PlayerId, Event);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_prompt_json_format() {
        let event = Event::KillPrompt {
            cards: vec![CardBrief {
                id: CardId(9),
                champion: Champion::Braum,
            }],
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "KillPrompt");
        assert_eq!(json["cards"][0]["id"], 9);
        assert_eq!(json["cards"][0]["champion"], "Braum");
    }

    #[test]
    fn test_action_rejected_round_trip() {
        let event = Event::ActionRejected {
            reason: "it is not your turn".into(),
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let back: Event = serde_json::from_slice(&bytes).unwrap();
        assert!(
            matches!(back, Event::ActionRejected { reason } if reason.contains("turn"))
        );
    }
}
