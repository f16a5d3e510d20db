//! Error types for the game engine.

/// Why a submitted action was rejected. The message is what the offending
/// player sees; rejections never mutate state and are never broadcast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    // -- Authorization: wrong actor, wrong phase, wrong role --
    #[error("the game is over")]
    GameOver,

    #[error("the game has not started yet")]
    NotStarted,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("that action is not available right now")]
    WrongPhase,

    #[error("you are not the player who must respond")]
    NotYourCall,

    #[error("you cannot challenge your own claim")]
    SelfChallenge,

    #[error("a challenge was already accepted")]
    ChallengeTaken,

    #[error("only the host can start the game")]
    NotHost,

    // -- Preconditions: resources and eligibility --
    #[error("not enough coins (need {needed})")]
    InsufficientCoins { needed: u32 },

    #[error("invalid target")]
    InvalidTarget,

    #[error("you cannot target yourself")]
    SelfTarget,

    #[error("you cannot block your own action")]
    SelfBlock,

    #[error("that player has no cards")]
    TargetHandEmpty,

    #[error("your hand is empty")]
    HandEmpty,

    #[error("you need exactly one card in hand to do that")]
    ReviveHandSize,

    #[error("the deck is empty")]
    DeckEmpty,

    #[error("at least {0} players are needed to start")]
    TooFewPlayers(usize),

    #[error("the game is already running")]
    AlreadyStarted,

    // -- Not found --
    #[error("that card is not in the hand")]
    CardNotFound,

    #[error("unknown player")]
    UnknownPlayer,
}

/// Why a join attempt was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    #[error("the room is full")]
    RoomFull,

    #[error("the game is already in progress")]
    InProgress,
}
