// ═══════════════════════════════════════════════════════════════════════
// Errors — refused actions, selections, turns and wire messages
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{Action, Side};
use thiserror::Error;

/// Why a single action was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("there is no one to move")]
    NothingToMove,
    #[error("the target cell is off the board")]
    OffBoard,
    #[error("cannot move on a cell that is not free")]
    DestinationOccupied,
    #[error("the king cannot move on a roof")]
    KingOnRoof,
    #[error("only the {allowed} side may do this")]
    WrongSide { allowed: Side },
    #[error("cannot move-and-push in the given direction")]
    CannotPush,
    #[error("the actor is not a knight")]
    NotAKnight,
    #[error("only villagers can be arrested")]
    NotAVillager,
    #[error("there is no one to kill")]
    NoTarget,
    #[error("forbidden kill")]
    ForbiddenKill,
    #[error("the actor is not an assassin")]
    NotAnAssassin,
    #[error("only the king can be attacked")]
    NotTheKing,
    #[error("the king is already dead")]
    KingAlreadyDead,
    #[error("the specified villager is not an assassin")]
    NotAHiddenAssassin,
}

/// Why the one-time assassin selection was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("exactly 3 assassins must be chosen, got {0}")]
    WrongCount(usize),
    #[error("unknown villager: {0}")]
    UnknownVillager(String),
    #[error("villager chosen twice: {0}")]
    Duplicate(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid assassin selection: {0}")]
    InvalidAssassinSelection(#[from] SelectionError),

    /// The turn was rejected at action `index` and nothing was applied.
    #[error("invalid move #{index} ({action}): {reason}")]
    InvalidMove { index: usize, action: Action, reason: MoveError },

    #[error("the assassins must be chosen before the first turn")]
    AssassinsNotChosen,

    #[error("the assassins have already been chosen")]
    AlreadyInitialized,

    #[error("the game is over")]
    GameOver,

    #[error("it is not the {0} side's turn")]
    NotYourTurn(Side),
}

/// Malformed wire messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("a valid move must be a dictionary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed action: {0}")]
    MalformedAction(String),

    #[error("expected {expected} message")]
    UnexpectedMessage { expected: &'static str },
}

/// Anything that can go wrong when feeding a raw message to a `Match`.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Game(#[from] GameError),
}

pub type EngineResult<T> = Result<T, GameError>;
