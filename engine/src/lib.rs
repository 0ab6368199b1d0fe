pub mod types;
pub mod board;
pub mod grid;
pub mod cards;
pub mod setup;
pub mod engine;
pub mod victory;
pub mod visibility;
pub mod protocol;
pub mod render;
pub mod error;


pub use types::*;
pub use error::{GameError, MatchError, MoveError, ProtocolError, SelectionError};
pub use protocol::{Match, Message};
pub use setup::{create_initial_state, Layout};
pub use visibility::{player_view, PlayerView};
