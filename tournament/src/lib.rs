pub mod runner;
pub mod database;

pub use runner::{run_batch, run_game, seat_name, GameResult, RunError};
pub use database::{Database, Standing};
