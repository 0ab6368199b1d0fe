// ═══════════════════════════════════════════════════════════════════════
// Game Runner — plays complete headless games between two agents
// ═══════════════════════════════════════════════════════════════════════

use kaa_agents::Agent;
use kaa_engine::types::*;
use kaa_engine::visibility::player_view;
use kaa_engine::{create_initial_state, Match, MatchError};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Result of a completed game.
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub seed: u64,
    pub winner: Side,
    pub cause: VictoryCause,
    pub turns: u32,
    pub arrested: usize,
    pub knights_killed: u8,
    pub assassins_killed: u8,
    pub king: KingHealth,
    pub king_agent: String,
    pub assassin_agent: String,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{agent} sent a message the game refused: {source}")]
    Rejected {
        agent: String,
        #[source]
        source: MatchError,
    },
    #[error("game exceeded {0} turns without finishing")]
    TurnLimit(u32),
}

/// Seat name used in results, e.g. "Random (king)".
pub fn seat_name(agent: &dyn Agent) -> String {
    format!("{} ({})", agent.name(), agent.side())
}

/// Run one game from the standard layout. The assassin side opens with its
/// selection, then the sides alternate until the game is decided.
pub fn run_game(
    king: &mut dyn Agent,
    assassins: &mut dyn Agent,
    seed: u64,
    max_turns: u32, // safety limit; the deck ends every real game first
) -> Result<GameResult, RunError> {
    let mut game = Match::new(create_initial_state(seed));

    loop {
        let state = game.state();
        if let Some((winner, cause)) = state.verdict() {
            let visible = state.public_view();
            let result = GameResult {
                seed,
                winner,
                cause,
                turns: visible.turn,
                arrested: visible.arrested.len(),
                knights_killed: visible.killed.knights,
                assassins_killed: visible.killed.assassins,
                king: visible.king,
                king_agent: seat_name(king),
                assassin_agent: seat_name(assassins),
            };
            info!(seed, %winner, %cause, turns = result.turns, "game finished");
            return Ok(result);
        }
        if state.public_view().turn >= max_turns {
            return Err(RunError::TurnLimit(max_turns));
        }

        let side = game.to_move();
        let agent: &mut dyn Agent = match side {
            Side::King => &mut *king,
            Side::Assassins => &mut *assassins,
        };
        let message = agent.decide(&player_view(game.state(), side));
        debug!(seed, %side, msg = %message.encode(), "agent moved");
        game.submit(side, message).map_err(|source| RunError::Rejected {
            agent: seat_name(agent),
            source,
        })?;
    }
}

/// Play one game per seed in parallel. Results come back in seed order.
pub fn run_batch<F>(seeds: &[u64], max_turns: u32, make_agent: F) -> Vec<Result<GameResult, RunError>>
where
    F: Fn(Side, u64) -> Box<dyn Agent> + Sync,
{
    seeds
        .par_iter()
        .map(|&seed| {
            let mut king = make_agent(Side::King, seed);
            let mut assassins = make_agent(Side::Assassins, seed.wrapping_add(1));
            run_game(king.as_mut(), assassins.as_mut(), seed, max_turns)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaa_agents::{HeuristicAgent, RandomAgent};

    #[test]
    fn test_random_game_finishes() {
        let mut king = RandomAgent::new(Side::King, 1);
        let mut assassins = RandomAgent::new(Side::Assassins, 2);
        let result = run_game(&mut king, &mut assassins, 42, 100).unwrap();
        // Selection plus at most 14 rounds of two turns
        assert!(result.turns <= 29);
        assert_eq!(result.king_agent, "Random (king)");
        assert_eq!(result.assassin_agent, "Random (assassins)");
    }

    #[test]
    fn test_same_seeds_same_game() {
        let play = || {
            let mut king = HeuristicAgent::new(Side::King, 5);
            let mut assassins = RandomAgent::new(Side::Assassins, 6);
            run_game(&mut king, &mut assassins, 7, 100).unwrap()
        };
        let (a, b) = (play(), play());
        assert_eq!((a.winner, a.cause, a.turns), (b.winner, b.cause, b.turns));
        assert_eq!(a.arrested, b.arrested);
    }

    #[test]
    fn test_turn_limit() {
        let mut king = RandomAgent::new(Side::King, 1);
        let mut assassins = RandomAgent::new(Side::Assassins, 2);
        let err = run_game(&mut king, &mut assassins, 42, 3).unwrap_err();
        assert!(matches!(err, RunError::TurnLimit(3)));
    }

    #[test]
    fn test_batch_keeps_seed_order() {
        let seeds: Vec<u64> = (0..8).collect();
        let results = run_batch(&seeds, 100, |side, seed| -> Box<dyn Agent> {
            Box::new(RandomAgent::new(side, seed))
        });
        let played: Vec<u64> = results.into_iter().map(|r| r.unwrap().seed).collect();
        assert_eq!(played, seeds);
    }
}
