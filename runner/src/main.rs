// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for playing, batching and replaying games
// ═══════════════════════════════════════════════════════════════════════

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kaa_agents::{Agent, HeuristicAgent, RandomAgent};
use kaa_engine::{create_initial_state, Match, Side};
use kaa_tournament::{run_batch, run_game, Database, GameResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::{info, Level};

const MAX_TURNS: u32 = 100;

#[derive(Parser)]
#[command(name = "kaa-runner", about = "King & Assassins rules engine and self-play lab")]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum AgentKind {
    Random,
    Heuristic,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single self-play game
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = AgentKind::Random)]
        king: AgentKind,
        #[arg(long, value_enum, default_value_t = AgentKind::Random)]
        assassins: AgentKind,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play N games in parallel and store the results
    Batch {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        /// Seed of the first game; game i uses seed + i
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value = "results.db")]
        db: String,
        #[arg(long, value_enum, default_value_t = AgentKind::Random)]
        king: AgentKind,
        #[arg(long, value_enum, default_value_t = AgentKind::Random)]
        assassins: AgentKind,
    },
    /// Show win statistics from a results database
    Stats {
        #[arg(short, long, default_value = "results.db")]
        db: String,
    },
    /// Replay a move log: one JSON message per line, sides alternating
    Replay {
        #[arg(short, long)]
        seed: u64,
        #[arg(short, long)]
        file: String,
        /// Print the board after every message
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Play { seed, king, assassins, json } => cmd_play(seed, king, assassins, json),
        Commands::Batch { games, seed, db, king, assassins } => cmd_batch(games, seed, &db, king, assassins),
        Commands::Stats { db } => cmd_stats(&db),
        Commands::Replay { seed, file, show } => cmd_replay(seed, &file, show),
    }
}

fn make_agent(kind: AgentKind, side: Side, seed: u64) -> Box<dyn Agent> {
    match kind {
        AgentKind::Random => Box::new(RandomAgent::new(side, seed)),
        AgentKind::Heuristic => Box::new(HeuristicAgent::new(side, seed)),
    }
}

fn print_result(result: &GameResult) {
    println!("Game finished!");
    println!("  Winner: {} ({})", result.winner, result.cause);
    println!("  Turns played: {}", result.turns);
    println!("  King: {}", result.king);
    println!("  Arrested villagers: {}", result.arrested);
    println!("  Knights killed: {}, assassins killed: {}", result.knights_killed, result.assassins_killed);
}

fn cmd_play(seed: u64, king: AgentKind, assassins: AgentKind, json: bool) -> Result<()> {
    let mut king = make_agent(king, Side::King, seed);
    let mut assassins = make_agent(assassins, Side::Assassins, seed.wrapping_add(1));
    let result = run_game(king.as_mut(), assassins.as_mut(), seed, MAX_TURNS)
        .with_context(|| format!("game with seed {seed} failed"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("=== King & Assassins ===\n");
        println!("seed={}, king={}, assassins={}\n", seed, result.king_agent, result.assassin_agent);
        print_result(&result);
    }
    Ok(())
}

fn cmd_batch(games: u32, first_seed: u64, db_path: &str, king: AgentKind, assassins: AgentKind) -> Result<()> {
    println!("=== Batch: {} games ===\n", games);

    let seeds: Vec<u64> = (0..games as u64).map(|i| first_seed + i).collect();
    let results = run_batch(&seeds, MAX_TURNS, |side, seed| match side {
        Side::King => make_agent(king, side, seed),
        Side::Assassins => make_agent(assassins, side, seed),
    });

    let mut finished = Vec::with_capacity(results.len());
    let mut errors = 0u32;
    for (seed, outcome) in seeds.iter().zip(results) {
        match outcome {
            Ok(result) => finished.push(result),
            Err(e) => {
                errors += 1;
                eprintln!("Game with seed {}: ERROR -- {}", seed, e);
            }
        }
    }

    let mut db = Database::open(db_path).with_context(|| format!("cannot open {db_path}"))?;
    let stored = db.store_games(&finished)?;
    info!(stored, errors, "batch stored");

    let (king_wins, assassin_wins) = side_wins(&finished);
    println!("--- Summary ({} games, {} errors) ---", games, errors);
    println!("  {:10}: {:>4} wins ({:.1}%)", "king", king_wins, win_pct(king_wins, finished.len()));
    println!("  {:10}: {:>4} wins ({:.1}%)", "assassins", assassin_wins, win_pct(assassin_wins, finished.len()));
    println!("\nResults saved to: {}", db_path);
    println!("Total games in DB: {}", db.game_count()?);
    Ok(())
}

/// (king wins, assassin wins) among finished games.
fn side_wins(results: &[GameResult]) -> (usize, usize) {
    let king = results.iter().filter(|r| r.winner == Side::King).count();
    (king, results.len() - king)
}

/// Share of `finished` games, in percent. Errored games are left out.
fn win_pct(wins: usize, finished: usize) -> f64 {
    if finished == 0 {
        0.0
    } else {
        wins as f64 / finished as f64 * 100.0
    }
}

fn cmd_stats(db_path: &str) -> Result<()> {
    let db = Database::open(db_path).with_context(|| format!("cannot open {db_path}"))?;
    let total = db.game_count()?;
    if total == 0 {
        println!("No games found. Run a batch first.");
        return Ok(());
    }

    println!("=== {} games ===\n", total);
    println!("Wins by side:");
    for (side, n) in db.side_wins()? {
        println!("  {:<12} {:>6}", side, n);
    }
    println!("\nHow games ended:");
    for (cause, n) in db.cause_counts()? {
        println!("  {:<24} {:>6}", cause, n);
    }

    println!("\n{:<24} {:>8} {:>8} {:>8}", "Agent", "Games", "Wins", "Win %");
    println!("{}", "-".repeat(52));
    for s in db.leaderboard()? {
        println!("{:<24} {:>8} {:>8} {:>8.1}", s.name, s.games, s.wins, s.win_rate());
    }
    Ok(())
}

fn cmd_replay(seed: u64, path: &str, show: bool) -> Result<()> {
    let file = File::open(path).with_context(|| format!("cannot open {path}"))?;
    let mut game = Match::new(create_initial_state(seed));

    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if game.winner().is_some() {
            bail!("line {}: the game is already over", number + 1);
        }
        let side = game.to_move();
        game.apply_message(&line)
            .with_context(|| format!("line {}: {} move rejected", number + 1, side))?;
        if show {
            println!("After line {} ({}):", number + 1, side);
            println!("{}", game.state().public_view());
        }
    }

    match game.state().verdict() {
        Some((winner, cause)) => println!("Winner: {} ({})", winner, cause),
        None => println!("Undecided; {} to move", game.to_move()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaa_engine::{KingHealth, VictoryCause};

    fn finished(winner: Side) -> GameResult {
        GameResult {
            seed: 0,
            winner,
            cause: VictoryCause::DeckExhausted,
            turns: 29,
            arrested: 0,
            knights_killed: 0,
            assassins_killed: 0,
            king: KingHealth::Healthy,
            king_agent: "Random (king)".into(),
            assassin_agent: "Random (assassins)".into(),
        }
    }

    #[test]
    fn test_summary_ignores_errored_games() {
        // Four games requested, one errored: shares are over the three that finished
        let results = [finished(Side::King), finished(Side::Assassins), finished(Side::Assassins)];
        let (king, assassins) = side_wins(&results);
        assert_eq!((king, assassins), (1, 2));
        let total = win_pct(king, results.len()) + win_pct(assassins, results.len());
        assert!((total - 100.0).abs() < 1e-9);
        assert!((win_pct(assassins, results.len()) - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_summary_with_no_finished_games() {
        assert_eq!(side_wins(&[]), (0, 0));
        assert_eq!(win_pct(0, 0), 0.0);
    }
}
