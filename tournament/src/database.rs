// ═══════════════════════════════════════════════════════════════════════
// Database — SQLite storage for self-play results
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::GameResult;
use rusqlite::{params, Connection, Result};

pub struct Database {
    conn: Connection,
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub name: String,
    pub games: u32,
    pub wins: u32,
}

impl Standing {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64 * 100.0
        }
    }
}

impl Database {
    /// Open (or create) a database at the given path.
    pub fn open(path: &str) -> Result<Self> {
        let db = Database { conn: Connection::open(path)? };
        db.create_schema()?;
        Ok(db)
    }

    /// In-memory database (useful for tests).
    pub fn in_memory() -> Result<Self> {
        let db = Database { conn: Connection::open_in_memory()? };
        db.create_schema()?;
        Ok(db)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch("
            CREATE TABLE IF NOT EXISTS agents (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE,
                games       INTEGER NOT NULL DEFAULT 0,
                wins        INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS games (
                id               INTEGER PRIMARY KEY,
                seed             INTEGER NOT NULL,
                turns            INTEGER NOT NULL,
                winner           TEXT NOT NULL,
                cause            TEXT NOT NULL,
                king_agent       INTEGER NOT NULL REFERENCES agents(id),
                assassin_agent   INTEGER NOT NULL REFERENCES agents(id),
                arrested         INTEGER NOT NULL,
                knights_killed   INTEGER NOT NULL,
                assassins_killed INTEGER NOT NULL,
                king_health      TEXT NOT NULL,
                played_at        TEXT NOT NULL DEFAULT (datetime('now'))
            );
        ")
    }

    /// Register an agent seat (or return the existing ID).
    pub fn register_agent(&self, name: &str) -> Result<i64> {
        register_agent(&self.conn, name)
    }

    /// Store one completed game and credit both seats.
    pub fn store_game(&self, result: &GameResult) -> Result<i64> {
        insert_game(&self.conn, result)
    }

    /// Store a whole batch in one transaction.
    pub fn store_games(&mut self, results: &[GameResult]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for result in results {
            insert_game(&tx, result)?;
        }
        tx.commit()?;
        Ok(results.len())
    }

    /// Seats ordered by win rate, then by name.
    pub fn leaderboard(&self) -> Result<Vec<Standing>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, games, wins FROM agents
             ORDER BY CAST(wins AS REAL) / MAX(games, 1) DESC, name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Standing {
                name: row.get(0)?,
                games: row.get(1)?,
                wins: row.get(2)?,
            })
        })?;
        rows.collect()
    }

    /// Wins per side, most first.
    pub fn side_wins(&self) -> Result<Vec<(String, u32)>> {
        self.grouped_counts("winner")
    }

    /// How games were decided, most common first.
    pub fn cause_counts(&self) -> Result<Vec<(String, u32)>> {
        self.grouped_counts("cause")
    }

    fn grouped_counts(&self, column: &'static str) -> Result<Vec<(String, u32)>> {
        let sql = format!(
            "SELECT {column}, COUNT(*) AS n FROM games GROUP BY {column} ORDER BY n DESC, {column}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect()
    }

    /// Get total number of games stored.
    pub fn game_count(&self) -> Result<u32> {
        self.conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
    }
}

fn register_agent(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT OR IGNORE INTO agents (name) VALUES (?1)", params![name])?;
    conn.query_row("SELECT id FROM agents WHERE name = ?1", params![name], |row| row.get(0))
}

fn insert_game(conn: &Connection, result: &GameResult) -> Result<i64> {
    let king_id = register_agent(conn, &result.king_agent)?;
    let assassin_id = register_agent(conn, &result.assassin_agent)?;

    conn.execute(
        "INSERT INTO games (seed, turns, winner, cause, king_agent, assassin_agent,
                            arrested, knights_killed, assassins_killed, king_health)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            result.seed as i64,
            result.turns,
            result.winner.to_string(),
            result.cause.as_str(),
            king_id,
            assassin_id,
            result.arrested as i64,
            result.knights_killed,
            result.assassins_killed,
            result.king.to_string(),
        ],
    )?;
    let game_id = conn.last_insert_rowid();

    // Update seat stats
    let winner_id = match result.winner {
        kaa_engine::Side::King => king_id,
        kaa_engine::Side::Assassins => assassin_id,
    };
    for agent_id in [king_id, assassin_id] {
        conn.execute(
            "UPDATE agents SET games = games + 1, wins = wins + ?1 WHERE id = ?2",
            params![(agent_id == winner_id) as i64, agent_id],
        )?;
    }

    Ok(game_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaa_engine::{KingHealth, Side, VictoryCause};

    fn result(seed: u64, winner: Side, cause: VictoryCause) -> GameResult {
        GameResult {
            seed,
            winner,
            cause,
            turns: 12,
            arrested: 2,
            knights_killed: 1,
            assassins_killed: 0,
            king: KingHealth::Injured,
            king_agent: "Heuristic (king)".into(),
            assassin_agent: "Random (assassins)".into(),
        }
    }

    #[test]
    fn test_store_and_count() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.game_count().unwrap(), 0);
        db.store_game(&result(1, Side::King, VictoryCause::AssassinsNeutralized)).unwrap();
        db.store_game(&result(2, Side::Assassins, VictoryCause::DeckExhausted)).unwrap();
        db.store_game(&result(3, Side::Assassins, VictoryCause::DeckExhausted)).unwrap();
        assert_eq!(db.game_count().unwrap(), 3);

        assert_eq!(
            db.side_wins().unwrap(),
            vec![("assassins".to_string(), 2), ("king".to_string(), 1)]
        );
        assert_eq!(
            db.cause_counts().unwrap(),
            vec![("deck_exhausted".to_string(), 2), ("assassins_neutralized".to_string(), 1)]
        );
    }

    #[test]
    fn test_leaderboard_credits_winning_seat() {
        let mut db = Database::in_memory().unwrap();
        let batch = [
            result(1, Side::Assassins, VictoryCause::KingKilled),
            result(2, Side::Assassins, VictoryCause::DeckExhausted),
            result(3, Side::King, VictoryCause::AssassinsNeutralized),
        ];
        assert_eq!(db.store_games(&batch).unwrap(), 3);

        let board = db.leaderboard().unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0], Standing { name: "Random (assassins)".into(), games: 3, wins: 2 });
        assert_eq!(board[1], Standing { name: "Heuristic (king)".into(), games: 3, wins: 1 });
        assert!((board[0].win_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_register_agent_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let a = db.register_agent("Random (king)").unwrap();
        let b = db.register_agent("Random (king)").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, db.register_agent("Random (assassins)").unwrap());
    }
}
