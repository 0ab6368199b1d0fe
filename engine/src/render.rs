// ═══════════════════════════════════════════════════════════════════════
// Text rendering — debugging aid for logs and the CLI
// ═══════════════════════════════════════════════════════════════════════

use crate::board;
use crate::types::*;
use std::fmt::{self, Write as _};

fn write_card(f: &mut impl fmt::Write, card: Option<Card>) -> fmt::Result {
    match card {
        Some(c) => writeln!(
            f,
            "   - Current card: king {} / knights {}{} / population {}",
            c.king_ap,
            c.knight_ap,
            if c.fettered { " (fettered)" } else { "" },
            c.population_ap,
        ),
        None => writeln!(f, "   - Current card: none"),
    }
}

impl fmt::Display for VisibleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_card(f, self.card)?;
        writeln!(f, "   - King: {}", self.king)?;
        let arrested: Vec<&str> = self.arrested.iter().map(|v| v.name()).collect();
        writeln!(f, "   - Arrested: [{}]", arrested.join(", "))?;
        writeln!(
            f,
            "   - Killed: {} knights, {} assassins",
            self.killed.knights, self.killed.assassins
        )?;
        writeln!(f, "   - People:")?;
        writeln!(f, "   +{}", "----+".repeat(BOARD_SIZE as usize))?;
        for row in 0..BOARD_SIZE {
            let mut line = String::new();
            let mut border = String::new();
            for col in 0..BOARD_SIZE {
                let cell = Cell::at(row, col);
                let tag = self.people.get(cell).map_or("  ", Occupant::abbrev);
                if col > 0 {
                    line.push_str(" | ");
                }
                line.push_str(tag);
                border.push_str(if board::is_roof(cell) { "^^^^+" } else { "----+" });
            }
            writeln!(f, "   | {line} |")?;
            writeln!(f, "   +{border}")?;
        }
        Ok(())
    }
}

impl GameState {
    /// Authority-side dump: the public board plus the hidden record.
    /// Never send this to a player.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        let assassins: Vec<&str> = self
            .hidden
            .assassins
            .iter()
            .flatten()
            .map(|v| v.name())
            .collect();
        // Writing to a String cannot fail
        let _ = writeln!(out, "   - Assassins: [{}]", assassins.join(", "));
        let _ = writeln!(out, "   - Remaining cards: {}", self.hidden.deck.len());
        let _ = write!(out, "{}", self.visible);
        out
    }
}
