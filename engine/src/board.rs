// ═══════════════════════════════════════════════════════════════════════
// Static board data — terrain and castle gates never change during a game.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{Cell, Direction, Gate, Terrain};

const R: Terrain = Terrain::Roof;
const G: Terrain = Terrain::Ground;

/// Terrain indexed by [row][col].
pub const BOARD: [[Terrain; 10]; 10] = [
    [R, R, R, R, R, G, G, R, R, R],
    [R, R, R, R, R, G, G, R, R, R],
    [R, G, G, G, G, G, G, G, G, R],
    [R, G, G, G, G, G, G, G, G, G],
    [R, G, G, G, G, R, R, G, G, G],
    [G, G, G, G, G, R, R, G, G, G],
    [R, R, G, G, G, R, R, G, G, G],
    [R, R, G, G, G, R, R, G, G, G],
    [R, R, G, G, G, G, G, G, G, G],
    [R, R, G, G, G, G, G, G, G, G],
];

/// The two castle gates. The king escapes through (1,2) or (4,0).
pub const CASTLE_GATES: [Gate; 2] = [
    Gate { cell: Cell::at(2, 2), facing: Direction::North },
    Gate { cell: Cell::at(4, 1), facing: Direction::West },
];

pub fn terrain(cell: Cell) -> Terrain {
    BOARD[cell.row() as usize][cell.col() as usize]
}

pub fn is_roof(cell: Cell) -> bool {
    terrain(cell) == Terrain::Roof
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_terrain() {
        assert!(is_roof(Cell::new(0, 0).unwrap()));
        assert!(!is_roof(Cell::new(0, 5).unwrap()));
        assert!(is_roof(Cell::new(4, 5).unwrap()));
        assert!(!is_roof(Cell::new(5, 0).unwrap()));
        assert!(!is_roof(Cell::new(9, 9).unwrap()));
    }

    #[test]
    fn test_gate_exits() {
        let exits: Vec<Cell> = CASTLE_GATES.iter().filter_map(|g| g.exit()).collect();
        assert_eq!(exits, vec![Cell::new(1, 2).unwrap(), Cell::new(4, 0).unwrap()]);
        // Both exits sit on roofs, which the king's own moves can never enter.
        assert!(exits.iter().all(|&c| is_roof(c)));
    }
}
