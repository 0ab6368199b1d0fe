// ═══════════════════════════════════════════════════════════════════════
// Occupancy grid — who stands where
// ═══════════════════════════════════════════════════════════════════════

use crate::board;
use crate::types::{Cell, Direction, Occupant, BOARD_SIZE};
use serde::{Deserialize, Serialize};

const N: usize = BOARD_SIZE as usize;

/// 10x10 mapping from cell to occupant. At most one occupant per cell by
/// construction; cells off the board are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Option<Occupant>; N]; N],
}

impl Grid {
    pub fn empty() -> Self {
        Grid::default()
    }

    pub fn get(&self, cell: Cell) -> Option<Occupant> {
        self.cells[cell.row() as usize][cell.col() as usize]
    }

    pub fn set(&mut self, cell: Cell, occupant: Option<Occupant>) {
        self.cells[cell.row() as usize][cell.col() as usize] = occupant;
    }

    /// Clear a cell, returning whoever was there.
    pub fn take(&mut self, cell: Cell) -> Option<Occupant> {
        self.cells[cell.row() as usize][cell.col() as usize].take()
    }

    pub fn is_empty(&self, cell: Cell) -> bool {
        self.get(cell).is_none()
    }

    /// Occupied cells in row-major order.
    pub fn occupants(&self) -> impl Iterator<Item = (Cell, Occupant)> + '_ {
        Cell::all().filter_map(move |c| self.get(c).map(|o| (c, o)))
    }

    pub fn find(&self, occupant: Occupant) -> Option<Cell> {
        self.occupants().find(|&(_, o)| o == occupant).map(|(c, _)| c)
    }

    pub fn king(&self) -> Option<Cell> {
        self.find(Occupant::King)
    }

    pub fn count(&self, pred: impl Fn(Occupant) -> bool) -> usize {
        self.occupants().filter(|&(_, o)| pred(o)).count()
    }

    /// Landing cell for a knight push from `origin` towards `dir`.
    ///
    /// Walks from the cell next to `origin` while cells are occupied. Every
    /// occupant on the way must be an unrevealed villager, and every occupied
    /// cell after the first must be ground. Returns the first empty cell
    /// (roofs allowed), or `None` if the line is blocked or runs off the board.
    pub fn first_free_in_direction(&self, origin: Cell, dir: Direction) -> Option<Cell> {
        let first = origin.step(dir)?;
        let mut cur = first;
        while let Some(occupant) = self.get(cur) {
            if !occupant.is_villager() {
                return None;
            }
            if cur != first && board::is_roof(cur) {
                return None;
            }
            cur = cur.step(dir)?;
        }
        Some(cur)
    }

    /// Shove the line starting next to `origin` one cell towards `dir`,
    /// ending at `landing` (as returned by `first_free_in_direction`).
    /// The piece at `origin` ends up next to it and `origin` is vacated.
    pub(crate) fn shift_chain(&mut self, origin: Cell, dir: Direction, landing: Cell) {
        let back = dir.opposite();
        let mut cur = landing;
        while cur != origin {
            // Every cell between `landing` and `origin` is on the board.
            let Some(prev) = cur.step(back) else { break };
            let moved = self.get(prev);
            self.set(cur, moved);
            cur = prev;
        }
        self.set(origin, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Villager;

    fn c(row: u8, col: u8) -> Cell {
        Cell::new(row, col).unwrap()
    }

    #[test]
    fn test_free_cell_directly_next() {
        let grid = Grid::empty();
        assert_eq!(grid.first_free_in_direction(c(5, 5), Direction::East), Some(c(5, 6)));
    }

    #[test]
    fn test_free_cell_after_villagers() {
        let mut grid = Grid::empty();
        grid.set(c(3, 2), Some(Occupant::Villager(Villager::Monk)));
        grid.set(c(3, 3), Some(Occupant::Villager(Villager::Farmer)));
        assert_eq!(grid.first_free_in_direction(c(3, 1), Direction::East), Some(c(3, 4)));
    }

    #[test]
    fn test_blocked_by_non_villager() {
        let mut grid = Grid::empty();
        grid.set(c(3, 2), Some(Occupant::Villager(Villager::Monk)));
        grid.set(c(3, 3), Some(Occupant::Knight));
        assert_eq!(grid.first_free_in_direction(c(3, 1), Direction::East), None);

        grid.set(c(3, 3), Some(Occupant::Assassin));
        assert_eq!(grid.first_free_in_direction(c(3, 1), Direction::East), None);
    }

    #[test]
    fn test_blocked_by_board_edge() {
        let mut grid = Grid::empty();
        grid.set(c(3, 8), Some(Occupant::Villager(Villager::Monk)));
        grid.set(c(3, 9), Some(Occupant::Villager(Villager::Squire)));
        assert_eq!(grid.first_free_in_direction(c(3, 7), Direction::East), None);
    }

    #[test]
    fn test_roof_rules() {
        // (4,5) and (4,6) are roofs.
        let mut grid = Grid::empty();
        // Occupied roof as the first candidate is fine.
        grid.set(c(4, 5), Some(Occupant::Villager(Villager::Monk)));
        assert_eq!(grid.first_free_in_direction(c(4, 4), Direction::East), Some(c(4, 6)));

        // An occupied roof further down the line blocks.
        grid.set(c(4, 4), Some(Occupant::Villager(Villager::Hooker)));
        assert_eq!(grid.first_free_in_direction(c(4, 3), Direction::East), None);
    }

    #[test]
    fn test_empty_roof_is_a_valid_landing() {
        let mut grid = Grid::empty();
        grid.set(c(4, 4), Some(Occupant::Villager(Villager::Monk)));
        assert_eq!(grid.first_free_in_direction(c(4, 3), Direction::East), Some(c(4, 5)));
    }

    #[test]
    fn test_shift_chain() {
        let mut grid = Grid::empty();
        grid.set(c(3, 1), Some(Occupant::Knight));
        grid.set(c(3, 2), Some(Occupant::Villager(Villager::Monk)));
        grid.set(c(3, 3), Some(Occupant::Villager(Villager::Farmer)));
        let landing = grid.first_free_in_direction(c(3, 1), Direction::East).unwrap();
        grid.shift_chain(c(3, 1), Direction::East, landing);
        assert_eq!(grid.get(c(3, 1)), None);
        assert_eq!(grid.get(c(3, 2)), Some(Occupant::Knight));
        assert_eq!(grid.get(c(3, 3)), Some(Occupant::Villager(Villager::Monk)));
        assert_eq!(grid.get(c(3, 4)), Some(Occupant::Villager(Villager::Farmer)));
    }
}
