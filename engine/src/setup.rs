// ═══════════════════════════════════════════════════════════════════════
// Game setup — starting layout and the initial GameState
// ═══════════════════════════════════════════════════════════════════════

use crate::board::CASTLE_GATES;
use crate::cards::Deck;
use crate::grid::Grid;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Where pieces start. Villager names are dealt onto `villagers` at random.
#[derive(Debug, Clone)]
pub struct Layout {
    pub king: Cell,
    pub knights: Vec<Cell>,
    pub villagers: Vec<Cell>,
    pub castle: Vec<Gate>,
}

const fn at(row: u8, col: u8) -> Cell {
    Cell::at(row, col)
}

const KNIGHTS: [Cell; 7] = [at(1, 3), at(3, 0), at(7, 8), at(8, 7), at(8, 8), at(8, 9), at(9, 8)];

const VILLAGERS: [Cell; 12] = [
    at(1, 7), at(2, 1), at(3, 4), at(3, 6), at(5, 2), at(5, 5),
    at(5, 7), at(5, 9), at(7, 1), at(7, 5), at(8, 3), at(9, 5),
];

impl Layout {
    /// The standard King & Assassins starting position: king in the
    /// bottom-right corner, seven knights around him and across the town.
    pub fn standard() -> Self {
        Layout {
            king: at(9, 9),
            knights: KNIGHTS.to_vec(),
            villagers: VILLAGERS.to_vec(),
            castle: CASTLE_GATES.to_vec(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::standard()
    }
}

impl GameState {
    /// Build a fresh game. `seed` decides both the villager placement and
    /// the deck order.
    pub fn new(layout: &Layout, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut people = Grid::empty();
        people.set(layout.king, Some(Occupant::King));
        for &cell in &layout.knights {
            people.set(cell, Some(Occupant::Knight));
        }

        let mut names = Villager::ALL.to_vec();
        names.shuffle(&mut rng);
        for (&cell, name) in layout.villagers.iter().zip(names) {
            people.set(cell, Some(Occupant::Villager(name)));
        }

        let deck = Deck::shuffled(&mut rng);

        GameState {
            visible: VisibleState {
                people,
                castle: layout.castle.clone(),
                card: None,
                king: KingHealth::Healthy,
                arrested: Vec::new(),
                killed: KillCounters::default(),
                turn: 0,
            },
            hidden: HiddenState { assassins: None, deck },
        }
    }
}

/// Standard layout, seeded.
pub fn create_initial_state(seed: u64) -> GameState {
    GameState::new(&Layout::standard(), seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_population() {
        let state = create_initial_state(42);
        let people = &state.public_view().people;
        assert_eq!(people.count(|o| o == Occupant::King), 1);
        assert_eq!(people.king(), Cell::new(9, 9));
        assert_eq!(people.count(|o| o == Occupant::Knight), 7);
        assert_eq!(people.count(|o| o.is_villager()), 12);
        assert_eq!(people.count(|o| o == Occupant::Assassin), 0);

        // Every name appears exactly once.
        for v in Villager::ALL {
            assert_eq!(people.count(|o| o == Occupant::Villager(v)), 1, "{v}");
        }
    }

    #[test]
    fn test_initial_bookkeeping() {
        let state = create_initial_state(42);
        assert!(state.is_initial());
        assert_eq!(state.cards_remaining(), 15);
        let view = state.public_view();
        assert_eq!(view.card, None);
        assert_eq!(view.king, KingHealth::Healthy);
        assert!(view.arrested.is_empty());
        assert_eq!(view.killed, KillCounters::default());
        assert_eq!(view.castle.len(), 2);
    }

    #[test]
    fn test_deterministic_seed() {
        let s1 = create_initial_state(123);
        let s2 = create_initial_state(123);
        assert_eq!(s1.public_view(), s2.public_view());
        assert_eq!(s1.hidden.deck, s2.hidden.deck);
    }

    #[test]
    fn test_seed_changes_placement() {
        // Twelve names over twelve cells: two seeds agreeing everywhere is
        // astronomically unlikely across this many tries.
        let base = create_initial_state(0).public_view().people.clone();
        assert!((1..20).any(|s| create_initial_state(s).public_view().people != base));
    }
}
