// ═══════════════════════════════════════════════════════════════════════
// Core types — cells, occupants, cards, actions and the game state
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::Deck;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Width and height of the square board.
pub const BOARD_SIZE: u8 = 10;

// ── Sides ──────────────────────────────────────────────────────────────

/// The two players. Side 0 (assassins) always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player 0: villagers and the three hidden assassins.
    Assassins,
    /// Player 1: the king and his knights.
    King,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Assassins, Side::King];

    pub fn opponent(self) -> Side {
        match self {
            Side::Assassins => Side::King,
            Side::King => Side::Assassins,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Assassins => write!(f, "assassins"),
            Side::King => write!(f, "king"),
        }
    }
}

// ── Geometry ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit vector as (row delta, column delta).
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::East => 'E',
            Direction::West => 'W',
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Direction::North),
            "S" => Ok(Direction::South),
            "E" => Ok(Direction::East),
            "W" => Ok(Direction::West),
            other => Err(format!("unknown direction {other:?}")),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A board coordinate. Always inside the 10x10 board: the only public
/// ways to get one are `Cell::new`, `Cell::step` and checked deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawCell")]
pub struct Cell {
    row: u8,
    col: u8,
}

#[derive(Deserialize)]
struct RawCell {
    row: u8,
    col: u8,
}

impl TryFrom<RawCell> for Cell {
    type Error = String;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        Cell::new(raw.row, raw.col).ok_or_else(|| format!("cell ({},{}) is off the board", raw.row, raw.col))
    }
}

impl Cell {
    /// Bounds-checked constructor.
    pub fn new(row: u8, col: u8) -> Option<Cell> {
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some(Cell { row, col })
    }

    /// Unchecked constructor for the static tables.
    pub(crate) const fn at(row: u8, col: u8) -> Cell {
        Cell { row, col }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// Raw coordinate one step away. Not bounds-checked: the result may lie
    /// off the board (including negative components).
    pub fn offset(self, dir: Direction) -> (i8, i8) {
        let (dr, dc) = dir.delta();
        (self.row as i8 + dr, self.col as i8 + dc)
    }

    /// Neighbouring cell, or `None` when the step leaves the board.
    pub fn step(self, dir: Direction) -> Option<Cell> {
        let (r, c) = self.offset(dir);
        if r < 0 || c < 0 {
            return None;
        }
        Cell::new(r as u8, c as u8)
    }

    /// All 100 cells in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Cell { row, col }))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Ground,
    Roof,
}

/// A castle gate: reaching `cell.step(facing)` with the king wins the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub cell: Cell,
    pub facing: Direction,
}

impl Gate {
    /// The cell the king must stand on.
    pub fn exit(self) -> Option<Cell> {
        self.cell.step(self.facing)
    }
}

// ── Occupants ──────────────────────────────────────────────────────────

/// The twelve named villagers. Three of them are secretly assassins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Villager {
    Monk,
    Plumwoman,
    Appleman,
    Hooker,
    Fishwoman,
    Butcher,
    Blacksmith,
    Shepherd,
    Squire,
    Carpenter,
    Witchhunter,
    Farmer,
}

impl Villager {
    pub const ALL: [Villager; 12] = [
        Villager::Monk,
        Villager::Plumwoman,
        Villager::Appleman,
        Villager::Hooker,
        Villager::Fishwoman,
        Villager::Butcher,
        Villager::Blacksmith,
        Villager::Shepherd,
        Villager::Squire,
        Villager::Carpenter,
        Villager::Witchhunter,
        Villager::Farmer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Villager::Monk => "monk",
            Villager::Plumwoman => "plumwoman",
            Villager::Appleman => "appleman",
            Villager::Hooker => "hooker",
            Villager::Fishwoman => "fishwoman",
            Villager::Butcher => "butcher",
            Villager::Blacksmith => "blacksmith",
            Villager::Shepherd => "shepherd",
            Villager::Squire => "squire",
            Villager::Carpenter => "carpenter",
            Villager::Witchhunter => "witchhunter",
            Villager::Farmer => "farmer",
        }
    }
}

impl FromStr for Villager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Villager::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl std::fmt::Display for Villager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whoever stands on a cell. An empty cell is `None` in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupant {
    King,
    Knight,
    /// A villager whose role has not been revealed (may still be an assassin).
    Villager(Villager),
    /// A revealed assassin. Its villager name is no longer tracked.
    Assassin,
}

impl Occupant {
    /// Which side is allowed to move this piece.
    pub fn owner(self) -> Side {
        match self {
            Occupant::King | Occupant::Knight => Side::King,
            Occupant::Villager(_) | Occupant::Assassin => Side::Assassins,
        }
    }

    pub fn is_villager(self) -> bool {
        matches!(self, Occupant::Villager(_))
    }

    /// Two-letter tag used by the text renderer.
    pub fn abbrev(self) -> &'static str {
        match self {
            Occupant::King => "ki",
            Occupant::Knight => "kn",
            Occupant::Assassin => "as",
            Occupant::Villager(v) => &v.name()[..2],
        }
    }
}

impl std::fmt::Display for Occupant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Occupant::King => write!(f, "king"),
            Occupant::Knight => write!(f, "knight"),
            Occupant::Assassin => write!(f, "assassin"),
            Occupant::Villager(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KingHealth {
    Healthy,
    Injured,
    Dead,
}

impl KingHealth {
    /// Health after one more successful attack. Dead stays dead.
    pub fn worsen(self) -> KingHealth {
        match self {
            KingHealth::Healthy => KingHealth::Injured,
            KingHealth::Injured | KingHealth::Dead => KingHealth::Dead,
        }
    }
}

impl std::fmt::Display for KingHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KingHealth::Healthy => write!(f, "healthy"),
            KingHealth::Injured => write!(f, "injured"),
            KingHealth::Dead => write!(f, "dead"),
        }
    }
}

// ── Cards ──────────────────────────────────────────────────────────────

/// A turn-budget card. Only the current card is public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub king_ap: u8,
    pub knight_ap: u8,
    /// Knights are restricted this round.
    pub fettered: bool,
    pub population_ap: u8,
}

impl Card {
    /// Upper bound on the number of actions `side` may submit this round.
    /// The engine does not enforce it.
    pub fn budget(self, side: Side) -> u8 {
        match side {
            Side::King => self.king_ap + self.knight_ap,
            Side::Assassins => self.population_ap,
        }
    }
}

// ── Actions ────────────────────────────────────────────────────────────

/// One step of a turn. Coordinates are (row, column) of the acting piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move one cell; knights push lines of villagers.
    Move { from: Cell, dir: Direction },
    /// Knight arrests the adjacent villager.
    Arrest { from: Cell, dir: Direction },
    /// Assassin kills an adjacent knight, or knight kills an adjacent assassin.
    Kill { from: Cell, dir: Direction },
    /// Assassin wounds the adjacent king.
    Attack { from: Cell, dir: Direction },
    /// Turn a hidden assassin into a revealed one.
    Reveal { at: Cell },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Move { .. } => "move",
            Action::Arrest { .. } => "arrest",
            Action::Kill { .. } => "kill",
            Action::Attack { .. } => "attack",
            Action::Reveal { .. } => "reveal",
        }
    }

    pub fn origin(&self) -> Cell {
        match *self {
            Action::Move { from, .. }
            | Action::Arrest { from, .. }
            | Action::Kill { from, .. }
            | Action::Attack { from, .. } => from,
            Action::Reveal { at } => at,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { from, dir }
            | Action::Arrest { from, dir }
            | Action::Kill { from, dir }
            | Action::Attack { from, dir } => write!(f, "{} {} {}", self.kind(), from, dir),
            Action::Reveal { at } => write!(f, "reveal {at}"),
        }
    }
}

// ── Outcome ────────────────────────────────────────────────────────────

/// Which winning rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryCause {
    KingReachedCastle,
    DeckExhausted,
    KingKilled,
    AssassinsNeutralized,
}

impl VictoryCause {
    pub fn as_str(self) -> &'static str {
        match self {
            VictoryCause::KingReachedCastle => "king_reached_castle",
            VictoryCause::DeckExhausted => "deck_exhausted",
            VictoryCause::KingKilled => "king_killed",
            VictoryCause::AssassinsNeutralized => "assassins_neutralized",
        }
    }
}

impl std::fmt::Display for VictoryCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Game State ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillCounters {
    /// Knights killed by assassins.
    pub knights: u8,
    /// Revealed assassins killed by knights.
    pub assassins: u8,
}

/// Everything both players can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleState {
    pub people: Grid,
    pub castle: Vec<Gate>,
    /// `None` until the assassins have been chosen.
    pub card: Option<Card>,
    pub king: KingHealth,
    /// Arrested villagers in arrest order.
    pub arrested: Vec<Villager>,
    pub killed: KillCounters,
    /// Turns applied so far, the assassin selection included.
    pub turn: u32,
}

/// Authority-only information.
#[derive(Debug, Clone)]
pub(crate) struct HiddenState {
    /// Fixed once by `set_assassins`.
    pub assassins: Option<BTreeSet<Villager>>,
    pub deck: Deck,
}

/// Full game state. The hidden half is only reachable through the
/// methods in `engine` and `victory`; observers get `VisibleState` or a
/// `PlayerView`.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) visible: VisibleState,
    pub(crate) hidden: HiddenState,
}

impl GameState {
    /// Snapshot of the public information.
    pub fn public_view(&self) -> &VisibleState {
        &self.visible
    }

    /// True until the assassins have been chosen.
    pub fn is_initial(&self) -> bool {
        self.hidden.assassins.is_none()
    }

    pub fn cards_remaining(&self) -> usize {
        self.hidden.deck.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_deserialize_checks_bounds() {
        let cell: Cell = serde_json::from_str(r#"{"row":9,"col":0}"#).unwrap();
        assert_eq!((cell.row(), cell.col()), (9, 0));
        assert_eq!(serde_json::to_string(&cell).unwrap(), r#"{"row":9,"col":0}"#);

        assert!(serde_json::from_str::<Cell>(r#"{"row":10,"col":0}"#).is_err());
        assert!(serde_json::from_str::<Gate>(r#"{"cell":{"row":0,"col":12},"facing":"N"}"#).is_err());
        assert_eq!(Cell::new(10, 0), None);
        assert_eq!(Cell::new(0, 10), None);
    }

    #[test]
    fn test_step_stays_on_board() {
        let corner = Cell::new(0, 0).unwrap();
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::South), Cell::new(1, 0));
        assert_eq!(corner.offset(Direction::North), (-1, 0));

        let far = Cell::new(9, 9).unwrap();
        assert_eq!(far.step(Direction::East), None);
        assert_eq!(far.step(Direction::West), Cell::new(9, 8));
    }

    #[test]
    fn test_opposites() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            let (r, c) = d.delta();
            let (or, oc) = d.opposite().delta();
            assert_eq!((r + or, c + oc), (0, 0));
        }
    }

    #[test]
    fn test_villager_names_parse() {
        for v in Villager::ALL {
            assert_eq!(v.name().parse::<Villager>(), Ok(v));
        }
        assert!("king".parse::<Villager>().is_err());
    }

    #[test]
    fn test_abbreviations_are_distinct() {
        let mut tags: Vec<&str> = Villager::ALL.iter().map(|&v| Occupant::Villager(v).abbrev()).collect();
        tags.extend([Occupant::King.abbrev(), Occupant::Knight.abbrev(), Occupant::Assassin.abbrev()]);
        let n = tags.len();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), n);
    }

    #[test]
    fn test_king_health_only_worsens() {
        assert_eq!(KingHealth::Healthy.worsen(), KingHealth::Injured);
        assert_eq!(KingHealth::Injured.worsen(), KingHealth::Dead);
        assert_eq!(KingHealth::Dead.worsen(), KingHealth::Dead);
    }

    #[test]
    fn test_card_budget() {
        let card = Card { king_ap: 2, knight_ap: 7, fettered: false, population_ap: 4 };
        assert_eq!(card.budget(Side::King), 9);
        assert_eq!(card.budget(Side::Assassins), 4);
    }
}
