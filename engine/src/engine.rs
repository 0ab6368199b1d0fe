// ═══════════════════════════════════════════════════════════════════════
// Game Engine — action resolution and turn bookkeeping
//
// Architecture:
//   The engine is a pure state machine. It never does I/O or talks to
//   players. A caller (the `Match` dispatcher, a test, a self-play loop)
//   hands it either the one-time assassin selection or a whole turn:
//   an ordered batch of actions for one side.
//
// Turn semantics:
//   A batch is all-or-nothing. Actions are resolved in order against a
//   scratch copy of the visible state, each one seeing the effects of the
//   previous ones. The copy replaces the live state only if every action
//   succeeds; otherwise the error names the first offending action and the
//   game is left exactly as it was.
//
//   After an assassin-side turn (and after the selection itself) the next
//   card is drawn.
// ═══════════════════════════════════════════════════════════════════════

use crate::board;
use crate::error::{EngineResult, GameError, MoveError, SelectionError};
use crate::types::*;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Number of hidden assassins.
pub const ASSASSIN_COUNT: usize = 3;

// ── Single-action resolver ─────────────────────────────────────────────

/// Validate `action` for `side` and apply it to `visible`.
/// Every check runs before the first write, so on error `visible` is
/// unchanged.
pub(crate) fn resolve(
    visible: &mut VisibleState,
    assassins: Option<&BTreeSet<Villager>>,
    action: &Action,
    side: Side,
) -> Result<(), MoveError> {
    match *action {
        Action::Move { from, dir } => resolve_move(visible, from, dir, side),
        Action::Arrest { from, dir } => resolve_arrest(visible, from, dir, side),
        Action::Kill { from, dir } => resolve_kill(visible, from, dir, side),
        Action::Attack { from, dir } => resolve_attack(visible, from, dir, side),
        Action::Reveal { at } => resolve_reveal(visible, assassins, at, side),
    }
}

fn require_side(side: Side, allowed: Side) -> Result<(), MoveError> {
    if side == allowed {
        Ok(())
    } else {
        Err(MoveError::WrongSide { allowed })
    }
}

fn resolve_move(visible: &mut VisibleState, from: Cell, dir: Direction, side: Side) -> Result<(), MoveError> {
    let people = &mut visible.people;
    let actor = people.get(from).ok_or(MoveError::NothingToMove)?;
    let to = from.step(dir).ok_or(MoveError::OffBoard)?;
    let occupied = !people.is_empty(to);

    // Only knights can push their way into an occupied cell
    if actor != Occupant::Knight && occupied {
        return Err(MoveError::DestinationOccupied);
    }
    if actor == Occupant::King && board::is_roof(to) {
        return Err(MoveError::KingOnRoof);
    }
    require_side(side, actor.owner())?;

    if !occupied {
        people.set(to, Some(actor));
        people.set(from, None);
        return Ok(());
    }

    let landing = people.first_free_in_direction(from, dir).ok_or(MoveError::CannotPush)?;
    people.shift_chain(from, dir, landing);
    Ok(())
}

fn resolve_arrest(visible: &mut VisibleState, from: Cell, dir: Direction, side: Side) -> Result<(), MoveError> {
    require_side(side, Side::King)?;
    if visible.people.get(from) != Some(Occupant::Knight) {
        return Err(MoveError::NotAKnight);
    }
    let target = from.step(dir).ok_or(MoveError::OffBoard)?;
    match visible.people.get(target) {
        Some(Occupant::Villager(v)) => {
            visible.arrested.push(v);
            visible.people.set(target, None);
            Ok(())
        }
        _ => Err(MoveError::NotAVillager),
    }
}

fn resolve_kill(visible: &mut VisibleState, from: Cell, dir: Direction, side: Side) -> Result<(), MoveError> {
    let killer = visible.people.get(from);
    match killer {
        Some(Occupant::Assassin) => require_side(side, Side::Assassins)?,
        Some(Occupant::Knight) => require_side(side, Side::King)?,
        _ => {}
    }
    let target_cell = from.step(dir).ok_or(MoveError::OffBoard)?;
    let target = visible.people.get(target_cell).ok_or(MoveError::NoTarget)?;

    match (killer, target) {
        (Some(Occupant::Assassin), Occupant::Knight) => visible.killed.knights += 1,
        (Some(Occupant::Knight), Occupant::Assassin) => visible.killed.assassins += 1,
        _ => return Err(MoveError::ForbiddenKill),
    }
    visible.people.set(target_cell, None);
    Ok(())
}

fn resolve_attack(visible: &mut VisibleState, from: Cell, dir: Direction, side: Side) -> Result<(), MoveError> {
    require_side(side, Side::Assassins)?;
    if visible.people.get(from) != Some(Occupant::Assassin) {
        return Err(MoveError::NotAnAssassin);
    }
    let target = from.step(dir).ok_or(MoveError::OffBoard)?;
    if visible.people.get(target) != Some(Occupant::King) {
        return Err(MoveError::NotTheKing);
    }
    if visible.king == KingHealth::Dead {
        return Err(MoveError::KingAlreadyDead);
    }
    visible.king = visible.king.worsen();
    Ok(())
}

fn resolve_reveal(
    visible: &mut VisibleState,
    assassins: Option<&BTreeSet<Villager>>,
    at: Cell,
    side: Side,
) -> Result<(), MoveError> {
    require_side(side, Side::Assassins)?;
    match visible.people.get(at) {
        Some(Occupant::Villager(v)) if assassins.is_some_and(|set| set.contains(&v)) => {
            visible.people.set(at, Some(Occupant::Assassin));
            Ok(())
        }
        _ => Err(MoveError::NotAHiddenAssassin),
    }
}

// ── Legal action enumeration ───────────────────────────────────────────

/// Would `action` succeed for `side` right now?
pub(crate) fn is_legal(
    visible: &VisibleState,
    assassins: Option<&BTreeSet<Villager>>,
    action: &Action,
    side: Side,
) -> bool {
    let mut scratch = visible.clone();
    resolve(&mut scratch, assassins, action, side).is_ok()
}

/// Every single action `side` could play next, in row-major piece order.
pub(crate) fn legal_actions(
    visible: &VisibleState,
    assassins: Option<&BTreeSet<Villager>>,
    side: Side,
) -> Vec<Action> {
    let mut legal = Vec::new();
    for (cell, occupant) in visible.people.occupants() {
        if occupant.owner() != side {
            continue;
        }
        let mut candidates: Vec<Action> = Direction::ALL
            .iter()
            .map(|&dir| Action::Move { from: cell, dir })
            .collect();
        match occupant {
            Occupant::Knight => {
                for dir in Direction::ALL {
                    candidates.push(Action::Arrest { from: cell, dir });
                    candidates.push(Action::Kill { from: cell, dir });
                }
            }
            Occupant::Assassin => {
                for dir in Direction::ALL {
                    candidates.push(Action::Kill { from: cell, dir });
                    candidates.push(Action::Attack { from: cell, dir });
                }
            }
            Occupant::Villager(_) => candidates.push(Action::Reveal { at: cell }),
            Occupant::King => {}
        }
        legal.extend(candidates.into_iter().filter(|a| is_legal(visible, assassins, a, side)));
    }
    legal
}

// ── Assassin selection ─────────────────────────────────────────────────

fn parse_assassins<S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<Villager>, SelectionError> {
    if names.len() != ASSASSIN_COUNT {
        return Err(SelectionError::WrongCount(names.len()));
    }
    let mut chosen = BTreeSet::new();
    for name in names {
        let name = name.as_ref();
        let villager: Villager = name
            .parse()
            .map_err(|_| SelectionError::UnknownVillager(name.to_string()))?;
        if !chosen.insert(villager) {
            return Err(SelectionError::Duplicate(name.to_string()));
        }
    }
    Ok(chosen)
}

// ── Public contract ────────────────────────────────────────────────────

impl GameState {
    /// One-time administrative move by the assassin side. Counts as that
    /// side's first turn: the first card is drawn.
    pub fn set_assassins<S: AsRef<str>>(&mut self, names: &[S]) -> EngineResult<()> {
        if !self.is_initial() {
            return Err(GameError::AlreadyInitialized);
        }
        let chosen = parse_assassins(names)?;
        self.hidden.assassins = Some(chosen);
        self.end_turn(Side::Assassins);
        info!(turn = self.visible.turn, "assassins chosen");
        Ok(())
    }

    /// Apply one side's whole turn. See the module header for atomicity.
    pub fn apply_turn(&mut self, actions: &[Action], side: Side) -> EngineResult<()> {
        if self.is_initial() {
            return Err(GameError::AssassinsNotChosen);
        }
        if self.winner().is_some() {
            return Err(GameError::GameOver);
        }

        let mut scratch = self.visible.clone();
        let assassins = self.hidden.assassins.as_ref();
        for (index, action) in actions.iter().enumerate() {
            if let Err(reason) = resolve(&mut scratch, assassins, action, side) {
                warn!(%side, index, %action, %reason, "turn rejected");
                return Err(GameError::InvalidMove { index, action: *action, reason });
            }
            debug!(%side, %action, "action applied");
        }

        self.visible = scratch;
        self.end_turn(side);
        info!(%side, turn = self.visible.turn, actions = actions.len(), "turn applied");
        if let Some((winner, cause)) = self.verdict() {
            info!(%winner, %cause, "game over");
        }
        Ok(())
    }

    fn end_turn(&mut self, side: Side) {
        if side == Side::Assassins {
            if let Some(card) = self.hidden.deck.draw() {
                self.visible.card = Some(card);
            }
        }
        self.visible.turn += 1;
    }

    /// Single actions `side` could legally play now. Empty before the
    /// assassins are chosen and once the game is decided.
    pub fn legal_actions(&self, side: Side) -> Vec<Action> {
        if self.is_initial() || self.winner().is_some() {
            return Vec::new();
        }
        legal_actions(&self.visible, self.hidden.assassins.as_ref(), side)
    }
}
