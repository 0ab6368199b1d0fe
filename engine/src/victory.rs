// ═══════════════════════════════════════════════════════════════════════
// Victory conditions
//
// Checked in this order; the first rule that holds decides:
//   1. King stands on a gate exit        → king side
//   2. Card deck exhausted               → assassin side
//   3. King dead                         → assassin side
//   4. Three assassins arrested/killed   → king side
// ═══════════════════════════════════════════════════════════════════════

use crate::engine::ASSASSIN_COUNT;
use crate::types::*;
use std::collections::BTreeSet;

pub(crate) fn evaluate(visible: &VisibleState, hidden: &HiddenState) -> Option<(Side, VictoryCause)> {
    let king = visible.people.king();
    if king.is_some() && visible.castle.iter().any(|gate| gate.exit() == king) {
        return Some((Side::King, VictoryCause::KingReachedCastle));
    }

    if hidden.deck.is_empty() {
        return Some((Side::Assassins, VictoryCause::DeckExhausted));
    }

    if visible.king == KingHealth::Dead {
        return Some((Side::Assassins, VictoryCause::KingKilled));
    }

    // A villager arrested twice still counts once
    let arrested_assassins = hidden.assassins.as_ref().map_or(0, |set| {
        visible
            .arrested
            .iter()
            .filter(|v| set.contains(v))
            .collect::<BTreeSet<_>>()
            .len()
    });
    if visible.killed.assassins as usize + arrested_assassins >= ASSASSIN_COUNT {
        return Some((Side::King, VictoryCause::AssassinsNeutralized));
    }

    None
}

impl GameState {
    /// The winning side, if the game is decided.
    pub fn winner(&self) -> Option<Side> {
        self.verdict().map(|(side, _)| side)
    }

    /// The winning side together with the rule that decided it.
    pub fn verdict(&self) -> Option<(Side, VictoryCause)> {
        evaluate(&self.visible, &self.hidden)
    }
}
