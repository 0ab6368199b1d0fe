// ═══════════════════════════════════════════════════════════════════════
// Visibility / Information Model
//
//   PUBLIC  — the occupancy grid, castle gates, current card, king health,
//             arrested villagers, kill counters, how many cards are left
//   PRIVATE — the assassin side knows which three villagers it picked
//   HIDDEN  — order of the remaining cards
//
// Agents only ever receive a PlayerView, never the raw GameState.
// ═══════════════════════════════════════════════════════════════════════

use crate::engine;
use crate::error::MoveError;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What one side is allowed to know.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub viewer: Side,
    pub visible: VisibleState,
    /// Size of the draw pile (its order stays hidden).
    pub cards_remaining: usize,
    /// The assassin side's own picks. Always `None` for the king side.
    pub my_assassins: Option<BTreeSet<Villager>>,
    /// True while the assassins have not been chosen yet.
    pub awaiting_assassins: bool,
    pub winner: Option<Side>,
}

pub fn player_view(state: &GameState, viewer: Side) -> PlayerView {
    let my_assassins = match viewer {
        Side::Assassins => state.hidden.assassins.clone(),
        Side::King => None,
    };
    PlayerView {
        viewer,
        visible: state.visible.clone(),
        cards_remaining: state.hidden.deck.len(),
        my_assassins,
        awaiting_assassins: state.is_initial(),
        winner: state.winner(),
    }
}

impl PlayerView {
    /// Single actions the viewer could play on this view. The viewer has
    /// all the information its own actions depend on, so this agrees with
    /// `GameState::legal_actions` for the same side.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.awaiting_assassins || self.winner.is_some() {
            return Vec::new();
        }
        engine::legal_actions(&self.visible, self.my_assassins.as_ref(), self.viewer)
    }

    /// Play `action` on this view only, to plan the rest of a turn.
    pub fn simulate(&mut self, action: &Action) -> Result<(), MoveError> {
        engine::resolve(&mut self.visible, self.my_assassins.as_ref(), action, self.viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::create_initial_state;

    #[test]
    fn test_king_side_never_sees_assassins() {
        let mut state = create_initial_state(3);
        state.set_assassins(&["monk", "hooker", "fishwoman"]).unwrap();

        let king = player_view(&state, Side::King);
        assert_eq!(king.my_assassins, None);
        let json = serde_json::to_string(&king).unwrap();
        assert!(!json.contains("my_assassins\":["));

        let assassins = player_view(&state, Side::Assassins);
        let picked = assassins.my_assassins.unwrap();
        assert!(picked.contains(&Villager::Monk));
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_view_tracks_public_state() {
        let mut state = create_initial_state(3);
        let before = player_view(&state, Side::King);
        assert!(before.awaiting_assassins);
        assert!(before.legal_actions().is_empty());

        state.set_assassins(&["monk", "hooker", "fishwoman"]).unwrap();
        let after = player_view(&state, Side::King);
        assert!(!after.awaiting_assassins);
        assert_eq!(after.cards_remaining, 14);
        assert!(after.visible.card.is_some());
    }

    #[test]
    fn test_view_legal_actions_match_state() {
        let mut state = create_initial_state(11);
        state.set_assassins(&["monk", "hooker", "fishwoman"]).unwrap();
        for side in Side::ALL {
            assert_eq!(player_view(&state, side).legal_actions(), state.legal_actions(side));
        }
    }

    #[test]
    fn test_simulate_does_not_touch_state() {
        let mut state = create_initial_state(11);
        state.set_assassins(&["monk", "hooker", "fishwoman"]).unwrap();
        let mut view = player_view(&state, Side::King);
        let action = view.legal_actions()[0];
        view.simulate(&action).unwrap();
        assert_ne!(&view.visible, state.public_view());
    }
}
