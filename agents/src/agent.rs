// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface that all self-play agents implement
//
// Agents receive a `PlayerView` (not the raw GameState), which only
// contains what their side is allowed to know. The king side never
// learns which villagers are assassins; neither side sees the order
// of the remaining cards.
// ═══════════════════════════════════════════════════════════════════════

use kaa_engine::types::*;
use kaa_engine::visibility::PlayerView;
use kaa_engine::Message;

pub trait Agent: Send {
    /// Human-readable name, also used as the key in the results store.
    fn name(&self) -> &str;

    /// The side this agent plays.
    fn side(&self) -> Side;

    /// Build the next message for the dispatcher: the assassin pick while
    /// it is still pending, otherwise this turn's actions.
    fn decide(&mut self, view: &PlayerView) -> Message {
        if view.awaiting_assassins {
            Message::Assassins { assassins: self.choose_assassins(view) }
        } else {
            Message::Actions { actions: self.choose_actions(view) }
        }
    }

    /// Three villager names. Only ever asked of the assassin side.
    fn choose_assassins(&mut self, view: &PlayerView) -> Vec<String>;

    /// An ordered batch of actions for one turn. May be empty.
    fn choose_actions(&mut self, view: &PlayerView) -> Vec<Action>;
}
