// ═══════════════════════════════════════════════════════════════════════
// Random Agent — plays uniformly random legal actions.
// Serves as baseline and for testing game engine stability.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use kaa_engine::types::*;
use kaa_engine::visibility::PlayerView;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct RandomAgent {
    side: Side,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(side: Side, seed: u64) -> Self {
        RandomAgent {
            side,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

/// Three distinct villager names drawn with `rng`.
pub fn random_assassins(rng: &mut impl Rng) -> Vec<String> {
    Villager::ALL
        .choose_multiple(rng, 3)
        .map(|v| v.name().to_string())
        .collect()
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }
    fn side(&self) -> Side { self.side }

    fn choose_assassins(&mut self, _view: &PlayerView) -> Vec<String> {
        random_assassins(&mut self.rng)
    }

    fn choose_actions(&mut self, view: &PlayerView) -> Vec<Action> {
        let budget = view.visible.card.map_or(0, |card| card.budget(self.side));
        // Plan on a copy so each pick sees the effect of the previous ones
        let mut scratch = view.clone();
        let mut actions = Vec::new();

        for _ in 0..budget {
            // Occasionally pass the rest of the turn
            if self.rng.gen_bool(0.1) {
                break;
            }
            let legal = scratch.legal_actions();
            let Some(&action) = legal.choose(&mut self.rng) else {
                break;
            };
            if scratch.simulate(&action).is_err() {
                break;
            }
            actions.push(action);
        }
        actions
    }
}
