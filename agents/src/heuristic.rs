// ═══════════════════════════════════════════════════════════════════════
// Heuristic Agent — greedy one-action-at-a-time scoring.
// Significantly stronger than RandomAgent.
//
// Each step of a turn scores every legal action on the planning view
// and plays the best one (ties broken at random). The turn ends when the
// budget is spent or nothing scores above zero.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use kaa_engine::types::*;
use kaa_engine::visibility::PlayerView;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct HeuristicAgent {
    side: Side,
    rng: ChaCha8Rng,
}

fn distance(a: Cell, b: Cell) -> i32 {
    (a.row().abs_diff(b.row()) + a.col().abs_diff(b.col())) as i32
}

impl HeuristicAgent {
    pub fn new(side: Side, seed: u64) -> Self {
        HeuristicAgent {
            side,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn is_hidden_assassin(view: &PlayerView, villager: Villager) -> bool {
        view.my_assassins.as_ref().is_some_and(|set| set.contains(&villager))
    }

    /// Distance from `cell` to the closest revealed assassin.
    fn threat_distance(view: &PlayerView, cell: Cell) -> Option<i32> {
        view.visible
            .people
            .occupants()
            .filter(|&(_, o)| o == Occupant::Assassin)
            .map(|(c, _)| distance(c, cell))
            .min()
    }

    fn score(&self, view: &PlayerView, action: &Action) -> i32 {
        let king = view.visible.people.king();
        match *action {
            Action::Attack { .. } => 100,
            Action::Kill { .. } => match self.side {
                Side::King => 100,
                Side::Assassins => 60,
            },
            Action::Arrest { from, dir } => {
                // Villagers close to the king are the dangerous ones
                match (king, from.step(dir)) {
                    (Some(k), Some(target)) if distance(k, target) <= 2 => 70,
                    _ => 40,
                }
            }
            Action::Reveal { at } => match king {
                Some(k) if distance(k, at) == 1 => 80,
                _ => -1,
            },
            Action::Move { from, dir } => self.score_move(view, from, dir),
        }
    }

    fn score_move(&self, view: &PlayerView, from: Cell, dir: Direction) -> i32 {
        let people = &view.visible.people;
        let (Some(king), Some(to)) = (people.king(), from.step(dir)) else {
            return 0;
        };
        let closer = distance(from, king) - distance(to, king);

        match (self.side, people.get(from)) {
            // Knights close ranks around the king
            (Side::King, Some(Occupant::Knight)) => {
                if distance(to, king) == 1 { 5 } else { closer }
            }
            // The king steps away from revealed assassins
            (Side::King, Some(Occupant::King)) => {
                match (Self::threat_distance(view, to), Self::threat_distance(view, from)) {
                    (Some(after), Some(before)) => 10 * (after - before),
                    _ => 0,
                }
            }
            (Side::Assassins, Some(Occupant::Assassin)) => 10 * closer,
            (Side::Assassins, Some(Occupant::Villager(v))) if Self::is_hidden_assassin(view, v) => {
                10 * closer
            }
            _ => 0,
        }
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str { "Heuristic" }
    fn side(&self) -> Side { self.side }

    /// The three villagers standing closest to the king.
    fn choose_assassins(&mut self, view: &PlayerView) -> Vec<String> {
        let people = &view.visible.people;
        let Some(king) = people.king() else {
            return crate::random::random_assassins(&mut self.rng);
        };
        let mut villagers: Vec<(Cell, Villager)> = people
            .occupants()
            .filter_map(|(cell, o)| match o {
                Occupant::Villager(v) => Some((cell, v)),
                _ => None,
            })
            .collect();
        villagers.shuffle(&mut self.rng);
        villagers.sort_by_key(|&(cell, _)| distance(cell, king));
        villagers.iter().take(3).map(|(_, v)| v.name().to_string()).collect()
    }

    fn choose_actions(&mut self, view: &PlayerView) -> Vec<Action> {
        let budget = view.visible.card.map_or(0, |card| card.budget(self.side));
        let mut scratch = view.clone();
        let mut actions = Vec::new();

        for _ in 0..budget {
            let scored: Vec<(i32, Action)> = scratch
                .legal_actions()
                .into_iter()
                .map(|a| (self.score(&scratch, &a), a))
                .collect();
            let Some(best) = scored.iter().map(|&(s, _)| s).max() else {
                break;
            };
            if best <= 0 {
                break;
            }
            let top: Vec<Action> = scored
                .iter()
                .filter(|&&(s, _)| s == best)
                .map(|&(_, a)| a)
                .collect();
            let Some(&action) = top.choose(&mut self.rng) else {
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

#[cfg(test)]
mod tests {
    use super::*;
    use kaa_engine::{create_initial_state, player_view, GameState, Layout};

    fn c(row: u8, col: u8) -> Cell {
        Cell::new(row, col).unwrap()
    }

    /// King in the open with three villagers right next to him.
    fn exposed_king() -> GameState {
        let mut villagers = vec![c(4, 3), c(6, 3), c(5, 2)];
        villagers.extend([
            c(0, 5), c(0, 6), c(1, 5), c(1, 6), c(2, 7),
            c(2, 8), c(3, 8), c(9, 5), c(9, 6),
        ]);
        let layout = Layout {
            king: c(5, 3),
            knights: vec![c(9, 9)],
            villagers,
            ..Layout::standard()
        };
        GameState::new(&layout, 6)
    }

    #[test]
    fn test_picks_villagers_next_to_king() {
        let state = exposed_king();
        let mut agent = HeuristicAgent::new(Side::Assassins, 1);
        let mut picks = agent.choose_assassins(&player_view(&state, Side::Assassins));
        picks.sort();

        let people = &state.public_view().people;
        let mut adjacent: Vec<String> = [c(4, 3), c(6, 3), c(5, 2)]
            .iter()
            .filter_map(|&cell| match people.get(cell) {
                Some(Occupant::Villager(v)) => Some(v.name().to_string()),
                _ => None,
            })
            .collect();
        adjacent.sort();
        assert_eq!(picks, adjacent);
    }

    #[test]
    fn test_reveals_then_strikes() {
        let mut state = exposed_king();
        let mut agent = HeuristicAgent::new(Side::Assassins, 1);
        let picks = agent.choose_assassins(&player_view(&state, Side::Assassins));
        state.set_assassins(&picks).unwrap();
        state.apply_turn(&[], Side::King).unwrap();

        let actions = agent.choose_actions(&player_view(&state, Side::Assassins));
        assert!(matches!(actions[0], Action::Reveal { .. }));
        assert!(matches!(actions[1], Action::Attack { .. }));

        // Every card grants the population at least four actions
        state.apply_turn(&actions, Side::Assassins).unwrap();
        assert_eq!(state.public_view().king, KingHealth::Dead);
        assert_eq!(state.winner(), Some(Side::Assassins));
    }

    #[test]
    fn test_heuristic_games_stay_legal() {
        for seed in 0..4 {
            let mut state = create_initial_state(seed);
            let mut assassins = HeuristicAgent::new(Side::Assassins, seed);
            let mut king = HeuristicAgent::new(Side::King, seed + 100);
            let picks = assassins.choose_assassins(&player_view(&state, Side::Assassins));
            state.set_assassins(&picks).unwrap();

            let mut side = Side::King;
            while state.winner().is_none() {
                let agent: &mut dyn Agent = match side {
                    Side::King => &mut king,
                    Side::Assassins => &mut assassins,
                };
                let actions = agent.choose_actions(&player_view(&state, side));
                state.apply_turn(&actions, side).unwrap();
                side = side.opponent();
            }
        }
    }
}
