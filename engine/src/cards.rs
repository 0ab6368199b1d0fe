// ═══════════════════════════════════════════════════════════════════════
// Turn-budget cards — static deck and the hidden draw pile
// ═══════════════════════════════════════════════════════════════════════

use crate::types::Card;
use rand::seq::SliceRandom;
use rand::Rng;

const fn card(king_ap: u8, knight_ap: u8, fettered: bool, population_ap: u8) -> Card {
    Card { king_ap, knight_ap, fettered, population_ap }
}

/// The 15 cards, unshuffled.
pub const CARDS: [Card; 15] = [
    card(1, 6, true, 5),
    card(1, 5, false, 4),
    card(1, 6, true, 5),
    card(1, 6, true, 5),
    card(1, 5, true, 4),
    card(1, 5, false, 4),
    card(2, 7, false, 5),
    card(2, 7, false, 4),
    card(1, 6, true, 5),
    card(1, 6, true, 5),
    card(2, 7, false, 5),
    card(2, 5, false, 4),
    card(1, 5, true, 5),
    card(1, 5, false, 4),
    card(1, 5, false, 4),
];

/// Remaining cards. Drawn from the back, one per assassin turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut cards = CARDS.to_vec();
        cards.shuffle(rng);
        Deck { cards }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Deck { cards }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_shuffle_keeps_all_cards() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut deck = Deck::shuffled(&mut rng);
        assert_eq!(deck.len(), 15);

        let mut drawn = Vec::new();
        while let Some(c) = deck.draw() {
            drawn.push(c);
        }
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), None);

        let key = |c: &Card| (c.king_ap, c.knight_ap, c.fettered, c.population_ap);
        let mut expected = CARDS.to_vec();
        expected.sort_by_key(key);
        drawn.sort_by_key(key);
        assert_eq!(drawn, expected);
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = Deck::shuffled(&mut ChaCha8Rng::seed_from_u64(99));
        let b = Deck::shuffled(&mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
