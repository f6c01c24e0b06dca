//! # Deck
//!
//! The face-down stack of un-dealt and returned influence cards. Grounded on
//! `rlcard/games/coup/dealer.py`: a flat multiset of `Role`, shuffled on
//! every operation that exposes an ordering to a player (deal, exchange
//! return, block arbitration). The deck never stores its own RNG — every
//! shuffling method takes `&mut impl rand::Rng` so the only generator in a
//! game is the one `Game` owns, keeping replay deterministic from a single
//! seed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::fault;
use crate::role::{Role, ALL_ROLES};

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Deck {
    cards: Vec<Role>,
}

impl Deck {
    /// A full box: 3 copies of each of the 5 roles, 15 cards.
    pub fn full() -> Deck {
        let mut cards = Vec::with_capacity(15);
        for role in ALL_ROLES {
            cards.extend([role, role, role]);
        }
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The deck's contents as they stand, exposed whole to callers — this
    /// crate hands out full information and leaves any hiding to whatever
    /// sits on top of it.
    pub fn peek(&self) -> Vec<Role> {
        self.cards.clone()
    }

    /// Shuffle and draw `n` cards, removing them from the deck.
    pub fn deal<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Vec<Role> {
        if n > self.cards.len() {
            fault(format!("dealt {n} cards from a deck of {}", self.cards.len()));
        }
        self.cards.shuffle(rng);
        self.cards.split_off(self.cards.len() - n)
    }

    /// Return cards to the deck (e.g. the unkept half of an exchange, or a
    /// revealed-but-replaced influence) and reshuffle.
    pub fn return_cards<R: Rng + ?Sized>(&mut self, cards: Vec<Role>, rng: &mut R) {
        self.cards.extend(cards);
        self.cards.shuffle(rng);
    }

    /// Arbitrate among several candidate roles with no further information:
    /// used when more than one player offers to block with a role nobody
    /// can otherwise distinguish between. Picks uniformly at random.
    pub fn choose<R: Rng + ?Sized>(candidates: &[usize], rng: &mut R) -> usize {
        if candidates.is_empty() {
            fault("choose called with no candidates");
        }
        candidates[rng.random_range(0..candidates.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn full_deck_has_three_of_each_role() {
        let deck = Deck::full();
        assert_eq!(deck.len(), 15);
        for role in ALL_ROLES {
            assert_eq!(deck.cards.iter().filter(|&&r| r == role).count(), 3);
        }
    }

    #[test]
    fn deal_removes_cards_from_deck() {
        let mut deck = Deck::full();
        let mut rng = StdRng::seed_from_u64(7);
        let hand = deck.deal(2, &mut rng);
        assert_eq!(hand.len(), 2);
        assert_eq!(deck.len(), 13);
    }

    #[test]
    fn deal_and_return_conserves_total() {
        let mut deck = Deck::full();
        let mut rng = StdRng::seed_from_u64(1);
        let hand = deck.deal(3, &mut rng);
        deck.return_cards(hand, &mut rng);
        assert_eq!(deck.len(), 15);
    }

    #[test]
    fn same_seed_deals_same_hand() {
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let mut deck_a = Deck::full();
        let mut deck_b = Deck::full();
        assert_eq!(deck_a.deal(4, &mut rng_a), deck_b.deal(4, &mut rng_b));
    }
}
