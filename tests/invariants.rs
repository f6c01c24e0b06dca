//! Randomized legal play: whatever `legal_actions()` offers must always be
//! accepted, must never be empty before the game ends, and must never let
//! a player with 10+ cash do anything but coup.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use coup_core::{Game, Phase};

fn total_influence_and_deck(game: &Game<StdRng>) -> usize {
    let state = game.state();
    let in_hands: usize = state.players.iter().map(|p| p.hidden.len() + p.revealed.len()).sum();
    in_hands + state.dealer.deck.len()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

    #[test]
    fn random_legal_play_preserves_invariants(
        num_players in 2usize..=6,
        game_seed in any::<u64>(),
        driver_seed in any::<u64>(),
    ) {
        let mut game = Game::init_game(num_players, StdRng::seed_from_u64(game_seed));
        let mut driver = StdRng::seed_from_u64(driver_seed);
        let starting_cards = total_influence_and_deck(&game);

        let mut steps = 0;
        while !game.is_over() && steps < 500 {
            steps += 1;
            let actor = game.player_to_act();
            let options = game.legal_actions();
            prop_assert!(!options.is_empty(), "legal_actions must never be empty while the game is ongoing");

            if let Phase::AwaitInitialAction { player } = game.state().phase {
                if game.players()[player].cash >= 10 {
                    prop_assert!(
                        options.iter().all(|o| o.starts_with("coup:")),
                        "10 cash or more must force a coup"
                    );
                }
            }

            let choice = options[driver.random_range(0..options.len())].clone();
            game.play(actor, &choice).expect("a legal_actions()-sourced move must always be accepted");

            prop_assert_eq!(
                total_influence_and_deck(&game),
                starting_cards,
                "total influence cards across hands and deck must be conserved"
            );
            for player in game.players() {
                prop_assert!(player.cash < 1_000, "cash should never run away unboundedly");
            }
        }

        if game.is_over() {
            let alive = game.players().iter().filter(|p| p.is_alive()).count();
            prop_assert_eq!(alive, 1, "game over implies exactly one player remains alive");
        }
    }
}
