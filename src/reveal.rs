//! # Forced reveal
//!
//! The single step of a player giving up one hidden influence: losing a
//! challenge, being assassinated, or being couped. Grounded on
//! `rlcard/games/coup/coup.py`'s `Reveal` class — here reduced to the one
//! thing it actually does once the caller has already decided who must
//! reveal and why (that bookkeeping lives in `action.rs`/`game.rs`).

use crate::error::IllegalAction;
use crate::player::{Player, TraceEvent};
use crate::role::Role;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ForcedReveal {
    pub player: usize,
}

impl ForcedReveal {
    /// Move `role` from the player's hidden hand to their revealed pile.
    /// Fails if the player isn't actually holding that role — the caller is
    /// expected to have offered only roles drawn from the player's own hand.
    pub fn resolve(&self, role: Role, players: &mut [Player]) -> Result<(), IllegalAction> {
        let player = &mut players[self.player];
        let pos = player
            .hidden
            .iter()
            .position(|&r| r == role)
            .ok_or_else(|| IllegalAction::new(format!("player {} does not hold {role}", self.player)))?;
        let revealed = player.hidden.remove(pos);
        player.revealed.push(revealed);
        player.record(TraceEvent::Reveal(revealed));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_moves_card_from_hidden_to_revealed() {
        let mut players = vec![Player::new()];
        players[0].hidden = vec![Role::Duke, Role::Captain];
        let reveal = ForcedReveal { player: 0 };
        reveal.resolve(Role::Duke, &mut players).unwrap();
        assert_eq!(players[0].hidden, vec![Role::Captain]);
        assert_eq!(players[0].revealed, vec![Role::Duke]);
        assert_eq!(players[0].trace, vec![TraceEvent::Reveal(Role::Duke)]);
    }

    #[test]
    fn reveal_rejects_role_not_held() {
        let mut players = vec![Player::new()];
        players[0].hidden = vec![Role::Duke];
        let reveal = ForcedReveal { player: 0 };
        assert!(reveal.resolve(Role::Contessa, &mut players).is_err());
    }
}
