//! # Block
//!
//! The window opened after a blockable action when no one (or everyone)
//! has had a chance to interpose a counter-claim. Grounded on
//! `rlcard/games/coup/coup.py`'s `Block` class. Unlike a challenge, more
//! than one player can be eligible to block foreign aid, so this window
//! polls every eligible candidate before resolving, and arbitrates between
//! simultaneous offers via [`crate::deck::Deck::choose`] rather than taking
//! whichever happened to be asked first.

use rand::Rng;

use crate::deck::Deck;
use crate::error::{fault, IllegalAction};
use crate::role::Role;
use crate::wire::Response;

/// Whether the window is still collecting responses or every candidate has
/// answered and it's ready for [`Block::resolve`].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum BlockStep {
    Continue,
    ReadyToResolve,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum BlockOutcome {
    NotBlocked,
    Blocked { blocker: usize, claim: Role },
}

/// An open block window. `allowed_roles` restricts which role a blocker may
/// claim (e.g. only Duke for foreign aid; Captain or Ambassador for steal).
#[derive(Clone, Debug)]
pub struct Block {
    candidates: Vec<usize>,
    allowed_roles: Vec<Role>,
    offers: Vec<(usize, Role)>,
    next: usize,
}

impl Block {
    pub fn new(candidates: Vec<usize>, allowed_roles: Vec<Role>) -> Block {
        Block { candidates, allowed_roles, offers: Vec::new(), next: 0 }
    }

    pub fn next_responder(&self) -> Option<usize> {
        self.candidates.get(self.next).copied()
    }

    /// Record one candidate's response. Every candidate is asked regardless
    /// of earlier offers, since more than one of them may claim the block
    /// and the window needs every offer in hand before it can arbitrate.
    pub fn respond(&mut self, player: usize, response: Response) -> Result<BlockStep, IllegalAction> {
        let expected =
            self.next_responder().unwrap_or_else(|| fault("block window polled after it already resolved"));
        if player != expected {
            return Err(IllegalAction::new(format!("player {player} was not asked to respond to this block window")));
        }
        match response {
            Response::Pass => {
                self.next += 1;
            }
            Response::Block(role) => {
                if !self.allowed_roles.contains(&role) {
                    return Err(IllegalAction::new(format!("{role} cannot block this action")));
                }
                self.offers.push((player, role));
                self.next += 1;
            }
            _ => return Err(IllegalAction::new("expected pass or block:<role> here")),
        }
        if self.next_responder().is_some() {
            Ok(BlockStep::Continue)
        } else {
            Ok(BlockStep::ReadyToResolve)
        }
    }

    /// Resolve the window once every candidate has responded, arbitrating
    /// among simultaneous offers (more than one player claiming to block the
    /// same action) uniformly at random via the deck's arbiter.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> BlockOutcome {
        if self.next_responder().is_some() {
            fault("block window resolved before every candidate responded");
        }
        match self.offers.len() {
            0 => BlockOutcome::NotBlocked,
            1 => {
                let (blocker, claim) = self.offers[0];
                BlockOutcome::Blocked { blocker, claim }
            }
            _ => {
                let ids: Vec<usize> = self.offers.iter().map(|(p, _)| *p).collect();
                let chosen = Deck::choose(&ids, rng);
                let (blocker, claim) =
                    *self.offers.iter().find(|(p, _)| *p == chosen).unwrap_or_else(|| fault("chosen blocker vanished"));
                BlockOutcome::Blocked { blocker, claim }
            }
        }
    }
}
