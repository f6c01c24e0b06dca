//! # Challenge
//!
//! The window opened whenever a player claims a role-gated action (or a
//! block): every other living player, asked in seat order, may pass or
//! challenge. Grounded on `rlcard/games/coup/coup.py`'s `Challenge` class.
//! Every living responder is polled before the window resolves — more than
//! one of them may challenge the same claim, and if the claim turns out to
//! be true every one of them owes a reveal, each in turn order, before play
//! continues. The cascade that follows (one reveal at a time, never more
//! than one in flight) is handled by the caller threading the remaining
//! challengers back through another forced reveal, rather than by this
//! module holding a pointer back into the parent action.

use rand::Rng;

use crate::deck::Deck;
use crate::error::{fault, IllegalAction};
use crate::player::{Player, TraceEvent};
use crate::role::Role;
use crate::wire::Response;

/// Whether the window is still collecting responses or every candidate has
/// answered and it's ready for [`Challenge::resolve`].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ChallengeStep {
    Continue,
    ReadyToResolve,
}

/// How a challenge window concluded.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ChallengeOutcome {
    /// Every eligible player passed; the claim stands unchallenged.
    NotChallenged,
    /// At least one player challenged and the claimant actually held the
    /// role. The claimant's card is reshuffled into the deck and replaced;
    /// every player in `challengers` (in the order they challenged) now owes
    /// a forced reveal.
    ClaimProved { challengers: Vec<usize> },
    /// At least one player challenged and the claimant was bluffing;
    /// `claimant` now owes a forced reveal and whatever they claimed to do
    /// is cancelled.
    ClaimBluffed { claimant: usize },
}

/// An open challenge window against a single claim.
#[derive(Clone, Debug)]
pub struct Challenge {
    actor: usize,
    claim: Role,
    responders: Vec<usize>,
    next: usize,
    challengers: Vec<usize>,
}

impl Challenge {
    /// Open a window against `actor`'s claim to hold `claim`, to be polled
    /// in the order given by `responders` (living players, seated after the
    /// claimant, wrapping). Records the claim on the actor's trace.
    pub fn new(actor: usize, claim: Role, responders: Vec<usize>, players: &mut [Player]) -> Challenge {
        players[actor].record(TraceEvent::Claim(claim));
        Challenge { actor, claim, responders, next: 0, challengers: Vec::new() }
    }

    pub fn actor(&self) -> usize {
        self.actor
    }

    pub fn claim(&self) -> Role {
        self.claim
    }

    /// The player expected to respond next, or `None` once everyone owed a
    /// turn has answered.
    pub fn next_responder(&self) -> Option<usize> {
        self.responders.get(self.next).copied()
    }

    /// Record one candidate's pass/challenge. Every responder is asked
    /// regardless of an earlier challenge, since more than one player may
    /// challenge the same claim and the window needs every challenger in
    /// hand before it can resolve.
    pub fn respond(&mut self, player: usize, response: Response) -> Result<ChallengeStep, IllegalAction> {
        let expected =
            self.next_responder().unwrap_or_else(|| fault("challenge window polled after it already resolved"));
        if player != expected {
            return Err(IllegalAction::new(format!("player {player} was not asked to respond to this claim")));
        }
        match response {
            Response::Pass => {
                self.next += 1;
            }
            Response::Challenge => {
                self.challengers.push(player);
                self.next += 1;
            }
            _ => return Err(IllegalAction::new("expected pass or challenge here")),
        }
        if self.next_responder().is_some() {
            Ok(ChallengeStep::Continue)
        } else {
            Ok(ChallengeStep::ReadyToResolve)
        }
    }

    /// Resolve the window once every candidate has responded: reshuffle and
    /// redraw the claimant's card if the claim held up (every challenger was
    /// wrong), otherwise report the claimant as the one who must reveal.
    pub fn resolve<R: Rng + ?Sized>(&self, players: &mut [Player], deck: &mut Deck, rng: &mut R) -> ChallengeOutcome {
        if self.next_responder().is_some() {
            fault("challenge window resolved before every candidate responded");
        }
        if self.challengers.is_empty() {
            return ChallengeOutcome::NotChallenged;
        }
        if players[self.actor].has_role(self.claim) {
            let pos = players[self.actor]
                .hidden
                .iter()
                .position(|&r| r == self.claim)
                .unwrap_or_else(|| fault("has_role true but role missing from hand"));
            players[self.actor].hidden.remove(pos);
            deck.return_cards(vec![self.claim], rng);
            let redrawn = deck.deal(1, rng);
            players[self.actor].hidden.extend(redrawn);
            ChallengeOutcome::ClaimProved { challengers: self.challengers.clone() }
        } else {
            ChallengeOutcome::ClaimBluffed { claimant: self.actor }
        }
    }
}
