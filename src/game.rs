//! # Game
//!
//! The top-level driver. `Game<R: Rng>` owns every player, the deck, the
//! injected generator, and at most one [`ActionPhase`] describing what it is
//! waiting on. `play` takes one wire string from whichever player is
//! currently owed a move, applies it, and walks forward through every
//! transition that doesn't need another external input before returning —
//! there is no suspended call stack or parent-pointer resolver anywhere in
//! this chain, just owned state moved from one field to the next. Grounded
//! on `rlcard/games/coup/coup.py`'s `Coup`/`GameOver` classes and the
//! top-level loop shape of `game.py`.

use rand::Rng;

use crate::action::{ActionKind, ActionPhase, ClaimContext, PendingAction, RevealReason};
use crate::block::{Block, BlockOutcome, BlockStep};
use crate::challenge::{Challenge, ChallengeOutcome, ChallengeStep};
use crate::deck::Deck;
use crate::error::{fault, CoupError, IllegalAction};
use crate::player::{Player, TraceEvent};
use crate::reveal::ForcedReveal;
use crate::role::Role;
use crate::state::{build_players, DealerState, GameState, Phase};
use crate::turn;
use crate::wire::{InitialAction, Keep, Response};

fn bad(reason: impl Into<String>) -> CoupError {
    CoupError::IllegalAction(IllegalAction::new(reason))
}

/// A Coup table of 2 to 6 players, driven one wire action at a time.
pub struct Game<R: Rng> {
    players: Vec<Player>,
    deck: Deck,
    rng: R,
    turn_player: usize,
    pending: Option<ActionPhase>,
    winner: Option<usize>,
}

impl<R: Rng> Game<R> {
    /// Deal a fresh game: 2 influences and 2 cash to each of `num_players`
    /// seats, drawn from a full 15-card deck using the supplied generator.
    /// The caller owns `rng`'s seed, so two games constructed with the same
    /// seed and fed the same action sequence produce bit-identical play.
    pub fn init_game(num_players: usize, mut rng: R) -> Game<R> {
        if !(2..=6).contains(&num_players) {
            fault(format!("coup requires 2-6 players, got {num_players}"));
        }
        let mut deck = Deck::full();
        let mut players = Vec::with_capacity(num_players);
        for _ in 0..num_players {
            let mut player = Player::new();
            player.hidden = deck.deal(2, &mut rng);
            players.push(player);
        }
        log::debug!("initialized {num_players}-player game");
        Game { players, deck, rng, turn_player: 0, pending: None, winner: None }
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The seat whose move it currently is, whether that's opening a turn,
    /// responding to a challenge or block window, choosing what to reveal,
    /// or choosing what to keep after an exchange.
    pub fn player_to_act(&self) -> usize {
        match &self.pending {
            None => self.turn_player,
            Some(ActionPhase::Challenge { challenge, .. }) => {
                challenge.next_responder().unwrap_or_else(|| fault("challenge window exhausted without resolving"))
            }
            Some(ActionPhase::Block { block, .. }) => {
                block.next_responder().unwrap_or_else(|| fault("block window exhausted without resolving"))
            }
            Some(ActionPhase::BlockChallenge { challenge, .. }) => challenge
                .next_responder()
                .unwrap_or_else(|| fault("block-challenge window exhausted without resolving")),
            Some(ActionPhase::ForcedReveal { reveal, .. }) => reveal.player,
            Some(ActionPhase::ChooseKeep { player, .. }) => *player,
        }
    }

    /// Every wire string `player_to_act()` may legally play right now. At
    /// the start of a turn this is returned as a sorted set; every other
    /// phase's option list is already in a fixed, small, stable order.
    pub fn legal_actions(&self) -> Vec<String> {
        match &self.pending {
            None => {
                let mut out: Vec<String> =
                    turn::legal_actions(self.turn_player, &self.players).iter().map(InitialAction::to_wire).collect();
                out.sort();
                out
            }
            Some(ActionPhase::Challenge { .. }) | Some(ActionPhase::BlockChallenge { .. }) => {
                vec![Response::Pass.to_wire(), Response::Challenge.to_wire()]
            }
            Some(ActionPhase::Block { action, .. }) => {
                let mut out = vec![Response::Pass.to_wire()];
                out.extend(action.kind.blocking_roles().iter().map(|r| Response::Block(*r).to_wire()));
                out
            }
            Some(ActionPhase::ForcedReveal { reveal, .. }) => {
                let mut roles = self.players[reveal.player].hidden.clone();
                roles.sort();
                roles.dedup();
                roles.into_iter().map(|r| format!("reveal:{r}")).collect()
            }
            Some(ActionPhase::ChooseKeep { pool, keep_count, .. }) => {
                combinations(pool, *keep_count).into_iter().map(|combo| Keep(combo).to_wire()).collect()
            }
        }
    }

    /// A perfect-information snapshot of the table.
    pub fn state(&self) -> GameState {
        let phase = match &self.pending {
            None => Phase::AwaitInitialAction { player: self.turn_player },
            Some(ActionPhase::Challenge { action, challenge }) => Phase::AwaitChallenge {
                player: challenge.next_responder().unwrap_or_else(|| fault("challenge window exhausted")),
                actor: action.actor,
                role: challenge.claim(),
            },
            Some(ActionPhase::Block { action, block }) => Phase::AwaitBlock {
                player: block.next_responder().unwrap_or_else(|| fault("block window exhausted")),
                actor: action.actor,
                action: action.kind,
            },
            Some(ActionPhase::BlockChallenge { blocker, challenge, .. }) => Phase::AwaitBlockChallenge {
                player: challenge.next_responder().unwrap_or_else(|| fault("block-challenge window exhausted")),
                blocker: *blocker,
                role: challenge.claim(),
            },
            Some(ActionPhase::ForcedReveal { reveal, .. }) => Phase::AwaitForcedReveal { player: reveal.player },
            Some(ActionPhase::ChooseKeep { player, pool, .. }) => Phase::AwaitKeep { player: *player, pool: pool.clone() },
        };
        let phase = if let Some(winner) = self.winner { Phase::GameOver { winner } } else { phase };
        GameState {
            phase,
            turn_player: self.turn_player,
            players: build_players(&self.players),
            dealer: DealerState { deck: self.deck.peek() },
        }
    }

    /// Apply one wire action from `player`. Errors are recoverable: state is
    /// left exactly as it was and the caller may retry with a different
    /// string.
    pub fn play(&mut self, player: usize, wire: &str) -> Result<(), CoupError> {
        if self.is_over() {
            return Err(bad("the game is already over"));
        }
        if player != self.player_to_act() {
            return Err(bad(format!("it is not player {player}'s turn to act")));
        }
        let phase = self.pending.take();
        match phase {
            None => {
                let initial = InitialAction::parse(wire)?;
                let action = turn::validate_initial(&initial, player, &self.players)?;
                self.begin_action(action)
            }
            Some(ActionPhase::Challenge { action, mut challenge }) => {
                let response = match Response::parse(wire) {
                    Ok(r) => r,
                    Err(e) => {
                        self.pending = Some(ActionPhase::Challenge { action, challenge });
                        return Err(e.into());
                    }
                };
                match challenge.respond(player, response) {
                    Ok(ChallengeStep::Continue) => {
                        self.pending = Some(ActionPhase::Challenge { action, challenge });
                        Ok(())
                    }
                    Ok(ChallengeStep::ReadyToResolve) => {
                        let outcome = challenge.resolve(&mut self.players, &mut self.deck, &mut self.rng);
                        self.resolve_challenge_outcome(action, outcome)
                    }
                    Err(e) => {
                        self.pending = Some(ActionPhase::Challenge { action, challenge });
                        Err(e.into())
                    }
                }
            }
            Some(ActionPhase::Block { action, mut block }) => {
                let response = match Response::parse(wire) {
                    Ok(r) => r,
                    Err(e) => {
                        self.pending = Some(ActionPhase::Block { action, block });
                        return Err(e.into());
                    }
                };
                match block.respond(player, response) {
                    Ok(BlockStep::Continue) => {
                        self.pending = Some(ActionPhase::Block { action, block });
                        Ok(())
                    }
                    Ok(BlockStep::ReadyToResolve) => {
                        let outcome = block.resolve(&mut self.rng);
                        self.resolve_block_outcome(action, outcome)
                    }
                    Err(e) => {
                        self.pending = Some(ActionPhase::Block { action, block });
                        Err(e.into())
                    }
                }
            }
            Some(ActionPhase::BlockChallenge { action, blocker, claim, mut challenge }) => {
                let response = match Response::parse(wire) {
                    Ok(r) => r,
                    Err(e) => {
                        self.pending = Some(ActionPhase::BlockChallenge { action, blocker, claim, challenge });
                        return Err(e.into());
                    }
                };
                match challenge.respond(player, response) {
                    Ok(ChallengeStep::Continue) => {
                        self.pending = Some(ActionPhase::BlockChallenge { action, blocker, claim, challenge });
                        Ok(())
                    }
                    Ok(ChallengeStep::ReadyToResolve) => {
                        let outcome = challenge.resolve(&mut self.players, &mut self.deck, &mut self.rng);
                        self.resolve_block_challenge_outcome(action, blocker, outcome)
                    }
                    Err(e) => {
                        self.pending = Some(ActionPhase::BlockChallenge { action, blocker, claim, challenge });
                        Err(e.into())
                    }
                }
            }
            Some(ActionPhase::ForcedReveal { reveal, reason, action }) => {
                let role = match wire.strip_prefix("reveal:") {
                    Some(role_name) => match Role::parse_wire(role_name) {
                        Some(role) => role,
                        None => {
                            let err = bad(format!("unknown role {role_name:?}"));
                            self.pending = Some(ActionPhase::ForcedReveal { reveal, reason, action });
                            return Err(err);
                        }
                    },
                    None => {
                        let err = bad("expected reveal:<role>");
                        self.pending = Some(ActionPhase::ForcedReveal { reveal, reason, action });
                        return Err(err);
                    }
                };
                match reveal.resolve(role, &mut self.players) {
                    Ok(()) => self.after_forced_reveal(reason, action),
                    Err(e) => {
                        self.pending = Some(ActionPhase::ForcedReveal { reveal, reason, action });
                        Err(e.into())
                    }
                }
            }
            Some(ActionPhase::ChooseKeep { player: p, pool, keep_count }) => {
                let keep = match Keep::parse(wire) {
                    Ok(k) => k,
                    Err(e) => {
                        self.pending = Some(ActionPhase::ChooseKeep { player: p, pool, keep_count });
                        return Err(e.into());
                    }
                };
                match self.resolve_keep(p, pool.clone(), keep_count, keep) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        self.pending = Some(ActionPhase::ChooseKeep { player: p, pool, keep_count });
                        Err(e)
                    }
                }
            }
        }
    }

    fn begin_action(&mut self, action: PendingAction) -> Result<(), CoupError> {
        log::debug!("player {} opens with {:?} (target {:?})", action.actor, action.kind, action.target);
        if let Some(claim) = action.kind.claim() {
            let responders = self.seat_order_from(action.actor);
            if responders.is_empty() {
                fault("no living opponents to open a challenge window against");
            }
            let challenge = Challenge::new(action.actor, claim, responders, &mut self.players);
            self.pending = Some(ActionPhase::Challenge { action, challenge });
            Ok(())
        } else {
            self.proceed_after_challenge(action)
        }
    }

    /// Reached either because the action was never challengeable, or a
    /// challenge against it just resolved in the actor's favor. Pays the
    /// action's cost (if any), independent of whether a block later
    /// succeeds, then opens a block window or applies the effect directly.
    fn proceed_after_challenge(&mut self, action: PendingAction) -> Result<(), CoupError> {
        if let Some(target) = action.target {
            if !self.players[target].is_alive() {
                log::debug!("target {target} was eliminated before {:?} could resolve; it fizzles", action.kind);
                return self.end_turn();
            }
        }
        let cost = action.kind.cost();
        if cost > 0 {
            let removed = self.players[action.actor].deduct_cash(cost);
            if removed != cost {
                fault("actor could not afford an action already validated as affordable");
            }
        }
        if action.kind.is_blockable() {
            let candidates = match action.kind {
                ActionKind::ForeignAid => self.seat_order_from(action.actor),
                ActionKind::Steal | ActionKind::Assassinate => {
                    vec![action.target.unwrap_or_else(|| fault("blockable targeted action missing target"))]
                }
                _ => fault("is_blockable true for an action with no candidate rule"),
            };
            let block = Block::new(candidates, action.kind.blocking_roles().to_vec());
            self.pending = Some(ActionPhase::Block { action, block });
            Ok(())
        } else {
            self.apply_effect(action)
        }
    }

    fn resolve_challenge_outcome(&mut self, action: PendingAction, outcome: ChallengeOutcome) -> Result<(), CoupError> {
        match outcome {
            ChallengeOutcome::NotChallenged => self.proceed_after_challenge(action),
            ChallengeOutcome::ClaimProved { challengers } => {
                self.begin_challenge_cascade(challengers, ClaimContext::ActionClaim, Some(action))
            }
            ChallengeOutcome::ClaimBluffed { claimant } => {
                self.begin_forced_reveal(claimant, RevealReason::Bluffed { context: ClaimContext::ActionClaim }, Some(action))
            }
        }
    }

    fn resolve_block_outcome(&mut self, action: PendingAction, outcome: BlockOutcome) -> Result<(), CoupError> {
        match outcome {
            BlockOutcome::NotBlocked => self.apply_effect(action),
            BlockOutcome::Blocked { blocker, claim } => {
                let responders = self.seat_order_from(blocker);
                if responders.is_empty() {
                    fault("no living players to challenge a block");
                }
                let challenge = Challenge::new(blocker, claim, responders, &mut self.players);
                self.pending = Some(ActionPhase::BlockChallenge { action, blocker, claim, challenge });
                Ok(())
            }
        }
    }

    fn resolve_block_challenge_outcome(
        &mut self,
        action: PendingAction,
        blocker: usize,
        outcome: ChallengeOutcome,
    ) -> Result<(), CoupError> {
        match outcome {
            // the block stands unchallenged; the original action is cancelled.
            ChallengeOutcome::NotChallenged => self.end_turn(),
            ChallengeOutcome::ClaimProved { challengers } => {
                self.begin_challenge_cascade(challengers, ClaimContext::BlockClaim, Some(action))
            }
            ChallengeOutcome::ClaimBluffed { claimant } => {
                debug_assert_eq!(claimant, blocker);
                self.begin_forced_reveal(blocker, RevealReason::Bluffed { context: ClaimContext::BlockClaim }, Some(action))
            }
        }
    }

    fn begin_forced_reveal(
        &mut self,
        player: usize,
        reason: RevealReason,
        action: Option<PendingAction>,
    ) -> Result<(), CoupError> {
        self.pending = Some(ActionPhase::ForcedReveal { reveal: ForcedReveal { player }, reason, action });
        Ok(())
    }

    /// A claim was proven true against one or more challengers: they each
    /// owe a reveal, one at a time, in the order they challenged. Opens the
    /// first; `after_forced_reveal` threads the rest through as each
    /// resolves.
    fn begin_challenge_cascade(
        &mut self,
        mut challengers: Vec<usize>,
        context: ClaimContext,
        action: Option<PendingAction>,
    ) -> Result<(), CoupError> {
        if challengers.is_empty() {
            fault("claim proved with no recorded challengers");
        }
        let first = challengers.remove(0);
        self.begin_forced_reveal(first, RevealReason::ChallengeLost { remaining: challengers, context }, action)
    }

    fn after_forced_reveal(&mut self, reason: RevealReason, action: Option<PendingAction>) -> Result<(), CoupError> {
        match reason {
            RevealReason::Bluffed { context } => match context {
                ClaimContext::ActionClaim => {
                    let action = action.unwrap_or_else(|| fault("action-bluff reveal missing action context"));
                    log::debug!("player {} bluffed {:?} and was caught", action.actor, action.kind);
                    self.end_turn()
                }
                ClaimContext::BlockClaim => {
                    let action = action.unwrap_or_else(|| fault("block-bluff reveal missing action context"));
                    self.apply_effect(action)
                }
            },
            RevealReason::ChallengeLost { mut remaining, context } => {
                if let Some(next) = remaining.first().copied() {
                    remaining.remove(0);
                    self.begin_forced_reveal(next, RevealReason::ChallengeLost { remaining, context }, action)
                } else {
                    match context {
                        ClaimContext::ActionClaim => {
                            let action = action.unwrap_or_else(|| fault("challenge-cascade reveal missing action context"));
                            self.proceed_after_challenge(action)
                        }
                        ClaimContext::BlockClaim => self.end_turn(),
                    }
                }
            }
            RevealReason::Assassinated | RevealReason::Couped => self.end_turn(),
        }
    }

    fn apply_effect(&mut self, action: PendingAction) -> Result<(), CoupError> {
        match action.kind {
            ActionKind::Income => {
                self.players[action.actor].add_cash(1);
                self.end_turn()
            }
            ActionKind::ForeignAid => {
                self.players[action.actor].add_cash(2);
                self.end_turn()
            }
            ActionKind::Tax => {
                self.players[action.actor].add_cash(3);
                self.end_turn()
            }
            ActionKind::Exchange => {
                let keep_count = self.players[action.actor].hidden.len();
                let drawn = self.deck.deal(2, &mut self.rng);
                let mut pool = std::mem::take(&mut self.players[action.actor].hidden);
                pool.extend(drawn);
                self.players[action.actor].record(TraceEvent::Exchange);
                self.pending = Some(ActionPhase::ChooseKeep { player: action.actor, pool, keep_count });
                Ok(())
            }
            ActionKind::Steal => {
                let target = action.target.unwrap_or_else(|| fault("steal missing target"));
                let taken = self.players[target].deduct_cash(2);
                self.players[action.actor].add_cash(taken);
                self.end_turn()
            }
            ActionKind::Assassinate => {
                let target = action.target.unwrap_or_else(|| fault("assassinate missing target"));
                self.begin_forced_reveal(target, RevealReason::Assassinated, None)
            }
            ActionKind::Coup => {
                let target = action.target.unwrap_or_else(|| fault("coup missing target"));
                self.begin_forced_reveal(target, RevealReason::Couped, None)
            }
        }
    }

    fn resolve_keep(&mut self, player: usize, pool: Vec<Role>, keep_count: usize, keep: Keep) -> Result<(), CoupError> {
        if keep.0.len() != keep_count {
            return Err(bad(format!("must keep exactly {keep_count} role(s)")));
        }
        let mut remaining = pool.clone();
        for role in &keep.0 {
            let pos =
                remaining.iter().position(|r| r == role).ok_or_else(|| bad(format!("{role} is not available to keep")))?;
            remaining.remove(pos);
        }
        self.players[player].hidden = keep.0;
        self.deck.return_cards(remaining, &mut self.rng);
        self.end_turn()
    }

    fn end_turn(&mut self) -> Result<(), CoupError> {
        self.pending = None;
        let alive: Vec<usize> = (0..self.players.len()).filter(|&i| self.players[i].is_alive()).collect();
        if alive.len() <= 1 {
            self.winner = alive.first().copied();
            log::debug!("game over, winner {:?}", self.winner);
            return Ok(());
        }
        self.turn_player = self.next_living_after(self.turn_player);
        Ok(())
    }

    /// The next living seat after `from`, wrapping around the table.
    /// Unreachable in a game that isn't already over, since `end_turn`
    /// declares the game over once at most one player remains.
    fn next_living_after(&self, from: usize) -> usize {
        let n = self.players.len();
        for step in 1..=n {
            let idx = (from + step) % n;
            if self.players[idx].is_alive() {
                return idx;
            }
        }
        fault("no living players to advance the turn to")
    }

    /// Living players other than `from`, seated in order starting right
    /// after `from` and wrapping around the table.
    fn seat_order_from(&self, from: usize) -> Vec<usize> {
        let n = self.players.len();
        (1..n).map(|step| (from + step) % n).filter(|&i| self.players[i].is_alive()).collect()
    }
}

/// All size-`k` sub-multisets of `pool`, deduplicated by the roles they
/// contain rather than by which positions in `pool` they came from (two
/// Dukes in the pool shouldn't produce two identical "keep the Duke"
/// options).
fn combinations(pool: &[Role], k: usize) -> Vec<Vec<Role>> {
    fn helper(pool: &[Role], k: usize, start: usize, cur: &mut Vec<Role>, out: &mut Vec<Vec<Role>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..pool.len() {
            cur.push(pool[i]);
            helper(pool, k, i + 1, cur, out);
            cur.pop();
        }
    }
    let mut out = Vec::new();
    helper(pool, k, 0, &mut Vec::new(), &mut out);
    for combo in &mut out {
        combo.sort_by_key(|r| r.wire_name());
    }
    out.sort_by(|a, b| a.iter().map(Role::wire_name).cmp(b.iter().map(Role::wire_name)));
    out.dedup();
    out
}
