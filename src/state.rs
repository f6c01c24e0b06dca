//! # External state
//!
//! The perfect-information snapshot handed back to callers between moves.
//! Grounded on `rlcard/games/coup/coup.py`'s `get_state` dict shapes: one
//! block per player (cash, hidden, revealed, trace) plus a dealer block
//! exposing the raw deck. Nothing here is hidden from the caller — this
//! crate hands out full information and leaves observation masking to
//! whatever sits on top of it.

use crate::action::ActionKind;
use crate::player::{Player, TraceEvent};
use crate::role::Role;

/// What the engine is waiting on.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Phase {
    /// `player` must open the turn with an initial action.
    AwaitInitialAction { player: usize },
    /// `player` must pass or challenge `actor`'s claimed `role`.
    AwaitChallenge { player: usize, actor: usize, role: Role },
    /// `player` may pass or block `actor`'s `action` with one of its
    /// blocking roles.
    AwaitBlock { player: usize, actor: usize, action: ActionKind },
    /// `player` must pass or challenge `blocker`'s claimed `role`.
    AwaitBlockChallenge { player: usize, blocker: usize, role: Role },
    /// `player` must choose which hidden role to reveal.
    AwaitForcedReveal { player: usize },
    /// `player` must choose which roles to keep after an exchange, out of
    /// `pool` (their original hand plus the two cards just drawn).
    AwaitKeep { player: usize, pool: Vec<Role> },
    GameOver { winner: usize },
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PlayerState {
    pub cash: u32,
    pub hidden_count: usize,
    pub hidden: Vec<Role>,
    pub revealed: Vec<Role>,
    pub trace: Vec<TraceEvent>,
    pub alive: bool,
}

impl PlayerState {
    fn from_player(player: &Player) -> PlayerState {
        PlayerState {
            cash: player.cash,
            hidden_count: player.hidden.len(),
            hidden: player.hidden.clone(),
            revealed: player.revealed.clone(),
            trace: player.trace.clone(),
            alive: player.is_alive(),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DealerState {
    pub deck: Vec<Role>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GameState {
    pub phase: Phase,
    pub turn_player: usize,
    pub players: Vec<PlayerState>,
    pub dealer: DealerState,
}

pub(crate) fn build_players(players: &[Player]) -> Vec<PlayerState> {
    players.iter().map(PlayerState::from_player).collect()
}
