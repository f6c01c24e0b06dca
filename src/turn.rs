//! # Turn validation
//!
//! Pure checks over a player list and a proposed initial action: mandatory
//! coup, affordability, and target legality. Grounded on
//! `rlcard/games/coup/coup.py`'s `Turn` class, split out from `Game` so the
//! rules over "what may I open with" don't need a live `Game` to test.

use crate::action::{ActionKind, PendingAction};
use crate::error::IllegalAction;
use crate::player::Player;
use crate::wire::InitialAction;

/// Ten cash or more and you must coup; no other action is legal.
pub const FORCED_COUP_THRESHOLD: u32 = 10;

pub fn must_coup(cash: u32) -> bool {
    cash >= FORCED_COUP_THRESHOLD
}

fn validate_target(target: usize, actor: usize, players: &[Player]) -> Result<(), IllegalAction> {
    if target == actor {
        return Err(IllegalAction::new("cannot target yourself"));
    }
    let victim = players.get(target).ok_or_else(|| IllegalAction::new(format!("no such player {target}")))?;
    if !victim.is_alive() {
        return Err(IllegalAction::new(format!("player {target} is already eliminated")));
    }
    Ok(())
}

fn kind_of(action: &InitialAction) -> ActionKind {
    match action {
        InitialAction::Income => ActionKind::Income,
        InitialAction::ForeignAid => ActionKind::ForeignAid,
        InitialAction::Tax => ActionKind::Tax,
        InitialAction::Exchange => ActionKind::Exchange,
        InitialAction::Steal(_) => ActionKind::Steal,
        InitialAction::Assassinate(_) => ActionKind::Assassinate,
        InitialAction::Coup(_) => ActionKind::Coup,
    }
}

/// Validate a freshly parsed initial action against the live game state and
/// turn it into a [`PendingAction`] ready to open.
pub fn validate_initial(
    action: &InitialAction,
    actor: usize,
    players: &[Player],
) -> Result<PendingAction, IllegalAction> {
    let kind = kind_of(action);
    if must_coup(players[actor].cash) && kind != ActionKind::Coup {
        return Err(IllegalAction::new("must coup at 10 cash or more"));
    }
    if !players[actor].can_afford(kind.cost()) {
        return Err(IllegalAction::new(format!("{kind:?} costs {} but only {} is available", kind.cost(), players[actor].cash)));
    }
    let target = action.target();
    match target {
        Some(t) => validate_target(t, actor, players)?,
        None if kind.requires_target() => return Err(IllegalAction::new(format!("{kind:?} requires a target"))),
        None => {}
    }
    Ok(PendingAction { kind, actor, target })
}

/// Every initial action `actor` may legally open with right now.
pub fn legal_actions(actor: usize, players: &[Player]) -> Vec<InitialAction> {
    let cash = players[actor].cash;
    let targets = || players.iter().enumerate().filter(|&(i, p)| i != actor && p.is_alive()).map(|(i, _)| i);

    if must_coup(cash) {
        return targets().map(InitialAction::Coup).collect();
    }

    let mut out = vec![InitialAction::Income, InitialAction::ForeignAid, InitialAction::Tax, InitialAction::Exchange];
    if cash >= ActionKind::Steal.cost() {
        out.extend(targets().map(InitialAction::Steal));
    }
    if cash >= ActionKind::Assassinate.cost() {
        out.extend(targets().map(InitialAction::Assassinate));
    }
    if cash >= ActionKind::Coup.cost() {
        out.extend(targets().map(InitialAction::Coup));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: usize) -> Vec<Player> {
        (0..n)
            .map(|_| {
                let mut p = Player::new();
                p.hidden = vec![crate::role::Role::Duke, crate::role::Role::Captain];
                p
            })
            .collect()
    }

    #[test]
    fn ten_cash_forces_coup_only() {
        let mut ps = players(3);
        ps[0].cash = 10;
        let actions = legal_actions(0, &ps);
        assert!(actions.iter().all(|a| matches!(a, InitialAction::Coup(_))));
        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn cannot_coup_a_dead_player() {
        let mut ps = players(3);
        ps[1].hidden.clear();
        let result = validate_initial(&InitialAction::Coup(1), 0, &ps);
        assert!(result.is_err());
    }

    #[test]
    fn cannot_afford_assassinate_with_two_cash() {
        let ps = players(2);
        assert!(validate_initial(&InitialAction::Assassinate(1), 0, &ps).is_err());
    }

    #[test]
    fn income_is_always_legal_under_threshold() {
        let ps = players(2);
        assert!(validate_initial(&InitialAction::Income, 0, &ps).is_ok());
    }
}
