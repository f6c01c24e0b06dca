//! # Wire format
//!
//! Parsing and formatting for the flat action strings agents exchange with
//! the engine. Grounded on `rlcard/games/coup/constants.py`'s action name
//! table and `coup.py`'s `ACTION_RE`, resyntaxed onto a colon grammar instead
//! of the source's regex one — the grammar is ours, the role/action
//! vocabulary is theirs.
//!
//! ```text
//! income | foreign_aid | tax | exchange
//! steal:<player> | assassinate:<player> | coup:<player>
//! pass | challenge
//! block:<role>
//! reveal:<role>
//! keep:<role>[,<role>]
//! ```

use crate::error::IllegalAction;
use crate::role::Role;

/// An initial action opening a turn.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum InitialAction {
    Income,
    ForeignAid,
    Tax,
    Exchange,
    Steal(usize),
    Assassinate(usize),
    Coup(usize),
}

/// A response to a pending challenge or block window.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Response {
    Pass,
    Challenge,
    Block(Role),
    Reveal(Role),
}

/// The card(s) kept after an exchange, already sorted and deduplicated by
/// position (not by role identity — a player may keep two Dukes).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Keep(pub Vec<Role>);

fn bad(reason: impl Into<String>) -> IllegalAction {
    IllegalAction::new(reason)
}

fn parse_target(rest: &str) -> Result<usize, IllegalAction> {
    rest.parse::<usize>().map_err(|_| bad(format!("bad player index {rest:?}")))
}

impl InitialAction {
    pub fn parse(s: &str) -> Result<InitialAction, IllegalAction> {
        match s.split_once(':') {
            None => match s {
                "income" => Ok(InitialAction::Income),
                "foreign_aid" => Ok(InitialAction::ForeignAid),
                "tax" => Ok(InitialAction::Tax),
                "exchange" => Ok(InitialAction::Exchange),
                other => Err(bad(format!("unknown initial action {other:?}"))),
            },
            Some(("steal", rest)) => Ok(InitialAction::Steal(parse_target(rest)?)),
            Some(("assassinate", rest)) => Ok(InitialAction::Assassinate(parse_target(rest)?)),
            Some(("coup", rest)) => Ok(InitialAction::Coup(parse_target(rest)?)),
            Some((other, _)) => Err(bad(format!("unknown targeted action {other:?}"))),
        }
    }

    pub fn target(&self) -> Option<usize> {
        match *self {
            InitialAction::Steal(p) | InitialAction::Assassinate(p) | InitialAction::Coup(p) => Some(p),
            _ => None,
        }
    }

    pub fn to_wire(&self) -> String {
        match self {
            InitialAction::Income => "income".to_string(),
            InitialAction::ForeignAid => "foreign_aid".to_string(),
            InitialAction::Tax => "tax".to_string(),
            InitialAction::Exchange => "exchange".to_string(),
            InitialAction::Steal(p) => format!("steal:{p}"),
            InitialAction::Assassinate(p) => format!("assassinate:{p}"),
            InitialAction::Coup(p) => format!("coup:{p}"),
        }
    }
}

impl Response {
    pub fn parse(s: &str) -> Result<Response, IllegalAction> {
        match s.split_once(':') {
            None if s == "pass" => Ok(Response::Pass),
            None if s == "challenge" => Ok(Response::Challenge),
            None => Err(bad(format!("unknown response {s:?}"))),
            Some(("block", role)) => {
                Role::parse_wire(role).map(Response::Block).ok_or_else(|| bad(format!("unknown role {role:?}")))
            }
            Some(("reveal", role)) => {
                Role::parse_wire(role).map(Response::Reveal).ok_or_else(|| bad(format!("unknown role {role:?}")))
            }
            Some((other, _)) => Err(bad(format!("unknown response {other:?}"))),
        }
    }

    pub fn to_wire(&self) -> String {
        match self {
            Response::Pass => "pass".to_string(),
            Response::Challenge => "challenge".to_string(),
            Response::Block(role) => format!("block:{role}"),
            Response::Reveal(role) => format!("reveal:{role}"),
        }
    }
}

impl Keep {
    /// Parse a `keep:role[,role]` payload (the part after `keep:`), sorting
    /// the result so two agents who list the same multiset in different
    /// orders produce the same canonical `Keep`.
    pub fn parse(s: &str) -> Result<Keep, IllegalAction> {
        let payload = s.strip_prefix("keep:").ok_or_else(|| bad(format!("expected keep:..., got {s:?}")))?;
        let mut roles = Vec::new();
        for token in payload.split(',') {
            let role = Role::parse_wire(token).ok_or_else(|| bad(format!("unknown role {token:?}")))?;
            roles.push(role);
        }
        if roles.is_empty() {
            return Err(bad("keep requires at least one role"));
        }
        roles.sort_by_key(|r| r.wire_name());
        Ok(Keep(roles))
    }

    pub fn to_wire(&self) -> String {
        let mut roles = self.0.clone();
        roles.sort_by_key(|r| r.wire_name());
        let joined: Vec<&str> = roles.iter().map(|r| r.wire_name()).collect();
        format!("keep:{}", joined.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_initial_actions() {
        assert_eq!(InitialAction::parse("income"), Ok(InitialAction::Income));
        assert_eq!(InitialAction::parse("tax"), Ok(InitialAction::Tax));
    }

    #[test]
    fn parses_targeted_initial_actions() {
        assert_eq!(InitialAction::parse("steal:2"), Ok(InitialAction::Steal(2)));
        assert_eq!(InitialAction::parse("coup:0"), Ok(InitialAction::Coup(0)));
    }

    #[test]
    fn rejects_malformed_target() {
        assert!(InitialAction::parse("steal:x").is_err());
    }

    #[test]
    fn parses_responses() {
        assert_eq!(Response::parse("pass"), Ok(Response::Pass));
        assert_eq!(Response::parse("block:duke"), Ok(Response::Block(Role::Duke)));
        assert_eq!(Response::parse("reveal:captain"), Ok(Response::Reveal(Role::Captain)));
    }

    #[test]
    fn keep_canonicalizes_order() {
        let a = Keep::parse("keep:ambassador,duke").unwrap();
        let b = Keep::parse("keep:duke,ambassador").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_wire(), "keep:ambassador,duke");
    }

    #[test]
    fn initial_action_round_trips() {
        for action in [InitialAction::Income, InitialAction::Steal(3), InitialAction::Coup(1)] {
            let wire = action.to_wire();
            assert_eq!(InitialAction::parse(&wire), Ok(action));
        }
    }
}
