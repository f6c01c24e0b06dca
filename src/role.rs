//! # Roles
//!
//! The five influence cards. Each exists in the deck with multiplicity 3
//! (15 cards total); a `Role` is what a `Player` keeps hidden or reveals.

/// One of the five influence cards in the box.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Role {
    Duke,
    Captain,
    Assassin,
    Contessa,
    Ambassador,
}

/// All five roles, in the fixed order this crate canonicalizes on.
pub const ALL_ROLES: [Role; 5] = [
    Role::Duke,
    Role::Captain,
    Role::Assassin,
    Role::Contessa,
    Role::Ambassador,
];

/// Roles a player may claim in order to block an action (Assassin is not one).
pub const BLOCKING_ROLES: [Role; 4] = [Role::Duke, Role::Captain, Role::Contessa, Role::Ambassador];

impl Role {
    /// Lowercase wire name, e.g. `"duke"`. This is the canonical token used
    /// in `claim:`/`block:`/`reveal:`/`keep:` action strings.
    pub fn wire_name(self) -> &'static str {
        match self {
            Role::Duke => "duke",
            Role::Captain => "captain",
            Role::Assassin => "assassin",
            Role::Contessa => "contessa",
            Role::Ambassador => "ambassador",
        }
    }

    /// Parse a wire name back into a `Role`. `None` for anything else.
    pub fn parse_wire(s: &str) -> Option<Role> {
        ALL_ROLES.into_iter().find(|r| r.wire_name() == s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}
