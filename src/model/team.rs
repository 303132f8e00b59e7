use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A team as known to the persistence layer, with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
}

impl Team {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Which side of a match a team sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSlot {
    Team1,
    Team2,
}

impl TeamSlot {
    pub const ALL: [TeamSlot; 2] = [TeamSlot::Team1, TeamSlot::Team2];
}

impl fmt::Display for TeamSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSlot::Team1 => write!(f, "Team 1"),
            TeamSlot::Team2 => write!(f, "Team 2"),
        }
    }
}
