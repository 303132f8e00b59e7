use crate::model::Team;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team as stored in the teams table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRow {
    pub team_id: Uuid,
    pub name: String,
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        Self {
            team_id: team.id,
            name: team.name.clone(),
        }
    }
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team::new(row.team_id, row.name)
    }
}

/// File names of the tables kept by the CSV store
pub const TEAMS_TABLE: &str = "teams.csv";
pub const GAMES_TABLE: &str = "games.csv";
pub const OUTCOMES_TABLE: &str = "outcomes.csv";
pub const HANDS_TABLE: &str = "hands.csv";
