use super::MatchStore;
use crate::error::{ArenaError, Result};
use crate::model::{GameRecord, HandRow, OutcomeRecord, Team};
use uuid::Uuid;

/// A store that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    teams: Vec<Team>,
    games: Vec<GameRecord>,
    outcomes: Vec<OutcomeRecord>,
    hands: Vec<HandRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn hand_rows(&self) -> &[HandRow] {
        &self.hands
    }
}

impl MatchStore for MemoryStore {
    fn find_team(&self, id: Uuid) -> Result<Team> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ArenaError::NotFound(format!("team {}", id)))
    }

    fn teams(&self) -> Result<Vec<Team>> {
        Ok(self.teams.clone())
    }

    fn insert_team(&mut self, team: &Team) -> Result<()> {
        self.teams.push(team.clone());
        Ok(())
    }

    fn insert_game(&mut self, game: &GameRecord) -> Result<()> {
        self.games.push(game.clone());
        Ok(())
    }

    fn insert_outcome(&mut self, outcome: &OutcomeRecord) -> Result<()> {
        self.outcomes.push(outcome.clone());
        Ok(())
    }

    fn insert_hands(&mut self, hands: &[HandRow]) -> Result<()> {
        self.hands.extend_from_slice(hands);
        Ok(())
    }

    fn game(&self, id: Uuid) -> Result<Option<GameRecord>> {
        Ok(self.games.iter().find(|g| g.id == id).cloned())
    }

    fn outcomes(&self) -> Result<Vec<OutcomeRecord>> {
        Ok(self.outcomes.clone())
    }

    fn hands_for_game(&self, game_id: Uuid) -> Result<Vec<HandRow>> {
        let mut rows: Vec<HandRow> = self
            .hands
            .iter()
            .filter(|row| row.game_id == game_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.hand_no);
        Ok(rows)
    }
}
