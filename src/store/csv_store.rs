//! File-backed store: one CSV file per table in a data directory

use super::tables::{TeamRow, GAMES_TABLE, HANDS_TABLE, OUTCOMES_TABLE, TEAMS_TABLE};
use super::MatchStore;
use crate::error::{ArenaError, Result};
use crate::model::{GameRecord, HandRow, OutcomeRecord, Team};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn games(&self) -> Result<Vec<GameRecord>> {
        read_rows(&self.table(GAMES_TABLE))
    }
}

/// Read every row of a table. A missing file is an empty table; rows that
/// fail to parse are skipped with a warning.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for (line, result) in reader.deserialize().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("{}: skipping row {}: {}", path.display(), line + 1, e),
        }
    }
    Ok(rows)
}

/// Append rows to a table, writing the header only when the file is new
fn append_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let needs_headers = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

impl MatchStore for CsvStore {
    fn find_team(&self, id: Uuid) -> Result<Team> {
        self.teams()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ArenaError::NotFound(format!("team {}", id)))
    }

    fn teams(&self) -> Result<Vec<Team>> {
        let rows: Vec<TeamRow> = read_rows(&self.table(TEAMS_TABLE))?;
        Ok(rows.into_iter().map(Team::from).collect())
    }

    fn insert_team(&mut self, team: &Team) -> Result<()> {
        append_rows(&self.table(TEAMS_TABLE), &[TeamRow::from(team)])
    }

    fn insert_game(&mut self, game: &GameRecord) -> Result<()> {
        append_rows(&self.table(GAMES_TABLE), std::slice::from_ref(game))
    }

    fn insert_outcome(&mut self, outcome: &OutcomeRecord) -> Result<()> {
        append_rows(&self.table(OUTCOMES_TABLE), std::slice::from_ref(outcome))
    }

    fn insert_hands(&mut self, hands: &[HandRow]) -> Result<()> {
        append_rows(&self.table(HANDS_TABLE), hands)
    }

    fn game(&self, id: Uuid) -> Result<Option<GameRecord>> {
        Ok(self.games()?.into_iter().find(|g| g.id == id))
    }

    fn outcomes(&self) -> Result<Vec<OutcomeRecord>> {
        read_rows(&self.table(OUTCOMES_TABLE))
    }

    fn hands_for_game(&self, game_id: Uuid) -> Result<Vec<HandRow>> {
        let mut rows: Vec<HandRow> = read_rows::<HandRow>(&self.table(HANDS_TABLE))?
            .into_iter()
            .filter(|row| row.game_id == game_id)
            .collect();
        rows.sort_by_key(|row| row.hand_no);
        Ok(rows)
    }
}
