//! Where the scorekeeper keeps its files and who is keeping score

use crate::error::Result;
use crate::store::CsvStore;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_DATA_DIR: &str = ".arena";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Directory holding the live session snapshot and the CSV tables
    pub data_dir: PathBuf,
    /// Recorded as the creator of finished games
    pub user: Option<Uuid>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            user: None,
        }
    }
}

impl ArenaConfig {
    pub fn new(data_dir: impl Into<PathBuf>, user: Option<Uuid>) -> Self {
        Self {
            data_dir: data_dir.into(),
            user,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    pub fn open_store(&self) -> Result<CsvStore> {
        CsvStore::open(&self.data_dir)
    }
}
