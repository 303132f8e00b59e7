//! Save and restore a live match between CLI invocations

use crate::error::{ArenaError, Result};
use crate::model::{validate_goal_score, MatchSession};
use log::debug;
use std::fs;
use std::path::Path;

/// Write the session as JSON, replacing any previous snapshot atomically
pub fn save_session(path: &Path, session: &MatchSession) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(session)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    debug!("saved session to {}", path.display());
    Ok(())
}

/// Load the saved session, if any. The ledger is re-validated and its totals
/// recomputed; a snapshot that breaks an invariant is `CorruptSnapshot`.
pub fn load_session(path: &Path) -> Result<Option<MatchSession>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let session: MatchSession = serde_json::from_str(&content)
        .map_err(|e| ArenaError::CorruptSnapshot(e.to_string()))?;
    validate_goal_score(session.goal_score())
        .map_err(|e| ArenaError::CorruptSnapshot(e.to_string()))?;
    if session.team2().is_some_and(|t| t.id == session.team1().id) {
        return Err(ArenaError::CorruptSnapshot(
            ArenaError::DuplicateTeam.to_string(),
        ));
    }
    Ok(Some(session))
}

/// Remove the saved session. Returns whether there was one.
pub fn discard_session(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}
