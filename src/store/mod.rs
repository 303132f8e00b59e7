//! Persistence boundary for teams and finished matches
//!
//! The scoring core never touches storage while a match is live. The only
//! writes happen in [`commit_match`], after the session has produced its
//! complete export.

pub mod csv_store;
pub mod memory;
pub mod snapshot;
pub mod tables;

pub use csv_store::CsvStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::model::{GameRecord, HandRow, MatchExport, MatchSession, OutcomeRecord, Team};
use log::{debug, info};
use std::collections::HashSet;
use uuid::Uuid;

/// The persistence collaborator: team lookup plus the three match inserts
pub trait MatchStore {
    /// Look up a team by id, failing with `NotFound` if it does not exist
    fn find_team(&self, id: Uuid) -> Result<Team>;

    fn teams(&self) -> Result<Vec<Team>>;

    fn insert_team(&mut self, team: &Team) -> Result<()>;

    fn insert_game(&mut self, game: &GameRecord) -> Result<()>;

    fn insert_outcome(&mut self, outcome: &OutcomeRecord) -> Result<()>;

    fn insert_hands(&mut self, hands: &[HandRow]) -> Result<()>;

    /// The stored game with this id, if any
    fn game(&self, id: Uuid) -> Result<Option<GameRecord>>;

    /// Outcomes of every recorded match, oldest first
    fn outcomes(&self) -> Result<Vec<OutcomeRecord>>;

    /// Hand rows stored for one game, in hand order
    fn hands_for_game(&self, game_id: Uuid) -> Result<Vec<HandRow>>;
}

/// Finish a session and write its records.
///
/// The session is only borrowed: if finishing or any write fails it is left
/// exactly as it was, and the caller may retry. A retry reuses the session's
/// game id, so records written by an earlier attempt are not duplicated.
/// Discard the session once this returns `Ok`.
pub fn commit_match<S: MatchStore + ?Sized>(
    store: &mut S,
    session: &MatchSession,
    created_by: Option<Uuid>,
) -> Result<MatchExport> {
    let export = session.finish(created_by)?;
    write_export(store, &export)?;
    Ok(export)
}

/// Write an already-built export: game first, then outcome, then hands.
///
/// Records already stored under the export's game id are skipped, so writing
/// the same game again only fills in what an earlier attempt left out.
pub fn write_export<S: MatchStore + ?Sized>(store: &mut S, export: &MatchExport) -> Result<()> {
    let game_id = export.game.id;

    if store.game(game_id)?.is_some() {
        debug!("game {} already stored", game_id);
    } else {
        store.insert_game(&export.game)?;
    }

    if store.outcomes()?.iter().any(|o| o.game_id == game_id) {
        debug!("outcome for game {} already stored", game_id);
    } else {
        store.insert_outcome(&export.outcome)?;
    }

    let stored: HashSet<u32> = store
        .hands_for_game(game_id)?
        .iter()
        .map(|row| row.hand_no)
        .collect();
    let missing: Vec<HandRow> = export
        .hands
        .iter()
        .filter(|row| !stored.contains(&row.hand_no))
        .cloned()
        .collect();
    if !missing.is_empty() {
        store.insert_hands(&missing)?;
    }

    info!(
        "stored game {} with {} hands",
        export.game.id,
        export.hands.len()
    );
    Ok(())
}
