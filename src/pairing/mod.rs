pub mod codec;

pub use codec::{decode, encode, PairingPayload};

use crate::error::{ArenaError, Result};
use crate::model::Team;
use crate::store::MatchStore;

/// Decode a scanned team code and look the team up.
///
/// A code that is not JSON, or not a team code, is `MalformedCode`; a well-formed
/// code naming an unknown team is `NotFound`.
pub fn resolve_team<S: MatchStore + ?Sized>(store: &S, raw: &str) -> Result<Team> {
    match decode(raw)? {
        PairingPayload::Team { team_id } => store.find_team(team_id),
        other => Err(ArenaError::MalformedCode(format!(
            "expected a team code, got {}",
            payload_kind(&other)
        ))),
    }
}

fn payload_kind(payload: &PairingPayload) -> &'static str {
    match payload {
        PairingPayload::Profile { .. } => "a profile code",
        PairingPayload::Team { .. } => "a team code",
        PairingPayload::GameSpectator { .. } => "a spectator code",
    }
}
