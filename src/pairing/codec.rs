//! JSON payloads carried by pairing QR codes

use crate::error::{ArenaError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The only shapes a scanned code may decode to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PairingPayload {
    Profile {
        #[serde(rename = "userId")]
        user_id: Uuid,
        #[serde(rename = "displayName")]
        display_name: String,
    },
    Team {
        #[serde(rename = "teamId")]
        team_id: Uuid,
    },
    GameSpectator {
        #[serde(rename = "gameId")]
        game_id: Uuid,
    },
}

/// Decode scanned text. Never performs I/O; resolving the ids is up to the caller.
pub fn decode(raw: &str) -> Result<PairingPayload> {
    serde_json::from_str(raw.trim()).map_err(|e| ArenaError::MalformedCode(e.to_string()))
}

/// Encode a payload as compact JSON, tag first
pub fn encode(payload: &PairingPayload) -> Result<String> {
    Ok(serde_json::to_string(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAM_ID: &str = "6f1c2a4e-8b3d-4c5e-9f70-1a2b3c4d5e6f";

    fn payloads() -> Vec<PairingPayload> {
        vec![
            PairingPayload::Profile {
                user_id: Uuid::from_u128(7),
                display_name: "Ace \"of\" Spades".to_string(),
            },
            PairingPayload::Team {
                team_id: Uuid::from_u128(8),
            },
            PairingPayload::GameSpectator {
                game_id: Uuid::from_u128(9),
            },
        ]
    }

    #[test]
    fn test_round_trip() {
        for payload in payloads() {
            let encoded = encode(&payload).unwrap();
            assert_eq!(decode(&encoded).unwrap(), payload);
        }
    }

    #[test]
    fn test_wire_format() {
        let payload = PairingPayload::Team {
            team_id: Uuid::parse_str(TEAM_ID).unwrap(),
        };
        assert_eq!(
            encode(&payload).unwrap(),
            format!(r#"{{"type":"team","teamId":"{}"}}"#, TEAM_ID)
        );

        let profile = PairingPayload::Profile {
            user_id: Uuid::parse_str(TEAM_ID).unwrap(),
            display_name: "Rhea".to_string(),
        };
        assert_eq!(
            encode(&profile).unwrap(),
            format!(r#"{{"type":"profile","userId":"{}","displayName":"Rhea"}}"#, TEAM_ID)
        );
    }

    #[test]
    fn test_decode_spectator() {
        let raw = format!(r#"  {{"gameId":"{}","type":"game_spectator"}}  "#, TEAM_ID);
        assert_eq!(
            decode(&raw).unwrap(),
            PairingPayload::GameSpectator {
                game_id: Uuid::parse_str(TEAM_ID).unwrap()
            }
        );
    }

    #[test]
    fn test_decode_malformed() {
        let cases = [
            "not json".to_string(),
            "{}".to_string(),
            r#"{"type":"lobby","teamId":"x"}"#.to_string(),
            r#"{"type":"team"}"#.to_string(),
            r#"{"type":"profile","userId":"6f1c2a4e-8b3d-4c5e-9f70-1a2b3c4d5e6f"}"#.to_string(),
            r#"{"type":"team","teamId":"not-a-uuid"}"#.to_string(),
        ];
        for raw in cases {
            assert!(
                matches!(decode(&raw), Err(ArenaError::MalformedCode(_))),
                "expected malformed: {}",
                raw
            );
        }
    }
}
