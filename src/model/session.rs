//! A live match between two teams and its export once finished

use super::hand::HandRecord;
use super::ledger::{HandLedger, LedgerState, UndoOutcome};
use super::scoring::{Bid, Books};
use super::team::{Team, TeamSlot};
use crate::error::{ArenaError, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_GOAL_SCORE: u32 = 500;
pub const MIN_GOAL_SCORE: u32 = 100;
pub const MAX_GOAL_SCORE: u32 = 500;
pub const GOAL_SCORE_STEP: u32 = 50;

/// Direction for stepping the goal score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalDirection {
    Up,
    Down,
}

/// Check that a goal score is one the step cycle can reach
pub fn validate_goal_score(goal: u32) -> Result<u32> {
    if !(MIN_GOAL_SCORE..=MAX_GOAL_SCORE).contains(&goal) || goal % GOAL_SCORE_STEP != 0 {
        return Err(ArenaError::InvalidGoalScore(goal));
    }
    Ok(goal)
}

/// Lifecycle status of a persisted game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Completed,
}

/// The game-session record written when a match finishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: Uuid,
    pub team1_id: Uuid,
    pub team2_id: Uuid,
    pub goal_score: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    pub status: GameStatus,
    pub created_by: Option<Uuid>,
}

/// Final result of a match. `winner_team_id` is `None` on a tie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRecord {
    pub game_id: Uuid,
    pub team1_id: Uuid,
    pub team2_id: Uuid,
    pub winner_team_id: Option<Uuid>,
    pub team1_total: i32,
    pub team2_total: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}

/// One completed hand as persisted, with cumulative totals as of that hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandRow {
    pub game_id: Uuid,
    pub hand_no: u32,
    pub team1_bid: u8,
    pub team2_bid: u8,
    pub team1_blind: bool,
    pub team2_blind: bool,
    pub team1_books: u8,
    pub team2_books: u8,
    pub team1_delta: i32,
    pub team2_delta: i32,
    pub team1_total_after: i32,
    pub team2_total_after: i32,
}

/// Everything the persistence layer receives for one finished match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchExport {
    pub game: GameRecord,
    pub outcome: OutcomeRecord,
    pub hands: Vec<HandRow>,
}

/// A match in progress. Owns its ledger exclusively; nothing is persisted
/// until the match is finished and committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSession {
    /// Id the finished game is stored under, fixed for the life of the session
    #[serde(default = "Uuid::new_v4")]
    game_id: Uuid,
    team1: Team,
    team2: Option<Team>,
    goal_score: u32,
    #[serde(with = "time::serde::rfc3339")]
    started_at: OffsetDateTime,
    ledger: HandLedger,
}

impl MatchSession {
    /// Start a session. The opponent may be bound later from a pairing code.
    pub fn new(team1: Team, team2: Option<Team>, started_at: OffsetDateTime) -> Result<Self> {
        if team2.as_ref().is_some_and(|t| t.id == team1.id) {
            return Err(ArenaError::DuplicateTeam);
        }
        Ok(Self {
            game_id: Uuid::new_v4(),
            team1,
            team2,
            goal_score: DEFAULT_GOAL_SCORE,
            started_at,
            ledger: HandLedger::new(),
        })
    }

    pub fn with_goal_score(mut self, goal: u32) -> Result<Self> {
        self.goal_score = validate_goal_score(goal)?;
        Ok(self)
    }

    /// Set the second team. Only allowed before any hand is recorded.
    pub fn bind_opponent(&mut self, team: Team) -> Result<()> {
        if team.id == self.team1.id {
            return Err(ArenaError::DuplicateTeam);
        }
        if !self.ledger.is_empty() {
            return Err(ArenaError::InvalidPhase);
        }
        info!("bound opponent {} ({})", team.name, team.id);
        self.team2 = Some(team);
        Ok(())
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn team1(&self) -> &Team {
        &self.team1
    }

    pub fn team2(&self) -> Option<&Team> {
        self.team2.as_ref()
    }

    pub fn team(&self, slot: TeamSlot) -> Option<&Team> {
        match slot {
            TeamSlot::Team1 => Some(&self.team1),
            TeamSlot::Team2 => self.team2.as_ref(),
        }
    }

    pub fn goal_score(&self) -> u32 {
        self.goal_score
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn ledger(&self) -> &HandLedger {
        &self.ledger
    }

    pub fn state(&self) -> LedgerState {
        self.ledger.state()
    }

    pub fn record_bid(
        &mut self,
        team1_bid: u8,
        team1_blind: bool,
        team2_bid: u8,
        team2_blind: bool,
    ) -> Result<&HandRecord> {
        let team1_bid = Bid::new(team1_bid)?;
        let team2_bid = Bid::new(team2_bid)?;
        self.ledger
            .record_bid(team1_bid, team1_blind, team2_bid, team2_blind)
    }

    pub fn record_books(&mut self, team1_books: u8, team2_books: u8) -> Result<(i32, i32)> {
        let team1_books = Books::new(team1_books)?;
        let team2_books = Books::new(team2_books)?;
        self.ledger.record_books(team1_books, team2_books)
    }

    pub fn undo_last(&mut self) -> Result<UndoOutcome> {
        self.ledger.undo_last()
    }

    pub fn current_totals(&self) -> (i32, i32) {
        self.ledger.current_totals()
    }

    /// Step the goal score by 50, wrapping 500 -> 100 going up and 100 -> 500 going down
    pub fn adjust_goal_score(&mut self, direction: GoalDirection) -> u32 {
        self.goal_score = match direction {
            GoalDirection::Up if self.goal_score >= MAX_GOAL_SCORE => MIN_GOAL_SCORE,
            GoalDirection::Up => self.goal_score + GOAL_SCORE_STEP,
            GoalDirection::Down if self.goal_score <= MIN_GOAL_SCORE => MAX_GOAL_SCORE,
            GoalDirection::Down => self.goal_score - GOAL_SCORE_STEP,
        };
        self.goal_score
    }

    /// Whether either team has reached the goal score
    pub fn goal_reached(&self) -> bool {
        let (team1, team2) = self.current_totals();
        let goal = self.goal_score as i32;
        team1 >= goal || team2 >= goal
    }

    /// Finish under the session's own game id, stamped now. Finishing again
    /// after a failed commit yields the same game id.
    pub fn finish(&self, created_by: Option<Uuid>) -> Result<MatchExport> {
        self.finish_at(self.game_id, OffsetDateTime::now_utc(), created_by)
    }

    /// Build the records for a finished match. The session itself is left
    /// untouched so a failed persist can be retried.
    pub fn finish_at(
        &self,
        game_id: Uuid,
        completed_at: OffsetDateTime,
        created_by: Option<Uuid>,
    ) -> Result<MatchExport> {
        let team2 = self
            .team2
            .as_ref()
            .ok_or_else(|| ArenaError::IncompleteMatch("opponent team is not set".to_string()))?;

        if let Some(open) = self.ledger.last().filter(|h| !h.is_completed()) {
            return Err(ArenaError::IncompleteMatch(format!(
                "hand {} is still awaiting books",
                open.index
            )));
        }
        if self.ledger.completed_count() == 0 {
            return Err(ArenaError::IncompleteMatch(
                "no hands have been completed".to_string(),
            ));
        }

        let mut hands = Vec::with_capacity(self.ledger.len());
        let mut totals = (0, 0);
        for settled in self.ledger.running_totals() {
            let hand = settled.hand;
            hands.push(HandRow {
                game_id,
                hand_no: hand.index,
                team1_bid: hand.team1_bid.value(),
                team2_bid: hand.team2_bid.value(),
                team1_blind: hand.team1_blind,
                team2_blind: hand.team2_blind,
                team1_books: settled.books.0.value(),
                team2_books: settled.books.1.value(),
                team1_delta: settled.points.0,
                team2_delta: settled.points.1,
                team1_total_after: settled.totals.0,
                team2_total_after: settled.totals.1,
            });
            totals = settled.totals;
        }

        if totals != self.ledger.current_totals() {
            warn!(
                "running totals {:?} differ from replayed totals {:?}; using replayed",
                self.ledger.current_totals(),
                totals
            );
        }

        let (team1_total, team2_total) = totals;
        let winner_team_id = if team1_total == team2_total {
            None
        } else if team1_total > team2_total {
            Some(self.team1.id)
        } else {
            Some(team2.id)
        };

        info!(
            "finished match {}: {} {} - {} {} over {} hands",
            game_id,
            self.team1.name,
            team1_total,
            team2.name,
            team2_total,
            hands.len()
        );

        Ok(MatchExport {
            game: GameRecord {
                id: game_id,
                team1_id: self.team1.id,
                team2_id: team2.id,
                goal_score: self.goal_score,
                started_at: self.started_at,
                status: GameStatus::Completed,
                created_by,
            },
            outcome: OutcomeRecord {
                game_id,
                team1_id: self.team1.id,
                team2_id: team2.id,
                winner_team_id,
                team1_total,
                team2_total,
                completed_at,
            },
            hands,
        })
    }
}
