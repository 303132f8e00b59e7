pub mod hand;
pub mod ledger;
pub mod scoring;
pub mod session;
pub mod team;

pub use hand::{HandPhase, HandRecord};
pub use ledger::{HandLedger, LedgerState, SettledHand, UndoOutcome};
pub use scoring::{compute_hand_points, Bid, Books, MAX_TRICKS};
pub use session::{
    validate_goal_score, GameRecord, GameStatus, GoalDirection, HandRow, MatchExport,
    MatchSession, OutcomeRecord, DEFAULT_GOAL_SCORE,
};
pub use team::{Team, TeamSlot};
