use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Operation not allowed while a hand is awaiting books")]
    InvalidPhase,

    #[error("No hand is awaiting books")]
    NoOpenHand,

    #[error("Invalid bid: {0} (must be 0-13)")]
    InvalidBid(u8),

    #[error("Invalid books: {0} (must be 0-13)")]
    InvalidBooks(u8),

    #[error("Ledger is empty")]
    EmptyLedger,

    #[error("Match cannot be finished: {0}")]
    IncompleteMatch(String),

    #[error("Invalid goal score: {0} (must be a multiple of 50 between 100 and 500)")]
    InvalidGoalScore(u32),

    #[error("A team cannot play against itself")]
    DuplicateTeam,

    #[error("Malformed code: {0}")]
    MalformedCode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
