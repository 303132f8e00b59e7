use super::scoring::{compute_hand_points, Bid, Books};
use super::team::TeamSlot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a single hand stands: bids are in, and books either are or are not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum HandPhase {
    AwaitingBooks,
    Completed {
        team1_books: Books,
        team2_books: Books,
        team1_points: i32,
        team2_points: i32,
    },
}

/// One round of a match: both teams' bids and, once played, their books and points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRecord {
    /// 1-based position in the ledger
    pub index: u32,
    pub team1_bid: Bid,
    pub team1_blind: bool,
    pub team2_bid: Bid,
    pub team2_blind: bool,
    pub phase: HandPhase,
}

impl HandRecord {
    pub(crate) fn open(
        index: u32,
        team1_bid: Bid,
        team1_blind: bool,
        team2_bid: Bid,
        team2_blind: bool,
    ) -> Self {
        Self {
            index,
            team1_bid,
            team1_blind,
            team2_bid,
            team2_blind,
            phase: HandPhase::AwaitingBooks,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, HandPhase::Completed { .. })
    }

    pub fn bid(&self, slot: TeamSlot) -> Bid {
        match slot {
            TeamSlot::Team1 => self.team1_bid,
            TeamSlot::Team2 => self.team2_bid,
        }
    }

    pub fn is_blind(&self, slot: TeamSlot) -> bool {
        match slot {
            TeamSlot::Team1 => self.team1_blind,
            TeamSlot::Team2 => self.team2_blind,
        }
    }

    pub fn books(&self, slot: TeamSlot) -> Option<Books> {
        match (self.phase, slot) {
            (HandPhase::AwaitingBooks, _) => None,
            (HandPhase::Completed { team1_books, .. }, TeamSlot::Team1) => Some(team1_books),
            (HandPhase::Completed { team2_books, .. }, TeamSlot::Team2) => Some(team2_books),
        }
    }

    pub fn points(&self, slot: TeamSlot) -> Option<i32> {
        match (self.phase, slot) {
            (HandPhase::AwaitingBooks, _) => None,
            (HandPhase::Completed { team1_points, .. }, TeamSlot::Team1) => Some(team1_points),
            (HandPhase::Completed { team2_points, .. }, TeamSlot::Team2) => Some(team2_points),
        }
    }

    /// Points each team should earn for the given books under this hand's bids
    pub fn score_books(&self, team1_books: Books, team2_books: Books) -> (i32, i32) {
        (
            compute_hand_points(self.team1_bid, team1_books, self.team1_blind),
            compute_hand_points(self.team2_bid, team2_books, self.team2_blind),
        )
    }

    /// Record books and points. Returns the points added.
    pub(crate) fn complete(&mut self, team1_books: Books, team2_books: Books) -> (i32, i32) {
        let (team1_points, team2_points) = self.score_books(team1_books, team2_books);
        self.phase = HandPhase::Completed {
            team1_books,
            team2_books,
            team1_points,
            team2_points,
        };
        (team1_points, team2_points)
    }

    /// Clear books and points, keeping bids. Returns the points that were removed.
    pub(crate) fn reopen(&mut self) -> (i32, i32) {
        let removed = match self.phase {
            HandPhase::AwaitingBooks => (0, 0),
            HandPhase::Completed {
                team1_points,
                team2_points,
                ..
            } => (team1_points, team2_points),
        };
        self.phase = HandPhase::AwaitingBooks;
        removed
    }
}

impl fmt::Display for HandRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blind = |b: bool| if b { " (blind)" } else { "" };
        write!(
            f,
            "Hand {}: bids {}{} / {}{}",
            self.index,
            self.team1_bid,
            blind(self.team1_blind),
            self.team2_bid,
            blind(self.team2_blind)
        )?;
        match self.phase {
            HandPhase::AwaitingBooks => write!(f, " - awaiting books"),
            HandPhase::Completed {
                team1_books,
                team2_books,
                team1_points,
                team2_points,
            } => write!(
                f,
                " - books {} / {} - points {:+} / {:+}",
                team1_books, team2_books, team1_points, team2_points
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand() -> HandRecord {
        HandRecord::open(1, Bid::new(4).unwrap(), false, Bid::new(0).unwrap(), true)
    }

    #[test]
    fn test_open_hand_has_no_books() {
        let h = hand();
        assert!(!h.is_completed());
        assert_eq!(h.books(TeamSlot::Team1), None);
        assert_eq!(h.points(TeamSlot::Team2), None);
        assert!(h.is_blind(TeamSlot::Team2));
    }

    #[test]
    fn test_complete_then_reopen() {
        let mut h = hand();
        let added = h.complete(Books::new(5).unwrap(), Books::new(0).unwrap());
        assert_eq!(added, (41, 200));
        assert_eq!(h.books(TeamSlot::Team1), Some(Books::new(5).unwrap()));
        assert_eq!(h.points(TeamSlot::Team2), Some(200));

        let removed = h.reopen();
        assert_eq!(removed, (41, 200));
        assert_eq!(h, hand());
    }

    #[test]
    fn test_display() {
        let mut h = hand();
        assert_eq!(h.to_string(), "Hand 1: bids 4 / Nil (blind) - awaiting books");
        h.complete(Books::new(3).unwrap(), Books::new(1).unwrap());
        assert_eq!(
            h.to_string(),
            "Hand 1: bids 4 / Nil (blind) - books 3 / 1 - points -40 / -200"
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(hand()).unwrap();
        assert_eq!(json["team1_bid"], 4);
        assert_eq!(json["phase"]["phase"], "awaiting_books");
    }
}
