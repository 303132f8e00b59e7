//! The ordered record of hands for one match
//!
//! Hands are only ever appended at the tail or undone from the tail. At most
//! one hand (the last one) may be waiting for books, and the running totals
//! always equal the sum of points over completed hands.

use super::hand::{HandPhase, HandRecord};
use super::scoring::{Bid, Books};
use crate::error::{ArenaError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// What the ledger will accept next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerState {
    /// No hand is open: the next entry is a pair of bids
    AwaitingBid,
    /// The last hand has bids but no books yet
    AwaitingBooks,
}

/// Result of a single undo step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// A completed hand lost its books and is awaiting books again
    Reopened { index: u32 },
    /// A hand that was awaiting books was removed along with its bids
    Removed { index: u32 },
}

/// A completed hand with its settled books and points, and the cumulative
/// totals as of and including it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledHand<'a> {
    pub hand: &'a HandRecord,
    pub books: (Books, Books),
    pub points: (i32, i32),
    pub totals: (i32, i32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HandRecord>", into = "Vec<HandRecord>")]
pub struct HandLedger {
    hands: Vec<HandRecord>,
    team1_total: i32,
    team2_total: i32,
}

impl HandLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted hands, checking every invariant.
    /// Totals are recomputed from the hands rather than trusted.
    pub fn from_hands(hands: Vec<HandRecord>) -> Result<Self> {
        let count = hands.len();
        for (pos, hand) in hands.iter().enumerate() {
            let expected = pos as u32 + 1;
            if hand.index != expected {
                return Err(ArenaError::CorruptSnapshot(format!(
                    "hand at position {} has index {}",
                    expected, hand.index
                )));
            }

            match hand.phase {
                HandPhase::AwaitingBooks if pos + 1 != count => {
                    return Err(ArenaError::CorruptSnapshot(format!(
                        "hand {} is awaiting books but is not the last hand",
                        hand.index
                    )));
                }
                HandPhase::AwaitingBooks => {}
                HandPhase::Completed {
                    team1_books,
                    team2_books,
                    team1_points,
                    team2_points,
                } => {
                    if hand.score_books(team1_books, team2_books) != (team1_points, team2_points) {
                        return Err(ArenaError::CorruptSnapshot(format!(
                            "hand {} has points that do not match its bids and books",
                            hand.index
                        )));
                    }
                }
            }
        }

        let mut ledger = HandLedger {
            hands,
            team1_total: 0,
            team2_total: 0,
        };
        let (team1_total, team2_total) = ledger.replay_totals();
        ledger.team1_total = team1_total;
        ledger.team2_total = team2_total;
        Ok(ledger)
    }

    pub fn state(&self) -> LedgerState {
        match self.hands.last() {
            Some(hand) if !hand.is_completed() => LedgerState::AwaitingBooks,
            _ => LedgerState::AwaitingBid,
        }
    }

    /// Open a new hand with both teams' bids
    pub fn record_bid(
        &mut self,
        team1_bid: Bid,
        team1_blind: bool,
        team2_bid: Bid,
        team2_blind: bool,
    ) -> Result<&HandRecord> {
        if self.state() == LedgerState::AwaitingBooks {
            return Err(ArenaError::InvalidPhase);
        }

        let index = self.hands.len() as u32 + 1;
        self.hands.push(HandRecord::open(
            index,
            team1_bid,
            team1_blind,
            team2_bid,
            team2_blind,
        ));
        debug!(
            "hand {}: bids {} (blind={}) / {} (blind={})",
            index, team1_bid, team1_blind, team2_bid, team2_blind
        );

        Ok(&self.hands[self.hands.len() - 1])
    }

    /// Enter books for the open hand. Returns the points each team earned.
    pub fn record_books(&mut self, team1_books: Books, team2_books: Books) -> Result<(i32, i32)> {
        let hand = match self.hands.last_mut() {
            Some(hand) if !hand.is_completed() => hand,
            _ => return Err(ArenaError::NoOpenHand),
        };

        let (team1_points, team2_points) = hand.complete(team1_books, team2_books);
        self.team1_total += team1_points;
        self.team2_total += team2_points;
        debug!(
            "hand {}: books {} / {} -> points {:+} / {:+}",
            hand.index, team1_books, team2_books, team1_points, team2_points
        );

        Ok((team1_points, team2_points))
    }

    /// Step back once from the last hand: a completed hand loses its books,
    /// a hand awaiting books is removed.
    pub fn undo_last(&mut self) -> Result<UndoOutcome> {
        let hand = self.hands.last_mut().ok_or(ArenaError::EmptyLedger)?;
        let index = hand.index;

        if hand.is_completed() {
            let (team1_points, team2_points) = hand.reopen();
            self.team1_total -= team1_points;
            self.team2_total -= team2_points;
            debug!("hand {}: books undone", index);
            Ok(UndoOutcome::Reopened { index })
        } else {
            self.hands.pop();
            debug!("hand {}: removed", index);
            Ok(UndoOutcome::Removed { index })
        }
    }

    /// Running totals as (team 1, team 2)
    pub fn current_totals(&self) -> (i32, i32) {
        (self.team1_total, self.team2_total)
    }

    /// Totals recomputed by summing points over completed hands in order
    pub fn replay_totals(&self) -> (i32, i32) {
        self.running_totals()
            .last()
            .map(|settled| settled.totals)
            .unwrap_or((0, 0))
    }

    /// Every completed hand in order, with running totals
    pub fn running_totals(&self) -> Vec<SettledHand<'_>> {
        let mut team1 = 0;
        let mut team2 = 0;
        self.hands
            .iter()
            .filter_map(|hand| match hand.phase {
                HandPhase::Completed {
                    team1_books,
                    team2_books,
                    team1_points,
                    team2_points,
                } => {
                    team1 += team1_points;
                    team2 += team2_points;
                    Some(SettledHand {
                        hand,
                        books: (team1_books, team2_books),
                        points: (team1_points, team2_points),
                        totals: (team1, team2),
                    })
                }
                HandPhase::AwaitingBooks => None,
            })
            .collect()
    }

    pub fn hands(&self) -> &[HandRecord] {
        &self.hands
    }

    pub fn last(&self) -> Option<&HandRecord> {
        self.hands.last()
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.hands.iter().filter(|h| h.is_completed()).count()
    }
}

impl TryFrom<Vec<HandRecord>> for HandLedger {
    type Error = ArenaError;

    fn try_from(hands: Vec<HandRecord>) -> Result<Self> {
        HandLedger::from_hands(hands)
    }
}

impl From<HandLedger> for Vec<HandRecord> {
    fn from(ledger: HandLedger) -> Self {
        ledger.hands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bid(n: u8) -> Bid {
        Bid::new(n).unwrap()
    }

    fn books(n: u8) -> Books {
        Books::new(n).unwrap()
    }

    fn assert_invariants(ledger: &HandLedger) {
        let hands = ledger.hands();
        let open: Vec<usize> = hands
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_completed())
            .map(|(i, _)| i)
            .collect();
        assert!(open.len() <= 1, "more than one hand awaiting books");
        if let Some(&pos) = open.first() {
            assert_eq!(pos, hands.len() - 1, "open hand is not the last hand");
        }
        for (pos, hand) in hands.iter().enumerate() {
            assert_eq!(hand.index, pos as u32 + 1);
        }
        assert_eq!(ledger.current_totals(), ledger.replay_totals());
    }

    #[test]
    fn test_new_ledger_awaits_bid() {
        let ledger = HandLedger::new();
        assert_eq!(ledger.state(), LedgerState::AwaitingBid);
        assert_eq!(ledger.current_totals(), (0, 0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_bid_then_books() {
        let mut ledger = HandLedger::new();
        let hand = ledger.record_bid(bid(4), false, bid(4), false).unwrap();
        assert_eq!(hand.index, 1);
        assert_eq!(ledger.state(), LedgerState::AwaitingBooks);

        let points = ledger.record_books(books(5), books(3)).unwrap();
        assert_eq!(points, (41, -40));
        assert_eq!(ledger.current_totals(), (41, -40));
        assert_eq!(ledger.state(), LedgerState::AwaitingBid);
    }

    #[test]
    fn test_bid_rejected_while_awaiting_books() {
        let mut ledger = HandLedger::new();
        ledger.record_bid(bid(3), false, bid(3), false).unwrap();
        let err = ledger.record_bid(bid(2), false, bid(2), false).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidPhase));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_books_without_open_hand() {
        let mut ledger = HandLedger::new();
        assert!(matches!(
            ledger.record_books(books(1), books(1)),
            Err(ArenaError::NoOpenHand)
        ));

        ledger.record_bid(bid(3), false, bid(3), false).unwrap();
        ledger.record_books(books(3), books(10)).unwrap();
        assert!(matches!(
            ledger.record_books(books(3), books(10)),
            Err(ArenaError::NoOpenHand)
        ));
    }

    #[test]
    fn test_undo_restores_state_after_bid() {
        let mut ledger = HandLedger::new();
        ledger.record_bid(bid(2), false, bid(5), true).unwrap();
        ledger.record_books(books(2), books(11)).unwrap();
        let before_books = {
            let mut l = ledger.clone();
            l.record_bid(bid(6), true, bid(0), false).unwrap();
            l
        };

        let mut after = before_books.clone();
        after.record_books(books(6), books(0)).unwrap();
        assert_eq!(after.undo_last().unwrap(), UndoOutcome::Reopened { index: 2 });
        assert_eq!(after, before_books);
        assert_eq!(after.current_totals(), ledger.current_totals());
    }

    #[test]
    fn test_undo_open_hand_removes_it() {
        let mut ledger = HandLedger::new();
        ledger.record_bid(bid(4), false, bid(4), false).unwrap();
        assert_eq!(ledger.undo_last().unwrap(), UndoOutcome::Removed { index: 1 });
        assert!(ledger.is_empty());
        assert_eq!(ledger.current_totals(), (0, 0));
    }

    #[test]
    fn test_undo_empty_ledger() {
        let mut ledger = HandLedger::new();
        assert!(matches!(ledger.undo_last(), Err(ArenaError::EmptyLedger)));
    }

    #[test]
    fn test_repeated_undo_walks_backwards() {
        let mut ledger = HandLedger::new();
        ledger.record_bid(bid(4), false, bid(4), false).unwrap();
        ledger.record_books(books(5), books(3)).unwrap();
        ledger.record_bid(bid(0), true, bid(3), false).unwrap();
        ledger.record_books(books(0), books(2)).unwrap();
        assert_eq!(ledger.current_totals(), (241, -70));

        assert_eq!(ledger.undo_last().unwrap(), UndoOutcome::Reopened { index: 2 });
        assert_eq!(ledger.current_totals(), (41, -40));
        assert_eq!(ledger.undo_last().unwrap(), UndoOutcome::Removed { index: 2 });
        assert_eq!(ledger.undo_last().unwrap(), UndoOutcome::Reopened { index: 1 });
        assert_eq!(ledger.undo_last().unwrap(), UndoOutcome::Removed { index: 1 });
        assert_eq!(ledger.current_totals(), (0, 0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_running_totals_skip_open_hand() {
        let mut ledger = HandLedger::new();
        ledger.record_bid(bid(4), false, bid(4), false).unwrap();
        ledger.record_books(books(5), books(3)).unwrap();
        ledger.record_bid(bid(0), true, bid(3), false).unwrap();

        let running = ledger.running_totals();
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].totals, (41, -40));
        assert_eq!(running[0].points, (41, -40));
        assert_eq!(running[0].books, (books(5), books(3)));
        assert_eq!(ledger.completed_count(), 1);
    }

    #[test]
    fn test_json_round_trip_recomputes_totals() {
        let mut ledger = HandLedger::new();
        ledger.record_bid(bid(4), false, bid(4), false).unwrap();
        ledger.record_books(books(5), books(3)).unwrap();
        ledger.record_bid(bid(1), false, bid(2), false).unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        let restored: HandLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ledger);
        assert_eq!(restored.current_totals(), (41, -40));
    }

    #[test]
    fn test_from_hands_rejects_open_hand_in_middle() {
        let mut first = HandRecord::open(1, bid(3), false, bid(3), false);
        let second = HandRecord::open(2, bid(3), false, bid(3), false);
        assert!(matches!(
            HandLedger::from_hands(vec![first.clone(), second.clone()]),
            Err(ArenaError::CorruptSnapshot(_))
        ));

        first.complete(books(3), books(3));
        assert!(HandLedger::from_hands(vec![first, second]).is_ok());
    }

    #[test]
    fn test_from_hands_rejects_bad_index_and_points() {
        let hand = HandRecord::open(2, bid(3), false, bid(3), false);
        assert!(matches!(
            HandLedger::from_hands(vec![hand]),
            Err(ArenaError::CorruptSnapshot(_))
        ));

        let mut hand = HandRecord::open(1, bid(3), false, bid(3), false);
        hand.phase = HandPhase::Completed {
            team1_books: books(3),
            team2_books: books(3),
            team1_points: 999,
            team2_points: 30,
        };
        assert!(matches!(
            HandLedger::from_hands(vec![hand]),
            Err(ArenaError::CorruptSnapshot(_))
        ));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Bid(u8, bool, u8, bool),
        Books(u8, u8),
        Undo,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..=13, any::<bool>(), 0u8..=13, any::<bool>())
                .prop_map(|(a, ab, b, bb)| Op::Bid(a, ab, b, bb)),
            (0u8..=13, 0u8..=13).prop_map(|(a, b)| Op::Books(a, b)),
            Just(Op::Undo),
        ]
    }

    proptest! {
        #[test]
        fn prop_ledger_invariants_hold(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut ledger = HandLedger::new();
            for op in ops {
                let state = ledger.state();
                match op {
                    Op::Bid(a, ab, b, bb) => {
                        let result = ledger.record_bid(bid(a), ab, bid(b), bb).map(|_| ());
                        prop_assert_eq!(result.is_ok(), state == LedgerState::AwaitingBid);
                    }
                    Op::Books(a, b) => {
                        let result = ledger.record_books(books(a), books(b));
                        prop_assert_eq!(result.is_ok(), state == LedgerState::AwaitingBooks);
                    }
                    Op::Undo => {
                        let was_empty = ledger.is_empty();
                        prop_assert_eq!(ledger.undo_last().is_err(), was_empty);
                    }
                }
                assert_invariants(&ledger);
            }
        }
    }
}
