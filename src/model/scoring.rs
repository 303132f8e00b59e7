//! Spades scoring rules for one team in one hand

use crate::error::{ArenaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest number of tricks in a hand
pub const MAX_TRICKS: u8 = 13;

/// Points awarded (or lost) for a nil bid
const NIL_VALUE: i32 = 100;

/// A declared trick count for one team (0-13)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Bid(u8);

impl Bid {
    pub fn new(value: u8) -> Result<Self> {
        if value > MAX_TRICKS {
            return Err(ArenaError::InvalidBid(value));
        }
        Ok(Bid(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Whether this is a nil bid (zero tricks)
    pub fn is_nil(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for Bid {
    type Error = ArenaError;

    fn try_from(value: u8) -> Result<Self> {
        Bid::new(value)
    }
}

impl From<Bid> for u8 {
    fn from(bid: Bid) -> u8 {
        bid.0
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "Nil")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Tricks actually won by one team in a hand (0-13)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Books(u8);

impl Books {
    pub fn new(value: u8) -> Result<Self> {
        if value > MAX_TRICKS {
            return Err(ArenaError::InvalidBooks(value));
        }
        Ok(Books(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Books {
    type Error = ArenaError;

    fn try_from(value: u8) -> Result<Self> {
        Books::new(value)
    }
}

impl From<Books> for u8 {
    fn from(books: Books) -> u8 {
        books.0
    }
}

impl fmt::Display for Books {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calculate the points one team earns for a hand.
///
/// The result depends only on that team's own bid, books and blind flag.
/// Blind bids settle on an exact match only and never earn bags.
pub fn compute_hand_points(bid: Bid, books: Books, is_blind: bool) -> i32 {
    let bid = bid.value() as i32;
    let books = books.value() as i32;
    let multiplier = if is_blind { 2 } else { 1 };

    // Nil
    if bid == 0 {
        return if books == 0 {
            NIL_VALUE * multiplier
        } else {
            -NIL_VALUE * multiplier
        };
    }

    if is_blind {
        return if books == bid { bid * 20 } else { -(bid * 20) };
    }

    if books >= bid {
        bid * 10 + (books - bid)
    } else {
        -(bid * 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn points(bid: u8, books: u8, blind: bool) -> i32 {
        compute_hand_points(Bid::new(bid).unwrap(), Books::new(books).unwrap(), blind)
    }

    #[test]
    fn test_bid_range() {
        assert!(Bid::new(0).is_ok());
        assert!(Bid::new(13).is_ok());
        assert!(matches!(Bid::new(14), Err(ArenaError::InvalidBid(14))));
    }

    #[test]
    fn test_books_range() {
        assert!(Books::new(13).is_ok());
        assert!(matches!(Books::new(20), Err(ArenaError::InvalidBooks(20))));
    }

    #[test]
    fn test_nil_bids() {
        assert_eq!(points(0, 0, false), 100);
        assert_eq!(points(0, 0, true), 200);
        assert_eq!(points(0, 1, false), -100);
        assert_eq!(points(0, 5, true), -200);
    }

    #[test]
    fn test_regular_bid_with_bags() {
        // 4 bid, 5 taken: 40 + 1 bag
        assert_eq!(points(4, 5, false), 41);
        assert_eq!(points(3, 2, false), -30);
        assert_eq!(points(13, 13, false), 130);
    }

    #[test]
    fn test_blind_bid_is_exact_only() {
        assert_eq!(points(5, 5, true), 100);
        assert_eq!(points(5, 6, true), -100);
        assert_eq!(points(5, 4, true), -100);
    }

    #[test]
    fn test_bid_display() {
        assert_eq!(Bid::new(0).unwrap().to_string(), "Nil");
        assert_eq!(Bid::new(7).unwrap().to_string(), "7");
    }

    #[test]
    fn test_bid_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Bid>("14").is_err());
        assert_eq!(serde_json::from_str::<Bid>("6").unwrap().value(), 6);
    }

    proptest! {
        #[test]
        fn prop_made_bid_earns_ten_per_trick_plus_bags(bid in 1u8..=13, extra in 0u8..=12) {
            prop_assume!(bid + extra <= MAX_TRICKS);
            prop_assert_eq!(points(bid, bid, false), bid as i32 * 10);
            prop_assert_eq!(points(bid, bid + extra, false), bid as i32 * 10 + extra as i32);
        }

        #[test]
        fn prop_set_bid_loses_ten_per_trick(bid in 1u8..=13) {
            prop_assert_eq!(points(bid, bid - 1, false), -(bid as i32 * 10));
        }

        #[test]
        fn prop_blind_bid_settles_on_exact_match(bid in 1u8..=13, books in 0u8..=13) {
            let expected = if books == bid { bid as i32 * 20 } else { -(bid as i32 * 20) };
            prop_assert_eq!(points(bid, books, true), expected);
        }
    }
}
