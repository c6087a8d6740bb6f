//! Seat identifiers for the bus.
//!
//! Seats are numbered 1 through 45. A seat has no storage of its own; its
//! occupancy is derived from reservations (see [`crate::inventory`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A valid seat number (1-45).
///
/// # Examples
///
/// ```
/// use busbook::SeatId;
///
/// let seat = SeatId::try_from(12).unwrap();
/// assert_eq!(seat.value(), 12);
///
/// assert!(SeatId::try_from(0).is_err());
/// assert!(SeatId::try_from(46).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct SeatId(u16);

impl SeatId {
    /// The lowest seat number.
    pub const MIN: u16 = 1;

    /// The highest seat number.
    pub const MAX: u16 = 45;

    /// Total number of seats on the bus.
    pub const COUNT: usize = Self::MAX as usize;

    /// Returns the underlying seat number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Iterates over every seat in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use busbook::SeatId;
    ///
    /// let seats: Vec<SeatId> = SeatId::all().collect();
    /// assert_eq!(seats.len(), SeatId::COUNT);
    /// assert_eq!(seats[0].value(), 1);
    /// assert_eq!(seats[44].value(), 45);
    /// ```
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(SeatId)
    }
}

impl TryFrom<u16> for SeatId {
    type Error = InvalidSeatError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidSeatError {
                value,
                reason: format!("seat must be between {} and {}", Self::MIN, Self::MAX),
            })
        }
    }
}

impl From<SeatId> for u16 {
    fn from(seat: SeatId) -> Self {
        seat.0
    }
}

impl FromStr for SeatId {
    type Err = InvalidSeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u16 = s.trim().parse().map_err(|_| InvalidSeatError {
            value: 0,
            reason: format!("'{s}' is not a seat number"),
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid seat numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSeatError {
    /// The invalid seat value.
    pub value: u16,
    /// The reason the seat is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidSeatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid seat {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidSeatError {}
