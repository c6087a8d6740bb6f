//! Rollover requests: moving a passenger to a new seat or date.
//!
//! A request starts `Pending` when a passenger is told their booking cannot
//! be honored. An administrator stages a revised seat and date (`Staged`),
//! then finalizes it into a reservation. Finalized and dismissed requests
//! are deleted, so only the two non-terminal states are ever stored.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::reservation::{Destination, ValidationError};
use crate::schedule::TravelDate;
use crate::seat::SeatId;

/// Storage identifier of a rollover request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolloverId(i64);

impl RolloverId {
    /// Wraps a raw storage id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw storage id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RolloverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RolloverId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(Self)
            .ok_or_else(|| ValidationError {
                field: "rollover_id".into(),
                message: format!("'{s}' is not a rollover request id"),
            })
    }
}

/// Persisted state of a rollover request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RolloverStatus {
    /// Created, no revised seat or date yet.
    #[default]
    Pending,
    /// A revised seat and date are recorded and ready to finalize.
    Staged,
}

impl RolloverStatus {
    /// Returns the lowercase storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Staged => "staged",
        }
    }
}

impl FromStr for RolloverStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "staged" => Ok(Self::Staged),
            _ => Err(ValidationError {
                field: "status".into(),
                message: format!("'{s}' is not a rollover status"),
            }),
        }
    }
}

impl fmt::Display for RolloverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored rollover request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverRequest {
    /// Storage id.
    pub id: RolloverId,
    /// The passenger's normalized email.
    pub email: String,
    /// Current state.
    pub status: RolloverStatus,
    /// Revised seat, set when staged.
    pub seat: Option<SeatId>,
    /// Revised travel date, set when staged.
    pub travel_date: Option<TravelDate>,
    /// Destination copied from the passenger's booking, or chosen when staging.
    pub destination: Option<Destination>,
    /// When the request was opened.
    pub created_at: SystemTime,
    /// When the request last changed.
    pub updated_at: SystemTime,
}

impl RolloverRequest {
    /// Returns the staged seat and date, if the request is staged.
    #[must_use]
    pub fn staged_slot(&self) -> Option<(SeatId, TravelDate)> {
        match (self.status, self.seat, self.travel_date) {
            (RolloverStatus::Staged, Some(seat), Some(date)) => Some((seat, date)),
            _ => None,
        }
    }
}

/// A partial update of a rollover request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolloverPatch {
    /// New status.
    pub status: Option<RolloverStatus>,
    /// New revised seat.
    pub seat: Option<SeatId>,
    /// New revised date.
    pub travel_date: Option<TravelDate>,
    /// New destination.
    pub destination: Option<Destination>,
}

impl RolloverPatch {
    /// The patch that stages a revised seat and date.
    #[must_use]
    pub const fn stage(seat: SeatId, travel_date: TravelDate) -> Self {
        Self {
            status: Some(RolloverStatus::Staged),
            seat: Some(seat),
            travel_date: Some(travel_date),
            destination: None,
        }
    }

    /// Also sets the destination.
    #[must_use]
    pub fn with_destination(mut self, destination: Option<Destination>) -> Self {
        self.destination = destination;
        self
    }
}

/// A single-field filter for rollover queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloverField {
    /// Requests for an email (normalized before lookup).
    Email(String),
    /// Requests in a state.
    Status(RolloverStatus),
}

/// A rollover request joined with the passenger's current reservation.
///
/// `destination` prefers the request's own value and falls back to the
/// reservation's; `checked_in` comes from the reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolloverView {
    /// The stored request.
    pub request: RolloverRequest,
    /// Resolved destination.
    pub destination: Option<Destination>,
    /// Whether the passenger checked in on their current booking.
    pub checked_in: Option<bool>,
}
