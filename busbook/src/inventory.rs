//! Seat occupancy derived from reservations.
//!
//! Seats have no storage of their own. A seat is booked on a date when an
//! active reservation holds it on that date; [`SeatInventory`] answers
//! occupancy questions and performs the bulk reset.
//!
//! # Examples
//!
//! ```no_run
//! use busbook::inventory::{Occupancy, SeatInventory};
//! use busbook::{Database, DatabaseConfig, SeatId};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/busbook.db")).unwrap();
//! let inventory = SeatInventory::new(db.connection());
//! let saturday = "2024-06-08".parse().unwrap();
//!
//! if inventory.occupancy(SeatId::try_from(12).unwrap(), saturday).unwrap() == Occupancy::Available {
//!     println!("{} seats left", inventory.count_available(saturday).unwrap());
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use rusqlite::Connection;
use serde::Serialize;

use crate::database::{count_active_on, delete_stored_key, list_stored_keys, seat_has_any_active};
use crate::error::Result;
use crate::repository::ReservationRepository;
use crate::reservation::{Destination, ReservationField};
use crate::schedule::TravelDate;
use crate::seat::SeatId;

/// Whether a seat is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupancy {
    /// An active reservation holds the seat.
    Booked,
    /// Nobody holds the seat.
    Available,
}

impl Occupancy {
    const fn from_held(held: bool) -> Self {
        if held {
            Self::Booked
        } else {
            Self::Available
        }
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booked => write!(f, "booked"),
            Self::Available => write!(f, "available"),
        }
    }
}

/// One row of a seat map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatStatus {
    /// The seat.
    pub seat: SeatId,
    /// Its occupancy on the mapped date.
    pub occupancy: Occupancy,
    /// Email of the passenger holding it, if booked.
    pub holder: Option<String>,
}

/// Bookings alighting at one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationSummary {
    /// The interchange.
    pub destination: Destination,
    /// Number of active reservations.
    pub count: usize,
    /// Passenger names, in seat order.
    pub passengers: Vec<String>,
}

/// Read access to seat occupancy, plus the bulk reset.
#[derive(Debug, Clone, Copy)]
pub struct SeatInventory<'a> {
    conn: &'a Connection,
}

impl<'a> SeatInventory<'a> {
    /// Creates an inventory over a connection.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the occupancy of a seat on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn occupancy(&self, seat: SeatId, travel_date: TravelDate) -> Result<Occupancy> {
        Ok(Occupancy::from_held(
            self.conn.find_reservation_by_slot(seat, travel_date)?.is_some(),
        ))
    }

    /// Returns `Booked` if any active reservation holds the seat on any date.
    ///
    /// This is the date-blind rule older seat maps used. It over-reports
    /// (a seat booked next Tuesday reads as booked today) and is kept for
    /// listings that still want it; booking decisions use [`Self::occupancy`].
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn occupancy_any_date(&self, seat: SeatId) -> Result<Occupancy> {
        Ok(Occupancy::from_held(seat_has_any_active(self.conn, seat)?))
    }

    /// Counts seats booked on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn count_booked(&self, travel_date: TravelDate) -> Result<usize> {
        count_active_on(self.conn, travel_date)
    }

    /// Counts seats free on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn count_available(&self, travel_date: TravelDate) -> Result<usize> {
        Ok(SeatId::COUNT.saturating_sub(self.count_booked(travel_date)?))
    }

    /// Returns the status of every seat on a date, in seat order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn seat_map(&self, travel_date: TravelDate) -> Result<Vec<SeatStatus>> {
        let holders: BTreeMap<SeatId, String> = self
            .conn
            .query_reservations(&ReservationField::TravelDate(travel_date))?
            .into_iter()
            .filter(|r| r.is_active())
            .map(|r| (r.seat(), r.email().to_string()))
            .collect();

        Ok(SeatId::all()
            .map(|seat| {
                let holder = holders.get(&seat).cloned();
                SeatStatus {
                    seat,
                    occupancy: Occupancy::from_held(holder.is_some()),
                    holder,
                }
            })
            .collect())
    }

    /// Groups active reservations by destination, optionally for one date.
    ///
    /// Destinations with no bookings are omitted; the rest come in route
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn destination_report(
        &self,
        travel_date: Option<TravelDate>,
    ) -> Result<Vec<DestinationSummary>> {
        let reservations = match travel_date {
            Some(date) => self
                .conn
                .query_reservations(&ReservationField::TravelDate(date))?,
            None => self.conn.list_reservations()?,
        };

        let mut groups: BTreeMap<Destination, Vec<(SeatId, String)>> = BTreeMap::new();
        for r in reservations.into_iter().filter(|r| r.is_active()) {
            groups
                .entry(r.destination())
                .or_default()
                .push((r.seat(), r.full_name().to_string()));
        }

        Ok(groups
            .into_iter()
            .map(|(destination, mut passengers)| {
                passengers.sort();
                DestinationSummary {
                    destination,
                    count: passengers.len(),
                    passengers: passengers.into_iter().map(|(_, name)| name).collect(),
                }
            })
            .collect())
    }

    /// Deletes every reservation, returning how many were removed.
    ///
    /// Records are deleted one at a time with no surrounding transaction. A
    /// record removed concurrently by someone else is skipped, so running
    /// the reset again always succeeds. Only the key columns are read, so a
    /// row that no longer parses is still removed.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails part way; records already deleted
    /// stay deleted.
    pub fn reset_all(&self) -> Result<usize> {
        let mut removed = 0;
        for key in list_stored_keys(self.conn)? {
            if delete_stored_key(self.conn, &key)? {
                removed += 1;
            }
        }
        log::info!("reset removed {removed} reservation(s)");
        Ok(removed)
    }
}
