//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::reservation::{Destination, Reservation, ReservationKey, Role};
use crate::seat::SeatId;

/// Creates a temporary test database that lives until the process exits.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the database
    std::mem::forget(dir);

    db
}

/// Creates an active one-way reservation for a student bound for Beliatta.
///
/// # Panics
///
/// Panics if any argument is invalid.
#[must_use]
pub fn create_test_reservation(email: &str, seat: u16, date: &str) -> Reservation {
    let key = ReservationKey::new(email, SeatId::try_from(seat).unwrap(), date.parse().unwrap())
        .unwrap();
    Reservation::builder(key)
        .full_name("Test Passenger")
        .phone_number("0771234567")
        .enrollment_number("D/BCS/23/0001")
        .destination(Destination::Beliatta)
        .role(Role::Student)
        .build()
        .unwrap()
}
