//! Common test utilities for integration tests.
//!
//! This module provides a throwaway database location and request fixtures
//! for testing the busbook library.

use std::path::PathBuf;
use std::time::Duration;

use busbook::operations::BookingRequest;
use busbook::{Database, DatabaseConfig, Destination, SeatId, TravelDate};
use tempfile::TempDir;

/// A database file in a temporary directory.
///
/// Each call to [`TestDb::open`] returns a fresh connection to the same
/// file, the way separate processes would see it.
pub struct TestDb {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the database file.
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("busbook.db");
        Database::open(DatabaseConfig::new(&path)).expect("Failed to create database");
        Self { temp_dir, path }
    }

    /// Opens another connection.
    pub fn open(&self) -> Database {
        self.open_with_timeout(Duration::from_secs(5))
    }

    /// Opens another connection with a specific busy timeout.
    pub fn open_with_timeout(&self, timeout: Duration) -> Database {
        Database::open(DatabaseConfig::new(&self.path).with_busy_timeout(timeout))
            .expect("Failed to open database")
    }
}

/// Parses a seat number.
#[allow(dead_code)]
pub fn seat(n: u16) -> SeatId {
    SeatId::try_from(n).expect("valid seat")
}

/// Parses an ISO date.
#[allow(dead_code)]
pub fn date(s: &str) -> TravelDate {
    s.parse().expect("valid date")
}

/// A complete one-way request for a seat and date.
#[allow(dead_code)]
pub fn request(email: &str, seat_number: u16, travel_date: &str) -> BookingRequest {
    BookingRequest::new(seat(seat_number), email)
        .with_full_name("Nimal Perera")
        .with_phone_number("0771234567")
        .with_enrollment_number("D/BCS/23/0001")
        .with_destination(Destination::Beliatta)
        .with_travel_date(date(travel_date))
}
