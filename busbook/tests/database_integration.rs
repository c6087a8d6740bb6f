//! Integration tests for the database layer.
//!
//! These tests exercise auto-initialization, schema versioning, persistence
//! across connections, and the storage-level slot constraint.

mod common;

use busbook::notify::NoopDispatcher;
use busbook::operations::BookingService;
use busbook::repository::ReservationRepository;
use busbook::{Database, DatabaseConfig, Error};
use common::{date, request, seat, TestDb};
use rusqlite::params;
use tempfile::tempdir;

#[test]
fn test_database_auto_creation() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("subdir").join("busbook.db");
    assert!(!db_path.parent().unwrap().exists());

    let _db = Database::open(DatabaseConfig::new(&db_path)).unwrap();

    assert!(db_path.exists());
}

#[test]
fn test_missing_database_without_auto_create() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("busbook.db");

    let result = Database::open(DatabaseConfig::new(&db_path).without_auto_create());

    assert!(matches!(result, Err(Error::DataDirectoryNotFound { .. })));
    assert!(!db_path.exists());
}

#[test]
fn test_bookings_visible_to_other_connections() {
    let test_db = TestDb::new();
    let notifier = NoopDispatcher;

    let mut writer = test_db.open();
    BookingService::new(&mut writer, &notifier)
        .create_booking(&request("nimal@kdu.ac.lk", 12, "2024-06-08"))
        .unwrap();
    drop(writer);

    let reader = test_db.open();
    let holder = reader
        .connection()
        .find_reservation_by_slot(seat(12), date("2024-06-08"))
        .unwrap()
        .expect("slot should be held");
    assert_eq!(holder.email(), "nimal@kdu.ac.lk");
}

#[test]
fn test_storage_rejects_second_active_holder() {
    let test_db = TestDb::new();
    let db = test_db.open();
    let insert = |email: &str| {
        db.connection().execute(
            "INSERT INTO reservations (email, seat_id, travel_date, full_name, phone_number, \
             enrollment_number, journey_type, destination, role, active, checked_in, booked_at) \
             VALUES (?1, 12, '2024-06-08', 'Name', '0770000000', 'X1', 'one-way', \
             'Beliatta Interchange', 'student', 1, 0, 0)",
            params![email],
        )
    };

    insert("nimal@kdu.ac.lk").unwrap();
    assert!(insert("sunil@kdu.ac.lk").is_err());
}

#[test]
fn test_storage_rejects_out_of_range_seat() {
    let test_db = TestDb::new();
    let db = test_db.open();

    let result = db.connection().execute(
        "INSERT INTO reservations (email, seat_id, travel_date, full_name, phone_number, \
         enrollment_number, journey_type, destination, role, active, checked_in, booked_at) \
         VALUES ('nimal@kdu.ac.lk', 46, '2024-06-08', 'Name', '0770000000', 'X1', 'one-way', \
         'Beliatta Interchange', 'student', 1, 0, 0)",
        [],
    );

    assert!(result.is_err());
}

#[test]
fn test_newer_schema_is_refused() {
    let test_db = TestDb::new();
    {
        let db = test_db.open();
        db.connection()
            .execute(
                "UPDATE metadata SET value = '99' WHERE key = 'schema_version'",
                [],
            )
            .unwrap();
    }

    let result = Database::open(DatabaseConfig::new(&test_db.path));
    assert!(matches!(
        result,
        Err(Error::UnsupportedSchemaVersion { found: 99, .. })
    ));
}
