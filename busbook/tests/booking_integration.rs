//! Integration tests for booking, rebooking and cancellation.
//!
//! These tests drive `BookingService` against an on-disk database and
//! check what a fresh connection sees afterwards.

mod common;

use busbook::notify::{Notification, NoopDispatcher, RecordingDispatcher};
use busbook::operations::BookingService;
use busbook::repository::{ReservationRepository, UserRepository};
use busbook::reservation::ReservationField;
use busbook::{Error, JourneyType, ReservationKey, SeatInventory};
use common::{date, request, seat, TestDb};

#[test]
fn test_double_booking_is_rejected() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = NoopDispatcher;

    BookingService::new(&mut db, &notifier)
        .create_booking(&request("nimal@kdu.ac.lk", 12, "2024-06-08"))
        .unwrap();

    let err = BookingService::new(&mut db, &notifier)
        .create_booking(&request("kamala@kdu.ac.lk", 12, "2024-06-08"))
        .unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got {err:?}");

    let reservations = test_db.open().connection().list_reservations().unwrap();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0].email(), "nimal@kdu.ac.lk");
}

#[test]
fn test_same_seat_on_another_date_is_allowed() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = NoopDispatcher;
    let mut service = BookingService::new(&mut db, &notifier);

    service
        .create_booking(&request("nimal@kdu.ac.lk", 12, "2024-06-08"))
        .unwrap();
    service
        .create_booking(&request("kamala@kdu.ac.lk", 12, "2024-06-11"))
        .unwrap();

    let by_seat = service
        .list_bookings(Some(&ReservationField::Seat(seat(12))))
        .unwrap();
    assert_eq!(by_seat.len(), 2);
}

#[test]
fn test_off_schedule_date_is_rejected() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = RecordingDispatcher::new();

    // 2024-06-05 is a Wednesday
    let err = BookingService::new(&mut db, &notifier)
        .create_booking(&request("nimal@kdu.ac.lk", 5, "2024-06-05"))
        .unwrap_err();

    match err {
        Error::Validation { field, .. } => assert_eq!(field, "travel_date"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(db.connection().list_reservations().unwrap().is_empty());
    assert!(notifier.sent().is_empty());
}

#[test]
fn test_round_trip_with_one_bad_date_writes_nothing() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = NoopDispatcher;

    let round_trip = request("nimal@kdu.ac.lk", 7, "2024-06-08")
        .with_journey_type(JourneyType::RoundTrip)
        .with_travel_date(date("2024-06-05"));

    let err = BookingService::new(&mut db, &notifier)
        .create_booking(&round_trip)
        .unwrap_err();
    assert!(err.is_validation());

    let seat_seven = db
        .connection()
        .query_reservations(&ReservationField::Seat(seat(7)))
        .unwrap();
    assert!(seat_seven.is_empty());
}

#[test]
fn test_round_trip_conflict_on_second_date_writes_nothing() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = NoopDispatcher;

    BookingService::new(&mut db, &notifier)
        .create_booking(&request("kamala@kdu.ac.lk", 7, "2024-06-11"))
        .unwrap();

    let round_trip = request("nimal@kdu.ac.lk", 7, "2024-06-08")
        .with_journey_type(JourneyType::RoundTrip)
        .with_travel_date(date("2024-06-11"));
    let err = BookingService::new(&mut db, &notifier)
        .create_booking(&round_trip)
        .unwrap_err();
    assert!(err.is_conflict());

    let nimal = db
        .connection()
        .query_reservations(&ReservationField::Email("nimal@kdu.ac.lk".into()))
        .unwrap();
    assert!(nimal.is_empty());
    assert!(db.connection().get_user("nimal@kdu.ac.lk").unwrap().is_none());
}

#[test]
fn test_round_trip_books_both_dates_and_confirms_each() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = RecordingDispatcher::new();

    let round_trip = request("Nimal@KDU.ac.lk", 7, "2024-06-08")
        .with_journey_type(JourneyType::RoundTrip)
        .with_travel_date(date("2024-06-11"));
    let outcome = BookingService::new(&mut db, &notifier)
        .create_booking(&round_trip)
        .unwrap();

    assert_eq!(outcome.reservations().len(), 2);
    assert_eq!(outcome.delivery.sent, 2);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent
        .iter()
        .all(|n| matches!(n, Notification::BookingConfirmation { recipient, .. } if recipient == "nimal@kdu.ac.lk")));

    let profile = test_db
        .open()
        .connection()
        .get_user("nimal@kdu.ac.lk")
        .unwrap()
        .unwrap();
    assert_eq!(profile.full_name(), "Nimal Perera");
}

#[test]
fn test_failed_notification_keeps_booking() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = RecordingDispatcher::failing();

    let outcome = BookingService::new(&mut db, &notifier)
        .create_booking(&request("nimal@kdu.ac.lk", 3, "2024-06-08"))
        .unwrap();

    assert_eq!(outcome.delivery.failed, 1);
    assert_eq!(db.connection().list_reservations().unwrap().len(), 1);
}

#[test]
fn test_rebook_takes_new_seat_and_overwrites_own_slot() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = NoopDispatcher;
    let mut service = BookingService::new(&mut db, &notifier);

    service
        .create_booking(&request("nimal@kdu.ac.lk", 12, "2024-06-08"))
        .unwrap();
    let outcome = service
        .rebook_booking(seat(14), &request("nimal@kdu.ac.lk", 12, "2024-06-08"))
        .unwrap();
    assert_eq!(outcome.reservations()[0].seat(), seat(14));

    // Rebooking over the passenger's own slot overwrites it
    service
        .rebook_booking(
            seat(14),
            &request("nimal@kdu.ac.lk", 14, "2024-06-08").with_full_name("Nimal A. Perera"),
        )
        .unwrap();
    let held = service
        .list_bookings(Some(&ReservationField::Seat(seat(14))))
        .unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].full_name(), "Nimal A. Perera");

    // Someone else's slot is still protected
    let err = service
        .rebook_booking(seat(14), &request("kamala@kdu.ac.lk", 1, "2024-06-08"))
        .unwrap_err();
    assert!(err.is_conflict());
}

#[test]
fn test_cancel_frees_the_slot() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = NoopDispatcher;
    let mut service = BookingService::new(&mut db, &notifier);

    service
        .create_booking(&request("nimal@kdu.ac.lk", 12, "2024-06-08"))
        .unwrap();
    let key = ReservationKey::new("nimal@kdu.ac.lk", seat(12), date("2024-06-08")).unwrap();

    assert!(service.cancel_booking(&key).unwrap());
    assert!(!service.cancel_booking(&key).unwrap());

    service
        .create_booking(&request("kamala@kdu.ac.lk", 12, "2024-06-08"))
        .unwrap();
}

#[test]
fn test_dry_run_leaves_database_untouched() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = RecordingDispatcher::new();

    let outcome = BookingService::new(&mut db, &notifier)
        .dry_run()
        .create_booking(&request("nimal@kdu.ac.lk", 12, "2024-06-08"))
        .unwrap();

    assert!(outcome.execution.dry_run);
    assert!(notifier.sent().is_empty());
    assert!(db.connection().list_reservations().unwrap().is_empty());
    assert_eq!(
        SeatInventory::new(db.connection())
            .count_available(date("2024-06-08"))
            .unwrap(),
        45
    );
}
