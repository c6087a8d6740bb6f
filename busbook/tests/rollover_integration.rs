//! Integration tests for the rollover workflow.
//!
//! A request is opened, staged with a revised seat and date, then
//! finalized into the passenger's only reservation.

mod common;

use busbook::notify::{Notification, RecordingDispatcher};
use busbook::operations::{BookingService, RolloverService};
use busbook::repository::{ReservationRepository, RolloverRepository};
use busbook::{Database, Destination, Error, RolloverStatus};
use common::{date, request, seat, TestDb};

fn book(db: &mut Database, email: &str, seat_number: u16, travel_date: &str) {
    let notifier = RecordingDispatcher::new();
    BookingService::new(db, &notifier)
        .create_booking(&request(email, seat_number, travel_date))
        .unwrap();
}

#[test]
fn test_full_rollover_workflow() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    book(&mut db, "nimal@kdu.ac.lk", 12, "2024-06-08");
    book(&mut db, "nimal@kdu.ac.lk", 12, "2024-06-01");

    let notifier = RecordingDispatcher::new();
    let mut service = RolloverService::new(&mut db, &notifier).with_sender("transport-office");

    let opened = service.open_request("nimal@kdu.ac.lk").unwrap();
    assert_eq!(opened.status, RolloverStatus::Pending);
    assert_eq!(opened.destination, Some(Destination::Beliatta));

    let staged = service
        .stage_details(opened.id, seat(4), date("2024-06-11"), None)
        .unwrap();
    assert_eq!(staged.status, RolloverStatus::Staged);

    let outcome = service.finalize(opened.id).unwrap();
    assert_eq!(outcome.superseded, 2);
    assert_eq!(outcome.reservation.seat(), seat(4));
    assert_eq!(outcome.reservation.full_name(), "Nimal Perera");
    assert_eq!(
        outcome.notice,
        "You have been booked for seat 4 according to your rollover request on 2024-06-11 to Beliatta Interchange."
    );
    assert_eq!(outcome.delivery.sent, 1);
    assert!(matches!(
        notifier.sent().as_slice(),
        [Notification::RolloverNotice { recipient, .. }] if recipient == "nimal@kdu.ac.lk"
    ));

    let reader = test_db.open();
    let conn = reader.connection();
    let remaining = conn.list_reservations().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].travel_date(), date("2024-06-11"));
    assert!(conn.list_rollovers().unwrap().is_empty());

    let notices = Database::list_notices(conn).unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].sender, "transport-office");
    assert_eq!(notices[0].message, outcome.notice);
}

#[test]
fn test_finalize_into_taken_slot_changes_nothing() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    book(&mut db, "nimal@kdu.ac.lk", 12, "2024-06-08");
    book(&mut db, "kamala@kdu.ac.lk", 4, "2024-06-11");

    let notifier = RecordingDispatcher::new();
    let mut service = RolloverService::new(&mut db, &notifier);
    let opened = service.open_request("nimal@kdu.ac.lk").unwrap();
    service
        .stage_details(opened.id, seat(4), date("2024-06-11"), None)
        .unwrap();

    let err = service.finalize(opened.id).unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got {err:?}");
    assert!(notifier.sent().is_empty());

    let conn = db.connection();
    assert_eq!(conn.list_reservations().unwrap().len(), 2);
    assert_eq!(
        conn.get_rollover(opened.id).unwrap().unwrap().status,
        RolloverStatus::Staged
    );
    assert!(Database::list_notices(conn).unwrap().is_empty());
}

#[test]
fn test_finalize_requires_staging() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    book(&mut db, "nimal@kdu.ac.lk", 12, "2024-06-08");

    let notifier = RecordingDispatcher::new();
    let mut service = RolloverService::new(&mut db, &notifier);
    let opened = service.open_request("nimal@kdu.ac.lk").unwrap();

    match service.finalize(opened.id).unwrap_err() {
        Error::Validation { field, .. } => assert_eq!(field, "status"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_stage_rejects_off_schedule_date() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    let notifier = RecordingDispatcher::new();
    let mut service = RolloverService::new(&mut db, &notifier);
    let opened = service.open_request("nimal@kdu.ac.lk").unwrap();

    let err = service
        .stage_details(opened.id, seat(4), date("2024-06-05"), None)
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        db.connection().get_rollover(opened.id).unwrap().unwrap().status,
        RolloverStatus::Pending
    );
}

#[test]
fn test_listing_dismissing_and_clearing() {
    let test_db = TestDb::new();
    let mut db = test_db.open();
    book(&mut db, "nimal@kdu.ac.lk", 12, "2024-06-08");

    let notifier = RecordingDispatcher::new();
    let mut service = RolloverService::new(&mut db, &notifier);
    let first = service.open_request("nimal@kdu.ac.lk").unwrap();
    service.open_request("kamala@kdu.ac.lk").unwrap();
    service.open_request("sunil@kdu.ac.lk").unwrap();

    assert!(service.open_request("NIMAL@kdu.ac.lk").unwrap_err().is_conflict());

    let views = service.list_requests().unwrap();
    assert_eq!(views.len(), 3);
    let nimal = views
        .iter()
        .find(|v| v.request.email == "nimal@kdu.ac.lk")
        .unwrap();
    assert_eq!(nimal.destination, Some(Destination::Beliatta));
    assert_eq!(nimal.checked_in, Some(false));

    service.dismiss(first.id).unwrap();
    assert!(service.dismiss(first.id).unwrap_err().is_not_found());

    assert_eq!(service.clear_all().unwrap(), 2);
    assert_eq!(service.clear_all().unwrap(), 0);

    // Dismissing and clearing never touch bookings
    assert_eq!(db.connection().list_reservations().unwrap().len(), 1);
}
