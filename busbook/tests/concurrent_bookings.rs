//! Concurrent booking tests.
//!
//! Each thread opens its own connection to a shared WAL-mode database, the
//! way separate processes would. The IMMEDIATE transaction around every
//! check-then-write must let exactly one writer win a contested slot.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use busbook::notify::NoopDispatcher;
use busbook::operations::{BookingService, RolloverService};
use busbook::repository::{ReservationRepository, RolloverRepository};
use busbook::reservation::ReservationField;
use busbook::{Error, JourneyType, SeatInventory};
use common::{date, request, seat, TestDb};

const WRITERS: usize = 8;

/// Tests that only one of many simultaneous bookings of one slot succeeds.
///
/// Losers must see a conflict (or, under heavy contention, a lock
/// timeout); none may see a storage error and the ledger must hold a
/// single record for the slot.
#[test]
fn test_contested_slot_has_one_winner() {
    let test_db = Arc::new(TestDb::new());
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let test_db = Arc::clone(&test_db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut db = test_db.open_with_timeout(Duration::from_secs(10));
                let notifier = NoopDispatcher;
                barrier.wait();
                BookingService::new(&mut db, &notifier)
                    .create_booking(&request(&format!("rider{i}@kdu.ac.lk"), 20, "2024-06-08"))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one booking should win: {results:?}");
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(
            err.is_conflict() || matches!(err, Error::LockTimeout { .. }),
            "unexpected error for a losing writer: {err:?}"
        );
    }

    let held = test_db
        .open()
        .connection()
        .query_reservations(&ReservationField::Seat(seat(20)))
        .unwrap();
    assert_eq!(held.len(), 1);
}

/// Tests that round trips racing for overlapping slots never split.
///
/// Two passengers each want seat 9 on the same two dates. Whoever wins
/// must hold both dates; the other must hold neither.
#[test]
fn test_racing_round_trips_are_all_or_nothing() {
    let test_db = Arc::new(TestDb::new());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = [("2024-06-08", "2024-06-11"), ("2024-06-11", "2024-06-08")]
        .into_iter()
        .enumerate()
        .map(|(i, (first, second))| {
            let test_db = Arc::clone(&test_db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut db = test_db.open_with_timeout(Duration::from_secs(10));
                let notifier = NoopDispatcher;
                let round_trip = request(&format!("rider{i}@kdu.ac.lk"), 9, first)
                    .with_journey_type(JourneyType::RoundTrip)
                    .with_travel_date(date(second));
                barrier.wait();
                BookingService::new(&mut db, &notifier).create_booking(&round_trip)
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join().unwrap();
    }

    let held = test_db
        .open()
        .connection()
        .query_reservations(&ReservationField::Seat(seat(9)))
        .unwrap();
    assert_eq!(held.len(), 2);
    assert_eq!(held[0].email(), held[1].email());
}

/// Tests that writers on different seats do not block each other out.
#[test]
fn test_distinct_seats_all_succeed() {
    let test_db = Arc::new(TestDb::new());

    let handles: Vec<_> = (1..=WRITERS)
        .map(|n| {
            let test_db = Arc::clone(&test_db);
            thread::spawn(move || {
                let mut db = test_db.open_with_timeout(Duration::from_secs(10));
                let notifier = NoopDispatcher;
                let seat_number = u16::try_from(n).unwrap();
                BookingService::new(&mut db, &notifier).create_booking(&request(
                    &format!("rider{n}@kdu.ac.lk"),
                    seat_number,
                    "2024-06-08",
                ))
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let db = test_db.open();
    let inventory = SeatInventory::new(db.connection());
    assert_eq!(inventory.count_booked(date("2024-06-08")).unwrap(), WRITERS);
}

/// Tests that two resets racing over the same records delete each once.
#[test]
fn test_concurrent_resets_split_the_work() {
    let test_db = Arc::new(TestDb::new());
    {
        let mut db = test_db.open();
        let notifier = NoopDispatcher;
        let mut service = BookingService::new(&mut db, &notifier);
        for n in 1..=10u16 {
            service
                .create_booking(&request(&format!("p{n}@kdu.ac.lk"), n, "2024-06-08"))
                .unwrap();
        }
        assert_eq!(db.connection().list_reservations().unwrap().len(), 10);
    }

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let test_db = Arc::clone(&test_db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let db = test_db.open_with_timeout(Duration::from_secs(10));
                barrier.wait();
                SeatInventory::new(db.connection()).reset_all()
            })
        })
        .collect();

    let removed: usize = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .sum();
    assert_eq!(removed, 10);
    assert!(test_db
        .open()
        .connection()
        .list_reservations()
        .unwrap()
        .is_empty());
}

/// Tests that simultaneous opens for one passenger store a single request.
#[test]
fn test_concurrent_rollover_opens_store_one_request() {
    for _ in 0..5 {
        let test_db = Arc::new(TestDb::new());
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                let test_db = Arc::clone(&test_db);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let mut db = test_db.open_with_timeout(Duration::from_secs(10));
                    let notifier = NoopDispatcher;
                    barrier.wait();
                    RolloverService::new(&mut db, &notifier).open_request("nimal@kdu.ac.lk")
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            results.iter().filter(|r| r.is_ok()).count(),
            1,
            "exactly one open should win: {results:?}"
        );
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.is_conflict() || matches!(err, Error::LockTimeout { .. }),
                "unexpected error for a losing open: {err:?}"
            );
        }

        assert_eq!(test_db.open().connection().list_rollovers().unwrap().len(), 1);
    }
}

/// Tests a finalize racing a fresh booking for the staged slot.
///
/// Whichever wins holds the slot alone. A losing finalize must leave the
/// request staged and the passenger's old booking in place; a losing
/// booking must leave nothing behind.
#[test]
fn test_finalize_races_booking_for_staged_slot() {
    for _ in 0..5 {
        let test_db = Arc::new(TestDb::new());
        let request_id = {
            let mut db = test_db.open();
            let notifier = NoopDispatcher;
            BookingService::new(&mut db, &notifier)
                .create_booking(&request("nimal@kdu.ac.lk", 12, "2024-06-08"))
                .unwrap();
            let mut rollovers = RolloverService::new(&mut db, &notifier);
            let opened = rollovers.open_request("nimal@kdu.ac.lk").unwrap();
            rollovers
                .stage_details(opened.id, seat(4), date("2024-06-11"), None)
                .unwrap();
            opened.id
        };

        let barrier = Arc::new(Barrier::new(2));
        let finalizer = {
            let test_db = Arc::clone(&test_db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut db = test_db.open_with_timeout(Duration::from_secs(10));
                let notifier = NoopDispatcher;
                barrier.wait();
                RolloverService::new(&mut db, &notifier)
                    .finalize(request_id)
                    .map(|_| ())
            })
        };
        let booker = {
            let test_db = Arc::clone(&test_db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut db = test_db.open_with_timeout(Duration::from_secs(10));
                let notifier = NoopDispatcher;
                barrier.wait();
                BookingService::new(&mut db, &notifier)
                    .create_booking(&request("sunil@kdu.ac.lk", 4, "2024-06-11"))
                    .map(|_| ())
            })
        };

        let finalized = finalizer.join().unwrap();
        let booked = booker.join().unwrap();
        assert!(
            finalized.is_ok() != booked.is_ok(),
            "exactly one writer should win: finalize {finalized:?}, book {booked:?}"
        );

        let db = test_db.open();
        let conn = db.connection();
        let holder = conn
            .find_reservation_by_slot(seat(4), date("2024-06-11"))
            .unwrap()
            .expect("staged slot should be held");
        let nimal = conn
            .query_reservations(&ReservationField::Email("nimal@kdu.ac.lk".into()))
            .unwrap();

        if finalized.is_ok() {
            assert_eq!(holder.email(), "nimal@kdu.ac.lk");
            assert_eq!(nimal.len(), 1);
            assert!(conn.get_rollover(request_id).unwrap().is_none());
            assert!(conn
                .query_reservations(&ReservationField::Email("sunil@kdu.ac.lk".into()))
                .unwrap()
                .is_empty());
        } else {
            assert_eq!(holder.email(), "sunil@kdu.ac.lk");
            assert_eq!(nimal.len(), 1);
            assert_eq!(nimal[0].seat(), seat(12));
            let kept = conn.get_rollover(request_id).unwrap().expect("request kept");
            assert_eq!(kept.staged_slot(), Some((seat(4), date("2024-06-11"))));
        }
    }
}
