use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tempfile::TempDir;

use busbook::database::{Database, DatabaseConfig};
use busbook::inventory::SeatInventory;
use busbook::operations::{BookingPlan, BookingRequest, ExecutionResult, PlanExecutor};
use busbook::repository::ReservationRepository;
use busbook::{Destination, JourneyType, Schedule, SeatId, TravelDate};

const LEDGER_SIZES: &[usize] = &[45, 450, 2250];

fn setup_database() -> (TempDir, Database) {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let db_path = temp_dir.path().join("busbook.db");
    let db = Database::open(DatabaseConfig::new(&db_path)).expect("failed to open database");
    (temp_dir, db)
}

/// The `week`th Saturday after 2024-06-01.
fn saturday(week: usize) -> TravelDate {
    let first: TravelDate = "2024-06-01".parse().expect("valid date");
    let offset = i64::try_from(week * 7).expect("week offset fits");
    TravelDate::from(first.date() + chrono::Duration::days(offset))
}

fn request(index: usize, seat: SeatId, dates: Vec<TravelDate>) -> BookingRequest {
    BookingRequest::new(seat, format!("rider{index}@kdu.ac.lk"))
        .with_full_name("Bench Passenger")
        .with_phone_number("0771234567")
        .with_enrollment_number("D/BCS/23/0001")
        .with_destination(Destination::Beliatta)
        .with_travel_dates(dates)
}

fn perform_booking(db: &mut Database, request: BookingRequest) -> ExecutionResult {
    let schedule = Schedule::default();
    let plan = BookingPlan::new(request, &schedule)
        .build_plan(db.connection())
        .expect("failed to plan booking");
    PlanExecutor::new(db)
        .execute(&plan)
        .expect("failed to execute booking plan")
}

/// Books every seat on consecutive Saturdays until `count` reservations exist.
fn populate(db: &mut Database, count: usize) {
    for index in 0..count {
        let seat = SeatId::all()
            .nth(index % SeatId::COUNT)
            .expect("seat in range");
        perform_booking(db, request(index, seat, vec![saturday(index / SeatId::COUNT)]));
    }
}

fn bench_book_single(c: &mut Criterion) {
    c.bench_function("book_single", |b| {
        b.iter_batched(
            setup_database,
            |(temp_dir, mut db)| {
                let _temp_dir = temp_dir;
                let seat = SeatId::try_from(12).expect("valid seat");
                black_box(perform_booking(&mut db, request(0, seat, vec![saturday(0)])));
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_book_round_trip(c: &mut Criterion) {
    c.bench_function("book_round_trip", |b| {
        b.iter_batched(
            setup_database,
            |(temp_dir, mut db)| {
                let _temp_dir = temp_dir;
                let seat = SeatId::try_from(7).expect("valid seat");
                let round_trip = request(0, seat, vec![saturday(0), saturday(1)])
                    .with_journey_type(JourneyType::RoundTrip);
                black_box(perform_booking(&mut db, round_trip));
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_slot_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_lookup");

    for &size in LEDGER_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &count| {
            b.iter_batched(
                || {
                    let (temp_dir, mut db) = setup_database();
                    populate(&mut db, count);
                    (temp_dir, db)
                },
                |(temp_dir, db)| {
                    let _temp_dir = temp_dir;
                    let seat = SeatId::try_from(20).expect("valid seat");
                    let holder = db
                        .connection()
                        .find_reservation_by_slot(seat, saturday(0))
                        .expect("lookup failed");
                    black_box(holder);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_seat_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("seat_map");

    for &size in LEDGER_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &count| {
            b.iter_batched(
                || {
                    let (temp_dir, mut db) = setup_database();
                    populate(&mut db, count);
                    (temp_dir, db)
                },
                |(temp_dir, db)| {
                    let _temp_dir = temp_dir;
                    let map = SeatInventory::new(db.connection())
                        .seat_map(saturday(0))
                        .expect("seat map failed");
                    black_box(map);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_reset_all(c: &mut Criterion) {
    c.bench_function("reset_all_450", |b| {
        b.iter_batched(
            || {
                let (temp_dir, mut db) = setup_database();
                populate(&mut db, 450);
                (temp_dir, db)
            },
            |(temp_dir, db)| {
                let _temp_dir = temp_dir;
                let removed = SeatInventory::new(db.connection())
                    .reset_all()
                    .expect("reset failed");
                black_box(removed);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    booking_bench,
    bench_book_single,
    bench_book_round_trip,
    bench_slot_lookup,
    bench_seat_map,
    bench_reset_all
);
criterion_main!(booking_bench);
