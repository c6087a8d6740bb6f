//! `SQLite` storage of reservation records.

use std::time::{Duration, SystemTime};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::repository::ReservationRepository;
use crate::reservation::{
    normalize_email, Reservation, ReservationField, ReservationKey, ReservationPatch,
};
use crate::schedule::TravelDate;
use crate::seat::SeatId;

use super::schema::{DELETE_RESERVATION, INSERT_RESERVATION, RESERVATION_COLUMNS};

/// Converts a `SystemTime` to Unix epoch seconds for database storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| Error::Validation {
            field: "timestamp".into(),
            message: format!("Invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the database to a `SystemTime`.
#[allow(clippy::cast_sign_loss)]
pub(super) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}

/// Seconds since the epoch, now.
pub(super) fn now_secs() -> Result<i64> {
    systemtime_to_unix_secs(SystemTime::now())
}

/// Wraps a domain parse failure so it can leave a row mapper.
pub(super) fn conversion_error<E>(err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::ToSqlConversionFailure(Box::new(err))
}

/// Returns `true` for primary key and unique index violations.
pub(super) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Deserializes a reservation from a row selected with [`RESERVATION_COLUMNS`].
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let email: String = row.get(0)?;
    let seat: u16 = row.get(1)?;
    let travel_date: String = row.get(2)?;
    let full_name: String = row.get(3)?;
    let phone_number: String = row.get(4)?;
    let enrollment_number: String = row.get(5)?;
    let journey_type: String = row.get(6)?;
    let destination: String = row.get(7)?;
    let role: String = row.get(8)?;
    let active: bool = row.get(9)?;
    let checked_in: bool = row.get(10)?;
    let booked_secs: i64 = row.get(11)?;

    let seat = SeatId::try_from(seat).map_err(conversion_error)?;
    let travel_date = TravelDate::parse(&travel_date).map_err(conversion_error)?;
    let key = ReservationKey::new(&email, seat, travel_date).map_err(conversion_error)?;

    Reservation::builder(key)
        .full_name(full_name)
        .phone_number(phone_number)
        .enrollment_number(enrollment_number)
        .journey_type(journey_type.parse().map_err(conversion_error)?)
        .destination(destination.parse().map_err(conversion_error)?)
        .role(role.parse().map_err(conversion_error)?)
        .active(active)
        .checked_in(checked_in)
        .booked_at(unix_secs_to_systemtime(booked_secs))
        .build()
        .map_err(conversion_error)
}

fn select_reservations(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Reservation>> {
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations {filter} \
         ORDER BY travel_date, seat_id, email"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, row_to_reservation)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

const SELECT_BY_KEY: &str = "WHERE email = ? AND seat_id = ? AND travel_date = ?";

const UPDATE_RESERVATION: &str = r"
    UPDATE reservations SET
        full_name = COALESCE(?, full_name),
        phone_number = COALESCE(?, phone_number),
        enrollment_number = COALESCE(?, enrollment_number),
        destination = COALESCE(?, destination),
        checked_in = COALESCE(?, checked_in),
        active = COALESCE(?, active)
    WHERE email = ? AND seat_id = ? AND travel_date = ?
";

const DELETE_BY_EMAIL: &str = "DELETE FROM reservations WHERE email = ?";

const COUNT_ACTIVE_ON_DATE: &str =
    "SELECT COUNT(*) FROM reservations WHERE active = 1 AND travel_date = ?";

const SEAT_HAS_ANY_ACTIVE: &str =
    "SELECT EXISTS(SELECT 1 FROM reservations WHERE active = 1 AND seat_id = ?)";

impl ReservationRepository for Connection {
    fn create_reservation(&self, reservation: &Reservation) -> Result<()> {
        let key = reservation.key();
        let result = self.execute(
            INSERT_RESERVATION,
            params![
                key.email(),
                key.seat().value(),
                key.travel_date().iso(),
                reservation.full_name(),
                reservation.phone_number(),
                reservation.enrollment_number(),
                reservation.journey_type().as_str(),
                reservation.destination().slug(),
                reservation.role().as_str(),
                reservation.is_active(),
                reservation.is_checked_in(),
                systemtime_to_unix_secs(reservation.booked_at())?,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(Error::Conflict {
                details: format!(
                    "seat {} is already booked on {}",
                    key.seat(),
                    key.travel_date()
                ),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn get_reservation(&self, key: &ReservationKey) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations {SELECT_BY_KEY}");
        self.query_row(
            &sql,
            params![key.email(), key.seat().value(), key.travel_date().iso()],
            row_to_reservation,
        )
        .optional()
        .map_err(Into::into)
    }

    fn update_reservation(
        &self,
        key: &ReservationKey,
        patch: &ReservationPatch,
    ) -> Result<Reservation> {
        let patch = patch.clone().validated()?;

        let result = self.execute(
            UPDATE_RESERVATION,
            params![
                patch.full_name,
                patch.phone_number,
                patch.enrollment_number,
                patch.destination.map(|d| d.slug()),
                patch.checked_in,
                patch.active,
                key.email(),
                key.seat().value(),
                key.travel_date().iso(),
            ],
        );

        let changed = match result {
            Ok(changed) => changed,
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::Conflict {
                    details: format!(
                        "seat {} is already booked on {}",
                        key.seat(),
                        key.travel_date()
                    ),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("reservation {key}"),
            });
        }

        self.get_reservation(key)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {key}"),
        })
    }

    fn delete_reservation(&self, key: &ReservationKey) -> Result<bool> {
        let rows = self.execute(
            DELETE_RESERVATION,
            params![key.email(), key.seat().value(), key.travel_date().iso()],
        )?;
        Ok(rows > 0)
    }

    fn query_reservations(&self, field: &ReservationField) -> Result<Vec<Reservation>> {
        match field {
            ReservationField::Seat(seat) => {
                select_reservations(self, "WHERE seat_id = ?", [seat.value()])
            }
            ReservationField::Email(email) => {
                select_reservations(self, "WHERE email = ?", [normalize_email(email)?])
            }
            ReservationField::TravelDate(date) => {
                select_reservations(self, "WHERE travel_date = ?", [date.iso()])
            }
            ReservationField::Destination(destination) => {
                select_reservations(self, "WHERE destination = ?", [destination.slug()])
            }
        }
    }

    fn find_reservation_by_slot(
        &self,
        seat: SeatId,
        travel_date: TravelDate,
    ) -> Result<Option<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE active = 1 AND seat_id = ? AND travel_date = ?"
        );
        self.query_row(
            &sql,
            params![seat.value(), travel_date.iso()],
            row_to_reservation,
        )
        .optional()
        .map_err(Into::into)
    }

    fn list_reservations(&self) -> Result<Vec<Reservation>> {
        select_reservations(self, "", params![])
    }
}

/// Deletes every reservation held by an email, returning how many went.
///
/// The email must already be normalized.
pub(crate) fn delete_reservations_for(conn: &Connection, email: &str) -> Result<usize> {
    Ok(conn.execute(DELETE_BY_EMAIL, [email])?)
}

/// A reservation's identifying columns, read without parsing the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredKey {
    email: String,
    seat_id: i64,
    travel_date: String,
}

/// Lists the stored key columns of every reservation.
///
/// Rows whose other columns no longer parse are still returned, so bulk
/// deletes can always reach them.
pub(crate) fn list_stored_keys(conn: &Connection) -> Result<Vec<StoredKey>> {
    let mut stmt = conn.prepare("SELECT email, seat_id, travel_date FROM reservations")?;
    let rows = stmt.query_map([], |row| {
        Ok(StoredKey {
            email: row.get(0)?,
            seat_id: row.get(1)?,
            travel_date: row.get(2)?,
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Deletes the reservation stored under a key, returning whether it existed.
pub(crate) fn delete_stored_key(conn: &Connection, key: &StoredKey) -> Result<bool> {
    let rows = conn.execute(
        DELETE_RESERVATION,
        params![key.email, key.seat_id, key.travel_date],
    )?;
    Ok(rows > 0)
}

/// Counts active reservations on a date.
pub(crate) fn count_active_on(conn: &Connection, travel_date: TravelDate) -> Result<usize> {
    let count: i64 = conn.query_row(COUNT_ACTIVE_ON_DATE, [travel_date.iso()], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or(0))
}

/// Returns `true` if the seat is actively held on any date at all.
pub(crate) fn seat_has_any_active(conn: &Connection, seat: SeatId) -> Result<bool> {
    Ok(conn.query_row(SEAT_HAS_ANY_ACTIVE, [seat.value()], |row| row.get(0))?)
}
