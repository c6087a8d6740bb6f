//! `SQLite` storage of rollover requests.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::repository::RolloverRepository;
use crate::reservation::{normalize_email, Destination};
use crate::rollover::{RolloverField, RolloverId, RolloverPatch, RolloverRequest, RolloverStatus};
use crate::schedule::TravelDate;
use crate::seat::SeatId;

use super::reservations::{
    conversion_error, is_unique_violation, now_secs, unix_secs_to_systemtime,
};
use super::schema::ROLLOVER_COLUMNS;

const INSERT_ROLLOVER: &str = r"
    INSERT INTO rollover_requests (email, status, destination, created_at, updated_at)
    VALUES (?1, 'pending', ?2, ?3, ?3)
";

const UPDATE_ROLLOVER: &str = r"
    UPDATE rollover_requests SET
        status = COALESCE(?, status),
        seat_id = COALESCE(?, seat_id),
        travel_date = COALESCE(?, travel_date),
        destination = COALESCE(?, destination),
        updated_at = ?
    WHERE id = ?
";

const DELETE_STAGED_ROLLOVER: &str = r"
    DELETE FROM rollover_requests
    WHERE id = ?1 AND status = 'staged' AND seat_id = ?2 AND travel_date = ?3
";

fn row_to_rollover(row: &rusqlite::Row<'_>) -> rusqlite::Result<RolloverRequest> {
    let id: i64 = row.get(0)?;
    let email: String = row.get(1)?;
    let status: String = row.get(2)?;
    let seat: Option<u16> = row.get(3)?;
    let travel_date: Option<String> = row.get(4)?;
    let destination: Option<String> = row.get(5)?;
    let created_secs: i64 = row.get(6)?;
    let updated_secs: i64 = row.get(7)?;

    Ok(RolloverRequest {
        id: RolloverId::new(id),
        email,
        status: status.parse().map_err(conversion_error)?,
        seat: seat
            .map(SeatId::try_from)
            .transpose()
            .map_err(conversion_error)?,
        travel_date: travel_date
            .as_deref()
            .map(TravelDate::parse)
            .transpose()
            .map_err(conversion_error)?,
        destination: destination
            .as_deref()
            .map(str::parse::<Destination>)
            .transpose()
            .map_err(conversion_error)?,
        created_at: unix_secs_to_systemtime(created_secs),
        updated_at: unix_secs_to_systemtime(updated_secs),
    })
}

fn select_rollovers(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<RolloverRequest>> {
    let sql = format!("SELECT {ROLLOVER_COLUMNS} FROM rollover_requests {filter} ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, row_to_rollover)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

impl RolloverRepository for Connection {
    fn create_rollover(
        &self,
        email: &str,
        destination: Option<Destination>,
    ) -> Result<RolloverRequest> {
        let email = normalize_email(email)?;
        match self.execute(
            INSERT_ROLLOVER,
            params![email, destination.map(Destination::slug), now_secs()?],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::Conflict {
                    details: format!("{email} already has an open rollover request"),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = RolloverId::new(self.last_insert_rowid());
        self.get_rollover(id)?.ok_or_else(|| Error::NotFound {
            resource: format!("rollover request {id}"),
        })
    }

    fn get_rollover(&self, id: RolloverId) -> Result<Option<RolloverRequest>> {
        let sql = format!("SELECT {ROLLOVER_COLUMNS} FROM rollover_requests WHERE id = ?");
        self.query_row(&sql, [id.value()], row_to_rollover)
            .optional()
            .map_err(Into::into)
    }

    fn update_rollover(&self, id: RolloverId, patch: &RolloverPatch) -> Result<RolloverRequest> {
        let changed = self.execute(
            UPDATE_ROLLOVER,
            params![
                patch.status.map(RolloverStatus::as_str),
                patch.seat.map(SeatId::value),
                patch.travel_date.map(TravelDate::iso),
                patch.destination.map(Destination::slug),
                now_secs()?,
                id.value(),
            ],
        )?;

        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("rollover request {id}"),
            });
        }

        self.get_rollover(id)?.ok_or_else(|| Error::NotFound {
            resource: format!("rollover request {id}"),
        })
    }

    fn delete_rollover(&self, id: RolloverId) -> Result<bool> {
        let rows = self.execute("DELETE FROM rollover_requests WHERE id = ?", [id.value()])?;
        Ok(rows > 0)
    }

    fn delete_staged_rollover(
        &self,
        id: RolloverId,
        seat: SeatId,
        travel_date: TravelDate,
    ) -> Result<bool> {
        let rows = self.execute(
            DELETE_STAGED_ROLLOVER,
            params![id.value(), seat.value(), travel_date.iso()],
        )?;
        Ok(rows > 0)
    }

    fn query_rollovers(&self, field: &RolloverField) -> Result<Vec<RolloverRequest>> {
        match field {
            RolloverField::Email(email) => {
                select_rollovers(self, "WHERE email = ?", [normalize_email(email)?])
            }
            RolloverField::Status(status) => {
                select_rollovers(self, "WHERE status = ?", [status.as_str()])
            }
        }
    }

    fn list_rollovers(&self) -> Result<Vec<RolloverRequest>> {
        select_rollovers(self, "", params![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_test_database;

    #[test]
    fn test_create_rollover_is_pending() {
        let db = create_test_database();
        let request = db
            .connection()
            .create_rollover("Nimal@kdu.ac.lk", Some(Destination::Beliatta))
            .unwrap();

        assert_eq!(request.email, "nimal@kdu.ac.lk");
        assert_eq!(request.status, RolloverStatus::Pending);
        assert_eq!(request.destination, Some(Destination::Beliatta));
        assert!(request.staged_slot().is_none());
    }

    #[test]
    fn test_second_rollover_for_email_conflicts() {
        let db = create_test_database();
        let conn = db.connection();
        conn.create_rollover("nimal@kdu.ac.lk", None).unwrap();

        let err = conn.create_rollover("NIMAL@kdu.ac.lk", None).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(conn.list_rollovers().unwrap().len(), 1);
    }

    #[test]
    fn test_update_rollover_stages() {
        let db = create_test_database();
        let conn = db.connection();
        let request = conn.create_rollover("nimal@kdu.ac.lk", None).unwrap();

        let seat = SeatId::try_from(8).unwrap();
        let date: TravelDate = "2024-06-11".parse().unwrap();
        let staged = conn
            .update_rollover(request.id, &RolloverPatch::stage(seat, date))
            .unwrap();

        assert_eq!(staged.staged_slot(), Some((seat, date)));
        assert_eq!(staged.destination, None);

        // Restaging overwrites the slot
        let seat = SeatId::try_from(9).unwrap();
        let restaged = conn
            .update_rollover(request.id, &RolloverPatch::stage(seat, date))
            .unwrap();
        assert_eq!(restaged.seat, Some(seat));
    }

    #[test]
    fn test_update_rollover_not_found() {
        let db = create_test_database();
        let err = db
            .connection()
            .update_rollover(RolloverId::new(42), &RolloverPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_query_and_delete_rollovers() {
        let db = create_test_database();
        let conn = db.connection();
        let first = conn.create_rollover("a@kdu.ac.lk", None).unwrap();
        conn.create_rollover("b@kdu.ac.lk", None).unwrap();

        let for_a = conn
            .query_rollovers(&RolloverField::Email("A@kdu.ac.lk".into()))
            .unwrap();
        assert_eq!(for_a.len(), 1);

        let pending = conn
            .query_rollovers(&RolloverField::Status(RolloverStatus::Pending))
            .unwrap();
        assert_eq!(pending.len(), 2);

        assert!(conn.delete_rollover(first.id).unwrap());
        assert!(!conn.delete_rollover(first.id).unwrap());
        assert_eq!(conn.list_rollovers().unwrap().len(), 1);
    }
}
