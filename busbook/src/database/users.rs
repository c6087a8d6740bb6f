//! `SQLite` storage of user profiles.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::repository::UserRepository;
use crate::reservation::normalize_email;
use crate::user::{UserField, UserPatch, UserProfile};

use super::reservations::{conversion_error, is_unique_violation, now_secs};
use super::schema::USER_COLUMNS;

const INSERT_USER: &str = r"
    INSERT INTO users
    (email, full_name, phone_number, enrollment_number, role, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
";

// Merge: the incoming profile wins field by field, created_at is kept.
const UPSERT_USER: &str = r"
    INSERT INTO users
    (email, full_name, phone_number, enrollment_number, role, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
    ON CONFLICT(email) DO UPDATE SET
        full_name = excluded.full_name,
        phone_number = excluded.phone_number,
        enrollment_number = excluded.enrollment_number,
        role = excluded.role,
        updated_at = excluded.updated_at
";

const UPDATE_USER: &str = r"
    UPDATE users SET
        full_name = COALESCE(?, full_name),
        phone_number = COALESCE(?, phone_number),
        enrollment_number = COALESCE(?, enrollment_number),
        role = COALESCE(?, role),
        updated_at = ?
    WHERE email = ?
";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserProfile> {
    let email: String = row.get(0)?;
    let full_name: String = row.get(1)?;
    let phone_number: String = row.get(2)?;
    let enrollment_number: String = row.get(3)?;
    let role: String = row.get(4)?;

    UserProfile::new(
        &email,
        &full_name,
        &phone_number,
        &enrollment_number,
        role.parse().map_err(conversion_error)?,
    )
    .map_err(conversion_error)
}

fn select_users(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<UserProfile>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users {filter} ORDER BY email");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, row_to_user)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

fn write_user(conn: &Connection, sql: &str, profile: &UserProfile) -> rusqlite::Result<usize> {
    conn.execute(
        sql,
        params![
            profile.email(),
            profile.full_name(),
            profile.phone_number(),
            profile.enrollment_number(),
            profile.role().as_str(),
            now_secs().map_err(conversion_error)?,
        ],
    )
}

impl UserRepository for Connection {
    fn create_user(&self, profile: &UserProfile) -> Result<()> {
        match write_user(self, INSERT_USER, profile) {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(Error::Conflict {
                details: format!("a profile for {} already exists", profile.email()),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn get_user(&self, email: &str) -> Result<Option<UserProfile>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        self.query_row(&sql, [normalize_email(email)?], row_to_user)
            .optional()
            .map_err(Into::into)
    }

    fn update_user(&self, email: &str, patch: &UserPatch) -> Result<UserProfile> {
        let email = normalize_email(email)?;
        let patch = patch.clone().validated()?;

        let changed = self.execute(
            UPDATE_USER,
            params![
                patch.full_name,
                patch.phone_number,
                patch.enrollment_number,
                patch.role.map(|r| r.as_str()),
                now_secs()?,
                email,
            ],
        )?;

        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("user {email}"),
            });
        }

        self.get_user(&email)?.ok_or_else(|| Error::NotFound {
            resource: format!("user {email}"),
        })
    }

    fn upsert_user(&self, profile: &UserProfile) -> Result<()> {
        write_user(self, UPSERT_USER, profile)?;
        Ok(())
    }

    fn delete_user(&self, email: &str) -> Result<bool> {
        let rows = self.execute("DELETE FROM users WHERE email = ?", [normalize_email(email)?])?;
        Ok(rows > 0)
    }

    fn query_users(&self, field: &UserField) -> Result<Vec<UserProfile>> {
        match field {
            UserField::Role(role) => select_users(self, "WHERE role = ?", [role.as_str()]),
            UserField::Email(email) => {
                select_users(self, "WHERE email = ?", [normalize_email(email)?])
            }
        }
    }

    fn list_users(&self) -> Result<Vec<UserProfile>> {
        select_users(self, "", params![])
    }
}
