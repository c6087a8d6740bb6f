//! Audit trail of rollover notices.

use std::time::SystemTime;

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::Result;

use super::connection::Database;
use super::reservations::{now_secs, unix_secs_to_systemtime};

/// A notice sent to a passenger, as recorded in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Storage id.
    pub id: i64,
    /// Recipient email.
    pub receiver: String,
    /// Sender name.
    pub sender: String,
    /// Notice text.
    pub message: String,
    /// When the notice was recorded.
    pub sent_at: SystemTime,
}

impl Database {
    /// Records a notice, returning its id.
    ///
    /// Runs on whatever connection or transaction it is given, so a notice
    /// commits or rolls back together with the booking it describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_notice(
        conn: &Connection,
        receiver: &str,
        sender: &str,
        message: &str,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO notices (receiver, sender, message, sent_at) VALUES (?, ?, ?, ?)",
            params![receiver, sender, message, now_secs()?],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Lists every recorded notice, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_notices(conn: &Connection) -> Result<Vec<Notice>> {
        let mut stmt =
            conn.prepare("SELECT id, receiver, sender, message, sent_at FROM notices ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Notice {
                id: row.get(0)?,
                receiver: row.get(1)?,
                sender: row.get(2)?,
                message: row.get(3)?,
                sent_at: unix_secs_to_systemtime(row.get(4)?),
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}
