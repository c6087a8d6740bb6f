//! Database layer for persistent storage of bookings.
//!
//! This module provides a SQLite-based storage layer: connection
//! management, schema versioning, and the repository implementations for
//! reservations, user profiles, rollover requests and notices.
//!
//! # Examples
//!
//! ```no_run
//! use busbook::database::{Database, DatabaseConfig};
//! use busbook::repository::ReservationRepository;
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/busbook.db")).unwrap();
//! for reservation in db.connection().list_reservations().unwrap() {
//!     println!("{}", reservation.key());
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod notices;
mod reservations;
mod rollovers;
mod schema;
mod users;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME, DATA_DIR_ENV,
};
pub use connection::Database;
pub use notices::Notice;

pub(crate) use reservations::{
    count_active_on, delete_reservations_for, delete_stored_key, list_stored_keys,
    seat_has_any_active,
};

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
