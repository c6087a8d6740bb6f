//! Database schema definitions and SQL constants.
//!
//! This module contains the table definitions, indices and shared SQL for
//! reservations, user profiles, rollover requests and notices.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Key-value pairs for versioning.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Seat reservations.
///
/// The primary key is the reservation identity (email, seat, date). The
/// seat range is enforced by a CHECK so that no path can store seat 0 or 46.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        email TEXT NOT NULL,
        seat_id INTEGER NOT NULL CHECK (seat_id BETWEEN 1 AND 45),
        travel_date TEXT NOT NULL,
        full_name TEXT NOT NULL,
        phone_number TEXT NOT NULL,
        enrollment_number TEXT NOT NULL,
        journey_type TEXT NOT NULL,
        destination TEXT NOT NULL,
        role TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        checked_in INTEGER NOT NULL DEFAULT 0,
        booked_at INTEGER NOT NULL,
        PRIMARY KEY (email, seat_id, travel_date)
    )";

/// At most one active reservation per seat and date, across all emails.
pub const CREATE_ACTIVE_SLOT_INDEX: &str = r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_reservations_active_slot
    ON reservations(seat_id, travel_date) WHERE active = 1";

/// Speeds up supersession and lookups by passenger.
pub const CREATE_RESERVATION_EMAIL_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_email ON reservations(email)";

/// Speeds up per-date occupancy queries.
pub const CREATE_RESERVATION_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_date ON reservations(travel_date)";

/// Passenger and staff profiles.
pub const CREATE_USERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        email TEXT PRIMARY KEY NOT NULL,
        full_name TEXT NOT NULL,
        phone_number TEXT NOT NULL,
        enrollment_number TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// Speeds up "users by role".
pub const CREATE_USER_ROLE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)";

/// Open rollover requests. Finalized and dismissed requests are deleted.
pub const CREATE_ROLLOVER_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS rollover_requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('pending', 'staged')),
        seat_id INTEGER CHECK (seat_id IS NULL OR seat_id BETWEEN 1 AND 45),
        travel_date TEXT,
        destination TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// At most one open rollover request per passenger.
pub const CREATE_ROLLOVER_EMAIL_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_rollover_requests_email ON rollover_requests(email)";

/// Audit trail of rollover notices.
pub const CREATE_NOTICES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS notices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        receiver TEXT NOT NULL,
        sender TEXT NOT NULL,
        message TEXT NOT NULL,
        sent_at INTEGER NOT NULL
    )";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Column list shared by every reservation SELECT, in `row_to_reservation` order.
pub const RESERVATION_COLUMNS: &str = "email, seat_id, travel_date, full_name, phone_number, \
     enrollment_number, journey_type, destination, role, active, checked_in, booked_at";

/// Plain insert; a taken key or active slot is a constraint violation.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (email, seat_id, travel_date, full_name, phone_number, enrollment_number,
     journey_type, destination, role, active, checked_in, booked_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

/// SQL statement to delete a reservation by key.
pub const DELETE_RESERVATION: &str = r"
    DELETE FROM reservations
    WHERE email = ? AND seat_id = ? AND travel_date = ?
";

/// Column list shared by every user SELECT.
pub const USER_COLUMNS: &str = "email, full_name, phone_number, enrollment_number, role";

/// Column list shared by every rollover SELECT.
pub const ROLLOVER_COLUMNS: &str =
    "id, email, status, seat_id, travel_date, destination, created_at, updated_at";
