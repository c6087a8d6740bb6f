//! Repository interfaces for reservations, users and rollover requests.
//!
//! Each trait is implemented for [`rusqlite::Connection`] in
//! [`crate::database`]. A [`rusqlite::Transaction`] derefs to a connection,
//! so the same calls work standalone (one statement, atomic per record) or
//! inside an IMMEDIATE transaction opened by a service when several records
//! must change together.
//!
//! # Examples
//!
//! ```
//! use busbook::repository::ReservationRepository;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! busbook::database::initialize_schema(&conn).unwrap();
//! assert!(conn.list_reservations().unwrap().is_empty());
//! ```

use crate::error::Result;
use crate::reservation::{Destination, Reservation, ReservationField, ReservationKey, ReservationPatch};
use crate::rollover::{RolloverField, RolloverId, RolloverPatch, RolloverRequest};
use crate::schedule::TravelDate;
use crate::seat::SeatId;
use crate::user::{UserField, UserPatch, UserProfile};

/// Storage of reservation records.
pub trait ReservationRepository {
    /// Inserts a new reservation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conflict`] if the key exists or the seat is
    /// already actively held on that date.
    fn create_reservation(&self, reservation: &Reservation) -> Result<()>;

    /// Fetches a reservation by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_reservation(&self, key: &ReservationKey) -> Result<Option<Reservation>>;

    /// Applies a partial update and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no record has this key, a
    /// validation error for a bad patch field, or a conflict if
    /// reactivating the record would double-book its seat.
    fn update_reservation(
        &self,
        key: &ReservationKey,
        patch: &ReservationPatch,
    ) -> Result<Reservation>;

    /// Deletes a reservation, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete_reservation(&self, key: &ReservationKey) -> Result<bool>;

    /// Returns every reservation matching a single field.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or an email filter is malformed.
    fn query_reservations(&self, field: &ReservationField) -> Result<Vec<Reservation>>;

    /// Returns the active reservation holding a seat on a date, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_reservation_by_slot(
        &self,
        seat: SeatId,
        travel_date: TravelDate,
    ) -> Result<Option<Reservation>>;

    /// Returns every reservation ordered by date, seat and email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_reservations(&self) -> Result<Vec<Reservation>>;
}

/// Storage of passenger and staff profiles.
pub trait UserRepository {
    /// Inserts a new profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conflict`] if the email already has a profile.
    fn create_user(&self, profile: &UserProfile) -> Result<()>;

    /// Fetches a profile by email (normalized before lookup).
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed or the query fails.
    fn get_user(&self, email: &str) -> Result<Option<UserProfile>>;

    /// Applies a partial update and returns the updated profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if there is no such profile, or a
    /// validation error for an empty or malformed patch.
    fn update_user(&self, email: &str, patch: &UserPatch) -> Result<UserProfile>;

    /// Inserts the profile or merges it into the existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn upsert_user(&self, profile: &UserProfile) -> Result<()>;

    /// Deletes a profile, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed or the delete fails.
    fn delete_user(&self, email: &str) -> Result<bool>;

    /// Returns every profile matching a single field.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn query_users(&self, field: &UserField) -> Result<Vec<UserProfile>>;

    /// Returns every profile ordered by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_users(&self) -> Result<Vec<UserProfile>>;
}

/// Storage of open rollover requests.
pub trait RolloverRepository {
    /// Opens a `Pending` request for an email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed or the insert fails.
    fn create_rollover(
        &self,
        email: &str,
        destination: Option<Destination>,
    ) -> Result<RolloverRequest>;

    /// Fetches a request by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_rollover(&self, id: RolloverId) -> Result<Option<RolloverRequest>>;

    /// Applies a partial update and returns the updated request.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if there is no such request.
    fn update_rollover(&self, id: RolloverId, patch: &RolloverPatch) -> Result<RolloverRequest>;

    /// Deletes a request, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete_rollover(&self, id: RolloverId) -> Result<bool>;

    /// Deletes a request only if it is still staged for `seat` on
    /// `travel_date`, returning whether it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete_staged_rollover(
        &self,
        id: RolloverId,
        seat: SeatId,
        travel_date: TravelDate,
    ) -> Result<bool>;

    /// Returns every request matching a single field.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn query_rollovers(&self, field: &RolloverField) -> Result<Vec<RolloverRequest>>;

    /// Returns every request, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_rollovers(&self) -> Result<Vec<RolloverRequest>>;
}
