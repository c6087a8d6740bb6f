//! Reservation types for tracking seat bookings.
//!
//! This module provides the reservation record, its validated composite key,
//! the passenger-facing enumerations (destination, role, journey type) and
//! the consolidated partial-update type used by the repositories.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::schedule::TravelDate;
use crate::seat::SeatId;
use crate::user::UserProfile;

const MAX_TEXT_LEN: usize = 255;

/// Trims, lowercases and checks an email address.
///
/// Emails are part of the reservation identity, so every path that stores
/// or looks one up goes through this function.
///
/// # Errors
///
/// Returns an error if the address is empty, contains whitespace, or is not
/// of the form `local@domain.tld`.
///
/// # Examples
///
/// ```
/// use busbook::reservation::normalize_email;
///
/// assert_eq!(normalize_email("  Nimal@KDU.ac.lk ").unwrap(), "nimal@kdu.ac.lk");
/// assert!(normalize_email("not-an-email").is_err());
/// ```
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let normalized = email.trim().to_lowercase();
    let invalid = |message: &str| ValidationError {
        field: "email".into(),
        message: format!("'{}': {message}", email.trim()),
    };

    if normalized.is_empty() {
        return Err(invalid("email must not be empty"));
    }
    if normalized.chars().any(char::is_whitespace) {
        return Err(invalid("email must not contain whitespace"));
    }
    if normalized.len() > MAX_TEXT_LEN {
        return Err(invalid("email is too long"));
    }

    let Some((local, domain)) = normalized.split_once('@') else {
        return Err(invalid("email must contain '@'"));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("email must have exactly one '@' and a local part"));
    }
    let valid_domain = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    if !valid_domain {
        return Err(invalid("email domain is malformed"));
    }

    Ok(normalized)
}

/// Trims a required free-text field and checks its length.
pub(crate) fn validate_text(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError {
            field: field.into(),
            message: "cannot be empty or only whitespace".into(),
        });
    }
    if trimmed.contains('\0') {
        return Err(ValidationError {
            field: field.into(),
            message: "cannot contain null bytes".into(),
        });
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError {
            field: field.into(),
            message: format!("cannot exceed {MAX_TEXT_LEN} characters"),
        });
    }

    Ok(trimmed.to_string())
}

/// Checks a phone number: digits plus `+`, `-`, spaces and parentheses,
/// with at least seven digits.
pub(crate) fn validate_phone(value: &str) -> Result<String, ValidationError> {
    let trimmed = validate_text("phone_number", value)?;

    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    if !allowed || digits < 7 {
        return Err(ValidationError {
            field: "phone_number".into(),
            message: format!("'{trimmed}' is not a valid phone number"),
        });
    }

    Ok(trimmed)
}

/// One of the named interchanges where passengers leave the bus.
///
/// Destinations parse from their full name, their name without the
/// "Interchange" suffix, or a kebab-case slug, all case-insensitively.
///
/// # Examples
///
/// ```
/// use busbook::Destination;
///
/// let d: Destination = "godagama-palatuwa".parse().unwrap();
/// assert_eq!(d.name(), "Godagama - Palatuwa Interchange");
///
/// let d: Destination = "Beliatta Interchange".parse().unwrap();
/// assert_eq!(d, Destination::Beliatta);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Destination {
    /// Kahathuduwa Interchange.
    Kahathuduwa,
    /// Gelanigama Interchange.
    Gelanigama,
    /// Dodangoda Interchange.
    Dodangoda,
    /// Welipenna Interchange.
    Welipenna,
    /// Kurudugahahethekma Interchange.
    Kurudugahahethekma,
    /// Baddegama Interchange.
    Baddegama,
    /// Pinnaduwa Interchange.
    Pinnaduwa,
    /// Imaduwa Interchange.
    Imaduwa,
    /// Kokmaduwa Interchange.
    Kokmaduwa,
    /// Godagama Interchange.
    Godagama,
    /// Godagama - Palatuwa Interchange.
    GodagamaPalatuwa,
    /// Kapuduwa Interchange.
    Kapuduwa,
    /// Aparekka Interchange.
    Aparekka,
    /// Beliatta Interchange.
    Beliatta,
    /// Bedigama Interchange.
    Bedigama,
    /// Kasagala Interchange.
    Kasagala,
    /// Angunukolapelessa Interchange.
    Angunukolapelessa,
    /// Barawakubuka Interchange.
    Barawakubuka,
    /// Sooriyawewa Interchange.
    Sooriyawewa,
}

impl Destination {
    /// Every destination, in route order.
    pub const ALL: [Self; 19] = [
        Self::Kahathuduwa,
        Self::Gelanigama,
        Self::Dodangoda,
        Self::Welipenna,
        Self::Kurudugahahethekma,
        Self::Baddegama,
        Self::Pinnaduwa,
        Self::Imaduwa,
        Self::Kokmaduwa,
        Self::Godagama,
        Self::GodagamaPalatuwa,
        Self::Kapuduwa,
        Self::Aparekka,
        Self::Beliatta,
        Self::Bedigama,
        Self::Kasagala,
        Self::Angunukolapelessa,
        Self::Barawakubuka,
        Self::Sooriyawewa,
    ];

    /// Returns the display name of the interchange.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kahathuduwa => "Kahathuduwa Interchange",
            Self::Gelanigama => "Gelanigama Interchange",
            Self::Dodangoda => "Dodangoda Interchange",
            Self::Welipenna => "Welipenna Interchange",
            Self::Kurudugahahethekma => "Kurudugahahethekma Interchange",
            Self::Baddegama => "Baddegama Interchange",
            Self::Pinnaduwa => "Pinnaduwa Interchange",
            Self::Imaduwa => "Imaduwa Interchange",
            Self::Kokmaduwa => "Kokmaduwa Interchange",
            Self::Godagama => "Godagama Interchange",
            Self::GodagamaPalatuwa => "Godagama - Palatuwa Interchange",
            Self::Kapuduwa => "Kapuduwa Interchange",
            Self::Aparekka => "Aparekka Interchange",
            Self::Beliatta => "Beliatta Interchange",
            Self::Bedigama => "Bedigama Interchange",
            Self::Kasagala => "Kasagala Interchange",
            Self::Angunukolapelessa => "Angunukolapelessa Interchange",
            Self::Barawakubuka => "Barawakubuka Interchange",
            Self::Sooriyawewa => "Sooriyawewa Interchange",
        }
    }

    /// Returns the kebab-case slug, e.g. `godagama-palatuwa`.
    #[must_use]
    pub fn slug(self) -> String {
        Self::simplify(self.name().trim_end_matches(" Interchange"))
    }

    /// Lowercases and collapses every run of separators into one `-`.
    fn simplify(s: &str) -> String {
        s.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl FromStr for Destination {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = Self::simplify(s);
        let wanted = wanted.trim_end_matches("-interchange");
        Self::ALL
            .into_iter()
            .find(|d| d.slug() == wanted)
            .ok_or_else(|| ValidationError {
                field: "destination".into(),
                message: format!("'{s}' is not a known interchange"),
            })
    }
}

impl TryFrom<String> for Destination {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Destination> for String {
    fn from(d: Destination) -> Self {
        d.name().to_string()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The passenger's role on campus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// An enrolled student.
    #[default]
    Student,
    /// A member of the academic staff.
    Lecturer,
}

impl Role {
    /// Returns the lowercase storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Lecturer => "lecturer",
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "lecturer" => Ok(Self::Lecturer),
            _ => Err(ValidationError {
                field: "role".into(),
                message: format!("'{s}' is not a role (expected student or lecturer)"),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "Student"),
            Self::Lecturer => write!(f, "Lecturer"),
        }
    }
}

/// Whether a booking covers one leg or both legs of the trip.
///
/// A round trip books the same seat on two distinct service dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JourneyType {
    /// A single journey on one date.
    #[default]
    OneWay,
    /// Outbound and return on two dates.
    RoundTrip,
}

impl JourneyType {
    /// Returns the kebab-case storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneWay => "one-way",
            Self::RoundTrip => "round-trip",
        }
    }

    /// Returns how many travel dates a booking of this type carries.
    #[must_use]
    pub const fn date_count(self) -> usize {
        match self {
            Self::OneWay => 1,
            Self::RoundTrip => 2,
        }
    }
}

impl FromStr for JourneyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match squashed.as_str() {
            "oneway" => Ok(Self::OneWay),
            "roundtrip" | "return" => Ok(Self::RoundTrip),
            _ => Err(ValidationError {
                field: "journey_type".into(),
                message: format!("'{s}' is not a journey type (expected one-way or round-trip)"),
            }),
        }
    }
}

impl fmt::Display for JourneyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneWay => write!(f, "One Way"),
            Self::RoundTrip => write!(f, "Round Trip"),
        }
    }
}

/// A unique identifier for a reservation.
///
/// The key is the passenger's normalized email, the seat and the travel
/// date. Its string form is `email_seat_YYYY-MM-DD`; because an email may
/// itself contain underscores, parsing splits from the right.
///
/// # Examples
///
/// ```
/// use busbook::{ReservationKey, SeatId, TravelDate};
///
/// let key = ReservationKey::new(
///     "Kamala_P@kdu.ac.lk",
///     SeatId::try_from(12).unwrap(),
///     "2024-06-08".parse::<TravelDate>().unwrap(),
/// )
/// .unwrap();
/// assert_eq!(key.to_string(), "kamala_p@kdu.ac.lk_12_2024-06-08");
///
/// let parsed: ReservationKey = "kamala_p@kdu.ac.lk_12_2024-06-08".parse().unwrap();
/// assert_eq!(parsed, key);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationKey {
    email: String,
    seat: SeatId,
    travel_date: TravelDate,
}

impl ReservationKey {
    /// Creates a new reservation key, normalizing the email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed.
    pub fn new(email: &str, seat: SeatId, travel_date: TravelDate) -> Result<Self, ValidationError> {
        Ok(Self {
            email: normalize_email(email)?,
            seat,
            travel_date,
        })
    }

    /// Returns the normalized email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the seat.
    #[must_use]
    pub const fn seat(&self) -> SeatId {
        self.seat
    }

    /// Returns the travel date.
    #[must_use]
    pub const fn travel_date(&self) -> TravelDate {
        self.travel_date
    }
}

impl fmt::Display for ReservationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.email, self.seat, self.travel_date)
    }
}

impl FromStr for ReservationKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError {
            field: "reservation_key".into(),
            message: format!("'{s}' is not of the form email_seat_YYYY-MM-DD"),
        };

        let mut parts = s.trim().rsplitn(3, '_');
        let date = parts.next().ok_or_else(malformed)?;
        let seat = parts.next().ok_or_else(malformed)?;
        let email = parts.next().ok_or_else(malformed)?;

        let seat = seat.parse::<SeatId>().map_err(|e| ValidationError {
            field: "reservation_key".into(),
            message: e.to_string(),
        })?;
        // Keys never carry a time component, so only the bare ISO form is accepted.
        let travel_date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(TravelDate::from)
            .map_err(|_| malformed())?;

        Self::new(email, seat, travel_date)
    }
}

/// A seat reservation for one passenger on one travel date.
///
/// # Examples
///
/// ```
/// use busbook::{Destination, Reservation, ReservationKey, Role, SeatId};
///
/// let key = ReservationKey::new(
///     "nimal@kdu.ac.lk",
///     SeatId::try_from(12).unwrap(),
///     "2024-06-08".parse().unwrap(),
/// )
/// .unwrap();
///
/// let reservation = Reservation::builder(key)
///     .full_name("Nimal Perera")
///     .phone_number("0771234567")
///     .enrollment_number("D/BCS/23/0001")
///     .destination(Destination::Beliatta)
///     .role(Role::Student)
///     .build()
///     .unwrap();
///
/// assert_eq!(reservation.seat().value(), 12);
/// assert!(reservation.is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    key: ReservationKey,
    full_name: String,
    phone_number: String,
    enrollment_number: String,
    journey_type: JourneyType,
    destination: Destination,
    role: Role,
    active: bool,
    checked_in: bool,
    booked_at: SystemTime,
}

impl Reservation {
    /// Creates a new reservation builder.
    #[must_use]
    pub fn builder(key: ReservationKey) -> ReservationBuilder {
        ReservationBuilder {
            key,
            full_name: None,
            phone_number: None,
            enrollment_number: None,
            journey_type: JourneyType::default(),
            destination: None,
            role: Role::default(),
            active: true,
            checked_in: false,
            booked_at: None,
        }
    }

    /// Returns the reservation key.
    #[must_use]
    pub const fn key(&self) -> &ReservationKey {
        &self.key
    }

    /// Returns the passenger's normalized email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.key.email()
    }

    /// Returns the booked seat.
    #[must_use]
    pub const fn seat(&self) -> SeatId {
        self.key.seat
    }

    /// Returns the travel date.
    #[must_use]
    pub const fn travel_date(&self) -> TravelDate {
        self.key.travel_date
    }

    /// Returns the passenger's full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the passenger's phone number.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Returns the passenger's enrollment or staff number.
    #[must_use]
    pub fn enrollment_number(&self) -> &str {
        &self.enrollment_number
    }

    /// Returns the journey type.
    #[must_use]
    pub const fn journey_type(&self) -> JourneyType {
        self.journey_type
    }

    /// Returns the destination interchange.
    #[must_use]
    pub const fn destination(&self) -> Destination {
        self.destination
    }

    /// Returns the passenger's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the reservation holds its seat.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns whether the passenger has checked in for boarding.
    #[must_use]
    pub const fn is_checked_in(&self) -> bool {
        self.checked_in
    }

    /// Returns when the booking was made.
    #[must_use]
    pub const fn booked_at(&self) -> SystemTime {
        self.booked_at
    }

    /// Returns the passenger profile carried by this reservation.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile::from_reservation(self)
    }
}

/// Builder for creating `Reservation` instances.
///
/// Text fields are trimmed; `build` rejects missing or empty ones.
#[derive(Debug)]
pub struct ReservationBuilder {
    key: ReservationKey,
    full_name: Option<String>,
    phone_number: Option<String>,
    enrollment_number: Option<String>,
    journey_type: JourneyType,
    destination: Option<Destination>,
    role: Role,
    active: bool,
    checked_in: bool,
    booked_at: Option<SystemTime>,
}

impl ReservationBuilder {
    /// Sets the passenger's full name.
    #[must_use]
    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Sets the passenger's phone number.
    #[must_use]
    pub fn phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    /// Sets the passenger's enrollment or staff number.
    #[must_use]
    pub fn enrollment_number(mut self, number: impl Into<String>) -> Self {
        self.enrollment_number = Some(number.into());
        self
    }

    /// Copies name, phone, enrollment number and role from a profile.
    #[must_use]
    pub fn passenger(self, profile: &UserProfile) -> Self {
        self.full_name(profile.full_name())
            .phone_number(profile.phone_number())
            .enrollment_number(profile.enrollment_number())
            .role(profile.role())
    }

    /// Sets the journey type.
    #[must_use]
    pub fn journey_type(mut self, journey_type: JourneyType) -> Self {
        self.journey_type = journey_type;
        self
    }

    /// Sets the destination interchange.
    #[must_use]
    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Sets the passenger's role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets whether the reservation holds its seat.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the boarding check-in flag.
    #[must_use]
    pub fn checked_in(mut self, checked_in: bool) -> Self {
        self.checked_in = checked_in;
        self
    }

    /// Sets the booking timestamp.
    #[must_use]
    pub fn booked_at(mut self, booked_at: SystemTime) -> Self {
        self.booked_at = Some(booked_at);
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The full name, phone number or enrollment number is missing or empty
    /// - The phone number is malformed
    /// - No destination was set
    pub fn build(self) -> Result<Reservation, ValidationError> {
        let required = |field: &str, value: Option<String>| {
            value.ok_or_else(|| ValidationError {
                field: field.into(),
                message: "is required".into(),
            })
        };

        let full_name = validate_text("full_name", &required("full_name", self.full_name)?)?;
        let phone_number = validate_phone(&required("phone_number", self.phone_number)?)?;
        let enrollment_number = validate_text(
            "enrollment_number",
            &required("enrollment_number", self.enrollment_number)?,
        )?;
        let destination = self.destination.ok_or_else(|| ValidationError {
            field: "destination".into(),
            message: "is required".into(),
        })?;

        Ok(Reservation {
            key: self.key,
            full_name,
            phone_number,
            enrollment_number,
            journey_type: self.journey_type,
            destination,
            role: self.role,
            active: self.active,
            checked_in: self.checked_in,
            booked_at: self.booked_at.unwrap_or_else(SystemTime::now),
        })
    }
}

/// A partial update of a reservation.
///
/// Only the fields that are `Some` change; the key is immutable (moving a
/// passenger to another seat or date is a rebooking or a rollover).
///
/// # Examples
///
/// ```
/// use busbook::reservation::ReservationPatch;
///
/// let patch = ReservationPatch::default().with_checked_in(true);
/// assert!(!patch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationPatch {
    /// New full name.
    pub full_name: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New enrollment number.
    pub enrollment_number: Option<String>,
    /// New destination.
    pub destination: Option<Destination>,
    /// New check-in flag.
    pub checked_in: Option<bool>,
    /// New active flag.
    pub active: Option<bool>,
}

impl ReservationPatch {
    /// Sets the full name.
    #[must_use]
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    /// Sets the destination.
    #[must_use]
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Sets the check-in flag.
    #[must_use]
    pub fn with_checked_in(mut self, checked_in: bool) -> Self {
        self.checked_in = Some(checked_in);
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone_number.is_none()
            && self.enrollment_number.is_none()
            && self.destination.is_none()
            && self.checked_in.is_none()
            && self.active.is_none()
    }

    /// Validates every present field, returning the normalized patch.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            full_name: self
                .full_name
                .map(|v| validate_text("full_name", &v))
                .transpose()?,
            phone_number: self.phone_number.map(|v| validate_phone(&v)).transpose()?,
            enrollment_number: self
                .enrollment_number
                .map(|v| validate_text("enrollment_number", &v))
                .transpose()?,
            ..self
        })
    }
}

/// A single-field filter for reservation queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationField {
    /// Reservations for a seat, on any date.
    Seat(SeatId),
    /// Reservations held by an email (normalized before lookup).
    Email(String),
    /// Reservations on a travel date.
    TravelDate(TravelDate),
    /// Reservations alighting at a destination.
    Destination(Destination),
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(all(test, feature = "property-tests"))]
mod proptests;
