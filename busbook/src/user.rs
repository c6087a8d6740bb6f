//! Passenger and staff profiles.
//!
//! A profile is keyed by normalized email and is upserted with merge
//! semantics every time a booking is made. Edits go through a single
//! validated [`UserPatch`] rather than one operation per field.

use serde::{Deserialize, Serialize};

use crate::reservation::{
    normalize_email, validate_phone, validate_text, Reservation, Role, ValidationError,
};

/// A passenger or staff profile.
///
/// # Examples
///
/// ```
/// use busbook::{Role, UserProfile};
///
/// let profile = UserProfile::new(
///     "Kamala@kdu.ac.lk",
///     "Kamala Silva",
///     "0712345678",
///     "STAFF-042",
///     Role::Lecturer,
/// )
/// .unwrap();
///
/// assert_eq!(profile.email(), "kamala@kdu.ac.lk");
/// assert_eq!(profile.role(), Role::Lecturer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    email: String,
    full_name: String,
    phone_number: String,
    enrollment_number: String,
    role: Role,
}

impl UserProfile {
    /// Creates a validated profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed or any text field is
    /// empty.
    pub fn new(
        email: &str,
        full_name: &str,
        phone_number: &str,
        enrollment_number: &str,
        role: Role,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            email: normalize_email(email)?,
            full_name: validate_text("full_name", full_name)?,
            phone_number: validate_phone(phone_number)?,
            enrollment_number: validate_text("enrollment_number", enrollment_number)?,
            role,
        })
    }

    /// Extracts the profile fields a reservation carries.
    pub(crate) fn from_reservation(reservation: &Reservation) -> Self {
        Self {
            email: reservation.email().to_string(),
            full_name: reservation.full_name().to_string(),
            phone_number: reservation.phone_number().to_string(),
            enrollment_number: reservation.enrollment_number().to_string(),
            role: reservation.role(),
        }
    }

    /// Returns the normalized email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Returns the enrollment or staff number.
    #[must_use]
    pub fn enrollment_number(&self) -> &str {
        &self.enrollment_number
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns a copy with the patch applied.
    ///
    /// The patch is expected to be validated already.
    #[must_use]
    pub fn patched(&self, patch: &UserPatch) -> Self {
        Self {
            email: self.email.clone(),
            full_name: patch
                .full_name
                .clone()
                .unwrap_or_else(|| self.full_name.clone()),
            phone_number: patch
                .phone_number
                .clone()
                .unwrap_or_else(|| self.phone_number.clone()),
            enrollment_number: patch
                .enrollment_number
                .clone()
                .unwrap_or_else(|| self.enrollment_number.clone()),
            role: patch.role.unwrap_or(self.role),
        }
    }
}

/// A partial update of a user profile.
///
/// # Examples
///
/// ```
/// use busbook::{Role, UserPatch};
///
/// let patch = UserPatch::default()
///     .with_phone_number("0779876543")
///     .with_role(Role::Lecturer);
/// assert!(patch.validated().is_ok());
///
/// let bad = UserPatch::default().with_full_name("   ");
/// assert!(bad.validated().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// New full name.
    pub full_name: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New enrollment number.
    pub enrollment_number: Option<String>,
    /// New role.
    pub role: Option<Role>,
}

impl UserPatch {
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

    /// Sets the enrollment number.
    #[must_use]
    pub fn with_enrollment_number(mut self, number: impl Into<String>) -> Self {
        self.enrollment_number = Some(number.into());
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone_number.is_none()
            && self.enrollment_number.is_none()
            && self.role.is_none()
    }

    /// Validates every present field, returning the normalized patch.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation, or an error if the
    /// patch is empty.
    pub fn validated(self) -> Result<Self, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError {
                field: "patch".into(),
                message: "no fields to update".into(),
            });
        }

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
            role: self.role,
        })
    }
}

/// A single-field filter for user queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserField {
    /// Users with a role.
    Role(Role),
    /// The user with an email (normalized before lookup).
    Email(String),
}
