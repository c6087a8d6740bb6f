//! Passenger arguments shared by `book` and `rebook`.
//!
//! Fields left off the command line are filled from the passenger's stored
//! profile, so returning passengers only need their email.

use crate::error::CliError;
use busbook::operations::BookingRequest;
use busbook::repository::UserRepository;
use busbook::{Database, Destination, Role, SeatId};
use clap::Args;

/// Passenger details for a booking.
#[derive(Args, Debug, Clone)]
pub struct PassengerArgs {
    /// Passenger email
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Full name (default: from the stored profile)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Phone number (default: from the stored profile)
    #[arg(long, value_name = "PHONE")]
    pub phone: Option<String>,

    /// Enrollment or staff number (default: from the stored profile)
    #[arg(long, value_name = "NUMBER")]
    pub enrollment: Option<String>,

    /// Passenger role: student or lecturer (default: from the stored profile)
    #[arg(long, value_name = "ROLE")]
    pub role: Option<Role>,

    /// Destination interchange, by name or slug
    #[arg(long, value_name = "DESTINATION")]
    pub destination: Option<Destination>,
}

impl PassengerArgs {
    /// Builds a request for `seat`, filling gaps from the stored profile.
    pub fn to_request(&self, seat: SeatId, db: &Database) -> Result<BookingRequest, CliError> {
        let stored = db.connection().get_user(&self.email)?;

        let mut request = BookingRequest::new(seat, self.email.clone());
        if let Some(name) = self
            .name
            .clone()
            .or_else(|| stored.as_ref().map(|p| p.full_name().to_string()))
        {
            request = request.with_full_name(name);
        }
        if let Some(phone) = self
            .phone
            .clone()
            .or_else(|| stored.as_ref().map(|p| p.phone_number().to_string()))
        {
            request = request.with_phone_number(phone);
        }
        if let Some(number) = self
            .enrollment
            .clone()
            .or_else(|| stored.as_ref().map(|p| p.enrollment_number().to_string()))
        {
            request = request.with_enrollment_number(number);
        }
        if let Some(role) = self.role.or_else(|| stored.as_ref().map(|p| p.role())) {
            request = request.with_role(role);
        }
        if let Some(destination) = self.destination {
            request = request.with_destination(destination);
        }

        Ok(request)
    }
}
