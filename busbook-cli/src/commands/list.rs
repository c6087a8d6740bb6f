//! List command implementation.
//!
//! This module implements the `list` command, which displays reservations
//! in various formats (table, JSON, CSV, TSV).

use crate::error::CliError;
use crate::output::print_listing;
use crate::utils::{format_timestamp, yes_no, GlobalOptions, Session};
use busbook::notify::NoopDispatcher;
use busbook::operations::BookingService;
use busbook::reservation::{normalize_email, ReservationField};
use busbook::{Destination, Reservation, SeatId, TravelDate};
use clap::Args;

/// Column headers for listings.
const COLUMN_HEADERS: [&str; 12] = [
    "email",
    "seat",
    "travel_date",
    "full_name",
    "phone_number",
    "enrollment_number",
    "journey_type",
    "destination",
    "role",
    "active",
    "checked_in",
    "booked_at",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Filter by seat
    #[arg(long, value_name = "SEAT")]
    pub seat: Option<SeatId>,

    /// Filter by passenger email
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Filter by travel date
    #[arg(long, value_name = "DATE")]
    pub date: Option<TravelDate>,

    /// Filter by destination
    #[arg(long, value_name = "DESTINATION")]
    pub destination: Option<Destination>,

    /// Only show passengers who have checked in
    #[arg(long)]
    pub checked_in: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Load configuration and open the database
        let mut session = Session::open(global)?;
        let format = session.format(global);

        // 2. Query with the most selective filter
        let primary = if let Some(ref email) = self.email {
            Some(ReservationField::Email(email.clone()))
        } else if let Some(seat) = self.seat {
            Some(ReservationField::Seat(seat))
        } else if let Some(date) = self.date {
            Some(ReservationField::TravelDate(date))
        } else {
            self.destination.map(ReservationField::Destination)
        };
        let notifier = NoopDispatcher;
        let mut reservations = BookingService::new(&mut session.db, &notifier)
            .list_bookings(primary.as_ref())?;

        // 3. Apply the remaining filters
        if let Some(ref email) = self.email {
            let email = normalize_email(email).map_err(busbook::Error::from)?;
            reservations.retain(|r| r.email() == email);
        }
        if let Some(seat) = self.seat {
            reservations.retain(|r| r.seat() == seat);
        }
        if let Some(date) = self.date {
            reservations.retain(|r| r.travel_date() == date);
        }
        if let Some(destination) = self.destination {
            reservations.retain(|r| r.destination() == destination);
        }
        if self.checked_in {
            reservations.retain(Reservation::is_checked_in);
        }
        reservations.sort_by_key(|r| (r.travel_date(), r.seat()));

        // 4. Format and output to stdout
        let rows: Vec<Vec<String>> = reservations.iter().map(reservation_row).collect();
        let json = serde_json::Value::Array(reservations.iter().map(reservation_json).collect());
        print_listing(format, &COLUMN_HEADERS, &rows, &json)
    }
}

fn reservation_row(r: &Reservation) -> Vec<String> {
    vec![
        r.email().to_string(),
        r.seat().to_string(),
        r.travel_date().to_string(),
        r.full_name().to_string(),
        r.phone_number().to_string(),
        r.enrollment_number().to_string(),
        r.journey_type().to_string(),
        r.destination().to_string(),
        r.role().to_string(),
        yes_no(r.is_active()).to_string(),
        yes_no(r.is_checked_in()).to_string(),
        format_timestamp(r.booked_at()),
    ]
}

fn reservation_json(r: &Reservation) -> serde_json::Value {
    serde_json::json!({
        "email": r.email(),
        "seat": r.seat().value(),
        "travel_date": r.travel_date().to_string(),
        "full_name": r.full_name(),
        "phone_number": r.phone_number(),
        "enrollment_number": r.enrollment_number(),
        "journey_type": r.journey_type().as_str(),
        "destination": r.destination().name(),
        "role": r.role().as_str(),
        "active": r.is_active(),
        "checked_in": r.is_checked_in(),
        "booked_at": format_timestamp(r.booked_at()),
    })
}
