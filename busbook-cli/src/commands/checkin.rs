//! Check-in command implementation.
//!
//! Marks a passenger as boarded. The reservation is named either by its
//! key string (`email_seat_YYYY-MM-DD`, as printed on boarding passes) or
//! by email, seat and date.

use crate::error::CliError;
use crate::utils::{GlobalOptions, Session};
use busbook::notify::NoopDispatcher;
use busbook::operations::BookingService;
use busbook::{ReservationKey, SeatId, TravelDate};
use clap::Args;

/// Check a passenger in for a reservation.
#[derive(Args)]
pub struct CheckinCommand {
    /// Reservation key (email_seat_YYYY-MM-DD)
    #[arg(
        long,
        value_name = "KEY",
        conflicts_with_all = ["email", "seat", "date"],
        required_unless_present_all = ["email", "seat", "date"]
    )]
    pub key: Option<ReservationKey>,

    /// Passenger email
    #[arg(long, value_name = "EMAIL", requires_all = ["seat", "date"])]
    pub email: Option<String>,

    /// Seat number (1-45)
    #[arg(long, value_name = "SEAT")]
    pub seat: Option<SeatId>,

    /// Travel date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: Option<TravelDate>,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl CheckinCommand {
    /// Execute the checkin command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let key = match (self.key, self.email, self.seat, self.date) {
            (Some(key), ..) => key,
            (None, Some(email), Some(seat), Some(date)) => {
                ReservationKey::new(&email, seat, date).map_err(busbook::Error::from)?
            }
            _ => {
                return Err(CliError::InvalidArguments(
                    "give --key, or --email with --seat and --date".to_string(),
                ))
            }
        };

        let mut session = Session::open(global)?;
        let notifier = NoopDispatcher;
        let mut service = BookingService::new(&mut session.db, &notifier);
        if self.dry_run {
            service = service.dry_run();
        }
        let reservation = service.check_in(&key)?;

        let verb = if self.dry_run {
            "Would check in"
        } else {
            "Checked in"
        };
        println!(
            "{verb} {} for seat {} on {}",
            reservation.email(),
            reservation.seat(),
            reservation.travel_date()
        );

        Ok(())
    }
}
