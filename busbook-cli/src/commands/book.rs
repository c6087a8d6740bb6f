//! Book command implementation.
//!
//! This module implements the `book` command, which books one seat on one
//! travel date (one-way) or two (round trip), all or nothing.

use super::passenger::PassengerArgs;
use crate::error::CliError;
use crate::utils::{GlobalOptions, Session};
use busbook::operations::BookingService;
use busbook::{JourneyType, SeatId, TravelDate};
use clap::Args;

/// Book a seat.
#[derive(Args)]
pub struct BookCommand {
    /// Seat number (1-45)
    #[arg(long, value_name = "SEAT")]
    pub seat: SeatId,

    #[command(flatten)]
    pub passenger: PassengerArgs,

    /// Travel date (YYYY-MM-DD); give it twice for a round trip
    #[arg(long = "date", value_name = "DATE", required = true)]
    pub dates: Vec<TravelDate>,

    /// Book the same seat on two dates
    #[arg(long)]
    pub round_trip: bool,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut session = Session::open(global)?;
        let notifier = session.notifier();

        let journey_type = if self.round_trip {
            JourneyType::RoundTrip
        } else {
            JourneyType::OneWay
        };
        let request = self
            .passenger
            .to_request(self.seat, &session.db)?
            .with_journey_type(journey_type)
            .with_travel_dates(self.dates);

        let mut service = BookingService::new(&mut session.db, notifier.as_ref())
            .with_schedule(session.schedule.clone());
        if self.dry_run {
            service = service.dry_run();
        }
        let outcome = service.create_booking(&request)?;

        let verb = if self.dry_run { "Would book" } else { "Booked" };
        for reservation in outcome.reservations() {
            println!(
                "{verb} seat {} on {} for {}",
                reservation.seat(),
                reservation.travel_date(),
                reservation.email()
            );
        }
        if outcome.delivery.failed > 0 && !global.quiet {
            eprintln!(
                "Warning: {} confirmation(s) could not be delivered",
                outcome.delivery.failed
            );
        }

        Ok(())
    }
}
