//! Rebook command implementation.
//!
//! This module implements the `rebook` command. The passenger's own record
//! for the slot is overwritten; a slot held by anyone else is a conflict.

use super::passenger::PassengerArgs;
use crate::error::CliError;
use crate::utils::{GlobalOptions, Session};
use busbook::operations::BookingService;
use busbook::repository::ReservationRepository;
use busbook::reservation::ReservationField;
use busbook::{SeatId, TravelDate};
use clap::Args;

/// Rebook a passenger onto a seat.
#[derive(Args)]
pub struct RebookCommand {
    /// Seat to book (1-45)
    #[arg(long, value_name = "SEAT")]
    pub seat: SeatId,

    #[command(flatten)]
    pub passenger: PassengerArgs,

    /// Travel date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: TravelDate,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl RebookCommand {
    /// Execute the rebook command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut session = Session::open(global)?;
        let notifier = session.notifier();

        let mut request = self
            .passenger
            .to_request(self.seat, &session.db)?
            .with_travel_date(self.date);

        // Keep the destination of the booking being replaced unless a new one is given
        if request.destination.is_none() {
            let existing = session
                .db
                .connection()
                .query_reservations(&ReservationField::Email(self.passenger.email.clone()))?;
            if let Some(current) = existing.iter().find(|r| r.travel_date() == self.date) {
                request = request.with_destination(current.destination());
            }
        }

        let mut service = BookingService::new(&mut session.db, notifier.as_ref())
            .with_schedule(session.schedule.clone());
        if self.dry_run {
            service = service.dry_run();
        }
        let outcome = service.rebook_booking(self.seat, &request)?;

        let verb = if self.dry_run { "Would rebook" } else { "Rebooked" };
        for reservation in outcome.reservations() {
            println!(
                "{verb} seat {} on {} for {}",
                reservation.seat(),
                reservation.travel_date(),
                reservation.email()
            );
        }

        Ok(())
    }
}
