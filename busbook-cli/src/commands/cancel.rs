//! Cancel command implementation.
//!
//! Cancelling a reservation that does not exist is not an error.

use crate::error::CliError;
use crate::utils::{GlobalOptions, Session};
use busbook::notify::NoopDispatcher;
use busbook::operations::BookingService;
use busbook::repository::ReservationRepository;
use busbook::{ReservationKey, SeatId, TravelDate};
use clap::Args;

/// Cancel a reservation.
#[derive(Args)]
pub struct CancelCommand {
    /// Passenger email
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Seat number (1-45)
    #[arg(long, value_name = "SEAT")]
    pub seat: SeatId,

    /// Travel date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: TravelDate,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut session = Session::open(global)?;
        let key =
            ReservationKey::new(&self.email, self.seat, self.date).map_err(busbook::Error::from)?;
        let described = format!(
            "seat {} on {} for {}",
            key.seat(),
            key.travel_date(),
            key.email()
        );

        let removed = if self.dry_run {
            session.db.connection().get_reservation(&key)?.is_some()
        } else {
            let notifier = NoopDispatcher;
            BookingService::new(&mut session.db, &notifier).cancel_booking(&key)?
        };

        match (removed, self.dry_run) {
            (true, true) => println!("Would cancel {described}"),
            (true, false) => println!("Cancelled {described}"),
            (false, _) => {
                if !global.quiet {
                    eprintln!("No reservation for {described}; nothing to cancel");
                }
            }
        }

        Ok(())
    }
}
