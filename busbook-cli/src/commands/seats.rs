//! Seats command implementation.
//!
//! Shows which of the 45 seats are booked on a travel date.

use crate::error::CliError;
use crate::output::print_listing;
use crate::utils::{GlobalOptions, Session};
use busbook::config::OutputFormat;
use busbook::inventory::{Occupancy, SeatInventory, SeatStatus};
use busbook::{SeatId, TravelDate};
use clap::Args;

const COLUMN_HEADERS: [&str; 3] = ["seat", "status", "holder"];

/// Show the seat map.
#[derive(Args)]
pub struct SeatsCommand {
    /// Travel date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", required_unless_present = "any_date")]
    pub date: Option<TravelDate>,

    /// Mark a seat booked if it is held on any date
    #[arg(long, conflicts_with = "date")]
    pub any_date: bool,
}

impl SeatsCommand {
    /// Execute the seats command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let session = Session::open(global)?;
        let format = session.format(global);
        let inventory = SeatInventory::new(session.db.connection());

        let statuses = match self.date {
            Some(date) => inventory.seat_map(date)?,
            None => SeatId::all()
                .map(|seat| {
                    Ok(SeatStatus {
                        seat,
                        occupancy: inventory.occupancy_any_date(seat)?,
                        holder: None,
                    })
                })
                .collect::<busbook::Result<Vec<_>>>()?,
        };

        let rows: Vec<Vec<String>> = statuses
            .iter()
            .map(|s| {
                vec![
                    s.seat.to_string(),
                    s.occupancy.to_string(),
                    s.holder.clone().unwrap_or_default(),
                ]
            })
            .collect();
        let json = serde_json::to_value(&statuses)
            .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        print_listing(format, &COLUMN_HEADERS, &rows, &json)?;

        if format == OutputFormat::Table && !global.quiet {
            let available = statuses
                .iter()
                .filter(|s| s.occupancy == Occupancy::Available)
                .count();
            match self.date {
                Some(date) => println!("{available} of {} seats available on {date}", SeatId::COUNT),
                None => println!("{available} of {} seats free on every date", SeatId::COUNT),
            }
        }

        Ok(())
    }
}
