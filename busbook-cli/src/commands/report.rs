//! Report command implementation.
//!
//! Groups active bookings by destination interchange in route order.

use crate::error::CliError;
use crate::output::print_listing;
use crate::utils::{GlobalOptions, Session};
use busbook::inventory::SeatInventory;
use busbook::TravelDate;
use clap::Args;

const COLUMN_HEADERS: [&str; 3] = ["destination", "count", "passengers"];

/// Summarize bookings by destination.
#[derive(Args)]
pub struct ReportCommand {
    /// Only count bookings on this date
    #[arg(long, value_name = "DATE")]
    pub date: Option<TravelDate>,
}

impl ReportCommand {
    /// Execute the report command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let session = Session::open(global)?;
        let format = session.format(global);

        let summaries = SeatInventory::new(session.db.connection()).destination_report(self.date)?;

        let rows: Vec<Vec<String>> = summaries
            .iter()
            .map(|s| {
                vec![
                    s.destination.to_string(),
                    s.count.to_string(),
                    s.passengers.join("; "),
                ]
            })
            .collect();
        let json = serde_json::Value::Array(
            summaries
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "destination": s.destination.name(),
                        "count": s.count,
                        "passengers": s.passengers,
                    })
                })
                .collect(),
        );
        print_listing(format, &COLUMN_HEADERS, &rows, &json)
    }
}
