//! Rollover command implementation.
//!
//! A request is opened for a passenger whose booking cannot be honored,
//! staged with a revised seat and date, and finalized into their only
//! reservation.

use crate::error::CliError;
use crate::output::print_listing;
use crate::utils::{format_timestamp, yes_no, GlobalOptions, Session};
use busbook::operations::RolloverService;
use busbook::{Destination, RolloverId, RolloverView, SeatId, TravelDate};
use clap::{Args, Subcommand};

const COLUMN_HEADERS: [&str; 8] = [
    "id",
    "email",
    "status",
    "seat",
    "travel_date",
    "destination",
    "checked_in",
    "created_at",
];

/// Manage rollover requests.
#[derive(Args)]
pub struct RolloverCommand {
    #[command(subcommand)]
    pub action: RolloverAction,
}

/// Rollover subcommands.
#[derive(Subcommand)]
pub enum RolloverAction {
    /// Open a request for a passenger
    Open {
        /// Passenger email
        #[arg(long, value_name = "EMAIL")]
        email: String,
    },

    /// List every request with the passenger's current booking
    List,

    /// Record a revised seat and date for a request
    Stage {
        /// Request id
        #[arg(long, value_name = "ID")]
        id: RolloverId,

        /// Revised seat (1-45)
        #[arg(long, value_name = "SEAT")]
        seat: SeatId,

        /// Revised travel date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        date: TravelDate,

        /// Revised destination (default: keep the current one)
        #[arg(long, value_name = "DESTINATION")]
        destination: Option<Destination>,
    },

    /// Replace the passenger's bookings with the staged one
    Finalize {
        /// Request id
        #[arg(long, value_name = "ID")]
        id: RolloverId,
    },

    /// Delete a request without touching any booking
    Dismiss {
        /// Request id
        #[arg(long, value_name = "ID")]
        id: RolloverId,
    },

    /// Delete every request
    Clear {
        /// Confirm deleting every request
        #[arg(long)]
        yes: bool,
    },
}

impl RolloverCommand {
    /// Execute the rollover command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if matches!(self.action, RolloverAction::Clear { yes: false }) {
            return Err(CliError::InvalidArguments(
                "clear deletes every rollover request; pass --yes to confirm".to_string(),
            ));
        }

        let mut session = Session::open(global)?;
        let format = session.format(global);
        let notifier = session.notifier();
        let sender = session.sender();
        let mut service = RolloverService::new(&mut session.db, notifier.as_ref())
            .with_schedule(session.schedule.clone())
            .with_sender(sender);

        match self.action {
            RolloverAction::Open { email } => {
                let request = service.open_request(&email)?;
                println!("Opened rollover request {} for {}", request.id, request.email);
            }
            RolloverAction::List => {
                let views = service.list_requests()?;
                let rows: Vec<Vec<String>> = views.iter().map(view_row).collect();
                let json = serde_json::Value::Array(views.iter().map(view_json).collect());
                print_listing(format, &COLUMN_HEADERS, &rows, &json)?;
            }
            RolloverAction::Stage {
                id,
                seat,
                date,
                destination,
            } => {
                let request = service.stage_details(id, seat, date, destination)?;
                println!("Staged rollover request {}: seat {seat} on {date}", request.id);
            }
            RolloverAction::Finalize { id } => {
                let outcome = service.finalize(id)?;
                println!(
                    "Finalized rollover request {id}: seat {} on {} for {} ({} booking(s) superseded)",
                    outcome.reservation.seat(),
                    outcome.reservation.travel_date(),
                    outcome.reservation.email(),
                    outcome.superseded
                );
                if !global.quiet {
                    println!("Notice: {}", outcome.notice);
                }
            }
            RolloverAction::Dismiss { id } => {
                service.dismiss(id)?;
                println!("Dismissed rollover request {id}");
            }
            RolloverAction::Clear { .. } => {
                let removed = service.clear_all()?;
                println!("Removed {removed} rollover request(s)");
            }
        }

        Ok(())
    }
}

fn view_row(view: &RolloverView) -> Vec<String> {
    let request = &view.request;
    vec![
        request.id.to_string(),
        request.email.clone(),
        request.status.to_string(),
        request.seat.map(|s| s.to_string()).unwrap_or_default(),
        request.travel_date.map(|d| d.to_string()).unwrap_or_default(),
        view.destination.map(|d| d.to_string()).unwrap_or_default(),
        view.checked_in.map(yes_no).unwrap_or_default().to_string(),
        format_timestamp(request.created_at),
    ]
}

fn view_json(view: &RolloverView) -> serde_json::Value {
    let request = &view.request;
    serde_json::json!({
        "id": request.id.value(),
        "email": request.email,
        "status": request.status.as_str(),
        "seat": request.seat.map(SeatId::value),
        "travel_date": request.travel_date.map(|d| d.to_string()),
        "destination": view.destination.map(Destination::name),
        "checked_in": view.checked_in,
        "created_at": format_timestamp(request.created_at),
    })
}
