//! Reset command implementation.
//!
//! Deletes every reservation one record at a time. Running it again after
//! a partial failure finishes the job.

use crate::error::CliError;
use crate::utils::{GlobalOptions, Session};
use busbook::inventory::SeatInventory;
use clap::Args;

/// Delete every reservation.
#[derive(Args)]
pub struct ResetCommand {
    /// Confirm deleting every reservation
    #[arg(long)]
    pub yes: bool,
}

impl ResetCommand {
    /// Execute the reset command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if !self.yes {
            return Err(CliError::InvalidArguments(
                "reset deletes every reservation; pass --yes to confirm".to_string(),
            ));
        }

        let session = Session::open(global)?;
        let removed = SeatInventory::new(session.db.connection()).reset_all()?;
        println!("Removed {removed} reservation(s)");

        Ok(())
    }
}
