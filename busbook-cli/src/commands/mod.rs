//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Initialize the data directory and database
//! - `book`: Book a seat on one or two travel dates
//! - `rebook`: Book a seat on one date, overwriting the passenger's own record
//! - `cancel`: Cancel a reservation
//! - `checkin`: Mark a passenger as boarded
//! - `list`: List reservations
//! - `seats`: Show the seat map for a travel date
//! - `report`: Summarize bookings by destination
//! - `reset`: Delete every reservation
//! - `user`: Show, update and list passenger profiles
//! - `rollover`: Manage rollover requests
//! - `completions`: Generate shell completion scripts

pub mod book;
pub mod cancel;
pub mod checkin;
pub mod completions;
pub mod init;
pub mod list;
mod passenger;
pub mod rebook;
pub mod report;
pub mod reset;
pub mod rollover;
pub mod seats;
pub mod user;

pub use book::BookCommand;
pub use cancel::CancelCommand;
pub use checkin::CheckinCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use rebook::RebookCommand;
pub use report::ReportCommand;
pub use reset::ResetCommand;
pub use rollover::RolloverCommand;
pub use seats::SeatsCommand;
pub use user::UserCommand;
