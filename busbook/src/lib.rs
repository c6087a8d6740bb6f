#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # busbook
//!
//! A library for booking seats on a scheduled staff and student bus.
//!
//! The bus has 45 seats and runs on a fixed set of weekdays. This library
//! keeps the booking ledger consistent: no seat is ever held by two
//! passengers on the same travel date, multi-date bookings are all or
//! nothing, and passengers can be moved between seats and dates through a
//! staged rollover workflow.
//!
//! ## Core Types
//!
//! - [`SeatId`] and [`TravelDate`]: validated seat numbers and service dates
//! - [`Reservation`] and [`ReservationKey`]: seat bookings
//! - [`UserProfile`]: passenger profiles, upserted on every booking
//! - [`operations::BookingService`] and [`operations::RolloverService`]:
//!   the transactional entry points
//! - [`inventory::SeatInventory`]: occupancy queries and the bulk reset
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use busbook::{Schedule, SeatId, TravelDate};
//!
//! let seat = SeatId::try_from(12).unwrap();
//! assert_eq!(seat.value(), 12);
//!
//! let saturday: TravelDate = "2024-06-08".parse().unwrap();
//! assert!(Schedule::default().is_allowed(saturday));
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod notify;
pub mod operations;
pub mod repository;
pub mod reservation;
pub mod rollover;
pub mod schedule;
pub mod seat;
pub mod user;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use inventory::{Occupancy, SeatInventory};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    BookingRequest, BookingService, ExecutionResult, OperationPlan, PlanAction, PlanExecutor,
    RolloverService,
};
pub use reservation::{Destination, JourneyType, Reservation, ReservationKey, Role};
pub use rollover::{RolloverId, RolloverRequest, RolloverStatus, RolloverView};
pub use schedule::{Schedule, TravelDate};
pub use seat::SeatId;
pub use user::{UserPatch, UserProfile};
