//! Booking and rollover operations using the plan-execute pattern.
//!
//! Operations are split into two phases:
//! 1. **Planning**: validates the request against the schedule and current
//!    occupancy and builds an [`OperationPlan`] without writing anything
//! 2. **Execution**: [`PlanExecutor`] applies every action of the plan in a
//!    single IMMEDIATE transaction
//!
//! [`BookingService`] and [`RolloverService`] wrap both phases and dispatch
//! passenger notifications once the transaction has committed.
//!
//! # Examples
//!
//! ```no_run
//! use busbook::operations::{BookingPlan, BookingRequest, PlanExecutor};
//! use busbook::{Database, DatabaseConfig, Destination, Schedule, SeatId};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/busbook.db")).unwrap();
//! let schedule = Schedule::default();
//!
//! let request = BookingRequest::new(SeatId::try_from(12).unwrap(), "nimal@kdu.ac.lk")
//!     .with_full_name("Nimal Perera")
//!     .with_phone_number("0771234567")
//!     .with_enrollment_number("D/BCS/23/0001")
//!     .with_destination(Destination::Beliatta)
//!     .with_travel_date("2024-06-08".parse().unwrap());
//!
//! // Generate plan
//! let plan = BookingPlan::new(request, &schedule).build_plan(db.connection()).unwrap();
//!
//! // Execute plan
//! let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
//! assert_eq!(result.reservations.len(), 1);
//! ```

pub mod booking;
pub mod executor;
pub mod init;
pub mod plan;
pub mod rollover;

pub use booking::{BookingOutcome, BookingPlan, BookingRequest, BookingService};
pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult};
pub use plan::{OperationPlan, PlanAction};
pub use rollover::{rollover_notice, FinalizeOutcome, FinalizePlan, RolloverService};
