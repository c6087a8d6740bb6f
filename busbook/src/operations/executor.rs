//! Plan execution engine.
//!
//! This module implements the executor that takes operation plans and
//! applies them to the database. Every action of a plan runs inside one
//! IMMEDIATE transaction: either all of them commit or none do.

use rusqlite::Connection;

use crate::database::{delete_reservations_for, Database};
use crate::error::{Error, Result};
use crate::repository::{ReservationRepository, RolloverRepository, UserRepository};
use crate::Reservation;

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
///
/// This struct provides information about what happened during execution,
/// including whether it was a dry run and what actions were taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// Reservations written (or that would be written in dry-run).
    pub reservations: Vec<Reservation>,

    /// Number of reservations deleted. Always zero in dry-run.
    pub removed: usize,
}

impl ExecutionResult {
    fn new(plan: &OperationPlan, dry_run: bool, removed: usize) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservations: plan.reservations().into_iter().cloned().collect(),
            removed,
        }
    }
}

/// Executes operation plans against the database.
///
/// The executor can run in normal mode (applying changes) or dry-run mode
/// (describing changes without touching storage).
///
/// # Examples
///
/// ```no_run
/// use busbook::operations::{OperationPlan, PlanAction, PlanExecutor};
/// use busbook::{Database, DatabaseConfig, ReservationKey, SeatId};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/busbook.db")).unwrap();
/// let key = ReservationKey::new(
///     "nimal@kdu.ac.lk",
///     SeatId::try_from(12).unwrap(),
///     "2024-06-08".parse().unwrap(),
/// )
/// .unwrap();
/// let plan = OperationPlan::new("Cancel").add_action(PlanAction::DeleteReservation(key));
///
/// // Dry-run execution
/// let result = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
/// assert!(result.dry_run);
///
/// // Normal execution
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// assert!(result.success);
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(db: &'a mut Database) -> Self {
        Self { db, dry_run: false }
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode, the executor reports the plan but does not open a
    /// transaction or modify the database.
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// # Errors
    ///
    /// Returns an error if any action fails; the transaction is rolled back
    /// and nothing from the plan persists. Returns [`Error::LockTimeout`] if
    /// the write lock could not be taken in time.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        if self.dry_run {
            return Ok(ExecutionResult::new(plan, true, 0));
        }

        let busy_timeout = self.db.config().busy_timeout;
        let tx = self.db.begin_immediate()?;
        log::debug!("executing plan: {}", plan.description);

        let mut removed = 0;
        for action in &plan.actions {
            removed += Self::execute_action(&tx, action)?;
        }

        // A busy COMMIT is lock contention like a busy BEGIN.
        tx.commit()
            .map_err(|e| Error::from_database(e, busy_timeout))?;

        Ok(ExecutionResult::new(plan, false, removed))
    }

    /// Executes a single action, returning how many reservations it removed.
    fn execute_action(conn: &Connection, action: &PlanAction) -> Result<usize> {
        match action {
            PlanAction::CreateReservation(reservation) => {
                if conn
                    .find_reservation_by_slot(reservation.seat(), reservation.travel_date())?
                    .is_some()
                {
                    return Err(slot_conflict(reservation));
                }
                // An inactive record under the same key would trip the primary key.
                conn.delete_reservation(reservation.key())?;
                conn.create_reservation(reservation)?;
                Ok(0)
            }
            PlanAction::ReplaceReservation(reservation) => {
                if let Some(holder) =
                    conn.find_reservation_by_slot(reservation.seat(), reservation.travel_date())?
                {
                    if holder.email() != reservation.email() {
                        return Err(slot_conflict(reservation));
                    }
                }
                conn.delete_reservation(reservation.key())?;
                conn.create_reservation(reservation)?;
                Ok(0)
            }
            PlanAction::DeleteReservation(key) => Ok(usize::from(conn.delete_reservation(key)?)),
            PlanAction::DeleteReservationsFor(email) => delete_reservations_for(conn, email),
            PlanAction::UpsertUser(profile) => {
                conn.upsert_user(profile)?;
                Ok(0)
            }
            PlanAction::RecordNotice {
                receiver,
                sender,
                message,
            } => {
                Database::record_notice(conn, receiver, sender, message)?;
                Ok(0)
            }
            PlanAction::CloseRollover {
                id,
                seat,
                travel_date,
            } => {
                if conn.delete_staged_rollover(*id, *seat, *travel_date)? {
                    return Ok(0);
                }
                match conn.get_rollover(*id)? {
                    Some(_) => Err(Error::Conflict {
                        details: format!(
                            "rollover request {id} is no longer staged for seat {seat} on {travel_date}"
                        ),
                    }),
                    None => Err(Error::NotFound {
                        resource: format!("rollover request {id}"),
                    }),
                }
            }
        }
    }
}

fn slot_conflict(reservation: &Reservation) -> Error {
    Error::Conflict {
        details: format!(
            "seat {} is already booked on {}",
            reservation.seat(),
            reservation.travel_date()
        ),
    }
}
