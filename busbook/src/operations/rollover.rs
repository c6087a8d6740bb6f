//! Rollover operations: open, stage, finalize and dismiss requests.
//!
//! Finalizing a staged request supersedes every reservation the passenger
//! holds with a single new one. The supersession, the audit notice and the
//! removal of the request share one IMMEDIATE transaction; the passenger is
//! notified after it commits.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::notify::{
    dispatch_after_commit, DeliveryReport, Notification, NotificationDispatcher, DEFAULT_SENDER,
};
use crate::repository::{ReservationRepository, RolloverRepository, UserRepository};
use crate::reservation::{normalize_email, Destination, ReservationField};
use crate::rollover::{RolloverField, RolloverId, RolloverPatch, RolloverRequest, RolloverView};
use crate::schedule::{Schedule, TravelDate};
use crate::seat::SeatId;
use crate::{Reservation, ReservationKey};

use super::executor::PlanExecutor;
use super::plan::{OperationPlan, PlanAction};

/// Renders the notice a passenger receives when a rollover is finalized.
///
/// # Examples
///
/// ```
/// use busbook::operations::rollover_notice;
/// use busbook::{Destination, SeatId};
///
/// let text = rollover_notice(
///     SeatId::try_from(4).unwrap(),
///     "2024-06-11".parse().unwrap(),
///     Destination::Beliatta,
/// );
/// assert_eq!(
///     text,
///     "You have been booked for seat 4 according to your rollover request \
///      on 2024-06-11 to Beliatta Interchange."
/// );
/// ```
#[must_use]
pub fn rollover_notice(seat: SeatId, travel_date: TravelDate, destination: Destination) -> String {
    format!(
        "You have been booked for seat {seat} according to your rollover request \
         on {travel_date} to {destination}."
    )
}

/// The most recent reservation an email holds, by travel date.
fn latest_reservation(conn: &Connection, email: &str) -> Result<Option<Reservation>> {
    Ok(conn
        .query_reservations(&ReservationField::Email(email.to_string()))?
        .into_iter()
        .max_by_key(|r| (r.travel_date(), r.booked_at())))
}

/// Plan builder for finalizing a staged rollover request.
#[derive(Debug)]
pub struct FinalizePlan<'a> {
    request: &'a RolloverRequest,
    schedule: &'a Schedule,
    sender: &'a str,
}

impl<'a> FinalizePlan<'a> {
    /// Creates a plan builder for the request.
    #[must_use]
    pub fn new(request: &'a RolloverRequest, schedule: &'a Schedule, sender: &'a str) -> Self {
        Self {
            request,
            schedule,
            sender,
        }
    }

    /// Builds the supersession plan.
    ///
    /// The new reservation takes its passenger fields from the stored user
    /// profile, falling back to the reservation being superseded; its
    /// destination comes from the request, falling back the same way.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - a validation error if the request is not staged, its date is off
    ///   schedule, or no destination can be resolved
    /// - [`Error::NotFound`] if nothing is known about the passenger
    /// - [`Error::Conflict`] if another passenger holds the staged slot
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let id = self.request.id;
        let Some((seat, travel_date)) = self.request.staged_slot() else {
            return Err(Error::Validation {
                field: "status".into(),
                message: format!(
                    "rollover request {id} is {}; stage a seat and date first",
                    self.request.status
                ),
            });
        };
        let travel_date = self.schedule.validate(travel_date)?;
        let email = self.request.email.as_str();

        let superseded = latest_reservation(conn, email)?;
        let profile = match conn.get_user(email)? {
            Some(profile) => profile,
            None => superseded
                .as_ref()
                .map(Reservation::profile)
                .ok_or_else(|| Error::NotFound {
                    resource: format!("passenger profile for {email}"),
                })?,
        };
        let destination = self
            .request
            .destination
            .or_else(|| superseded.as_ref().map(Reservation::destination))
            .ok_or_else(|| Error::Validation {
                field: "destination".into(),
                message: format!("rollover request {id} has no destination to book"),
            })?;

        if let Some(holder) = conn.find_reservation_by_slot(seat, travel_date)? {
            if holder.email() != email {
                return Err(Error::Conflict {
                    details: format!("seat {seat} is already booked on {travel_date}"),
                });
            }
        }

        let reservation = Reservation::builder(ReservationKey::new(email, seat, travel_date)?)
            .passenger(&profile)
            .destination(destination)
            .build()?;
        let message = rollover_notice(seat, travel_date, destination);

        let mut plan = OperationPlan::new(format!("Finalize rollover request {id}"));
        if let Some(previous) = superseded.as_ref().filter(|r| r.is_checked_in()) {
            plan = plan.add_warning(format!(
                "{email} had checked in for seat {} on {}",
                previous.seat(),
                previous.travel_date()
            ));
        }

        Ok(plan
            .add_action(PlanAction::CloseRollover {
                id,
                seat,
                travel_date,
            })
            .add_action(PlanAction::DeleteReservationsFor(email.to_string()))
            .add_action(PlanAction::CreateReservation(reservation))
            .add_action(PlanAction::RecordNotice {
                receiver: email.to_string(),
                sender: self.sender.to_string(),
                message,
            }))
    }
}

/// What finalizing a rollover request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOutcome {
    /// The reservation that replaced the passenger's bookings.
    pub reservation: Reservation,
    /// How many reservations were superseded.
    pub superseded: usize,
    /// The notice text sent to the passenger.
    pub notice: String,
    /// Notice delivery counts.
    pub delivery: DeliveryReport,
}

/// Manages the rollover workflow.
///
/// # Examples
///
/// ```no_run
/// use busbook::notify::LogDispatcher;
/// use busbook::operations::RolloverService;
/// use busbook::{Database, DatabaseConfig, SeatId};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/busbook.db")).unwrap();
/// let notifier = LogDispatcher::new("transport-office");
/// let mut service = RolloverService::new(&mut db, &notifier);
///
/// let request = service.open_request("nimal@kdu.ac.lk").unwrap();
/// service
///     .stage_details(request.id, SeatId::try_from(4).unwrap(), "2024-06-11".parse().unwrap(), None)
///     .unwrap();
/// let outcome = service.finalize(request.id).unwrap();
/// println!("{}", outcome.notice);
/// ```
pub struct RolloverService<'a> {
    db: &'a mut Database,
    schedule: Schedule,
    sender: String,
    notifier: &'a dyn NotificationDispatcher,
}

impl<'a> RolloverService<'a> {
    /// Creates a service using the default schedule and sender.
    #[must_use]
    pub fn new(db: &'a mut Database, notifier: &'a dyn NotificationDispatcher) -> Self {
        Self {
            db,
            schedule: Schedule::default(),
            sender: DEFAULT_SENDER.to_string(),
            notifier,
        }
    }

    /// Replaces the service schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sets the sender recorded on notices.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Opens a pending request for a passenger.
    ///
    /// The destination of the passenger's latest booking is copied onto the
    /// request, if there is one.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed email, or
    /// [`Error::Conflict`] if the passenger already has an open request.
    pub fn open_request(&mut self, email: &str) -> Result<RolloverRequest> {
        let conn = self.db.connection();
        let existing = conn.query_rollovers(&RolloverField::Email(email.to_string()))?;
        if let Some(open) = existing.first() {
            return Err(Error::Conflict {
                details: format!(
                    "{} already has rollover request {} ({})",
                    open.email, open.id, open.status
                ),
            });
        }

        let destination = latest_reservation(conn, &normalize_email(email)?)?
            .map(|r| r.destination());
        let request = conn.create_rollover(email, destination)?;
        log::info!("opened rollover request {} for {}", request.id, request.email);
        Ok(request)
    }

    /// Lists every request joined with the passenger's current booking.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn list_requests(&self) -> Result<Vec<RolloverView>> {
        let conn = self.db.connection();
        conn.list_rollovers()?
            .into_iter()
            .map(|request| {
                let current = latest_reservation(conn, &request.email)?;
                Ok(RolloverView {
                    destination: request
                        .destination
                        .or_else(|| current.as_ref().map(Reservation::destination)),
                    checked_in: current.as_ref().map(Reservation::is_checked_in),
                    request,
                })
            })
            .collect()
    }

    /// Records a revised seat and date, moving the request to `Staged`.
    ///
    /// Staging again overwrites the previous choice. A `None` destination
    /// keeps the one already on the request.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the date is off schedule, or
    /// [`Error::NotFound`] if the request does not exist.
    pub fn stage_details(
        &mut self,
        id: RolloverId,
        seat: SeatId,
        travel_date: TravelDate,
        destination: Option<Destination>,
    ) -> Result<RolloverRequest> {
        let travel_date = self.schedule.validate(travel_date)?;
        let patch = RolloverPatch::stage(seat, travel_date).with_destination(destination);
        self.db.connection().update_rollover(id, &patch)
    }

    /// Turns a staged request into the passenger's only reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the request does not exist, plus every
    /// error listed on [`FinalizePlan::build_plan`]. On any error nothing
    /// changes.
    pub fn finalize(&mut self, id: RolloverId) -> Result<FinalizeOutcome> {
        let request = self
            .db
            .connection()
            .get_rollover(id)?
            .ok_or_else(|| Error::NotFound {
                resource: format!("rollover request {id}"),
            })?;

        let plan = FinalizePlan::new(&request, &self.schedule, &self.sender)
            .build_plan(self.db.connection())?;
        for warning in &plan.warnings {
            log::warn!("{warning}");
        }

        let execution = PlanExecutor::new(&mut *self.db).execute(&plan)?;

        let reservation = execution
            .reservations
            .first()
            .cloned()
            .ok_or_else(|| Error::NotFound {
                resource: format!("reservation planned for rollover request {id}"),
            })?;
        let notice = rollover_notice(
            reservation.seat(),
            reservation.travel_date(),
            reservation.destination(),
        );
        let delivery = dispatch_after_commit(
            self.notifier,
            &[Notification::RolloverNotice {
                recipient: request.email.clone(),
                message: notice.clone(),
            }],
        );

        Ok(FinalizeOutcome {
            reservation,
            superseded: execution.removed,
            notice,
            delivery,
        })
    }

    /// Deletes a request without touching any reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the request does not exist.
    pub fn dismiss(&mut self, id: RolloverId) -> Result<()> {
        if self.db.connection().delete_rollover(id)? {
            Ok(())
        } else {
            Err(Error::NotFound {
                resource: format!("rollover request {id}"),
            })
        }
    }

    /// Deletes every request one by one, returning how many went.
    ///
    /// Requests removed concurrently by another caller are skipped, so
    /// running this again is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails part way; requests already
    /// removed stay removed.
    pub fn clear_all(&mut self) -> Result<usize> {
        let conn = self.db.connection();
        let mut removed = 0;
        for request in conn.list_rollovers()? {
            if conn.delete_rollover(request.id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
