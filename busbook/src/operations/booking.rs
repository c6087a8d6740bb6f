//! Booking operations: create, rebook, cancel and list.
//!
//! A booking request is validated in full by [`BookingPlan::build_plan`]
//! before any write. The resulting plan is executed in one IMMEDIATE
//! transaction, so a round trip whose second date is taken leaves no trace
//! of the first. Confirmations go out only after the commit.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::notify::{dispatch_after_commit, DeliveryReport, Notification, NotificationDispatcher};
use crate::repository::ReservationRepository;
use crate::reservation::{Destination, JourneyType, ReservationField, ReservationPatch, Role};
use crate::schedule::{Schedule, TravelDate};
use crate::seat::SeatId;
use crate::{Reservation, ReservationKey, UserProfile};

use super::executor::{ExecutionResult, PlanExecutor};
use super::plan::{OperationPlan, PlanAction};

/// A request to book one seat on one or two dates.
///
/// # Examples
///
/// ```
/// use busbook::operations::BookingRequest;
/// use busbook::{Destination, JourneyType, SeatId};
///
/// let request = BookingRequest::new(SeatId::try_from(7).unwrap(), "nimal@kdu.ac.lk")
///     .with_full_name("Nimal Perera")
///     .with_phone_number("0771234567")
///     .with_enrollment_number("D/BCS/23/0001")
///     .with_destination(Destination::Beliatta)
///     .with_journey_type(JourneyType::RoundTrip)
///     .with_travel_date("2024-06-08".parse().unwrap())
///     .with_travel_date("2024-06-11".parse().unwrap());
///
/// assert_eq!(request.travel_dates.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// The seat to book.
    pub seat: SeatId,
    /// Passenger email (normalized during planning).
    pub email: String,
    /// Passenger name.
    pub full_name: Option<String>,
    /// Passenger phone number.
    pub phone_number: Option<String>,
    /// Enrollment or staff number.
    pub enrollment_number: Option<String>,
    /// One way or round trip.
    pub journey_type: JourneyType,
    /// Destination interchange.
    pub destination: Option<Destination>,
    /// Student or lecturer.
    pub role: Role,
    /// One date for a one-way trip, two for a round trip.
    pub travel_dates: Vec<TravelDate>,
}

impl BookingRequest {
    /// Creates a one-way student request with no dates yet.
    #[must_use]
    pub fn new(seat: SeatId, email: impl Into<String>) -> Self {
        Self {
            seat,
            email: email.into(),
            full_name: None,
            phone_number: None,
            enrollment_number: None,
            journey_type: JourneyType::default(),
            destination: None,
            role: Role::default(),
            travel_dates: Vec::new(),
        }
    }

    /// Sets the passenger name.
    #[must_use]
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    /// Sets the enrollment or staff number.
    #[must_use]
    pub fn with_enrollment_number(mut self, number: impl Into<String>) -> Self {
        self.enrollment_number = Some(number.into());
        self
    }

    /// Sets the journey type.
    #[must_use]
    pub fn with_journey_type(mut self, journey_type: JourneyType) -> Self {
        self.journey_type = journey_type;
        self
    }

    /// Sets the destination.
    #[must_use]
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Appends a travel date.
    #[must_use]
    pub fn with_travel_date(mut self, date: TravelDate) -> Self {
        self.travel_dates.push(date);
        self
    }

    /// Replaces the travel dates.
    #[must_use]
    pub fn with_travel_dates(mut self, dates: Vec<TravelDate>) -> Self {
        self.travel_dates = dates;
        self
    }

    fn profile(&self) -> Result<UserProfile> {
        let required = |field: &str, value: &Option<String>| {
            value.clone().ok_or_else(|| Error::Validation {
                field: field.into(),
                message: "is required".into(),
            })
        };

        Ok(UserProfile::new(
            &self.email,
            &required("full_name", &self.full_name)?,
            &required("phone_number", &self.phone_number)?,
            &required("enrollment_number", &self.enrollment_number)?,
            self.role,
        )?)
    }
}

/// Plan builder for create and rebook operations.
#[derive(Debug)]
pub struct BookingPlan<'a> {
    request: BookingRequest,
    schedule: &'a Schedule,
    rebook: bool,
}

impl<'a> BookingPlan<'a> {
    /// Plans a new booking of one reservation per requested date.
    #[must_use]
    pub fn new(request: BookingRequest, schedule: &'a Schedule) -> Self {
        Self {
            request,
            schedule,
            rebook: false,
        }
    }

    /// Plans a rebooking of the request's seat on exactly one date.
    ///
    /// The passenger's own record for that slot is overwritten.
    #[must_use]
    pub fn rebook(request: BookingRequest, schedule: &'a Schedule) -> Self {
        Self {
            request,
            schedule,
            rebook: true,
        }
    }

    /// Validates the request and builds the plan.
    ///
    /// Occupancy is checked here for an early answer and again inside the
    /// executing transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation error if:
    /// - A date falls outside the schedule
    /// - The number of dates does not match the journey type (one for
    ///   one-way and for every rebooking, two distinct dates for a round trip)
    /// - A passenger field is missing or malformed
    ///
    /// Returns [`Error::Conflict`] if a requested slot is already held.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        self.validate_dates()?;

        let profile = self.request.profile()?;
        let destination = self.request.destination.ok_or_else(|| Error::Validation {
            field: "destination".into(),
            message: "is required".into(),
        })?;

        let verb = if self.rebook { "Rebook" } else { "Book" };
        let mut plan = OperationPlan::new(format!(
            "{verb} seat {} for {}",
            self.request.seat,
            profile.email()
        ));

        for &date in &self.request.travel_dates {
            let key = ReservationKey::new(profile.email(), self.request.seat, date)?;
            let reservation = Reservation::builder(key)
                .passenger(&profile)
                .journey_type(self.request.journey_type)
                .destination(destination)
                .build()?;

            if let Some(holder) = conn.find_reservation_by_slot(self.request.seat, date)? {
                if !self.rebook || holder.email() != profile.email() {
                    return Err(Error::Conflict {
                        details: format!("seat {} is already booked on {date}", self.request.seat),
                    });
                }
                if holder.is_checked_in() {
                    plan = plan.add_warning(format!(
                        "{} had already checked in on {date}",
                        holder.email()
                    ));
                }
            }

            plan = plan.add_action(if self.rebook {
                PlanAction::ReplaceReservation(reservation)
            } else {
                PlanAction::CreateReservation(reservation)
            });
        }

        Ok(plan.add_action(PlanAction::UpsertUser(profile)))
    }

    fn validate_dates(&self) -> Result<()> {
        let dates = &self.request.travel_dates;
        let expected = if self.rebook {
            1
        } else {
            self.request.journey_type.date_count()
        };

        if dates.len() != expected {
            let wanted = if self.rebook {
                "a rebooking".to_string()
            } else {
                format!("a {} booking", self.request.journey_type)
            };
            return Err(Error::Validation {
                field: "travel_dates".into(),
                message: format!(
                    "{wanted} needs exactly {expected} date(s), got {}",
                    dates.len()
                ),
            });
        }

        if expected == 2 && dates[0] == dates[1] {
            return Err(Error::Validation {
                field: "travel_dates".into(),
                message: "a round trip needs two different dates".into(),
            });
        }

        for &date in dates {
            self.schedule.validate(date)?;
        }
        Ok(())
    }
}

/// What a committed (or dry-run) booking produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOutcome {
    /// The executed plan.
    pub execution: ExecutionResult,
    /// Confirmation delivery counts. Empty for a dry run.
    pub delivery: DeliveryReport,
}

impl BookingOutcome {
    /// The reservations that were written.
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.execution.reservations
    }
}

/// Creates, rebooks, cancels and lists bookings.
///
/// # Examples
///
/// ```no_run
/// use busbook::notify::NoopDispatcher;
/// use busbook::operations::{BookingRequest, BookingService};
/// use busbook::{Database, DatabaseConfig, Destination, SeatId};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/busbook.db")).unwrap();
/// let notifier = NoopDispatcher;
/// let mut service = BookingService::new(&mut db, &notifier);
///
/// let request = BookingRequest::new(SeatId::try_from(12).unwrap(), "nimal@kdu.ac.lk")
///     .with_full_name("Nimal Perera")
///     .with_phone_number("0771234567")
///     .with_enrollment_number("D/BCS/23/0001")
///     .with_destination(Destination::Beliatta)
///     .with_travel_date("2024-06-08".parse().unwrap());
///
/// let outcome = service.create_booking(&request).unwrap();
/// assert_eq!(outcome.reservations().len(), 1);
/// ```
pub struct BookingService<'a> {
    db: &'a mut Database,
    schedule: Schedule,
    notifier: &'a dyn NotificationDispatcher,
    dry_run: bool,
}

impl<'a> BookingService<'a> {
    /// Creates a service using the default Tuesday/Saturday schedule.
    #[must_use]
    pub fn new(db: &'a mut Database, notifier: &'a dyn NotificationDispatcher) -> Self {
        Self {
            db,
            schedule: Schedule::default(),
            notifier,
            dry_run: false,
        }
    }

    /// Replaces the service schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Plans and reports writes without making them or notifying anyone.
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Books the request's seat on each of its dates.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any write if the request is
    /// malformed (see [`BookingPlan::build_plan`]), or [`Error::Conflict`]
    /// naming the first taken date; in that case no date is booked.
    pub fn create_booking(&mut self, request: &BookingRequest) -> Result<BookingOutcome> {
        let plan = BookingPlan::new(request.clone(), &self.schedule)
            .build_plan(self.db.connection())?;
        self.run(&plan)
    }

    /// Books `seat` on the request's single date, overwriting the
    /// passenger's own record for that slot.
    ///
    /// The request's own seat is ignored in favour of `seat`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the request does not carry exactly one
    /// allowed date, or [`Error::Conflict`] if a different passenger holds
    /// the slot.
    pub fn rebook_booking(
        &mut self,
        seat: SeatId,
        request: &BookingRequest,
    ) -> Result<BookingOutcome> {
        let request = BookingRequest {
            seat,
            ..request.clone()
        };
        let plan = BookingPlan::rebook(request, &self.schedule).build_plan(self.db.connection())?;
        self.run(&plan)
    }

    /// Deletes a reservation. Deleting a key that does not exist succeeds.
    ///
    /// Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn cancel_booking(&mut self, key: &ReservationKey) -> Result<bool> {
        let plan = OperationPlan::new(format!("Cancel {key}"))
            .add_action(PlanAction::DeleteReservation(key.clone()));

        let mut executor = PlanExecutor::new(&mut *self.db);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let result = executor.execute(&plan)?;
        Ok(result.removed > 0)
    }

    /// Marks a passenger as boarded for a reservation.
    ///
    /// Checking in twice is a no-op. In dry-run mode the current record is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such reservation, or a
    /// validation error if it is no longer active.
    pub fn check_in(&mut self, key: &ReservationKey) -> Result<Reservation> {
        let conn = self.db.connection();
        let current = conn.get_reservation(key)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {key}"),
        })?;
        if !current.is_active() {
            return Err(Error::Validation {
                field: "active".into(),
                message: format!("reservation {key} has been withdrawn"),
            });
        }
        if self.dry_run || current.is_checked_in() {
            return Ok(current);
        }

        let updated =
            conn.update_reservation(key, &ReservationPatch::default().with_checked_in(true))?;
        log::info!("checked in {key}");
        Ok(updated)
    }

    /// Lists reservations, optionally filtered by one field.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or an email filter is malformed.
    pub fn list_bookings(&self, filter: Option<&ReservationField>) -> Result<Vec<Reservation>> {
        let conn = self.db.connection();
        match filter {
            Some(field) => conn.query_reservations(field),
            None => conn.list_reservations(),
        }
    }

    fn run(&mut self, plan: &OperationPlan) -> Result<BookingOutcome> {
        for warning in &plan.warnings {
            log::warn!("{warning}");
        }

        let mut executor = PlanExecutor::new(&mut *self.db);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let execution = executor.execute(plan)?;

        let delivery = if execution.dry_run {
            DeliveryReport::default()
        } else {
            let outbox: Vec<Notification> = execution
                .reservations
                .iter()
                .map(Notification::confirmation_for)
                .collect();
            dispatch_after_commit(self.notifier, &outbox)
        };

        Ok(BookingOutcome {
            execution,
            delivery,
        })
    }
}
