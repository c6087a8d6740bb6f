//! Plan types for booking and rollover operations.
//!
//! A plan lists the writes an operation will make, in order, without
//! performing them. Every action in one plan is applied inside a single
//! IMMEDIATE transaction by [`super::PlanExecutor`].

use crate::rollover::RolloverId;
use crate::{Reservation, ReservationKey, SeatId, TravelDate, UserProfile};

/// A single action to be taken during plan execution.
///
/// ## Note on `CreateReservation` vs `ReplaceReservation`
///
/// Both variants re-check the seat and date inside the transaction. They
/// differ in who may already hold the slot:
///
/// - `CreateReservation`: nobody. Any active holder is a conflict.
/// - `ReplaceReservation`: the same passenger, whose record is overwritten.
///   A holder with a different email is a conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Write a new reservation into a free slot.
    CreateReservation(Reservation),

    /// Write a reservation, overwriting the same passenger's record for the slot.
    ReplaceReservation(Reservation),

    /// Delete a reservation by key.
    DeleteReservation(ReservationKey),

    /// Delete every reservation held by a (normalized) email.
    DeleteReservationsFor(String),

    /// Insert or merge a passenger profile.
    UpsertUser(UserProfile),

    /// Append an entry to the notice audit trail.
    RecordNotice {
        /// Recipient email.
        receiver: String,
        /// Sender name.
        sender: String,
        /// Notice text.
        message: String,
    },

    /// Delete a rollover request, provided it is still staged for the slot.
    CloseRollover {
        /// The request.
        id: RolloverId,
        /// Seat the request was staged for.
        seat: SeatId,
        /// Date the request was staged for.
        travel_date: TravelDate,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    ///
    /// # Examples
    ///
    /// ```
    /// use busbook::operations::PlanAction;
    ///
    /// let action = PlanAction::DeleteReservationsFor("nimal@kdu.ac.lk".into());
    /// assert_eq!(action.description(), "Delete every reservation for nimal@kdu.ac.lk");
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateReservation(r) => format!(
                "Book seat {} on {} for {}",
                r.seat(),
                r.travel_date(),
                r.email()
            ),
            Self::ReplaceReservation(r) => format!(
                "Rebook seat {} on {} for {}",
                r.seat(),
                r.travel_date(),
                r.email()
            ),
            Self::DeleteReservation(key) => format!("Delete reservation {key}"),
            Self::DeleteReservationsFor(email) => {
                format!("Delete every reservation for {email}")
            }
            Self::UpsertUser(profile) => format!("Save profile for {}", profile.email()),
            Self::RecordNotice { receiver, .. } => format!("Record notice to {receiver}"),
            Self::CloseRollover { id, .. } => format!("Close rollover request {id}"),
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of actions,
/// and any warnings that should be communicated to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use busbook::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Book seat 12");
    /// assert_eq!(plan.description, "Book seat 12");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use busbook::operations::{OperationPlan, PlanAction};
    /// use busbook::{ReservationKey, SeatId};
    ///
    /// let key = ReservationKey::new(
    ///     "nimal@kdu.ac.lk",
    ///     SeatId::try_from(12).unwrap(),
    ///     "2024-06-08".parse().unwrap(),
    /// )
    /// .unwrap();
    ///
    /// let plan = OperationPlan::new("Cancel")
    ///     .add_action(PlanAction::DeleteReservation(key));
    ///
    /// assert_eq!(plan.actions.len(), 1);
    /// ```
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns the reservations this plan writes, in order.
    #[must_use]
    pub fn reservations(&self) -> Vec<&Reservation> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                PlanAction::CreateReservation(r) | PlanAction::ReplaceReservation(r) => Some(r),
                _ => None,
            })
            .collect()
    }
}
