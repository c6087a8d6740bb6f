//! Best-effort passenger notifications.
//!
//! Notifications never take part in a storage transaction. Services collect
//! them into an outbox while planning, commit their writes, and only then
//! hand the outbox to [`dispatch_after_commit`]. A failed delivery is
//! logged as a warning and leaves the committed booking untouched.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::config::Config;
use crate::reservation::{Destination, JourneyType, Reservation};
use crate::schedule::TravelDate;
use crate::seat::SeatId;

/// Sender name used when none is configured.
pub const DEFAULT_SENDER: &str = "transport-office";

/// Error returned by a dispatcher that could not deliver a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The message could not be delivered.
    #[error("could not notify {recipient}: {reason}")]
    Delivery {
        /// The intended recipient.
        recipient: String,
        /// Why delivery failed.
        reason: String,
    },
}

/// What a passenger is told after a successful booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    /// Passenger name.
    pub full_name: String,
    /// Booked seat.
    pub seat: SeatId,
    /// Booked date.
    pub travel_date: TravelDate,
    /// Destination interchange.
    pub destination: Destination,
    /// One way or round trip.
    pub journey_type: JourneyType,
}

impl BookingConfirmation {
    /// Renders the confirmation as plain text.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Dear {}, seat {} is booked for you on {} to {} ({}).",
            self.full_name, self.seat, self.travel_date, self.destination, self.journey_type
        )
    }
}

impl From<&Reservation> for BookingConfirmation {
    fn from(r: &Reservation) -> Self {
        Self {
            full_name: r.full_name().to_string(),
            seat: r.seat(),
            travel_date: r.travel_date(),
            destination: r.destination(),
            journey_type: r.journey_type(),
        }
    }
}

/// Delivery channel for passenger messages.
///
/// Implementations may talk to an external provider; callers treat every
/// call as fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationDispatcher: Send + Sync {
    /// Tells a passenger that a booking went through.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered.
    fn send_booking_confirmation(
        &self,
        recipient: &str,
        details: &BookingConfirmation,
    ) -> Result<(), NotificationError>;

    /// Sends a rollover notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered.
    fn send_rollover_notice(&self, recipient: &str, message: &str)
        -> Result<(), NotificationError>;
}

/// A message waiting in the outbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A booking confirmation.
    BookingConfirmation {
        /// Recipient email.
        recipient: String,
        /// Booking details.
        details: BookingConfirmation,
    },
    /// A rollover notice.
    RolloverNotice {
        /// Recipient email.
        recipient: String,
        /// Notice text.
        message: String,
    },
}

impl Notification {
    /// Builds a booking confirmation for a reservation.
    #[must_use]
    pub fn confirmation_for(reservation: &Reservation) -> Self {
        Self::BookingConfirmation {
            recipient: reservation.email().to_string(),
            details: BookingConfirmation::from(reservation),
        }
    }

    /// Returns the recipient email.
    #[must_use]
    pub fn recipient(&self) -> &str {
        match self {
            Self::BookingConfirmation { recipient, .. } | Self::RolloverNotice { recipient, .. } => {
                recipient
            }
        }
    }

    fn deliver(&self, dispatcher: &dyn NotificationDispatcher) -> Result<(), NotificationError> {
        match self {
            Self::BookingConfirmation { recipient, details } => {
                dispatcher.send_booking_confirmation(recipient, details)
            }
            Self::RolloverNotice { recipient, message } => {
                dispatcher.send_rollover_notice(recipient, message)
            }
        }
    }
}

/// Counts of delivered and failed notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Messages the dispatcher accepted.
    pub sent: usize,
    /// Messages that failed and were logged.
    pub failed: usize,
}

/// Delivers an outbox once the writes it describes are committed.
///
/// Failures are logged at warn level and counted; they are never returned.
pub fn dispatch_after_commit(
    dispatcher: &dyn NotificationDispatcher,
    outbox: &[Notification],
) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for notification in outbox {
        match notification.deliver(dispatcher) {
            Ok(()) => report.sent += 1,
            Err(e) => {
                log::warn!("notification not delivered (booking kept): {e}");
                report.failed += 1;
            }
        }
    }

    report
}

/// Dispatcher that writes messages to the log instead of sending them.
#[derive(Debug, Clone)]
pub struct LogDispatcher {
    sender: String,
}

impl LogDispatcher {
    /// Creates a log dispatcher that signs messages with `sender`.
    #[must_use]
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl NotificationDispatcher for LogDispatcher {
    fn send_booking_confirmation(
        &self,
        recipient: &str,
        details: &BookingConfirmation,
    ) -> Result<(), NotificationError> {
        log::info!(
            "[{} -> {recipient}] booking confirmation: {}",
            self.sender,
            details.message()
        );
        Ok(())
    }

    fn send_rollover_notice(
        &self,
        recipient: &str,
        message: &str,
    ) -> Result<(), NotificationError> {
        log::info!("[{} -> {recipient}] rollover notice: {message}", self.sender);
        Ok(())
    }
}

/// Dispatcher that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDispatcher;

impl NotificationDispatcher for NoopDispatcher {
    fn send_booking_confirmation(
        &self,
        _recipient: &str,
        _details: &BookingConfirmation,
    ) -> Result<(), NotificationError> {
        Ok(())
    }

    fn send_rollover_notice(
        &self,
        _recipient: &str,
        _message: &str,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Dispatcher that keeps every message in memory.
///
/// Useful for tests and for showing what a dry run would send. When built
/// with [`RecordingDispatcher::failing`], every delivery fails after being
/// recorded.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingDispatcher {
    /// Creates a recorder whose deliveries succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder whose deliveries fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// Returns everything recorded so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, notification: Notification) -> Result<(), NotificationError> {
        let recipient = notification.recipient().to_string();
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);

        if self.fail {
            return Err(NotificationError::Delivery {
                recipient,
                reason: "recording dispatcher configured to fail".into(),
            });
        }
        Ok(())
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn send_booking_confirmation(
        &self,
        recipient: &str,
        details: &BookingConfirmation,
    ) -> Result<(), NotificationError> {
        self.record(Notification::BookingConfirmation {
            recipient: recipient.to_string(),
            details: details.clone(),
        })
    }

    fn send_rollover_notice(
        &self,
        recipient: &str,
        message: &str,
    ) -> Result<(), NotificationError> {
        self.record(Notification::RolloverNotice {
            recipient: recipient.to_string(),
            message: message.to_string(),
        })
    }
}

/// Returns the configured sender name.
#[must_use]
pub fn sender_from_config(config: &Config) -> String {
    config
        .notifications
        .as_ref()
        .and_then(|n| n.sender.clone())
        .unwrap_or_else(|| DEFAULT_SENDER.to_string())
}

/// Builds the dispatcher selected by configuration.
///
/// Notifications are on by default and go to the log.
#[must_use]
pub fn dispatcher_from_config(config: &Config) -> Box<dyn NotificationDispatcher> {
    let enabled = config
        .notifications
        .as_ref()
        .and_then(|n| n.enabled)
        .unwrap_or(true);

    if enabled {
        Box::new(LogDispatcher::new(sender_from_config(config)))
    } else {
        Box::new(NoopDispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;

    fn confirmation() -> BookingConfirmation {
        BookingConfirmation {
            full_name: "Nimal Perera".into(),
            seat: SeatId::try_from(12).unwrap(),
            travel_date: "2024-06-08".parse().unwrap(),
            destination: Destination::Beliatta,
            journey_type: JourneyType::OneWay,
        }
    }

    fn outbox() -> Vec<Notification> {
        vec![
            Notification::BookingConfirmation {
                recipient: "nimal@kdu.ac.lk".into(),
                details: confirmation(),
            },
            Notification::RolloverNotice {
                recipient: "nimal@kdu.ac.lk".into(),
                message: "moved".into(),
            },
        ]
    }

    #[test]
    fn test_confirmation_message() {
        let text = confirmation().message();
        assert!(text.contains("seat 12"));
        assert!(text.contains("2024-06-08"));
        assert!(text.contains("Beliatta Interchange"));
    }

    #[test]
    fn test_dispatch_counts_successes() {
        let recorder = RecordingDispatcher::new();
        let report = dispatch_after_commit(&recorder, &outbox());
        assert_eq!(report, DeliveryReport { sent: 2, failed: 0 });
        assert_eq!(recorder.sent(), outbox());
    }

    #[test]
    fn test_dispatch_swallows_failures() {
        let recorder = RecordingDispatcher::failing();
        let report = dispatch_after_commit(&recorder, &outbox());
        assert_eq!(report, DeliveryReport { sent: 0, failed: 2 });
        assert_eq!(recorder.sent().len(), 2);
    }

    #[test]
    fn test_dispatch_with_mock() {
        let mut mock = MockNotificationDispatcher::new();
        mock.expect_send_booking_confirmation()
            .withf(|recipient, details| {
                recipient.to_string() == "nimal@kdu.ac.lk" && details.seat.value() == 12
            })
            .times(1)
            .returning(|_, _| Ok(()));
        mock.expect_send_rollover_notice()
            .times(1)
            .returning(|recipient, _| {
                Err(NotificationError::Delivery {
                    recipient: recipient.to_string(),
                    reason: "smtp down".into(),
                })
            });

        let report = dispatch_after_commit(&mock, &outbox());
        assert_eq!(report, DeliveryReport { sent: 1, failed: 1 });
    }

    #[test]
    fn test_dispatcher_from_config() {
        let mut config = Config::default();
        assert_eq!(sender_from_config(&config), DEFAULT_SENDER);

        config.notifications = Some(NotificationConfig {
            enabled: Some(false),
            sender: Some("Transport Division".into()),
        });
        assert_eq!(sender_from_config(&config), "Transport Division");

        let dispatcher = dispatcher_from_config(&config);
        assert!(dispatcher
            .send_rollover_notice("a@b.lk", "ignored")
            .is_ok());
    }
}
