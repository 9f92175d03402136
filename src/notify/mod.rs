//! Notification gateway - transactional messages over an email-like channel.
//!
//! The storefront hands a [`Notification`] to whatever [`Notifier`] it was
//! built with. Delivery failures are logged by [`deliver`] and never undo
//! the operation that triggered the message.

mod templates;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub use templates::{order_confirmation, password_reset, shipment_notice, verification};

/// A message ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub recipient_email: String,
    pub subject: String,
    pub plain_text_body: String,
    pub html_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The transport refused the message.
    #[error("notification rejected: {0}")]
    Rejected(String),
    /// The transport could not be reached.
    #[error("notification transport unavailable: {0}")]
    Unavailable(String),
    #[error("notification buffer poisoned")]
    BufferPoisoned,
}

/// Trait for sending notifications to an external channel (SMTP, queue, log).
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        (**self).send(notification)
    }
}

/// Send a notification, logging instead of propagating any failure.
///
/// Returns whether the message went out.
pub fn deliver(notifier: &dyn Notifier, notification: &Notification) -> bool {
    match notifier.send(notification) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                recipient = %notification.recipient_email,
                subject = %notification.subject,
                error = %err,
                "failed to send notification"
            );
            false
        }
    }
}

/// A notifier that logs each message, optionally keeping a copy in a buffer.
///
/// This is what runs when no mail transport is configured.
#[derive(Default)]
pub struct LogNotifier {
    buffer: Option<Arc<Mutex<Vec<Notification>>>>,
}

impl LogNotifier {
    pub fn new() -> Self {
        LogNotifier { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<Notification>>>) -> Self {
        LogNotifier {
            buffer: Some(buffer),
        }
    }
}

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        info!(
            to = %notification.recipient_email,
            subject = %notification.subject,
            body = %notification.plain_text_body,
            "notification"
        );
        if let Some(buffer) = &self.buffer {
            buffer
                .lock()
                .map_err(|_| NotificationError::BufferPoisoned)?
                .push(notification.clone());
        }
        Ok(())
    }
}
