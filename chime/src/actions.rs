//! Decoding of daemon action callbacks into application-level intents.

use chime_registry::NotificationId;
use portal_client::ActionEvent;
use tracing::debug;

/// Action name of the notification body itself.
pub const ACTION_ACTIVATE: &str = "activate";
/// Action name of the mark-as-read button.
pub const ACTION_MARK_AS_READ: &str = "mark-as-read";

/// A user gesture on a live notification, resolved to the item it addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// The notification body was clicked.
    Activate(NotificationId),
    /// The mark-as-read button was pressed.
    MarkAsRead(NotificationId),
}

impl UserAction {
    pub fn notification_id(&self) -> NotificationId {
        match *self {
            Self::Activate(id) | Self::MarkAsRead(id) => id,
        }
    }
}

/// Resolve a raw daemon callback to a [`UserAction`].
///
/// Unknown action names and malformed targets are dropped after a debug log.
/// The daemon relays every action sent under our application id, including
/// ones minted by older builds with a different target layout.
pub fn decode(event: &ActionEvent) -> Option<UserAction> {
    match event.action.as_str() {
        ACTION_ACTIVATE => decode_id(event).map(UserAction::Activate),
        ACTION_MARK_AS_READ => decode_id(event).map(UserAction::MarkAsRead),
        other => {
            debug!(action = other, "Ignoring unknown notification action");
            None
        }
    }
}

fn decode_id(event: &ActionEvent) -> Option<NotificationId> {
    match NotificationId::from_wire(&event.target) {
        Ok(id) => Some(id),
        Err(e) => {
            debug!(action = %event.action, "Ignoring action with malformed target: {e}");
            None
        }
    }
}
