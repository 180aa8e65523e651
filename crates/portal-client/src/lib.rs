//! Client for the desktop notification portal on the D-Bus session bus.
//!
//! Outbound requests (display, withdraw) are fire-and-forget through a
//! bounded queue drained by one worker task, so they reach the portal in
//! submission order. Inbound user interactions arrive as [`ActionEvent`]
//! values on an mpsc channel returned at connect time.

pub mod payload;
mod portal;
mod variant;

use chime_registry::WireValue;

pub use payload::{ActionButton, IconRef, Priority, ShowPayload};
pub use portal::PortalClient;

/// Opaque token identifying one displayed notification to the service.
pub type Handle = String;

/// What the notification manager needs from a presenting service.
pub trait NotificationBackend {
    /// Whether requests currently have somewhere to go.
    fn is_available(&self) -> bool;

    /// Mints a token for a notification about to be displayed.
    fn mint_handle(&self) -> Handle;

    /// Fire-and-forget display request for `handle`.
    fn display(&self, handle: Handle, payload: ShowPayload);

    /// Fire-and-forget withdrawal of a previously displayed notification.
    fn withdraw(&self, handle: Handle);
}

/// A user interaction relayed by the notification service.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    /// Handle of the notification the user acted on.
    pub handle: Handle,
    /// Action name as attached at display time.
    pub action: String,
    /// Decoded action target (the serialized identity).
    pub target: Vec<WireValue>,
    /// Focus token forwarded by the desktop environment, when the transport
    /// carries one.
    pub activation_token: Option<String>,
}

/// Portal setup failure. Steady-state request failures never surface here;
/// the worker logs and drops them.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("D-Bus error: {0}")]
    Bus(#[from] zbus::Error),

    #[error("notification portal not offered on this session bus: {0}")]
    NotOffered(#[source] zbus::Error),
}
