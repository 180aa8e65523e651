//! Visual and interactive content of one display request.

use chime_registry::WireValue;

/// Portal interface version that introduced the `category` key.
pub const CATEGORY_MIN_VERSION: u32 = 2;

/// Urgency level forwarded to the notification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Icon shown with the notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    /// Named icon resolved from the desktop theme.
    Themed(String),
    /// Prerendered image bytes, typically a sender userpic.
    Bytes(Vec<u8>),
}

/// A secondary action button.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionButton {
    pub label: String,
    pub action: String,
    pub target: Vec<WireValue>,
}

/// Everything the service needs to display one notification.
///
/// `category` is a content classification tag; the portal only learned it in
/// interface version 2, so older services have it stripped before the call
/// goes out.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowPayload {
    pub title: String,
    pub body: String,
    pub icon: IconRef,
    pub priority: Priority,
    pub category: Option<String>,
    /// Action invoked when the notification itself is activated.
    pub default_action: String,
    pub default_action_target: Vec<WireValue>,
    pub buttons: Vec<ActionButton>,
}

impl ShowPayload {
    /// Strips the category when the portal predates it. Keys a portal does
    /// not know would fail the whole display call, not just the key.
    pub fn gate_category(&mut self, portal_version: u32) {
        if portal_version < CATEGORY_MIN_VERSION {
            self.category = None;
        }
    }
}
