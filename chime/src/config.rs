//! Runtime notifier configuration loaded from the environment.

use tracing::{info, warn};

/// Presentation and capacity settings for the notifier runtime.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Application name shown when the sender identity is withheld.
    pub app_name: String,
    /// Themed icon used when no userpic is attached or allowed.
    pub icon: String,
    /// Label for the mark-as-read button.
    pub mark_read_label: String,
    /// Bound of the command queue feeding the runtime task.
    pub queue_capacity: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            app_name: "Chime".into(),
            icon: "chat-message-new-symbolic".into(),
            mark_read_label: "Mark as read".into(),
            queue_capacity: 128,
        }
    }
}

impl NotifierConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn load() -> Self {
        let g = |key: &str| -> String { std::env::var(key).unwrap_or_default() };

        let defaults = Self::default();
        Self {
            app_name: non_empty(g("CHIME_APP_NAME"), defaults.app_name),
            icon: non_empty(g("CHIME_ICON"), defaults.icon),
            mark_read_label: non_empty(g("CHIME_MARK_READ_LABEL"), defaults.mark_read_label),
            // Zero-capacity channels are not constructible.
            queue_capacity: parse_usize(&g("CHIME_QUEUE_CAPACITY"), defaults.queue_capacity).max(1),
        }
    }
}

/// Load .env from the current or nearby directories if present.
pub fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in candidates {
        if dotenvy::from_filename(path).is_ok() {
            info!("Loaded environment from {path}");
            return;
        }
    }
}

fn non_empty(value: String, default: String) -> String {
    if value.is_empty() {
        return default;
    }
    value
}

fn parse_usize(s: &str, default: usize) -> usize {
    if s.is_empty() {
        return default;
    }
    match s.parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("Unparsable queue capacity {s:?}; using {default}");
            default
        }
    }
}
