//! Desktop notification lifecycle tracking for a chat application.
//!
//! `chime` keeps the bookkeeping straight between a chat application and the
//! desktop notification service: which notification is currently shown for
//! which conversation, so that redisplay replaces instead of duplicating and
//! withdrawal works per message, per topic, per conversation, per session,
//! or globally. The manager owns the registry and drives a pluggable
//! backend; the service module wraps both in a single runtime task that
//! also turns daemon callbacks into host events.

pub mod actions;
pub mod activation;
pub mod config;
pub mod manager;
pub mod service;

#[cfg(test)]
pub(crate) mod testutil;

pub use actions::UserAction;
pub use chime_registry::{ContextId, MsgId, NotificationId};
pub use config::NotifierConfig;
pub use manager::{DisplayOptions, Manager, ShowRequest};
pub use service::{Command, NotifierEvent, NotifierHandle};
