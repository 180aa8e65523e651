//! Notification lifecycle façade: show, replace, and the clearing family.
//!
//! The manager pairs every gateway call with a registry mutation, so the
//! registry always reflects what the notification service believes is on
//! screen. Clearing operations are idempotent; clearing something that is
//! not tracked does nothing and calls nothing.

use chime_registry::{ContextId, ContextPrefix, MsgId, NotificationId, NotificationRegistry};
use portal_client::{ActionButton, Handle, IconRef, NotificationBackend, Priority, ShowPayload};
use tracing::debug;

use crate::actions::{ACTION_ACTIVATE, ACTION_MARK_AS_READ, UserAction};
use crate::config::NotifierConfig;

/// Content classification forwarded with every message notification.
const CATEGORY_IM_RECEIVED: &str = "im.received";

/// Per-show presentation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Suppress the mark-as-read button.
    pub hide_mark_as_read: bool,
    /// Suppress sender identity: generic title and themed icon instead of
    /// sender name and userpic.
    pub hide_name_and_photo: bool,
}

/// Everything needed to display one message notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowRequest {
    pub context: ContextId,
    pub msg_id: MsgId,
    /// Conversation title (chat or channel name).
    pub title: String,
    /// Sender name, when distinct from the conversation title.
    pub subtitle: String,
    pub body: String,
    /// Prerendered sender userpic, if the caller has one.
    pub userpic: Option<Vec<u8>>,
    pub options: DisplayOptions,
}

/// Owns the registry of live notifications and drives a backend.
pub struct Manager<B: NotificationBackend> {
    registry: NotificationRegistry<Handle>,
    backend: B,
    config: NotifierConfig,
}

impl<B: NotificationBackend> Manager<B> {
    pub fn new(backend: B, config: NotifierConfig) -> Self {
        Self {
            registry: NotificationRegistry::new(),
            backend,
            config,
        }
    }

    /// Displays a notification, replacing any notification already shown for
    /// the same `(context, msg_id)`.
    ///
    /// The withdraw of a replaced handle is submitted before the new display,
    /// so the service never holds two live notifications for one identity.
    /// With no backend available this is a silent no-op and nothing is
    /// tracked.
    pub fn show(&mut self, request: ShowRequest) {
        if !self.backend.is_available() {
            debug!("Notification backend unavailable; dropping show request");
            return;
        }

        if let Some(old) = self.registry.remove(request.context, request.msg_id) {
            self.backend.withdraw(old);
        }

        let handle = self.backend.mint_handle();
        let payload = self.build_payload(&request);
        self.backend.display(handle.clone(), payload);
        self.registry.upsert(request.context, request.msg_id, handle);
    }

    /// Withdraws every tracked notification.
    pub fn clear_all(&mut self) {
        for (_, _, handle) in self.registry.drain_all() {
            self.backend.withdraw(handle);
        }
    }

    /// Withdraws one notification, if it is tracked.
    pub fn clear_from_item(&mut self, id: NotificationId) {
        if let Some(handle) = self.registry.remove(id.context, id.msg_id) {
            self.backend.withdraw(handle);
        }
    }

    /// Withdraws everything shown for the conversation hosting `context`.
    ///
    /// Topic granularity is deliberately discarded: clearing a topic clears
    /// the whole hosting conversation, the coarser key the clearing callers
    /// actually hold.
    pub fn clear_from_topic(&mut self, context: ContextId) {
        self.clear_from_history(context.session_id, context.peer_id);
    }

    /// Withdraws everything shown for one conversation, all topics included.
    pub fn clear_from_history(&mut self, session_id: u64, peer_id: u64) {
        self.drain_and_withdraw(ContextPrefix::Peer {
            session_id,
            peer_id,
        });
    }

    /// Withdraws everything shown for one logged-in session.
    pub fn clear_from_session(&mut self, session_id: u64) {
        self.drain_and_withdraw(ContextPrefix::Session { session_id });
    }

    /// Reacts to a user gesture on a notification. The service dismisses a
    /// notification when an action on it is invoked, so only the record is
    /// dropped; no withdraw goes out.
    pub fn handle_action(&mut self, action: UserAction) {
        let id = action.notification_id();
        self.registry.remove(id.context, id.msg_id);
    }

    /// Number of notifications currently tracked.
    pub fn tracked(&self) -> usize {
        self.registry.len()
    }

    pub fn is_tracked(&self, id: NotificationId) -> bool {
        self.registry.get(id.context, id.msg_id).is_some()
    }

    fn drain_and_withdraw(&mut self, prefix: ContextPrefix) {
        for (_, _, handle) in self.registry.drain_prefix(prefix) {
            self.backend.withdraw(handle);
        }
    }

    fn build_payload(&self, request: &ShowRequest) -> ShowPayload {
        let target = NotificationId::new(request.context, request.msg_id).to_wire();

        let (title, icon) = if request.options.hide_name_and_photo {
            (
                self.config.app_name.clone(),
                IconRef::Themed(self.config.icon.clone()),
            )
        } else {
            let title = if request.subtitle.is_empty() {
                request.title.clone()
            } else {
                format!("{} ({})", request.subtitle, request.title)
            };
            let icon = match &request.userpic {
                Some(bytes) => IconRef::Bytes(bytes.clone()),
                None => IconRef::Themed(self.config.icon.clone()),
            };
            (title, icon)
        };

        let mut buttons = Vec::new();
        if !request.options.hide_mark_as_read {
            buttons.push(ActionButton {
                label: self.config.mark_read_label.clone(),
                action: ACTION_MARK_AS_READ.into(),
                target: target.clone(),
            });
        }

        ShowPayload {
            title,
            body: request.body.clone(),
            icon,
            priority: Priority::High,
            category: Some(CATEGORY_IM_RECEIVED.into()),
            default_action: ACTION_ACTIVATE.into(),
            default_action_target: target,
            buttons,
        }
    }
}

impl<B: NotificationBackend> Drop for Manager<B> {
    /// Teardown withdraws everything still tracked.
    fn drop(&mut self) {
        self.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Call, RecordingBackend};

    fn ctx(session: u64, peer: u64, topic: i32) -> ContextId {
        ContextId::new(session, peer, topic)
    }

    fn request(context: ContextId, msg: i64) -> ShowRequest {
        ShowRequest {
            context,
            msg_id: MsgId(msg),
            title: "Rustaceans".into(),
            subtitle: "Alice".into(),
            body: "lifetimes are fine, actually".into(),
            userpic: None,
            options: DisplayOptions::default(),
        }
    }

    fn manager() -> (Manager<RecordingBackend>, RecordingBackend) {
        let backend = RecordingBackend::new();
        (
            Manager::new(backend.clone(), NotifierConfig::default()),
            backend,
        )
    }

    #[test]
    fn show_displays_and_tracks() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));

        assert_eq!(backend.displayed().len(), 1);
        assert!(backend.withdrawn().is_empty());
        assert_eq!(manager.tracked(), 1);
        assert!(manager.is_tracked(NotificationId::new(ctx(1, 100, 0), MsgId(5))));
    }

    #[test]
    fn offline_backend_tracks_nothing() {
        let backend = RecordingBackend::offline();
        let mut manager = Manager::new(backend.clone(), NotifierConfig::default());
        manager.show(request(ctx(1, 100, 0), 5));

        assert!(backend.calls().is_empty());
        assert_eq!(manager.tracked(), 0);
    }

    #[test]
    fn reshow_withdraws_the_old_handle_before_the_new_display() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));
        manager.show(request(ctx(1, 100, 0), 5));

        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(&calls[0], Call::Display(h, _) if h == "h1"));
        assert!(matches!(&calls[1], Call::Withdraw(h) if h == "h1"));
        assert!(matches!(&calls[2], Call::Display(h, _) if h == "h2"));
        assert_eq!(manager.tracked(), 1);
    }

    #[test]
    fn reshow_of_different_messages_keeps_both() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));
        manager.show(request(ctx(1, 100, 0), 6));

        assert!(backend.withdrawn().is_empty());
        assert_eq!(manager.tracked(), 2);
    }

    #[test]
    fn clear_all_withdraws_everything() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));
        manager.show(request(ctx(2, 200, 0), 6));

        manager.clear_all();
        assert_eq!(backend.withdrawn(), vec!["h1".to_string(), "h2".to_string()]);
        assert_eq!(manager.tracked(), 0);
    }

    #[test]
    fn clear_from_item_targets_one_notification() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));
        manager.show(request(ctx(1, 100, 0), 6));

        manager.clear_from_item(NotificationId::new(ctx(1, 100, 0), MsgId(5)));
        assert_eq!(backend.withdrawn(), vec!["h1".to_string()]);
        assert_eq!(manager.tracked(), 1);
    }

    #[test]
    fn clearing_absent_entries_calls_nothing() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));
        let before = backend.calls();

        manager.clear_from_item(NotificationId::new(ctx(1, 100, 0), MsgId(99)));
        manager.clear_from_history(1, 999);
        manager.clear_from_session(9);

        assert_eq!(backend.calls(), before);
        assert_eq!(manager.tracked(), 1);
    }

    #[test]
    fn clear_from_history_spans_topics_and_spares_other_peers() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));
        manager.show(request(ctx(1, 100, 7), 6));
        manager.show(request(ctx(1, 101, 0), 7));

        manager.clear_from_history(1, 100);
        assert_eq!(backend.withdrawn(), vec!["h1".to_string(), "h2".to_string()]);
        assert_eq!(manager.tracked(), 1);
        assert!(manager.is_tracked(NotificationId::new(ctx(1, 101, 0), MsgId(7))));
    }

    #[test]
    fn clear_from_history_includes_negative_topics() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, -3), 5));
        manager.show(request(ctx(1, 100, 7), 6));

        manager.clear_from_history(1, 100);
        assert_eq!(backend.withdrawn().len(), 2);
        assert_eq!(manager.tracked(), 0);
    }

    #[test]
    fn clear_from_topic_clears_the_whole_hosting_conversation() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 3), 5));
        manager.show(request(ctx(1, 100, 7), 6));

        manager.clear_from_topic(ctx(1, 100, 3));
        assert_eq!(backend.withdrawn().len(), 2);
        assert_eq!(manager.tracked(), 0);
    }

    #[test]
    fn clear_from_session_spares_other_sessions() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));
        manager.show(request(ctx(1, 200, 0), 6));
        manager.show(request(ctx(2, 100, 0), 7));

        manager.clear_from_session(1);
        assert_eq!(backend.withdrawn(), vec!["h1".to_string(), "h2".to_string()]);
        assert_eq!(manager.tracked(), 1);
        assert!(manager.is_tracked(NotificationId::new(ctx(2, 100, 0), MsgId(7))));
    }

    #[test]
    fn drop_withdraws_everything_still_tracked() {
        let backend = RecordingBackend::new();
        {
            let mut manager = Manager::new(backend.clone(), NotifierConfig::default());
            manager.show(request(ctx(1, 100, 0), 5));
            manager.show(request(ctx(2, 200, 0), 6));
        }
        assert_eq!(backend.withdrawn(), vec!["h1".to_string(), "h2".to_string()]);
    }

    #[test]
    fn drop_after_clear_all_withdraws_nothing_extra() {
        let backend = RecordingBackend::new();
        {
            let mut manager = Manager::new(backend.clone(), NotifierConfig::default());
            manager.show(request(ctx(1, 100, 0), 5));
            manager.clear_all();
        }
        assert_eq!(backend.withdrawn(), vec!["h1".to_string()]);
    }

    #[test]
    fn action_drops_the_record_without_a_withdraw() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));
        let id = NotificationId::new(ctx(1, 100, 0), MsgId(5));

        manager.handle_action(UserAction::MarkAsRead(id));
        assert!(backend.withdrawn().is_empty());
        assert_eq!(manager.tracked(), 0);

        // A later show of the same id is a plain display, not a replace.
        manager.show(request(ctx(1, 100, 0), 5));
        assert!(backend.withdrawn().is_empty());
        assert_eq!(backend.displayed().len(), 2);
    }

    #[test]
    fn payload_composes_sender_and_conversation_titles() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));

        let (_, payload) = backend.displayed().remove(0);
        assert_eq!(payload.title, "Alice (Rustaceans)");
        assert_eq!(payload.body, "lifetimes are fine, actually");
        assert_eq!(payload.priority, Priority::High);
        assert_eq!(payload.category.as_deref(), Some(CATEGORY_IM_RECEIVED));
        assert_eq!(payload.default_action, ACTION_ACTIVATE);
    }

    #[test]
    fn payload_title_falls_back_without_a_subtitle() {
        let (mut manager, backend) = manager();
        let mut req = request(ctx(1, 100, 0), 5);
        req.subtitle.clear();
        manager.show(req);

        let (_, payload) = backend.displayed().remove(0);
        assert_eq!(payload.title, "Rustaceans");
    }

    #[test]
    fn payload_uses_the_userpic_when_identity_is_shown() {
        let (mut manager, backend) = manager();
        let mut req = request(ctx(1, 100, 0), 5);
        req.userpic = Some(vec![0x89, 0x50, 0x4e, 0x47]);
        manager.show(req);

        let (_, payload) = backend.displayed().remove(0);
        assert_eq!(payload.icon, IconRef::Bytes(vec![0x89, 0x50, 0x4e, 0x47]));
    }

    #[test]
    fn hide_name_and_photo_masks_title_and_icon() {
        let (mut manager, backend) = manager();
        let mut req = request(ctx(1, 100, 0), 5);
        req.userpic = Some(vec![1, 2, 3]);
        req.options.hide_name_and_photo = true;
        manager.show(req);

        let config = NotifierConfig::default();
        let (_, payload) = backend.displayed().remove(0);
        assert_eq!(payload.title, config.app_name);
        assert_eq!(payload.icon, IconRef::Themed(config.icon));
    }

    #[test]
    fn mark_as_read_button_carries_the_identity() {
        let (mut manager, backend) = manager();
        manager.show(request(ctx(1, 100, 0), 5));

        let id = NotificationId::new(ctx(1, 100, 0), MsgId(5));
        let (_, payload) = backend.displayed().remove(0);
        assert_eq!(payload.default_action_target, id.to_wire());
        assert_eq!(payload.buttons.len(), 1);
        assert_eq!(payload.buttons[0].action, ACTION_MARK_AS_READ);
        assert_eq!(payload.buttons[0].target, id.to_wire());
    }

    #[test]
    fn hide_mark_as_read_drops_the_button() {
        let (mut manager, backend) = manager();
        let mut req = request(ctx(1, 100, 0), 5);
        req.options.hide_mark_as_read = true;
        manager.show(req);

        let (_, payload) = backend.displayed().remove(0);
        assert!(payload.buttons.is_empty());
    }
}
