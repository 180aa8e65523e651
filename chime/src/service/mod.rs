//! Single-task notifier runtime.
//!
//! One spawned task owns the [`Manager`] and is the only code to touch it:
//! host commands and daemon callbacks are both marshaled onto that task
//! through channels, which is what lets the manager and its registry stay
//! lock-free. Commands never block the caller; they are enqueued with
//! `try_send` and dropped with a warning when the queue is full.

use chime_registry::{ContextId, NotificationId};
use portal_client::{ActionEvent, NotificationBackend};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::actions::{self, UserAction};
use crate::activation::ActivationEnv;
use crate::config::NotifierConfig;
use crate::manager::{Manager, ShowRequest};


/// One request to the notifier task. Mirrors the manager façade.
#[derive(Debug, Clone)]
pub enum Command {
    Show(ShowRequest),
    ClearAll,
    ClearFromItem(NotificationId),
    ClearFromTopic(ContextId),
    ClearFromHistory { session_id: u64, peer_id: u64 },
    ClearFromSession { session_id: u64 },
}

/// A user interaction on a live notification, surfaced to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum NotifierEvent {
    /// The notification body was clicked; the host should focus the
    /// conversation. An activation token, when one was forwarded, is already
    /// published to the activation environment while this event is handled.
    Activated(NotificationId),
    /// The mark-as-read button was pressed; the host should mark the item
    /// read with empty reply text.
    MarkAsRead(NotificationId),
}

/// Cheap-to-clone command entry point for the notifier task.
#[derive(Debug, Clone)]
pub struct NotifierHandle {
    commands: mpsc::Sender<Command>,
}

impl NotifierHandle {
    pub fn show(&self, request: ShowRequest) {
        self.send(Command::Show(request));
    }

    pub fn clear_all(&self) {
        self.send(Command::ClearAll);
    }

    pub fn clear_from_item(&self, id: NotificationId) {
        self.send(Command::ClearFromItem(id));
    }

    pub fn clear_from_topic(&self, context: ContextId) {
        self.send(Command::ClearFromTopic(context));
    }

    pub fn clear_from_history(&self, session_id: u64, peer_id: u64) {
        self.send(Command::ClearFromHistory {
            session_id,
            peer_id,
        });
    }

    pub fn clear_from_session(&self, session_id: u64) {
        self.send(Command::ClearFromSession { session_id });
    }

    fn send(&self, command: Command) {
        if let Err(e) = self.commands.try_send(command) {
            warn!("Notifier command dropped: {e}");
        }
    }
}

/// Spawns the notifier task around `manager`.
///
/// `inbound` is the daemon callback stream from the backend's connect call.
/// Returns the command handle, the host-facing event stream, and a token
/// that stops the task; stopping (or dropping the handle and the inbound
/// sender) tears the manager down on the task, withdrawing everything it
/// still tracks.
pub fn start<B, E>(
    manager: Manager<B>,
    inbound: mpsc::Receiver<ActionEvent>,
    activation: E,
    config: &NotifierConfig,
) -> (NotifierHandle, mpsc::Receiver<NotifierEvent>, CancellationToken)
where
    B: NotificationBackend + Send + 'static,
    E: ActivationEnv + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(config.queue_capacity);
    let (event_tx, event_rx) = mpsc::channel(config.queue_capacity);
    let cancel = CancellationToken::new();

    tokio::spawn(run(
        manager,
        command_rx,
        inbound,
        activation,
        event_tx,
        cancel.clone(),
    ));
    info!("Notifier runtime started");

    (
        NotifierHandle {
            commands: command_tx,
        },
        event_rx,
        cancel,
    )
}

async fn run<B, E>(
    mut manager: Manager<B>,
    mut commands: mpsc::Receiver<Command>,
    mut inbound: mpsc::Receiver<ActionEvent>,
    mut activation: E,
    events: mpsc::Sender<NotifierEvent>,
    cancel: CancellationToken,
) where
    B: NotificationBackend,
    E: ActivationEnv,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            command = commands.recv() => match command {
                Some(command) => apply(&mut manager, command),
                None => break,
            },
            event = inbound.recv() => match event {
                Some(event) => {
                    let Some(action) = actions::decode(&event) else {
                        continue;
                    };
                    manager.handle_action(action);
                    forward(&mut activation, &events, action, event.activation_token).await;
                }
                None => break,
            },
        }
    }
    info!("Notifier runtime stopped");
    // The manager drops here, on the task, withdrawing what remains.
}

fn apply<B: NotificationBackend>(manager: &mut Manager<B>, command: Command) {
    match command {
        Command::Show(request) => manager.show(request),
        Command::ClearAll => manager.clear_all(),
        Command::ClearFromItem(id) => manager.clear_from_item(id),
        Command::ClearFromTopic(context) => manager.clear_from_topic(context),
        Command::ClearFromHistory {
            session_id,
            peer_id,
        } => manager.clear_from_history(session_id, peer_id),
        Command::ClearFromSession { session_id } => manager.clear_from_session(session_id),
    }
}

/// Emits the host event, with the activation token published for the
/// duration of an activation.
async fn forward<E: ActivationEnv>(
    activation: &mut E,
    events: &mpsc::Sender<NotifierEvent>,
    action: UserAction,
    token: Option<String>,
) {
    match action {
        UserAction::Activate(id) => {
            if let Some(token) = &token {
                activation.put_token(token);
            }
            emit(events, NotifierEvent::Activated(id)).await;
            if token.is_some() {
                activation.clear_token();
            }
        }
        UserAction::MarkAsRead(id) => emit(events, NotifierEvent::MarkAsRead(id)).await,
    }
}

async fn emit(events: &mpsc::Sender<NotifierEvent>, event: NotifierEvent) {
    if events.send(event).await.is_err() {
        debug!("Notifier event receiver gone");
    }
}
