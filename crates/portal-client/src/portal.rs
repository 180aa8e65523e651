//! Proxy plumbing for `org.freedesktop.portal.Notification`.

use futures_util::stream::StreamExt;
use tokio::sync::mpsc;
use zbus::zvariant::OwnedValue;
use zbus::{Connection, dbus_proxy};

use crate::payload::CATEGORY_MIN_VERSION;
use crate::variant::{self, PortalNotification};
use crate::{ActionEvent, Handle, NotificationBackend, PortalError, ShowPayload};

const REQUEST_QUEUE_CAPACITY: usize = 64;
const EVENT_QUEUE_CAPACITY: usize = 64;

#[dbus_proxy(
    interface = "org.freedesktop.portal.Notification",
    default_service = "org.freedesktop.portal.Desktop",
    default_path = "/org/freedesktop/portal/desktop"
)]
trait Notifications {
    async fn add_notification(
        &self,
        id: &str,
        notification: PortalNotification,
    ) -> zbus::Result<()>;

    async fn remove_notification(&self, id: &str) -> zbus::Result<()>;

    #[dbus_proxy(property, name = "version")]
    fn version(&self) -> zbus::Result<u32>;

    #[dbus_proxy(signal)]
    async fn action_invoked(
        &self,
        id: String,
        action: String,
        parameter: Vec<OwnedValue>,
    ) -> zbus::Result<()>;
}

enum Request {
    Add {
        handle: Handle,
        notification: PortalNotification,
    },
    Remove {
        handle: Handle,
    },
}

/// Live connection to the desktop notification portal.
///
/// All outbound calls funnel through one bounded queue and one worker task,
/// so a withdraw enqueued before a display also reaches the portal first.
pub struct PortalClient {
    requests: mpsc::Sender<Request>,
    version: u32,
}

impl PortalClient {
    /// Connects to the session bus and resolves the notification portal.
    ///
    /// Returns the client plus the stream of user interactions on this
    /// application's notifications. Fails when the bus is unreachable or the
    /// portal is not offered; after that, request failures are logged and
    /// swallowed by the worker.
    pub async fn connect() -> Result<(Self, mpsc::Receiver<ActionEvent>), PortalError> {
        let connection = Connection::session().await?;
        let proxy = NotificationsProxy::new(&connection).await?;
        let version = proxy.version().await.map_err(PortalError::NotOffered)?;

        let mut signals = proxy.receive_action_invoked().await?;

        let (request_tx, request_rx) = mpsc::channel(REQUEST_QUEUE_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);

        tokio::spawn(worker_loop(proxy, request_rx));
        tokio::spawn(async move {
            while let Some(signal) = signals.next().await {
                let args = match signal.args() {
                    Ok(args) => args,
                    Err(e) => {
                        tracing::debug!("undecodable ActionInvoked signal: {e}");
                        continue;
                    }
                };
                let event = ActionEvent {
                    handle: args.id().clone(),
                    action: args.action().clone(),
                    target: variant::decode_sequence(args.parameter()),
                    activation_token: None,
                };
                if event_tx.send(event).await.is_err() {
                    return;
                }
            }
        });

        tracing::info!(version, "notification portal connected");
        Ok((
            Self {
                requests: request_tx,
                version,
            },
            event_rx,
        ))
    }

    /// Whether the portal understands the `category` key.
    pub fn supports_category(&self) -> bool {
        self.version >= CATEGORY_MIN_VERSION
    }

    fn send(&self, request: Request) {
        if let Err(e) = self.requests.try_send(request) {
            tracing::warn!("notification request dropped: {e}");
        }
    }
}

impl NotificationBackend for PortalClient {
    fn is_available(&self) -> bool {
        !self.requests.is_closed()
    }

    fn mint_handle(&self) -> Handle {
        zbus::Guid::generate().as_str().to_string()
    }

    fn display(&self, handle: Handle, mut payload: ShowPayload) {
        payload.gate_category(self.version);
        let notification = match variant::notification(&payload) {
            Ok(notification) => notification,
            Err(e) => {
                tracing::warn!("unencodable notification payload: {e}");
                return;
            }
        };
        self.send(Request::Add {
            handle,
            notification,
        });
    }

    fn withdraw(&self, handle: Handle) {
        self.send(Request::Remove { handle });
    }
}

/// Drains the request queue into portal calls. Failures are logged and
/// dropped; the store on the manager side has already moved on.
async fn worker_loop(proxy: NotificationsProxy<'static>, mut requests: mpsc::Receiver<Request>) {
    while let Some(request) = requests.recv().await {
        match request {
            Request::Add {
                handle,
                notification,
            } => {
                if let Err(e) = proxy.add_notification(&handle, notification).await {
                    tracing::warn!(handle = %handle, "display request failed: {e}");
                }
            }
            Request::Remove { handle } => {
                if let Err(e) = proxy.remove_notification(&handle).await {
                    tracing::warn!(handle = %handle, "withdraw request failed: {e}");
                }
            }
        }
    }
    tracing::info!("notification request worker stopped");
}
