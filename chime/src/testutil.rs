//! Test doubles shared across the notifier's unit tests.

use std::sync::{Arc, Mutex};

use portal_client::{Handle, NotificationBackend, ShowPayload};

/// One request observed by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Display(Handle, ShowPayload),
    Withdraw(Handle),
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<Call>,
    minted: u64,
}

/// Backend double that records every request and mints handles "h1", "h2", ...
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingBackend {
    inner: Arc<Mutex<Inner>>,
    offline: bool,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A backend that reports itself unreachable.
    pub(crate) fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Handles withdrawn so far, in submission order.
    pub(crate) fn withdrawn(&self) -> Vec<Handle> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Withdraw(handle) => Some(handle),
                _ => None,
            })
            .collect()
    }

    /// Display requests so far, in submission order.
    pub(crate) fn displayed(&self) -> Vec<(Handle, ShowPayload)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Display(handle, payload) => Some((handle, payload)),
                _ => None,
            })
            .collect()
    }
}

impl NotificationBackend for RecordingBackend {
    fn is_available(&self) -> bool {
        !self.offline
    }

    fn mint_handle(&self) -> Handle {
        let mut inner = self.inner.lock().unwrap();
        inner.minted += 1;
        format!("h{}", inner.minted)
    }

    fn display(&self, handle: Handle, payload: ShowPayload) {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(Call::Display(handle, payload));
    }

    fn withdraw(&self, handle: Handle) {
        self.inner.lock().unwrap().calls.push(Call::Withdraw(handle));
    }
}
