//! In-memory registry of live desktop notifications, keyed by conversation.

pub mod identity;
pub mod wire;

use std::collections::BTreeMap;

pub use identity::{ContextId, ContextPrefix, MsgId, NotificationId};
pub use wire::{WireDecodeError, WireValue};

/// Ordered two-level registry mapping `ContextId → MsgId → handle`.
///
/// Holds one handle per `(context, msg)` pair and supports bulk removal by
/// context prefix as a single contiguous range walk. Inner maps are pruned
/// the moment they empty, so a context key is present exactly while at least
/// one of its notifications is tracked. Generic over the handle type; the
/// production handle is the notification service's opaque token.
#[derive(Debug)]
pub struct NotificationRegistry<H> {
    contexts: BTreeMap<ContextId, BTreeMap<MsgId, H>>,
}

impl<H> NotificationRegistry<H> {
    pub fn new() -> Self {
        Self {
            contexts: BTreeMap::new(),
        }
    }

    /// Records `handle` for `(context, msg_id)`, returning the handle it
    /// displaced. The caller is responsible for withdrawing the displaced
    /// handle from the notification service.
    pub fn upsert(&mut self, context: ContextId, msg_id: MsgId, handle: H) -> Option<H> {
        self.contexts.entry(context).or_default().insert(msg_id, handle)
    }

    /// Removes a single entry, pruning the context once its last entry goes.
    /// Absent entries are a silent `None`.
    pub fn remove(&mut self, context: ContextId, msg_id: MsgId) -> Option<H> {
        let inner = self.contexts.get_mut(&context)?;
        let removed = inner.remove(&msg_id);
        if inner.is_empty() {
            self.contexts.remove(&context);
        }
        removed
    }

    /// Removes and returns every entry whose context shares `prefix`, in
    /// ascending key order.
    ///
    /// Matching contexts are contiguous from the prefix's range start, so
    /// this is one range walk plus one removal per matched context.
    pub fn drain_prefix(&mut self, prefix: ContextPrefix) -> Vec<(ContextId, MsgId, H)> {
        let matched: Vec<ContextId> = self
            .contexts
            .range(prefix.range_start()..)
            .take_while(|(context, _)| prefix.matches(context))
            .map(|(context, _)| *context)
            .collect();

        let mut drained = Vec::new();
        for context in matched {
            if let Some(inner) = self.contexts.remove(&context) {
                for (msg_id, handle) in inner {
                    drained.push((context, msg_id, handle));
                }
            }
        }
        drained
    }

    /// Empties the registry, returning every entry in ascending key order.
    pub fn drain_all(&mut self) -> Vec<(ContextId, MsgId, H)> {
        let contexts = std::mem::take(&mut self.contexts);
        let mut drained = Vec::new();
        for (context, inner) in contexts {
            for (msg_id, handle) in inner {
                drained.push((context, msg_id, handle));
            }
        }
        drained
    }

    pub fn get(&self, context: ContextId, msg_id: MsgId) -> Option<&H> {
        self.contexts.get(&context)?.get(&msg_id)
    }

    /// Whether any entry is tracked under `context`.
    pub fn contains_context(&self, context: ContextId) -> bool {
        self.contexts.contains_key(&context)
    }

    /// Total tracked entries across all contexts.
    pub fn len(&self) -> usize {
        self.contexts.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl<H> Default for NotificationRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
