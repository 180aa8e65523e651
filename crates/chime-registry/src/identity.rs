//! Value types addressing conversations and the notifications shown for them.

use serde::{Deserialize, Serialize};

use crate::wire::{WireDecodeError, WireValue};

/// Opaque per-conversation message identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MsgId(pub i64);

/// The conversational scope a notification belongs to.
///
/// Field order is load-bearing: the derived ordering is lexicographic over
/// (session, peer, topic), so all contexts of one session, or of one peer
/// within a session, occupy a contiguous range in an ordered map. Zero in
/// `peer_id` or `topic_root_id` doubles as the "unset" sentinel when a key
/// is built at coarser granularity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ContextId {
    pub session_id: u64,
    pub peer_id: u64,
    pub topic_root_id: i32,
}

impl ContextId {
    /// Full-granularity context.
    pub fn new(session_id: u64, peer_id: u64, topic_root_id: i32) -> Self {
        Self {
            session_id,
            peer_id,
            topic_root_id,
        }
    }

    /// Session-only key (peer and topic unset).
    pub fn of_session(session_id: u64) -> Self {
        Self {
            session_id,
            ..Self::default()
        }
    }

    /// Session+peer key (topic unset).
    pub fn of_peer(session_id: u64, peer_id: u64) -> Self {
        Self {
            session_id,
            peer_id,
            ..Self::default()
        }
    }
}

/// A leading subset of [`ContextId`] fields, addressing every context that
/// shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextPrefix {
    /// Everything under one logged-in session.
    Session { session_id: u64 },
    /// Everything under one conversation, whatever the topic.
    Peer { session_id: u64, peer_id: u64 },
    /// Exactly one context.
    Exact(ContextId),
}

impl ContextPrefix {
    /// Whether `context` shares this prefix.
    pub fn matches(&self, context: &ContextId) -> bool {
        match *self {
            Self::Session { session_id } => context.session_id == session_id,
            Self::Peer {
                session_id,
                peer_id,
            } => context.session_id == session_id && context.peer_id == peer_id,
            Self::Exact(exact) => *context == exact,
        }
    }

    /// The smallest context covered by this prefix. The unset fields are
    /// floored to their type minima (topic roots may be negative), so under
    /// the lexicographic ordering every matching context sits at or after
    /// this key, with no non-matching context in between.
    pub fn range_start(&self) -> ContextId {
        match *self {
            Self::Session { session_id } => ContextId {
                session_id,
                peer_id: 0,
                topic_root_id: i32::MIN,
            },
            Self::Peer {
                session_id,
                peer_id,
            } => ContextId {
                session_id,
                peer_id,
                topic_root_id: i32::MIN,
            },
            Self::Exact(exact) => exact,
        }
    }
}

/// Uniquely addresses one tracked notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NotificationId {
    pub context: ContextId,
    pub msg_id: MsgId,
}

impl NotificationId {
    pub fn new(context: ContextId, msg_id: MsgId) -> Self {
        Self { context, msg_id }
    }

    /// Serialized form attached to notification actions.
    ///
    /// The wire tag set has no 32-bit member, so the topic root travels
    /// widened to a signed 64-bit scalar.
    pub fn to_wire(&self) -> Vec<WireValue> {
        vec![
            WireValue::Unsigned(self.context.session_id),
            WireValue::Unsigned(self.context.peer_id),
            WireValue::Signed(i64::from(self.context.topic_root_id)),
            WireValue::Signed(self.msg_id.0),
        ]
    }

    /// Reassembles an identity from the wire form produced by `to_wire`.
    pub fn from_wire(values: &[WireValue]) -> Result<Self, WireDecodeError> {
        if values.len() != 4 {
            return Err(WireDecodeError::UnexpectedLength {
                expected: 4,
                found: values.len(),
            });
        }
        let session_id = unsigned_at(values, 0)?;
        let peer_id = unsigned_at(values, 1)?;
        let topic_wide = signed_at(values, 2)?;
        let msg_id = signed_at(values, 3)?;
        let topic_root_id =
            i32::try_from(topic_wide).map_err(|_| WireDecodeError::OutOfRange { index: 2 })?;
        Ok(Self {
            context: ContextId::new(session_id, peer_id, topic_root_id),
            msg_id: MsgId(msg_id),
        })
    }
}

fn unsigned_at(values: &[WireValue], index: usize) -> Result<u64, WireDecodeError> {
    match values[index] {
        WireValue::Unsigned(value) => Ok(value),
        _ => Err(WireDecodeError::UnexpectedTag { index }),
    }
}

fn signed_at(values: &[WireValue], index: usize) -> Result<i64, WireDecodeError> {
    match values[index] {
        WireValue::Signed(value) => Ok(value),
        _ => Err(WireDecodeError::UnexpectedTag { index }),
    }
}
