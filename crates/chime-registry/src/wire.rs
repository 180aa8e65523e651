//! Tagged scalar values carried through notification action targets.
//!
//! The notification service transports action parameters as a flat sequence
//! of variants. Only three shapes are meaningful on that channel; decoding
//! elsewhere skips anything a peer sends beyond these.

/// One element of a serialized identity payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    /// 64-bit unsigned scalar.
    Unsigned(u64),
    /// 64-bit signed scalar.
    Signed(i64),
    /// Nested sequence of tagged values.
    Sequence(Vec<WireValue>),
}

/// Failure to reassemble an identity from a wire sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireDecodeError {
    #[error("expected {expected} wire values, got {found}")]
    UnexpectedLength { expected: usize, found: usize },

    #[error("unexpected tag at position {index}")]
    UnexpectedTag { index: usize },

    #[error("value at position {index} does not fit the target type")]
    OutOfRange { index: usize },
}
