//! Error types for the decode and encode paths.
//!
//! Three decode failure kinds only: a structural problem with the capture
//! (wrong symbol count for any interpretation of this protocol), a timing
//! mismatch (this protocol does not match this signal, try the next one),
//! and a contextless repeat frame. Checksum failures are never errors —
//! they are recorded on the decoded code as [`crate::code::CodeFlags::PARITY_FAILED`]
//! because many field variants of a protocol disagree on the checksum
//! formula and a partially validated code is still actionable.

use thiserror::Error;

use crate::code::ProtocolId;

/// Failure to decode a symbol sequence with a particular protocol decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The capture has too few symbols for this protocol. Structural:
    /// retrying with a different tolerance cannot help.
    #[error("too few symbols: got {got}, need at least {need}")]
    TooFewSymbols { got: usize, need: usize },

    /// Durations fall outside tolerance for this protocol. The caller
    /// should try the next decoder in the chain.
    #[error("timing mismatch for this protocol")]
    TimingMismatch,

    /// A valid repeat frame was received but there is no usable
    /// predecessor code to repeat.
    #[error("repeat frame with no valid predecessor")]
    NotSupported,
}

/// Failure to encode a code or an AC state into a symbol sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// No encoder exists (yet) for this protocol.
    #[error("encoder not implemented for {0}")]
    NotImplemented(ProtocolId),

    /// The protocol can be decoded but carries no timing constants to
    /// regenerate a frame from (e.g. a bare `Unknown` code).
    #[error("{0} codes cannot be re-encoded")]
    NotEncodable(ProtocolId),

    /// A state field is outside the range the protocol can express.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}
