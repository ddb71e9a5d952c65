//! # Codec Error Types
//!
//! Two families, matching the two directions of the codec:
//!
//! - [`EncodeError`]: the caller handed us something the wire cannot carry.
//!   Always raised before any I/O could happen; retrying without fixing the
//!   input is pointless.
//! - [`DecodeError`]: the host answered with something structurally wrong.
//!   Fatal by contract; a malformed reply means a protocol or version
//!   mismatch that retrying cannot repair.

use thiserror::Error;

use crate::{MAX_FRAME_LEN, MIN_FRAME_LEN};

/// Errors raised while building a frame from caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A dataref name was empty.
    #[error("dataref name is empty")]
    EmptyName,

    /// A dataref name does not fit its one-byte length prefix.
    #[error("dataref name is {len} bytes encoded, limit is 255")]
    NameTooLong {
        /// Encoded UTF-8 length of the offending name.
        len: usize,
    },

    /// A dataref read was requested with no names.
    #[error("dataref batch is empty")]
    EmptyBatch,

    /// A dataref read batch does not fit its one-byte count prefix.
    #[error("dataref batch has {count} names, limit is 255")]
    BatchTooLarge {
        /// Number of names supplied.
        count: usize,
    },

    /// A dataref write carried no values.
    #[error("dataref write carries no values")]
    EmptyValues,

    /// A dataref write does not fit its one-byte value-count prefix.
    #[error("dataref write carries {count} values, limit is 255")]
    TooManyValues {
        /// Number of values supplied.
        count: usize,
    },

    /// A vector command was given more fields than its layout holds.
    #[error("vector has {len} fields, layout holds at most {max}")]
    VectorTooLong {
        /// Number of fields supplied.
        len: usize,
        /// Arity of the layout.
        max: usize,
    },

    /// A state row had the wrong arity. Rows are exact, not padded.
    #[error("state row has {len} fields, rows are exactly {expected}")]
    BadRowArity {
        /// Number of fields supplied.
        len: usize,
        /// Required row arity.
        expected: usize,
    },

    /// A state write carried no rows.
    #[error("state write carries no rows")]
    EmptyRows,

    /// Control surfaces were addressed to an aircraft the host cannot steer.
    #[error("aircraft {aircraft} is not controllable, only the player aircraft (0) is")]
    UnsupportedAircraft {
        /// The rejected aircraft index.
        aircraft: u8,
    },

    /// The all-ones port is reserved and can be neither bound nor addressed.
    #[error("port {port} is reserved, valid ports are 0..=65534")]
    PortReserved {
        /// The rejected port.
        port: u16,
    },

    /// The assembled frame falls outside the one-datagram bound.
    #[error("frame is {len} bytes, valid frames are {MIN_FRAME_LEN}..={MAX_FRAME_LEN}")]
    FrameSizeOutOfBounds {
        /// Total frame length that was attempted.
        len: usize,
    },
}

/// Errors raised while parsing a host reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The reply cannot even hold a header and a group count.
    #[error("reply is {len} bytes, shorter than the 6 byte minimum")]
    ReplyTooShort {
        /// Received datagram length.
        len: usize,
    },

    /// The reply answers a different number of names than we asked for.
    #[error("reply carries {got} value groups, request named {expected}")]
    GroupCountMismatch {
        /// Group count declared by the reply.
        got: usize,
        /// Group count the request named.
        expected: usize,
    },

    /// The reply ended in the middle of a value group.
    #[error("reply truncated inside value group {group}")]
    TruncatedGroup {
        /// Zero-based index of the group that could not be read.
        group: usize,
    },
}

/// Result type for frame encoding.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for reply decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Validates a port for binding or addressing.
///
/// The protocol treats the all-ones port as reserved; everything below it,
/// including 0 (bind to an ephemeral port), is accepted.
///
/// # Errors
///
/// Returns [`EncodeError::PortReserved`] for port 65535.
pub const fn validate_port(port: u16) -> EncodeResult<()> {
    if port == u16::MAX {
        Err(EncodeError::PortReserved { port })
    } else {
        Ok(())
    }
}
