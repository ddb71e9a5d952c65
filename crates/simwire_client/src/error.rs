//! # Client Errors
//!
//! Every fallible operation on the control link returns [`ClientError`].
//! The variants split along the lines callers actually branch on:
//!
//! - [`ClientError::Argument`]: the request was malformed and nothing
//!   touched the socket. Fix the call site.
//! - [`ClientError::Transport`]: the operating system refused a socket
//!   operation. Genuinely environmental.
//! - [`ClientError::Protocol`]: the host answered with bytes this client
//!   cannot trust. Retrying the same request is pointless.
//! - [`ClientError::NoResponse`]: the receive budget ran out with the
//!   link silent. Retrying later may well succeed.

use std::io;

use simwire_protocol::{DecodeError, EncodeError};
use thiserror::Error;

/// Failure of a control-link operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request failed validation before any bytes were produced.
    #[error("invalid request: {0}")]
    Argument(#[from] EncodeError),

    /// A socket operation failed.
    #[error("transport failure: {0}")]
    Transport(#[from] io::Error),

    /// A reply arrived but violated the wire contract.
    #[error("protocol violation: {0}")]
    Protocol(#[from] DecodeError),

    /// The host never answered within the receive budget.
    #[error("no reply after {attempts} receive attempts")]
    NoResponse {
        /// Number of receive polls performed before giving up.
        attempts: u32,
    },
}

/// Convenience alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_errors_convert_to_argument() {
        let source = EncodeError::EmptyName;
        let err = ClientError::from(source);
        assert!(matches!(err, ClientError::Argument(EncodeError::EmptyName)));
    }

    #[test]
    fn test_decode_errors_convert_to_protocol() {
        let source = DecodeError::ReplyTooShort { len: 3 };
        let err = ClientError::from(source);
        assert!(matches!(
            err,
            ClientError::Protocol(DecodeError::ReplyTooShort { len: 3 })
        ));
    }

    #[test]
    fn test_io_errors_convert_to_transport() {
        let source = io::Error::new(io::ErrorKind::ConnectionReset, "boom");
        let err = ClientError::from(source);
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn test_no_response_names_the_budget() {
        let err = ClientError::NoResponse { attempts: 40 };
        assert_eq!(err.to_string(), "no reply after 40 receive attempts");
    }
}
