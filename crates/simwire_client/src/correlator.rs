//! # Reply Correlator
//!
//! The wire has no request IDs and no sessions, so "did my question get
//! answered" reduces to "did any datagram arrive while I was looking".
//! This module owns that waiting game with three hard rules:
//!
//! - the request goes out exactly once, never resent
//! - the link is polled at most [`MAX_POLL_ATTEMPTS`] times, and a poll
//!   that times out only spends budget
//! - the first datagram that arrives is the answer; if it does not
//!   decode, the exchange is dead right there

use simwire_protocol::{messages, Frame};

use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

/// Receive polls allowed per read exchange.
///
/// With the default 100 ms receive timeout this bounds a read at four
/// seconds of wall-clock silence before [`ClientError::NoResponse`].
pub const MAX_POLL_ATTEMPTS: u32 = 40;

/// Runs one dataref read exchange over `link`.
///
/// Sends `frame` once, then polls for a reply. `expected` is the number
/// of names the request carried; a reply declaring any other group count
/// is a wire violation, not a near miss.
///
/// # Errors
///
/// - [`ClientError::Argument`] or [`ClientError::Transport`] if the
///   request cannot be sent
/// - [`ClientError::Protocol`] if a datagram arrives but is not a
///   well-formed reply to this request
/// - [`ClientError::NoResponse`] if the poll budget runs out
pub fn exchange<T: Transport>(
    link: &mut T,
    frame: &mut Frame,
    expected: usize,
) -> ClientResult<Vec<Vec<f32>>> {
    link.send_frame(frame.as_bytes_mut())?;

    for attempt in 1..=MAX_POLL_ATTEMPTS {
        match link.recv_once()? {
            Some(data) => {
                tracing::debug!("Reply candidate on poll {}: {} bytes", attempt, data.len());
                let groups = messages::decode_dataref_reply(&data, expected)?;
                return Ok(groups);
            }
            None => {
                tracing::trace!("Poll {}/{} timed out", attempt, MAX_POLL_ATTEMPTS);
            }
        }
    }

    tracing::warn!("Host silent for {} polls", MAX_POLL_ATTEMPTS);
    Err(ClientError::NoResponse {
        attempts: MAX_POLL_ATTEMPTS,
    })
}
