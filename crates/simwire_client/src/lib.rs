//! # SIMWIRE Client - The Control Link
//!
//! Synchronous UDP client for driving a flight-simulator host.
//!
//! ## Architecture
//!
//! This crate implements the complete client stack for SIMWIRE:
//!
//! - **Transport**: one blocking UDP socket, one peer, one frame per
//!   datagram
//! - **Correlator**: the send-once, poll-up-to-forty-times read exchange
//! - **Client**: the facade every caller talks to
//!
//! ## Failure Model
//!
//! ```text
//! CLIENT                              HOST
//!   |                                   |
//!   |--- GETD: "these names" ---------->|
//!   |                                   |
//!   |<-- reply ------- decodes -------- |  Ok(values)
//!   |<-- reply ------- malformed ------ |  Err(Protocol), never retried
//!   |    (silence through 40 polls)     |  Err(NoResponse), retry later
//! ```
//!
//! A silent host and a lying host are different failures. Silence may
//! pass; a malformed reply never does.
//!
//! ## Example
//!
//! ```rust,no_run
//! use simwire_client::SimClient;
//!
//! let mut client = SimClient::connect()?;
//! client.pause(true)?;
//! let gear = client.read_dataref("sim/cockpit/switches/gear_handle_status")?;
//! println!("gear handle: {gear:?}");
//! # Ok::<(), simwire_client::ClientError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod client;
pub mod correlator;
pub mod error;
pub mod transport;

// Re-exports for convenience
pub use client::{
    ClientConfig, SimClient, DEFAULT_BIND_PORT, DEFAULT_PEER, DEFAULT_PEER_PORT,
    DEFAULT_READ_TIMEOUT,
};
pub use correlator::MAX_POLL_ATTEMPTS;
pub use error::{ClientError, ClientResult};
pub use transport::{LinkStats, Transport, UdpLink};

// The codec crate, for callers that build payloads by hand.
pub use simwire_protocol as protocol;
pub use simwire_protocol::SENTINEL_UNCHANGED;
