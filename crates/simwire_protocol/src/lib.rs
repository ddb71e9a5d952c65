//! # SIMWIRE Protocol - The Frame Codec
//!
//! Binary frame codec for the flight-simulator control link.
//!
//! ## Architecture
//!
//! This crate owns every byte that crosses the wire:
//!
//! - **Command**: the closed set of seven tags the host understands
//! - **Frame**: bounds-checked cursor writer/reader, little-endian throughout
//! - **Layout**: declarative field tables for the mixed-width vector payloads
//! - **Messages**: one encoder per command, one decoder for dataref replies
//!
//! ## Frame Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Header (5 bytes)                                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Tag (4 ASCII)          │ Length (1, total frame size)        │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Payload (0-250 bytes, command specific)                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Philosophy
//!
//! - One frame, one datagram - a frame is 5..=255 bytes, never fragmented
//! - The length byte is recomputed on send; on receive it is a sanity check
//! - Partial vector updates ride on the -998 sentinel, not on variable layouts
//! - No I/O here, ever - sockets live in `simwire_client`
//!
//! ## Example
//!
//! ```rust
//! use simwire_protocol::messages;
//!
//! let frame = messages::encode_pause(true).unwrap();
//! assert_eq!(frame.as_bytes(), &b"SIMU\x06\x01"[..]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod command;
pub mod error;
pub mod frame;
pub mod layout;
pub mod messages;

// Re-exports for convenience
pub use command::Command;
pub use error::{validate_port, DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use frame::{Frame, FrameReader, FrameWriter};
pub use layout::{FieldEncoding, FieldSpec};

/// Size of the frame header: 4 tag bytes plus the length byte.
pub const FRAME_HEADER_LEN: usize = 5;

/// Smallest legal frame: a bare header with an empty payload.
pub const MIN_FRAME_LEN: usize = FRAME_HEADER_LEN;

/// Largest legal frame. The length field is one byte, so a frame can never
/// declare more than 255 bytes, and the host rejects anything longer.
pub const MAX_FRAME_LEN: usize = 255;

/// Float sentinel meaning "leave this field unchanged".
///
/// Vector commands carry fixed-arity payloads; callers supply a prefix and
/// the encoder fills the rest with this value so the host touches nothing
/// it was not asked to touch.
pub const SENTINEL_UNCHANGED: f32 = -998.0;
