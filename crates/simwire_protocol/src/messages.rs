//! # Messages
//!
//! One encoder per command and one decoder for the only reply in the
//! protocol. Argument validation lives here, so a bad name or a malformed
//! row is rejected before a caller could ever reach a socket.
//!
//! All encoders return a sealed [`Frame`]; the write commands are
//! fire-and-forget and only `GETD` produces something to decode.

use crate::command::Command;
use crate::error::{validate_port, DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::frame::{Frame, FrameReader, FrameWriter};
use crate::layout::{encode_vector, CONTROL_FIELDS, DATA_ROW_FIELDS, POSITION_FIELDS};
use crate::FRAME_HEADER_LEN;

/// Aircraft index of the local player.
pub const PLAYER_AIRCRAFT: u8 = 0;

/// Shortest reply that can carry a group count: the header plus one byte.
pub const MIN_REPLY_LEN: usize = FRAME_HEADER_LEN + 1;

/// Longest dataref name the one-byte length prefix can carry.
pub const MAX_NAME_LEN: usize = 255;

/// Largest read batch the one-byte count prefix can carry.
pub const MAX_BATCH_LEN: usize = 255;

/// Most values one dataref write can carry.
pub const MAX_VALUES_PER_WRITE: usize = 255;

/// Builds a `SIMU` frame: a single boolean byte, 1 to pause, 0 to resume.
///
/// # Errors
///
/// None today; the signature stays fallible so every command encodes
/// through the same path.
pub fn encode_pause(pause: bool) -> EncodeResult<Frame> {
    let mut writer = FrameWriter::new(Command::Pause);
    writer.write_u8(u8::from(pause));
    writer.finish()
}

/// Builds a `GETD` request: a count byte, then length-prefixed UTF-8 names
/// in input order.
///
/// # Errors
///
/// [`EncodeError::EmptyBatch`], [`EncodeError::BatchTooLarge`],
/// [`EncodeError::EmptyName`], [`EncodeError::NameTooLong`], or
/// [`EncodeError::FrameSizeOutOfBounds`] when the names collectively
/// outgrow one datagram.
pub fn encode_get_datarefs(names: &[&str]) -> EncodeResult<Frame> {
    if names.is_empty() {
        return Err(EncodeError::EmptyBatch);
    }
    if names.len() > MAX_BATCH_LEN {
        return Err(EncodeError::BatchTooLarge { count: names.len() });
    }
    for name in names {
        validate_name(name)?;
    }

    let mut writer = FrameWriter::new(Command::GetDatarefs);
    writer.write_u8(names.len() as u8);
    for name in names {
        writer.write_u8(name.len() as u8);
        writer.write_bytes(name.as_bytes());
    }
    writer.finish()
}

/// Builds a `DREF` frame: length-prefixed name, count byte, then the values
/// as little-endian floats.
///
/// # Errors
///
/// [`EncodeError::EmptyName`], [`EncodeError::NameTooLong`],
/// [`EncodeError::EmptyValues`], [`EncodeError::TooManyValues`], or
/// [`EncodeError::FrameSizeOutOfBounds`].
pub fn encode_set_dataref(name: &str, values: &[f32]) -> EncodeResult<Frame> {
    validate_name(name)?;
    if values.is_empty() {
        return Err(EncodeError::EmptyValues);
    }
    if values.len() > MAX_VALUES_PER_WRITE {
        return Err(EncodeError::TooManyValues {
            count: values.len(),
        });
    }

    let mut writer = FrameWriter::new(Command::SetDataref);
    writer.write_u8(name.len() as u8);
    writer.write_bytes(name.as_bytes());
    writer.write_u8(values.len() as u8);
    for value in values {
        writer.write_f32(*value);
    }
    writer.finish()
}

/// Builds a `CTRL` frame: the 22-byte control block of
/// [`CONTROL_FIELDS`](crate::layout::CONTROL_FIELDS) plus its pad byte.
///
/// The wire reserves no aircraft field here; the index is taken only to
/// enforce the player-aircraft restriction explicitly at the call site.
///
/// # Errors
///
/// [`EncodeError::UnsupportedAircraft`] for any `aircraft != 0`, or
/// [`EncodeError::VectorTooLong`] for more than six axes.
pub fn encode_controls(aircraft: u8, axes: &[f32]) -> EncodeResult<Frame> {
    if aircraft != PLAYER_AIRCRAFT {
        return Err(EncodeError::UnsupportedAircraft { aircraft });
    }
    let mut writer = FrameWriter::new(Command::SetControls);
    encode_vector(&mut writer, &CONTROL_FIELDS, axes)?;
    writer.write_u8(0); // the host reads a 22-byte block; the last byte is pad
    writer.finish()
}

/// Builds a `POSI` frame: one aircraft byte, then the seven-float position
/// block, sentinel-padded.
///
/// # Errors
///
/// [`EncodeError::VectorTooLong`] for more than seven fields.
pub fn encode_position(aircraft: u8, fields: &[f32]) -> EncodeResult<Frame> {
    let mut writer = FrameWriter::new(Command::SetPosition);
    writer.write_u8(aircraft);
    encode_vector(&mut writer, &POSITION_FIELDS, fields)?;
    writer.finish()
}

/// Builds a `DATA` frame: consecutive 36-byte rows, selector first.
///
/// Rows are exact: nine fields, no sentinel padding. Six rows fill a frame;
/// a seventh overruns the one-datagram bound and is rejected there.
///
/// # Errors
///
/// [`EncodeError::EmptyRows`], [`EncodeError::BadRowArity`], or
/// [`EncodeError::FrameSizeOutOfBounds`].
pub fn encode_data<R: AsRef<[f32]>>(rows: &[R]) -> EncodeResult<Frame> {
    if rows.is_empty() {
        return Err(EncodeError::EmptyRows);
    }
    let mut writer = FrameWriter::new(Command::SetData);
    for row in rows {
        let row = row.as_ref();
        if row.len() != DATA_ROW_FIELDS.len() {
            return Err(EncodeError::BadRowArity {
                len: row.len(),
                expected: DATA_ROW_FIELDS.len(),
            });
        }
        encode_vector(&mut writer, &DATA_ROW_FIELDS, row)?;
    }
    writer.finish()
}

/// Builds a `CONN` frame: the new receive port, little-endian.
///
/// # Errors
///
/// [`EncodeError::PortReserved`] for port 65535.
pub fn encode_connection(port: u16) -> EncodeResult<Frame> {
    validate_port(port)?;
    let mut writer = FrameWriter::new(Command::SetConnection);
    writer.write_u16(port);
    writer.finish()
}

/// Parses a dataref reply against the request's name count.
///
/// Reply shape: five header bytes (the tag and length byte are not
/// interpreted beyond the minimum-size check), a group-count byte, then per
/// group one count byte and that many little-endian floats, in request
/// order. Trailing bytes past the last group are ignored.
///
/// # Errors
///
/// [`DecodeError::ReplyTooShort`] under six bytes,
/// [`DecodeError::GroupCountMismatch`] when the count byte disagrees with
/// `expected`, [`DecodeError::TruncatedGroup`] when the data ends inside a
/// group.
pub fn decode_dataref_reply(data: &[u8], expected: usize) -> DecodeResult<Vec<Vec<f32>>> {
    if data.len() < MIN_REPLY_LEN {
        return Err(DecodeError::ReplyTooShort { len: data.len() });
    }
    let got = usize::from(data[FRAME_HEADER_LEN]);
    if got != expected {
        return Err(DecodeError::GroupCountMismatch { got, expected });
    }

    let mut reader = FrameReader::new(&data[MIN_REPLY_LEN..]);
    let mut groups = Vec::with_capacity(expected);
    for group in 0..expected {
        let count = reader
            .read_u8()
            .ok_or(DecodeError::TruncatedGroup { group })?;
        let mut values = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            values.push(
                reader
                    .read_f32()
                    .ok_or(DecodeError::TruncatedGroup { group })?,
            );
        }
        groups.push(values);
    }
    Ok(groups)
}

fn validate_name(name: &str) -> EncodeResult<()> {
    if name.is_empty() {
        return Err(EncodeError::EmptyName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(EncodeError::NameTooLong { len: name.len() });
    }
    Ok(())
}
