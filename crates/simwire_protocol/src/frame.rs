//! # Frame Cursor
//!
//! Bounds-checked writer and reader over the 255-byte frame buffer.
//!
//! ## Design
//!
//! - The writer appends little-endian values into a fixed buffer and counts
//!   every byte it was asked for, even past capacity; [`FrameWriter::finish`]
//!   is the single place the one-datagram bound is enforced, so call sites
//!   stay free of per-write error plumbing.
//! - The reader hands back `Option` per read; `None` means the datagram
//!   ended early, and the caller decides what that is worth.
//! - The length byte is written last, by `finish`, from the real total.
//!   Whatever a caller may think the length is, the buffer knows better.

use crate::command::{Command, TAG_LEN};
use crate::error::{EncodeError, EncodeResult};
use crate::{FRAME_HEADER_LEN, MAX_FRAME_LEN};

/// A complete frame, sized and ready for the wire.
///
/// Produced only by [`FrameWriter::finish`], so holding one is proof the
/// frame satisfies the `5..=255` byte bound with a correct length byte.
/// Two frames are equal when they would put the same bytes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl Frame {
    /// Returns the frame bytes, header first.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Returns the frame bytes mutably.
    ///
    /// The transport uses this to rewrite the length byte immediately
    /// before sending; nothing else should need it.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }

    /// Total frame length in bytes, header included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false; a frame is at least a five-byte header.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Cursor-style frame builder.
///
/// Created with a [`Command`], which stamps the tag and reserves the length
/// byte. Writes never fail individually; a frame that grew past the bound is
/// rejected once, at [`FrameWriter::finish`].
#[derive(Debug)]
pub struct FrameWriter {
    buf: [u8; MAX_FRAME_LEN],
    /// Bytes requested so far. May exceed the buffer; `finish` checks.
    len: usize,
}

impl FrameWriter {
    /// Starts a frame for `command`: tag stamped, length byte reserved.
    #[must_use]
    pub fn new(command: Command) -> Self {
        let mut writer = Self {
            buf: [0; MAX_FRAME_LEN],
            len: 0,
        };
        writer.put(&command.tag());
        writer.write_u8(0); // length placeholder, fixed up by finish
        writer
    }

    /// Appends a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.put(&[value]);
    }

    /// Appends a little-endian u16.
    pub fn write_u16(&mut self, value: u16) {
        self.put(&value.to_le_bytes());
    }

    /// Appends a little-endian i32.
    pub fn write_i32(&mut self, value: i32) {
        self.put(&value.to_le_bytes());
    }

    /// Appends a little-endian IEEE-754 f32.
    pub fn write_f32(&mut self, value: f32) {
        self.put(&value.to_le_bytes());
    }

    /// Appends raw bytes as-is.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }

    /// Bytes written so far, header included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True before the first write; never true after `new` stamps the header.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Seals the frame: enforces the size bound and writes the length byte.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::FrameSizeOutOfBounds`] when the accumulated
    /// writes exceed 255 bytes.
    pub fn finish(mut self) -> EncodeResult<Frame> {
        if self.len > MAX_FRAME_LEN {
            return Err(EncodeError::FrameSizeOutOfBounds { len: self.len });
        }
        self.buf[FRAME_HEADER_LEN - 1] = self.len as u8;
        Ok(Frame {
            buf: self.buf,
            len: self.len,
        })
    }

    /// Copies `bytes` in whole or not at all; the running total always grows.
    fn put(&mut self, bytes: &[u8]) {
        let end = self.len + bytes.len();
        if end <= MAX_FRAME_LEN {
            self.buf[self.len..end].copy_from_slice(bytes);
        }
        self.len = end;
    }
}

/// Cursor-style datagram reader.
///
/// Used for host replies and for picking frames apart in tests and fake
/// hosts. Every read returns `Option`; `None` means the data ran out.
#[derive(Debug)]
pub struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    /// Reader positioned at the first byte.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Reader positioned past the five-byte header.
    ///
    /// On data shorter than a header every subsequent read returns `None`.
    #[must_use]
    pub const fn at_payload(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: FRAME_HEADER_LEN,
        }
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|bytes| bytes[0])
    }

    /// Reads a little-endian u16.
    pub fn read_u16(&mut self) -> Option<u16> {
        self.take(2).map(|bytes| u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a little-endian i32.
    pub fn read_i32(&mut self) -> Option<i32> {
        self.take(4)
            .map(|bytes| i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a little-endian IEEE-754 f32.
    pub fn read_f32(&mut self) -> Option<f32> {
        self.take(4)
            .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        self.take(len)
    }

    /// Reads the four-byte command tag (only meaningful at position 0).
    pub fn read_tag(&mut self) -> Option<[u8; TAG_LEN]> {
        self.take(TAG_LEN)
            .map(|bytes| [bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Bytes left to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        if end > self.data.len() {
            return None;
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Some(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_stamped_and_sized() {
        let mut writer = FrameWriter::new(Command::Pause);
        writer.write_u8(1);
        let frame = writer.finish().unwrap();

        assert_eq!(frame.len(), 6);
        assert_eq!(&frame.as_bytes()[..4], b"SIMU");
        assert_eq!(frame.as_bytes()[4], 6);
        assert_eq!(frame.as_bytes()[5], 1);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_empty_payload_is_a_legal_frame() {
        let frame = FrameWriter::new(Command::GetDatarefs).finish().unwrap();
        assert_eq!(frame.len(), FRAME_HEADER_LEN);
        assert_eq!(frame.as_bytes()[4], FRAME_HEADER_LEN as u8);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut writer = FrameWriter::new(Command::SetConnection);
        writer.write_u16(0x1234);
        writer.write_i32(-2);
        writer.write_f32(1.0);
        let frame = writer.finish().unwrap();

        let payload = &frame.as_bytes()[FRAME_HEADER_LEN..];
        assert_eq!(payload[..2], [0x34, 0x12]);
        assert_eq!(payload[2..6], [0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(payload[6..10], 1.0f32.to_le_bytes());
    }

    #[test]
    fn test_overflow_is_reported_once_at_finish() {
        let mut writer = FrameWriter::new(Command::SetDataref);
        writer.write_bytes(&[0xAB; 300]);
        assert_eq!(writer.len(), FRAME_HEADER_LEN + 300);

        match writer.finish() {
            Err(EncodeError::FrameSizeOutOfBounds { len }) => {
                assert_eq!(len, FRAME_HEADER_LEN + 300);
            }
            other => panic!("expected frame bound error, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_capacity_frame_is_accepted() {
        let mut writer = FrameWriter::new(Command::SetDataref);
        writer.write_bytes(&[0x7F; MAX_FRAME_LEN - FRAME_HEADER_LEN]);
        let frame = writer.finish().unwrap();
        assert_eq!(frame.len(), MAX_FRAME_LEN);
        assert_eq!(frame.as_bytes()[4], 255);
    }

    #[test]
    fn test_frames_compare_by_wire_content() {
        let build = |value: u8| {
            let mut writer = FrameWriter::new(Command::Pause);
            writer.write_u8(value);
            writer.finish()
        };

        // Whole-result comparison; every codec test leans on this.
        assert_eq!(build(1), build(1));
        assert_ne!(build(1), build(0));

        let frame = build(1).unwrap();
        assert_eq!(frame.clone(), frame);
    }

    #[test]
    fn test_reader_round_trip() {
        let mut writer = FrameWriter::new(Command::SetPosition);
        writer.write_u8(7);
        writer.write_f32(-998.0);
        writer.write_u16(49_009);
        let frame = writer.finish().unwrap();

        let mut reader = FrameReader::new(frame.as_bytes());
        assert_eq!(reader.read_tag(), Some(*b"POSI"));
        assert_eq!(reader.read_u8(), Some(frame.len() as u8));
        assert_eq!(reader.read_u8(), Some(7));
        assert_eq!(reader.read_f32(), Some(-998.0));
        assert_eq!(reader.read_u16(), Some(49_009));
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.read_u8(), None);
    }

    #[test]
    fn test_reader_refuses_partial_values() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = FrameReader::new(&data);
        assert_eq!(reader.read_f32(), None);
        // A failed read consumes nothing.
        assert_eq!(reader.remaining(), 3);
        assert_eq!(reader.read_u16(), Some(0x0201));
    }

    #[test]
    fn test_payload_reader_on_short_data() {
        let mut reader = FrameReader::at_payload(&[0x00; 3]);
        assert_eq!(reader.read_u8(), None);
        assert_eq!(reader.remaining(), 0);
    }
}
