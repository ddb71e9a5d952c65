//! # Payload Layouts
//!
//! Declarative field tables for the three vector-style payloads.
//!
//! ## Design
//!
//! The control, position and state-row payloads are fixed-arity blocks with
//! one awkward twist: the landing-gear field inside the control block is a
//! single byte in the middle of an otherwise all-float layout, and the first
//! field of a state row travels as a truncated integer. Instead of spreading
//! byte offsets across the encoders, each layout is one table here and a
//! single [`encode_vector`] walks it. An offset bug can only exist in one
//! place, and that place is reviewable at a glance.
//!
//! ```text
//! CTRL payload (22 bytes)
//! ┌──────────┬──────────┬──────────┬──────────┬────┬──────────┬─────┐
//! │ stick_lat│ stick_lon│ rudder   │ throttle │gear│ flaps    │ pad │
//! │  0..4    │  4..8    │  8..12   │ 12..16   │ 16 │ 17..21   │ 21  │
//! └──────────┴──────────┴──────────┴──────────┴────┴──────────┴─────┘
//! ```

use crate::error::{EncodeError, EncodeResult};
use crate::frame::FrameWriter;
use crate::SENTINEL_UNCHANGED;

/// How one field of a vector payload travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
    /// Four-byte little-endian IEEE-754 float.
    F32Le,
    /// One byte, truncated from the supplied float.
    U8,
    /// Four-byte little-endian signed integer, truncated from the supplied
    /// float.
    I32Le,
}

impl FieldEncoding {
    /// Wire width of one field in bytes.
    #[must_use]
    pub const fn wire_len(self) -> usize {
        match self {
            Self::F32Le | Self::I32Le => 4,
            Self::U8 => 1,
        }
    }
}

/// One field of a fixed-arity vector payload.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Field meaning, in host terms.
    pub name: &'static str,
    /// Wire encoding.
    pub encoding: FieldEncoding,
}

impl FieldSpec {
    const fn f32(name: &'static str) -> Self {
        Self {
            name,
            encoding: FieldEncoding::F32Le,
        }
    }
}

/// The `CTRL` payload in wire order. Gear is the lone byte field.
pub const CONTROL_FIELDS: [FieldSpec; 6] = [
    FieldSpec::f32("lateral_stick"),
    FieldSpec::f32("longitudinal_stick"),
    FieldSpec::f32("rudder"),
    FieldSpec::f32("throttle"),
    FieldSpec {
        name: "landing_gear",
        encoding: FieldEncoding::U8,
    },
    FieldSpec::f32("flaps"),
];

/// The `POSI` payload after the aircraft byte, in wire order.
pub const POSITION_FIELDS: [FieldSpec; 7] = [
    FieldSpec::f32("latitude"),
    FieldSpec::f32("longitude"),
    FieldSpec::f32("altitude"),
    FieldSpec::f32("roll"),
    FieldSpec::f32("pitch"),
    FieldSpec::f32("heading"),
    FieldSpec::f32("landing_gear"),
];

/// One `DATA` row in wire order. The selector is host-interpreted; this
/// client carries it opaquely.
pub const DATA_ROW_FIELDS: [FieldSpec; 9] = [
    FieldSpec {
        name: "row_selector",
        encoding: FieldEncoding::I32Le,
    },
    FieldSpec::f32("value_1"),
    FieldSpec::f32("value_2"),
    FieldSpec::f32("value_3"),
    FieldSpec::f32("value_4"),
    FieldSpec::f32("value_5"),
    FieldSpec::f32("value_6"),
    FieldSpec::f32("value_7"),
    FieldSpec::f32("value_8"),
];

/// Total wire size of a field table.
#[must_use]
pub const fn encoded_len(fields: &[FieldSpec]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        total += fields[i].encoding.wire_len();
        i += 1;
    }
    total
}

/// Wire size of the control payload: six fields plus one pad byte the host
/// insists on reading.
pub const CONTROL_PAYLOAD_LEN: usize = encoded_len(&CONTROL_FIELDS) + 1;

/// Wire size of the position payload after the aircraft byte.
pub const POSITION_PAYLOAD_LEN: usize = encoded_len(&POSITION_FIELDS);

/// Wire size of one state row.
pub const DATA_ROW_LEN: usize = encoded_len(&DATA_ROW_FIELDS);

/// Encodes a caller-supplied prefix of `fields` into `writer`.
///
/// Unsupplied trailing floats become [`SENTINEL_UNCHANGED`]; an unsupplied
/// byte field becomes 0, which the host reads as "gear up", not as "leave
/// unchanged". Supplied floats headed into integer fields are truncated
/// toward zero, saturating at the i32 bounds, then wrapped to the wire
/// width.
///
/// # Errors
///
/// Returns [`EncodeError::VectorTooLong`] when more values than fields are
/// supplied. Arity floors (exact-arity rows) are the caller's contract.
pub fn encode_vector(
    writer: &mut FrameWriter,
    fields: &[FieldSpec],
    values: &[f32],
) -> EncodeResult<()> {
    if values.len() > fields.len() {
        return Err(EncodeError::VectorTooLong {
            len: values.len(),
            max: fields.len(),
        });
    }
    for (slot, field) in fields.iter().enumerate() {
        let value = values.get(slot).copied();
        match field.encoding {
            FieldEncoding::F32Le => writer.write_f32(value.unwrap_or(SENTINEL_UNCHANGED)),
            FieldEncoding::U8 => writer.write_u8(truncate_to_u8(value.unwrap_or(0.0))),
            FieldEncoding::I32Le => writer.write_i32(truncate_to_i32(value.unwrap_or(0.0))),
        }
    }
    Ok(())
}

/// Float to wire byte: truncate toward zero, saturate to i32, keep the low
/// eight bits. Matches the host's reading of out-of-range input.
fn truncate_to_u8(value: f32) -> u8 {
    (value as i32) as u8
}

/// Float to wire i32: truncate toward zero, saturating. NaN becomes 0.
fn truncate_to_i32(value: f32) -> i32 {
    value as i32
}
