//! Configurable AT fields of a DigiMesh module.
//!
//! Each field is described by one [`FieldSpec`]: its two-character wire name
//! and the rule a value must satisfy before it is put on the wire.

use std::fmt;

use crate::codec::MAX_FRAME_SIZE;

/// Rule a field value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// Arbitrary bytes, at most `max_len` of them.
    Raw { max_len: usize },
    /// 7-bit ASCII text, at most `max_len` bytes.
    Ascii { max_len: usize },
    /// Little-endian magnitude of at most `max_len` bytes within `min..=max`.
    Numeric { max_len: usize, min: u32, max: u32 },
    /// Query or command field; no value may be supplied.
    Empty,
}

/// Descriptor of a single AT field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Two-character ASCII name sent on the wire.
    pub name: &'static str,
    pub rule: ValueRule,
}

/// A configurable field on the radio module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtField {
    /// `ID`: network identifier.
    NetworkId,
    /// `CH`: operating channel.
    Channel,
    /// `NI`: node identifier string.
    NodeIdentifier,
    /// `SM`: sleep mode.
    SleepMode,
    /// `SN`: number of sleep periods.
    SleepNumber,
    /// `SO`: sleep options.
    SleepOptions,
    /// `ST`: wake time.
    WakeTime,
    /// `SP`: sleep period.
    SleepPeriod,
    /// `WH`: wake host delay.
    HostDelay,
    /// `SH`: upper four bytes of the serial number.
    SerialHigh,
    /// `SL`: lower four bytes of the serial number.
    SerialLow,
    /// `WR`: persist settings to non-volatile memory.
    Write,
}

impl AtField {
    /// Every field, in table order.
    pub const ALL: [AtField; 12] = [
        AtField::NetworkId,
        AtField::Channel,
        AtField::NodeIdentifier,
        AtField::SleepMode,
        AtField::SleepNumber,
        AtField::SleepOptions,
        AtField::WakeTime,
        AtField::SleepPeriod,
        AtField::HostDelay,
        AtField::SerialHigh,
        AtField::SerialLow,
        AtField::Write,
    ];

    /// The descriptor for this field.
    pub const fn spec(self) -> FieldSpec {
        use ValueRule::*;

        let (name, rule) = match self {
            AtField::NetworkId => ("ID", Raw { max_len: 2 }),
            AtField::Channel => (
                "CH",
                Numeric {
                    max_len: 1,
                    min: 0x0B,
                    max: 0x1A,
                },
            ),
            AtField::NodeIdentifier => ("NI", Ascii { max_len: 20 }),
            AtField::SleepMode => (
                "SM",
                Numeric {
                    max_len: 1,
                    min: 0,
                    max: 8,
                },
            ),
            AtField::SleepNumber => (
                "SN",
                Numeric {
                    max_len: 2,
                    min: 1,
                    max: 0xFFFF,
                },
            ),
            AtField::SleepOptions => (
                "SO",
                Numeric {
                    max_len: 2,
                    min: 0,
                    max: 0x13E,
                },
            ),
            AtField::WakeTime => (
                "ST",
                Numeric {
                    max_len: 3,
                    min: 1,
                    max: 0x36_EE80,
                },
            ),
            AtField::SleepPeriod => (
                "SP",
                Numeric {
                    max_len: 3,
                    min: 0,
                    max: 0x13E,
                },
            ),
            AtField::HostDelay => (
                "WH",
                Numeric {
                    max_len: 2,
                    min: 0,
                    max: 0x13E,
                },
            ),
            AtField::SerialHigh => ("SH", Empty),
            AtField::SerialLow => ("SL", Empty),
            AtField::Write => ("WR", Empty),
        };

        FieldSpec { name, rule }
    }

    /// Two-byte wire name.
    pub fn wire_name(self) -> [u8; 2] {
        let name = self.spec().name.as_bytes();
        [name[0], name[1]]
    }

    /// Look a field up by its two-byte wire name.
    pub fn from_wire_name(name: [u8; 2]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.wire_name() == name)
    }

    /// Returns true if `value` may be sent for this field.
    ///
    /// An empty value queries the current setting and is accepted for every
    /// field.
    pub fn validate(self, value: &[u8]) -> bool {
        if value.len() > MAX_FRAME_SIZE {
            return false;
        }
        if value.is_empty() {
            return true;
        }

        match self.spec().rule {
            ValueRule::Raw { max_len } => value.len() <= max_len,
            ValueRule::Ascii { max_len } => value.len() <= max_len && value.is_ascii(),
            ValueRule::Numeric { max_len, min, max } => {
                value.len() <= max_len
                    && le_magnitude(value).is_some_and(|v| (min..=max).contains(&v))
            }
            ValueRule::Empty => false,
        }
    }
}

impl fmt::Display for AtField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

/// Decode up to four bytes as a little-endian magnitude.
///
/// Multi-byte AT values are assumed little-endian, matching the existing
/// module firmware integration; this has not been checked against the
/// DigiMesh reference manual.
pub fn le_magnitude(value: &[u8]) -> Option<u32> {
    if value.len() > 4 {
        return None;
    }
    Some(
        value
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, b)| acc | (u32::from(*b) << (i * 8))),
    )
}
