//! Read structural fields back out of received frames.
//!
//! The free functions take raw frame bytes and read fixed protocol offsets
//! without checking the frame type; they return `None` only when the buffer is
//! too short. The [`Frame`] methods additionally require the matching type.

use std::fmt;

use crate::address::Address;
use crate::codec::{Frame, FrameType, FRAME_OVERHEAD, MAX_TRANSMIT_PAYLOAD};
use crate::field::AtField;

/// Offset of the value in a local AT response.
pub const AT_RESPONSE_VALUE_OFFSET: usize = 8;

/// Offset of the payload in a receive packet.
pub const RECEIVE_PAYLOAD_OFFSET: usize = 15;

/// Length-field bytes that precede the value of a local AT response:
/// type, frame ID, AT name (2) and status.
const AT_RESPONSE_FIXED_LEN: usize = 5;

/// Status byte of a local AT response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtStatus {
    Ok,
    Error,
    InvalidCommand,
    InvalidParameter,
    Unknown(u8),
}

impl From<u8> for AtStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => AtStatus::Ok,
            1 => AtStatus::Error,
            2 => AtStatus::InvalidCommand,
            3 => AtStatus::InvalidParameter,
            other => AtStatus::Unknown(other),
        }
    }
}

impl fmt::Display for AtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtStatus::Ok => f.write_str("OKAY"),
            AtStatus::Error => f.write_str("ERROR"),
            AtStatus::InvalidCommand => f.write_str("INVALID_COMMAND"),
            AtStatus::InvalidParameter => f.write_str("INVALID_PARAMETER"),
            AtStatus::Unknown(code) => write!(f, "UNKNOWN({code:#04x})"),
        }
    }
}

/// Delivery report carried by an extended transmit status frame (0x8B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitStatus {
    /// Frame ID of the transmit request being reported on.
    pub frame_id: u8,
    pub network_address: [u8; 2],
    pub retry_count: u8,
    /// 0x00 on success.
    pub delivery_status: u8,
    pub discovery_status: u8,
}

impl TransmitStatus {
    pub fn is_delivered(&self) -> bool {
        self.delivery_status == 0
    }
}

fn declared_length(frame: &[u8]) -> Option<usize> {
    Some(usize::from(u16::from_be_bytes([
        *frame.get(1)?,
        *frame.get(2)?,
    ])))
}

/// Total wire size announced by the length field, overhead included.
pub fn total_size(frame: &[u8]) -> Option<usize> {
    declared_length(frame).map(|len| len + FRAME_OVERHEAD)
}

pub fn frame_type(frame: &[u8]) -> Option<FrameType> {
    frame.get(3).copied().map(FrameType::from)
}

/// Frame ID, for frame types that carry one.
pub fn frame_id(frame: &[u8]) -> Option<u8> {
    if frame_type(frame)?.has_frame_id() {
        frame.get(4).copied()
    } else {
        None
    }
}

/// Number of value bytes in a local AT response.
pub fn local_at_response_value_size(frame: &[u8]) -> Option<usize> {
    declared_length(frame)?.checked_sub(AT_RESPONSE_FIXED_LEN)
}

pub fn at_response_value(frame: &[u8]) -> Option<&[u8]> {
    let size = local_at_response_value_size(frame)?;
    frame.get(AT_RESPONSE_VALUE_OFFSET..AT_RESPONSE_VALUE_OFFSET + size)
}

/// The field a local AT response answers. `None` when the name is not in the
/// field table.
pub fn at_response_command(frame: &[u8]) -> Option<AtField> {
    let name = frame.get(5..7)?;
    AtField::from_wire_name([name[0], name[1]])
}

pub fn at_response_status(frame: &[u8]) -> Option<AtStatus> {
    frame.get(7).copied().map(AtStatus::from)
}

/// Payload of a receive packet (0x90).
pub fn receive_payload(frame: &[u8]) -> Option<&[u8]> {
    let end = total_size(frame)?.checked_sub(1)?;
    frame.get(RECEIVE_PAYLOAD_OFFSET..end)
}

/// Sender of a receive packet (0x90).
pub fn receive_source_address(frame: &[u8]) -> Option<Address> {
    Address::try_from(frame.get(4..12)?).ok()
}

/// Decode an extended transmit status frame (0x8B).
pub fn transmit_status(frame: &[u8]) -> Option<TransmitStatus> {
    if frame_type(frame)? != FrameType::TransmitStatus {
        return None;
    }
    match frame.get(4..10)? {
        &[frame_id, hi, lo, retry_count, delivery_status, discovery_status] => {
            Some(TransmitStatus {
                frame_id,
                network_address: [hi, lo],
                retry_count,
                delivery_status,
                discovery_status,
            })
        }
        _ => None,
    }
}

/// Number of transmit requests needed to carry `total_len` bytes.
pub fn required_packet_count(total_len: usize) -> usize {
    total_len.div_ceil(MAX_TRANSMIT_PAYLOAD)
}

impl Frame {
    pub fn frame_id(&self) -> Option<u8> {
        frame_id(self.as_bytes())
    }

    pub fn at_response_command(&self) -> Option<AtField> {
        self.expect_type(FrameType::LocalAtResponse)?;
        at_response_command(self.as_bytes())
    }

    pub fn at_response_status(&self) -> Option<AtStatus> {
        self.expect_type(FrameType::LocalAtResponse)?;
        at_response_status(self.as_bytes())
    }

    pub fn at_response_value(&self) -> Option<&[u8]> {
        self.expect_type(FrameType::LocalAtResponse)?;
        at_response_value(self.as_bytes())
    }

    pub fn receive_payload(&self) -> Option<&[u8]> {
        self.expect_type(FrameType::ReceivePacket)?;
        receive_payload(self.as_bytes())
    }

    pub fn receive_source_address(&self) -> Option<Address> {
        self.expect_type(FrameType::ReceivePacket)?;
        receive_source_address(self.as_bytes())
    }

    pub fn transmit_status(&self) -> Option<TransmitStatus> {
        transmit_status(self.as_bytes())
    }

    fn expect_type(&self, kind: FrameType) -> Option<()> {
        (self.frame_type() == kind).then_some(())
    }
}
