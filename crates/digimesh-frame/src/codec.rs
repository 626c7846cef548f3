use bytes::{BufMut, Bytes, BytesMut};

use crate::address::Address;
use crate::checksum::{checksum, verify};
use crate::error::{FrameError, Result};
use crate::field::AtField;

/// Every frame begins with this byte. It is never escaped.
pub const START_DELIMITER: u8 = 0x7E;

/// Start delimiter (1) + length (2).
pub const HEADER_SIZE: usize = 3;

/// Bytes of a frame not counted by its length field: header (3) + checksum (1).
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + 1;

/// Largest frame, overhead included, that the codec builds or accepts.
pub const MAX_FRAME_SIZE: usize = 128;

/// Largest payload a single transmit request may carry.
pub const MAX_TRANSMIT_PAYLOAD: usize = 65;

/// Frame ID stamped on outbound requests. Non-zero, so the module replies.
pub const DEFAULT_FRAME_ID: u8 = 0x01;

/// Reserved 16-bit destination field of a transmit request.
pub const RESERVED_NETWORK_ADDRESS: [u8; 2] = [0xFF, 0xFE];

/// Transmit options: unicast with DigiMesh routing.
pub const TRANSMIT_OPTIONS_MESH: u8 = 0xC0;

/// Type (1) + frame ID (1) + AT name (2).
const AT_COMMAND_FIXED_LEN: usize = 4;

/// Type (1) + frame ID (1) + address (8) + reserved (2) + radius (1) + options (1).
const TRANSMIT_REQUEST_FIXED_LEN: usize = 14;

/// API frame type identifier (the byte after the length field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// 0x08: set or query a field on the local module.
    LocalAtCommand,
    /// 0x10: send a payload to another module.
    TransmitRequest,
    /// 0x88: reply to a local AT command.
    LocalAtResponse,
    /// 0x8B: delivery report for a transmit request.
    TransmitStatus,
    /// 0x90: payload received from another module.
    ReceivePacket,
    /// Any type this codec does not interpret.
    Unknown(u8),
}

impl FrameType {
    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            FrameType::LocalAtCommand => "LOCAL_AT_COMMAND",
            FrameType::TransmitRequest => "TRANSMIT_REQUEST",
            FrameType::LocalAtResponse => "LOCAL_AT_RESPONSE",
            FrameType::TransmitStatus => "TRANSMIT_STATUS",
            FrameType::ReceivePacket => "RECEIVE_PACKET",
            FrameType::Unknown(_) => "UNKNOWN",
        }
    }

    /// Returns true if frames of this type carry a frame ID after the type byte.
    pub fn has_frame_id(self) -> bool {
        !matches!(self, FrameType::ReceivePacket | FrameType::Unknown(_))
    }
}

impl From<u8> for FrameType {
    fn from(value: u8) -> Self {
        match value {
            0x08 => FrameType::LocalAtCommand,
            0x10 => FrameType::TransmitRequest,
            0x88 => FrameType::LocalAtResponse,
            0x8B => FrameType::TransmitStatus,
            0x90 => FrameType::ReceivePacket,
            other => FrameType::Unknown(other),
        }
    }
}

impl From<FrameType> for u8 {
    fn from(value: FrameType) -> Self {
        match value {
            FrameType::LocalAtCommand => 0x08,
            FrameType::TransmitRequest => 0x10,
            FrameType::LocalAtResponse => 0x88,
            FrameType::TransmitStatus => 0x8B,
            FrameType::ReceivePacket => 0x90,
            FrameType::Unknown(other) => other,
        }
    }
}

/// A complete, checksum-valid API frame, start delimiter through checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    raw: Bytes,
}

impl Frame {
    /// Wrap bytes already known to be a valid frame.
    pub(crate) fn from_validated(raw: Bytes) -> Self {
        Self { raw }
    }

    /// Validate a buffer holding exactly one frame.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FRAME_OVERHEAD + 1 {
            return Err(FrameError::Malformed("shorter than a minimal frame"));
        }
        if bytes[0] != START_DELIMITER {
            return Err(FrameError::Malformed("missing start delimiter"));
        }
        if bytes.len() > MAX_FRAME_SIZE {
            return Err(FrameError::Malformed("exceeds maximum frame size"));
        }
        let declared = usize::from(u16::from_be_bytes([bytes[1], bytes[2]]));
        if declared + FRAME_OVERHEAD != bytes.len() {
            return Err(FrameError::Malformed("length field does not match buffer"));
        }
        if !verify(bytes) {
            return Err(FrameError::ChecksumMismatch {
                expected: checksum(&bytes[HEADER_SIZE..bytes.len() - 1]),
                actual: bytes[bytes.len() - 1],
            });
        }
        Ok(Self::from_validated(Bytes::copy_from_slice(bytes)))
    }

    /// Build a local AT command frame setting (or, with an empty value,
    /// querying) `field`.
    pub fn at_command(field: AtField, value: &[u8]) -> Result<Self> {
        let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + AT_COMMAND_FIXED_LEN + value.len());
        encode_at_command(field, value, &mut buf)?;
        Ok(Self::from_validated(buf.freeze()))
    }

    /// Build a transmit request frame carrying `payload` to `destination`.
    pub fn transmit_request(destination: &Address, payload: &[u8]) -> Result<Self> {
        let mut buf =
            BytesMut::with_capacity(FRAME_OVERHEAD + TRANSMIT_REQUEST_FIXED_LEN + payload.len());
        encode_transmit_request(destination, payload, &mut buf)?;
        Ok(Self::from_validated(buf.freeze()))
    }

    /// The full wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Bytes {
        self.raw
    }

    /// Total wire size, overhead included.
    pub fn wire_size(&self) -> usize {
        self.raw.len()
    }

    pub fn frame_type(&self) -> FrameType {
        FrameType::from(self.raw[HEADER_SIZE])
    }

    /// Bytes after the type byte, up to but excluding the checksum.
    pub fn data(&self) -> &[u8] {
        &self.raw[HEADER_SIZE + 1..self.raw.len() - 1]
    }

    /// The trailing checksum byte.
    pub fn checksum(&self) -> u8 {
        self.raw[self.raw.len() - 1]
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

/// Encode a local AT command (type 0x08) into `dst`.
///
/// Wire format:
/// ```text
/// ┌──────┬──────────┬──────┬──────────┬─────────┬─────────┬──────────┐
/// │ 0x7E │ Length   │ 0x08 │ Frame ID │ AT name │ Value   │ Checksum │
/// │      │ (2B BE)  │      │ 0x01     │ (2B)    │ (0..N)  │ (1B)     │
/// └──────┴──────────┴──────┴──────────┴─────────┴─────────┴──────────┘
/// ```
pub fn encode_at_command(field: AtField, value: &[u8], dst: &mut BytesMut) -> Result<()> {
    if !field.validate(value) {
        return Err(FrameError::InvalidValue {
            field,
            len: value.len(),
        });
    }

    let length = AT_COMMAND_FIXED_LEN + value.len();
    let start = dst.len();
    dst.reserve(FRAME_OVERHEAD + length);
    dst.put_u8(START_DELIMITER);
    dst.put_u16(length as u16);
    dst.put_u8(FrameType::LocalAtCommand.into());
    dst.put_u8(DEFAULT_FRAME_ID);
    dst.put_slice(&field.wire_name());
    dst.put_slice(value);
    let sum = checksum(&dst[start + HEADER_SIZE..]);
    dst.put_u8(sum);
    Ok(())
}

/// Encode a transmit request (type 0x10) into `dst`.
///
/// Wire format:
/// ```text
/// ┌──────┬─────────┬──────┬──────┬─────────┬───────────┬────────┬─────────┬─────────┬──────────┐
/// │ 0x7E │ Length  │ 0x10 │ 0x01 │ Address │ 0xFF 0xFE │ Radius │ Options │ Payload │ Checksum │
/// │      │ (2B BE) │      │      │ (8B BE) │           │ 0x00   │ 0xC0    │ (0..65) │ (1B)     │
/// └──────┴─────────┴──────┴──────┴─────────┴───────────┴────────┴─────────┴─────────┴──────────┘
/// ```
pub fn encode_transmit_request(
    destination: &Address,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > MAX_TRANSMIT_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_TRANSMIT_PAYLOAD,
        });
    }

    let length = TRANSMIT_REQUEST_FIXED_LEN + payload.len();
    let start = dst.len();
    dst.reserve(FRAME_OVERHEAD + length);
    dst.put_u8(START_DELIMITER);
    dst.put_u16(length as u16);
    dst.put_u8(FrameType::TransmitRequest.into());
    dst.put_u8(DEFAULT_FRAME_ID);
    dst.put_slice(destination.as_bytes());
    dst.put_slice(&RESERVED_NETWORK_ADDRESS);
    dst.put_u8(0x00); // broadcast radius: network maximum
    dst.put_u8(TRANSMIT_OPTIONS_MESH);
    dst.put_slice(payload);
    let sum = checksum(&dst[start + HEADER_SIZE..]);
    dst.put_u8(sum);
    Ok(())
}

/// Configuration for frame parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Largest accepted frame, overhead included. Default and upper bound:
    /// [`MAX_FRAME_SIZE`].
    pub max_frame_size: usize,
}

impl FrameConfig {
    /// Staging capacity actually enforced by the parser.
    pub fn capacity(&self) -> usize {
        self.max_frame_size.min(MAX_FRAME_SIZE)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(field: AtField, value: &[u8]) -> Vec<u8> {
        Frame::at_command(field, value).unwrap().as_bytes().to_vec()
    }

    #[test]
    fn encode_network_id() {
        assert_eq!(
            at(AtField::NetworkId, &[0x0A]),
            [0x7E, 0x00, 0x05, 0x08, 0x01, 0x49, 0x44, 0x0A, 0x5F]
        );
    }

    #[test]
    fn encode_node_identifier() {
        assert_eq!(
            at(AtField::NodeIdentifier, b"crumb"),
            [0x7E, 0x00, 0x09, 0x08, 0x01, 0x4E, 0x49, 0x63, 0x72, 0x75, 0x6D, 0x62, 0x46]
        );
    }

    #[test]
    fn encode_single_byte_fields() {
        let cases: [(AtField, u8, [u8; 9]); 7] = [
            (AtField::Channel, 0x0B, [0x7E, 0x00, 0x05, 0x08, 0x01, 0x43, 0x48, 0x0B, 0x60]),
            (AtField::SleepMode, 0x08, [0x7E, 0x00, 0x05, 0x08, 0x01, 0x53, 0x4D, 0x08, 0x4E]),
            (AtField::SleepNumber, 0x01, [0x7E, 0x00, 0x05, 0x08, 0x01, 0x53, 0x4E, 0x01, 0x54]),
            (AtField::SleepOptions, 0x01, [0x7E, 0x00, 0x05, 0x08, 0x01, 0x53, 0x4F, 0x01, 0x53]),
            (AtField::WakeTime, 0x7D, [0x7E, 0x00, 0x05, 0x08, 0x01, 0x53, 0x54, 0x7D, 0xD2]),
            (AtField::SleepPeriod, 0xC8, [0x7E, 0x00, 0x05, 0x08, 0x01, 0x53, 0x50, 0xC8, 0x8B]),
            (AtField::HostDelay, 0x00, [0x7E, 0x00, 0x05, 0x08, 0x01, 0x57, 0x48, 0x00, 0x57]),
        ];

        for (field, value, expected) in cases {
            assert_eq!(at(field, &[value]), expected, "field {field}");
        }
    }

    #[test]
    fn encode_serial_queries() {
        assert_eq!(
            at(AtField::SerialHigh, &[]),
            [0x7E, 0x00, 0x04, 0x08, 0x01, 0x53, 0x48, 0x5B]
        );
        assert_eq!(
            at(AtField::SerialLow, &[]),
            [0x7E, 0x00, 0x04, 0x08, 0x01, 0x53, 0x4C, 0x57]
        );
    }

    #[test]
    fn name_and_value_recoverable_by_offset() {
        let samples: [(AtField, &[u8]); 12] = [
            (AtField::NetworkId, &[0x7F, 0xFF]),
            (AtField::Channel, &[0x1A]),
            (AtField::NodeIdentifier, b"gateway-01"),
            (AtField::SleepMode, &[0x04]),
            (AtField::SleepNumber, &[0x00, 0x01]),
            (AtField::SleepOptions, &[0x3E, 0x01]),
            (AtField::WakeTime, &[0x80, 0xEE, 0x36]),
            (AtField::SleepPeriod, &[0x3E, 0x01]),
            (AtField::HostDelay, &[0x10]),
            (AtField::SerialHigh, &[]),
            (AtField::SerialLow, &[]),
            (AtField::Write, &[]),
        ];

        for (field, value) in samples {
            let frame = Frame::at_command(field, value).unwrap();
            let bytes = frame.as_bytes();
            assert_eq!(&bytes[5..7], &field.wire_name());
            assert_eq!(&bytes[7..bytes.len() - 1], value);
            assert_eq!(checksum(&bytes[3..bytes.len() - 1]), frame.checksum());
            assert_eq!(frame.frame_type(), FrameType::LocalAtCommand);
        }
    }

    #[test]
    fn invalid_value_rejected() {
        let err = Frame::at_command(AtField::Channel, &[0x0A]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidValue {
                field: AtField::Channel,
                len: 1
            }
        ));

        let mut buf = BytesMut::new();
        let oversized = vec![0u8; MAX_FRAME_SIZE + 1];
        assert!(encode_at_command(AtField::NodeIdentifier, &oversized, &mut buf).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_transmit_request_to_zero_address() {
        let frame = Frame::transmit_request(&Address::from(0u64), b"big slug").unwrap();
        assert_eq!(
            frame.as_bytes(),
            [
                0x7E, 0x00, 0x16, 0x10, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0xFF, 0xFE, 0x00, 0xC0, b'b', b'i', b'g', b' ', b's', b'l', b'u', b'g', 0x24,
            ]
        );
        assert_eq!(frame.wire_size(), 26);
    }

    #[test]
    fn transmit_request_payload_limit() {
        let dest = Address::from(0x0013_A200_4105_3C7Fu64);

        let frame = Frame::transmit_request(&dest, &[0xAA; MAX_TRANSMIT_PAYLOAD]).unwrap();
        assert!(frame.wire_size() <= MAX_FRAME_SIZE);
        assert!(verify(frame.as_bytes()));

        let err = Frame::transmit_request(&dest, &[0xAA; MAX_TRANSMIT_PAYLOAD + 1]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadTooLarge {
                size: 66,
                max: MAX_TRANSMIT_PAYLOAD
            }
        ));
    }

    #[test]
    fn encoders_append_to_existing_buffer() {
        let mut buf = BytesMut::new();
        encode_at_command(AtField::SerialHigh, &[], &mut buf).unwrap();
        encode_transmit_request(&Address::from(1u64), b"x", &mut buf).unwrap();

        let first = Frame::from_bytes(&buf[..8]).unwrap();
        let second = Frame::from_bytes(&buf[8..]).unwrap();
        assert_eq!(first.frame_type(), FrameType::LocalAtCommand);
        assert_eq!(second.frame_type(), FrameType::TransmitRequest);
    }

    #[test]
    fn from_bytes_rejects_bad_frames() {
        let good = [0x7E, 0x00, 0x05, 0x88, 0x01, 0x4E, 0x49, 0x00, 0xDF];
        let parsed = Frame::from_bytes(&good).unwrap();
        assert_eq!(parsed.into_bytes(), Bytes::copy_from_slice(&good));

        let mut bad_sum = good;
        bad_sum[8] = 0x00;
        assert!(matches!(
            Frame::from_bytes(&bad_sum),
            Err(FrameError::ChecksumMismatch {
                expected: 0xDF,
                actual: 0x00
            })
        ));

        assert!(matches!(
            Frame::from_bytes(&good[..8]),
            Err(FrameError::Malformed(_))
        ));

        let mut no_delimiter = good;
        no_delimiter[0] = 0x00;
        assert!(matches!(
            Frame::from_bytes(&no_delimiter),
            Err(FrameError::Malformed(_))
        ));
    }

    #[test]
    fn frame_type_conversions() {
        for byte in [0x08, 0x10, 0x88, 0x8B, 0x90, 0x42] {
            assert_eq!(u8::from(FrameType::from(byte)), byte);
        }
        assert_eq!(FrameType::from(0x42), FrameType::Unknown(0x42));
        assert!(!FrameType::ReceivePacket.has_frame_id());
        assert!(FrameType::LocalAtResponse.has_frame_id());
    }

    #[test]
    fn config_capacity_is_clamped() {
        assert_eq!(FrameConfig::default().capacity(), MAX_FRAME_SIZE);
        let cfg = FrameConfig {
            max_frame_size: 4096,
        };
        assert_eq!(cfg.capacity(), MAX_FRAME_SIZE);
        let cfg = FrameConfig { max_frame_size: 32 };
        assert_eq!(cfg.capacity(), 32);
    }
}
