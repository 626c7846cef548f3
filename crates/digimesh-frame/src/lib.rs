//! DigiMesh/XBee API frame encoding and stream parsing.
//!
//! Every frame on the wire has the shape:
//! - A `0x7E` start delimiter
//! - A 2-byte big-endian length counting the bytes between it and the checksum
//! - A frame type byte and its type-specific data
//! - A 1-byte checksum: `0xFF` minus the low byte of the sum of those bytes
//!
//! The stream parser recovers frames from a link that may carry noise, split
//! writes and corrupted bytes, and only ever yields checksum-valid frames.

pub mod address;
#[cfg(feature = "async")]
pub mod async_codec;
pub mod buffer;
pub mod checksum;
pub mod codec;
pub mod error;
pub mod field;
pub mod inspect;
pub mod parser;
pub mod reader;
pub mod writer;

pub use address::{Address, ADDRESS_LEN};
#[cfg(feature = "async")]
pub use async_codec::DigiMeshCodec;
pub use buffer::StreamBuffer;
pub use checksum::{checksum, verify};
pub use codec::{
    encode_at_command, encode_transmit_request, Frame, FrameConfig, FrameType, MAX_FRAME_SIZE,
    MAX_TRANSMIT_PAYLOAD, START_DELIMITER,
};
pub use error::{FrameError, Result};
pub use field::{AtField, FieldSpec, ValueRule};
pub use inspect::{AtStatus, TransmitStatus};
pub use parser::{extract_first_frame, parse_frames, StreamParser};
pub use reader::FrameReader;
pub use writer::FrameWriter;
