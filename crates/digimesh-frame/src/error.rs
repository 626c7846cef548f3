use crate::field::AtField;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The value does not satisfy the AT field's domain rule.
    #[error("invalid value for AT field {field} ({len} bytes)")]
    InvalidValue { field: AtField, len: usize },

    /// The transmit payload exceeds the protocol limit.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// No valid frame was found in the scanned bytes.
    #[error("no valid frame found")]
    NotFound,

    /// A buffer handed to `Frame::from_bytes` is not a well-formed frame.
    #[error("malformed frame: {0}")]
    Malformed(&'static str),

    /// A buffer handed to `Frame::from_bytes` carries a wrong checksum.
    #[error("checksum mismatch (expected {expected:#04x}, got {actual:#04x})")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
