//! Resynchronizing stream parser.
//!
//! Scans a [`StreamBuffer`] that may hold noise, partial frames and several
//! concatenated frames, and yields every complete checksum-valid frame. The
//! parser itself keeps no state between calls: progress lives entirely in the
//! buffer's cursor, so a trailing partial frame is picked up again once more
//! bytes have been appended.
//!
//! ```text
//!            0x7E            hi             lo              len bytes
//! SeekStart ──────> LengthHigh ──> LengthLow ──> Body ──────────────> Checksum
//!     ^                                │                                 │
//!     │        len == 0 or too large   │       match: emit frame         │
//!     └────────────────────────────────┴──── mismatch: drop candidate ───┘
//! ```
//!
//! A `0x7E` seen anywhere past `SeekStart` abandons the candidate and starts a
//! new one at that byte, including in the checksum position. A frame whose
//! checksum is `0x7E` is therefore never emitted.

use bytes::Bytes;

use crate::buffer::StreamBuffer;
use crate::checksum::checksum;
use crate::codec::{Frame, FrameConfig, FRAME_OVERHEAD, HEADER_SIZE, START_DELIMITER};
use crate::error::{FrameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekStart,
    LengthHigh,
    LengthLow { high: u8 },
    Body { remaining: usize },
    Checksum { expected: u8 },
}

/// Outcome of one pass over a byte span.
#[derive(Debug)]
pub(crate) struct Scan {
    pub(crate) frames: Vec<Frame>,
    /// Bytes at the front of the span that are done with: emitted frames and
    /// discarded noise. Everything after belongs to an unfinished candidate.
    pub(crate) consumed: usize,
}

/// Extracts validated frames from a noisy byte stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamParser {
    config: FrameConfig,
}

impl StreamParser {
    /// Create a parser with the default 128-byte frame capacity.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Emit every valid frame in `input`, in order.
    ///
    /// Noise and corrupt candidates are dropped from the buffer; a trailing
    /// partial frame is kept for the next call. Returns an empty vector when
    /// no complete frame is present yet.
    pub fn parse(&self, input: &mut StreamBuffer) -> Vec<Frame> {
        let scan = self.scan(input.available(), usize::MAX);
        input.consume(scan.consumed);
        input.compact();
        scan.frames
    }

    /// Return the first valid frame in `input`, removing it and any noise in
    /// front of it. Bytes after the frame stay in the buffer.
    ///
    /// Returns [`FrameError::NotFound`] if no valid frame is present. Noise is
    /// still dropped in that case, and a trailing partial frame is kept.
    pub fn extract_first(&self, input: &mut StreamBuffer) -> Result<Frame> {
        let scan = self.scan(input.available(), 1);
        input.consume(scan.consumed);
        input.compact();
        scan.frames.into_iter().next().ok_or(FrameError::NotFound)
    }

    /// Run the state machine over `input`, stopping after `limit` frames.
    pub(crate) fn scan(&self, input: &[u8], limit: usize) -> Scan {
        let capacity = self.config.capacity();
        let mut frames = Vec::new();
        let mut consumed = 0;
        let mut start = 0;
        let mut state = State::SeekStart;

        for (idx, &byte) in input.iter().enumerate() {
            state = match state {
                State::SeekStart => {
                    if byte == START_DELIMITER {
                        start = idx;
                        State::LengthHigh
                    } else {
                        consumed = idx + 1;
                        State::SeekStart
                    }
                }
                _ if byte == START_DELIMITER => {
                    consumed = idx;
                    start = idx;
                    State::LengthHigh
                }
                State::Checksum { expected } if byte == expected => {
                    frames.push(Frame::from_validated(Bytes::copy_from_slice(
                        &input[start..=idx],
                    )));
                    consumed = idx + 1;
                    if frames.len() >= limit {
                        break;
                    }
                    State::SeekStart
                }
                State::LengthHigh => State::LengthLow { high: byte },
                State::LengthLow { high } => {
                    let length = usize::from(u16::from_be_bytes([high, byte]));
                    // A zero length leaves no room for the frame type byte.
                    if length == 0 || length + FRAME_OVERHEAD > capacity {
                        consumed = idx + 1;
                        State::SeekStart
                    } else {
                        State::Body { remaining: length }
                    }
                }
                State::Body { remaining: 1 } => State::Checksum {
                    expected: checksum(&input[start + HEADER_SIZE..=idx]),
                },
                State::Body { remaining } => State::Body {
                    remaining: remaining - 1,
                },
                State::Checksum { .. } => {
                    consumed = idx + 1;
                    State::SeekStart
                }
            };
        }

        Scan { frames, consumed }
    }
}

/// [`StreamParser::parse`] with the default configuration.
pub fn parse_frames(input: &mut StreamBuffer) -> Vec<Frame> {
    StreamParser::new().parse(input)
}

/// [`StreamParser::extract_first`] with the default configuration.
pub fn extract_first_frame(input: &mut StreamBuffer) -> Result<Frame> {
    StreamParser::new().extract_first(input)
}
