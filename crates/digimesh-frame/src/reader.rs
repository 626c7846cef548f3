use std::io::{ErrorKind, Read};

use tracing::{debug, trace};

use crate::buffer::StreamBuffer;
use crate::codec::{Frame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::parser::StreamParser;

const READ_CHUNK_SIZE: usize = 256;

/// Reads validated frames from any `Read` link, typically a serial port.
///
/// Handles partial reads and line noise internally; callers only ever see
/// complete checksum-valid frames.
pub struct FrameReader<T> {
    inner: T,
    buf: StreamBuffer,
    parser: StreamParser,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: StreamBuffer::new(),
            parser: StreamParser::with_config(config),
        }
    }

    /// Read the next valid frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached before a
    /// complete frame.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            let before = self.buf.len();
            match self.parser.extract_first(&mut self.buf) {
                Ok(frame) => {
                    let dropped = before - self.buf.len() - frame.wire_size();
                    if dropped > 0 {
                        debug!(dropped, "discarded bytes ahead of frame");
                    }
                    trace!(
                        frame_type = frame.frame_type().name(),
                        size = frame.wire_size(),
                        "frame read"
                    );
                    return Ok(frame);
                }
                Err(FrameError::NotFound) => {
                    let dropped = before - self.buf.len();
                    if dropped > 0 {
                        debug!(dropped, "discarded bytes with no frame");
                    }
                }
                Err(err) => return Err(err),
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Bytes held back as the start of a not-yet-complete frame.
    pub fn buffered(&self) -> &[u8] {
        self.buf.available()
    }

    /// Drop any held partial frame, e.g. after the link has been reopened.
    pub fn discard_buffered(&mut self) {
        if !self.buf.is_empty() {
            debug!(dropped = self.buf.len(), "discarded buffered bytes");
        }
        self.buf.clear();
    }

    /// Borrow the underlying link.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying link.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner link.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        self.parser.config()
    }
}
