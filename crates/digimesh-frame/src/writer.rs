use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::address::Address;
use crate::codec::{encode_at_command, encode_transmit_request, Frame, MAX_FRAME_SIZE};
use crate::error::{FrameError, Result};
use crate::field::AtField;

/// Writes complete frames to any `Write` link.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_FRAME_SIZE),
        }
    }

    /// Write an already-built frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        write_all(&mut self.inner, frame.as_bytes())?;
        trace!(
            frame_type = frame.frame_type().name(),
            size = frame.wire_size(),
            "frame written"
        );
        self.flush()
    }

    /// Encode and send a local AT command.
    pub fn send_at_command(&mut self, field: AtField, value: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_at_command(field, value, &mut self.buf)?;
        write_all(&mut self.inner, &self.buf)?;
        trace!(%field, size = self.buf.len(), "at command written");
        self.flush()
    }

    /// Encode and send a transmit request.
    pub fn send_transmit_request(&mut self, destination: &Address, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_transmit_request(destination, payload, &mut self.buf)?;
        write_all(&mut self.inner, &self.buf)?;
        trace!(%destination, size = self.buf.len(), "transmit request written");
        self.flush()
    }

    /// Flush the underlying link.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying link.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying link.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner link.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn write_all<T: Write>(inner: &mut T, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match inner.write(&bytes[offset..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}
