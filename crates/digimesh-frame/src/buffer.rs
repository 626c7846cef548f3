use bytes::{Buf, BytesMut};

const INITIAL_BUFFER_CAPACITY: usize = 512;

/// Append-only inbound byte buffer with an explicit read cursor.
///
/// Bytes are appended at the head. The parser marks bytes it is done with via
/// [`consume`](Self::consume); they stay in place until
/// [`compact`](Self::compact) drops them and slides the unconsumed remainder
/// to the front.
#[derive(Debug, Default)]
pub struct StreamBuffer {
    buf: BytesMut,
    tail: usize,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            tail: 0,
        }
    }

    /// Append bytes received from the link.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes not yet consumed.
    pub fn available(&self) -> &[u8] {
        &self.buf[self.tail..]
    }

    /// Mark `n` more bytes as consumed. Clamped to what is available.
    pub fn consume(&mut self, n: usize) {
        self.tail = (self.tail + n).min(self.buf.len());
    }

    /// Drop consumed bytes, moving the remainder to the front.
    pub fn compact(&mut self) {
        if self.tail == 0 {
            return;
        }
        self.buf.advance(self.tail);
        self.tail = 0;
    }

    /// Write position: count of bytes held, consumed or not.
    pub fn head(&self) -> usize {
        self.buf.len()
    }

    /// Read position: count of consumed bytes not yet compacted away.
    pub fn tail(&self) -> usize {
        self.tail
    }

    pub fn len(&self) -> usize {
        self.buf.len() - self.tail
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.tail = 0;
    }
}

impl From<&[u8]> for StreamBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            buf: BytesMut::from(bytes),
            tail: 0,
        }
    }
}

impl Extend<u8> for StreamBuffer {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        self.buf.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_then_compact() {
        let mut buf = StreamBuffer::from(&[1u8, 2, 3, 4, 5][..]);
        buf.consume(2);
        assert_eq!(buf.available(), &[3, 4, 5]);
        assert_eq!((buf.tail(), buf.head()), (2, 5));

        buf.compact();
        assert_eq!(buf.available(), &[3, 4, 5]);
        assert_eq!((buf.tail(), buf.head()), (0, 3));

        buf.extend_from_slice(&[6]);
        assert_eq!(buf.available(), &[3, 4, 5, 6]);
    }

    #[test]
    fn consume_is_clamped() {
        let mut buf = StreamBuffer::from(&[1u8, 2][..]);
        buf.consume(10);
        assert!(buf.is_empty());
        buf.compact();
        assert_eq!(buf.head(), 0);
    }

    #[test]
    fn clear_resets_positions() {
        let mut buf = StreamBuffer::new();
        buf.extend([1u8, 2, 3]);
        buf.consume(1);
        buf.clear();
        assert_eq!((buf.tail(), buf.head()), (0, 0));
    }
}
