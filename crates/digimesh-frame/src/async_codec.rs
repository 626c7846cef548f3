//! `tokio_util::codec` adapter for async serial links.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

use crate::codec::{Frame, FrameConfig};
use crate::error::FrameError;
use crate::parser::StreamParser;

/// Decodes validated frames from a noisy byte stream and encodes frames as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigiMeshCodec {
    parser: StreamParser,
}

impl DigiMeshCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            parser: StreamParser::with_config(config),
        }
    }
}

impl Decoder for DigiMeshCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let scan = self.parser.scan(&src[..], 1);
        let frame = scan.frames.into_iter().next();
        let dropped = scan.consumed - frame.as_ref().map_or(0, Frame::wire_size);
        if dropped > 0 {
            debug!(dropped, "discarded bytes ahead of frame");
        }
        src.advance(scan.consumed);
        Ok(frame)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                if !src.is_empty() {
                    trace!(leftover = src.len(), "dropping partial frame at end of stream");
                    src.clear();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<Frame> for DigiMeshCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item.into_bytes());
        Ok(())
    }
}

impl Encoder<&Frame> for DigiMeshCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(item.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;
    use crate::address::Address;
    use crate::field::AtField;

    #[test]
    fn decode_skips_noise_and_waits_for_more() {
        let frame = Frame::at_command(AtField::Channel, &[0x0C]).unwrap();
        let mut codec = DigiMeshCodec::new();

        let mut src = BytesMut::from(&[0x00, 0x42][..]);
        src.extend_from_slice(&frame.as_bytes()[..4]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert_eq!(&src[..], &frame.as_bytes()[..4]);

        src.extend_from_slice(&frame.as_bytes()[4..]);
        assert_eq!(codec.decode(&mut src).unwrap(), Some(frame));
        assert!(src.is_empty());
    }

    #[test]
    fn decode_eof_drops_partial() {
        let mut codec = DigiMeshCodec::new();
        let mut src = BytesMut::from(&[0x7E, 0x00, 0x05, 0x08][..]);

        assert!(codec.decode_eof(&mut src).unwrap().is_none());
        assert!(src.is_empty());
    }

    #[test]
    fn encode_appends_wire_bytes() {
        let frame = Frame::at_command(AtField::NetworkId, &[0x0A]).unwrap();
        let mut codec = DigiMeshCodec::new();
        let mut dst = BytesMut::new();

        codec.encode(&frame, &mut dst).unwrap();
        codec.encode(frame.clone(), &mut dst).unwrap();

        assert_eq!(dst.len(), 2 * frame.wire_size());
        assert_eq!(&dst[..frame.wire_size()], frame.as_bytes());
    }

    #[tokio::test]
    async fn framed_read_yields_frames_in_order() {
        let one = Frame::at_command(AtField::SleepMode, &[0x08]).unwrap();
        let two = Frame::transmit_request(&Address::from(7u64), b"async").unwrap();

        let mut wire = vec![0x13, 0x7E];
        wire.extend_from_slice(one.as_bytes());
        wire.extend_from_slice(&[0xAA, 0xBB]);
        wire.extend_from_slice(two.as_bytes());

        let mut framed = FramedRead::new(wire.as_slice(), DigiMeshCodec::new());
        assert_eq!(framed.next().await.unwrap().unwrap(), one);
        assert_eq!(framed.next().await.unwrap().unwrap(), two);
        assert!(framed.next().await.is_none());
    }

    #[tokio::test]
    async fn framed_write_then_read() {
        let frame = Frame::at_command(AtField::NodeIdentifier, b"node-7").unwrap();

        let mut framed = FramedWrite::new(Vec::new(), DigiMeshCodec::new());
        framed.send(&frame).await.unwrap();
        let wire = framed.into_inner();

        let mut framed = FramedRead::new(wire.as_slice(), DigiMeshCodec::new());
        assert_eq!(framed.next().await.unwrap().unwrap(), frame);
    }
}
