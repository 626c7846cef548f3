//! Feeds a noisy byte stream through the parser in small chunks, the way bytes
//! trickle in from a serial port, and prints every frame recovered.
//!
//! Run with:
//!   cargo run --example parse-noisy-stream

use digimesh::frame::{Address, AtField, Frame, StreamBuffer, StreamParser};
use digimesh::LocalModule;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let module = LocalModule::new();
    eprintln!("local module: {} (registered: {})", module.address(), module.is_registered());

    let requests = [
        Frame::at_command(AtField::NetworkId, &[0x0A])?,
        Frame::at_command(AtField::NodeIdentifier, b"sensor-3")?,
        Frame::transmit_request(&Address::from(0x0013_A200_4155_2F0Au64), b"temp=21.5")?,
    ];

    let mut wire = vec![0x00, 0x7E, 0x13];
    for frame in &requests {
        wire.extend_from_slice(frame.as_bytes());
        wire.extend_from_slice(&[0x7E, 0x00]);
    }

    let parser = StreamParser::new();
    let mut buffer = StreamBuffer::new();
    for chunk in wire.chunks(5) {
        buffer.extend_from_slice(chunk);
        for frame in parser.parse(&mut buffer) {
            eprintln!(
                "{} ({} bytes, checksum {:#04x}): {:02X?}",
                frame.frame_type().name(),
                frame.wire_size(),
                frame.checksum(),
                frame.data()
            );
        }
    }

    eprintln!("{} bytes left waiting for more input", buffer.len());
    Ok(())
}
