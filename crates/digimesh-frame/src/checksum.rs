//! The single-byte additive checksum closing every API frame.

/// Compute the checksum over the bytes from the frame type through the end of
/// the body: `0xFF` minus the 8-bit sum.
pub fn checksum(body: &[u8]) -> u8 {
    let sum = body.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    0xFF - sum
}

/// Check the trailing byte of a complete wire frame against its body.
///
/// `frame` must span start delimiter through checksum. Buffers shorter than a
/// minimal frame never verify.
pub fn verify(frame: &[u8]) -> bool {
    match frame {
        [_, _, _, body @ .., trailer] if !body.is_empty() => checksum(body) == *trailer,
        _ => false,
    }
}
