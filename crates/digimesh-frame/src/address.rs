use std::fmt;

/// Bytes in a module serial number.
pub const ADDRESS_LEN: usize = 8;

/// 64-bit module serial number, used as its network address.
///
/// Stored big-endian, exactly as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Marker for "no module registered".
    pub const UNREGISTERED: Address = Address([0xFF; ADDRESS_LEN]);

    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Assemble an address from the values returned for the `SH` and `SL`
    /// queries (four bytes each, big-endian).
    ///
    /// Returns `None` if either half is longer than four bytes. Shorter halves
    /// are left-padded with zeros, as modules drop leading zero bytes.
    pub fn from_serial_halves(high: &[u8], low: &[u8]) -> Option<Self> {
        if high.len() > 4 || low.len() > 4 {
            return None;
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[4 - high.len()..4].copy_from_slice(high);
        bytes[ADDRESS_LEN - low.len()..].copy_from_slice(low);
        Some(Self(bytes))
    }

    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_unregistered(&self) -> bool {
        *self == Self::UNREGISTERED
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::UNREGISTERED
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self(value.to_be_bytes())
    }
}

impl From<Address> for u64 {
    fn from(address: Address) -> Self {
        u64::from_be_bytes(address.0)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = std::array::TryFromSliceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(bytes.try_into()?))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", u64::from(*self))
    }
}
