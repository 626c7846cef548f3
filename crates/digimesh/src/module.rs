use digimesh_frame::codec::Frame;
use digimesh_frame::inspect::AtStatus;
use digimesh_frame::{Address, AtField};
use tracing::debug;

/// The radio module attached to this host.
///
/// Starts out unregistered (all-`0xFF` address) until the module's serial
/// number has been learned, usually from its `SH`/`SL` responses.
#[derive(Debug, Clone, Default)]
pub struct LocalModule {
    address: Address,
    serial_high: Option<[u8; 4]>,
}

impl LocalModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the module's 64-bit address.
    pub fn register(&mut self, address: Address) {
        debug!(%address, "local module registered");
        self.address = address;
        self.serial_high = None;
    }

    pub fn is_registered(&self) -> bool {
        !self.address.is_unregistered()
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Feed a received frame. Successful `SH` and `SL` responses are collected
    /// and the module registers itself once both halves are known.
    ///
    /// Returns `true` when this frame completed registration.
    pub fn observe(&mut self, frame: &Frame) -> bool {
        let (Some(field), Some(AtStatus::Ok), Some(value)) = (
            frame.at_response_command(),
            frame.at_response_status(),
            frame.at_response_value(),
        ) else {
            return false;
        };

        match field {
            AtField::SerialHigh => {
                self.serial_high = Address::from_serial_halves(value, &[])
                    .and_then(|partial| partial.as_bytes()[..4].try_into().ok());
                false
            }
            AtField::SerialLow => {
                let Some(high) = self.serial_high else {
                    return false;
                };
                match Address::from_serial_halves(&high, value) {
                    Some(address) => {
                        self.register(address);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}
