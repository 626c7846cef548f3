//! DigiMesh/XBee API frames for serial radio links.
//!
//! # Crate Structure
//!
//! - [`frame`] - Frame encoding, field validation, stream parsing and inspection
//! - [`module`] - Identity of the locally attached radio module

/// Re-export frame types.
pub mod frame {
    pub use digimesh_frame::*;
}

pub mod module;

pub use module::LocalModule;
