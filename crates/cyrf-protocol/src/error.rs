//! Error types for CYRF6936 bus decoding

use thiserror::Error;

use crate::event::Probe;

/// Errors from classifying a command byte
///
/// These are recoverable: the decoder reports them as warning annotations
/// and keeps going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The address bits do not name a known register
    #[error("unknown register address: 0x{0:02X}")]
    UnknownAddress(u8),
}

/// Fatal decoder errors
///
/// These indicate a capture setup mistake (wrong or missing channel) rather
/// than a bus anomaly. Once one is returned the decoder stops for good.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A signal the current wiring mode depends on is not probed
    #[error("{probe} pin required")]
    MissingProbe { probe: Probe },
}

/// Errors from building a custom register table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Two entries share an address
    #[error("duplicate register address: 0x{0:02X}")]
    DuplicateAddress(u8),

    /// Two entries share a name
    #[error("duplicate register name: {0}")]
    DuplicateName(String),

    /// Address does not fit in 6 bits
    #[error("register address out of range: 0x{0:02X}")]
    AddressOutOfRange(u8),
}
