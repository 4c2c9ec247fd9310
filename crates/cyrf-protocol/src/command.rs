//! Command byte classification
//!
//! The first byte of every SPI transaction is a command byte:
//!
//! ```text
//!  7   6   5   4   3   2   1   0
//! DIR INC [------- ADDRESS -------]
//! ```
//!
//! - `DIR`: 1 = write, 0 = read
//! - `INC`: 1 = auto-increment the address after each data byte
//! - `ADDRESS`: 6-bit register address

use std::fmt;

use crate::error::CommandError;
use crate::registers::{RegisterEntry, RegisterTable};

const ADDRESS_MASK: u8 = 0b0011_1111;
const DIR_BIT: u8 = 1 << 7;
const INC_BIT: u8 = 1 << 6;

/// Transfer direction of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Host reads register content (MISO carries the data)
    Read,
    /// Host writes register content (MOSI carries the data)
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => write!(f, "read"),
            Direction::Write => write!(f, "write"),
        }
    }
}

/// A classified command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandInfo {
    /// Target register address
    pub address: u8,
    /// Read or write
    pub direction: Direction,
    /// Auto-increment flag
    pub increment: bool,
}

impl CommandInfo {
    /// Split a command byte into its fields without checking the address
    pub fn from_bits(byte: u8) -> Self {
        Self {
            address: byte & ADDRESS_MASK,
            direction: if byte & DIR_BIT != 0 {
                Direction::Write
            } else {
                Direction::Read
            },
            increment: byte & INC_BIT != 0,
        }
    }

    /// Classify a command byte against the CYRF6936 register table
    pub fn classify(byte: u8) -> Result<Self, CommandError> {
        classify(RegisterTable::cyrf6936(), byte).map(|(info, _)| info)
    }

    /// True for write commands
    pub fn is_write(&self) -> bool {
        self.direction == Direction::Write
    }

    /// Encode back into a command byte
    pub fn to_byte(&self) -> u8 {
        let mut byte = self.address & ADDRESS_MASK;
        if self.is_write() {
            byte |= DIR_BIT;
        }
        if self.increment {
            byte |= INC_BIT;
        }
        byte
    }
}

impl TryFrom<u8> for CommandInfo {
    type Error = CommandError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::classify(value)
    }
}

/// Classify `byte` against `table`, returning the command and its register
pub fn classify(table: &RegisterTable, byte: u8) -> Result<(CommandInfo, &RegisterEntry), CommandError> {
    let info = CommandInfo::from_bits(byte);
    table
        .lookup_by_address(info.address)
        .map(|entry| (info, entry))
        .ok_or(CommandError::UnknownAddress(info.address))
}
