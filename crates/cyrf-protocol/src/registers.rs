//! CYRF6936 register table
//!
//! Static description of every register the transceiver exposes over SPI:
//! address, name, width in bytes, per-bit access pattern and reset value.
//!
//! # Access Pattern
//! Single-byte registers carry one marker per bit, MSB first:
//! - `b`: read/write
//! - `r`: read only
//! - `w`: write only
//! - `-`: reserved
//!
//! Multi-byte registers (buffers, codes) carry one uppercase marker per byte.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::TableError;

/// Number of addressable registers (6-bit address space)
pub const ADDRESS_SPACE: usize = 64;

/// Address of the IO configuration register
pub const IO_CFG_ADR: u8 = 0x0D;

/// SPI 3-pin mode bit in `IO_CFG_ADR`
pub const IO_CFG_SPI_3PIN: u8 = 0x02;

/// Access marker for a single bit (or byte, for multi-byte registers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Access {
    /// Readable and writable
    ReadWrite,
    /// Read only
    ReadOnly,
    /// Write only
    WriteOnly,
    /// Reserved / unused
    Reserved,
}

impl Access {
    fn from_marker(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'b' => Self::ReadWrite,
            'r' => Self::ReadOnly,
            'w' => Self::WriteOnly,
            _ => Self::Reserved,
        }
    }

    /// Whether the host may read this bit
    pub fn is_readable(&self) -> bool {
        matches!(self, Self::ReadWrite | Self::ReadOnly)
    }

    /// Whether the host may write this bit
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::ReadWrite | Self::WriteOnly)
    }
}

/// Register content after reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetValue {
    /// Per-bit pattern; `-` marks undefined bits
    Bits(&'static str),
    /// Full multi-byte value
    Value(u128),
}

/// One entry of the register table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterEntry {
    /// 6-bit register address
    pub address: u8,
    /// Datasheet name, e.g. `TX_LENGTH_ADR`
    pub name: &'static str,
    /// Number of data bytes a single access transfers
    pub byte_width: u32,
    /// Access markers, see module docs
    pub access_pattern: &'static str,
    /// Content after reset
    pub reset_value: ResetValue,
}

impl RegisterEntry {
    const fn new(
        address: u8,
        name: &'static str,
        byte_width: u32,
        access_pattern: &'static str,
        reset_value: ResetValue,
    ) -> Self {
        Self {
            address,
            name,
            byte_width,
            access_pattern,
            reset_value,
        }
    }

    /// Access markers, MSB (or first byte) first
    pub fn access(&self) -> impl Iterator<Item = Access> + '_ {
        self.access_pattern.chars().map(Access::from_marker)
    }

    /// True if no bit of this register can be written by the host
    pub fn is_read_only(&self) -> bool {
        self.access().all(|a| !a.is_writable())
    }
}

use ResetValue::{Bits, Value};

/// Register map of the CYRF6936
#[rustfmt::skip]
pub static REGISTERS: &[RegisterEntry] = &[
    RegisterEntry::new(0x00, "CHANNEL_ADR",          1, "-bbbbbbb", Bits("-1001000")),
    RegisterEntry::new(0x01, "TX_LENGTH_ADR",        1, "bbbbbbbb", Bits("00000000")),
    RegisterEntry::new(0x02, "TX_CTRL_ADR",          1, "bbbbbbbb", Bits("00000011")),
    RegisterEntry::new(0x03, "TX_CFG_ADR",           1, "--bbbbbb", Bits("--000101")),
    RegisterEntry::new(0x04, "TX_IRQ_STATUS_ADR",    1, "rrrrrrrr", Bits("--------")),
    RegisterEntry::new(0x05, "RX_CTRL_ADR",          1, "bbbbbbbb", Bits("00000111")),
    RegisterEntry::new(0x06, "RX_CFG_ADR",           1, "bbbbb-bb", Bits("10010-10")),
    RegisterEntry::new(0x07, "RX_IRQ_STATUS_ADR",    1, "brrrrrrr", Bits("--------")),
    RegisterEntry::new(0x08, "RX_STATUS_ADR",        1, "rrrrrrrr", Bits("--------")),
    RegisterEntry::new(0x09, "RX_COUNT_ADR",         1, "rrrrrrrr", Bits("00000000")),
    RegisterEntry::new(0x0A, "RX_LENGTH_ADR",        1, "rrrrrrrr", Bits("00000000")),
    RegisterEntry::new(0x0B, "PWR_CTRL_ADR",         1, "bbb-bbbb", Bits("10100000")),
    RegisterEntry::new(0x0C, "XTAL_CTRL_ADR",        1, "bbb--bbb", Bits("000--100")),
    RegisterEntry::new(0x0D, "IO_CFG_ADR",           1, "bbbbbbbb", Bits("00000000")),
    RegisterEntry::new(0x0E, "GPIO_CTRL_ADR",        1, "bbbbrrrr", Bits("0000----")),
    RegisterEntry::new(0x0F, "XACT_CFG_ADR",         1, "b-bbbbbb", Bits("1-000000")),
    RegisterEntry::new(0x10, "FRAMING_CFG_ADR",      1, "bbbbbbbb", Bits("10100101")),
    RegisterEntry::new(0x11, "DATA32_THOLD_ADR",     1, "----bbbb", Bits("----0100")),
    RegisterEntry::new(0x12, "DATA64_THOLD_ADR",     1, "---bbbbb", Bits("---01010")),
    RegisterEntry::new(0x13, "RSSI_ADR",             1, "r-rrrrrr", Bits("0-100000")),
    RegisterEntry::new(0x14, "EOP_CTRL_ADR",         1, "bbbbbbbb", Bits("10100100")),
    RegisterEntry::new(0x15, "CRC_SEED_LSB_ADR",     1, "bbbbbbbb", Bits("00000000")),
    RegisterEntry::new(0x16, "CRC_SEED_MSB_ADR",     1, "bbbbbbbb", Bits("00000000")),
    RegisterEntry::new(0x17, "TX_CRC_LSB_ADR",       1, "rrrrrrrr", Bits("--------")),
    RegisterEntry::new(0x18, "TX_CRC_MSB_ADR",       1, "rrrrrrrr", Bits("--------")),
    RegisterEntry::new(0x19, "RX_CRC_LSB_ADR",       1, "rrrrrrrr", Bits("11111111")),
    RegisterEntry::new(0x1A, "RX_CRC_MSB_ADR",       1, "rrrrrrrr", Bits("11111111")),
    RegisterEntry::new(0x1B, "TX_OFFSET_LSB_ADR",    1, "bbbbbbbb", Bits("00000000")),
    RegisterEntry::new(0x1C, "TX_OFFSET_MSB_ADR",    1, "----bbbb", Bits("----0000")),
    RegisterEntry::new(0x1D, "MODE_OVERRIDE_ADR",    1, "wwwww--w", Bits("00000--0")),
    RegisterEntry::new(0x1E, "RX_OVERRIDE_ADR",      1, "bbbbbbb-", Bits("0000000-")),
    RegisterEntry::new(0x1F, "TX_OVERRIDE_ADR",      1, "bbbbbbbb", Bits("00000000")),
    RegisterEntry::new(0x20, "TX_BUFFER_ADR",       16, "WWWWWWWWWWWWWWWW", Bits("----------------")),
    RegisterEntry::new(0x21, "RX_BUFFER_ADR",       16, "RRRRRRRRRRRRRRRR", Bits("----------------")),
    RegisterEntry::new(0x22, "SOP_CODE_ADR",         8, "BBBBBBBB", Value(0x17FF_9E21_3690_C782)),
    RegisterEntry::new(0x23, "DATA_CODE_ADR",       16, "BBBBBBBBBBBBBBBB", Value(0x02F9_9397_02FA_5CE3_012B_F1DB_0132_BE6F)),
    RegisterEntry::new(0x24, "PREAMBLE_ADR",         3, "BBB", Value(0x33_3302)),
    RegisterEntry::new(0x25, "MFG_ID_ADR",           6, "RRRRRR", Bits("------")),
    RegisterEntry::new(0x26, "XTAL_CFG_ADR",         1, "wwwwwwww", Bits("00000000")),
    RegisterEntry::new(0x27, "CLK_OFFSET_ADR",       1, "wwwwwwww", Bits("00000000")),
    RegisterEntry::new(0x28, "CLK_EN_ADR",           1, "wwwwwwww", Bits("00000000")),
    RegisterEntry::new(0x29, "RX_ABORT_ADR",         1, "wwwwwwww", Bits("00000000")),
    RegisterEntry::new(0x32, "AUTO_CAL_TIME_ADR",    1, "wwwwwwww", Bits("00000011")),
    RegisterEntry::new(0x35, "AUTO_CAL_OFFSET_ADR",  1, "wwwwwwww", Bits("00000000")),
    RegisterEntry::new(0x39, "ANALOG_CTRL_ADR",      1, "wwwwwwww", Bits("00000000")),
];

/// Indexed view over a register list
///
/// Lookups by address and by name resolve to the same [`RegisterEntry`].
#[derive(Debug, Clone)]
pub struct RegisterTable {
    entries: &'static [RegisterEntry],
    by_address: [Option<usize>; ADDRESS_SPACE],
    by_name: HashMap<&'static str, usize>,
}

impl RegisterTable {
    /// Build a table from a register list, rejecting duplicates
    pub fn new(entries: &'static [RegisterEntry]) -> Result<Self, TableError> {
        let mut by_address = [None; ADDRESS_SPACE];
        let mut by_name = HashMap::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            let slot = by_address
                .get_mut(entry.address as usize)
                .ok_or(TableError::AddressOutOfRange(entry.address))?;
            if slot.is_some() {
                return Err(TableError::DuplicateAddress(entry.address));
            }
            *slot = Some(idx);

            if by_name.insert(entry.name, idx).is_some() {
                return Err(TableError::DuplicateName(entry.name.to_string()));
            }
        }

        Ok(Self {
            entries,
            by_address,
            by_name,
        })
    }

    /// The CYRF6936 register table, built on first use
    pub fn cyrf6936() -> &'static RegisterTable {
        static TABLE: OnceLock<RegisterTable> = OnceLock::new();
        TABLE.get_or_init(|| match RegisterTable::new(REGISTERS) {
            Ok(table) => table,
            Err(e) => unreachable!("built-in register table is invalid: {e}"),
        })
    }

    /// Look up a register by its 6-bit address
    pub fn lookup_by_address(&self, address: u8) -> Option<&RegisterEntry> {
        let idx = (*self.by_address.get(address as usize)?)?;
        self.entries.get(idx)
    }

    /// Look up a register by its datasheet name
    pub fn lookup_by_name(&self, name: &str) -> Option<&RegisterEntry> {
        self.by_name.get(name).and_then(|&idx| self.entries.get(idx))
    }

    /// All registers in table order
    pub fn iter(&self) -> impl Iterator<Item = &RegisterEntry> {
        self.entries.iter()
    }

    /// Number of registers in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no registers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
