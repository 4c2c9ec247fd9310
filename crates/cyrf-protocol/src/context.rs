//! Register context: the register table plus per-register value decoders
//!
//! A value decoder turns a raw register byte into a human-readable
//! description (e.g. `CHANNEL_ADR = 0x48` → `CHANNEL 72 (2.72GHz)`).
//! Decoders are plain functions owned by the context.

use std::collections::HashMap;

use crate::registers::{RegisterTable, IO_CFG_ADR, IO_CFG_SPI_3PIN};

/// Pure formatter for a register value
pub type ValueDecoder = fn(u8) -> String;

const CHANNEL_ADR: u8 = 0x00;
const CHANNEL_MASK: u8 = 0x7F;
const CHANNEL_MAX: u8 = 0x62;

/// Register table and value decoders used while decoding
#[derive(Debug, Clone)]
pub struct RegistryContext {
    table: &'static RegisterTable,
    decoders: HashMap<u8, ValueDecoder>,
}

impl RegistryContext {
    /// Context over `table` with no value decoders
    pub fn new(table: &'static RegisterTable) -> Self {
        Self {
            table,
            decoders: HashMap::new(),
        }
    }

    /// CYRF6936 table with the built-in value decoders
    pub fn cyrf6936() -> Self {
        let mut ctx = Self::new(RegisterTable::cyrf6936());
        ctx.add_decoder(CHANNEL_ADR, decode_channel);
        ctx.add_decoder(IO_CFG_ADR, decode_io_cfg);
        ctx
    }

    /// Register table in use
    pub fn table(&self) -> &'static RegisterTable {
        self.table
    }

    /// Install (or replace) the value decoder for `address`
    ///
    /// Returns false if the address is not in the table.
    pub fn add_decoder(&mut self, address: u8, decoder: ValueDecoder) -> bool {
        if self.table.lookup_by_address(address).is_none() {
            return false;
        }
        self.decoders.insert(address, decoder);
        true
    }

    /// Describe `value` as content of register `address`
    pub fn describe(&self, address: u8, value: u8) -> Option<String> {
        self.decoders.get(&address).map(|decode| decode(value))
    }
}

impl Default for RegistryContext {
    fn default() -> Self {
        Self::cyrf6936()
    }
}

fn decode_channel(value: u8) -> String {
    let ch = value & CHANNEL_MASK;
    if ch <= CHANNEL_MAX {
        let ghz = (200.0 + f64::from(ch) * 98.0 / f64::from(CHANNEL_MAX)) / 100.0;
        // Debug keeps the ".0" on whole frequencies
        format!("CHANNEL {} ({:?}GHz)", ch, ghz)
    } else {
        format!("{} (Warn: Check sane values)", ch)
    }
}

fn decode_io_cfg(value: u8) -> String {
    if value & IO_CFG_SPI_3PIN != 0 {
        "SPI 3-pin".to_string()
    } else {
        "SPI 4-pin".to_string()
    }
}
