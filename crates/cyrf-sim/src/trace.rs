//! Bus trace builder
//!
//! Produces the event stream an SPI decoder would emit for a sequence of
//! register accesses, with monotonically increasing sample positions.

use std::collections::HashMap;

use cyrf_protocol::registers::{IO_CFG_ADR, IO_CFG_SPI_3PIN};
use cyrf_protocol::{BusEvent, CommandInfo, Direction, Level, RegisterTable, Sample, WiringMode};
use serde::{Deserialize, Serialize};

/// MISO value clocked out by the device while it receives
const MISO_FILLER: u8 = 0xFF;

/// Timing and wiring of a synthetic trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Samples per byte
    pub byte_samples: u64,
    /// Idle samples between bytes and around CS edges
    pub gap_samples: u64,
    /// Wiring mode at the start of the trace
    pub wiring: WiringMode,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            byte_samples: 16,
            gap_samples: 4,
            wiring: WiringMode::FourWire,
        }
    }
}

/// Builds an ordered list of [`BusEvent`]s
///
/// Keeps a mirror of written register contents so reads return what was
/// last written (or zeros). Writing `IO_CFG_ADR` switches the wiring of all
/// later transactions, as the real device does.
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    config: TraceConfig,
    wiring: WiringMode,
    cursor: Sample,
    events: Vec<BusEvent>,
    registers: HashMap<u8, Vec<u8>>,
}

impl TraceBuilder {
    /// Start a trace with chip-select idle high
    pub fn new(config: TraceConfig) -> Self {
        let mut builder = Self::without_idle(config);
        builder.push_cs(None, Some(Level::High));
        builder
    }

    /// Start a trace with no initial chip-select event
    pub fn without_idle(config: TraceConfig) -> Self {
        Self {
            config,
            wiring: config.wiring,
            cursor: 0,
            events: Vec::new(),
            registers: HashMap::new(),
        }
    }

    /// Wiring mode the next transaction will use
    pub fn wiring(&self) -> WiringMode {
        self.wiring
    }

    /// Current sample position
    pub fn cursor(&self) -> Sample {
        self.cursor
    }

    /// Write `data` to `address` (auto-increment off)
    pub fn write(self, address: u8, data: &[u8]) -> Self {
        self.access(address, Direction::Write, false, data)
    }

    /// Write `data` starting at `address` with auto-increment
    pub fn write_burst(self, address: u8, data: &[u8]) -> Self {
        self.access(address, Direction::Write, true, data)
    }

    /// Read `len` bytes from `address`, answered from the register mirror
    pub fn read(self, address: u8, len: usize) -> Self {
        let mut response = self.registers.get(&address).cloned().unwrap_or_default();
        response.resize(len, 0);
        self.read_with(address, &response)
    }

    /// Read from `address` with an explicit device response
    pub fn read_with(self, address: u8, response: &[u8]) -> Self {
        self.access(address, Direction::Read, false, response)
    }

    /// One complete transaction from a command and its data bytes
    pub fn access(mut self, address: u8, direction: Direction, increment: bool, data: &[u8]) -> Self {
        let command = CommandInfo {
            address,
            direction,
            increment,
        };

        // The mode used for framing is the one in effect when CS falls.
        let wiring = self.wiring;
        self.push_cs(Some(Level::High), Some(Level::Low));
        self.push_byte(command.to_byte(), MISO_FILLER, false, wiring);

        for &b in data {
            match direction {
                Direction::Write => self.push_byte(b, MISO_FILLER, false, wiring),
                // Host clocks zeros while the device answers
                Direction::Read => self.push_byte(0x00, b, true, wiring),
            }
        }

        self.push_cs(Some(Level::Low), Some(Level::High));

        if direction == Direction::Write {
            self.mirror_write(address, data);
        }
        self
    }

    /// Transaction with raw MOSI/MISO pairs, bypassing command encoding
    pub fn raw(mut self, bytes: &[(Option<u8>, Option<u8>)]) -> Self {
        self.push_cs(Some(Level::High), Some(Level::Low));
        for &(mosi, miso) in bytes {
            self.push_event(BusEvent::data(self.byte_range(), mosi, miso), self.config.byte_samples);
        }
        self.push_cs(Some(Level::Low), Some(Level::High));
        self
    }

    /// Append an arbitrary event at the cursor
    pub fn event(mut self, event: BusEvent) -> Self {
        let len = event.range().end.saturating_sub(event.range().start);
        self.events.push(event);
        self.cursor += len + self.config.gap_samples;
        self
    }

    /// Append a chip-select change at the cursor
    pub fn cs(mut self, previous: Option<Level>, current: Option<Level>) -> Self {
        self.push_cs(previous, current);
        self
    }

    /// Finish the trace
    pub fn build(self) -> Vec<BusEvent> {
        self.events
    }

    fn byte_range(&self) -> std::ops::Range<Sample> {
        self.cursor..self.cursor + self.config.byte_samples
    }

    fn push_event(&mut self, event: BusEvent, len: u64) {
        self.events.push(event);
        self.cursor += len + self.config.gap_samples;
    }

    fn push_cs(&mut self, previous: Option<Level>, current: Option<Level>) {
        let at = self.cursor;
        self.push_event(BusEvent::cs_change(at..at, previous, current), 0);
    }

    fn push_byte(&mut self, mosi: u8, miso: u8, device_drives: bool, wiring: WiringMode) {
        // In 3-wire mode both directions share SDAT, reported as MOSI
        let event = match (wiring, device_drives) {
            (WiringMode::FourWire, _) => BusEvent::data(self.byte_range(), Some(mosi), Some(miso)),
            (WiringMode::ThreeWire, true) => BusEvent::data(self.byte_range(), Some(miso), None),
            (WiringMode::ThreeWire, false) => BusEvent::data(self.byte_range(), Some(mosi), None),
        };
        self.push_event(event, self.config.byte_samples);
    }

    fn mirror_write(&mut self, address: u8, data: &[u8]) {
        if address == IO_CFG_ADR {
            if let Some(&value) = data.first() {
                self.wiring = WiringMode::from_three_wire(value & IO_CFG_SPI_3PIN != 0);
            }
        }

        let width = RegisterTable::cyrf6936()
            .lookup_by_address(address)
            .map(|r| r.byte_width as usize)
            .unwrap_or(data.len());
        let mut value = data.to_vec();
        value.truncate(width);
        self.registers.insert(address, value);
    }
}

impl Default for TraceBuilder {
    fn default() -> Self {
        Self::new(TraceConfig::default())
    }
}
