//! CYRF6936 transaction decoder
//!
//! Consumes [`BusEvent`]s in capture order and emits [`Annotation`]s.
//!
//! # Framing
//! ```text
//!  Untrusted --CS rises / idle high--> Idle --CS falls--> Open --CS rises--> Idle
//! ```
//!
//! Data is only decoded while a transaction is `Open`. A capture that starts
//! with CS already low stays `Untrusted` until the first rising edge, since
//! the command byte of that transaction was never seen.
//!
//! Inside a transaction the first byte is the command byte; the bytes that
//! follow are accumulated (up to the register width) and emitted as one
//! data annotation when CS rises.
//!
//! # Wiring Mode
//! Writing `IO_CFG_ADR` with the SPI 3-pin bit set moves the bus to 3-wire
//! mode, where MISO is not used and reads come back on the shared line. In
//! 4-wire mode the same change is also observed through a read-back of the
//! register. The mode outlives transactions.

use std::ops::Range;

use tracing::{debug, info, trace, warn};

use crate::annotation::{warning, Annotation, AnnotationKind, AnnotationSink};
use crate::command::{self, CommandInfo, Direction};
use crate::config::{DecoderConfig, WiringMode};
use crate::context::RegistryContext;
use crate::error::DecodeError;
use crate::event::{BusEvent, Level, Probe, Sample};
use crate::format::{format_bytes, ByteFormat};
use crate::registers::{IO_CFG_ADR, IO_CFG_SPI_3PIN};

/// MISO filler the device clocks out while receiving a command byte
pub const MISO_IDLE: u8 = 0xFF;

/// Minimum number of data bytes after a command byte
const MIN_DATA_BYTES: usize = 1;

/// Transaction framing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No chip-select release observed yet; data is ignored
    Untrusted,
    /// CS high, no transaction in progress
    Idle,
    /// CS low, transaction in progress
    Open,
}

/// Accumulated state of the transaction in progress
#[derive(Debug, Clone, Default)]
struct Transaction {
    first_byte: bool,
    wiring: WiringMode,
    command: Option<CommandInfo>,
    name: &'static str,
    working_address: u8,
    max_bytes: usize,
    collected: Vec<(u8, Option<u8>)>,
    span: Option<Range<Sample>>,
}

impl Transaction {
    fn new(wiring: WiringMode) -> Self {
        Self {
            first_byte: true,
            wiring,
            ..Default::default()
        }
    }

    fn mosi_bytes(&self) -> Vec<u8> {
        self.collected.iter().map(|(mosi, _)| *mosi).collect()
    }

    fn miso_bytes(&self) -> Vec<u8> {
        self.collected.iter().filter_map(|(_, miso)| *miso).collect()
    }
}

/// Streaming CYRF6936 bus decoder
pub struct Decoder {
    context: RegistryContext,
    wiring: WiringMode,
    frame: FrameState,
    txn: Transaction,
    halted: bool,
    tx_count: u64,
}

impl Decoder {
    /// Create a decoder with the built-in CYRF6936 register context
    pub fn new(config: DecoderConfig) -> Self {
        Self::with_context(config, RegistryContext::cyrf6936())
    }

    /// Create a decoder with a custom register context
    pub fn with_context(config: DecoderConfig, context: RegistryContext) -> Self {
        Self {
            context,
            wiring: config.wiring,
            frame: FrameState::Untrusted,
            txn: Transaction::new(config.wiring),
            halted: false,
            tx_count: 0,
        }
    }

    /// Current wiring mode
    pub fn wiring_mode(&self) -> WiringMode {
        self.wiring
    }

    /// Current framing state
    pub fn frame_state(&self) -> FrameState {
        self.frame
    }

    /// True once a fatal configuration error stopped decoding
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of transactions completed so far
    pub fn transaction_count(&self) -> u64 {
        self.tx_count
    }

    /// Process one bus event
    ///
    /// Fatal configuration errors are returned once; after that the decoder
    /// ignores all further input.
    pub fn decode(&mut self, event: &BusEvent, sink: &mut impl AnnotationSink) -> Result<(), DecodeError> {
        if self.halted {
            return Ok(());
        }

        let result = match *event {
            BusEvent::CsChange {
                start,
                previous,
                current,
                ..
            } => self.on_cs_change(start, previous, current, sink),
            BusEvent::Data {
                start,
                end,
                mosi,
                miso,
            } => self.on_data(start..end, mosi, miso, sink),
        };

        if let Err(e) = &result {
            warn!("Decoding halted: {}", e);
            self.halted = true;
        }
        result
    }

    /// Process a sequence of events, stopping at the first fatal error
    pub fn decode_all<'a, I>(&mut self, events: I, sink: &mut impl AnnotationSink) -> Result<(), DecodeError>
    where
        I: IntoIterator<Item = &'a BusEvent>,
    {
        for event in events {
            self.decode(event, sink)?;
        }
        Ok(())
    }

    fn on_cs_change(
        &mut self,
        at: Sample,
        previous: Option<Level>,
        current: Option<Level>,
        sink: &mut impl AnnotationSink,
    ) -> Result<(), DecodeError> {
        trace!("CS {:?} -> {:?} at {}", previous, current, at);

        match (previous, current) {
            (None, None) => Err(DecodeError::MissingProbe {
                probe: Probe::ChipSelect,
            }),
            (Some(Level::Low), Some(Level::High)) => {
                if self.frame == FrameState::Open {
                    self.finish_transaction(at, sink);
                }
                self.frame = FrameState::Idle;
                Ok(())
            }
            (_, Some(Level::High)) => {
                self.frame = FrameState::Idle;
                Ok(())
            }
            (Some(Level::High), Some(Level::Low)) => {
                self.begin_transaction();
                Ok(())
            }
            (None, Some(Level::Low)) if self.frame == FrameState::Idle => {
                self.begin_transaction();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn begin_transaction(&mut self) {
        self.txn = Transaction::new(self.wiring);
        self.frame = FrameState::Open;
    }

    fn on_data(
        &mut self,
        range: Range<Sample>,
        mosi: Option<u8>,
        miso: Option<u8>,
        sink: &mut impl AnnotationSink,
    ) -> Result<(), DecodeError> {
        if self.frame != FrameState::Open {
            trace!("Ignoring data outside a transaction at {}", range.start);
            return Ok(());
        }

        let mosi = mosi.ok_or(DecodeError::MissingProbe { probe: Probe::Mosi })?;
        if self.wiring.requires_miso() && miso.is_none() {
            return Err(DecodeError::MissingProbe { probe: Probe::Miso });
        }

        if self.txn.first_byte {
            self.txn.first_byte = false;
            self.decode_command(range.clone(), mosi, sink);

            // MISO carries nothing in 3-wire mode, even when probed
            if let Some(b) = miso.filter(|_| self.wiring.has_read_back()) {
                if b != MISO_IDLE {
                    put_warning(sink, range.start..range.start, warning::UNREQUESTED_DATA);
                }
            }
            return Ok(());
        }

        let Some(cmd) = self.txn.command else {
            put_warning(sink, range, warning::EXCESS_BYTE);
            return Ok(());
        };
        if self.txn.collected.len() >= self.txn.max_bytes {
            put_warning(sink, range, warning::EXCESS_BYTE);
            return Ok(());
        }

        self.txn.collected.push((mosi, miso));
        self.txn.span = Some(match self.txn.span.take() {
            Some(span) => span.start..range.end,
            None => range.clone(),
        });

        if self.txn.working_address == IO_CFG_ADR {
            self.observe_io_cfg(cmd.direction, mosi, miso, range, sink);
        }

        // Width bound stays that of the first register; only the address moves.
        if cmd.increment {
            self.txn.working_address = self.txn.working_address.wrapping_add(1);
        }

        Ok(())
    }

    fn decode_command(&mut self, range: Range<Sample>, byte: u8, sink: &mut impl AnnotationSink) {
        match command::classify(self.context.table(), byte) {
            Ok((info, entry)) => {
                debug!(
                    "Command 0x{:02X}: {} {} (width {}, inc {})",
                    byte, info.direction, entry.name, entry.byte_width, info.increment
                );
                self.txn.command = Some(info);
                self.txn.name = entry.name;
                self.txn.working_address = info.address;
                self.txn.max_bytes = entry.byte_width as usize;

                let kind = match info.direction {
                    Direction::Write => AnnotationKind::WriteCommand,
                    Direction::Read => AnnotationKind::ReadCommand,
                };
                sink.put(Annotation::new(
                    range,
                    kind,
                    format!("{}({})", info.direction, entry.name),
                ));
            }
            Err(e) => {
                debug!("Command 0x{:02X} rejected: {}", byte, e);
                put_warning(sink, range, warning::UNKNOWN_ADDRESS);
            }
        }
    }

    fn observe_io_cfg(
        &mut self,
        direction: Direction,
        mosi: u8,
        miso: Option<u8>,
        range: Range<Sample>,
        sink: &mut impl AnnotationSink,
    ) {
        let value = match direction {
            Direction::Write => Some(mosi),
            Direction::Read if self.wiring.has_read_back() => miso,
            Direction::Read => None,
        };
        let Some(value) = value else {
            return;
        };

        let wiring = WiringMode::from_three_wire(value & IO_CFG_SPI_3PIN != 0);
        if wiring != self.wiring {
            info!("Wiring mode changed: {} -> {}", self.wiring, wiring);
            self.wiring = wiring;
            sink.put(Annotation::new(
                range,
                AnnotationKind::WiringModeChange,
                format!("{} ({})", wiring, wiring.option_name()),
            ));
        }
    }

    fn finish_transaction(&mut self, at: Sample, sink: &mut impl AnnotationSink) {
        let txn = std::mem::replace(&mut self.txn, Transaction::new(self.wiring));
        self.tx_count += 1;

        let Some(cmd) = txn.command else {
            return;
        };

        if txn.collected.len() < MIN_DATA_BYTES {
            put_warning(sink, at..at, warning::MISSING_DATA);
            return;
        }
        let Some(span) = txn.span.clone() else {
            return;
        };

        // 3-wire reads come back on the shared line, which the SPI layer
        // reports as MOSI. The mode at CS fall decides which side was sampled.
        let (kind, data) = match cmd.direction {
            Direction::Write => (AnnotationKind::TxData, txn.mosi_bytes()),
            Direction::Read if txn.wiring.is_three_wire() => (AnnotationKind::RxData, txn.mosi_bytes()),
            Direction::Read => (AnnotationKind::RxData, txn.miso_bytes()),
        };

        debug!("{}({}) = {:02X?}", cmd.direction, txn.name, data);

        let detail = match data.as_slice() {
            [value] => self.context.describe(cmd.address, *value),
            _ => None,
        };
        let text = format_bytes(&data, ByteFormat::HexOnly);
        sink.put(
            Annotation::new(span, kind, text)
                .with_detail(detail)
                .with_data(data),
        );
    }
}

fn put_warning(sink: &mut impl AnnotationSink, range: Range<Sample>, text: &'static str) {
    warn!("{} at sample {}", text, range.start);
    sink.put(Annotation::new(range, AnnotationKind::Warning, text));
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}
