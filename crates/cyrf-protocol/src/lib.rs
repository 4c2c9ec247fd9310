//! CYRF6936 SPI Protocol Library
//!
//! This crate decodes the register protocol the Cypress CYRF6936 2.4 GHz
//! transceiver speaks over SPI. It sits on top of an SPI decoder that has
//! already framed the bus into chip-select changes and byte pairs, and turns
//! those into annotations naming the register accessed and the data moved.
//!
//! # Architecture
//!
//! - [`registers`]: static register table, lookup by address or name
//! - [`context`]: register table plus per-register value decoders
//! - [`command`]: command byte classification (address, direction, increment)
//! - [`format`]: byte sequence to display text
//! - [`decoder`]: the transaction state machine
//!
//! # Example
//!
//! ```rust
//! use cyrf_protocol::{Annotation, AnnotationKind, BusEvent, Decoder, DecoderConfig, Level};
//!
//! let events = [
//!     BusEvent::cs_change(0..0, Some(Level::High), Some(Level::Low)),
//!     BusEvent::data(10..18, Some(0x81), Some(0xFF)),
//!     BusEvent::data(20..28, Some(0x05), Some(0xFF)),
//!     BusEvent::cs_change(30..30, Some(Level::Low), Some(Level::High)),
//! ];
//!
//! let mut decoder = Decoder::new(DecoderConfig::default());
//! let mut annotations: Vec<Annotation> = Vec::new();
//! decoder.decode_all(&events, &mut annotations).unwrap();
//!
//! assert_eq!(annotations[0].text, "write(TX_LENGTH_ADR)");
//! assert_eq!(annotations[1].kind, AnnotationKind::TxData);
//! assert_eq!(annotations[1].text, "05");
//! ```

pub mod annotation;
pub mod command;
pub mod config;
pub mod context;
pub mod decoder;
pub mod error;
pub mod event;
pub mod format;
pub mod registers;

pub use annotation::{Annotation, AnnotationKind, AnnotationRow, AnnotationSink};
pub use command::{CommandInfo, Direction};
pub use config::{DecoderConfig, WiringMode};
pub use context::RegistryContext;
pub use decoder::{Decoder, FrameState};
pub use error::{CommandError, DecodeError, TableError};
pub use event::{BusEvent, Level, Probe, Sample};
pub use format::{format_bytes, ByteFormat};
pub use registers::{RegisterEntry, RegisterTable};
