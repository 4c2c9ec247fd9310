//! CYRF6936 Bus Simulation Library
//!
//! Synthesises the bus events an SPI decoder would produce for CYRF6936
//! register traffic, so the protocol decoder can be driven without a logic
//! analyser capture. It includes:
//!
//! - **TraceBuilder**: fluent builder for register reads/writes
//! - **read_trace / write_trace**: JSON-lines trace files
//!
//! # Example
//!
//! ```rust
//! use cyrf_sim::TraceBuilder;
//! use cyrf_protocol::{Decoder, DecoderConfig, Annotation};
//!
//! let events = TraceBuilder::default()
//!     .write(0x00, &[0x48]) // CHANNEL_ADR
//!     .read(0x00, 1)
//!     .build();
//!
//! let mut decoder = Decoder::new(DecoderConfig::default());
//! let mut out: Vec<Annotation> = Vec::new();
//! decoder.decode_all(&events, &mut out).unwrap();
//! assert_eq!(out.len(), 4);
//! ```

pub mod error;
pub mod io;
pub mod trace;

pub use error::TraceError;
pub use io::{read_trace, write_trace};
pub use trace::{TraceBuilder, TraceConfig};
