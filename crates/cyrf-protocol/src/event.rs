//! Bus events delivered by the upstream SPI decoder
//!
//! The SPI layer has already framed clock edges into bytes. It hands us two
//! kinds of events, each tagged with the sample range it covers:
//!
//! - chip-select level changes (`CS-CHANGE`)
//! - byte pairs clocked out on MOSI and in on MISO (`DATA`)
//!
//! `None` on any signal means that channel was not probed.

use std::fmt;
use std::ops::Range;

/// Logic level of a sampled signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

/// SPI signal names, used in fatal configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Probe {
    /// Chip select (active low)
    ChipSelect,
    /// Host to device data
    Mosi,
    /// Device to host data
    Miso,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::ChipSelect => write!(f, "CS#"),
            Probe::Mosi => write!(f, "MOSI"),
            Probe::Miso => write!(f, "MISO"),
        }
    }
}

/// Sample position in the capture
pub type Sample = u64;

/// One event from the SPI layer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
pub enum BusEvent {
    /// Chip-select changed level
    CsChange {
        /// First sample of the event
        start: Sample,
        /// Last sample of the event
        end: Sample,
        /// Level before the change
        previous: Option<Level>,
        /// Level after the change
        current: Option<Level>,
    },
    /// One byte clocked in each direction
    Data {
        /// First sample of the byte
        start: Sample,
        /// Last sample of the byte
        end: Sample,
        /// Byte sent by the host
        mosi: Option<u8>,
        /// Byte returned by the device
        miso: Option<u8>,
    },
}

impl BusEvent {
    /// Sample range covered by this event
    pub fn range(&self) -> Range<Sample> {
        match self {
            BusEvent::CsChange { start, end, .. } | BusEvent::Data { start, end, .. } => {
                *start..*end
            }
        }
    }

    /// Chip-select change convenience constructor
    pub fn cs_change(range: Range<Sample>, previous: Option<Level>, current: Option<Level>) -> Self {
        BusEvent::CsChange {
            start: range.start,
            end: range.end,
            previous,
            current,
        }
    }

    /// Data convenience constructor
    pub fn data(range: Range<Sample>, mosi: Option<u8>, miso: Option<u8>) -> Self {
        BusEvent::Data {
            start: range.start,
            end: range.end,
            mosi,
            miso,
        }
    }
}
