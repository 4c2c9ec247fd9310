//! Decoder configuration

use std::fmt;
use std::str::FromStr;

/// SPI wiring between host and transceiver
///
/// The CYRF6936 starts in 4-wire mode and can be switched to 3-wire mode
/// (MOSI and MISO sharing one line) through `IO_CFG_ADR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WiringMode {
    /// Separate MOSI and MISO lines
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "two-line"))]
    FourWire,
    /// MOSI and MISO share the SDAT line
    #[cfg_attr(feature = "serde", serde(rename = "combined-line"))]
    ThreeWire,
}

impl WiringMode {
    /// Option value used in configuration files
    pub fn option_name(&self) -> &'static str {
        match self {
            WiringMode::FourWire => "two-line",
            WiringMode::ThreeWire => "combined-line",
        }
    }

    /// Whether a valid data event must carry a MISO byte
    pub fn requires_miso(&self) -> bool {
        matches!(self, WiringMode::FourWire)
    }

    /// Whether register reads can be observed on MISO
    pub fn has_read_back(&self) -> bool {
        matches!(self, WiringMode::FourWire)
    }

    /// Mode selected by the `IO_CFG_ADR` 3-pin bit
    pub fn from_three_wire(three_wire: bool) -> Self {
        if three_wire {
            WiringMode::ThreeWire
        } else {
            WiringMode::FourWire
        }
    }

    /// True for 3-wire mode
    pub fn is_three_wire(&self) -> bool {
        matches!(self, WiringMode::ThreeWire)
    }
}

impl fmt::Display for WiringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WiringMode::FourWire => write!(f, "4-wire SPI"),
            WiringMode::ThreeWire => write!(f, "3-wire SPI"),
        }
    }
}

/// Unrecognised wiring mode option
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wiring mode: {0} (expected two-line or combined-line)")]
pub struct ParseWiringModeError(String);

impl FromStr for WiringMode {
    type Err = ParseWiringModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two-line" | "4-wire" | "4wire" => Ok(WiringMode::FourWire),
            "combined-line" | "3-wire" | "3wire" => Ok(WiringMode::ThreeWire),
            other => Err(ParseWiringModeError(other.to_string())),
        }
    }
}

/// Decoder settings, consumed once before the first event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Initial wiring mode
    #[cfg_attr(feature = "serde", serde(default))]
    pub wiring: WiringMode,
}

impl DecoderConfig {
    /// Config with the given initial wiring mode
    pub fn with_wiring(wiring: WiringMode) -> Self {
        Self { wiring }
    }
}
