//! Annotations emitted by the decoder
//!
//! Each annotation is a labelled fact pinned to a sample range. Display
//! layers group them into rows; the decoder itself only produces them.

use std::ops::Range;

use crate::event::Sample;

/// Category of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AnnotationKind {
    /// Write command byte
    WriteCommand,
    /// Read command byte
    ReadCommand,
    /// Data written to the device
    TxData,
    /// Data read from the device
    RxData,
    /// Bus switched between 4-wire and 3-wire SPI
    WiringModeChange,
    /// Protocol anomaly
    Warning,
}

/// Display row an annotation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationRow {
    /// Write commands and their payload
    Writes,
    /// Read commands and their payload
    Reads,
    /// Bus state changes
    State,
    /// Warnings
    Warnings,
}

impl AnnotationKind {
    /// Row used to group this kind for display
    pub fn row(&self) -> AnnotationRow {
        match self {
            AnnotationKind::WriteCommand | AnnotationKind::TxData => AnnotationRow::Writes,
            AnnotationKind::ReadCommand | AnnotationKind::RxData => AnnotationRow::Reads,
            AnnotationKind::WiringModeChange => AnnotationRow::State,
            AnnotationKind::Warning => AnnotationRow::Warnings,
        }
    }

    /// Short identifier, e.g. for log export
    pub fn id(&self) -> &'static str {
        match self {
            AnnotationKind::WriteCommand => "write-command",
            AnnotationKind::ReadCommand => "read-command",
            AnnotationKind::TxData => "tx-data",
            AnnotationKind::RxData => "rx-data",
            AnnotationKind::WiringModeChange => "wiring-mode-change",
            AnnotationKind::Warning => "warning",
        }
    }
}

/// Warning texts
pub mod warning {
    /// Command byte addressed a register not in the table
    pub const UNKNOWN_ADDRESS: &str = "unknown address/register";
    /// Transaction ended before any data byte
    pub const MISSING_DATA: &str = "missing data bytes";
    /// Byte beyond the register width, or after an unknown command
    pub const EXCESS_BYTE: &str = "excess byte";
    /// Device drove MISO during the command byte
    pub const UNREQUESTED_DATA: &str = "unrequested data";
}

/// A decoded, position-tagged fact
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    /// Sample range this annotation covers
    pub range: Range<Sample>,
    /// Category
    pub kind: AnnotationKind,
    /// Display text
    pub text: String,
    /// Decoded register value, when a value decoder knows the register
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub detail: Option<String>,
    /// Raw payload bytes of data annotations
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub data: Vec<u8>,
}

impl Annotation {
    /// Create an annotation without detail text
    pub fn new(range: Range<Sample>, kind: AnnotationKind, text: impl Into<String>) -> Self {
        Self {
            range,
            kind,
            text: text.into(),
            detail: None,
            data: Vec::new(),
        }
    }

    /// Attach decoded detail text
    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    /// Attach the raw payload
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// True for warning annotations
    pub fn is_warning(&self) -> bool {
        self.kind == AnnotationKind::Warning
    }
}

/// Receiver for decoder output
pub trait AnnotationSink {
    /// Accept one annotation
    fn put(&mut self, annotation: Annotation);
}

impl AnnotationSink for Vec<Annotation> {
    fn put(&mut self, annotation: Annotation) {
        self.push(annotation);
    }
}

impl<F: FnMut(Annotation)> AnnotationSink for F {
    fn put(&mut self, annotation: Annotation) {
        (*self)(annotation)
    }
}
