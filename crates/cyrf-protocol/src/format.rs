//! Byte sequence formatting for annotation text

/// How bytes are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ByteFormat {
    /// Two uppercase hex digits per byte
    #[default]
    HexOnly,
    /// Printable ASCII as-is, everything else as `\xHH`
    PrintableEscaped,
}

/// Render `bytes` as a display string
pub fn format_bytes(bytes: &[u8], format: ByteFormat) -> String {
    match format {
        ByteFormat::HexOnly => bytes.iter().map(|b| format!("{:02X}", b)).collect(),
        ByteFormat::PrintableEscaped => bytes
            .iter()
            .map(|&b| {
                if is_printable(b) {
                    char::from(b).to_string()
                } else {
                    format!("\\x{:02X}", b)
                }
            })
            .collect(),
    }
}

/// Like [`format_bytes`] with [`ByteFormat::HexOnly`], prefixed with `0x`
pub fn format_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", format_bytes(bytes, ByteFormat::HexOnly))
}

// Latin-1 printable set: graphic ASCII, space, and the upper half
// except the C1 controls and the soft hyphen.
fn is_printable(b: u8) -> bool {
    match b {
        0x20..=0x7E => true,
        0xA0 | 0xAD => false,
        0xA1..=0xFF => true,
        _ => false,
    }
}
