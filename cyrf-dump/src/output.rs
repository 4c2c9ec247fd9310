//! Annotation printing

use std::io::Write;

use cyrf_protocol::format::format_hex_prefixed;
use cyrf_protocol::{format_bytes, Annotation, AnnotationKind, AnnotationRow, ByteFormat, RegisterEntry};
use cyrf_protocol::registers::ResetValue;

use crate::settings::{OutputFormat, Settings};

/// Check if an annotation passes the current filters
pub fn passes_filter(settings: &Settings, annotation: &Annotation) -> bool {
    settings.show_warnings || !annotation.is_warning()
}

fn row_label(row: AnnotationRow) -> &'static str {
    match row {
        AnnotationRow::Writes => "writes",
        AnnotationRow::Reads => "reads",
        AnnotationRow::State => "state",
        AnnotationRow::Warnings => "warnings",
    }
}

/// Format an annotation as a text line
pub fn format_text(settings: &Settings, annotation: &Annotation) -> String {
    let mut line = format!(
        "{:>10}-{:<10} {:<8} {:<18} {}",
        annotation.range.start,
        annotation.range.end,
        row_label(annotation.kind.row()),
        annotation.kind.id(),
        annotation.text
    );

    if settings.show_decoded {
        if let Some(detail) = &annotation.detail {
            line.push_str(&format!(" [{}]", detail));
        }
    }

    let is_data = matches!(annotation.kind, AnnotationKind::TxData | AnnotationKind::RxData);
    if settings.show_ascii && is_data && !annotation.data.is_empty() {
        line.push_str(&format!(
            " \"{}\"",
            format_bytes(&annotation.data, ByteFormat::PrintableEscaped)
        ));
    }

    line
}

/// Write one annotation in the configured format
pub fn write_annotation(
    out: &mut impl Write,
    settings: &Settings,
    annotation: &Annotation,
) -> std::io::Result<()> {
    if !passes_filter(settings, annotation) {
        return Ok(());
    }
    match settings.format {
        OutputFormat::Text => writeln!(out, "{}", format_text(settings, annotation)),
        OutputFormat::Json => {
            let json = serde_json::to_string(annotation).map_err(std::io::Error::other)?;
            writeln!(out, "{}", json)
        }
    }
}

/// Format a register table row
pub fn format_register(entry: &RegisterEntry) -> String {
    let reset = match entry.reset_value {
        ResetValue::Bits(bits) => bits.to_string(),
        ResetValue::Value(v) => {
            let bytes = v.to_be_bytes();
            let width = (entry.byte_width as usize).min(bytes.len());
            format_hex_prefixed(&bytes[bytes.len() - width..])
        }
    };
    format!(
        "0x{:02X}  {:<20} {:>2}  {:<16}  {}",
        entry.address, entry.name, entry.byte_width, entry.access_pattern, reset
    )
}
