//! JSON-lines trace files
//!
//! One [`BusEvent`] per line, serialised with its `type` tag:
//!
//! ```text
//! {"type":"cs-change","start":0,"end":0,"previous":null,"current":"High"}
//! {"type":"data","start":4,"end":20,"mosi":129,"miso":255}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::{BufRead, Write};

use cyrf_protocol::BusEvent;
use tracing::debug;

use crate::error::TraceError;

/// Read a trace, checking events are in sample order
pub fn read_trace(reader: impl BufRead) -> Result<Vec<BusEvent>, TraceError> {
    let mut events = Vec::new();
    let mut previous: Option<u64> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let event: BusEvent = serde_json::from_str(trimmed).map_err(|source| TraceError::Json {
            line: idx + 1,
            source,
        })?;

        let start = event.range().start;
        if let Some(prev) = previous {
            if start < prev {
                return Err(TraceError::OutOfOrder {
                    line: idx + 1,
                    start,
                    previous: prev,
                });
            }
        }
        previous = Some(start);
        events.push(event);
    }

    debug!("Loaded {} bus events", events.len());
    Ok(events)
}

/// Write a trace, one event per line
pub fn write_trace<'a>(
    mut writer: impl Write,
    events: impl IntoIterator<Item = &'a BusEvent>,
) -> Result<(), TraceError> {
    for event in events {
        let line = serde_json::to_string(event).map_err(|source| TraceError::Json { line: 0, source })?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}
