//! Integration tests for the CYRF6936 decoder
//!
//! These tests drive the decoder with synthetic traces and verify:
//! - Command and data annotations for reads and writes
//! - Warning policy (unknown register, missing data, excess bytes)
//! - Wiring mode switching through IO_CFG_ADR
//! - Fatal configuration errors

use cyrf_protocol::annotation::warning;
use cyrf_protocol::registers::{IO_CFG_ADR, IO_CFG_SPI_3PIN};
use cyrf_protocol::{
    Annotation, AnnotationKind, BusEvent, DecodeError, Decoder, DecoderConfig, Direction, Level,
    Probe, WiringMode,
};
use cyrf_sim::{TraceBuilder, TraceConfig};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    /// Decode a full trace with a fresh decoder
    pub fn decode(config: DecoderConfig, events: &[BusEvent]) -> (Decoder, Vec<Annotation>) {
        let mut decoder = Decoder::new(config);
        let mut out = Vec::new();
        decoder.decode_all(events, &mut out).unwrap();
        (decoder, out)
    }

    /// Annotations of one kind
    pub fn of_kind(out: &[Annotation], kind: AnnotationKind) -> Vec<&Annotation> {
        out.iter().filter(|a| a.kind == kind).collect()
    }

    /// Warning texts in emission order
    pub fn warnings(out: &[Annotation]) -> Vec<&str> {
        out.iter()
            .filter(|a| a.is_warning())
            .map(|a| a.text.as_str())
            .collect()
    }

    /// Sample range of the data event at `idx` in `events`
    pub fn data_range(events: &[BusEvent], idx: usize) -> std::ops::Range<u64> {
        let data: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, BusEvent::Data { .. }))
            .collect();
        data[idx].range()
    }
}

use helpers::*;

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn write_tx_length() {
        let events = TraceBuilder::default().write(0x01, &[0x05]).build();
        let (_, out) = decode(DecoderConfig::default(), &events);

        assert_eq!(out.len(), 2);

        let cmd = &out[0];
        assert_eq!(cmd.kind, AnnotationKind::WriteCommand);
        assert_eq!(cmd.text, "write(TX_LENGTH_ADR)");
        assert_eq!(cmd.range, data_range(&events, 0));

        let data = &out[1];
        assert_eq!(data.kind, AnnotationKind::TxData);
        assert_eq!(data.text, "05");
        assert_eq!(data.range, data_range(&events, 1));
    }

    #[test]
    fn io_cfg_write_enters_three_wire() {
        let events = TraceBuilder::default()
            .write(IO_CFG_ADR, &[IO_CFG_SPI_3PIN])
            .build();
        let (decoder, out) = decode(DecoderConfig::default(), &events);

        let cmd = of_kind(&out, AnnotationKind::WriteCommand);
        assert_eq!(cmd.len(), 1);
        assert_eq!(cmd[0].text, "write(IO_CFG_ADR)");

        let data = of_kind(&out, AnnotationKind::TxData);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].text, "02");

        let change = of_kind(&out, AnnotationKind::WiringModeChange);
        assert_eq!(change.len(), 1);
        assert_eq!(change[0].text, "3-wire SPI (combined-line)");

        assert_eq!(decoder.wiring_mode(), WiringMode::ThreeWire);
    }

    #[test]
    fn three_wire_persists_for_later_transactions() {
        // After the switch the trace drops MISO; the decoder must accept that.
        let events = TraceBuilder::default()
            .write(IO_CFG_ADR, &[IO_CFG_SPI_3PIN])
            .write(0x01, &[0x10])
            .read_with(0x13, &[0x2A])
            .build();
        let (decoder, out) = decode(DecoderConfig::default(), &events);

        assert!(decoder.wiring_mode().is_three_wire());
        let tx = of_kind(&out, AnnotationKind::TxData);
        assert_eq!(tx.last().unwrap().text, "10");
        let rx = of_kind(&out, AnnotationKind::RxData);
        assert_eq!(rx.len(), 1);
        assert_eq!(rx[0].text, "2A");
        assert!(warnings(&out).is_empty());
    }

    #[test]
    fn switch_back_to_four_wire() {
        let events = TraceBuilder::default()
            .write(IO_CFG_ADR, &[IO_CFG_SPI_3PIN])
            .write(IO_CFG_ADR, &[0x00])
            .write(0x01, &[0x03])
            .build();
        let (decoder, out) = decode(DecoderConfig::default(), &events);

        let changes: Vec<_> = of_kind(&out, AnnotationKind::WiringModeChange)
            .iter()
            .map(|a| a.text.clone())
            .collect();
        assert_eq!(
            changes,
            vec!["3-wire SPI (combined-line)", "4-wire SPI (two-line)"]
        );
        assert_eq!(decoder.wiring_mode(), WiringMode::FourWire);
    }

    #[test]
    fn unknown_address_without_data() {
        let events = TraceBuilder::default()
            .raw(&[(Some(0x3F), Some(0xFF))])
            .build();
        let (_, out) = decode(DecoderConfig::default(), &events);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, AnnotationKind::Warning);
        assert_eq!(out[0].text, warning::UNKNOWN_ADDRESS);
    }

    #[test]
    fn unprobed_chip_select_halts() {
        let events = TraceBuilder::without_idle(TraceConfig::default())
            .cs(None, None)
            .write(0x01, &[0x05])
            .build();

        let mut decoder = Decoder::new(DecoderConfig::default());
        let mut out = Vec::new();
        let err = decoder.decode_all(&events, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "CS# pin required");
        assert_eq!(
            err,
            DecodeError::MissingProbe {
                probe: Probe::ChipSelect
            }
        );

        // Feeding the rest event by event still yields nothing
        for event in &events[1..] {
            decoder.decode(event, &mut out).unwrap();
        }
        assert!(out.is_empty());
        assert!(decoder.is_halted());
    }
}

// ============================================================================
// Reads, Bursts and Warnings
// ============================================================================

mod transactions {
    use super::*;

    #[test]
    fn read_back_written_value() {
        let events = TraceBuilder::default()
            .write(0x00, &[0x48])
            .read(0x00, 1)
            .build();
        let (_, out) = decode(DecoderConfig::default(), &events);

        let read = of_kind(&out, AnnotationKind::ReadCommand);
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].text, "read(CHANNEL_ADR)");

        let rx = of_kind(&out, AnnotationKind::RxData);
        assert_eq!(rx[0].text, "48");
        assert_eq!(rx[0].detail.as_deref(), Some("CHANNEL 72 (2.72GHz)"));
    }

    #[test]
    fn tx_buffer_burst() {
        let payload: Vec<u8> = (0u8..16).collect();
        let events = TraceBuilder::default().write_burst(0x20, &payload).build();
        let (_, out) = decode(DecoderConfig::default(), &events);

        assert_eq!(out[0].text, "write(TX_BUFFER_ADR)");
        let data = of_kind(&out, AnnotationKind::TxData);
        assert_eq!(data[0].text, "000102030405060708090A0B0C0D0E0F");
        assert_eq!(data[0].data, payload);
        // Multi-byte payloads have no value decoder
        assert!(data[0].detail.is_none());
        // Span covers first to last data byte
        assert_eq!(data[0].range.start, data_range(&events, 1).start);
        assert_eq!(data[0].range.end, data_range(&events, 16).end);
    }

    #[test]
    fn tx_buffer_overflow_flags_excess() {
        let payload = [0xAAu8; 18];
        let events = TraceBuilder::default().write(0x20, &payload).build();
        let (_, out) = decode(DecoderConfig::default(), &events);

        assert_eq!(warnings(&out), vec![warning::EXCESS_BYTE, warning::EXCESS_BYTE]);
        let data = of_kind(&out, AnnotationKind::TxData);
        assert_eq!(data[0].data.len(), 16);
    }

    #[test]
    fn mfg_id_read() {
        let id = [0xA5, 0x5A, 0x01, 0x02, 0x03, 0x04];
        let events = TraceBuilder::default().read_with(0x25, &id).build();
        let (_, out) = decode(DecoderConfig::default(), &events);

        assert_eq!(out[0].kind, AnnotationKind::ReadCommand);
        assert_eq!(out[0].text, "read(MFG_ID_ADR)");
        assert_eq!(out[1].text, "A55A01020304");
    }

    #[test]
    fn missing_data_bytes() {
        let events = TraceBuilder::default()
            .access(0x01, Direction::Write, false, &[])
            .build();
        let (_, out) = decode(DecoderConfig::default(), &events);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].kind, AnnotationKind::WriteCommand);
        assert_eq!(out[1].text, warning::MISSING_DATA);

        // Zero width at the rising CS edge
        let rise = events.last().unwrap().range().start;
        assert_eq!(out[1].range, rise..rise);
    }

    #[test]
    fn unknown_address_flags_every_following_byte() {
        let events = TraceBuilder::default()
            .raw(&[
                (Some(0xAA), Some(0xFF)),
                (Some(0x01), Some(0xFF)),
                (Some(0x02), Some(0xFF)),
                (Some(0x03), Some(0xFF)),
            ])
            .build();
        let (_, out) = decode(DecoderConfig::default(), &events);

        assert_eq!(
            warnings(&out),
            vec![
                warning::UNKNOWN_ADDRESS,
                warning::EXCESS_BYTE,
                warning::EXCESS_BYTE,
                warning::EXCESS_BYTE
            ]
        );
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn unrequested_miso_on_command_byte() {
        let events = TraceBuilder::default()
            .raw(&[(Some(0x81), Some(0x00)), (Some(0x05), Some(0xFF))])
            .build();
        let (_, out) = decode(DecoderConfig::default(), &events);

        assert_eq!(warnings(&out), vec![warning::UNREQUESTED_DATA]);
        let w = out.iter().find(|a| a.is_warning()).unwrap();
        assert_eq!(w.range.start, w.range.end);
        assert_eq!(of_kind(&out, AnnotationKind::TxData)[0].text, "05");
    }

    #[test]
    fn missing_miso_in_four_wire_is_fatal() {
        let events = TraceBuilder::default()
            .raw(&[(Some(0x81), None), (Some(0x05), None)])
            .build();
        let mut decoder = Decoder::new(DecoderConfig::default());
        let mut out = Vec::new();
        assert_eq!(
            decoder.decode_all(&events, &mut out),
            Err(DecodeError::MissingProbe { probe: Probe::Miso })
        );
        assert!(out.is_empty());
    }

    #[test]
    fn three_wire_config_accepts_missing_miso() {
        let config = TraceConfig {
            wiring: WiringMode::ThreeWire,
            ..Default::default()
        };
        let events = TraceBuilder::new(config).write(0x01, &[0x05]).build();
        let (_, out) = decode(DecoderConfig::with_wiring(WiringMode::ThreeWire), &events);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].text, "05");
    }

    #[test]
    fn capture_starting_mid_transaction() {
        // CS already low when the capture starts: the first transaction is
        // skipped, the second decodes normally.
        let builder = TraceBuilder::without_idle(TraceConfig::default()).cs(None, Some(Level::Low));
        let at = builder.cursor();
        let events = builder
            .event(BusEvent::data(at..at + 16, Some(0x05), Some(0xFF)))
            .cs(Some(Level::Low), Some(Level::High))
            .write(0x01, &[0x07])
            .build();
        let (decoder, out) = decode(DecoderConfig::default(), &events);

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].text, "07");
        assert_eq!(decoder.transaction_count(), 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use cyrf_protocol::{format_bytes, ByteFormat, CommandError, CommandInfo, RegisterTable};
    use proptest::prelude::*;

    fn known_address() -> impl Strategy<Value = u8> {
        let addrs: Vec<u8> = RegisterTable::cyrf6936().iter().map(|r| r.address).collect();
        prop::sample::select(addrs)
    }

    fn unknown_address() -> impl Strategy<Value = u8> {
        (0u8..64).prop_filter("address is in the table", |a| {
            RegisterTable::cyrf6936().lookup_by_address(*a).is_none()
        })
    }

    proptest! {
        #[test]
        fn classify_is_idempotent(byte: u8) {
            prop_assert_eq!(CommandInfo::classify(byte), CommandInfo::classify(byte));
        }

        #[test]
        fn classify_rejects_unknown(addr in unknown_address(), high in 0u8..4) {
            let byte = (high << 6) | addr;
            prop_assert_eq!(CommandInfo::classify(byte), Err(CommandError::UnknownAddress(addr)));
        }

        #[test]
        fn unknown_address_marks_all_bytes_excess(
            addr in unknown_address(),
            data in prop::collection::vec(any::<u8>(), 0..20)
        ) {
            let mut bytes = vec![(Some(0x80 | addr), Some(0xFF))];
            bytes.extend(data.iter().map(|&b| (Some(b), Some(0xFF))));
            let events = TraceBuilder::default().raw(&bytes).build();
            let (_, out) = decode(DecoderConfig::default(), &events);

            prop_assert_eq!(out.len(), data.len() + 1);
            prop_assert_eq!(out[0].text.as_str(), warning::UNKNOWN_ADDRESS);
            for a in &out[1..] {
                prop_assert_eq!(a.text.as_str(), warning::EXCESS_BYTE);
            }
        }

        #[test]
        fn accumulation_bounded_by_width(
            addr in known_address(),
            write: bool,
            data in prop::collection::vec(any::<u8>(), 0..24)
        ) {
            // Keep clear of the wiring switch so MISO stays present
            prop_assume!(addr != IO_CFG_ADR);

            let width = RegisterTable::cyrf6936().lookup_by_address(addr).unwrap().byte_width as usize;
            let direction = if write { Direction::Write } else { Direction::Read };
            let events = TraceBuilder::default().access(addr, direction, false, &data).build();
            let (_, out) = decode(DecoderConfig::default(), &events);

            let excess = out.iter().filter(|a| a.text == warning::EXCESS_BYTE).count();
            prop_assert_eq!(excess, data.len().saturating_sub(width));

            let payload: Vec<_> = out
                .iter()
                .filter(|a| matches!(a.kind, AnnotationKind::TxData | AnnotationKind::RxData))
                .collect();
            if data.is_empty() {
                prop_assert!(payload.is_empty());
                let missing = out.iter().filter(|a| a.text == warning::MISSING_DATA).count();
                prop_assert_eq!(missing, 1);
            } else {
                prop_assert_eq!(payload.len(), 1);
                let kept = &data[..data.len().min(width)];
                prop_assert_eq!(&payload[0].data[..], kept);
                prop_assert_eq!(payload[0].text.clone(), format_bytes(kept, ByteFormat::HexOnly));
            }
        }

        #[test]
        fn hex_format_is_two_digits_per_byte(data in prop::collection::vec(any::<u8>(), 0..64)) {
            let text = format_bytes(&data, ByteFormat::HexOnly);
            prop_assert_eq!(text.len(), data.len() * 2);
            prop_assert!(text.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }

        #[test]
        fn escaped_format_has_no_controls(data in prop::collection::vec(any::<u8>(), 0..64)) {
            let text = format_bytes(&data, ByteFormat::PrintableEscaped);
            prop_assert!(!text.chars().any(|c| c.is_control()));
        }
    }
}
