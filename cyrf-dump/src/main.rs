//! CYRF6936 SPI Trace Decoder
//!
//! Reads a JSON-lines bus trace (as produced by an SPI decoder export or by
//! `cyrf-sim`) and prints the decoded CYRF6936 register traffic.

mod output;
mod settings;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use cyrf_protocol::{Annotation, Decoder, DecoderConfig, DecodeError, RegisterTable, WiringMode};
use cyrf_sim::TraceError;
use settings::{OutputFormat, Settings};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Settings(String),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("decoding stopped: {0}")]
    Decode(#[from] DecodeError),

    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Decode a JSON-lines bus trace
    Decode(DecodeArgs),
    /// List the CYRF6936 register table
    Registers,
}

#[derive(Args, Debug, PartialEq, Eq)]
struct DecodeArgs {
    /// Trace file, or - for stdin
    input: PathBuf,

    /// Initial wiring mode: two-line or combined-line
    #[arg(short, long)]
    wiring: Option<WiringMode>,

    /// Settings file (default: ~/.config/cyrf-dump/settings.json)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Print annotations as JSON lines
    #[arg(long)]
    json: bool,
}

fn resolve_settings(args: &DecodeArgs) -> Result<Settings, CliError> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load_from(path).map_err(CliError::Settings)?,
        None => Settings::load(),
    };
    if let Some(wiring) = args.wiring {
        settings.wiring = wiring;
    }
    if args.json {
        settings.format = OutputFormat::Json;
    }
    Ok(settings)
}

fn run_decode(args: DecodeArgs) -> Result<(), CliError> {
    let settings = resolve_settings(&args)?;

    let events = if args.input.as_os_str() == "-" {
        cyrf_sim::read_trace(io::stdin().lock())?
    } else {
        let file = File::open(&args.input).map_err(TraceError::from)?;
        cyrf_sim::read_trace(BufReader::new(file))?
    };

    tracing::info!(
        "Decoding {} events, initial wiring {}",
        events.len(),
        settings.wiring
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut write_error: Option<io::Error> = None;

    let mut decoder = Decoder::new(DecoderConfig::with_wiring(settings.wiring));
    let mut sink = |annotation: Annotation| {
        if write_error.is_none() {
            if let Err(e) = output::write_annotation(&mut out, &settings, &annotation) {
                write_error = Some(e);
            }
        }
    };
    let result = decoder.decode_all(&events, &mut sink);

    if let Some(e) = write_error {
        return Err(e.into());
    }
    out.flush()?;

    tracing::info!(
        "Decoded {} transactions, final wiring {}",
        decoder.transaction_count(),
        decoder.wiring_mode()
    );
    result.map_err(CliError::from)
}

fn run_registers() -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for entry in RegisterTable::cyrf6936().iter() {
        writeln!(out, "{}", output::format_register(entry))?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cyrf_dump=info,cyrf_protocol=info,cyrf_sim=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let result = match cli.command {
        Command::Registers => run_registers(),
        Command::Decode(args) => run_decode(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
