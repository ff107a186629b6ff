use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use vanbus::emit::{JsonSink, RecordSink, TextSink};
use vanbus::{DecodeOutcome, DecoderConfig, VanDecoder};

use crate::logging::{LogFormat, init_logging, verbosity};

mod capture;
mod logging;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Label line with indented `field = value` lines
    Text,
    /// One display event object per line
    Json,
}

#[derive(Parser)]
#[command(
    name = "vandump",
    about = "Decode captured VAN bus frames",
    long_about = "Reads frames written as IDEN#HEXPAYLOAD (optionally followed by ! for a checksum failure), one per line, and prints the decoded signals."
)]
struct Cli {
    /// Capture file; standard input when omitted
    input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only decode this identifier (hex, may be repeated)
    #[arg(long = "iden", value_parser = parse_hex_u16)]
    idens: Vec<u16>,

    /// Decoder settings as a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show every frame, including re-broadcasts of unchanged state
    #[arg(long)]
    no_dedup: bool,

    /// Print a marker line for frames that do not decode
    #[arg(long)]
    show_errors: bool,

    /// Print outcome counters to stderr when done
    #[arg(long)]
    stats: bool,

    /// More diagnostics on stderr: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only errors on stderr
    #[arg(short, long)]
    quiet: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|_| format!("Invalid hex identifier: {}", s))
}

fn load_config(cli: &Cli) -> Result<DecoderConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => DecoderConfig::default(),
    };
    if cli.no_dedup {
        config = config.with_duplicates();
    }
    Ok(config)
}

fn dump<R: BufRead, S: RecordSink>(
    input: R,
    sink: &mut S,
    decoder: &mut VanDecoder,
    cli: &Cli,
) -> Result<()> {
    for (n, line) in input.lines().enumerate() {
        let line = line?;
        let frame = match capture::parse_line(&line) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = n + 1, error = %e, "skipping malformed line");
                continue;
            }
        };
        if !cli.idens.is_empty() && !cli.idens.contains(&frame.iden()) {
            continue;
        }

        let decoded = decoder.decode(&frame);
        let quiet = decoded.outcome == DecodeOutcome::Duplicate
            || (decoded.outcome != DecodeOutcome::Ok && !cli.show_errors);
        if !quiet {
            sink.accept(&decoded)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, verbosity(cli.verbose, cli.quiet));

    let config = load_config(&cli)?;
    info!(?config, "decoder configured");
    let mut decoder = VanDecoder::with_config(config);

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let out = BufWriter::new(io::stdout().lock());

    match cli.format {
        OutputFormat::Text => {
            let mut sink = TextSink::new(out);
            dump(input, &mut sink, &mut decoder, &cli)?;
            sink.into_inner().flush()?;
        }
        OutputFormat::Json => {
            let mut sink = JsonSink::new(out);
            dump(input, &mut sink, &mut decoder, &cli)?;
            sink.into_inner().flush()?;
        }
    }

    if cli.stats {
        eprintln!("{}", decoder.stats());
    }
    Ok(())
}
