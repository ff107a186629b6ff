//! Diagnostics for the dump tool. Decoded output owns stdout, so every log
//! line goes to stderr.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Level name for `-q` and repeated `-v`. The default shows warnings such as
/// skipped capture lines and reassembly gaps.
pub fn verbosity(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Verbosity applies to the decoder library and this tool; everything else
/// stays at warnings.
fn directives(level: &str) -> String {
    format!("warn,vanbus={level},vandump={level}")
}

/// `RUST_LOG` replaces the verbosity flags entirely when set.
pub fn init_logging(format: LogFormat, level: &'static str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));
    // module path tells a reassembly gap from a dedup trace
    let detailed = matches!(level, "debug" | "trace");
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(detailed);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
