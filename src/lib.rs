// Module declarations for the application's core components
pub mod config;        // Configuration management
pub mod ecu;           // APsystems ECU protocol decoding
pub mod error;         // Error handling and types
pub mod options;       // Command line options parsing
pub mod prelude;       // Common imports and types
pub mod reading;       // One polling cycle decoded into a single snapshot
pub mod utils;         // Utility functions

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;
use crate::reading::{Decoder, RawFrames};
use std::io::Write;

/// Initialise env_logger; `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) {
    if let Err(e) = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init()
    {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

/// Reads a captured frame from a file holding it as hex text.
pub fn read_frame(path: &str) -> Result<Vec<u8>> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| file_error_with_source!(err, "error reading {}", path))?;

    Utils::from_hex(&text)
        .map_err(|err| file_error_with_source!(err, "{} is not a hex capture", path))
}

/// Main application entry point
///
/// Decodes one cycle of captured ECU responses and prints it as JSON.
pub fn app(options: Options) -> Result<()> {
    let config = Config::load_or_default(&options.config_file)?;

    init_logging(config.loglevel());
    info!("ecu-decode {} starting", CARGO_PKG_VERSION);
    config.log_summary();

    let frames = RawFrames {
        summary: read_frame(&options.summary)?,
        inverters: read_frame(&options.inverters)?,
        signal: options.signal.as_deref().map(read_frame).transpose()?,
    };

    let decoder = Decoder::new(config.dispatch_strategy());
    let reading = decoder.decode(&frames).map_err(|e| {
        error!("{}", e);
        e
    })?;

    info!(
        "decoded ECU {} with {} inverters",
        reading.summary.ecu_id,
        reading.telemetry.inverters.len()
    );

    let record = reading.record();
    let json = if options.pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    println!("{}", json);

    Ok(())
}
