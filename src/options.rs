use clap::Parser;

/// ecu-decode - decode captured APsystems ECU responses
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Config file to read
    #[clap(short = 'c', long = "config", default_value = "config.yaml")]
    pub config_file: String,

    /// Hex capture of the ECU summary response (APS1100160001)
    #[clap(long = "summary")]
    pub summary: String,

    /// Hex capture of the inverter data response (APS1100280002)
    #[clap(long = "inverters")]
    pub inverters: String,

    /// Optional hex capture of the signal response (APS1100280030)
    #[clap(long = "signal")]
    pub signal: Option<String>,

    /// Pretty-print the JSON output
    #[clap(long = "pretty")]
    pub pretty: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}
