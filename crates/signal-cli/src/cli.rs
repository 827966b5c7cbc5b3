//! Command-line interface definitions and parsing

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bluetooth adapter to serve on (e.g. hci0)
    #[arg(short, long)]
    pub adapter: Option<String>,

    /// File containing the payload text to serve instead of the built-in one
    #[arg(short, long)]
    pub payload_file: Option<String>,
}
