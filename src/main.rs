//! # rpgevent
//!
//! Plays an event database in the terminal.
//!

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod term;

#[derive(Debug, Parser)]
#[command(name = "rpgevent", version, about = "Plays an RPG event database in the terminal")]
pub struct Cli {
    /// JSON event database
    pub database: PathBuf,

    /// Ticks to run between looks at the terminal
    #[arg(long, default_value_t = 600)]
    pub ticks: usize,

    /// Ticks per second; overrides the database
    #[arg(long)]
    pub fps: Option<u32>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    term::main(cli);
}
