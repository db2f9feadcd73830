use clap::{Parser, Subcommand};
use std::path::PathBuf;

use voice_dataset_collector::config::CollectorConfig;
use voice_dataset_collector::serve::serve_collector;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Collect annotated voice recordings over HTTP and export them as CSV or ZIP"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the collector HTTP server
    Serve {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Port to listen on (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Serve { config, port } => {
            let mut config = CollectorConfig::load(&config)?;
            if let Some(port) = port {
                config.port = port;
            }
            serve_collector(config)
        }
    }
}
