use clap::Parser;
use std::path::PathBuf;

// Use the library modules
use acget::commands;

#[derive(Parser)]
#[clap(name = "acget")]
#[clap(about = "Downloads the latest release from App Center and optionally starts the installer")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Start the installer after the download is complete
    #[clap(long)]
    install: bool,

    /// Path to the settings file
    #[clap(long, default_value = "appcenter-secrets.json")]
    settings: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = commands::fetch::fetch(&cli.settings, cli.install) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
