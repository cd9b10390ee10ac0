use clap::Parser;
#[cfg(feature = "gpio")]
use dripwatch::app::App;
#[cfg(feature = "gpio")]
use dripwatch::config::Config;
use std::path::PathBuf;
#[cfg(feature = "gpio")]
use tracing::{error, info};

/// Dripwatch - infusion drip line monitoring daemon.
#[derive(Parser, Debug)]
#[command(name = "dripwatch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[cfg(feature = "gpio")]
#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!("dripwatch starting");

    if let Err(e) = App::run(config).await {
        error!(error = %e, "Fatal error");
        std::process::exit(1);
    }

    info!("dripwatch stopped");
}

#[cfg(not(feature = "gpio"))]
fn main() {
    let _ = Cli::parse();
    eprintln!("dripwatch was built without the `gpio` feature; no sensor backend available");
    std::process::exit(1);
}
