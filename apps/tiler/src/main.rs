use clap::Parser;

use tiler::cli::{self, Cli};
use tiler::telemetry::logging;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = logging::init(&cli.logging.to_config()) {
        eprintln!("❌ logging initialization failed: {err}");
        std::process::exit(1);
    }
    if let Err(err) = cli::run(cli) {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
