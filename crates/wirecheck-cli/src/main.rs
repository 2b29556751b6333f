//! Wirecheck CLI: compare a design wireframe against a live-site screenshot
//!
//! ## Usage
//!
//! ```bash
//! wirecheck compare wireframe.png live.png       # Overlay, heatmap and report
//! wirecheck compare a.png b.png --format json    # Machine-readable result
//! wirecheck score a.png b.png                    # SSIM only
//! wirecheck ocr live.png                         # Recognized text
//! ```

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wirecheck_cli::{
    handlers::{execute_compare, execute_ocr, execute_score},
    Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.verbosity);

    match cli.command {
        Commands::Compare(args) => execute_compare(&config, &args),
        Commands::Score(args) => execute_score(&config, &args),
        Commands::Ocr(args) => execute_ocr(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// `RUST_LOG` wins over `-v`/`-q`
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
