//! Wirecheck CLI Library
//!
//! Command-line front end for the `wirecheck` comparison pipeline.
//!
//! ```text
//! wirecheck compare wireframe.png live.png -o out/   # full comparison
//! wirecheck score a.png b.png                        # SSIM only
//! wirecheck ocr live.png --lang eng                  # text only
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    Cli, ColorArg, ColorMapArg, Commands, CompareArgs, FormatArg, OcrArgs, ScoreArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_comparison, Reporter};
