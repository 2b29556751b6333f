//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wirecheck::ColorMap;

/// Wirecheck: compare a design wireframe against a live-site screenshot
#[derive(Parser, Debug)]
#[command(name = "wirecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a wireframe with a live-site screenshot
    Compare(CompareArgs),

    /// Print the SSIM score of two images
    Score(ScoreArgs),

    /// Print the text recognized in an image
    Ocr(OcrArgs),
}

/// Arguments for the compare command
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Wireframe image (png, jpg, jpeg, gif)
    pub wireframe: PathBuf,

    /// Live-site screenshot (png, jpg, jpeg, gif)
    pub live_site: PathBuf,

    /// Directory for the overlay and heatmap images
    #[arg(short, long, default_value = "wirecheck-output")]
    pub output: PathBuf,

    /// JSON file with comparison settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Result format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Heatmap color map, overrides the config file
    #[arg(long, value_enum)]
    pub colormap: Option<ColorMapArg>,

    /// Skip text recognition
    #[arg(long)]
    pub no_ocr: bool,

    /// Run scoring and detection one after the other
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for the score command
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// First image
    pub first: PathBuf,

    /// Second image
    pub second: PathBuf,
}

/// Arguments for the ocr command
#[derive(Parser, Debug)]
pub struct OcrArgs {
    /// Image to read
    pub image: PathBuf,

    /// Tesseract language code (e.g. eng, deu)
    #[arg(short, long)]
    pub lang: Option<String>,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON record
    Json,
}

/// Color map argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMapArg {
    /// Blue to red
    Jet,
    /// Purple to yellow
    Viridis,
}

impl From<ColorMapArg> for ColorMap {
    fn from(arg: ColorMapArg) -> Self {
        match arg {
            ColorMapArg::Jet => Self::Jet,
            ColorMapArg::Viridis => Self::Viridis,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
