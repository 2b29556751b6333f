//! Score command handler

use super::input::read_image;
use crate::commands::ScoreArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use wirecheck::{ImageNormalizer, SimilarityScorer};

/// SSIM of two image files after canonical resizing
pub fn score_files(args: &ScoreArgs) -> CliResult<f64> {
    let first = read_image(&args.first)?;
    let second = read_image(&args.second)?;

    let pair = ImageNormalizer::default().normalize(&first, &second)?;
    let score = SimilarityScorer::default().score(&pair.wireframe_gray, &pair.live_site_gray)?;
    tracing::debug!(score, "scored image pair");
    Ok(score)
}

/// Execute the score command
pub fn execute_score(config: &CliConfig, args: &ScoreArgs) -> CliResult<()> {
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let score = score_files(args)?;
    reporter.result(&format!("{score:.6}"));
    Ok(())
}
