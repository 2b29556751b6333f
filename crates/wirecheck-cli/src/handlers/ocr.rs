//! OCR command handler

use super::input::read_image;
use crate::commands::OcrArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use std::sync::Arc;
use wirecheck::{InputRole, TesseractCli, TextExtractor};

/// Tesseract recognizer for the requested language
#[must_use]
pub fn recognizer_for(args: &OcrArgs) -> TesseractCli {
    match &args.lang {
        Some(lang) => TesseractCli::new().with_language(lang.clone()),
        None => TesseractCli::new(),
    }
}

/// Execute the ocr command
///
/// Recognition failures print an empty result; only unreadable files are errors.
pub fn execute_ocr(config: &CliConfig, args: &OcrArgs) -> CliResult<()> {
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let bytes = read_image(&args.image)?;

    let extractor = TextExtractor::new(Arc::new(recognizer_for(args)));
    // Standalone reads are logged as screenshots
    let text = extractor.extract(&bytes, InputRole::LiveSite);
    if text.trim().is_empty() {
        reporter.warning("No text recognized");
    }
    reporter.result(&text);
    Ok(())
}
