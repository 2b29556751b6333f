//! Compare command handler

use super::input::read_image;
use crate::commands::{CompareArgs, FormatArg};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_comparison, Reporter};
use image::GrayImage;
use std::sync::Arc;
use wirecheck::{
    CompareResult, ComparisonConfig, ComparisonPipeline, ComparisonResult, DirectoryStore,
    TextRecognizer,
};

/// Recognizer used with `--no-ocr`: every image reads as empty
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipOcr;

impl TextRecognizer for SkipOcr {
    fn recognize(&self, _image: &GrayImage) -> CompareResult<String> {
        Ok(String::new())
    }
}

/// Comparison settings from `--config` plus command-line overrides
pub fn load_config(args: &CompareArgs) -> CliResult<ComparisonConfig> {
    let mut config = match &args.config {
        Some(path) => ComparisonConfig::from_json_file(path)
            .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?,
        None => ComparisonConfig::default(),
    };
    if let Some(colormap) = args.colormap {
        config = config.with_colormap(colormap.into());
    }
    if args.sequential {
        config = config.with_parallel(false);
    }
    config.validate()?;
    Ok(config)
}

/// Run the comparison without printing anything
pub fn run_comparison(args: &CompareArgs) -> CliResult<ComparisonResult> {
    let config = load_config(args)?;
    let wireframe = read_image(&args.wireframe)?;
    let live_site = read_image(&args.live_site)?;

    let mut pipeline = ComparisonPipeline::new(config, Arc::new(DirectoryStore::new(&args.output)));
    if args.no_ocr {
        pipeline = pipeline.with_recognizer(Arc::new(SkipOcr));
    }
    Ok(pipeline.run(&wireframe, &live_site)?)
}

/// Execute the compare command
pub fn execute_compare(config: &CliConfig, args: &CompareArgs) -> CliResult<()> {
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.info(&format!(
        "Comparing {} against {}",
        args.wireframe.display(),
        args.live_site.display()
    ));

    if config.verbosity.is_verbose() {
        let settings = load_config(args)?;
        reporter.info(&format!(
            "Canonical size {}x{}, min region area {}, colormap {}",
            settings.canonical_width,
            settings.canonical_height,
            settings.min_region_area,
            settings.colormap
        ));
    }

    let result = run_comparison(args)?;

    if result.heatmap.is_none() {
        reporter.warning("Heatmap could not be rendered; see log for details");
    }
    match args.format {
        FormatArg::Json => reporter.result(&serde_json::to_string_pretty(&result)?),
        FormatArg::Text => reporter.result(&render_comparison(&result, reporter.use_color)),
    }
    reporter.success(&format!("Artifacts written to {}", args.output.display()));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::ColorMapArg;
    use crate::config::{ColorChoice, Verbosity};
    use image::{Rgb, RgbImage};
    use std::path::Path;
    use wirecheck::ColorMap;

    fn args(dir: &Path, wireframe: &str, live_site: &str) -> CompareArgs {
        CompareArgs {
            wireframe: dir.join(wireframe),
            live_site: dir.join(live_site),
            output: dir.join("out"),
            config: None,
            format: FormatArg::Json,
            colormap: None,
            no_ocr: true,
            sequential: false,
        }
    }

    fn write_png(path: &Path, block: bool) {
        let mut img = RgbImage::from_pixel(120, 90, Rgb([255, 255, 255]));
        if block {
            for y in 20..60 {
                for x in 30..70 {
                    img.put_pixel(x, y, Rgb([0, 0, 0]));
                }
            }
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_load_config_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path(), "a.png", "b.png");
        a.colormap = Some(ColorMapArg::Viridis);
        a.sequential = true;

        let config = load_config(&a).unwrap();
        assert_eq!(config.colormap, ColorMap::Viridis);
        assert!(!config.parallel);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wirecheck.json");
        std::fs::write(&path, r#"{"canonical_width": 320, "canonical_height": 240}"#).unwrap();
        let mut a = args(dir.path(), "a.png", "b.png");
        a.config = Some(path);

        let config = load_config(&a).unwrap();
        assert_eq!((config.canonical_width, config.canonical_height), (320, 240));
    }

    #[test]
    fn test_load_config_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wirecheck.json");
        std::fs::write(&path, "{ not json").unwrap();
        let mut a = args(dir.path(), "a.png", "b.png");
        a.config = Some(path);

        let err = load_config(&a).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert!(err.to_string().contains("wirecheck.json"));
    }

    #[test]
    fn test_run_comparison_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("wf.png"), false);
        write_png(&dir.path().join("live.png"), true);

        let config = dir.path().join("wirecheck.json");
        std::fs::write(&config, r#"{"canonical_width": 120, "canonical_height": 90}"#).unwrap();
        let mut a = args(dir.path(), "wf.png", "live.png");
        a.config = Some(config);

        let result = run_comparison(&a).unwrap();

        assert_eq!(result.regions.len(), 1);
        assert!(result.regions[0].covers(30, 20, 40, 40));
        assert_eq!(result.wireframe_text, "");
        assert!(!result.font_style_mismatch);
        assert!(dir.path().join("out/annotated_overlay_combined.png").exists());
        assert!(dir.path().join("out/heatmap_overlay.png").exists());
    }

    #[test]
    fn test_execute_compare_verbose() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("wf.png"), false);
        write_png(&dir.path().join("live.png"), true);
        let config = dir.path().join("wirecheck.json");
        std::fs::write(&config, r#"{"canonical_width": 120, "canonical_height": 90}"#).unwrap();
        let mut a = args(dir.path(), "wf.png", "live.png");
        a.config = Some(config);

        let cli = CliConfig::new()
            .with_verbosity(Verbosity::Verbose)
            .with_color(ColorChoice::Never);
        execute_compare(&cli, &a).unwrap();
        assert!(dir.path().join("out/annotated_overlay_combined.png").exists());
    }

    #[test]
    fn test_run_comparison_rejects_text_file() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("wf.png"), false);
        std::fs::write(dir.path().join("live.txt"), "hello").unwrap();

        let err = run_comparison(&args(dir.path(), "wf.png", "live.txt")).unwrap_err();
        assert!(matches!(err, CliError::InvalidFileType { .. }));
    }

    #[test]
    fn test_run_comparison_rejects_corrupt_png() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("wf.png"), false);
        std::fs::write(dir.path().join("live.png"), "not really a png").unwrap();

        let err = run_comparison(&args(dir.path(), "wf.png", "live.png")).unwrap_err();
        assert!(err.to_string().starts_with("Could not process images"));
        assert!(!dir.path().join("out").exists());
    }
}
