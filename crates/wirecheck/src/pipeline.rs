//! Comparison orchestration.
//!
//! ```text
//! Start ─► Normalized ─► Detected ─► Overlaid ─┬─► Heatmapped ─────┬─► TextExtracted ─► Done
//!                                               └─► HeatmapSkipped ─┘
//! ```
//!
//! Decode, dimension, configuration and overlay failures abort the run.
//! Heatmap and OCR failures are logged and the run continues with a
//! degraded result.

use crate::artifact::{ArtifactRef, ArtifactStore};
use crate::classify::{PlaceholderClassifier, RegionClassifier, Summary};
use crate::config::ComparisonConfig;
use crate::detect::{Detection, DiscrepancyDetector, Region};
use crate::heatmap::HeatmapRenderer;
use crate::normalize::{CanonicalPair, ImageNormalizer};
use crate::ocr::{TesseractCli, TextExtractor, TextRecognizer};
use crate::overlay::OverlayRenderer;
use crate::result::{CompareResult, InputRole};
use crate::ssim::SimilarityScorer;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Position of a run within the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Nothing done yet
    Start,
    /// Both inputs decoded and resized
    Normalized,
    /// Score computed and regions extracted
    Detected,
    /// Annotated overlay stored
    Overlaid,
    /// Heatmap stored
    Heatmapped,
    /// Heatmap failed and was skipped
    HeatmapSkipped,
    /// Text read from both inputs
    TextExtracted,
    /// Result assembled
    Done,
}

impl PipelineStage {
    /// Short name used in logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Normalized => "normalized",
            Self::Detected => "detected",
            Self::Overlaid => "overlaid",
            Self::Heatmapped => "heatmapped",
            Self::HeatmapSkipped => "heatmap-skipped",
            Self::TextExtracted => "text-extracted",
            Self::Done => "done",
        }
    }

    fn advance(&mut self, next: Self) {
        tracing::debug!(from = self.name(), to = next.name(), "pipeline stage");
        *self = next;
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one wireframe/live-site comparison
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    /// Mean SSIM, `None` if scoring did not produce a finite value
    pub similarity_score: Option<f64>,
    /// Annotated overlay artifact
    pub overlay: ArtifactRef,
    /// Heatmap artifact, `None` if heatmap rendering failed
    pub heatmap: Option<ArtifactRef>,
    /// Detected regions, canonical coordinates
    pub regions: Vec<Region>,
    /// Region counts per category
    pub summary: Summary,
    /// Text recognized in the wireframe
    pub wireframe_text: String,
    /// Text recognized in the live site
    pub live_site_text: String,
    /// Set whenever the two texts differ in any way
    pub font_style_mismatch: bool,
    /// Last stage reached before `Done` (heatmapped or skipped path)
    pub heatmap_stage: PipelineStage,
}

impl Serialize for ComparisonResult {
    /// Flat record: artifacts by location, summary counts inline
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("similarity_score", &self.similarity_score)?;
        map.serialize_entry("overlay", &self.overlay.location)?;
        map.serialize_entry("heatmap", &self.heatmap.as_ref().map(|h| h.location.as_str()))?;
        map.serialize_entry("regions", &self.regions)?;
        for (kind, count) in self.summary.iter() {
            map.serialize_entry(kind.label(), &count)?;
        }
        map.serialize_entry("wireframe_text", &self.wireframe_text)?;
        map.serialize_entry("live_site_text", &self.live_site_text)?;
        map.serialize_entry("font_style_mismatch", &self.font_style_mismatch)?;
        map.end()
    }
}

/// Runs comparisons with a fixed configuration and collaborators
#[derive(Clone)]
pub struct ComparisonPipeline {
    config: ComparisonConfig,
    store: Arc<dyn ArtifactStore>,
    text: TextExtractor,
    classifier: Arc<dyn RegionClassifier>,
}

impl std::fmt::Debug for ComparisonPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ComparisonPipeline {
    /// Create a pipeline writing artifacts to `store`, recognizing text with
    /// tesseract and classifying with the placeholder classifier
    #[must_use]
    pub fn new(config: ComparisonConfig, store: Arc<dyn ArtifactStore>) -> Self {
        let mut tesseract = TesseractCli::new();
        if let Some(language) = &config.ocr_language {
            tesseract = tesseract.with_language(language.clone());
        }
        Self {
            config,
            store,
            text: TextExtractor::new(Arc::new(tesseract)),
            classifier: Arc::new(PlaceholderClassifier),
        }
    }

    /// Replace the text recognizer
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.text = TextExtractor::new(recognizer);
        self
    }

    /// Replace the region classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn RegionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Compare a wireframe against a live-site screenshot
    ///
    /// # Errors
    ///
    /// Returns `Config` for an invalid configuration, `Decode` if either
    /// input is not an image, and `Render`/`Io` if the overlay cannot be
    /// produced or stored
    pub fn run(&self, wireframe: &[u8], live_site: &[u8]) -> CompareResult<ComparisonResult> {
        self.config.validate()?;
        let mut stage = PipelineStage::Start;

        let pair = ImageNormalizer::from_config(&self.config).normalize(wireframe, live_site)?;
        stage.advance(PipelineStage::Normalized);

        let (similarity_score, detection) = self.score_and_detect(&pair)?;
        let summary = Summary::tally(&detection.regions, self.classifier.as_ref());
        stage.advance(PipelineStage::Detected);
        tracing::debug!(
            score = ?similarity_score,
            regions = detection.regions.len(),
            "detection finished"
        );

        let overlay_image = OverlayRenderer::from_config(&self.config).render(
            &pair.wireframe,
            &pair.live_site,
            &detection.regions,
        )?;
        let overlay = self.store.store(&self.config.overlay_name, &overlay_image)?;
        stage.advance(PipelineStage::Overlaid);

        let heatmap = match self.render_heatmap(&detection, &overlay) {
            Ok(artifact) => {
                stage.advance(PipelineStage::Heatmapped);
                Some(artifact)
            }
            Err(e) => {
                tracing::warn!(
                    stage = "heatmap",
                    overlay = %overlay,
                    error = %e,
                    "heatmap skipped"
                );
                stage.advance(PipelineStage::HeatmapSkipped);
                None
            }
        };
        let heatmap_stage = stage;

        let wireframe_text = self.text.extract(wireframe, InputRole::Wireframe);
        let live_site_text = self.text.extract(live_site, InputRole::LiveSite);
        let font_style_mismatch = wireframe_text != live_site_text;
        stage.advance(PipelineStage::TextExtracted);

        stage.advance(PipelineStage::Done);
        tracing::info!(
            score = ?similarity_score,
            regions = detection.regions.len(),
            heatmap = heatmap.is_some(),
            font_style_mismatch,
            "comparison complete"
        );

        Ok(ComparisonResult {
            similarity_score,
            overlay,
            heatmap,
            regions: detection.regions,
            summary,
            wireframe_text,
            live_site_text,
            font_style_mismatch,
            heatmap_stage,
        })
    }

    /// Scoring and detection both only read the pair, so they may overlap
    fn score_and_detect(&self, pair: &CanonicalPair) -> CompareResult<(Option<f64>, Detection)> {
        let scorer = SimilarityScorer::from_config(&self.config);
        let detector = DiscrepancyDetector::from_config(&self.config);
        let (a, b) = (&pair.wireframe_gray, &pair.live_site_gray);

        let (score, detection) = if self.config.parallel {
            std::thread::scope(|scope| {
                let scoring = scope.spawn(|| scorer.score(a, b));
                let detection = detector.detect(a, b);
                let score = scoring.join().unwrap_or_else(|_| {
                    tracing::warn!(stage = "score", "scoring thread panicked");
                    Ok(f64::NAN)
                });
                (score, detection)
            })
        } else {
            (scorer.score(a, b), detector.detect(a, b))
        };

        let score = Some(score?).filter(|s| s.is_finite());
        Ok((score, detection?))
    }

    fn render_heatmap(&self, detection: &Detection, overlay: &ArtifactRef) -> CompareResult<ArtifactRef> {
        let bytes = self.store.load(overlay)?;
        let heatmap = HeatmapRenderer::from_config(&self.config).render_encoded(&detection.difference, &bytes)?;
        self.store.store(&self.config.heatmap_name, &heatmap)
    }
}
