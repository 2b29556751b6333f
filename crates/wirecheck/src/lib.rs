//! Wirecheck: wireframe versus live-site visual comparison
//!
//! Compares a design mock-up against a screenshot of the built page and
//! reports where they disagree: a structural similarity score, bounding
//! boxes around regions of difference, an annotated overlay, a difference
//! heatmap, and the text recognized in each image.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                         WIRECHECK Pipeline                           │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │  bytes ──► ImageNormalizer ──► CanonicalPair (1440×1000, rgb+gray)   │
//! │                                   │                │                 │
//! │                      SimilarityScorer      DiscrepancyDetector       │
//! │                          (SSIM)           (diff ► blur ► threshold   │
//! │                                               ► contours)            │
//! │                                   │                │                 │
//! │                                   │         OverlayRenderer ──► store│
//! │                                   │         HeatmapRenderer ◄── load │
//! │                                   ▼                                  │
//! │                  ComparisonResult ◄── TextExtractor (tesseract)      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wirecheck::{ComparisonConfig, ComparisonPipeline, DirectoryStore};
//!
//! let wireframe = std::fs::read("wireframe.png")?;
//! let live = std::fs::read("live.png")?;
//! let pipeline = ComparisonPipeline::new(
//!     ComparisonConfig::default(),
//!     Arc::new(DirectoryStore::new("output")),
//! );
//! let result = pipeline.run(&wireframe, &live)?;
//! println!("SSIM {:?}, {} regions", result.similarity_score, result.regions.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Persistence of rendered artifacts
#[allow(clippy::missing_errors_doc)]
pub mod artifact;

/// Discrepancy categories and summaries
pub mod classify;

/// Comparison configuration
pub mod config;

/// Region-of-difference detection
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub mod detect;

/// Difference heatmaps
pub mod heatmap;

/// Input decoding and normalization
pub mod normalize;

/// Text extraction
pub mod ocr;

/// Annotated overlay rendering
pub mod overlay;

/// Comparison orchestration
pub mod pipeline;

/// Error types
pub mod result;

/// Structural similarity
pub mod ssim;

pub use artifact::{ArtifactRef, ArtifactStore, DirectoryStore, MemoryStore};
pub use classify::{DiscrepancyKind, PlaceholderClassifier, RegionClassifier, Summary};
pub use config::{ComparisonConfig, CANONICAL_HEIGHT, CANONICAL_WIDTH, MIN_REGION_AREA};
pub use detect::{Detection, DifferenceMap, DiscrepancyDetector, Region};
pub use heatmap::{ColorMap, HeatmapRenderer};
pub use normalize::{CanonicalPair, ImageNormalizer};
pub use ocr::{TesseractCli, TextExtractor, TextRecognizer};
pub use overlay::OverlayRenderer;
pub use pipeline::{ComparisonPipeline, ComparisonResult, PipelineStage};
pub use result::{CompareError, CompareResult, InputRole};
pub use ssim::SimilarityScorer;
