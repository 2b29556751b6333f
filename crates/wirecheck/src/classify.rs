//! Discrepancy categories and the per-comparison summary.
//!
//! Classification sits behind [`RegionClassifier`] so a real classifier
//! can replace the placeholder without touching the pipeline.

use crate::detect::Region;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Category of a visual discrepancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscrepancyKind {
    /// Typography differs
    FontSizeStyle,
    /// Gaps between elements differ
    Spacing,
    /// Inner element padding differs
    Padding,
    /// Element placement differs
    Positioning,
}

impl DiscrepancyKind {
    /// Every category, in summary order
    pub const ALL: [Self; 4] = [Self::FontSizeStyle, Self::Spacing, Self::Padding, Self::Positioning];

    /// Human-readable key used in summaries
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FontSizeStyle => "Font-size/Style Issues",
            Self::Spacing => "Spacing Issues",
            Self::Padding => "Padding Issues",
            Self::Positioning => "Positioning Issues",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::FontSizeStyle => 0,
            Self::Spacing => 1,
            Self::Padding => 2,
            Self::Positioning => 3,
        }
    }
}

impl std::fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Assigns a category to each detected region
pub trait RegionClassifier: Send + Sync {
    /// Category for one region
    fn classify(&self, region: &Region) -> DiscrepancyKind;
}

/// Puts every region in the font-size/style bucket
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderClassifier;

impl RegionClassifier for PlaceholderClassifier {
    fn classify(&self, _region: &Region) -> DiscrepancyKind {
        DiscrepancyKind::FontSizeStyle
    }
}

/// Region counts per category.
///
/// Always carries all four categories, zero when empty. Serializes as a map
/// keyed by the category labels, in fixed order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    counts: [u32; 4],
}

impl Summary {
    /// Classify every region and count per category
    #[must_use]
    pub fn tally(regions: &[Region], classifier: &dyn RegionClassifier) -> Self {
        let mut summary = Self::default();
        for region in regions {
            summary.record(classifier.classify(region));
        }
        summary
    }

    /// Count one more region of a kind
    pub fn record(&mut self, kind: DiscrepancyKind) {
        self.counts[kind.index()] += 1;
    }

    /// Count for one category
    #[must_use]
    pub const fn count(&self, kind: DiscrepancyKind) -> u32 {
        self.counts[kind.index()]
    }

    /// Sum over all categories
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Categories with their counts, in summary order
    pub fn iter(&self) -> impl Iterator<Item = (DiscrepancyKind, u32)> + '_ {
        DiscrepancyKind::ALL.iter().map(|&kind| (kind, self.count(kind)))
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DiscrepancyKind::ALL.len()))?;
        for (kind, count) in self.iter() {
            map.serialize_entry(kind.label(), &count)?;
        }
        map.end()
    }
}
