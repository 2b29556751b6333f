//! Persistence of rendered images.
//!
//! Stages hand each other [`ArtifactRef`]s rather than file names, so the
//! heatmap stage reads back exactly what the overlay stage wrote.

use crate::result::{CompareError, CompareResult, OVERLAY_STAGE};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Handle to a stored artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Artifact name, e.g. `heatmap_overlay.png`
    pub name: String,
    /// Where the store put it: a file path, or `memory://<name>`
    pub location: String,
}

impl std::fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.location)
    }
}

/// Destination for rendered images
pub trait ArtifactStore: Send + Sync {
    /// Encode and persist an image under a name
    ///
    /// # Errors
    ///
    /// Returns error if encoding or writing fails
    fn store(&self, name: &str, image: &RgbImage) -> CompareResult<ArtifactRef>;

    /// Read back the encoded bytes of a stored artifact
    ///
    /// # Errors
    ///
    /// Returns error if the artifact does not exist or cannot be read
    fn load(&self, artifact: &ArtifactRef) -> CompareResult<Vec<u8>>;
}

/// Encode an RGB image as PNG
///
/// # Errors
///
/// Returns an overlay `Render` error if encoding fails
pub fn encode_png(image: &RgbImage) -> CompareResult<Vec<u8>> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
        .map_err(|e| CompareError::render(OVERLAY_STAGE, format!("PNG encoding failed: {e}")))?;
    Ok(buffer)
}

/// Writes PNG files into a directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Store artifacts under `root`; the directory is created on first write
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for DirectoryStore {
    fn store(&self, name: &str, image: &RgbImage) -> CompareResult<ArtifactRef> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(name);
        std::fs::write(&path, encode_png(image)?)?;
        tracing::debug!(path = %path.display(), "artifact written");
        Ok(ArtifactRef {
            name: name.to_string(),
            location: path.display().to_string(),
        })
    }

    fn load(&self, artifact: &ArtifactRef) -> CompareResult<Vec<u8>> {
        Ok(std::fs::read(&artifact.location)?)
    }
}

/// Keeps encoded artifacts in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded bytes of an artifact by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts.lock().ok()?.get(name).cloned()
    }

    /// Number of stored artifacts
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.lock().map_or(0, |a| a.len())
    }

    /// Whether nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> CompareResult<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.artifacts
            .lock()
            .map_err(|_| CompareError::Io(std::io::Error::other("artifact store lock poisoned")))
    }
}

impl ArtifactStore for MemoryStore {
    fn store(&self, name: &str, image: &RgbImage) -> CompareResult<ArtifactRef> {
        let bytes = encode_png(image)?;
        self.lock()?.insert(name.to_string(), bytes);
        Ok(ArtifactRef {
            name: name.to_string(),
            location: format!("memory://{name}"),
        })
    }

    fn load(&self, artifact: &ArtifactRef) -> CompareResult<Vec<u8>> {
        self.lock()?.get(&artifact.name).cloned().ok_or_else(|| {
            CompareError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no artifact named {}", artifact.name),
            ))
        })
    }
}
