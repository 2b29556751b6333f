//! Text extraction.
//!
//! Recognition is pluggable through [`TextRecognizer`]; the default shells
//! out to the `tesseract` binary. [`TextExtractor`] never fails: any error
//! is logged and becomes an empty string.

use crate::normalize::{decode, to_luma};
use crate::result::{CompareError, CompareResult, InputRole};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder};
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Turns a grayscale image into text
pub trait TextRecognizer: Send + Sync {
    /// Recognize all text in the image, unnormalized
    ///
    /// # Errors
    ///
    /// Returns `Ocr` if the engine is unavailable or fails
    fn recognize(&self, image: &GrayImage) -> CompareResult<String>;
}

/// Recognizer backed by the `tesseract` command-line tool
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: String,
    language: Option<String>,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            binary: String::from("tesseract"),
            language: None,
        }
    }
}

impl TesseractCli {
    /// Use `tesseract` from `PATH` with its default language
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language passed with `-l`
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Use a specific executable
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &GrayImage) -> CompareResult<String> {
        let png = encode_png(image)?;

        let mut command = Command::new(&self.binary);
        command.arg("stdin").arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CompareError::ocr(format!("cannot run {}: {e}", self.binary)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&png) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(CompareError::ocr(format!("cannot feed image: {e}")));
            }
        }
        let output = child
            .wait_with_output()
            .map_err(|e| CompareError::ocr(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CompareError::ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn encode_png(image: &GrayImage) -> CompareResult<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::L8)
        .map_err(|e| CompareError::ocr(format!("cannot encode image: {e}")))?;
    Ok(png)
}

/// Extracts text from images, degrading every failure to an empty string
#[derive(Clone)]
pub struct TextExtractor {
    recognizer: Arc<dyn TextRecognizer>,
}

impl std::fmt::Debug for TextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextExtractor").finish_non_exhaustive()
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(Arc::new(TesseractCli::default()))
    }
}

impl TextExtractor {
    /// Create an extractor around a recognizer
    #[must_use]
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Decode image bytes and extract their text
    #[must_use]
    pub fn extract(&self, bytes: &[u8], input: InputRole) -> String {
        match decode(bytes, input) {
            Ok(image) => self.extract_gray(&to_luma(&image.to_rgb8()), input),
            Err(e) => {
                tracing::warn!(
                    stage = "ocr",
                    input = %input,
                    error = %e,
                    "input is not a decodable image"
                );
                String::new()
            }
        }
    }

    /// Extract text from an already-grayscale image
    #[must_use]
    pub fn extract_gray(&self, image: &GrayImage, input: InputRole) -> String {
        match self.recognizer.recognize(image) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    stage = "ocr",
                    input = %input,
                    error = %e,
                    "text recognition failed"
                );
                String::new()
            }
        }
    }
}
