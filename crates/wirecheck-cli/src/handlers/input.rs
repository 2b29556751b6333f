//! Upload validation

use crate::error::{CliError, CliResult};
use std::path::Path;

/// Accepted image file extensions, compared case-insensitively
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Whether the path carries an accepted image extension
#[must_use]
pub fn is_allowed_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Check the extension and read the file
pub fn read_image(path: &Path) -> CliResult<Vec<u8>> {
    if !is_allowed_image(path) {
        return Err(CliError::invalid_file_type(path.display().to_string()));
    }
    tracing::debug!(path = %path.display(), "reading upload");
    Ok(std::fs::read(path)?)
}
