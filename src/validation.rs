//! Form validation shared by both screens.
//!
//! Validation runs before any device or network access.

use std::path::Path;
use thiserror::Error;

/// A form failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    #[error("no image file selected")]
    MissingImage,
    #[error("image file {path} cannot be read: {reason}")]
    UnreadableImage { path: String, reason: String },
    #[error("unsupported image type {0:?}; allowed: png, jpg, jpeg")]
    UnsupportedImageType(String),
    #[error("image is {size} bytes, upload limit is {limit} bytes")]
    ImageTooLarge { size: u64, limit: u64 },
}

impl ValidationError {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingField(_) => "Please fill in all fields.".to_string(),
            ValidationError::MissingImage => "Please choose a group image to upload.".to_string(),
            ValidationError::UnsupportedImageType(_) => {
                "Invalid file type. Allowed: png, jpg, jpeg".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Returns the trimmed value, or `MissingField` if nothing is left.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

/// MIME type for an image path, based on its extension.
///
/// Only png, jpg and jpeg are accepted by the upload endpoint.
pub fn image_mime(path: &Path) -> Result<&'static str, ValidationError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        _ => Err(ValidationError::UnsupportedImageType(ext)),
    }
}
