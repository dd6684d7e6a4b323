//! Attendance form and the upload request built from it.

use crate::validation::{image_mime, require, ValidationError};
use std::path::PathBuf;

/// Fields of the attendance screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceForm {
    pub subject: String,
    pub class_no: String,
    pub department: String,
    pub year: String,
    /// Path of the group photograph.
    pub image: Option<PathBuf>,
}

/// The group photograph, read into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Multipart body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRequest {
    pub subject: String,
    pub class_no: String,
    pub department: String,
    pub year: String,
    pub image: ImageUpload,
}

impl AttendanceForm {
    /// Validates the form and reads the image.
    ///
    /// Text fields are checked first, then the image path, extension and
    /// size. The file is only read once all of that passes.
    pub fn build_request(&self, max_upload_bytes: u64) -> Result<AttendanceRequest, ValidationError> {
        let subject = require("subject", &self.subject)?;
        let class_no = require("class_no", &self.class_no)?;
        let department = require("department", &self.department)?;
        let year = require("year", &self.year)?;

        let path = self.image.as_ref().ok_or(ValidationError::MissingImage)?;
        let mime = image_mime(path)?;
        let unreadable = |reason: String| ValidationError::UnreadableImage {
            path: path.display().to_string(),
            reason,
        };

        let metadata = std::fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
        if !metadata.is_file() {
            return Err(unreadable("not a regular file".to_string()));
        }
        if metadata.len() > max_upload_bytes {
            return Err(ValidationError::ImageTooLarge {
                size: metadata.len(),
                limit: max_upload_bytes,
            });
        }
        let bytes = std::fs::read(path).map_err(|e| unreadable(e.to_string()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(AttendanceRequest {
            subject: subject.to_string(),
            class_no: class_no.to_string(),
            department: department.to_string(),
            year: year.to_string(),
            image: ImageUpload {
                file_name,
                mime,
                bytes,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn filled_form(image: Option<PathBuf>) -> AttendanceForm {
        AttendanceForm {
            subject: "Operating Systems".into(),
            class_no: "B2".into(),
            department: "Computer".into(),
            year: "TY".into(),
            image,
        }
    }

    fn image_file(suffix: &str, len: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(&vec![0xAB; len]).unwrap();
        file
    }

    #[test]
    fn test_builds_request() {
        let file = image_file(".jpg", 64);
        let request = filled_form(Some(file.path().to_path_buf()))
            .build_request(1024)
            .unwrap();

        assert_eq!(request.subject, "Operating Systems");
        assert_eq!(request.class_no, "B2");
        assert_eq!(request.image.mime, "image/jpeg");
        assert_eq!(request.image.bytes.len(), 64);
        assert!(request.image.file_name.ends_with(".jpg"));
    }

    #[test]
    fn test_missing_image() {
        assert_eq!(
            filled_form(None).build_request(1024),
            Err(ValidationError::MissingImage)
        );
    }

    #[test]
    fn test_text_fields_checked_before_image() {
        let mut form = filled_form(None);
        form.department = "  ".into();
        assert_eq!(
            form.build_request(1024),
            Err(ValidationError::MissingField("department"))
        );
    }

    #[test]
    fn test_nonexistent_image() {
        let form = filled_form(Some(PathBuf::from("/nonexistent/group.png")));
        assert!(matches!(
            form.build_request(1024),
            Err(ValidationError::UnreadableImage { .. })
        ));
    }

    #[test]
    fn test_oversized_image() {
        let file = image_file(".png", 2048);
        let form = filled_form(Some(file.path().to_path_buf()));
        assert_eq!(
            form.build_request(1024),
            Err(ValidationError::ImageTooLarge {
                size: 2048,
                limit: 1024
            })
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let file = image_file(".bmp", 16);
        let form = filled_form(Some(file.path().to_path_buf()));
        assert_eq!(
            form.build_request(1024),
            Err(ValidationError::UnsupportedImageType("bmp".into()))
        );
    }
}
