//! Enrollment form and the request assembled from a capture session.

use super::session::{CaptureSession, FRAME_TARGET};
use crate::capture::EncodedImage;
use crate::validation::{require, ValidationError};
use serde::Serialize;

/// Text fields of the enrollment screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentForm {
    /// Student PRN number.
    pub identifier: String,
    /// Student name.
    pub display_name: String,
}

impl EnrollmentForm {
    pub fn new(identifier: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
        }
    }

    /// Checks both required fields, returning their trimmed values.
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let identifier = require("prnno", &self.identifier)?;
        let display_name = require("name", &self.display_name)?;
        Ok((identifier.to_string(), display_name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.identifier.is_empty() && self.display_name.is_empty()
    }
}

/// A complete enrollment batch.
///
/// Only constructible from a finished [`CaptureSession`], so it always holds
/// exactly [`FRAME_TARGET`] frames.
#[derive(Debug, Clone)]
pub struct EnrollmentRequest {
    identifier: String,
    display_name: String,
    frames: Vec<EncodedImage>,
}

/// JSON body of `POST /submit`.
#[derive(Debug, Serialize)]
pub struct SubmitBody<'a> {
    pub prnno: &'a str,
    pub name: &'a str,
    pub images: Vec<String>,
}

impl EnrollmentRequest {
    /// Builds the request from a finished session.
    ///
    /// Returns the session's frame count as the error if it is not complete.
    pub fn from_session(
        identifier: String,
        display_name: String,
        session: CaptureSession,
    ) -> Result<Self, usize> {
        let captured = session.frame_count();
        let frames = session.into_frames().ok_or(captured)?;
        debug_assert_eq!(frames.len(), FRAME_TARGET);
        Ok(Self {
            identifier,
            display_name,
            frames,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn frames(&self) -> &[EncodedImage] {
        &self.frames
    }

    /// Serializable wire body with frames as JPEG data URLs.
    pub fn to_body(&self) -> SubmitBody<'_> {
        SubmitBody {
            prnno: &self.identifier,
            name: &self.display_name,
            images: self.frames.iter().map(EncodedImage::to_data_url).collect(),
        }
    }
}
