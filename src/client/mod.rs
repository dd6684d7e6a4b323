//! Backend access.
//!
//! The attendance backend exposes two endpoints:
//!
//! - `POST /submit` takes a JSON enrollment batch
//! - `POST /upload` takes a multipart group photograph
//!
//! Any 2xx status counts as success; the response body is not interpreted.

mod http;

pub use http::HttpBackend;

use crate::attendance::AttendanceRequest;
use crate::enrollment::EnrollmentRequest;
use thiserror::Error;

/// Path of the enrollment endpoint.
pub const SUBMIT_PATH: &str = "/submit";
/// Path of the attendance upload endpoint.
pub const UPLOAD_PATH: &str = "/upload";

/// A request could not be delivered or was refused.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("backend responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request body is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

impl SubmitError {
    /// True if the backend answered with a non-success status.
    pub fn is_rejection(&self) -> bool {
        matches!(self, SubmitError::Status { .. })
    }
}

/// Destination for completed forms.
pub trait Backend {
    /// Sends one enrollment batch.
    fn submit_enrollment(&self, request: &EnrollmentRequest) -> Result<(), SubmitError>;

    /// Uploads one group photograph.
    fn upload_attendance(&self, request: &AttendanceRequest) -> Result<(), SubmitError>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn submit_enrollment(&self, request: &EnrollmentRequest) -> Result<(), SubmitError> {
        (**self).submit_enrollment(request)
    }

    fn upload_attendance(&self, request: &AttendanceRequest) -> Result<(), SubmitError> {
        (**self).upload_attendance(request)
    }
}
