//! Blocking HTTP implementation of [`Backend`].

use super::{Backend, SubmitError, SUBMIT_PATH, UPLOAD_PATH};
use crate::attendance::AttendanceRequest;
use crate::config::BackendConfig;
use crate::enrollment::EnrollmentRequest;
use reqwest::blocking::{multipart, Client, Response};

/// Talks to the attendance backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    max_upload_bytes: u64,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SubmitError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn check_status(response: Response) -> Result<(), SubmitError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().unwrap_or_default();
    Err(SubmitError::Status {
        status: status.as_u16(),
        body,
    })
}

impl Backend for HttpBackend {
    fn submit_enrollment(&self, request: &EnrollmentRequest) -> Result<(), SubmitError> {
        let url = self.endpoint(SUBMIT_PATH);
        tracing::info!(
            %url,
            prnno = request.identifier(),
            frames = request.frames().len(),
            "Submitting enrollment"
        );

        let response = self
            .client
            .post(&url)
            .json(&request.to_body())
            .send()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        check_status(response)
    }

    fn upload_attendance(&self, request: &AttendanceRequest) -> Result<(), SubmitError> {
        let size = request.image.bytes.len() as u64;
        if size > self.max_upload_bytes {
            return Err(SubmitError::TooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        let url = self.endpoint(UPLOAD_PATH);
        tracing::info!(
            %url,
            subject = %request.subject,
            image = %request.image.file_name,
            bytes = size,
            "Uploading attendance image"
        );

        let image = multipart::Part::bytes(request.image.bytes.clone())
            .file_name(request.image.file_name.clone())
            .mime_str(request.image.mime)
            .map_err(|e| SubmitError::Client(e.to_string()))?;
        let form = multipart::Form::new()
            .text("subject", request.subject.clone())
            .text("class_no", request.class_no.clone())
            .text("department", request.department.clone())
            .text("year", request.year.clone())
            .part("image", image);

        // The backend answers with a redirect to its processing route;
        // reqwest follows it and the final status decides the outcome.
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        check_status(response)
    }
}
