//! Attendance marking: upload of one group photograph.

mod form;

pub use form::{AttendanceForm, AttendanceRequest, ImageUpload};

use crate::client::{Backend, SubmitError};
use crate::metrics::MetricsRegistry;
use crate::notify::{FailureKind, Notification};
use crate::validation::ValidationError;
use thiserror::Error;

/// Why an upload did not complete.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("invalid form: {0}")]
    Validation(#[from] ValidationError),
    #[error("upload failed: {0}")]
    Submit(#[from] SubmitError),
}

impl AttendanceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AttendanceError::Validation(_) => FailureKind::Validation,
            AttendanceError::Submit(_) => FailureKind::Submission,
        }
    }

    pub fn notification(&self) -> Notification {
        match self {
            AttendanceError::Validation(e) => Notification::error(e.user_message()),
            AttendanceError::Submit(e) if e.is_rejection() => {
                Notification::error("Failed to upload. Please try again.")
            }
            AttendanceError::Submit(_) => {
                Notification::error("An error occurred during the upload.")
            }
        }
    }
}

/// Owns the attendance screen state and submits it.
pub struct AttendanceController<B> {
    backend: B,
    max_upload_bytes: u64,
    form: AttendanceForm,
    alert: Option<Notification>,
    metrics: Option<MetricsRegistry>,
}

impl<B: Backend> AttendanceController<B> {
    pub fn new(backend: B, max_upload_bytes: u64) -> Self {
        Self {
            backend,
            max_upload_bytes,
            form: AttendanceForm::default(),
            alert: None,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn form(&self) -> &AttendanceForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AttendanceForm {
        &mut self.form
    }

    pub fn alert(&self) -> Option<&Notification> {
        self.alert.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validates the form and uploads it once.
    ///
    /// Clears the form on success and keeps it on failure.
    pub fn submit(&mut self) -> Result<(), AttendanceError> {
        let result = self
            .form
            .build_request(self.max_upload_bytes)
            .map_err(AttendanceError::from)
            .and_then(|request| {
                self.backend
                    .upload_attendance(&request)
                    .map_err(AttendanceError::from)
            });

        match &result {
            Ok(()) => {
                tracing::info!("Attendance image uploaded");
                self.form = AttendanceForm::default();
                self.alert = Some(Notification::success("Upload successful!"));
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), "Attendance upload failed");
                self.alert = Some(e.notification());
            }
        }

        if let Some(metrics) = &self.metrics {
            match &result {
                Err(AttendanceError::Validation(_)) => metrics.validation_rejected(),
                other => metrics.attendance_finished(other.is_ok()),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrollment::EnrollmentRequest;
    use crate::notify::Severity;
    use std::cell::RefCell;
    use std::io::Write;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingBackend {
        uploads: RefCell<Vec<AttendanceRequest>>,
        reject_with: Option<u16>,
    }

    impl Backend for RecordingBackend {
        fn submit_enrollment(&self, _request: &EnrollmentRequest) -> Result<(), SubmitError> {
            unimplemented!("attendance tests never enroll")
        }

        fn upload_attendance(&self, request: &AttendanceRequest) -> Result<(), SubmitError> {
            self.uploads.borrow_mut().push(request.clone());
            match self.reject_with {
                Some(status) => Err(SubmitError::Status {
                    status,
                    body: "{\"error\": \"Missing form data\"}".into(),
                }),
                None => Ok(()),
            }
        }
    }

    fn group_photo() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".jpeg").tempfile().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
        file
    }

    fn fill(controller: &mut AttendanceController<RecordingBackend>, image: Option<PathBuf>) {
        *controller.form_mut() = AttendanceForm {
            subject: "DBMS".into(),
            class_no: "C3".into(),
            department: "Computer".into(),
            year: "BE".into(),
            image,
        };
    }

    #[test]
    fn test_upload_success_clears_form() {
        let photo = group_photo();
        let mut controller = AttendanceController::new(RecordingBackend::default(), 1024);
        fill(&mut controller, Some(photo.path().to_path_buf()));

        controller.submit().unwrap();

        let uploads = controller.backend().uploads.borrow();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].class_no, "C3");
        assert_eq!(uploads[0].image.bytes, vec![0xFF, 0xD8, 0xFF, 0xD9]);
        drop(uploads);

        assert_eq!(controller.form(), &AttendanceForm::default());
        let alert = controller.alert().unwrap();
        assert_eq!(alert.severity, Severity::Success);
        assert_eq!(alert.message, "Upload successful!");
    }

    #[test]
    fn test_missing_image_rejected_before_network() {
        let mut controller = AttendanceController::new(RecordingBackend::default(), 1024);
        fill(&mut controller, None);

        let err = controller.submit().unwrap_err();
        assert!(matches!(
            err,
            AttendanceError::Validation(ValidationError::MissingImage)
        ));
        assert_eq!(err.kind(), FailureKind::Validation);
        assert!(controller.backend().uploads.borrow().is_empty());
        assert_eq!(controller.form().subject, "DBMS");
    }

    #[test]
    fn test_rejection_keeps_form() {
        let photo = group_photo();
        let backend = RecordingBackend {
            reject_with: Some(400),
            ..Default::default()
        };
        let mut controller = AttendanceController::new(backend, 1024);
        fill(&mut controller, Some(photo.path().to_path_buf()));

        let err = controller.submit().unwrap_err();
        assert_eq!(err.kind(), FailureKind::Submission);
        assert_eq!(
            controller.alert().unwrap().message,
            "Failed to upload. Please try again."
        );
        assert_eq!(controller.form().department, "Computer");
        assert!(controller.form().image.is_some());
    }

    #[test]
    fn test_metrics_count_outcomes() {
        let metrics = MetricsRegistry::new().unwrap();
        let mut controller =
            AttendanceController::new(RecordingBackend::default(), 1024).with_metrics(metrics.clone());

        controller.submit().unwrap_err();

        let photo = group_photo();
        fill(&mut controller, Some(photo.path().to_path_buf()));
        controller.submit().unwrap();

        let output = metrics.encode().unwrap();
        assert!(output.contains("attendance_client_validation_rejections_total 1"));
        assert!(output.contains("attendance_client_attendance_success_total 1"));
    }
}
