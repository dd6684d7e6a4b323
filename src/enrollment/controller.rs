//! Capture-and-submit controller for the enrollment screen.
//!
//! One call to [`EnrollmentController::start_camera_and_capture`] runs the
//! whole sequence: validate, acquire the camera, sample until the buffer is
//! full, release the camera, submit once. Every outcome ends up as the
//! screen's alert.

use super::request::{EnrollmentForm, EnrollmentRequest};
use super::session::{CaptureSession, Progress, SessionError, TickOutcome, FRAME_TARGET};
use super::ticker::Ticker;
use crate::capture::{Camera, CameraError, CaptureConfig};
use crate::client::{Backend, SubmitError};
use crate::metrics::MetricsRegistry;
use crate::notify::{FailureKind, Notification};
use crate::validation::ValidationError;
use thiserror::Error;

const SUBMITTED: &str = "Data submitted successfully!";

/// Why an enrollment run did not complete.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("invalid form: {0}")]
    Validation(#[from] ValidationError),
    #[error("camera unavailable: {0}")]
    Acquire(CameraError),
    #[error("capture aborted after {captured} frames: {source}")]
    Capture {
        captured: usize,
        #[source]
        source: SessionError,
    },
    #[error("capture interrupted after {captured} frames")]
    Interrupted { captured: usize },
    #[error("capture ended with {captured} of {} frames", FRAME_TARGET)]
    Incomplete { captured: usize },
    #[error("submission failed: {0}")]
    Submit(#[from] SubmitError),
}

impl EnrollmentError {
    pub fn kind(&self) -> FailureKind {
        match self {
            EnrollmentError::Validation(_) => FailureKind::Validation,
            EnrollmentError::Acquire(_)
            | EnrollmentError::Capture { .. }
            | EnrollmentError::Interrupted { .. }
            | EnrollmentError::Incomplete { .. } => FailureKind::Device,
            EnrollmentError::Submit(_) => FailureKind::Submission,
        }
    }

    /// The alert shown for this failure.
    pub fn notification(&self) -> Notification {
        match self {
            EnrollmentError::Validation(e) => Notification::error(e.user_message()),
            EnrollmentError::Acquire(_) => {
                Notification::error("Error accessing the camera. Please check permissions.")
            }
            EnrollmentError::Capture { .. } | EnrollmentError::Incomplete { .. } => {
                Notification::error("Error capturing images from the camera. Nothing was submitted.")
            }
            EnrollmentError::Interrupted { captured } => Notification::warning(format!(
                "Capture stopped after {captured} of {FRAME_TARGET} images. Nothing was submitted."
            )),
            EnrollmentError::Submit(e) if e.is_rejection() => {
                Notification::error("Failed to submit data.")
            }
            EnrollmentError::Submit(_) => {
                Notification::error("Error submitting data. Please try again later.")
            }
        }
    }
}

/// Screen state owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentState {
    pub form: EnrollmentForm,
    pub progress: Progress,
    pub alert: Option<Notification>,
}

impl EnrollmentState {
    /// Restores fields and progress to their initial values.
    fn reset(&mut self) {
        self.form = EnrollmentForm::default();
        self.progress = Progress::default();
    }
}

/// Drives enrollment capture and submission.
pub struct EnrollmentController<C, T, B> {
    camera: C,
    ticker: T,
    backend: B,
    capture: CaptureConfig,
    state: EnrollmentState,
    metrics: Option<MetricsRegistry>,
}

impl<C: Camera, T: Ticker, B: Backend> EnrollmentController<C, T, B> {
    pub fn new(camera: C, ticker: T, backend: B, capture: CaptureConfig) -> Self {
        Self {
            camera,
            ticker,
            backend,
            capture,
            state: EnrollmentState::default(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn state(&self) -> &EnrollmentState {
        &self.state
    }

    pub fn form_mut(&mut self) -> &mut EnrollmentForm {
        &mut self.state.form
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs one capture-and-submit sequence.
    ///
    /// `on_progress` is called after every sampled frame. The outcome is
    /// also stored as the screen alert. On success the form is cleared; on
    /// failure the entered values are kept.
    pub fn start_camera_and_capture(
        &mut self,
        mut on_progress: impl FnMut(Progress),
    ) -> Result<(), EnrollmentError> {
        let result = self.run(&mut on_progress);

        let alert = match &result {
            Ok(()) => {
                tracing::info!("Enrollment submitted");
                Notification::success(SUBMITTED)
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), "Enrollment failed");
                e.notification()
            }
        };
        self.state.alert = Some(alert);

        if let Some(metrics) = &self.metrics {
            match &result {
                Err(EnrollmentError::Validation(_)) => metrics.validation_rejected(),
                other => metrics.enrollment_finished(other.is_ok()),
            }
        }
        result
    }

    fn run(&mut self, on_progress: &mut dyn FnMut(Progress)) -> Result<(), EnrollmentError> {
        let (identifier, display_name) = self.state.form.validate()?;

        self.camera
            .open(&self.capture)
            .map_err(EnrollmentError::Acquire)?;
        self.state.progress = Progress::default();
        if let Some(metrics) = &self.metrics {
            metrics.session_started();
        }
        tracing::info!(prnno = %identifier, "Camera acquired, capturing");

        let sampled = self.sample(on_progress);

        // Timer cleared and device released before any network I/O.
        self.ticker.cancel();
        self.camera.close();
        if let Some(metrics) = &self.metrics {
            metrics.device_released();
        }

        let session = sampled?;
        let request = EnrollmentRequest::from_session(identifier, display_name, session)
            .map_err(|captured| EnrollmentError::Incomplete { captured })?;

        self.backend.submit_enrollment(&request)?;
        self.state.reset();
        Ok(())
    }

    /// Ticks until the session is done. Never closes the camera.
    fn sample(
        &mut self,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<CaptureSession, EnrollmentError> {
        let mut session = CaptureSession::new(self.capture.jpeg_quality);
        self.ticker.start();

        loop {
            if !self.ticker.wait() {
                return Err(EnrollmentError::Interrupted {
                    captured: session.frame_count(),
                });
            }

            match session.on_tick(&mut self.camera) {
                Ok(TickOutcome::Captured(progress)) => {
                    self.state.progress = progress;
                    if let Some(metrics) = &self.metrics {
                        metrics.frame_captured(progress.captured);
                    }
                    on_progress(progress);
                }
                Ok(TickOutcome::Done) => return Ok(session),
                Err(source) => {
                    return Err(EnrollmentError::Capture {
                        captured: session.frame_count(),
                        source,
                    })
                }
            }
        }
    }
}
