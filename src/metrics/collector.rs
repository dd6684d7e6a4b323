//! Metrics collection and registry.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus registry for client activity.
///
/// Cloning is cheap; clones share the same underlying counters.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,

    // Capture metrics
    capture_sessions_total: IntCounter,
    device_releases_total: IntCounter,
    frames_captured_total: IntCounter,
    capture_progress_frames: IntGauge,

    // Submission metrics
    validation_rejections_total: IntCounter,
    enrollment_success_total: IntCounter,
    enrollment_failure_total: IntCounter,
    attendance_success_total: IntCounter,
    attendance_failure_total: IntCounter,
}

impl MetricsRegistry {
    /// Creates a new registry with all client metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let capture_sessions_total = IntCounter::new(
            "attendance_client_capture_sessions_total",
            "Capture sessions that acquired the camera",
        )?;
        let device_releases_total = IntCounter::new(
            "attendance_client_device_releases_total",
            "Times the camera was released after a capture session",
        )?;
        let frames_captured_total = IntCounter::new(
            "attendance_client_frames_captured_total",
            "Frames sampled and encoded into a capture buffer",
        )?;
        let capture_progress_frames = IntGauge::new(
            "attendance_client_capture_progress_frames",
            "Frames in the current capture buffer",
        )?;
        let validation_rejections_total = IntCounter::new(
            "attendance_client_validation_rejections_total",
            "Submissions rejected by form validation before any I/O",
        )?;
        let enrollment_success_total = IntCounter::new(
            "attendance_client_enrollment_success_total",
            "Enrollment batches accepted by the backend",
        )?;
        let enrollment_failure_total = IntCounter::new(
            "attendance_client_enrollment_failure_total",
            "Enrollment runs that ended in a camera or submission error",
        )?;
        let attendance_success_total = IntCounter::new(
            "attendance_client_attendance_success_total",
            "Group images accepted by the backend",
        )?;
        let attendance_failure_total = IntCounter::new(
            "attendance_client_attendance_failure_total",
            "Group image uploads that failed",
        )?;

        registry.register(Box::new(capture_sessions_total.clone()))?;
        registry.register(Box::new(device_releases_total.clone()))?;
        registry.register(Box::new(frames_captured_total.clone()))?;
        registry.register(Box::new(capture_progress_frames.clone()))?;
        registry.register(Box::new(validation_rejections_total.clone()))?;
        registry.register(Box::new(enrollment_success_total.clone()))?;
        registry.register(Box::new(enrollment_failure_total.clone()))?;
        registry.register(Box::new(attendance_success_total.clone()))?;
        registry.register(Box::new(attendance_failure_total.clone()))?;

        Ok(Self {
            registry,
            capture_sessions_total,
            device_releases_total,
            frames_captured_total,
            capture_progress_frames,
            validation_rejections_total,
            enrollment_success_total,
            enrollment_failure_total,
            attendance_success_total,
            attendance_failure_total,
        })
    }

    pub fn session_started(&self) {
        self.capture_sessions_total.inc();
        self.capture_progress_frames.set(0);
    }

    pub fn device_released(&self) {
        self.device_releases_total.inc();
    }

    pub fn frame_captured(&self, buffered: usize) {
        self.frames_captured_total.inc();
        self.capture_progress_frames.set(buffered as i64);
    }

    pub fn validation_rejected(&self) {
        self.validation_rejections_total.inc();
    }

    pub fn enrollment_finished(&self, success: bool) {
        if success {
            self.enrollment_success_total.inc();
            self.capture_progress_frames.set(0);
        } else {
            self.enrollment_failure_total.inc();
        }
    }

    pub fn attendance_finished(&self, success: bool) {
        if success {
            self.attendance_success_total.inc();
        } else {
            self.attendance_failure_total.inc();
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_capture_metrics() {
        let registry = MetricsRegistry::new().unwrap();

        registry.session_started();
        for n in 1..=3 {
            registry.frame_captured(n);
        }
        registry.device_released();
        registry.enrollment_finished(false);

        let output = registry.encode().unwrap();
        assert!(output.contains("attendance_client_capture_sessions_total 1"));
        assert!(output.contains("attendance_client_frames_captured_total 3"));
        assert!(output.contains("attendance_client_capture_progress_frames 3"));
        assert!(output.contains("attendance_client_device_releases_total 1"));
        assert!(output.contains("attendance_client_enrollment_failure_total 1"));
    }

    #[test]
    fn test_clones_share_counters() {
        let registry = MetricsRegistry::new().unwrap();
        let clone = registry.clone();

        clone.attendance_finished(true);
        clone.validation_rejected();

        let output = registry.encode().unwrap();
        assert!(output.contains("attendance_client_attendance_success_total 1"));
        assert!(output.contains("attendance_client_validation_rejections_total 1"));
    }
}
