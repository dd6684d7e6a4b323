//! Prometheus counters for client activity.
//!
//! # Metrics Exposed
//!
//! ## Capture
//! - `attendance_client_capture_sessions_total` - Sessions that acquired the camera
//! - `attendance_client_device_releases_total` - Camera releases
//! - `attendance_client_frames_captured_total` - Frames encoded into a buffer
//! - `attendance_client_capture_progress_frames` - Frames in the current buffer
//!
//! ## Submission
//! - `attendance_client_validation_rejections_total` - Forms rejected before I/O
//! - `attendance_client_enrollment_success_total` / `_failure_total`
//! - `attendance_client_attendance_success_total` / `_failure_total`
//!
//! The CLI prints the text encoding on exit when `--print-metrics` is set.

mod collector;

pub use collector::{MetricsError, MetricsRegistry};
