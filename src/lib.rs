//! Attendance Client Library
//!
//! Client side of a face-recognition attendance system. Two screens talk to
//! an external backend:
//!
//! - **Add Student** samples 30 webcam frames, one per second, and submits
//!   them with the student's PRN and name to `POST /submit`.
//! - **Mark Attendance** uploads a single group photograph with class
//!   details to `POST /upload`.
//!
//! # Architecture
//!
//! ```text
//! form → validation → capture (camera + ticker) → client (HTTP)
//!                                  ↓                  ↓
//!                           progress observer    notification
//! ```
//!
//! # Example
//!
//! ```no_run
//! use attendance_client::{
//!     capture::{CaptureConfig, MockCamera},
//!     client::HttpBackend,
//!     config::BackendConfig,
//!     enrollment::{EnrollmentController, EnrollmentForm, IntervalTicker},
//! };
//!
//! let capture = CaptureConfig::default();
//! let backend = HttpBackend::new(&BackendConfig::default()).unwrap();
//! let ticker = IntervalTicker::new(capture.frame_interval());
//!
//! let mut controller = EnrollmentController::new(MockCamera::new(), ticker, backend, capture);
//! *controller.form_mut() = EnrollmentForm::new("PRN001", "Asha");
//!
//! let _ = controller.start_camera_and_capture(|p| println!("{:.0}%", p.percent()));
//! println!("{}", controller.state().alert.as_ref().unwrap());
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod attendance;
pub mod capture;
pub mod client;
pub mod config;
pub mod enrollment;
pub mod metrics;
pub mod notify;
pub mod screen;
pub mod validation;

// Re-export commonly used types at crate root
pub use attendance::{AttendanceController, AttendanceError, AttendanceForm};
pub use capture::{Camera, CaptureConfig, EncodedImage, Frame, MockCamera};
pub use client::{Backend, HttpBackend, SubmitError};
pub use config::FileConfig;
pub use enrollment::{EnrollmentController, EnrollmentError, EnrollmentForm, Progress, FRAME_TARGET};
pub use notify::{FailureKind, Notification, Severity};
pub use screen::Screen;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
