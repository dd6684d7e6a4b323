//! Student enrollment: webcam capture and batch submission.
//!
//! ```text
//! validate → acquire camera → tick × (30 + 1) → release → POST /submit
//! ```
//!
//! The controller owns the camera, the ticker and the screen state for the
//! duration of a run.

mod controller;
mod request;
mod session;
mod ticker;

pub use controller::{EnrollmentController, EnrollmentError, EnrollmentState};
pub use request::{EnrollmentForm, EnrollmentRequest, SubmitBody};
pub use session::{CaptureSession, Progress, SessionError, SessionState, TickOutcome, FRAME_TARGET};
pub use ticker::{IntervalTicker, Ticker};
