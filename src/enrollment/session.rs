//! Capture session state machine.
//!
//! A session accumulates exactly [`FRAME_TARGET`] encoded frames. Each tick
//! either samples one frame or, once the buffer is full, moves the session
//! to `Done`. Only a `Done` session yields its frames.

use crate::capture::{Camera, CameraError, EncodeError, EncodedImage};
use thiserror::Error;

/// Number of frames in one enrollment batch.
pub const FRAME_TARGET: usize = 30;

/// Errors that abort a capture session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("frame capture failed: {0}")]
    Camera(#[from] CameraError),
    #[error("frame encoding failed: {0}")]
    Encode(#[from] EncodeError),
}

/// Session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Capturing,
    Done,
}

/// Capture progress reported after every sampled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub captured: usize,
    pub target: usize,
}

impl Progress {
    pub fn new(captured: usize, target: usize) -> Self {
        Self { captured, target }
    }

    /// Progress as a percentage in `0.0..=100.0`.
    pub fn percent(&self) -> f64 {
        if self.target == 0 {
            return 0.0;
        }
        (self.captured as f64 / self.target as f64) * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.captured >= self.target
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(0, FRAME_TARGET)
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was sampled into the buffer.
    Captured(Progress),
    /// The buffer was already full; the session is now `Done`.
    Done,
}

/// Transient state of one capture run.
#[derive(Debug)]
pub struct CaptureSession {
    frames: Vec<EncodedImage>,
    jpeg_quality: u8,
    state: SessionState,
}

impl CaptureSession {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            frames: Vec::with_capacity(FRAME_TARGET),
            jpeg_quality,
            state: SessionState::Capturing,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.frames.len(), FRAME_TARGET)
    }

    /// Handles one timer tick.
    ///
    /// The camera is only touched while capturing and the buffer has room.
    /// Ticking a `Done` session is a no-op that returns `Done` again.
    pub fn on_tick<C: Camera + ?Sized>(
        &mut self,
        camera: &mut C,
    ) -> Result<TickOutcome, SessionError> {
        if self.state == SessionState::Done {
            return Ok(TickOutcome::Done);
        }

        if self.frames.len() >= FRAME_TARGET {
            self.state = SessionState::Done;
            tracing::debug!(frames = self.frames.len(), "Capture buffer full");
            return Ok(TickOutcome::Done);
        }

        let frame = camera.capture()?;
        let encoded = frame.encode_jpeg(self.jpeg_quality)?;
        self.frames.push(encoded);

        let progress = self.progress();
        tracing::debug!(
            captured = progress.captured,
            target = progress.target,
            sequence = frame.sequence(),
            "Sampled frame"
        );
        Ok(TickOutcome::Captured(progress))
    }

    /// Consumes a finished session, yielding its frames in capture order.
    ///
    /// Returns `None` unless the session is `Done` with a full buffer.
    pub fn into_frames(self) -> Option<Vec<EncodedImage>> {
        (self.state == SessionState::Done && self.frames.len() == FRAME_TARGET)
            .then_some(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureConfig, MockCamera};

    fn open_camera() -> MockCamera {
        let mut camera = MockCamera::new();
        camera.open(&CaptureConfig::with_dimensions(8, 8)).unwrap();
        camera
    }

    #[test]
    fn test_full_run_yields_target_frames_in_order() {
        let mut camera = open_camera();
        let mut session = CaptureSession::new(80);

        for n in 1..=FRAME_TARGET {
            let outcome = session.on_tick(&mut camera).unwrap();
            assert_eq!(outcome, TickOutcome::Captured(Progress::new(n, FRAME_TARGET)));
        }
        assert_eq!(session.state(), SessionState::Capturing);

        // The tick after the last sample performs the transition.
        assert_eq!(session.on_tick(&mut camera).unwrap(), TickOutcome::Done);
        assert_eq!(session.state(), SessionState::Done);

        let frames = session.into_frames().unwrap();
        let sequences: Vec<u64> = frames.iter().map(|f| f.sequence()).collect();
        assert_eq!(sequences, (1..=FRAME_TARGET as u64).collect::<Vec<_>>());
    }

    #[test]
    fn test_done_session_does_not_touch_camera() {
        let mut camera = open_camera();
        let mut session = CaptureSession::new(80);
        for _ in 0..=FRAME_TARGET {
            session.on_tick(&mut camera).unwrap();
        }

        camera.close();
        // A closed camera would fail to capture; Done must short-circuit.
        assert_eq!(session.on_tick(&mut camera).unwrap(), TickOutcome::Done);
    }

    #[test]
    fn test_partial_session_yields_nothing() {
        let mut camera = open_camera();
        let mut session = CaptureSession::new(80);
        for _ in 0..FRAME_TARGET - 1 {
            session.on_tick(&mut camera).unwrap();
        }
        assert_eq!(session.frame_count(), FRAME_TARGET - 1);
        assert!(session.into_frames().is_none());
    }

    #[test]
    fn test_capture_error_propagates() {
        let mut camera = MockCamera::new();
        let mut session = CaptureSession::new(80);
        assert!(matches!(
            session.on_tick(&mut camera),
            Err(SessionError::Camera(CameraError::NotInitialized))
        ));
        assert_eq!(session.frame_count(), 0);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(Progress::new(15, 30).percent(), 50.0);
        assert_eq!(Progress::default().percent(), 0.0);
        assert!(Progress::new(30, 30).is_complete());
        assert_eq!(Progress::new(1, 0).percent(), 0.0);
    }
}
