//! Camera input and frame handling.
//!
//! Provides the `Camera` abstraction used by the enrollment screen, a
//! synthetic `MockCamera`, and a hardware camera behind the `camera`
//! feature. Captured frames are encoded to JPEG before upload.

mod camera;
mod config;
mod frame;
#[cfg(feature = "camera")]
mod native;

pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, CaptureConfigError};
pub use frame::{EncodeError, EncodedImage, Frame, RGB_CHANNELS};
#[cfg(feature = "camera")]
pub use native::NativeCamera;
