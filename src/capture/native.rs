//! Hardware camera backed by nokhwa.

use super::{Camera, CameraError, CaptureConfig, Frame};
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType, Resolution},
    NokhwaError,
};

/// A local video device opened through the platform's native backend.
#[derive(Default)]
pub struct NativeCamera {
    device: Option<nokhwa::Camera>,
    sequence: u64,
}

impl NativeCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

fn open_error(err: NokhwaError) -> CameraError {
    match err {
        NokhwaError::UnsupportedOperationError(backend) => {
            CameraError::DeviceNotFound(format!("no usable backend: {backend:?}"))
        }
        other => CameraError::OpenFailed(other.to_string()),
    }
}

impl Camera for NativeCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::HighestResolution(
            Resolution::new(config.width, config.height),
        ));
        let mut device = nokhwa::Camera::new(CameraIndex::Index(config.device_id), requested)
            .map_err(open_error)?;
        device.open_stream().map_err(open_error)?;

        tracing::info!(
            device_id = config.device_id,
            name = %device.info().human_name(),
            "Camera stream opened"
        );

        self.device = Some(device);
        self.sequence = 0;
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let device = self.device.as_mut().ok_or(CameraError::NotInitialized)?;

        let buffer = device
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        self.sequence += 1;
        Ok(Frame::new(decoded.into_raw(), width, height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }

    fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.stop_stream() {
                tracing::warn!(error = %e, "Failed to stop camera stream cleanly");
            }
            tracing::info!("Camera stream closed");
        }
    }
}

impl Drop for NativeCamera {
    fn drop(&mut self) {
        self.close();
    }
}
