//! Live camera capture through `nokhwa`.

use super::{CaptureConfig, CaptureError, Frame, FrameSource};
use crate::color::ColorSpace;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};

/// A physical camera opened for streaming.
pub struct NokhwaCamera {
    camera: nokhwa::Camera,
    sequence: u64,
}

impl NokhwaCamera {
    /// Opens the device named by `config.device_id` and starts streaming.
    pub fn open(config: &CaptureConfig) -> Result<Self, CaptureError> {
        let index = CameraIndex::Index(config.device_id);
        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

        let mut camera = nokhwa::Camera::new(index, format)
            .map_err(|e| CaptureError::DeviceNotFound(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| CaptureError::OpenFailed(e.to_string()))?;

        tracing::info!(device = config.device_id, "Camera opened");

        Ok(Self {
            camera,
            sequence: 0,
        })
    }
}

impl FrameSource for NokhwaCamera {
    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        let mut pixels = decoded.into_raw();
        for p in pixels.chunks_exact_mut(3) {
            p.swap(0, 2);
        }

        self.sequence += 1;
        Ok(Frame::from_raw(pixels, width, height, ColorSpace::Bgr, self.sequence)?)
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            tracing::warn!("Failed to stop camera stream: {}", e);
        }
        tracing::info!("Camera closed");
    }
}
