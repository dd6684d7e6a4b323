//! Frame type representing a captured image with metadata.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, ExtendedColorType};
use std::time::Instant;
use thiserror::Error;

/// Bytes per pixel for the packed RGB8 layout used by all frames.
pub const RGB_CHANNELS: usize = 3;

/// Errors raised while encoding a frame.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("frame buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    SizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },
    #[error("jpeg encoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
}

/// A single captured frame from the camera.
///
/// Pixels are packed RGB8, row-major, no padding.
#[derive(Clone)]
pub struct Frame {
    /// Raw RGB pixel data.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Capture timestamp.
    timestamp: Instant,
    /// Monotonic sequence number.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the expected buffer length for the frame dimensions.
    #[inline]
    pub fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * RGB_CHANNELS
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.expected_len() && self.width > 0 && self.height > 0
    }

    /// Encodes the frame as a JPEG at the given quality (1-100).
    pub fn encode_jpeg(&self, quality: u8) -> Result<EncodedImage, EncodeError> {
        if !self.is_valid() {
            return Err(EncodeError::SizeMismatch {
                actual: self.pixels.len(),
                expected: self.expected_len(),
                width: self.width,
                height: self.height,
            });
        }

        let mut jpeg = Vec::with_capacity(self.pixels.len() / 8);
        JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100)).encode(
            &self.pixels,
            self.width,
            self.height,
            ExtendedColorType::Rgb8,
        )?;

        tracing::trace!(
            sequence = self.sequence,
            jpeg_bytes = jpeg.len(),
            "Encoded frame"
        );

        Ok(EncodedImage {
            jpeg,
            sequence: self.sequence,
        })
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

/// A JPEG-encoded frame ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    jpeg: Vec<u8>,
    sequence: u64,
}

impl EncodedImage {
    /// Wraps already-encoded JPEG bytes.
    pub fn from_jpeg(jpeg: Vec<u8>, sequence: u64) -> Self {
        Self { jpeg, sequence }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.jpeg
    }

    /// Sequence number of the source frame.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Renders the image as a `data:image/jpeg;base64,...` URL.
    ///
    /// The backend strips everything up to the first comma before decoding,
    /// so the prefix must be present.
    pub fn to_data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(&self.jpeg))
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("sequence", &self.sequence)
            .field("jpeg_bytes", &self.jpeg.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let pixels = vec![0u8; 64 * 48 * RGB_CHANNELS];
        let frame = Frame::new(pixels, 64, 48, 1);

        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 48);
        assert_eq!(frame.sequence(), 1);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_frame_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let frame = Frame::new(pixels, 640, 480, 1);

        assert!(!frame.is_valid());
        assert!(matches!(
            frame.encode_jpeg(80),
            Err(EncodeError::SizeMismatch { actual: 100, .. })
        ));
    }

    #[test]
    fn test_encode_produces_jpeg_markers() {
        let frame = Frame::new(vec![128u8; 16 * 16 * RGB_CHANNELS], 16, 16, 7);
        let encoded = frame.encode_jpeg(90).unwrap();

        let bytes = encoded.as_bytes();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
        assert_eq!(encoded.sequence(), 7);
    }

    #[test]
    fn test_data_url_prefix() {
        let encoded = EncodedImage::from_jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9], 1);
        assert_eq!(encoded.to_data_url(), "data:image/jpeg;base64,/9j/2Q==");
    }
}
