//! The degrade pipeline: resample, quantize, re-encode
//!
//! One synchronous pass per request: resample the decoded buffer to the
//! target resolution, cut color depth to 16/8/4 bits, then re-encode as PNG
//! so the preview is always a lossless raster regardless of the internal
//! quantization representation. Results are produced per request and never
//! cached; the source buffer is left untouched.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use super::asset::{to_data_uri, PixelBuffer};
use super::quantize::{build_palette, map_to_palette, truncate_rgb565};
use super::resample::{resample, ResampleMode};

/// Target color depth for quantization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorDepth {
    /// RGB565-style bit truncation
    #[default]
    Bits16,
    /// Adaptive palette, at most 256 colors
    Bits8,
    /// Adaptive palette, at most 16 colors
    Bits4,
}

impl ColorDepth {
    /// Palette budget for palette-based depths; None for bit truncation
    pub fn palette_size(&self) -> Option<usize> {
        match self {
            ColorDepth::Bits16 => None,
            ColorDepth::Bits8 => Some(256),
            ColorDepth::Bits4 => Some(16),
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ColorDepth::Bits16 => "16-bit",
            ColorDepth::Bits8 => "8-bit",
            ColorDepth::Bits4 => "4-bit",
        }
    }
}

/// One preview request from the UI controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingRequest {
    pub target_width: u32,
    pub target_height: u32,
    pub mode: ResampleMode,
    pub depth: ColorDepth,
    /// Error-diffusion dithering; meaningful for Bits8/Bits4 only
    pub dither: bool,
}

impl Default for ProcessingRequest {
    fn default() -> Self {
        Self {
            target_width: 64,
            target_height: 64,
            mode: ResampleMode::default(),
            depth: ColorDepth::default(),
            dither: false,
        }
    }
}

/// Error type for processing requests
#[derive(Debug)]
pub enum ProcessError {
    /// Request validation failed (zero target dimension)
    InvalidRequest(String),
    /// PNG re-encoding failed
    Encode(image::ImageError),
}

impl From<image::ImageError> for ProcessError {
    fn from(e: image::ImageError) -> Self {
        ProcessError::Encode(e)
    }
}

impl std::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessError::InvalidRequest(e) => write!(f, "invalid request: {}", e),
            ProcessError::Encode(e) => write!(f, "encode error: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {}

/// A degraded preview, ready for display
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Quantized pixels at target resolution
    pub pixels: PixelBuffer,
    /// Lossless PNG encoding of `pixels`
    pub png_bytes: Vec<u8>,
}

impl ProcessedImage {
    /// Base64 data URI over the PNG bytes for direct embedding
    pub fn display_data_uri(&self) -> String {
        to_data_uri(&self.png_bytes, "image/png")
    }
}

/// Run the degrade pipeline on a decoded buffer.
///
/// `src` is read-only; every stage produces a new owned buffer. Palette
/// depths expand indices back to full RGB(A) samples before encoding, so
/// the output is always a standard raster.
pub fn process(src: &PixelBuffer, request: &ProcessingRequest) -> Result<ProcessedImage, ProcessError> {
    if request.target_width == 0 || request.target_height == 0 {
        return Err(ProcessError::InvalidRequest(format!(
            "target dimensions must be positive, got {}x{}",
            request.target_width, request.target_height
        )));
    }

    let resampled = resample(src, request.target_width, request.target_height, request.mode);

    let quantized = match request.depth.palette_size() {
        None => truncate_rgb565(&resampled),
        Some(max_colors) => {
            let palette = build_palette(&resampled, max_colors);
            map_to_palette(&resampled, &palette, request.dither)
        }
    };

    let png_bytes = encode_png(&quantized)?;
    Ok(ProcessedImage {
        pixels: quantized,
        png_bytes,
    })
}

fn encode_png(buf: &PixelBuffer) -> Result<Vec<u8>, ProcessError> {
    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);

    if buf.has_alpha() {
        let img = image::RgbaImage::from_raw(buf.width, buf.height, buf.data.clone())
            .ok_or_else(|| {
                ProcessError::InvalidRequest("pixel buffer does not match its dimensions".into())
            })?;
        img.write_to(&mut cursor, image::ImageFormat::Png)?;
    } else {
        let img = image::RgbImage::from_raw(buf.width, buf.height, buf.data.clone())
            .ok_or_else(|| {
                ProcessError::InvalidRequest("pixel buffer does not match its dimensions".into())
            })?;
        img.write_to(&mut cursor, image::ImageFormat::Png)?;
    }

    Ok(bytes)
}
