//! Resampling to the target preview resolution
//!
//! Nearest-neighbor is the default and produces the characteristic blocky
//! look; bilinear is kept as a comparison mode. Both consume an immutable
//! source buffer and return a new owned buffer at the requested size.

use serde::{Deserialize, Serialize};

use super::asset::PixelBuffer;

/// Interpolation policy for resampling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResampleMode {
    /// Sample the single source pixel under each destination pixel
    #[default]
    NearestNeighbor,
    /// Four-neighbor weighted interpolation
    Bilinear,
}

impl ResampleMode {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ResampleMode::NearestNeighbor => "Nearest",
            ResampleMode::Bilinear => "Bilinear",
        }
    }
}

/// Resample `src` to (width, height) with the given mode.
///
/// Channel count carries over; alpha is interpolated like any other channel.
pub fn resample(src: &PixelBuffer, width: u32, height: u32, mode: ResampleMode) -> PixelBuffer {
    match mode {
        ResampleMode::NearestNeighbor => nearest_neighbor(src, width, height),
        ResampleMode::Bilinear => bilinear(src, width, height),
    }
}

fn nearest_neighbor(src: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    let channels = src.channels as usize;
    let mut data = Vec::with_capacity(width as usize * height as usize * channels);

    for y in 0..height as u64 {
        // floor(src_dim * dst_coord / dst_dim), independently per axis
        let src_y = (y * src.height as u64 / height as u64) as usize;
        for x in 0..width as u64 {
            let src_x = (x * src.width as u64 / width as u64) as usize;
            let i = (src_y * src.width as usize + src_x) * channels;
            data.extend_from_slice(&src.data[i..i + channels]);
        }
    }

    PixelBuffer {
        width,
        height,
        channels: src.channels,
        data,
    }
}

fn bilinear(src: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    let channels = src.channels as usize;
    let src_w = src.width as usize;
    let mut data = Vec::with_capacity(width as usize * height as usize * channels);

    let scale_x = src.width as f32 / width as f32;
    let scale_y = src.height as f32 / height as f32;
    let max_x = (src.width - 1) as f32;
    let max_y = (src.height - 1) as f32;

    for y in 0..height {
        // Center-of-pixel mapping
        let sy = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, max_y);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(src.height as usize - 1);
        let fy = sy - y0 as f32;

        for x in 0..width {
            let sx = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, max_x);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(src_w - 1);
            let fx = sx - x0 as f32;

            for c in 0..channels {
                let tl = src.data[(y0 * src_w + x0) * channels + c] as f32;
                let tr = src.data[(y0 * src_w + x1) * channels + c] as f32;
                let bl = src.data[(y1 * src_w + x0) * channels + c] as f32;
                let br = src.data[(y1 * src_w + x1) * channels + c] as f32;

                let top = tl + (tr - tl) * fx;
                let bottom = bl + (br - bl) * fx;
                let value = top + (bottom - top) * fy;
                data.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }
    }

    PixelBuffer {
        width,
        height,
        channels: src.channels,
        data,
    }
}
