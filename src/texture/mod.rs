//! Image processing for texture previews
//!
//! Two halves that share only the normalized `PixelBuffer` type:
//!
//! - **asset**: decode a selected image, extract the metadata shown next to
//!   the preview (format, resolution, human-readable size)
//! - **degrade pipeline**: resample to a target resolution, cut color depth
//!   to 16/8/4 bits (optionally dithered), re-encode as PNG
//!
//! Nothing here holds state between calls; every stage consumes an immutable
//! input buffer and produces a new owned one.

mod asset;
mod degrade;
mod quantize;
mod resample;

pub use asset::{
    format_size, load_asset, mime_for_extension, to_data_uri, AssetError, ImageAsset, PixelBuffer,
};
pub use degrade::{process, ColorDepth, ProcessError, ProcessedImage, ProcessingRequest};
pub use quantize::{build_palette, map_to_palette, nearest_color, truncate_rgb565};
pub use resample::{resample, ResampleMode};
