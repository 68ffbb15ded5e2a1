//! Image loading and metadata extraction
//!
//! Decodes a selected image into a normalized 8-bit RGB/RGBA buffer and
//! derives the metadata shown next to the preview: detected format, pixel
//! dimensions, human-readable file size. Decoding sniffs the actual bytes;
//! the file extension only drives the display MIME type and the format-name
//! fallback.

use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use image::ImageReader;

/// Owned 8-bit pixel buffer, 3 (RGB) or 4 (RGBA) channels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// 3 = RGB, 4 = RGBA
    pub channels: u8,
    /// `width * height * channels` samples
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Whether the buffer carries an alpha channel
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Sample at (x, y); alpha reported as 255 for RGB buffers
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let c = self.channels as usize;
        let i = (y as usize * self.width as usize + x as usize) * c;
        let alpha = if c == 4 { self.data[i + 3] } else { 255 };
        [self.data[i], self.data[i + 1], self.data[i + 2], alpha]
    }
}

/// Error type for image load operations
#[derive(Debug)]
pub enum AssetError {
    Io(std::io::Error),
    Decode(image::ImageError),
}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::Decode(e)
    }
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Io(e) => write!(f, "read error: {}", e),
            AssetError::Decode(e) => write!(f, "decode error: {}", e),
        }
    }
}

impl std::error::Error for AssetError {}

/// A decoded image plus the metadata the preview panel shows
#[derive(Debug, Clone)]
pub struct ImageAsset {
    /// Normalized pixels (RGB8 or RGBA8)
    pub pixels: PixelBuffer,
    /// Decoder-reported format name, e.g. "PNG"
    pub format: String,
    /// Resolution string, e.g. "64 × 64"
    pub resolution: String,
    /// Source size in bytes
    pub file_size: u64,
    /// Human-readable source size, e.g. "2.0 KB"
    pub file_size_display: String,
    /// MIME type for display wrapping (from the extension map)
    pub mime: &'static str,
    /// Raw source bytes, kept so the original can be display-wrapped as-is
    pub source_bytes: Vec<u8>,
}

impl ImageAsset {
    /// Base64 data URI over the original source bytes
    pub fn display_data_uri(&self) -> String {
        to_data_uri(&self.source_bytes, self.mime)
    }
}

/// Load and decode the image at `relative_path` under `root`.
///
/// The decoder guesses the format from content, never from the extension.
/// Pixels normalize to RGB8 when the source has no alpha, RGBA8 otherwise.
pub fn load_asset(root: &Path, relative_path: &str) -> Result<ImageAsset, AssetError> {
    let full_path = root.join(relative_path);
    let bytes = std::fs::read(&full_path)?;

    let reader = ImageReader::new(Cursor::new(&bytes)).with_guessed_format()?;
    let detected = reader.format();
    let decoded = reader.decode()?;

    let extension = extension_of(relative_path);
    let format = match detected {
        Some(f) => format!("{:?}", f).to_uppercase(),
        None => extension.to_uppercase(),
    };

    let pixels = if decoded.color().has_alpha() {
        let rgba = decoded.to_rgba8();
        PixelBuffer {
            width: rgba.width(),
            height: rgba.height(),
            channels: 4,
            data: rgba.into_raw(),
        }
    } else {
        let rgb = decoded.to_rgb8();
        PixelBuffer {
            width: rgb.width(),
            height: rgb.height(),
            channels: 3,
            data: rgb.into_raw(),
        }
    };

    let file_size = bytes.len() as u64;
    Ok(ImageAsset {
        resolution: format!("{} × {}", pixels.width, pixels.height),
        format,
        file_size,
        file_size_display: format_size(file_size),
        mime: mime_for_extension(&extension),
        pixels,
        source_bytes: bytes,
    })
}

/// Display MIME type for a file extension (lowercase, without dot).
///
/// Used only for wrapping bytes into a data URI; decoding sniffs content.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => "image/png",
    }
}

/// Human-readable byte count: B below 1 KB, then one-decimal KB / MB
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / MB)
    }
}

/// Wrap bytes into a base64 data URI for direct display embedding
pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, payload)
}

fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("jpg"), "image/jpeg");
        assert_eq!(mime_for_extension("jpeg"), "image/jpeg");
        assert_eq!(mime_for_extension("png"), "image/png");
        assert_eq!(mime_for_extension("bmp"), "image/bmp");
        assert_eq!(mime_for_extension("webp"), "image/webp");
        // Anything else falls back to PNG for display
        assert_eq!(mime_for_extension("tga"), "image/png");
        assert_eq!(mime_for_extension("exr"), "image/png");
    }

    #[test]
    fn test_to_data_uri() {
        let uri = to_data_uri(b"abc", "image/png");
        assert_eq!(uri, "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_load_asset_rgb_png() {
        let dir = TempDir::new().unwrap();
        let img = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        img.save(dir.path().join("tex.png")).unwrap();

        let asset = load_asset(dir.path(), "tex.png").unwrap();
        assert_eq!(asset.format, "PNG");
        assert_eq!(asset.resolution, "3 × 2");
        assert_eq!(asset.mime, "image/png");
        assert_eq!(asset.pixels.channels, 3);
        assert_eq!(asset.pixels.width, 3);
        assert_eq!(asset.pixels.height, 2);
        assert_eq!(asset.pixels.pixel(0, 0), [10, 20, 30, 255]);
        assert!(asset.display_data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_load_asset_preserves_alpha() {
        let dir = TempDir::new().unwrap();
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 128]));
        img.save(dir.path().join("tex.png")).unwrap();

        let asset = load_asset(dir.path(), "tex.png").unwrap();
        assert_eq!(asset.pixels.channels, 4);
        assert_eq!(asset.pixels.pixel(1, 1), [1, 2, 3, 128]);
    }

    #[test]
    fn test_load_asset_sniffs_content_not_extension() {
        // PNG bytes behind a .jpg name still decode as PNG; only the display
        // MIME follows the extension
        let dir = TempDir::new().unwrap();
        let img = image::RgbImage::from_pixel(1, 1, image::Rgb([0, 0, 0]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        std::fs::write(dir.path().join("fake.jpg"), &bytes).unwrap();

        let asset = load_asset(dir.path(), "fake.jpg").unwrap();
        assert_eq!(asset.format, "PNG");
        assert_eq!(asset.mime, "image/jpeg");
    }

    #[test]
    fn test_load_asset_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_asset(dir.path(), "nope.png"),
            Err(AssetError::Io(_))
        ));
    }

    #[test]
    fn test_load_asset_undecodable() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("junk.png"), b"not an image at all").unwrap();
        assert!(matches!(
            load_asset(dir.path(), "junk.png"),
            Err(AssetError::Decode(_))
        ));
    }
}
