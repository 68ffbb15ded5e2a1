//! Color-depth quantization
//!
//! Three reductions, matching what the console hardware would store:
//!
//! - 16-bit: RGB565-style per-channel bit truncation
//! - 8-bit: adaptive palette of at most 256 colors (median cut)
//! - 4-bit: adaptive palette of at most 16 colors (median cut)
//!
//! Median cut recursively splits the bucket with the largest color range
//! along its widest axis until the palette budget is reached. Mapping is
//! nearest-entry by weighted distance (green counts double); with dithering
//! enabled the residual error diffuses to unvisited neighbors
//! Floyd–Steinberg style.

use super::asset::PixelBuffer;

/// RGB565-style truncation: top 5 bits of red and blue, top 6 of green.
///
/// Alpha is untouched. Idempotent: truncating twice changes nothing.
pub fn truncate_rgb565(src: &PixelBuffer) -> PixelBuffer {
    let channels = src.channels as usize;
    let mut data = src.data.clone();
    for pixel in data.chunks_mut(channels) {
        pixel[0] &= 0xF8;
        pixel[1] &= 0xFC;
        pixel[2] &= 0xF8;
    }

    PixelBuffer {
        width: src.width,
        height: src.height,
        channels: src.channels,
        data,
    }
}

/// Build an adaptive palette of at most `max_colors` entries for `src`
pub fn build_palette(src: &PixelBuffer, max_colors: usize) -> Vec<[u8; 3]> {
    let channels = src.channels as usize;
    let colors: Vec<[u8; 3]> = src
        .data
        .chunks(channels)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    median_cut(&colors, max_colors)
}

/// Map every pixel to a palette entry, expanding back to full samples.
///
/// Alpha passes through untouched. With `dither` set, quantization error
/// diffuses to unvisited neighbors; otherwise each pixel independently maps
/// to its nearest entry.
pub fn map_to_palette(src: &PixelBuffer, palette: &[[u8; 3]], dither: bool) -> PixelBuffer {
    if dither {
        map_with_dither(src, palette)
    } else {
        map_nearest(src, palette)
    }
}

/// Index of the nearest palette entry (weighted distance, green counts double)
pub fn nearest_color(target: [u8; 3], palette: &[[u8; 3]]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;

    for (i, color) in palette.iter().enumerate() {
        let dr = (target[0] as i32 - color[0] as i32).unsigned_abs();
        let dg = (target[1] as i32 - color[1] as i32).unsigned_abs();
        let db = (target[2] as i32 - color[2] as i32).unsigned_abs();
        let dist = dr * dr + dg * dg * 2 + db * db;

        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
        if dist == 0 {
            break;
        }
    }

    best_idx
}

fn map_nearest(src: &PixelBuffer, palette: &[[u8; 3]]) -> PixelBuffer {
    let channels = src.channels as usize;
    let mut data = Vec::with_capacity(src.data.len());

    for pixel in src.data.chunks(channels) {
        let entry = palette[nearest_color([pixel[0], pixel[1], pixel[2]], palette)];
        data.extend_from_slice(&entry);
        if channels == 4 {
            data.push(pixel[3]);
        }
    }

    PixelBuffer {
        width: src.width,
        height: src.height,
        channels: src.channels,
        data,
    }
}

fn map_with_dither(src: &PixelBuffer, palette: &[[u8; 3]]) -> PixelBuffer {
    let width = src.width as usize;
    let height = src.height as usize;
    let channels = src.channels as usize;

    // Working copy in i16: diffused error can push values out of 0-255
    let mut work: Vec<[i16; 3]> = src
        .data
        .chunks(channels)
        .map(|p| [p[0] as i16, p[1] as i16, p[2] as i16])
        .collect();

    let mut data = Vec::with_capacity(src.data.len());

    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let want = [
                work[i][0].clamp(0, 255) as u8,
                work[i][1].clamp(0, 255) as u8,
                work[i][2].clamp(0, 255) as u8,
            ];
            let entry = palette[nearest_color(want, palette)];
            data.extend_from_slice(&entry);
            if channels == 4 {
                data.push(src.data[i * channels + 3]);
            }

            let err = [
                want[0] as i16 - entry[0] as i16,
                want[1] as i16 - entry[1] as i16,
                want[2] as i16 - entry[2] as i16,
            ];

            // Floyd–Steinberg weights: 7/16 right, 3/16 down-left,
            // 5/16 down, 1/16 down-right
            if x + 1 < width {
                diffuse(&mut work[i + 1], err, 7);
            }
            if y + 1 < height {
                if x > 0 {
                    diffuse(&mut work[i + width - 1], err, 3);
                }
                diffuse(&mut work[i + width], err, 5);
                if x + 1 < width {
                    diffuse(&mut work[i + width + 1], err, 1);
                }
            }
        }
    }

    PixelBuffer {
        width: src.width,
        height: src.height,
        channels: src.channels,
        data,
    }
}

fn diffuse(target: &mut [i16; 3], err: [i16; 3], weight: i16) {
    for c in 0..3 {
        target[c] += err[c] * weight / 16;
    }
}

/// Median cut over RGB888.
///
/// Recursively divides the color space by splitting along the axis with the
/// largest range until we have the desired number of buckets, then averages
/// each bucket into one palette entry.
fn median_cut(colors: &[[u8; 3]], max_colors: usize) -> Vec<[u8; 3]> {
    if colors.is_empty() {
        return vec![[0, 0, 0]];
    }

    // Fewer unique colors than the budget: the palette is exact
    let mut unique: Vec<[u8; 3]> = colors.to_vec();
    unique.sort();
    unique.dedup();
    if unique.len() <= max_colors {
        return unique;
    }

    let mut buckets: Vec<Vec<[u8; 3]>> = vec![colors.to_vec()];

    while buckets.len() < max_colors {
        // Split the bucket with the largest volume (color range)
        let (split_idx, max_volume) = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (i, bucket_volume(b)))
            .max_by_key(|(_, v)| *v)
            .unwrap_or((0, 0));
        if max_volume == 0 {
            break;
        }

        let bucket = buckets.remove(split_idx);
        if bucket.len() <= 1 {
            buckets.push(bucket);
            continue;
        }

        // Widest axis, then split at the median along it
        let (r_range, g_range, b_range) = bucket_ranges(&bucket);
        let axis = if r_range >= g_range && r_range >= b_range {
            0
        } else if g_range >= b_range {
            1
        } else {
            2
        };

        let mut sorted = bucket;
        sorted.sort_by_key(|c| c[axis]);

        let mid = sorted.len() / 2;
        let (left, right) = sorted.split_at(mid);
        if !left.is_empty() {
            buckets.push(left.to_vec());
        }
        if !right.is_empty() {
            buckets.push(right.to_vec());
        }
    }

    buckets.iter().map(|b| average_color(b)).collect()
}

fn bucket_volume(colors: &[[u8; 3]]) -> u32 {
    if colors.is_empty() {
        return 0;
    }
    let (r_range, g_range, b_range) = bucket_ranges(colors);
    r_range as u32 * g_range as u32 * b_range as u32
}

fn bucket_ranges(colors: &[[u8; 3]]) -> (u8, u8, u8) {
    let (mut r_min, mut r_max) = (255u8, 0u8);
    let (mut g_min, mut g_max) = (255u8, 0u8);
    let (mut b_min, mut b_max) = (255u8, 0u8);

    for c in colors {
        r_min = r_min.min(c[0]);
        r_max = r_max.max(c[0]);
        g_min = g_min.min(c[1]);
        g_max = g_max.max(c[1]);
        b_min = b_min.min(c[2]);
        b_max = b_max.max(c[2]);
    }

    (
        r_max.saturating_sub(r_min),
        g_max.saturating_sub(g_min),
        b_max.saturating_sub(b_min),
    )
}

fn average_color(colors: &[[u8; 3]]) -> [u8; 3] {
    if colors.is_empty() {
        return [0, 0, 0];
    }

    let (mut r_sum, mut g_sum, mut b_sum) = (0u64, 0u64, 0u64);
    for c in colors {
        r_sum += c[0] as u64;
        g_sum += c[1] as u64;
        b_sum += c[2] as u64;
    }

    let n = colors.len() as u64;
    [(r_sum / n) as u8, (g_sum / n) as u8, (b_sum / n) as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic noisy test image, many distinct colors
    fn noise(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 31 + y * 7) as u8);
                data.push((x * 13 + y * 59) as u8);
                data.push((x * 97 + y * 3) as u8);
            }
        }
        PixelBuffer {
            width,
            height,
            channels: 3,
            data,
        }
    }

    fn unique_colors(buf: &PixelBuffer) -> usize {
        let channels = buf.channels as usize;
        let mut seen: Vec<[u8; 3]> = buf
            .data
            .chunks(channels)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        seen.sort();
        seen.dedup();
        seen.len()
    }

    #[test]
    fn test_truncate_rgb565_masks() {
        let src = PixelBuffer {
            width: 2,
            height: 1,
            channels: 3,
            data: vec![255, 255, 255, 7, 3, 7],
        };
        let out = truncate_rgb565(&src);
        assert_eq!(out.data, vec![248, 252, 248, 0, 0, 0]);
    }

    #[test]
    fn test_truncate_rgb565_idempotent() {
        let src = noise(16, 16);
        let once = truncate_rgb565(&src);
        let twice = truncate_rgb565(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_truncate_rgb565_keeps_alpha() {
        let src = PixelBuffer {
            width: 1,
            height: 1,
            channels: 4,
            data: vec![255, 255, 255, 77],
        };
        let out = truncate_rgb565(&src);
        assert_eq!(out.data, vec![248, 252, 248, 77]);
    }

    #[test]
    fn test_palette_within_budget() {
        let src = noise(32, 32);
        assert!(unique_colors(&src) > 256);

        let palette = build_palette(&src, 256);
        assert!(palette.len() <= 256);

        let palette = build_palette(&src, 16);
        assert!(palette.len() <= 16);
    }

    #[test]
    fn test_palette_exact_for_few_colors() {
        let src = PixelBuffer {
            width: 2,
            height: 2,
            channels: 3,
            data: vec![255, 0, 0, 0, 255, 0, 255, 0, 0, 0, 255, 0],
        };
        let mut palette = build_palette(&src, 16);
        palette.sort();
        assert_eq!(palette, vec![[0, 255, 0], [255, 0, 0]]);
    }

    #[test]
    fn test_nearest_color_picks_exact_then_closest() {
        let palette = [[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]];
        assert_eq!(nearest_color([255, 0, 0], &palette), 1);
        assert_eq!(nearest_color([220, 20, 20], &palette), 1);
        assert_eq!(nearest_color([20, 220, 20], &palette), 2);
        assert_eq!(nearest_color([5, 5, 5], &palette), 0);
    }

    #[test]
    fn test_map_nearest_output_stays_in_palette() {
        let src = noise(16, 16);
        let palette = build_palette(&src, 16);
        let out = map_to_palette(&src, &palette, false);

        assert!(unique_colors(&out) <= 16);
        for pixel in out.data.chunks(3) {
            assert!(palette.contains(&[pixel[0], pixel[1], pixel[2]]));
        }
    }

    #[test]
    fn test_map_dithered_output_stays_in_palette() {
        let src = noise(16, 16);
        let palette = build_palette(&src, 16);
        let out = map_to_palette(&src, &palette, true);

        assert_eq!(out.width, src.width);
        assert_eq!(out.height, src.height);
        for pixel in out.data.chunks(3) {
            assert!(palette.contains(&[pixel[0], pixel[1], pixel[2]]));
        }
    }

    #[test]
    fn test_dither_differs_from_nearest_on_gradients() {
        // A smooth gradient forced onto a 2-color palette: error diffusion
        // must produce a different pixel pattern than plain nearest mapping
        let mut data = Vec::new();
        for x in 0..64u32 {
            let v = (x * 4) as u8;
            data.extend_from_slice(&[v, v, v]);
        }
        let src = PixelBuffer {
            width: 64,
            height: 1,
            channels: 3,
            data,
        };
        let palette = [[0, 0, 0], [255, 255, 255]];

        let flat = map_to_palette(&src, &palette, false);
        let dithered = map_to_palette(&src, &palette, true);
        assert_ne!(flat.data, dithered.data);
    }

    #[test]
    fn test_map_preserves_alpha() {
        let src = PixelBuffer {
            width: 2,
            height: 1,
            channels: 4,
            data: vec![200, 10, 10, 3, 10, 200, 10, 250],
        };
        let palette = build_palette(&src, 16);

        let out = map_to_palette(&src, &palette, false);
        assert_eq!(out.data[3], 3);
        assert_eq!(out.data[7], 250);

        let out = map_to_palette(&src, &palette, true);
        assert_eq!(out.data[3], 3);
        assert_eq!(out.data[7], 250);
    }
}
