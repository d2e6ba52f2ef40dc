//! Per-pixel gamut compression.
//!
//! For each pixel:
//!
//! ```text
//! ach      = max(r, g, b)
//! dist[c]  = (ach - rgb[c]) / ach          (0 when ach == 0)
//! cdist[c] = curve(dist[c], thr, lim[c])   (identity below thr)
//! out[c]   = ach - cdist[c] * ach
//! ```
//!
//! The function only reads the pixel and the shared context, so pixels can
//! be processed in any order and on any number of threads.

use tracing::trace;

use crate::context::CompressionContext;
use crate::{GamutError, GamutResult};

/// Achromatic anchor: the largest of the three channels.
#[inline]
pub fn achromatic(rgb: [f32; 3]) -> f32 {
    rgb[0].max(rgb[1]).max(rgb[2])
}

/// Normalized distance of each channel from the achromatic anchor.
///
/// Zero for every channel when the anchor is zero.
#[inline]
pub fn distances(rgb: [f32; 3], ach: f32) -> [f32; 3] {
    if ach == 0.0 {
        return [0.0; 3];
    }
    rgb.map(|v| (ach - v) / ach)
}

/// Compress (or expand) one channel's distance through the context's curve.
#[inline]
pub fn compress_distance(ctx: &CompressionContext, channel: usize, dist: f32) -> f32 {
    ctx.method()
        .apply(ctx.direction(), dist, ctx.thr(), ctx.limits()[channel])
}

/// Apply gamut compression to an RGB triple.
#[inline]
pub fn compress_rgb(ctx: &CompressionContext, rgb: [f32; 3]) -> [f32; 3] {
    let ach = achromatic(rgb);
    let dist = distances(rgb, ach);
    let mut out = [0.0; 3];
    for (c, value) in out.iter_mut().enumerate() {
        let cdist = compress_distance(ctx, c, dist[c]);
        *value = ach - cdist * ach;
    }
    out
}

/// Apply gamut compression to an RGB triple in-place.
#[inline]
pub fn apply_rgb(ctx: &CompressionContext, rgb: &mut [f32; 3]) {
    *rgb = compress_rgb(ctx, *rgb);
}

/// Apply gamut compression to an RGBA pixel. Alpha is passed through.
#[inline]
pub fn compress_rgba(ctx: &CompressionContext, rgba: [f32; 4]) -> [f32; 4] {
    let [r, g, b] = compress_rgb(ctx, [rgba[0], rgba[1], rgba[2]]);
    [r, g, b, rgba[3]]
}

/// Apply gamut compression to a packed RGBA buffer in-place.
///
/// A trailing partial pixel is left untouched.
pub fn apply_gamut_compress_rgba(ctx: &CompressionContext, pixels: &mut [f32]) {
    trace!(len = pixels.len(), method = %ctx.method(), "apply_gamut_compress_rgba");
    for chunk in pixels.chunks_exact_mut(4) {
        apply_pixel(ctx, chunk);
    }
}

/// Apply gamut compression to a packed buffer with `channels` values per pixel.
///
/// The first three channels are treated as RGB; any others (alpha, depth,
/// ...) are passed through unchanged.
///
/// # Errors
///
/// - `channels < 3`
/// - buffer length not a multiple of `channels`
pub fn apply_gamut_compress(
    ctx: &CompressionContext,
    pixels: &mut [f32],
    channels: usize,
) -> GamutResult<()> {
    check_layout(pixels.len(), channels)?;
    trace!(len = pixels.len(), channels, method = %ctx.method(), "apply_gamut_compress");

    for chunk in pixels.chunks_exact_mut(channels) {
        apply_pixel(ctx, chunk);
    }
    Ok(())
}

/// Compress the leading RGB of one pixel slice.
#[inline]
pub(crate) fn apply_pixel(ctx: &CompressionContext, pixel: &mut [f32]) {
    let rgb = compress_rgb(ctx, [pixel[0], pixel[1], pixel[2]]);
    pixel[..3].copy_from_slice(&rgb);
}

/// Validate a packed buffer layout.
pub(crate) fn check_layout(len: usize, channels: usize) -> GamutResult<()> {
    if channels < 3 {
        return Err(GamutError::InvalidDimensions(format!(
            "gamut compression requires at least 3 channels, got {}",
            channels
        )));
    }
    if len % channels != 0 {
        return Err(GamutError::InvalidDimensions(format!(
            "buffer length {} is not a multiple of {} channels",
            len, channels
        )));
    }
    Ok(())
}
