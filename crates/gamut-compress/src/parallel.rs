//! Parallel gamut compression using Rayon.
//!
//! The context is built (and calibrated) once on the calling thread; workers
//! only read it. Results are identical to the sequential functions in
//! [`crate::apply`].
//!
//! # Example
//!
//! ```rust
//! use gamut_compress::{parallel, CompressionContext, GamutCompressParams};
//!
//! let ctx = CompressionContext::new(&GamutCompressParams::default());
//! let mut pixels = vec![1.0f32, 0.5, -0.2, 1.0].repeat(256 * 256);
//! parallel::apply_gamut_compress_rgba(&ctx, &mut pixels);
//! ```

use rayon::prelude::*;
use tracing::debug;

use crate::apply::{apply_pixel, check_layout};
use crate::context::CompressionContext;
use crate::GamutResult;

/// Pixels handed to a worker at a time.
const PIXELS_PER_TASK: usize = 4096;

/// Parallel [`crate::apply::apply_gamut_compress_rgba`].
pub fn apply_gamut_compress_rgba(ctx: &CompressionContext, pixels: &mut [f32]) {
    let whole = pixels.len() - pixels.len() % 4;
    run(ctx, &mut pixels[..whole], 4);
}

/// Parallel [`crate::apply::apply_gamut_compress`].
///
/// # Errors
///
/// Same layout errors as the sequential version.
pub fn apply_gamut_compress(
    ctx: &CompressionContext,
    pixels: &mut [f32],
    channels: usize,
) -> GamutResult<()> {
    check_layout(pixels.len(), channels)?;
    run(ctx, pixels, channels);
    Ok(())
}

fn run(ctx: &CompressionContext, pixels: &mut [f32], channels: usize) {
    debug!(
        pixels = pixels.len() / channels,
        channels,
        method = %ctx.method(),
        threads = rayon::current_num_threads(),
        "Applying gamut compression in parallel"
    );

    pixels
        .par_chunks_mut(PIXELS_PER_TASK * channels)
        .for_each(|block| {
            for pixel in block.chunks_exact_mut(channels) {
                apply_pixel(ctx, pixel);
            }
        });
}
