//! Pixel filters over straight-alpha RGBA8 buffers (row-major, 4 bytes per pixel).
//!
//! Every filter is a pure function of `(buffer, width, height, intensity, ctx)`: nothing is
//! shared between calls, so layers can be filtered independently and in any order. Intensity
//! is clamped to `0..=100`.

use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::foundation::core::rgba_len;
use crate::foundation::error::{MoodError, MoodResult};
use crate::foundation::math::{hash_unit, to_u8};
use crate::settings::model::DistortionEffect;

/// Per-frame inputs shared by the stochastic and time-driven filters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FilterCtx {
    /// Wall-clock phase for `warp`, in seconds.
    pub time_s: f64,
    /// Seed for `filmGrain`, `noise` and `glitch`. Vary it per frame for live grain.
    pub seed: u64,
}

#[tracing::instrument(level = "trace", skip(buf))]
pub fn apply_distortion(
    effect: DistortionEffect,
    buf: &mut [u8],
    width: u32,
    height: u32,
    intensity: f64,
    ctx: FilterCtx,
) -> MoodResult<()> {
    match effect {
        DistortionEffect::None => {
            check_len(buf, width, height)?;
            Ok(())
        }
        DistortionEffect::FilmGrain => film_grain(buf, width, height, intensity, ctx.seed),
        DistortionEffect::Noise => noise(buf, width, height, intensity, ctx.seed),
        DistortionEffect::Scanlines => scanlines(buf, width, height, intensity),
        DistortionEffect::Glitch => glitch(buf, width, height, intensity, ctx.seed),
        DistortionEffect::Blur => blur(buf, width, height, intensity),
        DistortionEffect::Warp => warp(buf, width, height, intensity, ctx.time_s),
        DistortionEffect::Pixelate => pixelate(buf, width, height, intensity),
    }
}

fn check_len(buf: &[u8], width: u32, height: u32) -> MoodResult<usize> {
    if width == 0 || height == 0 {
        return Err(MoodError::evaluation("distortion needs a non-empty buffer"));
    }
    let expected = rgba_len(width, height)?;
    if buf.len() != expected {
        return Err(MoodError::evaluation(format!(
            "distortion buffer length {} does not match {width}x{height}x4",
            buf.len()
        )));
    }
    Ok(width as usize * 4)
}

fn unit(intensity: f64) -> f64 {
    if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 100.0) / 100.0
    }
}

fn seed32(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Luminance grain: one uniform offset per pixel applied to r, g and b alike.
pub fn film_grain(
    buf: &mut [u8],
    width: u32,
    height: u32,
    intensity: f64,
    seed: u64,
) -> MoodResult<()> {
    let stride = check_len(buf, width, height)?;
    let amplitude = (unit(intensity) * 50.0) as f32;
    let seed = seed32(seed);

    buf.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let n = (hash_unit(x as u32, y as u32, seed) - 0.5) * amplitude * 2.0;
                for c in &mut px[..3] {
                    *c = to_u8(f32::from(*c) + n);
                }
            }
        });
    Ok(())
}

/// Chromatic noise: independent offsets per channel.
pub fn noise(buf: &mut [u8], width: u32, height: u32, intensity: f64, seed: u64) -> MoodResult<()> {
    let stride = check_len(buf, width, height)?;
    let amplitude = (unit(intensity) * 70.0) as f32;
    let seed = seed32(seed);

    buf.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                for (ch, c) in px[..3].iter_mut().enumerate() {
                    let s = seed.wrapping_add((ch as u32 + 1).wrapping_mul(0x9E37_79B9));
                    let n = (hash_unit(x as u32, y as u32, s) - 0.5) * amplitude * 2.0;
                    *c = to_u8(f32::from(*c) + n);
                }
            }
        });
    Ok(())
}

pub const SCANLINE_BAND: usize = 2;

/// Darkens alternating two-pixel bands.
pub fn scanlines(buf: &mut [u8], width: u32, height: u32, intensity: f64) -> MoodResult<()> {
    let stride = check_len(buf, width, height)?;
    let factor = (1.0 - unit(intensity) * 0.7) as f32;

    buf.par_chunks_mut(stride)
        .enumerate()
        .filter(|(y, _)| y % (SCANLINE_BAND * 2) < SCANLINE_BAND)
        .for_each(|(_, row)| {
            for px in row.chunks_exact_mut(4) {
                for c in &mut px[..3] {
                    *c = to_u8(f32::from(*c) * factor);
                }
            }
        });
    Ok(())
}

/// Red-channel shift plus displaced horizontal slices. Stochastic per seed.
pub fn glitch(
    buf: &mut [u8],
    width: u32,
    height: u32,
    intensity: f64,
    seed: u64,
) -> MoodResult<()> {
    let stride = check_len(buf, width, height)?;
    let i = unit(intensity);
    let mut rng = StdRng::seed_from_u64(seed);

    if rng.random::<f64>() < i * 0.8 {
        let shift = ((i * 10.0).floor() as usize + 1) * 4;
        for idx in (0..buf.len()).step_by(4) {
            let src = if rng.random::<bool>() {
                idx.checked_add(shift)
            } else {
                idx.checked_sub(shift)
            };
            if let Some(src) = src.filter(|&s| s < buf.len()) {
                buf[idx] = buf[src];
            }
        }
    }

    let slices = (i * 20.0).floor() as usize + 1;
    let w = width as i64;
    let mut scratch = vec![0u8; stride];
    for _ in 0..slices {
        let y = rng.random_range(0..height) as usize;
        let slice_h = rng.random_range(5..25usize);
        let shift_x = ((rng.random::<f64>() - 0.5) * w as f64 * i * 0.5).floor() as i64;
        if rng.random::<f64>() >= i {
            continue;
        }
        let end = (y + slice_h).min(height as usize);
        for row in buf[y * stride..end * stride].chunks_exact_mut(stride) {
            scratch.copy_from_slice(row);
            row.fill(0);
            for x in 0..w {
                let nx = x + shift_x;
                if (0..w).contains(&nx) {
                    let (s, d) = (x as usize * 4, nx as usize * 4);
                    row[d..d + 4].copy_from_slice(&scratch[s..s + 4]);
                }
            }
        }
    }
    Ok(())
}

/// Coarse blur: averages a sparse 3x3 lattice at an intensity-derived stride.
///
/// A border of `stride` pixels is left untouched.
pub fn blur(buf: &mut [u8], width: u32, height: u32, intensity: f64) -> MoodResult<()> {
    let stride = check_len(buf, width, height)?;
    let k = (unit(intensity) * 10.0).floor() as usize + 1;
    let (w, h) = (width as usize, height as usize);
    if w <= 2 * k || h <= 2 * k {
        return Ok(());
    }
    let src = buf.to_vec();

    buf.par_chunks_mut(stride)
        .enumerate()
        .filter(|(y, _)| *y >= k && *y < h - k)
        .for_each(|(y, row)| {
            for x in k..w - k {
                let mut sum = [0u32; 4];
                for sy in [y - k, y, y + k] {
                    for sx in [x - k, x, x + k] {
                        let i = sy * stride + sx * 4;
                        for (acc, v) in sum.iter_mut().zip(&src[i..i + 4]) {
                            *acc += u32::from(*v);
                        }
                    }
                }
                for (c, acc) in row[x * 4..x * 4 + 4].iter_mut().zip(sum) {
                    *c = ((acc + 4) / 9) as u8;
                }
            }
        });
    Ok(())
}

/// Sinusoidal source displacement; `time_s` drives the wave phase.
pub fn warp(
    buf: &mut [u8],
    width: u32,
    height: u32,
    intensity: f64,
    time_s: f64,
) -> MoodResult<()> {
    let stride = check_len(buf, width, height)?;
    let amplitude = unit(intensity) * 20.0;
    let phase = if time_s.is_finite() { time_s * 2.0 } else { 0.0 };
    let (w, h) = (i64::from(width), i64::from(height));
    let src = buf.to_vec();

    buf.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let dx = (y as f64 * 0.05 + phase).sin() * amplitude;
            for x in 0..w {
                let dy = (x as f64 * 0.05 + phase).cos() * amplitude;
                let sx = (x as f64 + dx).floor() as i64;
                let sy = (y as f64 + dy).floor() as i64;
                if (0..w).contains(&sx) && (0..h).contains(&sy) {
                    let s = sy as usize * stride + sx as usize * 4;
                    let d = x as usize * 4;
                    row[d..d + 4].copy_from_slice(&src[s..s + 4]);
                }
            }
        });
    Ok(())
}

pub fn pixelate_block_size(intensity: f64) -> usize {
    ((unit(intensity) * 20.0).floor() as usize).max(2)
}

/// Flat blocks colored by each block's top-left pixel.
pub fn pixelate(buf: &mut [u8], width: u32, height: u32, intensity: f64) -> MoodResult<()> {
    let stride = check_len(buf, width, height)?;
    let size = pixelate_block_size(intensity);
    let w = width as usize;

    buf.par_chunks_mut(stride * size).for_each(|band| {
        let (head, rest) = band.split_at_mut(stride);
        for bx in (0..w).step_by(size) {
            let s = bx * 4;
            let color = [head[s], head[s + 1], head[s + 2], head[s + 3]];
            let end = (bx + size).min(w) * 4;
            for px in head[s..end].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
            for row in rest.chunks_exact_mut(stride) {
                for px in row[s..end].chunks_exact_mut(4) {
                    px.copy_from_slice(&color);
                }
            }
        }
    });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/distortion.rs"]
mod tests;
