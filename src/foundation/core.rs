use image::{ImageBuffer, Rgba, RgbaImage, imageops::FilterType};

use crate::foundation::error::{MoodError, MoodResult};
use crate::foundation::math::mul_div255;

pub use kurbo::{Affine, Point, Vec2};

/// Premultiplied RGBA8 pixel (r,g,b already multiplied by a).
pub type PremulRgba8 = [u8; 4];

/// Host-owned drawing area dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> MoodResult<Self> {
        if width == 0 || height == 0 {
            return Err(MoodError::EmptyCanvas { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    pub fn byte_len(self) -> MoodResult<usize> {
        rgba_len(self.width, self.height)
    }
}

pub(crate) fn rgba_len(width: u32, height: u32) -> MoodResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| MoodError::evaluation("rgba buffer size overflow"))
}

/// Off-screen premultiplied RGBA8 pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> MoodResult<Self> {
        let canvas = Canvas::new(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; canvas.byte_len()?],
        })
    }

    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> MoodResult<Self> {
        let expected = Canvas::new(width, height)?.byte_len()?;
        if data.len() != expected {
            return Err(MoodError::evaluation(format!(
                "surface data length {} does not match {width}x{height}x4",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn fill(&mut self, px: PremulRgba8) {
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Reallocates to `width`x`height` if the size changed; contents are cleared either way.
    pub fn reset(&mut self, width: u32, height: u32) -> MoodResult<()> {
        if self.width != width || self.height != height {
            *self = Self::new(width, height)?;
        } else {
            self.clear();
        }
        Ok(())
    }

    /// Runs `f` over straight (non-premultiplied) RGBA, then premultiplies again.
    pub fn with_straight<F>(&mut self, f: F) -> MoodResult<()>
    where
        F: FnOnce(&mut [u8], u32, u32) -> MoodResult<()>,
    {
        unpremultiply_in_place(&mut self.data);
        let out = f(&mut self.data, self.width, self.height);
        premultiply_in_place(&mut self.data);
        out
    }

    /// Filtered downscale (or upscale) into a new surface.
    pub fn resized(&self, width: u32, height: u32) -> MoodResult<Self> {
        Canvas::new(width, height)?;
        let src: ImageBuffer<Rgba<u8>, &[u8]> =
            ImageBuffer::from_raw(self.width, self.height, self.data.as_slice())
                .ok_or_else(|| MoodError::evaluation("surface buffer is not width*height*4"))?;
        let out = image::imageops::resize(&src, width, height, FilterType::Triangle);
        Self::from_premul(width, height, out.into_raw())
    }

    /// Straight-alpha image for encoding.
    pub fn to_rgba_image(&self) -> MoodResult<RgbaImage> {
        let mut data = self.data.clone();
        unpremultiply_in_place(&mut data);
        RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| MoodError::evaluation("surface buffer is not width*height*4"))
    }
}

pub(crate) fn unpremultiply_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

pub(crate) fn premultiply_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255(u16::from(*c), a);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
