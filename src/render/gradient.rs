use rayon::prelude::*;

use crate::foundation::color::Rgb;
use crate::foundation::core::{Point, PremulRgba8, Vec2, rgba_len};
use crate::foundation::error::{MoodError, MoodResult};
use crate::render::composite::blend;
use crate::settings::model::BlendMode;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: PremulRgba8,
}

impl ColorStop {
    pub fn opaque(offset: f64, color: Rgb) -> Self {
        Self {
            offset,
            color: color.premul(1.0),
        }
    }

    pub fn transparent(offset: f64) -> Self {
        Self {
            offset,
            color: [0, 0, 0, 0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientShape {
    /// Concentric circles between `r0` and `r1`.
    Radial { center: Point, r0: f64, r1: f64 },
    Linear { p0: Point, p1: Point },
}

/// Circle the fill is restricted to, with a one-pixel soft edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleClip {
    pub center: Point,
    pub radius: f64,
}

impl CircleClip {
    fn coverage(&self, p: Point) -> f32 {
        let d = (p - self.center).hypot();
        (self.radius - d + 0.5).clamp(0.0, 1.0) as f32
    }
}

/// Color ramp over a shape, padded with the end stops outside `0..=1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    shape: GradientShape,
    stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn new(shape: GradientShape, mut stops: Vec<ColorStop>) -> MoodResult<Self> {
        if stops.is_empty() {
            return Err(MoodError::evaluation("gradient needs at least one color stop"));
        }
        for s in &mut stops {
            s.offset = if s.offset.is_nan() {
                0.0
            } else {
                s.offset.clamp(0.0, 1.0)
            };
        }
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Ok(Self { shape, stops })
    }

    pub fn shape(&self) -> GradientShape {
        self.shape
    }

    fn t_at(&self, p: Point) -> f64 {
        match self.shape {
            GradientShape::Radial { center, r0, r1 } => {
                let d = (p - center).hypot();
                if (r1 - r0).abs() < f64::EPSILON {
                    if d < r0 { 0.0 } else { 1.0 }
                } else {
                    (d - r0) / (r1 - r0)
                }
            }
            GradientShape::Linear { p0, p1 } => {
                let axis = p1 - p0;
                let len2 = axis.hypot2();
                if len2 <= f64::EPSILON {
                    return 0.0;
                }
                (p - p0).dot(axis) / len2
            }
        }
    }

    pub fn color_at_offset(&self, t: f64) -> PremulRgba8 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let first = self.stops[0];
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f64::EPSILON {
                    return b.color;
                }
                let f = (t - a.offset) / span;
                let mut out = [0u8; 4];
                for i in 0..4 {
                    let (ca, cb) = (f64::from(a.color[i]), f64::from(b.color[i]));
                    out[i] = (ca + (cb - ca) * f).round().clamp(0.0, 255.0) as u8;
                }
                return out;
            }
        }
        self.stops[self.stops.len() - 1].color
    }

    pub fn color_at(&self, p: Point) -> PremulRgba8 {
        self.color_at_offset(self.t_at(p))
    }

    /// Composites the gradient onto a premultiplied buffer.
    ///
    /// Buffer pixel `(x, y)` samples the gradient at `origin + (x + 0.5, y + 0.5)`.
    pub fn fill(
        &self,
        dst: &mut [u8],
        width: u32,
        height: u32,
        origin: Vec2,
        paint: FillParams,
    ) -> MoodResult<()> {
        let expected = rgba_len(width, height)?;
        if dst.len() != expected || width == 0 {
            return Err(MoodError::evaluation(
                "gradient fill expects a width*height*4 buffer",
            ));
        }
        let stride = width as usize * 4;
        dst.par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                let py = origin.y + y as f64 + 0.5;
                for (x, d) in row.chunks_exact_mut(4).enumerate() {
                    let p = Point::new(origin.x + x as f64 + 0.5, py);
                    let coverage = paint.clip.map_or(1.0, |c| c.coverage(p));
                    let src = self.color_at(p);
                    let out = blend(
                        [d[0], d[1], d[2], d[3]],
                        src,
                        paint.opacity * coverage,
                        paint.mode,
                    );
                    d.copy_from_slice(&out);
                }
            });
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillParams {
    pub opacity: f32,
    pub mode: BlendMode,
    pub clip: Option<CircleClip>,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            mode: BlendMode::Normal,
            clip: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
