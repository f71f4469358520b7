//! Layer compositor: background, gradient and their per-layer distortion, flattened into one
//! premultiplied scene buffer.
//!
//! Each layer is painted into its own reusable surface, optionally distorted, then blended
//! onto the scene with the layer's opacity and blend mode. Text is not rasterized here; the
//! host draws it from a [`crate::TextOverlay`].

use rayon::prelude::*;

use crate::effects::distortion::{FilterCtx, apply_distortion};
use crate::foundation::color::Rgb;
use crate::foundation::core::{Affine, Canvas, Point, PremulRgba8, Surface, Vec2};
use crate::foundation::error::MoodResult;
use crate::render::advanced::{AdvancedParams, render_advanced};
use crate::render::composite::{blend_in_place, fill_in_place};
use crate::render::gradient::{ColorStop, FillParams, Gradient, GradientShape};
use crate::settings::model::{BlendMode, GradientColors, Layer, RenderSettings};
use crate::transition::engine::ScenePalette;

/// Layer preview size in pixels (width, height).
pub const THUMBNAIL_SIZE: (u32, u32) = (44, 96);

/// Per-frame values resolved by the session before compositing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInputs {
    /// Emotion-driven colors, possibly mid-transition.
    pub palette: ScenePalette,
    /// Advanced gradient slot colors, possibly mid-transition.
    pub advanced_colors: GradientColors,
    pub text_color: Rgb,
    pub animation_offset: f64,
    pub filter: FilterCtx,
}

/// Small per-layer previews for a layer panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerThumbnails {
    pub background: Surface,
    pub gradient: Surface,
    pub text: Surface,
}

pub struct LayerCompositor {
    scene: Surface,
    background: Surface,
    gradient: Surface,
    // Oversized source for tilted gradients.
    gradient_src: Surface,
}

/// Background color: the secondary emotion color, 30% darker.
pub fn background_color(palette: &ScenePalette) -> Rgb {
    palette.secondary.shade(-30.0)
}

/// Oversize factor for the gradient buffer; grows with tilt so rotated edges stay covered.
pub fn gradient_scale_factor(tilt_h: f64, tilt_v: f64) -> f64 {
    6.0 + tilt_h.abs().max(tilt_v.abs()) / 10.0
}

/// Maps gradient-layer coordinates to viewport coordinates.
///
/// Rotation by `tilt_h - tilt_v` degrees about the viewport center, with a perspective
/// shrink of `1 - max(|h|, |v|) / 200`.
pub fn tilt_transform(view: Canvas, tilt_h: f64, tilt_v: f64) -> Affine {
    let c = view.center().to_vec2();
    let scale = 1.0 - tilt_h.abs().max(tilt_v.abs()) / 200.0;
    Affine::translate(c)
        * Affine::rotate(-tilt_v.to_radians())
        * Affine::rotate(tilt_h.to_radians())
        * Affine::scale(scale)
        * Affine::translate(-c)
}

impl LayerCompositor {
    pub fn new(canvas: Canvas) -> MoodResult<Self> {
        Ok(Self {
            scene: Surface::new(canvas.width, canvas.height)?,
            background: Surface::new(canvas.width, canvas.height)?,
            gradient: Surface::new(canvas.width, canvas.height)?,
            gradient_src: Surface::new(1, 1)?,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.scene.canvas()
    }

    /// The last composited frame.
    pub fn scene(&self) -> &Surface {
        &self.scene
    }

    /// Renders one frame at `canvas` size. Surfaces are reallocated only when the size changes.
    #[tracing::instrument(level = "trace", skip_all, fields(w = canvas.width, h = canvas.height))]
    pub fn render(
        &mut self,
        canvas: Canvas,
        settings: &RenderSettings,
        inputs: &FrameInputs,
    ) -> MoodResult<&Surface> {
        Canvas::new(canvas.width, canvas.height)?;
        self.scene.reset(canvas.width, canvas.height)?;
        self.background.reset(canvas.width, canvas.height)?;
        let layers = &settings.layers;

        if layers.background_layer_visible {
            self.background
                .fill(background_color(&inputs.palette).premul(1.0));
            distort_layer(&mut self.background, settings, Layer::Background, inputs.filter)?;
            blend_in_place(
                self.scene.data_mut(),
                self.background.data(),
                percent(layers.background_opacity),
                layers.background_blend_mode,
            )?;
        }

        if layers.gradient_layer_visible {
            self.render_gradient_layer(canvas, settings, inputs)?;
            blend_in_place(
                self.scene.data_mut(),
                self.gradient.data(),
                percent(layers.gradient_opacity),
                layers.gradient_blend_mode,
            )?;
        }

        Ok(&self.scene)
    }

    fn render_gradient_layer(
        &mut self,
        view: Canvas,
        settings: &RenderSettings,
        inputs: &FrameInputs,
    ) -> MoodResult<()> {
        let geo = &settings.gradient;
        self.gradient.reset(view.width, view.height)?;

        if geo.tilt_h == 0.0 && geo.tilt_v == 0.0 {
            paint_gradient(&mut self.gradient, Vec2::ZERO, view, settings, inputs)?;
            return distort_layer(&mut self.gradient, settings, Layer::Gradient, inputs.filter);
        }

        let transform = tilt_transform(view, geo.tilt_h, geo.tilt_v);
        let inverse = transform.inverse();
        let sf = gradient_scale_factor(geo.tilt_h, geo.tilt_v);
        let (origin, w, h) = source_region(view, inverse, sf);

        self.gradient_src.reset(w, h)?;
        paint_gradient(&mut self.gradient_src, origin, view, settings, inputs)?;
        distort_layer(&mut self.gradient_src, settings, Layer::Gradient, inputs.filter)?;

        let src = &self.gradient_src;
        let stride = view.width as usize * 4;
        self.gradient
            .data_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, d) in row.chunks_exact_mut(4).enumerate() {
                    let q = inverse * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                    let px = sample_bilinear(
                        src,
                        (q.x - origin.x - 0.5) as f32,
                        (q.y - origin.y - 0.5) as f32,
                    );
                    d.copy_from_slice(&px);
                }
            });
        Ok(())
    }

    /// Downscaled layer previews from the last rendered frame.
    pub fn thumbnails(&self, inputs: &FrameInputs) -> MoodResult<LayerThumbnails> {
        let (tw, th) = THUMBNAIL_SIZE;
        let background = self.background.resized(tw, th)?;

        let mut gradient = self.scene.resized(tw, th)?;
        fill_in_place(
            gradient.data_mut(),
            inputs.palette.primary.premul(1.0),
            0.3,
            BlendMode::Normal,
        );

        let mut text = Surface::new(tw, th)?;
        draw_text_glyph(&mut text, inputs.text_color.premul(1.0));

        Ok(LayerThumbnails {
            background,
            gradient,
            text,
        })
    }
}

fn percent(v: f64) -> f32 {
    (v / 100.0).clamp(0.0, 1.0) as f32
}

fn distort_layer(
    surface: &mut Surface,
    settings: &RenderSettings,
    layer: Layer,
    ctx: FilterCtx,
) -> MoodResult<()> {
    if !settings.distorts(layer) {
        return Ok(());
    }
    let d = &settings.distortion;
    surface.with_straight(|buf, w, h| apply_distortion(d.effect, buf, w, h, d.intensity, ctx))
}

fn paint_gradient(
    surface: &mut Surface,
    origin: Vec2,
    view: Canvas,
    settings: &RenderSettings,
    inputs: &FrameInputs,
) -> MoodResult<()> {
    let (w, h) = (surface.width(), surface.height());
    if let Some(config) = settings.active_advanced_gradient() {
        return render_advanced(
            surface.data_mut(),
            w,
            h,
            origin,
            view,
            AdvancedParams {
                config,
                colors: inputs.advanced_colors,
                animation_offset: inputs.animation_offset,
                animation_speed: settings.gradient.animation_speed,
            },
        );
    }
    simple_gradient(settings, view, inputs)?.fill(
        surface.data_mut(),
        w,
        h,
        origin,
        FillParams::default(),
    )
}

/// The single orbiting radial gradient used when no advanced gradient is active.
pub fn simple_gradient(
    settings: &RenderSettings,
    view: Canvas,
    inputs: &FrameInputs,
) -> MoodResult<Gradient> {
    let geo = &settings.gradient;
    let (w, h) = (f64::from(view.width), f64::from(view.height));
    let o = inputs.animation_offset;
    let sf = gradient_scale_factor(geo.tilt_h, geo.tilt_v);

    let center = Point::new(w / 2.0 + o.sin() * w / 4.0, h / 2.0 + o.cos() * h / 4.0);
    let r0 = geo.min_size * 2.0;
    let r1 = 50.0 + (1500.0 * sf - 50.0) * geo.max_size / 100.0;
    let primary = inputs.palette.primary;
    Gradient::new(
        GradientShape::Radial { center, r0, r1 },
        vec![
            ColorStop::opaque(0.0, primary),
            ColorStop::opaque(geo.feather_size / 100.0, primary),
            ColorStop::transparent(1.0),
        ],
    )
}

/// Bounding box (origin, width, height) of the layer area visible through `inverse`, capped
/// at `sf` times the viewport.
fn source_region(view: Canvas, inverse: Affine, sf: f64) -> (Vec2, u32, u32) {
    let (w, h) = (f64::from(view.width), f64::from(view.height));
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(0.0, h),
        Point::new(w, h),
    ];
    let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for c in corners {
        let p = inverse * c;
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }

    let c = view.center();
    let (half_w, half_h) = (w * sf / 2.0, h * sf / 2.0);
    let x0 = (x0.floor() - 1.0).max(c.x - half_w);
    let y0 = (y0.floor() - 1.0).max(c.y - half_h);
    let x1 = (x1.ceil() + 1.0).min(c.x + half_w);
    let y1 = (y1.ceil() + 1.0).min(c.y + half_h);

    let bw = (x1 - x0).ceil().max(1.0) as u32;
    let bh = (y1 - y0).ceil().max(1.0) as u32;
    (Vec2::new(x0, y0), bw, bh)
}

fn texel(src: &Surface, x: i64, y: i64) -> [f32; 4] {
    let x = x.clamp(0, i64::from(src.width()) - 1) as u32;
    let y = y.clamp(0, i64::from(src.height()) - 1) as u32;
    src.pixel(x, y).map(f32::from)
}

fn sample_bilinear(src: &Surface, fx: f32, fy: f32) -> PremulRgba8 {
    let x0 = fx.floor();
    let y0 = fy.floor();
    let dx = fx - x0;
    let dy = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = texel(src, x0, y0);
    let p10 = texel(src, x0 + 1, y0);
    let p01 = texel(src, x0, y0 + 1);
    let p11 = texel(src, x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let v = p00[c] * (1.0 - dx) * (1.0 - dy)
            + p10[c] * dx * (1.0 - dy)
            + p01[c] * (1.0 - dx) * dy
            + p11[c] * dx * dy;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// A block "T": crossbar over a centered stem.
fn draw_text_glyph(surface: &mut Surface, color: PremulRgba8) {
    let (w, h) = (surface.width(), surface.height());
    let bar_top = h * 5 / 24;
    let bar_bottom = bar_top + (h / 12).max(1);
    let stem_half = (w / 10).max(1);
    let stem_bottom = h * 19 / 24;
    let mid = w / 2;
    let stride = w as usize * 4;

    let data = surface.data_mut();
    for y in bar_top..stem_bottom {
        let (xa, xb) = if y < bar_bottom {
            (w / 5, w - w / 5)
        } else {
            (mid - stem_half, mid + stem_half)
        };
        for x in xa..xb {
            let i = y as usize * stride + x as usize * 4;
            data[i..i + 4].copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
