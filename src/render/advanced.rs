use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::error::MoodResult;
use crate::render::composite::fill_in_place;
use crate::render::gradient::{CircleClip, ColorStop, FillParams, Gradient, GradientShape};
use crate::settings::model::{
    AdvancedGradient, BlendMode, ControlPoint, GradientColors, GradientKind,
};

/// Everything the advanced gradient needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct AdvancedParams<'a> {
    pub config: &'a AdvancedGradient,
    /// Resolved (possibly mid-transition) slot colors.
    pub colors: GradientColors,
    pub animation_offset: f64,
    pub animation_speed: f64,
}

/// Control-point jitter as a fraction of the viewport.
pub fn jitter_scale(animation_speed: f64) -> f64 {
    (animation_speed.max(0.0) / 500.0).min(0.15)
}

struct Target<'b> {
    buf: &'b mut [u8],
    width: u32,
    height: u32,
    origin: Vec2,
}

impl Target<'_> {
    fn fill(&mut self, gradient: &Gradient, params: FillParams) -> MoodResult<()> {
        gradient.fill(self.buf, self.width, self.height, self.origin, params)
    }
}

/// Renders the advanced gradient into a premultiplied buffer.
///
/// Geometry is computed in `view` coordinates; buffer pixel `(0, 0)` sits at `origin`.
pub fn render_advanced(
    buf: &mut [u8],
    width: u32,
    height: u32,
    origin: Vec2,
    view: Canvas,
    params: AdvancedParams<'_>,
) -> MoodResult<()> {
    fill_in_place(buf, params.colors.background.premul(1.0), 1.0, BlendMode::Normal);

    let mut target = Target {
        buf,
        width,
        height,
        origin,
    };
    match params.config.kind {
        GradientKind::None => Ok(()),
        GradientKind::Linear => render_linear(&mut target, view, &params),
        GradientKind::Radial => render_radial(&mut target, view, &params),
        GradientKind::DualRadial => render_dual_radial(&mut target, view, &params),
    }
}

fn base_point(view: Canvas, p: &ControlPoint) -> Point {
    Point::new(
        f64::from(view.width) * p.x / 100.0,
        f64::from(view.height) * p.y / 100.0,
    )
}

fn radius_of(view: Canvas, p: &ControlPoint) -> f64 {
    f64::from(view.width.min(view.height)) * (p.size * 2.0) / 100.0
}

fn jitter(view: Canvas, scale: f64, sx: f64, cy: f64) -> Vec2 {
    Vec2::new(
        sx.sin() * f64::from(view.width) * scale,
        cy.cos() * f64::from(view.height) * scale,
    )
}

fn render_linear(t: &mut Target<'_>, view: Canvas, p: &AdvancedParams<'_>) -> MoodResult<()> {
    let o = p.animation_offset;
    let s = jitter_scale(p.animation_speed);
    let p0 = base_point(view, &p.config.point1) + jitter(view, s, o, o);
    let p1 = base_point(view, &p.config.point2) + jitter(view, s, o + 2.0, o + 2.0);
    let gradient = Gradient::new(
        GradientShape::Linear { p0, p1 },
        vec![
            ColorStop::opaque(0.0, p.colors.primary),
            ColorStop::opaque(1.0, p.colors.secondary),
        ],
    )?;

    t.fill(&gradient, FillParams::default())?;
    t.fill(
        &gradient,
        FillParams {
            opacity: (0.8 * p.config.glow / 100.0) as f32,
            mode: BlendMode::Screen,
            clip: None,
        },
    )
}

/// Additive core disc followed by a screen-blended bloom disc.
fn glow_disc(
    t: &mut Target<'_>,
    center: Point,
    radius: f64,
    stops: &[ColorStop],
    glow_alpha: f64,
    bloom: f64,
) -> MoodResult<()> {
    let core = Gradient::new(
        GradientShape::Radial {
            center,
            r0: 0.0,
            r1: radius,
        },
        stops.to_vec(),
    )?;
    t.fill(
        &core,
        FillParams {
            opacity: 1.0,
            mode: BlendMode::Lighter,
            clip: Some(CircleClip { center, radius }),
        },
    )?;

    let bloom_radius = radius * (1.0 + bloom / 100.0);
    let halo = Gradient::new(
        GradientShape::Radial {
            center,
            r0: 0.0,
            r1: bloom_radius,
        },
        stops.to_vec(),
    )?;
    t.fill(
        &halo,
        FillParams {
            opacity: glow_alpha as f32,
            mode: BlendMode::Screen,
            clip: Some(CircleClip {
                center,
                radius: bloom_radius,
            }),
        },
    )
}

fn render_radial(t: &mut Target<'_>, view: Canvas, p: &AdvancedParams<'_>) -> MoodResult<()> {
    let o = p.animation_offset;
    let center = base_point(view, &p.config.point1)
        + jitter(view, jitter_scale(p.animation_speed), o, o);
    let stops = [
        ColorStop::opaque(0.0, p.colors.primary),
        ColorStop::opaque(0.7, p.colors.secondary),
        ColorStop::transparent(1.0),
    ];
    glow_disc(
        t,
        center,
        radius_of(view, &p.config.point1),
        &stops,
        0.7 * p.config.glow / 100.0,
        p.config.bloom,
    )
}

fn render_dual_radial(t: &mut Target<'_>, view: Canvas, p: &AdvancedParams<'_>) -> MoodResult<()> {
    let o = p.animation_offset;
    let s = jitter_scale(p.animation_speed);
    let blend = p.config.blend / 100.0;
    let glow = 0.8 * p.config.glow / 100.0;
    let (primary, secondary) = (p.colors.primary, p.colors.secondary);

    let c1 = base_point(view, &p.config.point1) + jitter(view, s, o, o * 0.8);
    let stops1 = [
        ColorStop::opaque(0.0, primary),
        ColorStop::opaque(0.7, primary.interpolate(secondary, blend)),
        ColorStop::transparent(1.0),
    ];
    glow_disc(
        t,
        c1,
        radius_of(view, &p.config.point1),
        &stops1,
        glow,
        p.config.bloom,
    )?;

    let c2 = base_point(view, &p.config.point2) + jitter(view, s, o * 1.2 + 1.0, o + 1.0);
    let stops2 = [
        ColorStop::opaque(0.0, secondary),
        ColorStop::opaque(0.7, secondary.interpolate(primary, blend)),
        ColorStop::transparent(1.0),
    ];
    glow_disc(
        t,
        c2,
        radius_of(view, &p.config.point2),
        &stops2,
        glow,
        p.config.bloom,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/advanced.rs"]
mod tests;
