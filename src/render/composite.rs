use crate::foundation::core::PremulRgba8;
use crate::foundation::error::{MoodError, MoodResult};
use crate::foundation::math::{add_sat_u8, mul_div255};
use crate::settings::model::BlendMode;

/// Source-over on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Additive (`lighter`) composite.
pub fn plus(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(dst[i], mul_div255(u16::from(src[i]), op));
    }
    out
}

/// Separable blend function `B(Cb, Cs)` on straight channel values in `0..=1`.
fn blend_channel(mode: BlendMode, cb: f32, cs: f32) -> f32 {
    fn screen(cb: f32, cs: f32) -> f32 {
        cb + cs - cb * cs
    }
    fn hard_light(cb: f32, cs: f32) -> f32 {
        if cs <= 0.5 {
            cb * 2.0 * cs
        } else {
            screen(cb, 2.0 * cs - 1.0)
        }
    }

    match mode {
        BlendMode::Normal | BlendMode::Lighter => cs,
        BlendMode::Multiply => cb * cs,
        BlendMode::Screen => screen(cb, cs),
        BlendMode::Overlay => hard_light(cs, cb),
        BlendMode::Darken => cb.min(cs),
        BlendMode::Lighten => cb.max(cs),
        BlendMode::ColorDodge => {
            if cb <= 0.0 {
                0.0
            } else if cs >= 1.0 {
                1.0
            } else {
                (cb / (1.0 - cs)).min(1.0)
            }
        }
        BlendMode::ColorBurn => {
            if cb >= 1.0 {
                1.0
            } else if cs <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - cb) / cs).min(1.0)
            }
        }
        BlendMode::HardLight => hard_light(cb, cs),
        BlendMode::SoftLight => {
            if cs <= 0.5 {
                cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
            } else {
                let d = if cb <= 0.25 {
                    ((16.0 * cb - 12.0) * cb + 4.0) * cb
                } else {
                    cb.sqrt()
                };
                cb + (2.0 * cs - 1.0) * (d - cb)
            }
        }
        BlendMode::Difference => (cb - cs).abs(),
        BlendMode::Exclusion => cb + cs - 2.0 * cb * cs,
    }
}

/// Composites `src` onto `dst` with `mode` at `opacity`.
pub fn blend(dst: PremulRgba8, src: PremulRgba8, opacity: f32, mode: BlendMode) -> PremulRgba8 {
    match mode {
        BlendMode::Normal => return over(dst, src, opacity),
        BlendMode::Lighter => return plus(dst, src, opacity),
        _ => {}
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let sa = f32::from(src[3]) / 255.0 * opacity;
    let da = f32::from(dst[3]) / 255.0;
    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = f32::from(src[i]) / 255.0 * opacity;
        let dc = f32::from(dst[i]) / 255.0;
        let cs = if sa > 0.0 { (sc / sa).min(1.0) } else { 0.0 };
        let cb = if da > 0.0 { (dc / da).min(1.0) } else { 0.0 };
        let co = sc * (1.0 - da) + dc * (1.0 - sa) + sa * da * blend_channel(mode, cb, cs);
        out[i] = (co * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    let ao = sa + da * (1.0 - sa);
    out[3] = (ao * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

/// Composites a whole premultiplied layer onto `dst`.
///
/// Runs over every pixel even at zero opacity so that stacking order stays stable.
pub fn blend_in_place(dst: &mut [u8], src: &[u8], opacity: f32, mode: BlendMode) -> MoodResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MoodError::evaluation(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity, mode);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Fills `dst` with one flat premultiplied color through `mode`.
pub fn fill_in_place(dst: &mut [u8], color: PremulRgba8, opacity: f32, mode: BlendMode) {
    for d in dst.chunks_exact_mut(4) {
        let out = blend([d[0], d[1], d[2], d[3]], color, opacity, mode);
        d.copy_from_slice(&out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
