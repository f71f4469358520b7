//! Typographic, animation and distortion parameters for the text overlay, expressed the way a
//! CSS-like host applies them.

use serde::Serialize;

use crate::emotion::model::{AnimationKind, EmotionStyle};
use crate::settings::model::{BlendMode, DistortionEffect, FontStyle, Layer, RenderSettings};

pub const ROUNDED_FAMILY: &str = "SF Pro Rounded";
pub const STANDARD_FAMILY: &str = "SF Pro";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontClass {
    RoundedFont,
    StandardFont,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size_px: f64,
    pub letter_spacing_px: f64,
    pub line_height: f64,
    pub font_weight: u16,
    pub italic: bool,
    pub underline: bool,
    /// Font stack, most preferred first.
    pub font_family: String,
    pub font_class: Option<FontClass>,
    /// `0.0..=1.0`
    pub opacity: f64,
    pub blend_mode: BlendMode,
    pub visible: bool,
}

pub fn font_size_px(font_size: f64) -> f64 {
    (16.0 + font_size / 100.0 * 56.0).max(16.0)
}

pub fn font_stack(family: &str) -> (String, Option<FontClass>) {
    match family {
        ROUNDED_FAMILY => (
            "\"SF Pro Rounded\", -apple-system, BlinkMacSystemFont, \"SF Pro\", \"Helvetica Neue\", Arial, sans-serif"
                .to_owned(),
            Some(FontClass::RoundedFont),
        ),
        STANDARD_FAMILY => (
            "\"SF Pro\", -apple-system, BlinkMacSystemFont, \"Helvetica Neue\", Arial, sans-serif"
                .to_owned(),
            Some(FontClass::StandardFont),
        ),
        other => (
            format!("\"{other}\", -apple-system, BlinkMacSystemFont, Arial, sans-serif"),
            None,
        ),
    }
}

impl TextStyle {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let t = &settings.typography;
        let layers = &settings.layers;
        let bold = matches!(t.font_style, FontStyle::Bold | FontStyle::BoldItalic);
        let font_weight = if bold {
            700
        } else {
            (300.0 + t.font_weight * 6.0).round() as u16
        };
        let (font_family, font_class) = font_stack(&t.font_family);

        Self {
            font_size_px: font_size_px(t.font_size),
            letter_spacing_px: (t.kerning - 50.0) / 10.0,
            line_height: 1.0 + t.line_height / 100.0,
            font_weight,
            italic: matches!(t.font_style, FontStyle::Italic | FontStyle::BoldItalic),
            underline: t.font_style == FontStyle::Underline,
            font_family,
            font_class,
            opacity: (layers.text_opacity / 100.0).clamp(0.0, 1.0),
            blend_mode: layers.text_blend_mode,
            visible: layers.text_layer_visible,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AnimationIteration {
    Infinite,
    Once { duration_s: f64 },
}

/// Looping text animation derived from the current emotion's style.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnimation {
    pub kind: AnimationKind,
    /// Value for the `--animation-intensity` custom property (1.0 at intensity 50).
    pub intensity: f64,
    pub iteration: AnimationIteration,
}

impl TextAnimation {
    pub fn from_style(style: &EmotionStyle) -> Option<Self> {
        if style.animation == AnimationKind::None {
            return None;
        }
        let iteration = if style.is_infinite() {
            AnimationIteration::Infinite
        } else {
            AnimationIteration::Once {
                duration_s: style.duration / 10.0,
            }
        };
        Some(Self {
            kind: style.animation,
            intensity: style.intensity / 50.0,
            iteration,
        })
    }
}

/// Overlay-side stand-ins for the pixel filters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "effect")]
pub enum TextDistortion {
    Blur { radius_px: f64 },
    Grain { contrast: f64, shadow_px: f64 },
    Glitch { offset_px: u32 },
    Pixelate { size_px: u32 },
    Warp { skew_deg: f64 },
    Scanlines { size_px: u32, opacity: f64 },
}

impl TextDistortion {
    pub fn from_settings(settings: &RenderSettings) -> Option<Self> {
        if !settings.distorts(Layer::Text) {
            return None;
        }
        let i = settings.distortion.intensity.clamp(0.0, 100.0);
        let unit = i / 100.0;
        Some(match settings.distortion.effect {
            DistortionEffect::None => return None,
            DistortionEffect::Blur => Self::Blur {
                radius_px: unit * 5.0,
            },
            DistortionEffect::Noise | DistortionEffect::FilmGrain => Self::Grain {
                contrast: 1.0 + i / 200.0,
                shadow_px: unit * 2.0,
            },
            DistortionEffect::Glitch => Self::Glitch {
                offset_px: ((unit * 10.0).floor() as u32).max(1),
            },
            DistortionEffect::Pixelate => Self::Pixelate {
                size_px: ((unit * 5.0).floor() as u32).max(1),
            },
            DistortionEffect::Warp => Self::Warp {
                skew_deg: unit * 20.0,
            },
            DistortionEffect::Scanlines => Self::Scanlines {
                size_px: ((unit * 8.0).floor() as u32).max(1),
                opacity: (unit * 0.8).min(0.8),
            },
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/style.rs"]
mod tests;
