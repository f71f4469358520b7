use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb;

pub const PERCENT: (f64, f64) = (0.0, 100.0);
pub const TILT_DEGREES: (f64, f64) = (-45.0, 45.0);
pub const TRANSITION_MS: (f64, f64) = (0.0, 10_000.0);

pub(crate) fn clamp_to(v: f64, (lo, hi): (f64, f64)) -> f64 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

/// Separable blend modes plus additive `lighter`, keyed by their CSS names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Lighter,
}

impl BlendMode {
    pub const ALL: [Self; 13] = [
        Self::Normal,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
        Self::Lighter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Lighter => "lighter",
        }
    }

    /// Unknown names fall back to `Normal`.
    pub fn parse(s: &str) -> Self {
        let key = s.trim().to_ascii_lowercase();
        let key = match key.as_str() {
            "source-over" => "normal",
            "plus-lighter" | "add" => "lighter",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .unwrap_or_else(|| {
                tracing::debug!(blend_mode = s, "unknown blend mode, using normal");
                Self::Normal
            })
    }
}

impl From<String> for BlendMode {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<BlendMode> for String {
    fn from(m: BlendMode) -> Self {
        m.as_str().to_owned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum DistortionEffect {
    #[default]
    None,
    FilmGrain,
    Noise,
    Scanlines,
    Glitch,
    Blur,
    Warp,
    Pixelate,
}

impl DistortionEffect {
    pub const ALL: [Self; 8] = [
        Self::None,
        Self::FilmGrain,
        Self::Noise,
        Self::Scanlines,
        Self::Glitch,
        Self::Blur,
        Self::Warp,
        Self::Pixelate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FilmGrain => "filmGrain",
            Self::Noise => "noise",
            Self::Scanlines => "scanlines",
            Self::Glitch => "glitch",
            Self::Blur => "blur",
            Self::Warp => "warp",
            Self::Pixelate => "pixelate",
        }
    }

    /// Case-insensitive; `film-grain`/`film_grain` are accepted. Unknown names become `None`.
    pub fn parse(s: &str) -> Self {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().to_ascii_lowercase() == key)
            .unwrap_or_else(|| {
                tracing::debug!(effect = s, "unknown distortion effect, using none");
                Self::None
            })
    }
}

impl From<String> for DistortionEffect {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<DistortionEffect> for String {
    fn from(e: DistortionEffect) -> Self {
        e.as_str().to_owned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    Underline,
    BoldItalic,
}

impl FontStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::BoldItalic => "bold-italic",
        }
    }
}

impl From<String> for FontStyle {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "bold-italic" | "bolditalic" => Self::BoldItalic,
            _ => Self::Normal,
        }
    }
}

impl From<FontStyle> for String {
    fn from(s: FontStyle) -> Self {
        s.as_str().to_owned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum GradientKind {
    None,
    Linear,
    Radial,
    #[default]
    DualRadial,
}

impl GradientKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Linear => "linear",
            Self::Radial => "radial",
            Self::DualRadial => "dual-radial",
        }
    }
}

impl From<String> for GradientKind {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Self::None,
            "radial" => Self::Radial,
            "dual-radial" | "dualradial" => Self::DualRadial,
            _ => Self::Linear,
        }
    }
}

impl From<GradientKind> for String {
    fn from(k: GradientKind) -> Self {
        k.as_str().to_owned()
    }
}

/// Where an advanced-gradient color slot takes its value from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GradientColorSource {
    #[default]
    Manual,
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GradientChannel {
    Primary,
    Secondary,
    Background,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientColors {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub background: Rgb,
}

impl GradientColors {
    pub fn get(&self, channel: GradientChannel) -> Rgb {
        match channel {
            GradientChannel::Primary => self.primary,
            GradientChannel::Secondary => self.secondary,
            GradientChannel::Background => self.background,
        }
    }

    pub fn set(&mut self, channel: GradientChannel, color: Rgb) {
        match channel {
            GradientChannel::Primary => self.primary = color,
            GradientChannel::Secondary => self.secondary = color,
            GradientChannel::Background => self.background = color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientSources {
    pub primary: GradientColorSource,
    pub secondary: GradientColorSource,
    pub background: GradientColorSource,
}

impl GradientSources {
    pub fn get(&self, channel: GradientChannel) -> GradientColorSource {
        match channel {
            GradientChannel::Primary => self.primary,
            GradientChannel::Secondary => self.secondary,
            GradientChannel::Background => self.background,
        }
    }

    pub fn set(&mut self, channel: GradientChannel, source: GradientColorSource) {
        match channel {
            GradientChannel::Primary => self.primary = source,
            GradientChannel::Secondary => self.secondary = source,
            GradientChannel::Background => self.background = source,
        }
    }
}

impl Default for GradientSources {
    fn default() -> Self {
        Self {
            primary: GradientColorSource::Primary,
            secondary: GradientColorSource::Secondary,
            background: GradientColorSource::Manual,
        }
    }
}

/// Dual-control-point gradient mode with glow/bloom/blend compositing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedGradient {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    pub point1: ControlPoint,
    pub point2: ControlPoint,
    pub glow: f64,
    pub bloom: f64,
    pub blend: f64,
    pub colors: GradientColors,
    #[serde(default)]
    pub sources: GradientSources,
}

impl AdvancedGradient {
    pub fn is_active(&self) -> bool {
        self.kind != GradientKind::None
    }

    fn clamp_in_place(&mut self) {
        for p in [&mut self.point1, &mut self.point2] {
            p.x = clamp_to(p.x, PERCENT);
            p.y = clamp_to(p.y, PERCENT);
            p.size = clamp_to(p.size, PERCENT);
        }
        self.glow = clamp_to(self.glow, PERCENT);
        self.bloom = clamp_to(self.bloom, PERCENT);
        self.blend = clamp_to(self.blend, PERCENT);
    }
}

impl Default for AdvancedGradient {
    fn default() -> Self {
        let blue = Rgb::new(0x59, 0xa3, 0xff);
        Self {
            kind: GradientKind::DualRadial,
            point1: ControlPoint {
                x: 50.0,
                y: 30.0,
                size: 50.0,
            },
            point2: ControlPoint {
                x: 50.0,
                y: 70.0,
                size: 50.0,
            },
            glow: 0.0,
            bloom: 55.0,
            blend: 49.0,
            colors: GradientColors {
                primary: blue,
                secondary: Rgb::new(0xff, 0x3b, 0x3b),
                background: blue,
            },
            sources: GradientSources::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientGeometry {
    #[serde(rename = "animationSpeed")]
    pub animation_speed: f64,
    #[serde(rename = "gradientMaxSize")]
    pub max_size: f64,
    #[serde(rename = "gradientMinSize")]
    pub min_size: f64,
    #[serde(rename = "gradientFeatherSize")]
    pub feather_size: f64,
    /// Degrees.
    #[serde(rename = "gradientTiltH")]
    pub tilt_h: f64,
    /// Degrees.
    #[serde(rename = "gradientTiltV")]
    pub tilt_v: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    #[serde(rename = "fontSize")]
    pub font_size: f64,
    #[serde(rename = "fontKerning")]
    pub kerning: f64,
    #[serde(rename = "lineHeight")]
    pub line_height: f64,
    #[serde(rename = "fontWeight")]
    pub font_weight: f64,
    #[serde(rename = "fontStyle")]
    pub font_style: FontStyle,
    #[serde(rename = "fontFamily")]
    pub font_family: String,
    /// Typewriter speed.
    #[serde(rename = "transitionSpeed")]
    pub transition_speed: f64,
}

/// Color transition durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDurations {
    #[serde(rename = "backgroundTransitionSpeed")]
    pub background_ms: f64,
    #[serde(rename = "gradientColorTransitionSpeed")]
    pub gradient_ms: f64,
    #[serde(rename = "textColorTransitionSpeed")]
    pub text_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Gradient,
    Text,
    Distortion,
}

impl Layer {
    /// Accepts `background`, `gradient`, `text`, `distortion`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "background" => Some(Self::Background),
            "gradient" => Some(Self::Gradient),
            "text" => Some(Self::Text),
            "distortion" => Some(Self::Distortion),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSettings {
    pub text_opacity: f64,
    pub text_blend_mode: BlendMode,
    pub gradient_opacity: f64,
    pub gradient_blend_mode: BlendMode,
    pub background_opacity: f64,
    pub background_blend_mode: BlendMode,
    pub text_layer_visible: bool,
    pub gradient_layer_visible: bool,
    pub background_layer_visible: bool,
    pub distortion_layer_visible: bool,
}

impl LayerSettings {
    pub fn is_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::Background => self.background_layer_visible,
            Layer::Gradient => self.gradient_layer_visible,
            Layer::Text => self.text_layer_visible,
            Layer::Distortion => self.distortion_layer_visible,
        }
    }

    pub fn set_visible(&mut self, layer: Layer, visible: bool) {
        match layer {
            Layer::Background => self.background_layer_visible = visible,
            Layer::Gradient => self.gradient_layer_visible = visible,
            Layer::Text => self.text_layer_visible = visible,
            Layer::Distortion => self.distortion_layer_visible = visible,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistortionSettings {
    #[serde(rename = "distortionEffect")]
    pub effect: DistortionEffect,
    #[serde(rename = "distortionIntensity")]
    pub intensity: f64,
    #[serde(rename = "distortText")]
    pub text: bool,
    #[serde(rename = "distortGradient")]
    pub gradient: bool,
    #[serde(rename = "distortBackground")]
    pub background: bool,
}

/// The configuration record read by every render component.
///
/// Serialized flat with the camelCase keys used by saved config files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(flatten)]
    pub gradient: GradientGeometry,
    #[serde(flatten)]
    pub typography: Typography,
    #[serde(flatten)]
    pub transitions: TransitionDurations,
    #[serde(flatten)]
    pub layers: LayerSettings,
    #[serde(flatten)]
    pub distortion: DistortionSettings,
    #[serde(
        rename = "advancedGradient",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub advanced_gradient: Option<AdvancedGradient>,
}

impl RenderSettings {
    /// Clamps every ranged field. Mutators call this; readers never do.
    pub fn clamp_in_place(&mut self) {
        let g = &mut self.gradient;
        g.animation_speed = clamp_to(g.animation_speed, PERCENT);
        g.max_size = clamp_to(g.max_size, PERCENT);
        g.min_size = clamp_to(g.min_size, PERCENT);
        g.feather_size = clamp_to(g.feather_size, PERCENT);
        g.tilt_h = clamp_to(g.tilt_h, TILT_DEGREES);
        g.tilt_v = clamp_to(g.tilt_v, TILT_DEGREES);

        let t = &mut self.typography;
        t.font_size = clamp_to(t.font_size, PERCENT);
        t.kerning = clamp_to(t.kerning, PERCENT);
        t.line_height = clamp_to(t.line_height, PERCENT);
        t.font_weight = clamp_to(t.font_weight, PERCENT);
        t.transition_speed = clamp_to(t.transition_speed, PERCENT);

        let d = &mut self.transitions;
        d.background_ms = clamp_to(d.background_ms, TRANSITION_MS);
        d.gradient_ms = clamp_to(d.gradient_ms, TRANSITION_MS);
        d.text_ms = clamp_to(d.text_ms, TRANSITION_MS);

        let l = &mut self.layers;
        l.text_opacity = clamp_to(l.text_opacity, PERCENT);
        l.gradient_opacity = clamp_to(l.gradient_opacity, PERCENT);
        l.background_opacity = clamp_to(l.background_opacity, PERCENT);

        self.distortion.intensity = clamp_to(self.distortion.intensity, PERCENT);

        if let Some(adv) = self.advanced_gradient.as_mut() {
            adv.clamp_in_place();
        }
    }

    pub fn active_advanced_gradient(&self) -> Option<&AdvancedGradient> {
        self.advanced_gradient.as_ref().filter(|a| a.is_active())
    }

    /// Distortion applies to `target` only when the distortion layer is shown and an effect is set.
    pub fn distorts(&self, target: Layer) -> bool {
        if !self.layers.distortion_layer_visible || self.distortion.effect == DistortionEffect::None
        {
            return false;
        }
        match target {
            Layer::Background => self.distortion.background,
            Layer::Gradient => self.distortion.gradient,
            Layer::Text => self.distortion.text,
            Layer::Distortion => false,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            gradient: GradientGeometry {
                animation_speed: 76.0,
                max_size: 100.0,
                min_size: 100.0,
                feather_size: 28.0,
                tilt_h: 0.0,
                tilt_v: 0.0,
            },
            typography: Typography {
                font_size: 74.0,
                kerning: 50.0,
                line_height: 36.0,
                font_weight: 18.0,
                font_style: FontStyle::Normal,
                font_family: "SF Pro".to_owned(),
                transition_speed: 41.0,
            },
            transitions: TransitionDurations {
                background_ms: 500.0,
                gradient_ms: 700.0,
                text_ms: 600.0,
            },
            layers: LayerSettings {
                text_opacity: 100.0,
                text_blend_mode: BlendMode::Normal,
                gradient_opacity: 100.0,
                gradient_blend_mode: BlendMode::Normal,
                background_opacity: 100.0,
                background_blend_mode: BlendMode::Normal,
                text_layer_visible: true,
                gradient_layer_visible: true,
                background_layer_visible: true,
                distortion_layer_visible: true,
            },
            distortion: DistortionSettings {
                effect: DistortionEffect::None,
                intensity: 50.0,
                text: true,
                gradient: true,
                background: true,
            },
            advanced_gradient: Some(AdvancedGradient::default()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;
