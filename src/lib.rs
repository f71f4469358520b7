//! Moodwave is an emotion-driven layered canvas renderer.
//!
//! A detected emotion (or a keyword analysis of free text) selects a style: a small palette,
//! an animation kind and durations. The renderer turns that style into pixels by compositing
//! three layers onto a host-owned canvas:
//!
//! 1. **Background**: a solid shade of the palette's secondary color.
//! 2. **Gradient**: an animated radial gradient, or one of the advanced modes (linear, radial,
//!    dual-radial) with glow and bloom passes, optionally tilted in 3D.
//! 3. **Text**: a typewriter-revealed overlay the host draws from a [`TextOverlay`].
//!
//! Each layer may carry one distortion filter (blur, grain, glitch, noise, pixelate, warp,
//! scanlines). Colors cross-fade between emotions through [`TransitionEngine`], settings edits
//! are recorded in a bounded [`HistoryStore`], and the whole state round-trips through a JSON
//! configuration document.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Injected time**: every animation reads a [`Clock`], so tests drive frames deterministically.
//! - **Premultiplied RGBA8** end-to-end: surfaces store premultiplied pixels; filters run on
//!   straight alpha.
//!
//! The entry point for hosts is [`RenderCore`], driven per frame by a [`RenderLoop`].
#![forbid(unsafe_code)]

mod effects;
mod emotion;
mod foundation;
mod history;
mod render;
mod session;
mod settings;
mod text;
mod transition;

pub use effects::distortion::{FilterCtx, apply_distortion};
pub use emotion::analyzer::{KeywordAnalyzer, score_text};
pub use emotion::model::{
    AnimationKind, DURATION_RANGE, EmotionId, EmotionProperty, EmotionState, EmotionStyle,
    EmotionStylePatch, EmotionStyleTable, INTENSITY_RANGE, NEUTRAL_FALLBACK, Palette,
};
pub use emotion::provider::{EmotionEvent, EmotionProvider, StaticProvider};
pub use foundation::clock::{Clock, ManualClock, SystemClock};
pub use foundation::color::Rgb;
pub use foundation::core::{Affine, Canvas, Point, PremulRgba8, Surface, Vec2};
pub use foundation::error::{MoodError, MoodResult};
pub use foundation::math::Lerp;
pub use history::store::{DEFAULT_CAPACITY, HistoryEntry, HistoryStore};
pub use render::composite::{blend, blend_in_place, fill_in_place, over, plus};
pub use render::compositor::{
    FrameInputs, LayerCompositor, LayerThumbnails, THUMBNAIL_SIZE, background_color,
    gradient_scale_factor, simple_gradient, tilt_transform,
};
pub use render::gradient::{CircleClip, ColorStop, FillParams, Gradient, GradientShape};
pub use session::render_core::{
    AnalysisResult, ColorEditTarget, FEEDBACK_MS, Feedback, INITIAL_TEXT, RenderCore,
};
pub use session::scheduler::{CancelToken, LoopStats, RenderLoop, StepOutcome};
pub use session::target::{MemorySurface, MemoryText, SurfaceTarget, TextTarget};
pub use settings::config_file::{
    APP_VERSION, ConfigDocument, REQUIRED_KEYS, read_config_file, save_config_file,
    suggested_file_name, to_config_json,
};
pub use settings::model::{
    AdvancedGradient, BlendMode, ControlPoint, DistortionEffect, DistortionSettings, FontStyle,
    GradientChannel, GradientColorSource, GradientColors, GradientGeometry, GradientKind,
    GradientSources, Layer, LayerSettings, RenderSettings, TransitionDurations, Typography,
};
pub use settings::setting::SettingKey;
pub use text::engine::{TextEffectsEngine, TextOverlay};
pub use text::style::{
    AnimationIteration, FontClass, TextAnimation, TextDistortion, TextStyle, font_stack,
};
pub use text::typewriter::{Typewriter, TypewriterState, typing_interval_ms};
pub use transition::channel::TransitionChannel;
pub use transition::engine::{ScenePalette, TransitionEngine};
