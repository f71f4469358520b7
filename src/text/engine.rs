use serde::Serialize;

use crate::emotion::model::EmotionStyle;
use crate::foundation::color::Rgb;
use crate::settings::model::RenderSettings;
use crate::text::style::{TextAnimation, TextDistortion, TextStyle};
use crate::text::typewriter::{Typewriter, typing_interval_ms};
use crate::transition::channel::TransitionChannel;

/// Everything a host needs to draw the text layer for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub text: String,
    /// Whether a typing cursor should be shown after `text`.
    pub typing: bool,
    pub color: Rgb,
    pub style: TextStyle,
    pub animation: Option<TextAnimation>,
    pub distortion: Option<TextDistortion>,
}

/// Typewriter reveal plus the text-color transition channel.
#[derive(Clone, Debug)]
pub struct TextEffectsEngine {
    typewriter: Typewriter,
    color: TransitionChannel<Rgb>,
}

impl TextEffectsEngine {
    pub fn new(text: &str, color: Rgb) -> Self {
        Self {
            typewriter: Typewriter::new(text),
            color: TransitionChannel::new(color),
        }
    }

    /// Visible text (partial while typing).
    pub fn text(&self) -> &str {
        self.typewriter.text()
    }

    pub fn target_text(&self) -> String {
        self.typewriter.target()
    }

    pub fn is_typing(&self) -> bool {
        self.typewriter.is_typing()
    }

    pub fn color_active(&self) -> bool {
        self.color.is_active()
    }

    /// Any text animation that needs further frames.
    pub fn is_animating(&self) -> bool {
        self.is_typing() || self.color_active()
    }

    pub fn start_typewriter(&mut self, text: &str, settings: &RenderSettings, now_ms: f64) {
        let interval = typing_interval_ms(settings.typography.transition_speed);
        tracing::debug!(chars = text.chars().count(), interval, "typewriter start");
        self.typewriter.start(text, interval, now_ms);
    }

    /// Direct text update. Returns `false` (and changes nothing) while typing.
    pub fn set_text(&mut self, text: &str) -> bool {
        self.typewriter.set_text(text)
    }

    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.typewriter.tick(now_ms)
    }

    pub fn start_color_transition(&mut self, from: Rgb, to: Rgb, duration_ms: f64, now_ms: f64) {
        self.color.start(from, to, duration_ms, now_ms);
    }

    /// Last color shown, for continuing into a new transition.
    pub fn last_color(&self) -> Rgb {
        *self.color.last()
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color.jump(color);
    }

    /// Text color for this frame: the transition sample while one runs, else the style's.
    pub fn resolve_color(&mut self, style: &EmotionStyle, now_ms: f64) -> Rgb {
        if self.color.is_active() {
            self.color.sample(now_ms)
        } else {
            self.color.jump(style.text_color);
            style.text_color
        }
    }

    pub fn overlay(
        &mut self,
        settings: &RenderSettings,
        style: &EmotionStyle,
        now_ms: f64,
    ) -> TextOverlay {
        TextOverlay {
            text: self.text().to_owned(),
            typing: self.is_typing(),
            color: self.resolve_color(style, now_ms),
            style: TextStyle::from_settings(settings),
            animation: TextAnimation::from_style(style),
            distortion: TextDistortion::from_settings(settings),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
