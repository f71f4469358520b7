//! The render core: owns emotion state, settings, transitions, text effects, history and the
//! compositor, and exposes the operations a UI or persistence layer drives.

use std::path::Path;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::effects::distortion::FilterCtx;
use crate::emotion::model::{
    AnimationKind, EmotionId, EmotionProperty, EmotionState, EmotionStyle, EmotionStyleTable,
    Palette,
};
use crate::emotion::provider::{EmotionEvent, EmotionProvider};
use crate::foundation::clock::Clock;
use crate::foundation::color::Rgb;
use crate::foundation::core::Canvas;
use crate::foundation::error::{MoodError, MoodResult};
use crate::foundation::math::mix_seed;
use crate::history::store::{DEFAULT_CAPACITY, HistoryEntry, HistoryStore};
use crate::render::compositor::{FrameInputs, LayerCompositor};
use crate::session::target::{SurfaceTarget, TextTarget};
use crate::settings::config_file::{
    ConfigDocument, read_config_file, save_config_file, to_config_json,
};
use crate::settings::model::{
    GradientChannel, GradientColorSource, GradientColors, Layer, RenderSettings,
};
use crate::settings::setting::SettingKey;
use crate::text::engine::{TextEffectsEngine, TextOverlay};
use crate::transition::engine::{ScenePalette, TransitionEngine};

/// Prompt typed out when a session starts.
pub const INITIAL_TEXT: &str = "Enter an emotion to visualize";

/// How long a config feedback message stays visible.
pub const FEEDBACK_MS: f64 = 3000.0;

/// Offsets past this wrap back to zero.
pub const OFFSET_WRAP: f64 = 1_000_000.0;

/// One analysis of the user's text, as delivered by the input side.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResult {
    pub state: EmotionState,
    pub text: String,
    /// Explicit submit: re-types the text with the typewriter and records history.
    pub button_click: bool,
}

/// What a color picker is editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorEditTarget {
    Emotion {
        id: EmotionId,
        property: EmotionProperty,
    },
    PaletteIndex(usize),
    Gradient(GradientChannel),
}

/// Transient status message shown after a config save or load.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub message: String,
    pub is_error: bool,
    expires_at_ms: f64,
}

/// Renderer state for one canvas. Time comes from the injected [`Clock`].
pub struct RenderCore {
    clock: Box<dyn Clock>,
    styles: EmotionStyleTable,
    palette: Palette,
    settings: RenderSettings,
    emotion: EmotionState,
    last_pulled: Option<EmotionState>,
    transitions: TransitionEngine,
    text: TextEffectsEngine,
    compositor: LayerCompositor,
    history: HistoryStore<HistoryEntry>,
    animation_offset: f64,
    needs_update: bool,
    session_seed: u64,
    frame_index: u64,
    feedback: Option<Feedback>,
}

fn palette_for(styles: &EmotionStyleTable, state: &EmotionState) -> ScenePalette {
    ScenePalette {
        primary: styles.resolve(state.current_emotion).background_color,
        secondary: styles.resolve(state.secondary_emotion).background_color,
    }
}

fn linked_color(source: GradientColorSource, current: Rgb, palette: &ScenePalette) -> Rgb {
    match source {
        GradientColorSource::Manual => current,
        GradientColorSource::Primary => palette.primary,
        GradientColorSource::Secondary => palette.secondary,
    }
}

impl RenderCore {
    /// Default styles and settings, neutral emotion, initial prompt typing out.
    pub fn new(canvas: Canvas, clock: impl Clock + 'static) -> MoodResult<Self> {
        Self::with_state(
            canvas,
            clock,
            EmotionStyleTable::default(),
            RenderSettings::default(),
        )
    }

    /// Starts from the given styles and settings; settings are clamped first.
    pub fn with_state(
        canvas: Canvas,
        clock: impl Clock + 'static,
        styles: EmotionStyleTable,
        mut settings: RenderSettings,
    ) -> MoodResult<Self> {
        settings.clamp_in_place();
        let emotion = EmotionState::neutral();
        let scene = palette_for(&styles, &emotion);
        let advanced = settings
            .advanced_gradient
            .as_ref()
            .map(|a| a.colors)
            .unwrap_or(GradientColors {
                primary: scene.primary,
                secondary: scene.secondary,
                background: scene.secondary,
            });
        let text_color = styles.resolve(emotion.current_emotion).text_color;
        let now = clock.now_ms();

        let mut core = Self {
            clock: Box::new(clock),
            compositor: LayerCompositor::new(canvas)?,
            transitions: TransitionEngine::new(scene, advanced),
            text: TextEffectsEngine::new("", text_color),
            history: HistoryStore::new(DEFAULT_CAPACITY),
            styles,
            palette: Palette::default(),
            settings,
            emotion,
            last_pulled: None,
            animation_offset: 0.0,
            needs_update: true,
            session_seed: rand::random(),
            frame_index: 0,
            feedback: None,
        };
        core.text.start_typewriter(INITIAL_TEXT, &core.settings, now);
        core.commit();
        Ok(core)
    }

    /// Fixes the per-session noise seed (reproducible frames).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session_seed = seed;
        self
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Emotion state last applied.
    pub fn emotion(&self) -> &EmotionState {
        &self.emotion
    }

    /// Per-emotion styles, including any edits.
    pub fn styles(&self) -> &EmotionStyleTable {
        &self.styles
    }

    /// Swatch palette offered by color pickers.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Live settings, including uncommitted previews.
    pub fn current_settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn animation_offset(&self) -> f64 {
        self.animation_offset
    }

    /// Visible text (partial while the typewriter runs).
    pub fn text(&self) -> &str {
        self.text.text()
    }

    /// Whether the next tick should render.
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Forces a render on the next tick.
    pub fn request_redraw(&mut self) {
        self.needs_update = true;
    }

    /// Any transition or text animation still in progress.
    pub fn is_animating(&self) -> bool {
        self.transitions.any_active() || self.text.is_animating()
    }

    /// Applies a new emotion state. Returns whether the leading emotions changed; only then are
    /// color transitions started and history recorded.
    pub fn process_emotion(&mut self, next: EmotionState) -> bool {
        let changed = self.apply_emotion(next);
        if changed {
            self.commit();
        }
        changed
    }

    /// Polls a pull-side provider. A state already seen from the provider is not re-applied,
    /// so a pushed event stays authoritative until the provider reports something new.
    pub fn observe(&mut self, provider: &dyn EmotionProvider) -> bool {
        let state = provider.current_state();
        if self.last_pulled.as_ref() == Some(&state) {
            return false;
        }
        self.last_pulled = Some(state.clone());
        self.process_emotion(state)
    }

    /// Applies a pushed event; see [`RenderCore::process_emotion`].
    pub fn push_event(&mut self, event: EmotionEvent) -> bool {
        self.process_emotion(event.into_state())
    }

    /// Emotion handling plus text display. A button click re-types the text; a plain edit
    /// updates it directly unless the typewriter is busy.
    pub fn process_analysis(&mut self, result: AnalysisResult) {
        let changed = self.apply_emotion(result.state);
        let now = self.clock.now_ms();
        if result.button_click {
            self.text.start_typewriter(&result.text, &self.settings, now);
        } else if result.text != self.text.target_text() {
            self.text.set_text(&result.text);
        }
        self.needs_update = true;
        if changed || result.button_click {
            self.commit();
        }
    }

    fn apply_emotion(&mut self, next: EmotionState) -> bool {
        if next.same_emotions(&self.emotion) {
            self.emotion = next;
            return false;
        }
        let now = self.clock.now_ms();
        let prev = std::mem::replace(&mut self.emotion, next);
        let from = palette_for(&self.styles, &prev);
        let to = palette_for(&self.styles, &self.emotion);

        self.transitions
            .start_scene(from, to, self.settings.transitions.background_ms, now);
        self.text.start_color_transition(
            self.styles.resolve(prev.current_emotion).text_color,
            self.styles.resolve(self.emotion.current_emotion).text_color,
            self.settings.transitions.text_ms,
            now,
        );
        self.relink_gradient_colors(&to, now);
        tracing::debug!(
            from = %prev.current_emotion,
            to = %self.emotion.current_emotion,
            secondary = %self.emotion.secondary_emotion,
            "emotion changed"
        );
        self.needs_update = true;
        true
    }

    /// Moves emotion-linked advanced gradient slots to the new emotion colors.
    fn relink_gradient_colors(&mut self, to: &ScenePalette, now: f64) {
        let Some(adv) = self.settings.advanced_gradient.as_mut() else {
            return;
        };
        let current = adv.colors;
        let mut next = current;
        for channel in [
            GradientChannel::Primary,
            GradientChannel::Secondary,
            GradientChannel::Background,
        ] {
            next.set(
                channel,
                linked_color(adv.sources.get(channel), current.get(channel), to),
            );
        }
        if next != current {
            adv.colors = next;
            self.transitions
                .start_advanced(current, next, self.settings.transitions.gradient_ms, now);
        }
    }

    fn parse_key(name: &str) -> Option<SettingKey> {
        match SettingKey::from_str(name) {
            Ok(key) => Some(key),
            Err(_) => {
                tracing::warn!(setting = %name, "ignoring unknown setting");
                None
            }
        }
    }

    /// Preview path used while dragging: applies the value, never records history.
    pub fn update_setting_without_history(&mut self, name: &str, value: Value) -> MoodResult<bool> {
        let Some(key) = Self::parse_key(name) else {
            return Ok(false);
        };
        let changed = self.settings.set(key, value)?;
        if changed {
            self.on_settings_replaced();
        }
        Ok(changed)
    }

    /// Commit path: applies the value and records one history entry if the settings differ from
    /// the last recorded ones (so a run of previews is captured exactly once).
    pub fn update_setting_with_history(&mut self, name: &str, value: Value) -> MoodResult<bool> {
        if Self::parse_key(name).is_none() {
            return Ok(false);
        }
        self.update_setting_without_history(name, value)?;
        let recorded = self.history.current().map(|e| &e.settings);
        if recorded == Some(&self.settings) {
            return Ok(false);
        }
        self.commit();
        Ok(true)
    }

    /// Restores `name` to its default and records it.
    pub fn reset_control(&mut self, name: &str) -> MoodResult<bool> {
        let Some(key) = Self::parse_key(name) else {
            return Ok(false);
        };
        let value = RenderSettings::default_value(key)?;
        self.update_setting_with_history(key.as_str(), value)
    }

    /// Shows or hides a layer; history is recorded only on an actual change.
    pub fn update_layer_visibility(&mut self, layer: Layer, visible: bool) -> bool {
        if self.settings.layers.is_visible(layer) == visible {
            return false;
        }
        self.settings.layers.set_visible(layer, visible);
        self.needs_update = true;
        self.commit();
        true
    }

    /// Merges a partial settings object (config import path). All-or-nothing; records one entry.
    pub fn apply_settings(&mut self, patch: &Map<String, Value>) -> MoodResult<()> {
        self.settings.merge(patch)?;
        self.on_settings_replaced();
        self.commit();
        Ok(())
    }

    fn on_settings_replaced(&mut self) {
        if let Some(adv) = &self.settings.advanced_gradient
            && !self.transitions.advanced_active()
        {
            self.transitions.settle_advanced(adv.colors);
        }
        self.needs_update = true;
    }

    pub fn set_emotion_animation(&mut self, id: EmotionId, animation: AnimationKind) {
        self.styles.set_animation(id, animation);
        self.needs_update = true;
    }

    pub fn set_emotion_intensity(&mut self, id: EmotionId, intensity: f64) {
        self.styles.set_intensity(id, intensity);
        self.needs_update = true;
    }

    pub fn set_emotion_duration(&mut self, id: EmotionId, duration: f64) {
        self.styles.set_duration(id, duration);
        self.needs_update = true;
    }

    /// Color picker commit. Only advanced-gradient edits live in the settings, so only they
    /// record history; emotion and swatch colors are not part of a history entry.
    pub fn edit_color(&mut self, target: ColorEditTarget, color: Rgb) -> MoodResult<()> {
        match target {
            ColorEditTarget::Emotion { id, property } => {
                self.styles.set_color(id, property, color);
                self.needs_update = true;
                return Ok(());
            }
            ColorEditTarget::PaletteIndex(index) => {
                let len = self.palette.0.len();
                let slot = self.palette.0.get_mut(index).ok_or_else(|| {
                    MoodError::validation(format!("palette index {index} out of range (0..{len})"))
                })?;
                *slot = color;
                self.needs_update = true;
                return Ok(());
            }
            ColorEditTarget::Gradient(channel) => {
                let now = self.clock.now_ms();
                let duration = self.settings.transitions.gradient_ms;
                let adv = self
                    .settings
                    .advanced_gradient
                    .as_mut()
                    .ok_or_else(|| MoodError::validation("advanced gradient is disabled"))?;
                let from = adv.colors;
                adv.colors.set(channel, color);
                adv.sources.set(channel, GradientColorSource::Manual);
                let to = adv.colors;
                self.transitions.start_advanced(from, to, duration, now);
            }
        }
        self.needs_update = true;
        self.commit();
        Ok(())
    }

    fn commit(&mut self) {
        self.history.commit(HistoryEntry {
            settings: self.settings.clone(),
            text: self.text.target_text(),
            current_emotion: self.emotion.current_emotion,
            secondary_emotion: self.emotion.secondary_emotion,
        });
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Steps back one history entry. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(entry);
        true
    }

    /// Steps forward one history entry. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(entry);
        true
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.settings = entry.settings;
        if let Some(adv) = &self.settings.advanced_gradient {
            self.transitions.settle_advanced(adv.colors);
        }
        self.text.set_text(&entry.text);
        self.needs_update = true;
    }

    /// Current feedback message, if it has not expired.
    pub fn feedback(&self) -> Option<&Feedback> {
        let now = self.clock.now_ms();
        self.feedback.as_ref().filter(|f| now < f.expires_at_ms)
    }

    fn set_feedback(&mut self, message: impl Into<String>, is_error: bool) {
        let message = message.into();
        if is_error {
            tracing::warn!(%message, "config feedback");
        } else {
            tracing::info!(%message, "config feedback");
        }
        self.feedback = Some(Feedback {
            message,
            is_error,
            expires_at_ms: self.clock.now_ms() + FEEDBACK_MS,
        });
    }

    /// Current styles and settings as a config document.
    pub fn config_json(&self) -> MoodResult<String> {
        to_config_json(&self.styles, &self.settings)
    }

    pub fn save_config(&mut self, path: &Path) -> MoodResult<()> {
        match save_config_file(path, &self.styles, &self.settings) {
            Ok(()) => {
                self.set_feedback("Configuration saved successfully!", false);
                Ok(())
            }
            Err(e) => {
                self.set_feedback(format!("Error saving configuration: {e}"), true);
                Err(e)
            }
        }
    }

    pub fn load_config_json(&mut self, json: &str) -> MoodResult<()> {
        let result = ConfigDocument::parse(json).and_then(|doc| self.apply_document(&doc));
        self.report_load(result)
    }

    /// Reads and applies a config file, all-or-nothing, and reports the outcome.
    pub fn load_config(&mut self, path: &Path) -> MoodResult<()> {
        let result = read_config_file(path).and_then(|doc| self.apply_document(&doc));
        self.report_load(result)
    }

    fn apply_document(&mut self, doc: &ConfigDocument) -> MoodResult<()> {
        let (styles, settings) = doc.resolve(&self.styles, &self.settings)?;
        self.styles = styles;
        self.settings = settings;
        self.on_settings_replaced();
        self.commit();
        Ok(())
    }

    fn report_load(&mut self, result: MoodResult<()>) -> MoodResult<()> {
        match &result {
            Ok(()) => self.set_feedback("Configuration loaded successfully!", false),
            Err(e) => self.set_feedback(format!("Error loading configuration: {e}"), true),
        }
        result
    }

    /// Colors drawn by the scene layers right now.
    pub fn scene_palette(&mut self) -> ScenePalette {
        let now = self.clock.now_ms();
        self.transitions
            .sample_scene(now)
            .unwrap_or_else(|| palette_for(&self.styles, &self.emotion))
    }

    fn advanced_colors(&mut self, palette: &ScenePalette) -> GradientColors {
        let now = self.clock.now_ms();
        if let Some(colors) = self.transitions.sample_advanced(now) {
            return colors;
        }
        self.settings
            .advanced_gradient
            .as_ref()
            .map(|a| a.colors)
            .unwrap_or(GradientColors {
                primary: palette.primary,
                secondary: palette.secondary,
                background: palette.secondary,
            })
    }

    fn current_style(&self) -> EmotionStyle {
        self.styles.resolve(self.emotion.current_emotion)
    }

    /// Text overlay for the current instant (advances the typewriter).
    pub fn text_overlay(&mut self) -> TextOverlay {
        let now = self.clock.now_ms();
        self.text.tick(now);
        let style = self.current_style();
        self.text.overlay(&self.settings, &style, now)
    }

    fn frame_inputs(&mut self, text_color: Rgb) -> FrameInputs {
        let palette = self.scene_palette();
        let advanced_colors = self.advanced_colors(&palette);
        let seed = mix_seed(self.session_seed, self.frame_index);
        self.frame_index = self.frame_index.wrapping_add(1);
        FrameInputs {
            palette,
            advanced_colors,
            text_color,
            animation_offset: self.animation_offset,
            filter: FilterCtx {
                time_s: self.clock.now_ms() / 1000.0,
                seed,
            },
        }
    }

    /// One full frame: composite, present, thumbnails, text overlay.
    #[tracing::instrument(level = "trace", skip_all, fields(frame = self.frame_index))]
    pub fn render_frame(
        &mut self,
        surface: &mut dyn SurfaceTarget,
        text: &mut dyn TextTarget,
    ) -> MoodResult<()> {
        let overlay = self.text_overlay();
        let inputs = self.frame_inputs(overlay.color);
        let scene = self
            .compositor
            .render(surface.size(), &self.settings, &inputs)?;
        surface.present(scene)?;
        let thumbnails = self.compositor.thumbnails(&inputs)?;
        surface.present_thumbnails(&thumbnails)?;
        text.apply(&overlay)
    }

    /// Advances the gradient motion by one tick.
    pub fn advance_animation(&mut self) {
        let speed = self.settings.gradient.animation_speed;
        self.animation_offset += 0.005 * ((speed + 1.0) / 50.0 + 0.5);
        if self.animation_offset > OFFSET_WRAP {
            self.animation_offset = 0.0;
        }
    }

    /// After a frame was attempted: redraw again only while something is animating.
    pub fn finish_frame(&mut self) {
        self.needs_update = self.is_animating();
    }

    /// After an idle tick: keep any pending request, add one if something is animating.
    pub fn finish_idle(&mut self) {
        self.needs_update |= self.is_animating();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_core.rs"]
mod tests;
