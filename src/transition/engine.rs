use crate::foundation::color::Rgb;
use crate::foundation::math::Lerp;
use crate::settings::model::GradientColors;
use crate::transition::channel::TransitionChannel;

/// Primary and secondary emotion background colors as drawn by the scene layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenePalette {
    pub primary: Rgb,
    pub secondary: Rgb,
}

impl Lerp for ScenePalette {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            primary: a.primary.interpolate(b.primary, t),
            secondary: a.secondary.interpolate(b.secondary, t),
        }
    }
}

impl Lerp for GradientColors {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            primary: a.primary.interpolate(b.primary, t),
            secondary: a.secondary.interpolate(b.secondary, t),
            background: a.background.interpolate(b.background, t),
        }
    }
}

/// Scene-color and advanced-gradient-color channels.
#[derive(Clone, Debug)]
pub struct TransitionEngine {
    scene: TransitionChannel<ScenePalette>,
    advanced: TransitionChannel<GradientColors>,
}

impl TransitionEngine {
    pub fn new(scene: ScenePalette, advanced: GradientColors) -> Self {
        Self {
            scene: TransitionChannel::new(scene),
            advanced: TransitionChannel::new(advanced),
        }
    }

    /// Starts (or retargets) the scene-color cross-fade.
    pub fn start_scene(
        &mut self,
        from: ScenePalette,
        to: ScenePalette,
        duration_ms: f64,
        now_ms: f64,
    ) {
        tracing::debug!(
            from = %from.primary,
            to = %to.primary,
            duration_ms,
            "scene color transition"
        );
        self.scene.start(from, to, duration_ms, now_ms);
    }

    /// Starts (or retargets) the advanced-gradient color cross-fade.
    pub fn start_advanced(
        &mut self,
        from: GradientColors,
        to: GradientColors,
        duration_ms: f64,
        now_ms: f64,
    ) {
        self.advanced.start(from, to, duration_ms, now_ms);
    }

    pub fn scene_active(&self) -> bool {
        self.scene.is_active()
    }

    pub fn advanced_active(&self) -> bool {
        self.advanced.is_active()
    }

    /// Whether either channel still needs frames.
    pub fn any_active(&self) -> bool {
        self.scene_active() || self.advanced_active()
    }

    /// Interpolated scene colors, or `None` once the channel is idle.
    pub fn sample_scene(&mut self, now_ms: f64) -> Option<ScenePalette> {
        if !self.scene.is_active() {
            return None;
        }
        Some(self.scene.sample(now_ms))
    }

    pub fn sample_advanced(&mut self, now_ms: f64) -> Option<GradientColors> {
        if !self.advanced.is_active() {
            return None;
        }
        Some(self.advanced.sample(now_ms))
    }

    /// What the advanced channel shows right now, whether or not it is animating.
    pub fn advanced_last(&self) -> GradientColors {
        *self.advanced.last()
    }

    pub fn scene_last(&self) -> ScenePalette {
        *self.scene.last()
    }

    /// Snaps the advanced channel to `colors` with no animation.
    pub fn settle_advanced(&mut self, colors: GradientColors) {
        self.advanced.jump(colors);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/engine.rs"]
mod tests;
