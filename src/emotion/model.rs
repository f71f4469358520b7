use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum EmotionId {
    Anger,
    Happy,
    Peaceful,
    Fear,
    Sad,
    Surprise,
    #[default]
    Neutral,
}

impl EmotionId {
    pub const ALL: [Self; 7] = [
        Self::Anger,
        Self::Happy,
        Self::Peaceful,
        Self::Fear,
        Self::Sad,
        Self::Surprise,
        Self::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anger => "anger",
            Self::Happy => "happy",
            Self::Peaceful => "peaceful",
            Self::Fear => "fear",
            Self::Sad => "sad",
            Self::Surprise => "surprise",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    /// Like [`EmotionId::parse`], but unknown ids degrade to `Neutral`.
    pub fn resolve(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::debug!(emotion = s, "unknown emotion id, using neutral");
            Self::Neutral
        })
    }
}

impl fmt::Display for EmotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emission of the emotion provider. Superseded wholesale by the next one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionState {
    pub current_emotion: EmotionId,
    pub secondary_emotion: EmotionId,
    #[serde(default)]
    pub scores: BTreeMap<EmotionId, f64>,
}

impl EmotionState {
    pub fn neutral() -> Self {
        let scores = EmotionId::ALL
            .into_iter()
            .map(|id| (id, if id == EmotionId::Neutral { 0.8 } else { 0.1 }))
            .collect();
        Self {
            current_emotion: EmotionId::Neutral,
            secondary_emotion: EmotionId::Neutral,
            scores,
        }
    }

    /// Ranks raw scores; the top two become current and secondary.
    ///
    /// Negative and non-finite scores count as zero. Ties keep catalogue order.
    pub fn from_scores(scores: BTreeMap<EmotionId, f64>) -> Self {
        let mut ranked: Vec<(EmotionId, f64)> = EmotionId::ALL
            .into_iter()
            .map(|id| (id, sanitize(scores.get(&id).copied().unwrap_or(0.0))))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        if ranked.iter().all(|(_, s)| *s <= 0.0) {
            return Self::neutral();
        }

        Self {
            current_emotion: ranked[0].0,
            secondary_emotion: ranked[1].0,
            scores,
        }
    }

    /// Scores as percentages summing to 100 (all zeros when nothing scored).
    pub fn normalized_scores(&self) -> BTreeMap<EmotionId, f64> {
        let total: f64 = self.scores.values().copied().map(sanitize).sum();
        self.scores
            .iter()
            .map(|(&id, &s)| {
                let pct = if total > 0.0 {
                    sanitize(s) / total * 100.0
                } else {
                    0.0
                };
                (id, pct)
            })
            .collect()
    }

    pub fn same_emotions(&self, other: &Self) -> bool {
        self.current_emotion == other.current_emotion
            && self.secondary_emotion == other.secondary_emotion
    }
}

impl Default for EmotionState {
    fn default() -> Self {
        Self::neutral()
    }
}

fn sanitize(s: f64) -> f64 {
    if s.is_finite() { s.max(0.0) } else { 0.0 }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum AnimationKind {
    Pulse,
    Shake,
    Big,
    Small,
    Nod,
    Ripple,
    Bloom,
    Jitter,
    #[default]
    None,
}

impl AnimationKind {
    pub const ALL: [Self; 9] = [
        Self::Pulse,
        Self::Shake,
        Self::Big,
        Self::Small,
        Self::Nod,
        Self::Ripple,
        Self::Bloom,
        Self::Jitter,
        Self::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pulse => "pulse",
            Self::Shake => "shake",
            Self::Big => "big",
            Self::Small => "small",
            Self::Nod => "nod",
            Self::Ripple => "ripple",
            Self::Bloom => "bloom",
            Self::Jitter => "jitter",
            Self::None => "none",
        }
    }
}

impl From<String> for AnimationKind {
    fn from(s: String) -> Self {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .unwrap_or_else(|| {
                tracing::debug!(animation = %s, "unknown animation, using none");
                Self::None
            })
    }
}

impl From<AnimationKind> for String {
    fn from(k: AnimationKind) -> Self {
        k.as_str().to_owned()
    }
}

pub const INTENSITY_RANGE: (f64, f64) = (10.0, 100.0);
pub const DURATION_RANGE: (f64, f64) = (1.0, 100.0);

/// Color and animation profile of one emotion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionStyle {
    #[serde(rename = "bg")]
    pub background_color: Rgb,
    #[serde(rename = "text")]
    pub text_color: Rgb,
    pub animation: AnimationKind,
    pub intensity: f64,
    /// `>= 100` loops forever.
    pub duration: f64,
}

impl EmotionStyle {
    pub fn new(bg: Rgb, text: Rgb) -> Self {
        Self {
            background_color: bg,
            text_color: text,
            animation: AnimationKind::None,
            intensity: 50.0,
            duration: 100.0,
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.duration >= 100.0
    }

    fn clamp_in_place(&mut self) {
        self.intensity = clamp_num(self.intensity, INTENSITY_RANGE);
        self.duration = clamp_num(self.duration, DURATION_RANGE);
    }
}

fn clamp_num(v: f64, (lo, hi): (f64, f64)) -> f64 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

/// Partial style as found in imported config files.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EmotionStylePatch {
    pub bg: Option<Rgb>,
    pub text: Option<Rgb>,
    pub animation: Option<AnimationKind>,
    pub intensity: Option<f64>,
    pub duration: Option<f64>,
}

/// Editable style property of one emotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmotionProperty {
    Background,
    Text,
}

pub const NEUTRAL_FALLBACK: Rgb = Rgb::new(0x9e, 0x9e, 0x9e);

/// Style for every emotion id. Every read goes through [`EmotionStyleTable::resolve`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EmotionStyleTable {
    styles: BTreeMap<EmotionId, EmotionStyle>,
}

impl EmotionStyleTable {
    pub fn resolve(&self, id: EmotionId) -> EmotionStyle {
        self.styles
            .get(&id)
            .or_else(|| self.styles.get(&EmotionId::Neutral))
            .cloned()
            .unwrap_or_else(|| EmotionStyle::new(NEUTRAL_FALLBACK, NEUTRAL_FALLBACK))
    }

    pub fn set_color(&mut self, id: EmotionId, property: EmotionProperty, color: Rgb) {
        let style = self.entry(id);
        match property {
            EmotionProperty::Background => style.background_color = color,
            EmotionProperty::Text => style.text_color = color,
        }
    }

    pub fn set_animation(&mut self, id: EmotionId, animation: AnimationKind) {
        self.entry(id).animation = animation;
    }

    pub fn set_intensity(&mut self, id: EmotionId, intensity: f64) {
        let style = self.entry(id);
        style.intensity = intensity;
        style.clamp_in_place();
    }

    pub fn set_duration(&mut self, id: EmotionId, duration: f64) {
        let style = self.entry(id);
        style.duration = duration;
        style.clamp_in_place();
    }

    /// Merges imported per-emotion fields; unknown emotion names are skipped.
    pub fn merge_patches(&mut self, patches: &BTreeMap<String, EmotionStylePatch>) {
        for (name, patch) in patches {
            let Some(id) = EmotionId::parse(name) else {
                tracing::warn!(emotion = %name, "ignoring unknown emotion in config");
                continue;
            };
            let style = self.entry(id);
            if let Some(bg) = patch.bg {
                style.background_color = bg;
            }
            if let Some(text) = patch.text {
                style.text_color = text;
            }
            if let Some(animation) = patch.animation {
                style.animation = animation;
            }
            if let Some(intensity) = patch.intensity {
                style.intensity = intensity;
            }
            if let Some(duration) = patch.duration {
                style.duration = duration;
            }
            style.clamp_in_place();
        }
    }

    fn entry(&mut self, id: EmotionId) -> &mut EmotionStyle {
        let fallback = self.resolve(id);
        self.styles.entry(id).or_insert(fallback)
    }
}

impl Default for EmotionStyleTable {
    fn default() -> Self {
        fn c(hex: u32) -> Rgb {
            Rgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
        }
        let styles = [
            (EmotionId::Anger, 0xD54A4A, 0xAA4A4A),
            (EmotionId::Happy, 0x4CAF50, 0x3A8C8C),
            (EmotionId::Peaceful, 0xFFEB3B, 0xFFD54F),
            (EmotionId::Fear, 0xFF9800, 0xD54A4A),
            (EmotionId::Sad, 0xAB4A8E, 0x5E1D85),
            (EmotionId::Surprise, 0x2196F3, 0x1A237E),
            (EmotionId::Neutral, 0x9E9E9E, 0x1A237E),
        ]
        .into_iter()
        .map(|(id, bg, text)| (id, EmotionStyle::new(c(bg), c(text))))
        .collect();
        Self { styles }
    }
}

/// Fixed swatch palette offered next to every color picker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette(pub Vec<Rgb>);

impl Default for Palette {
    fn default() -> Self {
        const SWATCHES: [u32; 12] = [
            0xFFEB3B, 0x4CAF50, 0x3A8C8C, 0x2A7E7E, 0x3F51B5, 0x1A237E, 0x5E1D85, 0xAB4A8E,
            0xD54A4A, 0xE53935, 0xFF9800, 0xFFB74D,
        ];
        Self(
            SWATCHES
                .into_iter()
                .map(|v| Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8))
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/emotion/model.rs"]
mod tests;
