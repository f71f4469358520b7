use std::collections::BTreeMap;

use crate::emotion::model::{EmotionId, EmotionState};
use crate::emotion::provider::EmotionProvider;

const BASELINE: f64 = 0.1;
const INTENSIFIERS: [&str; 5] = ["very", "so", "really", "extremely", "absolutely"];

fn keywords(id: EmotionId) -> &'static [&'static str] {
    match id {
        EmotionId::Anger => &[
            "angry",
            "mad",
            "furious",
            "rage",
            "hate",
            "annoyed",
            "irritated",
            "frustrated",
            "enraged",
        ],
        EmotionId::Happy => &[
            "happy",
            "joy",
            "excited",
            "glad",
            "pleased",
            "delighted",
            "cheerful",
            "thrilled",
            "ecstatic",
            "love",
        ],
        EmotionId::Peaceful => &[
            "peaceful", "calm", "relaxed", "serene", "tranquil", "content", "zen", "mindful",
            "chill",
        ],
        EmotionId::Fear => &[
            "fear",
            "afraid",
            "scared",
            "terrified",
            "anxious",
            "worried",
            "nervous",
            "dread",
            "panic",
        ],
        EmotionId::Sad => &[
            "sad",
            "unhappy",
            "depressed",
            "miserable",
            "gloomy",
            "heartbroken",
            "down",
            "melancholy",
            "devastated",
        ],
        EmotionId::Surprise => &[
            "surprise",
            "shocked",
            "amazed",
            "astonished",
            "stunned",
            "wow",
            "unexpected",
            "startled",
            "astounded",
        ],
        EmotionId::Neutral => &[
            "neutral", "ok", "fine", "alright", "average", "normal", "balanced", "standard",
            "moderate",
        ],
    }
}

/// Substring keyword scorer. Acts as the reference [`EmotionProvider`].
#[derive(Clone, Debug, Default)]
pub struct KeywordAnalyzer {
    state: EmotionState,
}

impl KeywordAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores `text`, stores the result as the current state, and returns it.
    pub fn analyze(&mut self, text: &str) -> EmotionState {
        let text = text.trim();
        self.state = if text.is_empty() {
            EmotionState::neutral()
        } else {
            rank(score_text(&text.to_lowercase()))
        };
        self.state.clone()
    }
}

impl EmotionProvider for KeywordAnalyzer {
    fn current_state(&self) -> EmotionState {
        self.state.clone()
    }
}

/// Raw scores: baseline plus keyword, intensifier and phrase boosts.
pub fn score_text(lower: &str) -> BTreeMap<EmotionId, f64> {
    let mut scores: BTreeMap<EmotionId, f64> =
        EmotionId::ALL.into_iter().map(|id| (id, BASELINE)).collect();

    for id in EmotionId::ALL {
        for kw in keywords(id) {
            if !lower.contains(kw) {
                continue;
            }
            let mut boost = 1.0;
            if INTENSIFIERS
                .iter()
                .any(|i| lower.contains(&format!("{i} {kw}")))
            {
                boost += 1.0;
            }
            *scores.entry(id).or_default() += boost;
        }
    }

    if lower.contains("i love you") {
        *scores.entry(EmotionId::Happy).or_default() += 1.5;
        *scores.entry(EmotionId::Peaceful).or_default() += 1.0;
    }
    if lower.contains("i'm afraid") || lower.contains("im afraid") {
        *scores.entry(EmotionId::Fear).or_default() += 1.5;
    }
    if let Some((_, after)) = lower.split_once("but") {
        let after = after.split("but").next().unwrap_or(after);
        for id in EmotionId::ALL {
            let hits = keywords(id).iter().filter(|kw| after.contains(*kw)).count();
            *scores.entry(id).or_default() += 0.8 * hits as f64;
        }
    }
    scores
}

fn rank(raw: BTreeMap<EmotionId, f64>) -> EmotionState {
    let matched = raw.values().any(|&s| s > BASELINE);
    if !matched {
        return EmotionState::neutral();
    }
    let state = EmotionState::from_scores(raw);
    let normalized = state.normalized_scores();
    EmotionState {
        scores: normalized,
        ..state
    }
}

#[cfg(test)]
#[path = "../../tests/unit/emotion/analyzer.rs"]
mod tests;
