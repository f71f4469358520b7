use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::emotion::model::{EmotionId, EmotionState};

/// Pull-side emotion source, polled once per tick by the render core.
pub trait EmotionProvider {
    fn current_state(&self) -> EmotionState;
}

/// Push-side emission carrying raw scores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionEvent {
    pub scores: BTreeMap<EmotionId, f64>,
}

impl EmotionEvent {
    pub fn into_state(self) -> EmotionState {
        EmotionState::from_scores(self.scores)
    }
}

/// Provider that always reports a fixed state (hosts that only push events).
#[derive(Clone, Debug, Default)]
pub struct StaticProvider {
    state: EmotionState,
}

impl StaticProvider {
    pub fn new(state: EmotionState) -> Self {
        Self { state }
    }

    pub fn set(&mut self, state: EmotionState) {
        self.state = state;
    }
}

impl EmotionProvider for StaticProvider {
    fn current_state(&self) -> EmotionState {
        self.state.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/emotion/provider.rs"]
mod tests;
