/// Lower bound on the reveal interval.
pub const MIN_INTERVAL_MS: f64 = 50.0;

/// Reveal interval for a `transitionSpeed` setting: faster settings type faster.
pub fn typing_interval_ms(transition_speed: f64) -> f64 {
    (500.0 - transition_speed * 10.0).max(MIN_INTERVAL_MS)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TypewriterState {
    Idle,
    Typing { next_at_ms: f64, interval_ms: f64 },
}

/// Character-by-character text reveal, driven by explicit ticks.
#[derive(Clone, Debug)]
pub struct Typewriter {
    state: TypewriterState,
    target: Vec<char>,
    revealed: usize,
    shown: String,
}

impl Typewriter {
    /// Starts idle with `text` fully shown.
    pub fn new(text: &str) -> Self {
        Self {
            state: TypewriterState::Idle,
            target: text.chars().collect(),
            revealed: text.chars().count(),
            shown: text.to_owned(),
        }
    }

    pub fn state(&self) -> TypewriterState {
        self.state
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.state, TypewriterState::Typing { .. })
    }

    /// Currently visible text.
    pub fn text(&self) -> &str {
        &self.shown
    }

    /// Full text being revealed (equal to [`Typewriter::text`] once idle).
    pub fn target(&self) -> String {
        self.target.iter().collect()
    }

    /// Cancels any reveal in flight and starts typing `text` from the first character.
    pub fn start(&mut self, text: &str, interval_ms: f64, now_ms: f64) {
        self.target = text.chars().collect();
        self.revealed = 0;
        self.shown.clear();
        let interval_ms = interval_ms.max(MIN_INTERVAL_MS);
        self.state = if self.target.is_empty() {
            TypewriterState::Idle
        } else {
            TypewriterState::Typing {
                next_at_ms: now_ms + interval_ms,
                interval_ms,
            }
        };
    }

    /// Reveals every character that is due at `now_ms`. Returns whether the text changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        while let TypewriterState::Typing {
            next_at_ms,
            interval_ms,
        } = self.state
        {
            if now_ms < next_at_ms {
                break;
            }
            if let Some(&c) = self.target.get(self.revealed) {
                self.shown.push(c);
                self.revealed += 1;
                changed = true;
            }
            self.state = if self.revealed >= self.target.len() {
                TypewriterState::Idle
            } else {
                TypewriterState::Typing {
                    next_at_ms: next_at_ms + interval_ms,
                    interval_ms,
                }
            };
        }
        changed
    }

    /// Direct update; ignored while a reveal is in progress.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.is_typing() {
            return false;
        }
        *self = Self::new(text);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/typewriter.rs"]
mod tests;
