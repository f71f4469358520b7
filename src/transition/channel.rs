use crate::foundation::math::Lerp;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Active { start_ms: f64, duration_ms: f64 },
}

/// One independently time-boxed interpolation.
///
/// The channel always holds a value: `Idle` reports the latched target, `Active` interpolates
/// `from -> to` over `duration_ms`. Re-triggering while active starts from the last sampled
/// value so consecutive transitions never jump.
#[derive(Clone, Debug)]
pub struct TransitionChannel<T> {
    phase: Phase,
    from: T,
    to: T,
    last: T,
}

impl<T: Lerp + Clone + PartialEq> TransitionChannel<T> {
    pub fn new(initial: T) -> Self {
        Self {
            phase: Phase::Idle,
            from: initial.clone(),
            to: initial.clone(),
            last: initial,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    /// Value the channel is heading to (or resting at).
    pub fn target(&self) -> &T {
        &self.to
    }

    /// Last value handed out by [`TransitionChannel::sample`] (or the latched target).
    pub fn last(&self) -> &T {
        &self.last
    }

    /// Starts `from -> to`. When already active, `from` is replaced by the last sampled value.
    pub fn start(&mut self, from: T, to: T, duration_ms: f64, now_ms: f64) {
        let from = if self.is_active() {
            self.last.clone()
        } else {
            from
        };
        self.last = from.clone();
        self.from = from;
        self.to = to;
        self.phase = Phase::Active {
            start_ms: now_ms,
            duration_ms,
        };
    }

    /// Transition toward `to` starting from whatever is currently shown.
    pub fn retarget(&mut self, to: T, duration_ms: f64, now_ms: f64) {
        let from = self.last.clone();
        self.start(from, to, duration_ms, now_ms);
    }

    /// Snaps to `value` with no animation.
    pub fn jump(&mut self, value: T) {
        self.phase = Phase::Idle;
        self.from = value.clone();
        self.to = value.clone();
        self.last = value;
    }

    pub fn sample(&mut self, now_ms: f64) -> T {
        let Phase::Active {
            start_ms,
            duration_ms,
        } = self.phase
        else {
            return self.to.clone();
        };

        let ratio = if duration_ms <= 0.0 || !duration_ms.is_finite() {
            1.0
        } else {
            ((now_ms - start_ms) / duration_ms).clamp(0.0, 1.0)
        };

        if ratio >= 1.0 {
            self.phase = Phase::Idle;
            self.from = self.to.clone();
            self.last = self.to.clone();
            return self.to.clone();
        }

        self.last = T::lerp(&self.from, &self.to, ratio);
        self.last.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/channel.rs"]
mod tests;
