use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::emotion::provider::EmotionProvider;
use crate::session::render_core::RenderCore;
use crate::session::target::{SurfaceTarget, TextTarget};

/// Stops a running [`RenderLoop`]. Clones share the flag and may be sent to other threads.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Rendered,
    /// Nothing changed; the frame was skipped.
    Idle,
    /// The frame errored or panicked; the loop carries on.
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub rendered: u64,
    pub failed: u64,
}

/// The single driver: polls the provider, redraws when needed, advances the animation.
pub struct RenderLoop<S, T> {
    core: RenderCore,
    surface: S,
    text: T,
    provider: Option<Box<dyn EmotionProvider>>,
    cancel: CancelToken,
    stats: LoopStats,
}

impl<S: SurfaceTarget, T: TextTarget> RenderLoop<S, T> {
    pub fn new(core: RenderCore, surface: S, text: T) -> Self {
        Self {
            core,
            surface,
            text,
            provider: None,
            cancel: CancelToken::new(),
            stats: LoopStats::default(),
        }
    }

    /// Polls `provider` at the start of every tick.
    pub fn with_provider(mut self, provider: Box<dyn EmotionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn core(&self) -> &RenderCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut RenderCore {
        &mut self.core
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn text(&self) -> &T {
        &self.text
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Handle that stops [`RenderLoop::run`] from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// One scheduler tick.
    pub fn step(&mut self) -> StepOutcome {
        self.stats.ticks += 1;
        if let Some(provider) = &self.provider {
            self.core.observe(provider.as_ref());
        }

        let outcome = if self.core.needs_update() {
            let core = &mut self.core;
            let surface = &mut self.surface;
            let text = &mut self.text;
            let result = catch_unwind(AssertUnwindSafe(|| core.render_frame(surface, text)));
            self.core.finish_frame();
            match result {
                Ok(Ok(())) => {
                    self.stats.rendered += 1;
                    StepOutcome::Rendered
                }
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "frame failed");
                    self.stats.failed += 1;
                    StepOutcome::Failed
                }
                Err(panic) => {
                    let msg = panic
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_owned())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "non-string panic payload".to_owned());
                    tracing::error!(panic = %msg, "frame panicked");
                    self.stats.failed += 1;
                    StepOutcome::Failed
                }
            }
        } else {
            self.core.finish_idle();
            StepOutcome::Idle
        };

        self.core.advance_animation();
        outcome
    }

    /// Runs `frames` ticks back to back.
    pub fn run_frames(&mut self, frames: u64) -> LoopStats {
        for _ in 0..frames {
            if self.cancel.is_cancelled() {
                break;
            }
            self.step();
        }
        self.stats
    }

    /// Ticks every `frame_interval` until cancelled.
    pub fn run(&mut self, frame_interval: Duration) -> LoopStats {
        tracing::debug!(?frame_interval, "render loop started");
        while !self.cancel.is_cancelled() {
            let started = Instant::now();
            self.step();
            std::thread::sleep(frame_interval.saturating_sub(started.elapsed()));
        }
        tracing::debug!(stats = ?self.stats, "render loop stopped");
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
