use super::*;
use crate::emotion::model::{EmotionId, EmotionState};
use crate::emotion::provider::StaticProvider;
use crate::foundation::clock::ManualClock;
use crate::foundation::core::{Canvas, Surface};
use crate::foundation::error::{MoodError, MoodResult};
use crate::session::target::{MemorySurface, MemoryText};

fn looped(clock: &ManualClock) -> RenderLoop<MemorySurface, MemoryText> {
    let canvas = Canvas::new(8, 8).unwrap();
    let core = RenderCore::new(canvas, clock.clone()).unwrap().with_seed(1);
    RenderLoop::new(core, MemorySurface::new(canvas), MemoryText::new())
}

#[test]
fn redraws_while_animating_then_goes_idle() {
    let clock = ManualClock::new(0.0);
    let mut lp = looped(&clock);
    assert_eq!(lp.step(), StepOutcome::Rendered);
    assert!(lp.core().needs_update());

    clock.set(60_000.0);
    assert_eq!(lp.step(), StepOutcome::Rendered);
    assert!(!lp.core().needs_update());
    assert_eq!(lp.step(), StepOutcome::Idle);
    assert_eq!(lp.surface().presented(), 2);

    lp.core_mut().request_redraw();
    assert_eq!(lp.step(), StepOutcome::Rendered);
}

#[test]
fn animation_offset_advances_even_when_idle() {
    let clock = ManualClock::new(0.0);
    let mut lp = looped(&clock);
    clock.set(60_000.0);
    lp.step();
    let before = lp.core().animation_offset();
    assert_eq!(lp.step(), StepOutcome::Idle);
    assert!(lp.core().animation_offset() > before);
}

#[test]
fn provider_is_polled_every_tick() {
    let clock = ManualClock::new(0.0);
    let happy = EmotionState {
        current_emotion: EmotionId::Happy,
        secondary_emotion: EmotionId::Peaceful,
        scores: Default::default(),
    };
    let mut lp = looped(&clock).with_provider(Box::new(StaticProvider::new(happy)));
    lp.step();
    assert_eq!(lp.core().emotion().current_emotion, EmotionId::Happy);
}

struct Flaky {
    calls: u32,
}

impl SurfaceTarget for Flaky {
    fn size(&self) -> Canvas {
        Canvas {
            width: 4,
            height: 4,
        }
    }

    fn present(&mut self, _frame: &Surface) -> MoodResult<()> {
        self.calls += 1;
        match self.calls {
            1 => Err(MoodError::evaluation("display lost")),
            2 => panic!("driver crashed"),
            _ => Ok(()),
        }
    }
}

#[test]
fn failing_frames_are_contained() {
    let clock = ManualClock::new(0.0);
    let canvas = Canvas::new(4, 4).unwrap();
    let core = RenderCore::new(canvas, clock.clone()).unwrap();
    let mut lp = RenderLoop::new(core, Flaky { calls: 0 }, MemoryText::new());

    assert_eq!(lp.step(), StepOutcome::Failed);
    assert_eq!(lp.step(), StepOutcome::Failed);
    assert_eq!(lp.step(), StepOutcome::Rendered);
    let stats = lp.stats();
    assert_eq!((stats.ticks, stats.rendered, stats.failed), (3, 1, 2));
}

#[test]
fn cancelled_loop_stops_ticking() {
    let clock = ManualClock::new(0.0);
    let mut lp = looped(&clock);
    assert_eq!(lp.run_frames(3).ticks, 3);

    let token = lp.cancel_token();
    token.cancel();
    assert!(token.is_cancelled());
    assert_eq!(lp.run_frames(5).ticks, 3);
    assert_eq!(lp.run(std::time::Duration::from_millis(1)).ticks, 3);
}
