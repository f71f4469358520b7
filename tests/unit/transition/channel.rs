use super::*;
use crate::foundation::color::Rgb;

fn hex(s: &str) -> Rgb {
    Rgb::from_hex(s).unwrap()
}

#[test]
fn idle_channel_reports_its_value() {
    let mut ch = TransitionChannel::new(hex("#112233"));
    assert!(!ch.is_active());
    assert_eq!(ch.sample(1234.0), hex("#112233"));
}

#[test]
fn samples_interpolate_then_latch() {
    let mut ch = TransitionChannel::new(hex("#9e9e9e"));
    ch.start(hex("#9e9e9e"), hex("#4caf50"), 500.0, 1000.0);
    assert!(ch.is_active());
    assert_eq!(ch.sample(1000.0), hex("#9e9e9e"));
    assert_eq!(ch.sample(1250.0), Rgb::new(117, 167, 119));
    assert_eq!(ch.sample(1500.0), hex("#4caf50"));
    assert!(!ch.is_active());
    assert_eq!(ch.sample(9000.0), hex("#4caf50"));
}

#[test]
fn zero_or_negative_duration_resolves_on_first_sample() {
    for d in [0.0, -10.0] {
        let mut ch = TransitionChannel::new(Rgb::BLACK);
        ch.start(Rgb::BLACK, Rgb::WHITE, d, 50.0);
        assert_eq!(ch.sample(50.0), Rgb::WHITE);
        assert!(!ch.is_active());
    }
}

#[test]
fn retrigger_while_active_continues_from_last_sample() {
    let mut ch = TransitionChannel::new(Rgb::BLACK);
    ch.start(Rgb::BLACK, Rgb::WHITE, 1000.0, 0.0);
    let before = ch.sample(400.0);
    ch.start(Rgb::BLACK, hex("#ff0000"), 1000.0, 400.0);
    assert_eq!(ch.sample(400.0), before);
    let later = ch.sample(900.0);
    assert!(later.r > before.r && later.g < before.g);
}

#[test]
fn retrigger_never_jumps_for_any_split_point() {
    for split in (0..=1000).step_by(37) {
        let now = f64::from(split);
        let mut ch = TransitionChannel::new(hex("#d54a4a"));
        ch.start(hex("#d54a4a"), hex("#2196f3"), 1000.0, 0.0);
        let before = ch.sample(now);
        ch.retarget(hex("#ffeb3b"), 300.0, now);
        assert_eq!(ch.sample(now), before);
    }
}

#[test]
fn start_from_idle_uses_given_from() {
    let mut ch = TransitionChannel::new(Rgb::WHITE);
    ch.start(Rgb::BLACK, Rgb::WHITE, 100.0, 0.0);
    assert_eq!(ch.sample(0.0), Rgb::BLACK);
}

#[test]
fn jump_cancels_in_flight_transition() {
    let mut ch = TransitionChannel::new(Rgb::BLACK);
    ch.start(Rgb::BLACK, Rgb::WHITE, 100.0, 0.0);
    ch.jump(hex("#123456"));
    assert!(!ch.is_active());
    assert_eq!(ch.sample(50.0), hex("#123456"));
    assert_eq!(ch.target(), &hex("#123456"));
}
