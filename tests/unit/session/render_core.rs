use super::*;
use std::collections::BTreeMap;

use serde_json::json;

use crate::foundation::clock::ManualClock;
use crate::session::target::{MemorySurface, MemoryText};

fn state(current: EmotionId, secondary: EmotionId) -> EmotionState {
    EmotionState {
        current_emotion: current,
        secondary_emotion: secondary,
        scores: BTreeMap::new(),
    }
}

fn core() -> (RenderCore, ManualClock) {
    let clock = ManualClock::new(0.0);
    let core = RenderCore::new(Canvas::new(16, 16).unwrap(), clock.clone())
        .unwrap()
        .with_seed(7);
    (core, clock)
}

#[test]
fn starts_neutral_typing_the_prompt_with_one_history_entry() {
    let (mut core, clock) = core();
    assert_eq!(core.emotion().current_emotion, EmotionId::Neutral);
    assert_eq!(core.history_len(), 1);
    assert!(core.needs_update());
    assert!(core.is_animating());
    assert!(!core.can_undo());

    clock.set(90.0);
    assert_eq!(core.text_overlay().text, "E");
    clock.set(60_000.0);
    assert_eq!(core.text_overlay().text, INITIAL_TEXT);
    assert!(!core.is_animating());
}

#[test]
fn emotion_change_transitions_scene_colors_over_background_duration() {
    let (mut core, clock) = core();
    assert!(core.process_emotion(state(EmotionId::Happy, EmotionId::Anger)));
    assert_eq!(core.history_len(), 2);

    clock.set(250.0);
    let mid = core.scene_palette();
    assert_eq!(mid.primary, Rgb::new(117, 167, 119));

    clock.set(500.0);
    let end = core.scene_palette();
    assert_eq!(end.primary, Rgb::new(0x4c, 0xaf, 0x50));
    assert_eq!(end.secondary, Rgb::new(0xd5, 0x4a, 0x4a));
}

#[test]
fn same_leading_emotions_do_not_restart_anything() {
    let (mut core, _clock) = core();
    assert!(!core.process_emotion(EmotionState::neutral()));
    assert_eq!(core.history_len(), 1);

    let mut scores = BTreeMap::new();
    scores.insert(EmotionId::Neutral, 3.0);
    let mut same = EmotionState::neutral();
    same.scores = scores.clone();
    assert!(!core.process_emotion(same));
    assert_eq!(core.emotion().scores, scores);
}

#[test]
fn retrigger_mid_transition_is_continuous() {
    let (mut core, clock) = core();
    core.process_emotion(state(EmotionId::Happy, EmotionId::Anger));
    clock.set(250.0);
    let before = core.scene_palette();
    core.process_emotion(state(EmotionId::Sad, EmotionId::Fear));
    assert_eq!(core.scene_palette(), before);
    clock.set(500.0);
    assert_ne!(core.scene_palette(), before);
}

#[test]
fn pushed_events_stay_authoritative_over_a_stale_provider() {
    use crate::emotion::provider::StaticProvider;

    let (mut core, _clock) = core();
    let provider = StaticProvider::new(state(EmotionId::Happy, EmotionId::Sad));
    assert!(core.observe(&provider));

    let mut scores = BTreeMap::new();
    scores.insert(EmotionId::Fear, 4.0);
    scores.insert(EmotionId::Anger, 1.0);
    assert!(core.push_event(EmotionEvent { scores }));
    assert_eq!(core.emotion().current_emotion, EmotionId::Fear);

    assert!(!core.observe(&provider));
    assert_eq!(core.emotion().current_emotion, EmotionId::Fear);
}

#[test]
fn emotion_change_relinks_advanced_gradient_colors() {
    let (mut core, _clock) = core();
    core.process_emotion(state(EmotionId::Happy, EmotionId::Anger));
    let adv = core.current_settings().advanced_gradient.clone().unwrap();
    assert_eq!(adv.colors.primary, Rgb::new(0x4c, 0xaf, 0x50));
    assert_eq!(adv.colors.secondary, Rgb::new(0xd5, 0x4a, 0x4a));
    assert_eq!(adv.colors.background, Rgb::new(0x59, 0xa3, 0xff));
}

#[test]
fn preview_updates_then_one_commit_record_a_single_entry() {
    let (mut core, _clock) = core();
    for v in [10, 20, 30, 40] {
        core.update_setting_without_history("fontSize", json!(v)).unwrap();
    }
    assert_eq!(core.history_len(), 1);
    assert!(
        core.update_setting_with_history("fontSize", json!(40))
            .unwrap()
    );
    assert_eq!(core.history_len(), 2);
    assert_eq!(core.current_settings().typography.font_size, 40.0);

    assert!(
        !core
            .update_setting_with_history("fontSize", json!(40))
            .unwrap()
    );
    assert_eq!(core.history_len(), 2);
}

#[test]
fn unknown_settings_are_ignored_and_bad_values_rejected() {
    let (mut core, _clock) = core();
    let before = core.current_settings().clone();
    assert!(
        !core
            .update_setting_with_history("noSuchSetting", json!(1))
            .unwrap()
    );
    assert!(
        core.update_setting_with_history("fontSize", json!("big"))
            .is_err()
    );
    assert_eq!(core.current_settings(), &before);
    assert_eq!(core.history_len(), 1);
}

#[test]
fn values_are_clamped_by_the_mutator() {
    let (mut core, _clock) = core();
    core.update_setting_with_history("gradientTiltH", json!(90))
        .unwrap();
    core.update_setting_with_history("textOpacity", json!(-3))
        .unwrap();
    let s = core.current_settings();
    assert_eq!(s.gradient.tilt_h, 45.0);
    assert_eq!(s.layers.text_opacity, 0.0);
}

#[test]
fn reset_control_restores_the_default_and_records_it() {
    let (mut core, _clock) = core();
    core.update_setting_with_history("fontSize", json!(10))
        .unwrap();
    assert!(core.reset_control("fontSize").unwrap());
    assert_eq!(core.current_settings().typography.font_size, 74.0);
    assert_eq!(core.history_len(), 3);
    assert!(!core.reset_control("bogus").unwrap());
}

#[test]
fn undo_redo_and_branch_discard() {
    let (mut core, _clock) = core();
    core.update_setting_with_history("fontSize", json!(10))
        .unwrap();
    core.update_setting_with_history("fontSize", json!(20))
        .unwrap();

    assert!(core.undo());
    assert_eq!(core.current_settings().typography.font_size, 10.0);
    assert!(core.needs_update());
    assert!(core.redo());
    assert_eq!(core.current_settings().typography.font_size, 20.0);
    assert!(!core.redo());

    core.undo();
    core.update_setting_with_history("fontSize", json!(30))
        .unwrap();
    assert!(!core.can_redo());
    assert!(core.undo());
    assert_eq!(core.current_settings().typography.font_size, 10.0);
}

#[test]
fn undo_mid_reveal_keeps_typing() {
    let (mut core, clock) = core();
    clock.set(5_000.0);
    assert_eq!(core.text_overlay().text, INITIAL_TEXT);
    core.update_setting_with_history("fontSize", json!(12))
        .unwrap();
    core.process_analysis(AnalysisResult {
        state: state(EmotionId::Happy, EmotionId::Anger),
        text: "i am happy".into(),
        button_click: true,
    });

    clock.set(5_100.0);
    assert_eq!(core.text_overlay().text, "i");
    assert!(core.undo());
    let overlay = core.text_overlay();
    assert_eq!(overlay.text, "i");
    assert!(overlay.typing);

    clock.set(20_000.0);
    assert_eq!(core.text_overlay().text, "i am happy");
    assert!(core.redo());
    assert_eq!(core.text(), "i am happy");
    assert!(core.undo());
    assert_eq!(core.text(), INITIAL_TEXT);
    assert_eq!(core.current_settings().typography.font_size, 12.0);
}

#[test]
fn typed_text_waits_for_the_typewriter() {
    let (mut core, clock) = core();
    core.process_analysis(AnalysisResult {
        state: EmotionState::neutral(),
        text: "draft".into(),
        button_click: false,
    });
    assert_eq!(core.history_len(), 1);
    assert_ne!(core.text(), "draft");

    clock.set(60_000.0);
    core.text_overlay();
    core.process_analysis(AnalysisResult {
        state: EmotionState::neutral(),
        text: "draft".into(),
        button_click: false,
    });
    assert_eq!(core.text(), "draft");
}

#[test]
fn layer_visibility_records_only_real_changes() {
    let (mut core, _clock) = core();
    assert!(!core.update_layer_visibility(Layer::Gradient, true));
    assert_eq!(core.history_len(), 1);
    assert!(core.update_layer_visibility(Layer::Gradient, false));
    assert!(!core.current_settings().layers.gradient_layer_visible);
    assert_eq!(core.history_len(), 2);
}

#[test]
fn apply_settings_merges_and_records_once() {
    let (mut core, _clock) = core();
    let patch = json!({"fontSize": 5, "gradientOpacity": 60, "unknown": true});
    core.apply_settings(patch.as_object().unwrap()).unwrap();
    assert_eq!(core.current_settings().typography.font_size, 5.0);
    assert_eq!(core.current_settings().layers.gradient_opacity, 60.0);
    assert_eq!(core.history_len(), 2);

    let bad = json!({"fontSize": 9, "gradientOpacity": "lots"});
    assert!(core.apply_settings(bad.as_object().unwrap()).is_err());
    assert_eq!(core.current_settings().typography.font_size, 5.0);
    assert_eq!(core.history_len(), 2);
}

#[test]
fn config_missing_a_required_key_is_rejected_untouched() {
    let (mut core, clock) = core();
    let before = core.current_settings().clone();
    let mut doc: Value = serde_json::from_str(&core.config_json().unwrap()).unwrap();
    doc["fontSize"] = json!(3);
    doc.as_object_mut().unwrap().remove("fontFamily");

    let err = core.load_config_json(&doc.to_string()).unwrap_err();
    assert!(err.to_string().contains("fontFamily"));
    assert_eq!(core.current_settings(), &before);
    assert_eq!(core.history_len(), 1);

    let fb = core.feedback().unwrap();
    assert!(fb.is_error);
    clock.set(FEEDBACK_MS);
    assert!(core.feedback().is_none());
}

#[test]
fn config_round_trips_through_json() {
    let (mut source, _c1) = core();
    source
        .update_setting_with_history("fontFamily", json!("Georgia"))
        .unwrap();
    source
        .edit_color(
            ColorEditTarget::Emotion {
                id: EmotionId::Sad,
                property: EmotionProperty::Background,
            },
            Rgb::new(1, 2, 3),
        )
        .unwrap();
    let json = source.config_json().unwrap();

    let (mut target, _c2) = core();
    target.load_config_json(&json).unwrap();
    assert_eq!(target.current_settings(), source.current_settings());
    assert_eq!(
        target.styles().resolve(EmotionId::Sad).background_color,
        Rgb::new(1, 2, 3)
    );
    assert!(!target.feedback().unwrap().is_error);
}

#[test]
fn emotion_and_swatch_edits_stay_out_of_history() {
    let (mut core, _clock) = core();
    core.edit_color(
        ColorEditTarget::Emotion {
            id: EmotionId::Happy,
            property: EmotionProperty::Background,
        },
        Rgb::new(1, 2, 3),
    )
    .unwrap();
    core.edit_color(ColorEditTarget::PaletteIndex(3), Rgb::BLACK)
        .unwrap();
    assert_eq!(core.history_len(), 1);
    assert!(!core.can_undo());
    assert!(!core.undo());
    assert_eq!(
        core.styles().resolve(EmotionId::Happy).background_color,
        Rgb::new(1, 2, 3)
    );

    core.update_setting_with_history("fontSize", json!(12))
        .unwrap();
    assert!(core.undo());
    assert_eq!(
        core.styles().resolve(EmotionId::Happy).background_color,
        Rgb::new(1, 2, 3)
    );
    assert_eq!(core.palette().0[3], Rgb::BLACK);
}

#[test]
fn edit_color_targets() {
    let (mut core, _clock) = core();
    core.edit_color(ColorEditTarget::PaletteIndex(0), Rgb::WHITE)
        .unwrap();
    assert_eq!(core.palette().0[0], Rgb::WHITE);
    assert!(
        core.edit_color(ColorEditTarget::PaletteIndex(12), Rgb::WHITE)
            .is_err()
    );

    core.edit_color(
        ColorEditTarget::Gradient(GradientChannel::Primary),
        Rgb::BLACK,
    )
    .unwrap();
    let adv = core.current_settings().advanced_gradient.clone().unwrap();
    assert_eq!(adv.colors.primary, Rgb::BLACK);
    assert_eq!(adv.sources.primary, GradientColorSource::Manual);
    assert!(core.is_animating());

    core.update_setting_with_history("advancedGradient", Value::Null)
        .unwrap();
    assert!(
        core.edit_color(
            ColorEditTarget::Gradient(GradientChannel::Background),
            Rgb::BLACK
        )
        .is_err()
    );
}

#[test]
fn animation_offset_advances_with_speed() {
    let (mut core, _clock) = core();
    core.advance_animation();
    assert!((core.animation_offset() - 0.005 * (77.0 / 50.0 + 0.5)).abs() < 1e-12);

    core.update_setting_without_history("animationSpeed", json!(0))
        .unwrap();
    let before = core.animation_offset();
    core.advance_animation();
    assert!((core.animation_offset() - before - 0.005 * (1.0 / 50.0 + 0.5)).abs() < 1e-12);
}

#[test]
fn render_frame_presents_scene_thumbnails_and_text() {
    let (mut core, clock) = core();
    let mut surface = MemorySurface::new(Canvas::new(12, 8).unwrap());
    let mut text = MemoryText::new();

    clock.set(180.0);
    core.render_frame(&mut surface, &mut text).unwrap();
    let frame = surface.frame().unwrap();
    assert_eq!((frame.width(), frame.height()), (12, 8));
    assert!(surface.thumbnails().is_some());

    let overlay = text.overlay().unwrap();
    assert_eq!(overlay.text, "En");
    assert!(overlay.typing);
    assert_eq!(overlay.color, Rgb::new(0x1a, 0x23, 0x7e));
}
