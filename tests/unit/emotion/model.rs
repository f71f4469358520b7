use super::*;
use serde_json::json;

#[test]
fn emotion_ids_parse_case_insensitively() {
    assert_eq!(EmotionId::parse(" Happy "), Some(EmotionId::Happy));
    assert_eq!(EmotionId::parse("bored"), None);
    assert_eq!(EmotionId::resolve("bored"), EmotionId::Neutral);
}

#[test]
fn from_scores_ranks_top_two() {
    let scores = BTreeMap::from([
        (EmotionId::Sad, 3.0),
        (EmotionId::Fear, 5.0),
        (EmotionId::Happy, 1.0),
    ]);
    let state = EmotionState::from_scores(scores);
    assert_eq!(state.current_emotion, EmotionId::Fear);
    assert_eq!(state.secondary_emotion, EmotionId::Sad);
}

#[test]
fn from_scores_without_signal_is_neutral() {
    let scores = BTreeMap::from([(EmotionId::Anger, -2.0), (EmotionId::Sad, f64::NAN)]);
    assert_eq!(EmotionState::from_scores(scores), EmotionState::neutral());
}

#[test]
fn normalized_scores_sum_to_one_hundred() {
    let state = EmotionState::from_scores(BTreeMap::from([
        (EmotionId::Anger, 1.0),
        (EmotionId::Happy, 3.0),
    ]));
    let pct = state.normalized_scores();
    assert!((pct[&EmotionId::Happy] - 75.0).abs() < 1e-9);
    assert!((pct.values().sum::<f64>() - 100.0).abs() < 1e-9);
}

#[test]
fn unknown_animation_strings_become_none() {
    let k: AnimationKind = serde_json::from_value(json!("PULSE")).unwrap();
    assert_eq!(k, AnimationKind::Pulse);
    let k: AnimationKind = serde_json::from_value(json!("wobble")).unwrap();
    assert_eq!(k, AnimationKind::None);
}

#[test]
fn default_table_matches_catalogue() {
    let table = EmotionStyleTable::default();
    assert_eq!(
        table.resolve(EmotionId::Anger).background_color,
        Rgb::from_hex("#D54A4A").unwrap()
    );
    assert_eq!(
        table.resolve(EmotionId::Happy).background_color,
        Rgb::from_hex("#4CAF50").unwrap()
    );
    assert_eq!(table.resolve(EmotionId::Neutral).background_color, NEUTRAL_FALLBACK);
    assert!(table.resolve(EmotionId::Sad).is_infinite());
}

#[test]
fn setters_clamp_to_documented_ranges() {
    let mut table = EmotionStyleTable::default();
    table.set_intensity(EmotionId::Fear, 3.0);
    table.set_duration(EmotionId::Fear, 400.0);
    let style = table.resolve(EmotionId::Fear);
    assert_eq!(style.intensity, 10.0);
    assert_eq!(style.duration, 100.0);
}

#[test]
fn merge_patches_updates_known_fields_only() {
    let mut table = EmotionStyleTable::default();
    let patches: BTreeMap<String, EmotionStylePatch> = serde_json::from_value(json!({
        "happy": { "bg": "#010203", "animation": "shake" },
        "bored": { "bg": "#ffffff" }
    }))
    .unwrap();
    table.merge_patches(&patches);
    let happy = table.resolve(EmotionId::Happy);
    assert_eq!(happy.background_color, Rgb::new(1, 2, 3));
    assert_eq!(happy.text_color, Rgb::from_hex("#3A8C8C").unwrap());
    assert_eq!(happy.animation, AnimationKind::Shake);
    assert_eq!(table, {
        let mut expected = EmotionStyleTable::default();
        expected.set_color(EmotionId::Happy, EmotionProperty::Background, Rgb::new(1, 2, 3));
        expected.set_animation(EmotionId::Happy, AnimationKind::Shake);
        expected
    });
}

#[test]
fn style_table_serializes_with_legacy_keys() {
    let v = serde_json::to_value(EmotionStyleTable::default()).unwrap();
    assert_eq!(v["anger"]["bg"], json!("#d54a4a"));
}

#[test]
fn palette_has_twelve_swatches() {
    assert_eq!(Palette::default().0.len(), 12);
}
