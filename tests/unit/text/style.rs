use super::*;
use crate::foundation::color::Rgb;

#[test]
fn defaults_map_to_expected_css_values() {
    let style = TextStyle::from_settings(&RenderSettings::default());
    assert!((style.font_size_px - (16.0 + 0.74 * 56.0)).abs() < 1e-9);
    assert_eq!(style.letter_spacing_px, 0.0);
    assert!((style.line_height - 1.36).abs() < 1e-12);
    assert_eq!(style.font_weight, 408);
    assert!(!style.italic && !style.underline);
    assert_eq!(style.font_class, Some(FontClass::StandardFont));
    assert!(style.font_family.starts_with("\"SF Pro\","));
    assert_eq!(style.opacity, 1.0);
    assert!(style.visible);
}

#[test]
fn font_size_never_drops_below_sixteen() {
    assert_eq!(font_size_px(0.0), 16.0);
    assert_eq!(font_size_px(-20.0), 16.0);
    assert_eq!(font_size_px(100.0), 72.0);
}

#[test]
fn font_styles_drive_weight_italic_and_underline() {
    let mut s = RenderSettings::default();
    s.typography.font_weight = 100.0;
    s.typography.font_style = FontStyle::Bold;
    let st = TextStyle::from_settings(&s);
    assert_eq!(st.font_weight, 700);
    assert!(!st.italic);

    s.typography.font_style = FontStyle::BoldItalic;
    let st = TextStyle::from_settings(&s);
    assert_eq!(st.font_weight, 700);
    assert!(st.italic);

    s.typography.font_style = FontStyle::Underline;
    let st = TextStyle::from_settings(&s);
    assert_eq!(st.font_weight, 900);
    assert!(st.underline);

    s.typography.kerning = 0.0;
    assert_eq!(TextStyle::from_settings(&s).letter_spacing_px, -5.0);
}

#[test]
fn font_stacks_special_case_the_system_families() {
    let (stack, class) = font_stack("SF Pro Rounded");
    assert_eq!(class, Some(FontClass::RoundedFont));
    assert!(stack.starts_with("\"SF Pro Rounded\""));

    let (stack, class) = font_stack("Georgia");
    assert_eq!(class, None);
    assert_eq!(
        stack,
        "\"Georgia\", -apple-system, BlinkMacSystemFont, Arial, sans-serif"
    );
}

#[test]
fn text_layer_settings_flow_through() {
    let mut s = RenderSettings::default();
    s.layers.text_opacity = 40.0;
    s.layers.text_blend_mode = BlendMode::Screen;
    s.layers.text_layer_visible = false;
    let st = TextStyle::from_settings(&s);
    assert!((st.opacity - 0.4).abs() < 1e-12);
    assert_eq!(st.blend_mode, BlendMode::Screen);
    assert!(!st.visible);
}

#[test]
fn animation_follows_the_emotion_style() {
    let mut style = EmotionStyle::new(Rgb::BLACK, Rgb::WHITE);
    assert_eq!(TextAnimation::from_style(&style), None);

    style.animation = AnimationKind::Pulse;
    style.intensity = 75.0;
    let anim = TextAnimation::from_style(&style).unwrap();
    assert_eq!(anim.kind, AnimationKind::Pulse);
    assert_eq!(anim.intensity, 1.5);
    assert_eq!(anim.iteration, AnimationIteration::Infinite);

    style.duration = 25.0;
    let anim = TextAnimation::from_style(&style).unwrap();
    assert_eq!(anim.iteration, AnimationIteration::Once { duration_s: 2.5 });
}

#[test]
fn text_distortion_requires_the_layer_flags() {
    let mut s = RenderSettings::default();
    assert_eq!(TextDistortion::from_settings(&s), None);

    s.distortion.effect = DistortionEffect::Scanlines;
    s.distortion.intensity = 100.0;
    assert_eq!(
        TextDistortion::from_settings(&s),
        Some(TextDistortion::Scanlines {
            size_px: 8,
            opacity: 0.8
        })
    );

    s.distortion.text = false;
    assert_eq!(TextDistortion::from_settings(&s), None);
    s.distortion.text = true;
    s.layers.distortion_layer_visible = false;
    assert_eq!(TextDistortion::from_settings(&s), None);
}

#[test]
fn text_distortion_parameters_scale_with_intensity() {
    let mut s = RenderSettings::default();
    s.distortion.intensity = 50.0;

    let at = |s: &mut RenderSettings, e| {
        s.distortion.effect = e;
        TextDistortion::from_settings(s).unwrap()
    };
    assert_eq!(
        at(&mut s, DistortionEffect::Blur),
        TextDistortion::Blur { radius_px: 2.5 }
    );
    assert_eq!(
        at(&mut s, DistortionEffect::FilmGrain),
        TextDistortion::Grain {
            contrast: 1.25,
            shadow_px: 1.0
        }
    );
    assert_eq!(
        at(&mut s, DistortionEffect::Glitch),
        TextDistortion::Glitch { offset_px: 5 }
    );
    assert_eq!(
        at(&mut s, DistortionEffect::Pixelate),
        TextDistortion::Pixelate { size_px: 2 }
    );
    assert_eq!(
        at(&mut s, DistortionEffect::Warp),
        TextDistortion::Warp { skew_deg: 10.0 }
    );

    s.distortion.intensity = 0.0;
    assert_eq!(
        at(&mut s, DistortionEffect::Glitch),
        TextDistortion::Glitch { offset_px: 1 }
    );
}
