use super::*;
use serde_json::json;

fn hex(s: &str) -> Rgb {
    Rgb::from_hex(s).unwrap()
}

#[test]
fn parses_long_and_short_forms() {
    assert_eq!(hex("#D54A4A"), Rgb::new(0xd5, 0x4a, 0x4a));
    assert_eq!(hex("4caf50"), Rgb::new(0x4c, 0xaf, 0x50));
    assert_eq!(hex("#fa0"), Rgb::new(0xff, 0xaa, 0x00));
}

#[test]
fn malformed_hex_is_a_color_error() {
    for bad in ["", "#", "#12345", "#gggggg", "#1234567", "red"] {
        let err = Rgb::from_hex(bad).unwrap_err();
        assert!(matches!(err, MoodError::Color(_)), "{bad}");
        assert!(err.is_input_error());
    }
}

#[test]
fn hex_round_trip_is_exact() {
    for s in ["#000000", "#ffffff", "#59a3ff", "#9e9e9e", "#0a0b0c"] {
        assert_eq!(hex(s).to_hex(), s);
    }
    for v in (0u32..=0xff_ffff).step_by(7919) {
        let s = format!("#{v:06x}");
        assert_eq!(hex(&s).to_hex(), s);
    }
}

#[test]
fn interpolate_hits_endpoints_exactly() {
    let a = hex("#9e9e9e");
    let b = hex("#4caf50");
    assert_eq!(a.interpolate(b, 0.0), a);
    assert_eq!(a.interpolate(b, 1.0), b);
    assert_eq!(a.interpolate(b, -3.0), a);
    assert_eq!(a.interpolate(b, 7.0), b);
}

#[test]
fn interpolate_is_monotonic_per_channel() {
    let a = hex("#d54a4a");
    let b = hex("#2196f3");
    let mut prev = a;
    for step in 1..=100 {
        let cur = a.interpolate(b, f64::from(step) / 100.0);
        assert!(cur.r <= prev.r);
        assert!(cur.g >= prev.g);
        assert!(cur.b >= prev.b);
        prev = cur;
    }
}

#[test]
fn interpolate_midpoint_rounds_half_up() {
    let mid = hex("#9e9e9e").interpolate(hex("#4caf50"), 0.5);
    assert_eq!(mid, Rgb::new(117, 167, 119));
}

#[test]
fn shade_darkens_multiplicatively_and_clamps() {
    assert_eq!(hex("#646464").shade(-30.0), Rgb::new(70, 70, 70));
    assert_eq!(hex("#c8c8c8").shade(50.0), Rgb::new(255, 255, 255));
    assert_eq!(hex("#ff8000").shade(-100.0), Rgb::BLACK);
    assert_eq!(hex("#d54a4a").shade(-30.0), Rgb::new(149, 51, 51));
}

#[test]
fn complementary_inverts_channels() {
    assert_eq!(hex("#00ff10").complementary(), hex("#ff00ef"));
    assert_eq!(hex("#123456").complementary().complementary(), hex("#123456"));
}

#[test]
fn premul_scales_channels_by_alpha() {
    assert_eq!(hex("#ff8000").premul(1.0), [255, 128, 0, 255]);
    assert_eq!(hex("#ff8000").premul(0.0), [0, 0, 0, 0]);
    assert_eq!(hex("#ffffff").premul(0.5), [128, 128, 128, 128]);
}

#[test]
fn serde_uses_hex_strings() {
    let c: Rgb = serde_json::from_value(json!("#59A3FF")).unwrap();
    assert_eq!(c, Rgb::new(0x59, 0xa3, 0xff));
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#59a3ff"));
    assert!(serde_json::from_value::<Rgb>(json!("#zz0000")).is_err());
}
