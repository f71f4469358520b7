use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(4, 2).unwrap().byte_len().unwrap(), 32);
}

#[test]
fn surface_from_premul_checks_length() {
    assert!(Surface::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(Surface::from_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn fill_and_pixel_read_back() {
    let mut s = Surface::new(3, 2).unwrap();
    s.fill([10, 20, 30, 255]);
    assert_eq!(s.pixel(2, 1), [10, 20, 30, 255]);
    s.clear();
    assert_eq!(s.pixel(0, 0), [0, 0, 0, 0]);
}

#[test]
fn reset_reallocates_only_on_size_change() {
    let mut s = Surface::new(2, 2).unwrap();
    s.fill([1, 1, 1, 1]);
    s.reset(2, 2).unwrap();
    assert_eq!(s.data(), &[0u8; 16][..]);
    s.reset(5, 1).unwrap();
    assert_eq!((s.width(), s.height(), s.data().len()), (5, 1, 20));
}

#[test]
fn straight_round_trip_is_exact_for_opaque_and_clear_pixels() {
    let mut s = Surface::from_premul(2, 1, vec![12, 34, 56, 255, 0, 0, 0, 0]).unwrap();
    s.with_straight(|_, _, _| Ok(())).unwrap();
    assert_eq!(s.data(), &[12, 34, 56, 255, 0, 0, 0, 0]);
}

#[test]
fn with_straight_exposes_unpremultiplied_values() {
    let mut s = Surface::from_premul(1, 1, vec![64, 0, 0, 128]).unwrap();
    s.with_straight(|buf, w, h| {
        assert_eq!((w, h), (1, 1));
        assert_eq!(buf[0], 128);
        Ok(())
    })
    .unwrap();
    assert_eq!(s.pixel(0, 0), [64, 0, 0, 128]);
}

#[test]
fn resized_keeps_flat_colors() {
    let mut s = Surface::new(32, 64).unwrap();
    s.fill([200, 100, 50, 255]);
    let t = s.resized(4, 8).unwrap();
    assert_eq!((t.width(), t.height()), (4, 8));
    assert_eq!(t.pixel(1, 1), [200, 100, 50, 255]);
}

#[test]
fn to_rgba_image_unpremultiplies() {
    let s = Surface::from_premul(1, 1, vec![50, 0, 0, 100]).unwrap();
    let img = s.to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [128, 0, 0, 100]);
}
