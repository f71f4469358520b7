use super::*;

#[test]
fn interval_follows_transition_speed_with_a_floor() {
    assert_eq!(typing_interval_ms(0.0), 500.0);
    assert_eq!(typing_interval_ms(41.0), 90.0);
    assert_eq!(typing_interval_ms(100.0), 50.0);
}

#[test]
fn reveals_one_character_per_interval() {
    let mut tw = Typewriter::new("old");
    tw.start("hey", 100.0, 0.0);
    assert!(tw.is_typing());
    assert_eq!(tw.text(), "");

    assert!(!tw.tick(99.0));
    assert!(tw.tick(100.0));
    assert_eq!(tw.text(), "h");
    assert!(tw.tick(200.0));
    assert_eq!(tw.text(), "he");
    assert!(tw.tick(300.0));
    assert_eq!(tw.text(), "hey");
    assert_eq!(tw.state(), TypewriterState::Idle);
    assert!(!tw.tick(1_000.0));
}

#[test]
fn late_ticks_catch_up() {
    let mut tw = Typewriter::new("");
    tw.start("abcd", 50.0, 0.0);
    assert!(tw.tick(120.0));
    assert_eq!(tw.text(), "ab");
    tw.tick(10_000.0);
    assert_eq!(tw.text(), "abcd");
    assert!(!tw.is_typing());
}

#[test]
fn restart_cancels_the_previous_reveal() {
    let mut tw = Typewriter::new("");
    tw.start("first", 100.0, 0.0);
    tw.tick(250.0);
    assert_eq!(tw.text(), "fi");

    tw.start("xy", 100.0, 250.0);
    assert_eq!(tw.text(), "");
    tw.tick(350.0);
    assert_eq!(tw.text(), "x");
    assert_eq!(tw.target(), "xy");
}

#[test]
fn empty_text_is_immediately_idle() {
    let mut tw = Typewriter::new("something");
    tw.start("", 100.0, 0.0);
    assert!(!tw.is_typing());
    assert_eq!(tw.text(), "");
}

#[test]
fn direct_updates_never_interrupt_typing() {
    let mut tw = Typewriter::new("");
    tw.start("slow", 100.0, 0.0);
    assert!(!tw.set_text("other"));
    tw.tick(100.0);
    assert_eq!(tw.text(), "s");

    tw.tick(400.0);
    assert!(tw.set_text("other"));
    assert_eq!(tw.text(), "other");
}

#[test]
fn multibyte_text_is_revealed_by_character() {
    let mut tw = Typewriter::new("");
    tw.start("é☺", 50.0, 0.0);
    tw.tick(50.0);
    assert_eq!(tw.text(), "é");
    tw.tick(100.0);
    assert_eq!(tw.text(), "é☺");
}
