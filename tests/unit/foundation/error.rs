use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MoodError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MoodError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        MoodError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn io_errors_convert_with_question_mark() {
    fn read_missing() -> MoodResult<String> {
        Ok(std::fs::read_to_string("target/definitely/not/here.json")?)
    }
    let err = read_missing().unwrap_err();
    assert!(matches!(err, MoodError::Io(_)));
}

#[test]
fn json_errors_become_serde_errors() {
    let err: MoodError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, MoodError::Serde(_)));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MoodError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn missing_config_keys_are_listed() {
    let err = MoodError::MissingConfigKeys(vec!["fontFamily", "animationSpeed"]);
    assert_eq!(
        err.to_string(),
        "invalid configuration file: missing fontFamily, animationSpeed"
    );
    assert!(err.is_input_error());
}

#[test]
fn environment_failures_are_not_input_errors() {
    let err = MoodError::Io(std::io::Error::other("disk"));
    assert!(!err.is_input_error());
    assert!(!MoodError::evaluation("x").is_input_error());
    assert!(
        MoodError::EmptyCanvas {
            width: 0,
            height: 3
        }
        .is_input_error()
    );
}
