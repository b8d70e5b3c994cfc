use super::*;

// =============================================================================
// parse_port
// =============================================================================

#[test]
fn parse_port_absent_uses_default() {
    assert_eq!(parse_port(None), Ok(DEFAULT_PORT));
}

#[test]
fn parse_port_blank_uses_default() {
    assert_eq!(parse_port(Some("  ")), Ok(DEFAULT_PORT));
}

#[test]
fn parse_port_valid() {
    assert_eq!(parse_port(Some("8080")), Ok(8080));
}

#[test]
fn parse_port_out_of_range_is_invalid() {
    let err = parse_port(Some("70000")).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "70000".into() });
}

#[test]
fn parse_port_garbage_is_invalid() {
    assert!(parse_port(Some("http")).is_err());
}

// =============================================================================
// env_parse / env_bool: unique keys so parallel tests don't race.
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: u64 = env_parse("__GS_TEST_MISSING_KEY_4411__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__GS_TEST_EP_VALID__", " 99 ") };
    let val: u64 = env_parse("__GS_TEST_EP_VALID__", 0);
    assert_eq!(val, 99);
    unsafe { std::env::remove_var("__GS_TEST_EP_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__GS_TEST_EP_INVALID__", "soon") };
    let val: u64 = env_parse("__GS_TEST_EP_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__GS_TEST_EP_INVALID__") };
}

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "ON"].iter().enumerate() {
        let key = format!("__GS_TEST_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "No", "off"].iter().enumerate() {
        let key = format!("__GS_TEST_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_unrecognized_returns_none() {
    let key = "__GS_TEST_EB_MAYBE__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn config_error_display_names_variable() {
    assert!(ConfigError::Missing("DATABASE_URL").to_string().contains("DATABASE_URL"));
    let invalid = ConfigError::Invalid { var: "PORT", value: "x".into() };
    assert!(invalid.to_string().contains("PORT"));
}
