use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Result<Option<String>, ConfigError> {
    let map: HashMap<&'static str, String> = pairs.iter().map(|(k, v)| (*k, (*v).to_string())).collect();
    move |key| Ok(map.get(key).cloned())
}

#[test]
fn from_lookup_defaults() {
    let cfg = BoardConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.auth_token, None);
    assert_eq!(
        cfg.timeouts,
        Timeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg, BoardConfig::default());
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = BoardConfig::from_lookup(lookup_from(&[
        (API_URL_VAR, "https://boards.example.test/"),
        (AUTH_TOKEN_VAR, "tok-123"),
        (REQUEST_TIMEOUT_VAR, "42"),
        (CONNECT_TIMEOUT_VAR, " 7 "),
    ]))
    .unwrap();
    assert_eq!(cfg.api_url, "https://boards.example.test");
    assert_eq!(cfg.auth_token.as_deref(), Some("tok-123"));
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_blank_values_fall_back() {
    let cfg = BoardConfig::from_lookup(lookup_from(&[(API_URL_VAR, "  "), (AUTH_TOKEN_VAR, "")])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.auth_token, None);
}

#[test]
fn from_lookup_invalid_timeout_errors() {
    let err = BoardConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_VAR, "ten")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidNumber { var: REQUEST_TIMEOUT_VAR, value: "ten".into() });
    assert_eq!(err.error_code(), "E_CONFIG_PARSE");
    assert!(err.to_string().contains("TASKBOARD_REQUEST_TIMEOUT_SECS"));
}

#[test]
fn from_lookup_negative_timeout_errors() {
    let err = BoardConfig::from_lookup(lookup_from(&[(CONNECT_TIMEOUT_VAR, "-1")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { var: CONNECT_TIMEOUT_VAR, .. }));
}

#[test]
fn from_lookup_propagates_lookup_errors() {
    let err = BoardConfig::from_lookup(|var| Err(ConfigError::NotUnicode { var })).unwrap_err();
    assert_eq!(err, ConfigError::NotUnicode { var: API_URL_VAR });
    assert_eq!(err.error_code(), "E_CONFIG_ENCODING");
}

#[test]
fn env_lookup_missing_var_is_none() {
    assert_eq!(env_lookup("TASKBOARD_TEST_SURELY_UNSET_VARIABLE").unwrap(), None);
}
