use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&TabweaveConfig::default()).is_ok());
}

#[test]
fn tick_rate_out_of_range() {
    let mut config = TabweaveConfig::default();
    config.runtime.tick_hz = 0;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("runtime.tick_hz"));
}

#[test]
fn collects_every_error() {
    let mut config = TabweaveConfig::default();
    config.tabs.max_tabs = 0;
    config.network.fetch_timeout_ms = 5;
    config.layout.char_width = 0.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("tabs.max_tabs"));
    assert!(err.contains("network.fetch_timeout_ms"));
    assert!(err.contains("layout.char_width"));
}

#[test]
fn empty_scheme_list_is_rejected() {
    let mut config = TabweaveConfig::default();
    config.network.allowed_schemes.clear();
    assert!(validate(&config).is_err());
}

#[test]
fn malformed_scheme_is_rejected() {
    let mut config = TabweaveConfig::default();
    config.network.allowed_schemes = vec!["gemini".into(), "1http".into()];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("1http"));
}

#[test]
fn nan_viewport_is_rejected() {
    let mut config = TabweaveConfig::default();
    config.layout.viewport_width = f64::NAN;
    assert!(validate(&config).is_err());
}

#[test]
fn scheme_grammar() {
    assert!(is_valid_scheme("gemini"));
    assert!(is_valid_scheme("svn+ssh"));
    assert!(!is_valid_scheme(""));
    assert!(!is_valid_scheme("ht tp"));
}
