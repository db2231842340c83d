//! Full configuration validation.
//!
//! Every section is checked and all errors are collected into a single
//! `ConfigError::ValidationError`.

mod helpers;

#[cfg(test)]
mod tests;

use tabweave_common::ConfigError;

use crate::schema::TabweaveConfig;

use helpers::{validate_range, validate_range_f64, validate_range_u64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TabweaveConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(&mut errors, "runtime.tick_hz", config.runtime.tick_hz, 1, 240);

    validate_range_u64(
        &mut errors,
        "network.fetch_timeout_ms",
        config.network.fetch_timeout_ms,
        100,
        300_000,
    );
    if config.network.allowed_schemes.is_empty() {
        errors.push("network.allowed_schemes must not be empty".into());
    }
    for scheme in &config.network.allowed_schemes {
        if !is_valid_scheme(scheme) {
            errors.push(format!("network.allowed_schemes: `{scheme}` is not a URL scheme"));
        }
    }

    validate_range(&mut errors, "tabs.max_tabs", config.tabs.max_tabs, 1, 512);
    validate_range(
        &mut errors,
        "tabs.history_limit",
        config.tabs.history_limit,
        1,
        1000,
    );
    if config.tabs.home_url.trim().is_empty() {
        errors.push("tabs.home_url must not be empty".into());
    }

    validate_range_f64(
        &mut errors,
        "layout.viewport_width",
        config.layout.viewport_width,
        80.0,
        16384.0,
    );
    validate_range_f64(
        &mut errors,
        "layout.viewport_height",
        config.layout.viewport_height,
        60.0,
        16384.0,
    );
    validate_range_f64(&mut errors, "layout.char_width", config.layout.char_width, 1.0, 64.0);
    validate_range_f64(
        &mut errors,
        "layout.line_height",
        config.layout.line_height,
        1.0,
        128.0,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
