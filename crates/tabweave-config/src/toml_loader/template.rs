/// Default TOML config content with comments.
pub(super) fn default_config_toml() -> &'static str {
    r##"# tabweave configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[runtime]
# tick_hz = 60              # 1-240

[network]
# fetch_timeout_ms = 15000  # 100-300000
# allowed_schemes = ["gemini", "file", "about"]
# user_agent = "tabweave"

[tabs]
# max_tabs = 64             # 1-512
# home_url = "about:blank"
# history_limit = 100       # 1-1000

[layout]
# viewport_width = 1024.0
# viewport_height = 768.0
# char_width = 8.0
# line_height = 18.0

[logging]
# level = "info"            # trace, debug, info, warn, error
"##
}
