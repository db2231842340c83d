//! Viewport metrics for the flow layout engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewport width in pixels (valid range: 80-16384).
    pub viewport_width: f64,
    /// Viewport height in pixels (valid range: 60-16384).
    pub viewport_height: f64,
    /// Advance of one character in pixels (valid range: 1.0-64.0).
    pub char_width: f64,
    /// Height of one text line in pixels (valid range: 1.0-128.0).
    pub line_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            viewport_height: 768.0,
            char_width: 8.0,
            line_height: 18.0,
        }
    }
}
