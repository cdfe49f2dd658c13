//! Color themes for the console.
//!
//! Themes live in a TOML file keyed by theme name, each mapping the
//! fixed set of named roles to color values. Anything missing or
//! malformed — file, theme name, or a single color — degrades to the
//! default with a logged warning, never a fatal error.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use ratatui::style::Color;
use serde::Deserialize;
use tracing::warn;

/// Resolved colors for every console role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub std_text: Color,
    pub menu_header: Color,
    pub action_key: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Black,
            std_text: Color::White,
            menu_header: Color::Red,
            action_key: Color::Cyan,
            error: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
        }
    }
}

/// One theme as written in the file; absent roles keep their default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTheme {
    background: Option<String>,
    std_text: Option<String>,
    menu_header: Option<String>,
    action_key: Option<String>,
    error: Option<String>,
    success: Option<String>,
    warning: Option<String>,
}

impl Theme {
    /// Load the named theme from `path`, degrading to defaults on any
    /// failure.
    pub fn load(path: &Path, name: &str) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => {
                warn!(
                    "no theme file at {}; using default colors",
                    path.display()
                );
                return Self::default();
            }
        };

        let table: HashMap<String, RawTheme> = match toml::from_str(&contents) {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    "invalid theme file {}: {e}; using default colors",
                    path.display()
                );
                return Self::default();
            }
        };

        match table.get(name) {
            Some(raw) => Self::from_raw(raw, name),
            None => {
                warn!("theme '{name}' not found in {}; using default colors", path.display());
                Self::default()
            }
        }
    }

    fn from_raw(raw: &RawTheme, name: &str) -> Self {
        let defaults = Self::default();
        Self {
            background: resolve(name, "background", &raw.background, defaults.background),
            std_text: resolve(name, "std_text", &raw.std_text, defaults.std_text),
            menu_header: resolve(name, "menu_header", &raw.menu_header, defaults.menu_header),
            action_key: resolve(name, "action_key", &raw.action_key, defaults.action_key),
            error: resolve(name, "error", &raw.error, defaults.error),
            success: resolve(name, "success", &raw.success, defaults.success),
            warning: resolve(name, "warning", &raw.warning, defaults.warning),
        }
    }
}

fn resolve(theme: &str, role: &str, value: &Option<String>, default: Color) -> Color {
    match value {
        None => default,
        Some(s) => Color::from_str(s).unwrap_or_else(|_| {
            warn!("theme '{theme}': bad color '{s}' for {role}; using default");
            default
        }),
    }
}

// ── Tests ────────────────────────────────────────────────────────
