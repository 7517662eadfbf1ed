use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use ratatui::style::Color;
use tracing::{info, warn};

pub const DEFAULT_THINKING_DELAY_MS: u64 = 2000;
pub const DEFAULT_GO_LIVE_LATENCY_MS: u64 = 4500;

/// Optional UI configuration document, same shape the web frontend fetched:
/// `{ "ui": { "theme": {...}, "chatbot": {...} } }`. Everything in it is
/// cosmetic or a delay override; the app runs fine without it.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct UiSection {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub chatbot: Chatbot,
}

/// Display-color overrides, named or hex.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Theme {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Chatbot {
    /// Milliseconds between a submitted message and the canned response.
    #[serde(default = "default_thinking_delay")]
    pub thinking_delay: u64,
    /// Milliseconds between go-live start and the success message.
    #[serde(default = "default_go_live_latency")]
    pub go_live_latency: u64,
    #[serde(default)]
    pub quick_actions: Vec<QuickAction>,
}

/// A predefined prompt shortcut that prefills the input draft.
#[derive(Deserialize, Debug, Clone)]
pub struct QuickAction {
    pub id: String,
    #[serde(default)]
    pub icon: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub prompt: String,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_thinking_delay() -> u64 {
    DEFAULT_THINKING_DELAY_MS
}

fn default_go_live_latency() -> u64 {
    DEFAULT_GO_LIVE_LATENCY_MS
}

impl Default for Chatbot {
    fn default() -> Self {
        Self {
            thinking_delay: DEFAULT_THINKING_DELAY_MS,
            go_live_latency: DEFAULT_GO_LIVE_LATENCY_MS,
            quick_actions: Vec::new(),
        }
    }
}

impl UiConfig {
    /// Loads the first config document found: the explicit `--config` path,
    /// then `./config.json`, then the config directory. Absence or a parse
    /// failure just means no quick actions and default delays.
    pub fn load(explicit: Option<&Path>) -> Option<Self> {
        for path in Self::candidate_paths(explicit) {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    info!("loaded UI config from {}", path.display());
                    return Some(config);
                }
                Err(err) => {
                    warn!("could not load UI config from {}: {err:#}", path.display());
                    return None;
                }
            }
        }
        None
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = explicit {
            paths.push(path.to_path_buf());
        }
        paths.push(PathBuf::from("config.json"));
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("trademaestro").join("config.json"));
        }
        paths
    }
}

/// Parses a configured color ("cyan", "#1e90ff", ...). Unknown values fall
/// back to the caller's default.
pub fn parse_color(name: &str) -> Option<Color> {
    name.parse::<Color>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r##"{
        "ui": {
            "theme": { "primary": "cyan", "secondary": "#ff8800" },
            "chatbot": {
                "thinkingDelay": 1500,
                "goLiveLatency": 5000,
                "quickActions": [
                    {
                        "id": "market-trends",
                        "icon": "📈",
                        "title": "Market Trends",
                        "description": "Ask about current trends",
                        "prompt": "What are the current market trends?",
                        "color": "cyan"
                    }
                ]
            }
        }
    }"##;

    #[test]
    fn parses_the_frontend_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, SAMPLE).unwrap();

        let config = UiConfig::load_from(&path).unwrap();
        assert_eq!(config.ui.chatbot.thinking_delay, 1500);
        assert_eq!(config.ui.chatbot.go_live_latency, 5000);
        assert_eq!(config.ui.chatbot.quick_actions.len(), 1);

        let action = &config.ui.chatbot.quick_actions[0];
        assert_eq!(action.id, "market-trends");
        assert_eq!(action.prompt, "What are the current market trends?");
        assert_eq!(config.ui.theme.primary.as_deref(), Some("cyan"));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "ui": { "chatbot": { "quickActions": [] } } }"#).unwrap();

        let config = UiConfig::load_from(&path).unwrap();
        assert_eq!(config.ui.chatbot.thinking_delay, DEFAULT_THINKING_DELAY_MS);
        assert_eq!(config.ui.chatbot.go_live_latency, DEFAULT_GO_LIVE_LATENCY_MS);
        assert!(config.ui.chatbot.quick_actions.is_empty());
    }

    #[test]
    fn missing_file_is_an_error_for_load_from() {
        let dir = tempdir().unwrap();
        assert!(UiConfig::load_from(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn colors_parse_by_name_and_hex() {
        assert_eq!(parse_color("cyan"), Some(Color::Cyan));
        assert!(parse_color("#ff8800").is_some());
        assert_eq!(parse_color("not-a-color"), None);
    }
}
