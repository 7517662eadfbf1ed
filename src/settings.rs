use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tracing::warn;

/// Built-in reply used until the user saves their own.
pub const DEFAULT_RESPONSE: &str = "This is your custom response text!";

/// The one piece of durable state: the canned response returned to every
/// submitted message. Persisted as JSON under the platform config directory;
/// when storage is unavailable the store silently runs in-memory and the next
/// launch starts from the default again.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    #[serde(rename = "customResponse")]
    custom_response: String,

    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Settings {
    /// In-memory store with the built-in default, not backed by any file.
    pub fn new() -> Self {
        Self {
            custom_response: DEFAULT_RESPONSE.to_string(),
            path: None,
        }
    }

    /// Loads from the default location. Any kind of trouble (no config dir,
    /// missing file, unreadable file, bad JSON) degrades to the default text.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("could not determine config directory, settings will not persist");
                Self::new()
            }
        }
    }

    /// Loads from an explicit path, remembering it for later saves.
    pub fn load_from(path: &Path) -> Self {
        let mut settings = if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                    warn!("ignoring malformed settings file {}: {err}", path.display());
                    Self::new()
                }),
                Err(err) => {
                    warn!("could not read settings file {}: {err}", path.display());
                    Self::new()
                }
            }
        } else {
            Self::new()
        };
        settings.path = Some(path.to_path_buf());
        settings
    }

    pub fn custom_response(&self) -> &str {
        &self.custom_response
    }

    /// Replaces the canned response verbatim (no trimming, no length cap) and
    /// persists it. A failed write keeps the new value in memory; it is logged
    /// and never surfaced.
    pub fn set(&mut self, text: String) {
        self.custom_response = text;
        match &self.path {
            Some(path) => {
                if let Err(err) = self.save_to(path) {
                    warn!("could not persist settings: {err:#}");
                }
            }
            None => warn!("no settings path, keeping value in memory only"),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trademaestro").join("settings.json"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
