// Application settings
// Loaded from ~/.config/scriba/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CorpusHub API base URL
    pub api_base: String,

    /// Corpus country code, used to key history lookups (e.g. "es")
    pub country: String,

    /// Annotator user name recorded with saved change-sets
    pub user: String,

    /// Ask before discarding pending changes or reverting history
    pub confirm_destructive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "https://corpus.scriba.app".into(),
            country: String::new(),
            user: String::new(),
            confirm_destructive: true,
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("scriba/settings.json"))
}

impl Settings {
    /// Load settings from disk, falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error parsing settings.json: {}", e);
                    eprintln!("Using default settings");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save settings, creating the config directory if needed.
    pub fn save(&self) -> Result<(), String> {
        let path = settings_path().ok_or("Could not determine config directory")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Error creating config directory: {}", e))?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, contents).map_err(|e| e.to_string())
    }
}
