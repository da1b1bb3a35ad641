use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_model: "gemini-3-flash-preview".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(data_dir: &Path) -> Self {
        let config_path = data_dir.join("config.json");
        let mut config = if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => Self::default(),
            }
        } else {
            let c = Self::default();
            c.save(data_dir);
            c
        };

        // Override with environment variable if set (more secure than hardcoding)
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.gemini_api_key = key;
            }
        }

        config
    }

    pub fn save(&self, data_dir: &Path) {
        let config_path = data_dir.join("config.json");
        if let Ok(content) = serde_json::to_string_pretty(self) {
            std::fs::write(config_path, content).ok();
        }
    }
}
