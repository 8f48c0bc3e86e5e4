//! User-specific configuration stored in `user_config.toml`.
//!
//! Lets a trainee deployment carry its own OpenRouter key and judge model
//! without touching the environment. Every getter falls back to env vars,
//! so a plain `.env`-only setup keeps working.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Optional local overrides for the judge client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// OpenRouter API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Preferred judge model (OpenRouter model id).
    #[serde(default)]
    pub judge_model: Option<String>,
}

impl UserConfig {
    pub fn default_path() -> PathBuf {
        PathBuf::from("user_config.toml")
    }

    /// Load from the default path; a missing file yields the default config.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_path(&Self::default_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: UserConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(UserConfig::default())
        }
    }

    /// API key with env fallback. Priority: user_config.toml > OPENROUTER_API_KEY.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
            .filter(|s| !s.trim().is_empty())
    }

    /// Judge model with env fallback. Priority: user_config.toml > VISHGUARD_JUDGE_MODEL.
    pub fn get_judge_model(&self) -> Option<String> {
        self.judge_model
            .clone()
            .or_else(|| std::env::var("VISHGUARD_JUDGE_MODEL").ok())
            .filter(|s| !s.trim().is_empty())
    }
}
