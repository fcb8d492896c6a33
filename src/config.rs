use color_eyre::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub pollinations: PollinationsConfig,
    pub elevenlabs: ElevenLabsConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// Gemini chat backend configuration. An empty API key disables the model
/// and the assistant answers from its rule table instead.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub endpoint: String,
}

/// Pollinations image generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollinationsConfig {
    pub base_url: String,
    pub width: u32,
    pub height: u32,
}

/// ElevenLabs TTS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub voice_id: String,
    pub model: String,
}

/// Assistant behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub language: String,
}

impl Default for PollinationsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://image.pollinations.ai".to_string(),
            width: 1024,
            height: 1024,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            language: "id-ID".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig {
                api_key: String::new(),
                endpoint: "http://localhost:3000/api/chat".to_string(),
            },
            pollinations: PollinationsConfig::default(),
            elevenlabs: ElevenLabsConfig {
                api_key: "your_api_key_here".to_string(),
                voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
                model: "eleven_multilingual_v2".to_string(),
            },
            assistant: AssistantConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from disk or creates default if not found
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Returns the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "fiqri-bot")
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.pollinations.width, 1024);
        assert_eq!(parsed.assistant.language, "id-ID");
        assert!(parsed.gemini.api_key.is_empty());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let minimal = r#"
[elevenlabs]
api_key = "key"
voice_id = "voice"
model = "eleven_multilingual_v2"
"#;
        let config: Config = toml::from_str(minimal).unwrap();
        assert_eq!(config.pollinations.base_url, "https://image.pollinations.ai");
        assert_eq!(config.assistant.language, "id-ID");
        assert!(config.gemini.endpoint.is_empty());
    }
}
