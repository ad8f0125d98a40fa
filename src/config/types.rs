//! Configuration types, defaults, loading, and validation.

use super::secrets::SecretString;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream LLM provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Assistant persona configuration
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: "127.0.0.1")
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Listen port (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted audio upload in bytes, inclusive (default: 10 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Allow any origin, method and header (browser frontends on another port)
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_permissive: true,
        }
    }
}

/// Upstream provider configuration (OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bearer token (loaded from OPENAI_API_KEY when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// API base URL (default: "https://api.openai.com/v1")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat completion model (default: "gpt-4")
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Token budget for each chat reply (default: 512)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Speech-to-text model (default: "whisper-1")
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// Speech-to-text response format (default: "json")
    #[serde(default = "default_transcription_format")]
    pub transcription_format: String,

    /// Text-to-speech model (default: "tts-1")
    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    /// Text-to-speech voice (default: "nova")
    #[serde(default = "default_speech_voice")]
    pub speech_voice: String,

    /// Text-to-speech audio format (default: "opus")
    #[serde(default = "default_speech_format")]
    pub speech_format: String,

    /// Total timeout for each outbound request in seconds (default: 120)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_transcription_format() -> String {
    "json".to_string()
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_speech_voice() -> String {
    "nova".to_string()
}

fn default_speech_format() -> String {
    "opus".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            max_tokens: default_max_tokens(),
            transcription_model: default_transcription_model(),
            transcription_format: default_transcription_format(),
            speech_model: default_speech_model(),
            speech_voice: default_speech_voice(),
            speech_format: default_speech_format(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// The configured API key, if present and not blank.
    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.is_empty())
    }
}

/// Assistant persona configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// System message prepended to every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Reply used when the provider returns no content
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

pub const DEFAULT_SYSTEM_PROMPT: &str = "Eres un asistente útil llamado maria , empática que \
     responde con precisión y claridad a los mensajes de los usuarios los cuales quieren hablar \
     contigo. En tus respuestas no te excedas de un maximo de 25 palabras";

pub const DEFAULT_FALLBACK_REPLY: &str = "No se recibió respuesta.";

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_fallback_reply() -> String {
    DEFAULT_FALLBACK_REPLY.to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for debug log files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Emit JSON lines on stdout instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: ~/.config/voice-relay/config.toml
    /// 3. Local config: ./voice-relay.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        tracing::debug!("Loading configuration...");

        let mut config = Self::default();

        if let Some(system_config_path) = Self::system_config_path()
            && system_config_path.exists()
        {
            tracing::debug!("Loading system config from: {:?}", system_config_path);
            config = Self::read_file(&system_config_path)?;
        }

        let local_config_path = Self::local_config_path();
        if local_config_path.exists() {
            tracing::debug!("Loading local config from: {:?}", local_config_path);
            config = Self::read_file(&local_config_path)?;
        }

        config = config.apply_env_overrides()?;

        tracing::debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply environment overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from custom path: {:?}", path);

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }

        let config = Self::read_file(path)?.apply_env_overrides()?;

        tracing::debug!("Configuration loaded successfully from custom path");
        Ok(config)
    }

    /// Get the system config path: ~/.config/voice-relay/config.toml
    pub fn system_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("voice-relay").join("config.toml"))
    }

    /// Get the local config path: ./voice-relay.toml
    fn local_config_path() -> PathBuf {
        PathBuf::from("./voice-relay.toml")
    }

    /// Read a TOML file. Sections missing from the file take their defaults.
    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.provider.api_key = Some(SecretString::new(api_key));
        }

        // OpenAI-compatible gateways and local servers
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            self.provider.base_url = base_url;
        }

        if let Some(bind) = lookup("VOICE_RELAY_BIND") {
            self.server.bind = bind;
        }

        if let Some(port) = lookup("VOICE_RELAY_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid VOICE_RELAY_PORT: {}", port))?;
        }

        if let Some(level) = lookup("VOICE_RELAY_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(dir) = lookup("VOICE_RELAY_LOG_DIR") {
            self.logging.dir = Some(PathBuf::from(dir));
        }

        Ok(self)
    }

    /// Check if the provider API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.provider.api_key().is_some()
    }

    pub fn validate(&self) -> Result<()> {
        tracing::debug!("Validating configuration...");

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be non-zero");
        }

        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("server.max_upload_bytes must be greater than zero");
        }

        if self.provider.base_url.trim().is_empty() {
            anyhow::bail!("provider.base_url is empty");
        }

        if self.provider.max_tokens == 0 {
            anyhow::bail!("provider.max_tokens must be greater than zero");
        }

        // Missing key is not fatal: the relays answer with a configuration error.
        if !self.has_api_key() {
            tracing::warn!("No provider API key configured (set OPENAI_API_KEY)");
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }
}
