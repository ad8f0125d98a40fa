//! Configuration Module
//!
//! Handles application configuration loading, validation, and management.

pub mod secrets;
mod types;

pub use secrets::SecretString;
pub use types::{
    AssistantConfig, Config, LoggingConfig, ProviderConfig, ServerConfig, DEFAULT_FALLBACK_REPLY,
    DEFAULT_SYSTEM_PROMPT,
};
