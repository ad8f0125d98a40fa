//! Voice Relay - backend for a browser voice assistant
//!
//! Three stateless relays sit between the browser and an OpenAI-compatible
//! provider:
//!
//! - **Chat:** prepends the assistant persona and returns the first reply
//! - **Transcription:** forwards an uploaded audio clip (max 10 MiB) for speech-to-text
//! - **Speech:** turns reply text into Opus audio
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve on 127.0.0.1:3000
//! OPENAI_API_KEY=sk-... voice-relay serve
//!
//! # One-shot chat from the terminal
//! voice-relay ask "¿Qué hora es en Madrid?"
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod relay;
pub mod server;

// Re-export commonly used types
pub use error::{ErrorKind, RelayError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
