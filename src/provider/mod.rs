//! LLM Provider Module
//!
//! The remote service behind the relays. [`Provider`] is the seam; the
//! OpenAI implementation speaks the OpenAI REST API.

mod error;
mod factory;
mod openai;
mod r#trait;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{ProviderError, Result};
pub use factory::create_provider;
pub use openai::{ModelSettings, OpenAIProvider};
pub use r#trait::Provider;
pub use types::{
    speech_content_type, AudioBlob, ChatCompletion, ChatMessage, Choice,
    ChoiceMessage, Role, SynthesizedSpeech, Transcription, DEFAULT_AUDIO_CONTENT_TYPE,
    DEFAULT_AUDIO_FILE_NAME,
};
