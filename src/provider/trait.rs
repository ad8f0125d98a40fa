//! Provider trait

use super::error::Result;
use super::types::{AudioBlob, ChatCompletion, ChatMessage, SynthesizedSpeech, Transcription};
use async_trait::async_trait;

/// Remote service offering chat completion, transcription and speech synthesis.
///
/// Each method performs exactly one outbound request and fails with
/// [`ProviderError::MissingApiKey`](super::ProviderError::MissingApiKey)
/// before sending anything when no credential is configured.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a full conversation and return the raw completion
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion>;

    /// Transcribe an audio upload
    async fn transcribe(&self, audio: AudioBlob) -> Result<Transcription>;

    /// Turn text into audio
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech>;

    /// Whether a credential is available for outbound calls
    fn has_credential(&self) -> bool;

    fn name(&self) -> &str;
}
