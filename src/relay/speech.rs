//! Speech synthesis relay

use crate::error::RelayError;
use crate::provider::{Provider, SynthesizedSpeech};
use serde::Deserialize;
use std::sync::Arc;

/// Longest input the speech endpoint accepts, in characters
pub const MAX_SPEECH_INPUT_CHARS: usize = 4096;

/// Inbound body of `POST /api/tts`
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

pub struct SpeechRelay {
    provider: Arc<dyn Provider>,
}

impl SpeechRelay {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub async fn relay(&self, text: &str) -> Result<SynthesizedSpeech, RelayError> {
        if text.trim().is_empty() {
            return Err(RelayError::invalid_input("Text to synthesize is empty"));
        }

        let chars = text.chars().count();
        if chars > MAX_SPEECH_INPUT_CHARS {
            return Err(RelayError::invalid_input(format!(
                "Text too long: {} characters (max {})",
                chars, MAX_SPEECH_INPUT_CHARS
            )));
        }

        if !self.provider.has_credential() {
            return Err(RelayError::missing_credential());
        }

        self.provider
            .synthesize(text)
            .await
            .map_err(|e| RelayError::from_provider(e, "Unexpected error while synthesizing speech"))
    }
}
