//! Shared application state

use crate::config::Config;
use crate::provider::Provider;
use crate::relay::{ChatRelay, SpeechRelay, TranscriptionRelay};
use std::sync::Arc;

/// Read-only state handed to every handler. Clones are cheap.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub chat: Arc<ChatRelay>,
    pub transcription: Arc<TranscriptionRelay>,
    pub speech: Arc<SpeechRelay>,
}

impl AppState {
    pub fn new(config: &Config, provider: Arc<dyn Provider>) -> Self {
        Self {
            chat: Arc::new(ChatRelay::new(provider.clone(), &config.assistant)),
            transcription: Arc::new(TranscriptionRelay::new(
                provider.clone(),
                config.server.max_upload_bytes,
            )),
            speech: Arc::new(SpeechRelay::new(provider.clone())),
            provider,
        }
    }
}
