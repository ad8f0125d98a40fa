//! Transcription relay

use crate::error::RelayError;
use crate::provider::{AudioBlob, Provider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Multipart field carrying the audio upload
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptionReply {
    pub text: String,
}

pub struct TranscriptionRelay {
    provider: Arc<dyn Provider>,
    max_upload_bytes: usize,
}

impl TranscriptionRelay {
    pub fn new(provider: Arc<dyn Provider>, max_upload_bytes: usize) -> Self {
        Self {
            provider,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Error for uploads over the ceiling
    pub fn too_large(&self) -> RelayError {
        RelayError::payload_too_large(format!(
            "File too large (max {}MB)",
            self.max_upload_bytes / (1024 * 1024)
        ))
    }

    /// Checks run in order: presence, size (inclusive ceiling), credential.
    pub async fn relay(&self, file: Option<AudioBlob>) -> Result<TranscriptionReply, RelayError> {
        let Some(audio) = file else {
            return Err(RelayError::invalid_input("No se recibió un archivo de audio"));
        };

        if audio.len() > self.max_upload_bytes {
            tracing::warn!(
                "Transcription upload rejected: {} bytes (max {})",
                audio.len(),
                self.max_upload_bytes
            );
            return Err(self.too_large());
        }

        if !self.provider.has_credential() {
            return Err(RelayError::missing_credential());
        }

        let transcription = self
            .provider
            .transcribe(audio)
            .await
            .map_err(|e| RelayError::from_provider(e, "Unknown audio processing error"))?;

        Ok(TranscriptionReply {
            text: transcription.text,
        })
    }
}
