//! Recording provider for relay and server tests.

use super::error::{ProviderError, Result};
use super::r#trait::Provider;
use super::types::{
    speech_content_type, AudioBlob, ChatCompletion, ChatMessage, Choice,
    ChoiceMessage, SynthesizedSpeech, Transcription,
};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Mutex;

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    Ok,
    Api { status: u16, message: String },
    Unexpected,
}

/// Records every outbound call and replies with canned data
pub struct MockProvider {
    credential: bool,
    reply: MockReply,
    chat_content: Option<String>,
    transcript: String,
    audio: Bytes,
    calls: Mutex<Vec<String>>,
    chat_messages: Mutex<Vec<ChatMessage>>,
    uploads: Mutex<Vec<AudioBlob>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            credential: true,
            reply: MockReply::Ok,
            chat_content: Some("hello".to_string()),
            transcript: "transcribed text".to_string(),
            audio: Bytes::from_static(&[0x4f, 0x67, 0x67, 0x53, 0x00, 0x02]),
            calls: Mutex::new(Vec::new()),
            chat_messages: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn without_credential(mut self) -> Self {
        self.credential = false;
        self
    }

    pub fn with_reply(mut self, reply: MockReply) -> Self {
        self.reply = reply;
        self
    }

    pub fn with_chat_content(mut self, content: Option<&str>) -> Self {
        self.chat_content = content.map(str::to_string);
        self
    }

    pub fn with_audio(mut self, audio: Vec<u8>) -> Self {
        self.audio = Bytes::from(audio);
        self
    }

    /// Number of outbound calls attempted
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn last_chat_messages(&self) -> Vec<ChatMessage> {
        self.chat_messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn last_upload(&self) -> Option<AudioBlob> {
        self.uploads.lock().ok().and_then(|u| u.last().cloned())
    }

    fn record(&self, call: &str) -> Result<()> {
        if !self.credential {
            return Err(ProviderError::MissingApiKey("Mock".to_string()));
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
        match &self.reply {
            MockReply::Ok => Ok(()),
            MockReply::Api { status, message } => Err(ProviderError::ApiError {
                status: *status,
                message: message.clone(),
                detail: Some(serde_json::json!({
                    "message": message,
                    "type": "invalid_request_error",
                    "param": null,
                    "code": null,
                })),
            }),
            MockReply::Unexpected => Err(ProviderError::InvalidResponse(
                "connection reset by peer".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion> {
        if self.credential
            && let Ok(mut recorded) = self.chat_messages.lock()
        {
            *recorded = messages.to_vec();
        }
        self.record("complete")?;

        let choices = match &self.chat_content {
            Some(content) => vec![Choice {
                message: Some(ChoiceMessage {
                    content: Some(content.clone()),
                }),
            }],
            None => Vec::new(),
        };
        Ok(ChatCompletion { choices })
    }

    async fn transcribe(&self, audio: AudioBlob) -> Result<Transcription> {
        self.record("transcribe")?;
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(audio);
        }
        Ok(Transcription {
            text: self.transcript.clone(),
        })
    }

    async fn synthesize(&self, _text: &str) -> Result<SynthesizedSpeech> {
        self.record("synthesize")?;
        Ok(SynthesizedSpeech {
            audio: self.audio.clone(),
            content_type: speech_content_type("opus").to_string(),
        })
    }

    fn has_credential(&self) -> bool {
        self.credential
    }

    fn name(&self) -> &str {
        "mock"
    }
}
