//! OpenAI Provider Implementation
//!
//! Chat completion, Whisper transcription and TTS over the OpenAI REST API.
//! Any OpenAI-compatible gateway works by pointing `base_url` at it.

use super::error::{ProviderError, Result};
use super::r#trait::Provider;
use super::types::{
    speech_content_type, AudioBlob, ChatCompletion, ChatMessage, SynthesizedSpeech,
    Transcription,
};
use crate::config::{ProviderConfig, SecretString};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const ERROR_LOG_PREVIEW_CHARS: usize = 200;

/// Fixed model selection sent with every request
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub chat_model: String,
    pub max_tokens: u32,
    pub transcription_model: String,
    pub transcription_format: String,
    pub speech_model: String,
    pub speech_voice: String,
    pub speech_format: String,
}

impl From<&ProviderConfig> for ModelSettings {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            chat_model: config.chat_model.clone(),
            max_tokens: config.max_tokens,
            transcription_model: config.transcription_model.clone(),
            transcription_format: config.transcription_format.clone(),
            speech_model: config.speech_model.clone(),
            speech_voice: config.speech_voice.clone(),
            speech_format: config.speech_format.clone(),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self::from(&ProviderConfig::default())
    }
}

/// OpenAI provider
#[derive(Clone)]
pub struct OpenAIProvider {
    api_key: Option<SecretString>,
    base_url: String,
    client: Client,
    settings: ModelSettings,
}

impl OpenAIProvider {
    /// Create a provider from configuration with a pooled HTTP client
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(DEFAULT_POOL_IDLE_TIMEOUT)
            .build()?;

        Ok(Self::with_client(
            config.api_key().cloned(),
            config.base_url.clone(),
            client,
        )
        .with_settings(ModelSettings::from(config)))
    }

    /// Create with custom HTTP client
    pub fn with_client(api_key: Option<SecretString>, base_url: String, client: Client) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url,
            client,
            settings: ModelSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Authorization header value, or an error before anything is sent
    fn bearer(&self) -> Result<String> {
        self.api_key
            .as_ref()
            .map(|key| format!("Bearer {}", key.expose_secret()))
            .ok_or_else(|| ProviderError::MissingApiKey("OpenAI".to_string()))
    }

    /// Turn a non-2xx response into an API error.
    ///
    /// `fallback` is used when the body has no `error.message`.
    async fn handle_error(response: reqwest::Response, fallback: &str) -> ProviderError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        tracing::debug!(
            "OpenAI error body ({}): {}",
            status,
            body.chars().take(ERROR_LOG_PREVIEW_CHARS).collect::<String>()
        );

        // Field types vary between endpoints, so the body stays untyped.
        let detail = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|mut parsed| parsed.get_mut("error").map(Value::take))
            .filter(Value::is_object);

        let message = detail
            .as_ref()
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());

        ProviderError::ApiError {
            status,
            message,
            detail,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion> {
        let bearer = self.bearer()?;

        tracing::info!(
            "OpenAI chat request: model={}, messages={}, max_tokens={}",
            self.settings.chat_model,
            messages.len(),
            self.settings.max_tokens
        );

        let body = ChatCompletionRequest {
            model: &self.settings.chat_model,
            messages,
            max_tokens: self.settings.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .header(reqwest::header::AUTHORIZATION, bearer)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("OpenAI chat response status: {}", status);

        if !status.is_success() {
            return Err(Self::handle_error(response, "Chat completion failed").await);
        }

        response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    async fn transcribe(&self, audio: AudioBlob) -> Result<Transcription> {
        let bearer = self.bearer()?;

        let file_name = audio.file_name_or_default().to_string();
        let content_type = audio.content_type_or_default().to_string();
        let size = audio.len();

        let file_part = reqwest::multipart::Part::bytes(audio.data.to_vec())
            .file_name(file_name.clone())
            .mime_str(&content_type)
            .map_err(|e| {
                ProviderError::InvalidRequest(format!("Invalid audio content type: {}", e))
            })?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.settings.transcription_model.clone())
            .text("response_format", self.settings.transcription_format.clone());

        tracing::info!(
            "OpenAI transcription request: model={}, file={}, type={}, bytes={}",
            self.settings.transcription_model,
            file_name,
            content_type,
            size
        );

        let response = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .header(reqwest::header::AUTHORIZATION, bearer)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error(response, "Transcription failed").await);
        }

        let transcription: Transcription = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        tracing::info!("OpenAI STT: transcribed {} chars", transcription.text.len());

        Ok(transcription)
    }

    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech> {
        let bearer = self.bearer()?;

        let body = SpeechRequest {
            model: &self.settings.speech_model,
            input: text,
            voice: &self.settings.speech_voice,
            response_format: &self.settings.speech_format,
        };

        let response = self
            .client
            .post(self.endpoint("audio/speech"))
            .header(reqwest::header::AUTHORIZATION, bearer)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error(response, "Speech synthesis failed").await);
        }

        let audio = response.bytes().await?;

        tracing::info!(
            "OpenAI TTS: generated {} bytes of audio (voice={}, model={}, format={})",
            audio.len(),
            self.settings.speech_voice,
            self.settings.speech_model,
            self.settings.speech_format,
        );

        Ok(SynthesizedSpeech {
            audio,
            content_type: speech_content_type(&self.settings.speech_format).to_string(),
        })
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &str {
        "openai"
    }
}
