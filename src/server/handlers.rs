//! HTTP handlers for the three relays

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::BytesMut;
use serde_json::{json, Value};

use super::state::AppState;
use crate::error::RelayError;
use crate::provider::AudioBlob;
use crate::relay::{
    ChatReply, ChatRequest, SpeechRequest, TranscriptionRelay, TranscriptionReply, FILE_FIELD,
};

/// `POST /api/chat`
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, RelayError> {
    let Json(request) = payload.map_err(json_rejection)?;

    tracing::info!("Chat request: {} messages", request.messages.len());

    let reply = state.chat.relay(request.messages).await?;
    Ok(Json(reply))
}

/// `POST /api/transcribe`
pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptionReply>, RelayError> {
    let multipart = multipart.map_err(|rejection| {
        RelayError::invalid_input(format!("Invalid multipart payload: {}", rejection.body_text()))
    })?;

    let audio = read_audio_field(multipart, &state.transcription).await?;

    if let Some(ref audio) = audio {
        tracing::info!(
            "Transcription request: {} bytes ({})",
            audio.len(),
            audio.content_type_or_default()
        );
    }

    let reply = state.transcription.relay(audio).await?;
    Ok(Json(reply))
}

/// `POST /api/tts`
pub async fn tts(
    State(state): State<AppState>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, RelayError> {
    let Json(request) = payload.map_err(json_rejection)?;

    tracing::info!("Speech request: {} chars", request.text.chars().count());

    let speech = state.speech.relay(&request.text).await?;
    Ok(([(header::CONTENT_TYPE, speech.content_type)], speech.audio).into_response())
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "provider": state.provider.name(),
        "credential": state.provider.has_credential(),
    }))
}

fn json_rejection(rejection: JsonRejection) -> RelayError {
    RelayError::invalid_input(format!("Invalid JSON body: {}", rejection.body_text()))
}

/// Pull the first `file` field out of the form. Other fields are skipped.
///
/// Only the audio bytes count toward the upload ceiling. Reading stops as
/// soon as the field grows past it.
async fn read_audio_field(
    mut multipart: Multipart,
    relay: &TranscriptionRelay,
) -> Result<Option<AudioBlob>, RelayError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > relay.max_upload_bytes() {
                tracing::warn!(
                    "Transcription upload rejected: over {} bytes",
                    relay.max_upload_bytes()
                );
                return Err(relay.too_large());
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(Some(AudioBlob {
            data: data.freeze(),
            file_name,
            content_type,
        }));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError) -> RelayError {
    RelayError::invalid_input(format!(
        "Failed reading multipart field: {}",
        err.body_text()
    ))
}
