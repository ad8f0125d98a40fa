//! Provider request/response types shared by the relays.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat completion response. Every level is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Content of the first choice, if the provider sent one
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
    }
}

/// Uploaded audio to transcribe
#[derive(Debug, Clone)]
pub struct AudioBlob {
    pub data: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

pub const DEFAULT_AUDIO_FILE_NAME: &str = "audio.webm";
pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/webm";

impl AudioBlob {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            file_name: None,
            content_type: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn file_name_or_default(&self) -> &str {
        self.file_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_AUDIO_FILE_NAME)
    }

    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transcription {
    pub text: String,
}

/// Synthesized audio with the content type it should be served with
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    pub audio: Bytes,
    pub content_type: String,
}

/// Map a speech `response_format` to its MIME type.
pub fn speech_content_type(format: &str) -> &'static str {
    match format.to_ascii_lowercase().as_str() {
        "opus" => "audio/opus",
        "mp3" => "audio/mpeg",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        "pcm" => "audio/pcm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_role_serialization() {
        let message = ChatMessage::user("hola");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hola"}));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<ChatMessage, _> =
            serde_json::from_str(r#"{"role": "tool", "content": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_first_content() {
        let completion: ChatCompletion =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "hello"}}]}"#).unwrap();
        assert_eq!(completion.first_content(), Some("hello"));
    }

    #[rstest]
    #[case(r#"{}"#)]
    #[case(r#"{"choices": []}"#)]
    #[case(r#"{"choices": [{}]}"#)]
    #[case(r#"{"choices": [{"message": {}}]}"#)]
    #[case(r#"{"choices": [{"message": {"content": null}}]}"#)]
    fn test_first_content_absent(#[case] body: &str) {
        let completion: ChatCompletion = serde_json::from_str(body).unwrap();
        assert_eq!(completion.first_content(), None);
    }

    #[test]
    fn test_audio_blob_defaults() {
        let blob = AudioBlob::new(vec![1u8, 2, 3]);
        assert_eq!(blob.file_name_or_default(), "audio.webm");
        assert_eq!(blob.content_type_or_default(), "audio/webm");
        assert_eq!(blob.len(), 3);

        let blob = blob.with_file_name("clip.ogg").with_content_type("audio/ogg");
        assert_eq!(blob.file_name_or_default(), "clip.ogg");
        assert_eq!(blob.content_type_or_default(), "audio/ogg");
    }

    #[rstest]
    #[case("opus", "audio/opus")]
    #[case("MP3", "audio/mpeg")]
    #[case("wav", "audio/wav")]
    #[case("weird", "application/octet-stream")]
    fn test_speech_content_type(#[case] format: &str, #[case] expected: &str) {
        assert_eq!(speech_content_type(format), expected);
    }
}
