//! Relays
//!
//! Each relay validates its input, makes exactly one provider call and
//! translates the result. They hold no mutable state and are shared across
//! requests behind `Arc`.

pub mod chat;
pub mod speech;
pub mod transcribe;

pub use chat::{ChatRelay, ChatReply, ChatRequest};
pub use speech::{SpeechRelay, SpeechRequest, MAX_SPEECH_INPUT_CHARS};
pub use transcribe::{TranscriptionRelay, TranscriptionReply, FILE_FIELD};
