//! Chat relay
//!
//! Prepends the assistant persona to the client's conversation and returns
//! the provider's first reply.

use crate::config::AssistantConfig;
use crate::error::RelayError;
use crate::provider::{ChatMessage, Provider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inbound body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
}

pub struct ChatRelay {
    provider: Arc<dyn Provider>,
    system_prompt: String,
    fallback_reply: String,
}

impl ChatRelay {
    pub fn new(provider: Arc<dyn Provider>, assistant: &AssistantConfig) -> Self {
        Self {
            provider,
            system_prompt: assistant.system_prompt.clone(),
            fallback_reply: assistant.fallback_reply.clone(),
        }
    }

    /// `[system prompt] + messages`, input order preserved
    pub fn build_messages(&self, messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
        let mut final_messages = Vec::with_capacity(messages.len() + 1);
        final_messages.push(ChatMessage::system(self.system_prompt.clone()));
        final_messages.extend(messages);
        final_messages
    }

    pub async fn relay(&self, messages: Vec<ChatMessage>) -> Result<ChatReply, RelayError> {
        if !self.provider.has_credential() {
            return Err(RelayError::missing_credential());
        }

        let final_messages = self.build_messages(messages);

        let completion = self
            .provider
            .complete(&final_messages)
            .await
            .map_err(|e| RelayError::from_provider(e, "Unexpected error while generating a reply"))?;

        let reply = match completion.first_content() {
            Some(content) => content.to_string(),
            None => {
                tracing::warn!("Provider returned no chat content, using fallback reply");
                self.fallback_reply.clone()
            }
        };

        Ok(ChatReply { reply })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::provider::mock::{MockProvider, MockReply};
    use crate::provider::Role;
    use axum::http::StatusCode;

    fn relay(provider: Arc<MockProvider>) -> ChatRelay {
        ChatRelay::new(provider, &AssistantConfig::default())
    }

    #[tokio::test]
    async fn test_system_prompt_prepended_in_order() {
        let provider = Arc::new(MockProvider::new());
        let input = vec![
            ChatMessage::user("hola"),
            ChatMessage::assistant("¡Hola! ¿En qué te ayudo?"),
            ChatMessage::user("cuéntame un chiste"),
        ];

        relay(provider.clone()).relay(input.clone()).await.unwrap();

        let sent = provider.last_chat_messages();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].role, Role::System);
        assert_eq!(sent[0].content, AssistantConfig::default().system_prompt);
        assert_eq!(&sent[1..], input.as_slice());
    }

    #[tokio::test]
    async fn test_empty_conversation_sends_only_system_prompt() {
        let provider = Arc::new(MockProvider::new());
        relay(provider.clone()).relay(Vec::new()).await.unwrap();

        let sent = provider.last_chat_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].role, Role::System);
    }

    #[tokio::test]
    async fn test_reply_is_first_choice_content() {
        let provider = Arc::new(MockProvider::new().with_chat_content(Some("hello")));
        let reply = relay(provider)
            .relay(vec![ChatMessage::user("hi")])
            .await
            .unwrap();
        assert_eq!(
            reply,
            ChatReply {
                reply: "hello".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_choices_uses_fallback() {
        let provider = Arc::new(MockProvider::new().with_chat_content(None));
        let reply = relay(provider)
            .relay(vec![ChatMessage::user("hi")])
            .await
            .unwrap();
        assert_eq!(reply.reply, "No se recibió respuesta.");
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_outbound_call() {
        let provider = Arc::new(MockProvider::new().without_credential());
        let err = relay(provider.clone())
            .relay(vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Configuration);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_status_is_propagated() {
        let provider = Arc::new(MockProvider::new().with_reply(MockReply::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        }));
        let err = relay(provider)
            .relay(vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Upstream);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Incorrect API key provided");
        assert!(err.raw.is_some());
    }

    #[tokio::test]
    async fn test_unexpected_failure_is_generic_500() {
        let provider = Arc::new(MockProvider::new().with_reply(MockReply::Unexpected));
        let err = relay(provider)
            .relay(vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_custom_persona() {
        let assistant = AssistantConfig {
            system_prompt: "You are Bob.".to_string(),
            fallback_reply: "nothing".to_string(),
        };
        let relay = ChatRelay::new(Arc::new(MockProvider::new()), &assistant);
        let built = relay.build_messages(vec![ChatMessage::user("hey")]);
        assert_eq!(built[0], ChatMessage::system("You are Bob."));
        assert_eq!(built[1], ChatMessage::user("hey"));
    }
}
