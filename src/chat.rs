//! Model-facing collaborators
//!
//! Chat completion and title generation both obtain their client from the
//! shared [`ClientCache`] and treat model output as opaque text, apart from
//! the JSON envelope the title prompt asks for.

use crate::conversation::ConversationService;
use crate::error::{ChatkeepError, Result};
use crate::prompts::generate_title_prompt;
use crate::providers::{ClientCache, Message};
use serde::Deserialize;
use std::sync::Arc;

/// Ask the model for the next reply to `history`
///
/// # Errors
///
/// Returns `ChatkeepError::UnsupportedProvider` for an unknown provider name,
/// otherwise whatever the client returns
pub async fn chat_reply(
    cache: &ClientCache,
    provider: &str,
    model: &str,
    history: &[Message],
) -> Result<String> {
    let client = cache.get_or_create(provider, model)?;
    client.chat(history).await
}

/// Ask the model for a short title describing `query`
///
/// # Errors
///
/// Returns `ChatkeepError::TitleParse` if the reply carries no usable title,
/// plus any error [`chat_reply`] can return
pub async fn generate_title(
    cache: &ClientCache,
    provider: &str,
    model: &str,
    query: &str,
) -> Result<String> {
    let client = cache.get_or_create(provider, model)?;
    let reply = client.complete(&generate_title_prompt(query)).await?;
    parse_title(&reply)
}

#[derive(Deserialize)]
struct TitleReply {
    title: String,
}

/// Extract the title from a `{"title": "..."}` reply
///
/// Models often wrap the object in prose or code fences, so when the whole
/// reply is not valid JSON the outermost `{...}` span is tried instead.
///
/// # Examples
///
/// ```
/// use chatkeep::chat::parse_title;
///
/// let title = parse_title("```json\n{\"title\": \"Rust Lifetimes\"}\n```").unwrap();
/// assert_eq!(title, "Rust Lifetimes");
/// ```
pub fn parse_title(reply: &str) -> Result<String> {
    let trimmed = reply.trim();
    let parsed = serde_json::from_str::<TitleReply>(trimmed).ok().or_else(|| {
        let start = trimmed.find('{')?;
        let end = trimmed.rfind('}')?;
        if end < start {
            return None;
        }
        serde_json::from_str::<TitleReply>(&trimmed[start..=end]).ok()
    });

    match parsed.map(|reply| reply.title.trim().to_string()) {
        Some(title) if !title.is_empty() => Ok(title),
        _ => Err(ChatkeepError::TitleParse(format!("no title in model reply: {}", trimmed)).into()),
    }
}

/// One interactive conversation with a model
///
/// Every exchange is persisted: the user's message before the model is
/// asked, the model's reply once it arrives.
pub struct ChatSession {
    service: ConversationService,
    cache: Arc<ClientCache>,
    provider: String,
    model: String,
    conversation_id: Option<String>,
    title: Option<String>,
    auto_title: bool,
}

impl ChatSession {
    /// Create a session that starts a new conversation on its first message
    pub fn new(
        service: ConversationService,
        cache: Arc<ClientCache>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            service,
            cache,
            provider: provider.into(),
            model: model.into(),
            conversation_id: None,
            title: None,
            auto_title: false,
        }
    }

    /// Continue the existing conversation `id` instead of starting one
    pub fn resume(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    /// Title for the conversation started by the first message
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Ask the model to title the conversation when no title was given
    pub fn with_auto_title(mut self, enabled: bool) -> Self {
        self.auto_title = enabled;
        self
    }

    /// Id of the conversation, once one exists
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Provider this session talks to
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Model this session talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `user_text` and return the model's reply
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::NotFound` if the resumed conversation does not
    /// exist, plus any storage or provider error. The user's message stays
    /// persisted when the model call fails.
    pub async fn send(&mut self, user_text: &str) -> Result<String> {
        let id = match self.conversation_id.clone() {
            Some(id) => {
                let added = self.service.add_message(Some(&id), "user", user_text)?;
                if !added.stored {
                    return Err(ChatkeepError::NotFound(id).into());
                }
                id
            }
            None => {
                let title = self.initial_title(user_text).await;
                let created = self.service.start_conversation(
                    title.as_deref(),
                    Some("user"),
                    Some(user_text),
                )?;
                tracing::info!("Started conversation {} ({})", created.id, created.title);
                self.conversation_id = Some(created.id.clone());
                created.id
            }
        };

        let history = self
            .service
            .fetch(&id)?
            .ok_or_else(|| ChatkeepError::NotFound(id.clone()))?
            .messages;

        let reply = chat_reply(&self.cache, &self.provider, &self.model, &history).await?;
        self.service.add_message(Some(&id), "assistant", &reply)?;
        Ok(reply)
    }

    async fn initial_title(&self, user_text: &str) -> Option<String> {
        if self.title.is_some() || !self.auto_title {
            return self.title.clone();
        }
        match generate_title(&self.cache, &self.provider, &self.model, user_text).await {
            Ok(title) => Some(title),
            Err(e) => {
                tracing::warn!("Title generation failed, using default title: {}", e);
                None
            }
        }
    }
}
