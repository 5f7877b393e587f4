//! Chat completion request construction

use crate::config::BackendConfig;
use crate::llm::history::{ChatHistory, Role};
use crate::llm::prompts::{render_user_text, SYSTEM_PROMPT};
use crate::processing::analyzer::AnalysisResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<RequestMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMessage {
    pub role: Role,
    pub content: MessageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: Option<String>,
}

/// Build the request for one user turn.
///
/// If any attachment carries an inline image, the vision model is used and the
/// user turn becomes a single message holding a text part followed by one
/// image part per image. Otherwise the text model gets a plain text message.
/// Analysis reports are included in the text either way.
pub fn build_request(
    config: &BackendConfig,
    user_message: &str,
    attachments: &[AnalysisResult],
    history: &ChatHistory,
) -> ChatRequest {
    let mut messages = vec![RequestMessage {
        role: Role::System,
        content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
    }];

    messages.extend(history.recent(config.history_window).into_iter().map(|m| RequestMessage {
        role: m.role,
        content: MessageContent::Text(m.content.clone()),
    }));

    let text = render_user_text(user_message, attachments);
    let image_urls: Vec<String> = attachments.iter().filter_map(AnalysisResult::data_url).collect();

    let (model, content) = if image_urls.is_empty() {
        (config.text_model.clone(), MessageContent::Text(text))
    } else {
        let mut parts = vec![ContentPart::Text { text }];
        parts.extend(
            image_urls
                .into_iter()
                .map(|url| ContentPart::ImageUrl { image_url: ImageUrl { url } }),
        );
        (config.vision_model.clone(), MessageContent::Parts(parts))
    };

    messages.push(RequestMessage {
        role: Role::User,
        content,
    });

    ChatRequest {
        model,
        messages,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}
