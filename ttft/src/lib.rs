use bon::Builder;
use serde::{Deserialize, Serialize};

pub mod models;
pub mod probe;

pub use models::stream::{Fragment, StreamingChoice, StreamingDelta, TokenUsage};
pub use probe::{CompletionClient, LatencyProbe, Measurement};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    Assistant,
    User,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// A chat completion request. Requests are always built for streaming and
/// can't be changed once built.
#[derive(Builder, Clone, Debug, Serialize)]
pub struct GenerationRequest {
    #[builder(into)]
    model: String,
    messages: Vec<Message>,
    #[builder(default)]
    temperature: f32,
    #[builder(skip = true)]
    stream: bool,
}

impl GenerationRequest {
    /// The system-then-user message pair most latency runs use.
    pub fn from_prompts(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self::builder()
            .model(model)
            .messages(vec![
                Message::system(system_prompt),
                Message::user(user_prompt),
            ])
            .temperature(temperature)
            .build()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn is_streaming(&self) -> bool {
        self.stream
    }
}
