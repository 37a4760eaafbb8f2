// AI implementation using OpenAI
//
// This is the infrastructure implementation of BaseAI.
// What to prompt for lives in domains/meta.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use super::BaseAI;

pub const GPT_4O_MINI: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct OpenAIAdapter {
    client: OpenAIClient,
    model: String,
    temperature: f32,
}

impl OpenAIAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: GPT_4O_MINI.to_string(),
            temperature: 0.7,
        }
    }

    async fn chat(&self, messages: Vec<Message>) -> Result<String> {
        let request = messages
            .into_iter()
            .fold(ChatRequest::new(&self.model), ChatRequest::message)
            .temperature(self.temperature);

        // OpenAIError is kept intact so callers can downcast and classify it.
        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(anyhow::Error::new)?;
        Ok(response.content)
    }
}

#[async_trait]
impl BaseAI for OpenAIAdapter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(vec![Message::user(prompt)]).await
    }

    async fn complete_with_system(&self, system_prompt: &str, prompt: &str) -> Result<String> {
        self.chat(vec![Message::system(system_prompt), Message::user(prompt)])
            .await
    }
}
