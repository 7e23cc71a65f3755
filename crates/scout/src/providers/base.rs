use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::message::Message;
use crate::models::tool::Tool;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Base trait for chat model providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the next message given the system instruction, the conversation so far
    /// and the tools the model may request. An empty `system` sends no system message.
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<(Message, Usage)>;

    /// A single system + human exchange without tools, returning the reply text
    async fn chat(&self, system: &str, human: &str) -> Result<String> {
        let message = Message::user().with_text(human);
        let (response, _) = self.complete(system, &[message], &[]).await?;
        Ok(response.text())
    }
}
