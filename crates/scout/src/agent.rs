use anyhow::{anyhow, Result};
use futures::stream::BoxStream;
use futures::TryStreamExt;

use crate::errors::{AgentError, AgentResult};
use crate::models::content::Content;
use crate::models::message::{Message, ToolRequest};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall};
use crate::providers::base::Provider;
use crate::systems::System;

/// Separator between the system name and the tool name in the names sent to the model
const TOOL_PREFIX_SEPARATOR: &str = "__";

/// Model turns allowed in a single reply before giving up
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Tools of every system, named the way the model sees them
pub fn prefixed_tools(systems: &[Box<dyn System>]) -> Vec<Tool> {
    let mut tools = Vec::new();
    for system in systems {
        for tool in system.tools() {
            tools.push(Tool::new(
                format!("{}{}{}", system.name(), TOOL_PREFIX_SEPARATOR, tool.name),
                &tool.description,
                tool.parameters.clone(),
            ));
        }
    }
    tools
}

/// Agent pairs a chat model with the systems whose tools it may call
pub struct Agent {
    systems: Vec<Box<dyn System>>,
    provider: Box<dyn Provider>,
    system_prompt: String,
    max_turns: usize,
}

impl Agent {
    /// Create a new Agent with the specified provider
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            systems: Vec::new(),
            provider,
            system_prompt: String::new(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Instruction sent ahead of every model call
    pub fn with_system_prompt<S: Into<String>>(mut self, system_prompt: S) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    /// Add a system to the agent
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    pub fn systems(&self) -> &[Box<dyn System>] {
        &self.systems
    }

    /// Get all tools from all systems with proper system prefixing
    pub fn prefixed_tools(&self) -> Vec<Tool> {
        prefixed_tools(&self.systems)
    }

    /// Find the appropriate system for a tool call based on the prefixed name
    fn get_system_for_tool(&self, prefixed_name: &str) -> AgentResult<(&dyn System, String)> {
        let (system_name, tool_name) = prefixed_name
            .split_once(TOOL_PREFIX_SEPARATOR)
            .filter(|(system, tool)| !system.is_empty() && !tool.is_empty())
            .ok_or_else(|| AgentError::InvalidToolName(prefixed_name.to_string()))?;

        let system = self
            .systems
            .iter()
            .find(|sys| sys.name() == system_name)
            .ok_or_else(|| AgentError::ToolNotFound(prefixed_name.to_string()))?;

        Ok((&**system, tool_name.to_string()))
    }

    /// Dispatch a single tool call to the appropriate system
    async fn dispatch_tool_call(&self, tool_call: AgentResult<ToolCall>) -> AgentResult<Vec<Content>> {
        let call = tool_call?;
        let (system, tool_name) = self.get_system_for_tool(&call.name)?;

        tracing::info!(tool = %call.name, arguments = %call.arguments, "dispatching tool call");
        let result = system.call(ToolCall::new(tool_name, call.arguments)).await;
        if let Err(e) = &result {
            tracing::warn!(tool = %call.name, error = %e, "tool call failed");
        }
        result
    }

    /// Create a stream that yields each message as it's generated by the agent.
    /// This includes both the assistant's responses and the tool responses.
    pub fn reply(&self, messages: &[Message]) -> BoxStream<'_, Result<Message>> {
        let mut messages = messages.to_vec();
        let tools = self.prefixed_tools();

        Box::pin(async_stream::try_stream! {
            let mut turns = 0;
            loop {
                if turns == self.max_turns {
                    Err::<(), _>(anyhow!(
                        "Reached the limit of {} model turns without a final answer",
                        self.max_turns
                    ))?;
                }
                turns += 1;

                let (response, usage) = self.provider.complete(
                    &self.system_prompt,
                    &messages,
                    &tools,
                ).await?;
                tracing::debug!(turn = turns, total_tokens = ?usage.total_tokens, "model turn");

                yield response.clone();

                let tool_requests: Vec<&ToolRequest> = response.tool_requests();
                if tool_requests.is_empty() {
                    break;
                }

                // Dispatch each in parallel but wait until all are finished
                let futures: Vec<_> = tool_requests
                    .iter()
                    .map(|request| self.dispatch_tool_call(request.tool_call.clone()))
                    .collect();
                let outputs = futures::future::join_all(futures).await;

                let mut message_tool_response = Message::user();
                for (request, output) in tool_requests.iter().zip(outputs.into_iter()) {
                    message_tool_response = message_tool_response.with_tool_response(
                        request.id.clone(),
                        output,
                    );
                }

                yield message_tool_response.clone();

                messages.push(response.clone());
                messages.push(message_tool_response);
            }
        })
    }

    /// Run the agent to completion, returning the input followed by every generated message
    pub async fn invoke(&self, messages: &[Message]) -> Result<AgentResponse> {
        let generated: Vec<Message> = self.reply(messages).try_collect().await?;

        let mut transcript = messages.to_vec();
        transcript.extend(generated);
        Ok(AgentResponse {
            messages: transcript,
        })
    }
}

/// The full transcript of one agent invocation
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub messages: Vec<Message>,
}

impl AgentResponse {
    pub fn message(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Text of the last assistant message
    pub fn final_answer(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(Message::text)
    }

    /// Names of every tool the model asked for, in order
    pub fn tool_names(&self) -> Vec<String> {
        self.messages
            .iter()
            .flat_map(|m| m.tool_requests())
            .filter_map(|request| request.tool_call.as_ref().ok())
            .map(|call| call.name.clone())
            .collect()
    }
}
