use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::errors::{AgentError, AgentResult};
use crate::models::content::Content;
use crate::models::tool::{Tool, ToolCall};

mod google_jobs;
mod wikipedia;

pub use google_jobs::GoogleJobsSystem;
pub use wikipedia::WikipediaSystem;

/// Core trait for a system of tools that the agent can call on behalf of the model
#[async_trait]
pub trait System: Send + Sync {
    /// Get the name of the system, used to prefix its tools
    fn name(&self) -> &str;

    /// Get the system description
    fn description(&self) -> &str;

    /// Get available tools
    fn tools(&self) -> &[Tool];

    /// Call a tool with the given parameters
    async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>>;

    /// Run the system's first tool directly with a plain query, outside of any agent
    async fn run(&self, query: &str) -> AgentResult<String> {
        let tool = self
            .tools()
            .first()
            .ok_or_else(|| AgentError::ToolNotFound(format!("{} has no tools", self.name())))?;
        let contents = self
            .call(ToolCall::new(tool.name.clone(), json!({ "query": query })))
            .await?;

        Ok(contents
            .iter()
            .filter_map(Content::as_text)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Arguments shared by the single-query lookup tools
#[derive(Debug, Deserialize)]
struct QueryArgs {
    query: String,
}

fn query_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "required": ["query"],
        "properties": {
            "query": {
                "type": "string",
                "description": description
            }
        }
    })
}

fn parse_query(arguments: Value) -> AgentResult<String> {
    let args: QueryArgs = serde_json::from_value(arguments)
        .map_err(|e| AgentError::InvalidParameters(format!("Expected a 'query' string: {}", e)))?;

    let query = args.query.trim();
    if query.is_empty() {
        return Err(AgentError::InvalidParameters(
            "The 'query' parameter must not be empty".to_string(),
        ));
    }
    Ok(query.to_string())
}

fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("scout/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
