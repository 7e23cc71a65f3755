use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{http_client, parse_query, query_schema, System};
use crate::config::SerpApiConfig;
use crate::errors::{AgentError, AgentResult};
use crate::models::content::Content;
use crate::models::tool::{Tool, ToolCall};
use crate::template::{render_template, JOBS_TEMPLATE};

const SEARCH_TOOL: &str = "search";

pub const DEFAULT_DESCRIPTION: &str = "A wrapper around Google Jobs Search. \
    Useful for when you need to get information about job postings from Google Jobs. \
    Input should be a search query.";

/// SerpAPI reports an empty result set as an error with this text
const NO_RESULTS_ERROR: &str = "Google hasn't returned any results for this query.";

#[derive(Debug, Clone, Default, Deserialize)]
struct DetectedExtensions {
    posted_at: Option<String>,
    schedule_type: Option<String>,
}

// SerpAPI sends explicit nulls as well as omitting fields
#[derive(Debug, Clone, Deserialize)]
struct JobResult {
    title: Option<String>,
    company_name: Option<String>,
    location: Option<String>,
    via: Option<String>,
    description: Option<String>,
    detected_extensions: Option<DetectedExtensions>,
}

/// A single posting as handed to the template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPosting {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub via: Option<String>,
    pub posted_at: Option<String>,
    pub schedule_type: Option<String>,
    pub description: String,
}

impl From<JobResult> for JobPosting {
    fn from(job: JobResult) -> Self {
        let extensions = job.detected_extensions.unwrap_or_default();
        Self {
            title: job.title.unwrap_or_default(),
            company_name: job.company_name.unwrap_or_default(),
            location: job.location.unwrap_or_default().trim().to_string(),
            via: job.via,
            posted_at: extensions.posted_at,
            schedule_type: extensions.schedule_type,
            description: job.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    error: Option<String>,
    jobs_results: Option<Vec<JobResult>>,
}

#[derive(Serialize)]
struct JobsContext<'a> {
    jobs: &'a [JobPosting],
}

/// Job postings from Google Jobs, queried through SerpAPI
pub struct GoogleJobsSystem {
    tools: Vec<Tool>,
    description: String,
    client: Client,
    config: SerpApiConfig,
}

impl GoogleJobsSystem {
    pub fn new(config: SerpApiConfig) -> Result<Self> {
        Ok(Self {
            tools: Self::build_tools(DEFAULT_DESCRIPTION),
            description: DEFAULT_DESCRIPTION.to_string(),
            client: http_client()?,
            config,
        })
    }

    /// Replace the description the model sees when choosing between tools
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self.tools = Self::build_tools(&self.description);
        self
    }

    fn build_tools(description: &str) -> Vec<Tool> {
        vec![Tool::new(
            SEARCH_TOOL,
            description,
            query_schema("A job search query, e.g. 'machine learning jobs in Alberta'"),
        )]
    }

    /// Query SerpAPI's google_jobs engine and return every posting it found
    pub async fn search(&self, query: &str) -> AgentResult<Vec<JobPosting>> {
        let url = format!("{}/search.json", self.config.host.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", "google_jobs"),
                ("q", query),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AgentError::ExecutionError(format!("SerpAPI request failed: {}", e)))?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            AgentError::ExecutionError(format!("SerpAPI returned an unreadable body ({}): {}", status, e))
        })?;
        let parsed: SearchResponse = serde_json::from_value(body).map_err(|e| {
            AgentError::ExecutionError(format!("Unexpected SerpAPI response: {}", e))
        })?;

        match parsed.error {
            Some(error) if error == NO_RESULTS_ERROR => return Ok(Vec::new()),
            Some(error) => {
                return Err(AgentError::ExecutionError(format!("SerpAPI error: {}", error)))
            }
            None if !status.is_success() => {
                return Err(AgentError::ExecutionError(format!(
                    "SerpAPI request failed: {}",
                    status
                )))
            }
            None => {}
        }

        let jobs = parsed.jobs_results.unwrap_or_default();
        tracing::debug!(query, results = jobs.len(), "google jobs search");
        Ok(jobs.into_iter().map(JobPosting::from).collect())
    }

    fn render(&self, query: &str, jobs: &[JobPosting]) -> AgentResult<String> {
        if jobs.is_empty() {
            return Ok(format!("No jobs found for '{}'", query));
        }

        let shown = &jobs[..jobs.len().min(self.config.max_results.max(1))];
        render_template(JOBS_TEMPLATE, &JobsContext { jobs: shown })
            .map_err(|e| AgentError::Internal(e.to_string()))
    }
}

#[async_trait]
impl System for GoogleJobsSystem {
    fn name(&self) -> &str {
        "google_jobs"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>> {
        match tool_call.name.as_str() {
            SEARCH_TOOL => {
                let query = parse_query(tool_call.arguments)?;
                let jobs = self.search(&query).await?;
                Ok(vec![Content::text(self.render(&query, &jobs)?)])
            }
            _ => Err(AgentError::ToolNotFound(tool_call.name)),
        }
    }
}
