use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{http_client, parse_query, query_schema, System};
use crate::config::WikipediaConfig;
use crate::errors::{AgentError, AgentResult};
use crate::models::content::Content;
use crate::models::tool::{Tool, ToolCall};

const LOOKUP_TOOL: &str = "lookup";

/// Longest query the search endpoint is sent
const MAX_QUERY_LENGTH: usize = 300;

pub const DEFAULT_DESCRIPTION: &str = "A wrapper around Wikipedia. \
    Useful for when you need to answer general questions about people, places, companies, \
    facts, historical events, or other subjects. Input should be a search query.";

pub const NO_RESULTS: &str = "No good Wikipedia Search Result was found";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
}

/// Page summaries from the MediaWiki action API
pub struct WikipediaSystem {
    tools: Vec<Tool>,
    description: String,
    client: Client,
    config: WikipediaConfig,
}

impl WikipediaSystem {
    pub fn new(config: WikipediaConfig) -> Result<Self> {
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
            LOOKUP_TOOL,
            description,
            query_schema("The subject to look up on Wikipedia"),
        )]
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> AgentResult<T> {
        let url = format!("{}/w/api.php", self.config.host.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| AgentError::ExecutionError(format!("Wikipedia request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::ExecutionError(format!(
                "Wikipedia request failed: {}",
                status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AgentError::ExecutionError(format!("Unexpected Wikipedia response: {}", e))
        })
    }

    /// Titles of the best matching pages, at most `top_k_results`
    pub async fn search(&self, query: &str) -> AgentResult<Vec<String>> {
        let query: String = query.chars().take(MAX_QUERY_LENGTH).collect();
        let limit = self.config.top_k_results.to_string();
        let response: SearchResponse = self
            .get(&[
                ("list", "search"),
                ("srsearch", query.as_str()),
                ("srlimit", limit.as_str()),
            ])
            .await?;

        Ok(response
            .query
            .search
            .into_iter()
            .take(self.config.top_k_results)
            .map(|hit| hit.title)
            .collect())
    }

    /// Plain-text intro of a page, `None` when the page has no usable extract
    pub async fn summary(&self, title: &str) -> AgentResult<Option<(String, String)>> {
        let response: ExtractResponse = self
            .get(&[
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;

        Ok(response
            .query
            .pages
            .into_iter()
            .find(|page| !page.missing)
            .and_then(|page| {
                let extract = page.extract?.trim().to_string();
                (!extract.is_empty()).then_some((page.title, extract))
            }))
    }

    pub async fn lookup(&self, query: &str) -> AgentResult<String> {
        let mut summaries = Vec::new();
        for title in self.search(query).await? {
            match self.summary(&title).await? {
                Some((title, extract)) => {
                    summaries.push(format!("Page: {}\nSummary: {}", title, extract))
                }
                None => tracing::debug!(%title, "skipping page without extract"),
            }
        }

        if summaries.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        Ok(truncate_chars(
            &summaries.join("\n\n"),
            self.config.doc_content_chars_max,
        ))
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[async_trait]
impl System for WikipediaSystem {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>> {
        match tool_call.name.as_str() {
            LOOKUP_TOOL => {
                let query = parse_query(tool_call.arguments)?;
                Ok(vec![Content::text(self.lookup(&query).await?)])
            }
            _ => Err(AgentError::ToolNotFound(tool_call.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(host: String, doc_content_chars_max: usize) -> WikipediaConfig {
        WikipediaConfig {
            host,
            top_k_results: 2,
            doc_content_chars_max,
        }
    }

    async fn mount_search(server: &MockServer, titles: &[&str]) {
        let hits: Vec<_> = titles.iter().map(|t| json!({"ns": 0, "title": t})).collect();
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("list", "search"))
            .and(query_param("srlimit", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"query": {"search": hits}})),
            )
            .mount(server)
            .await;
    }

    async fn mount_page(server: &MockServer, title: &str, page: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("prop", "extracts"))
            .and(query_param("titles", title))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"query": {"pages": [page]}})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_lookup_formats_pages() {
        let server = MockServer::start().await;
        mount_search(&server, &["Amii", "Alberta Machine Intelligence Institute"]).await;
        mount_page(
            &server,
            "Amii",
            json!({"pageid": 1, "title": "Alberta Machine Intelligence Institute",
                   "extract": "Amii is a research institute in Edmonton."}),
        )
        .await;
        mount_page(
            &server,
            "Alberta Machine Intelligence Institute",
            json!({"pageid": 1, "title": "Alberta Machine Intelligence Institute",
                   "extract": "Amii is a research institute in Edmonton."}),
        )
        .await;

        let system = WikipediaSystem::new(config(server.uri(), 4000)).unwrap();
        let output = system.run("What is Amii (research institute)?").await.unwrap();

        let expected_page =
            "Page: Alberta Machine Intelligence Institute\nSummary: Amii is a research institute in Edmonton.";
        assert_eq!(output, format!("{}\n\n{}", expected_page, expected_page));
    }

    #[tokio::test]
    async fn test_lookup_truncates_output() {
        let server = MockServer::start().await;
        mount_search(&server, &["Amii"]).await;
        mount_page(
            &server,
            "Amii",
            json!({"title": "Amii", "extract": "Amii é um instituto de pesquisa."}),
        )
        .await;

        let system = WikipediaSystem::new(config(server.uri(), 20)).unwrap();
        let output = system.lookup("Amii").await.unwrap();
        assert_eq!(output.chars().count(), 20);
        assert_eq!(output, "Page: Amii\nSummary: ");
    }

    #[tokio::test]
    async fn test_search_query_is_cut_to_300_chars() {
        let server = MockServer::start().await;
        let long_query = "é".repeat(400);
        let sent: String = "é".repeat(MAX_QUERY_LENGTH);
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("list", "search"))
            .and(query_param("srsearch", sent.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"query": {"search": [{"title": "É"}]}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let system = WikipediaSystem::new(config(server.uri(), 4000)).unwrap();
        let titles = system.search(&long_query).await.unwrap();
        assert_eq!(titles, vec!["É".to_string()]);
    }

    #[tokio::test]
    async fn test_lookup_skips_missing_pages() {
        let server = MockServer::start().await;
        mount_search(&server, &["Ghost"]).await;
        mount_page(&server, "Ghost", json!({"title": "Ghost", "missing": true})).await;

        let system = WikipediaSystem::new(config(server.uri(), 4000)).unwrap();
        assert_eq!(system.lookup("Ghost").await.unwrap(), NO_RESULTS);
    }

    #[tokio::test]
    async fn test_lookup_no_hits() {
        let server = MockServer::start().await;
        mount_search(&server, &[]).await;

        let system = WikipediaSystem::new(config(server.uri(), 4000)).unwrap();
        assert_eq!(system.lookup("zzzzqqq").await.unwrap(), NO_RESULTS);
    }

    #[tokio::test]
    async fn test_lookup_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let system = WikipediaSystem::new(config(server.uri(), 4000)).unwrap();
        assert!(matches!(
            system.lookup("Amii").await,
            Err(AgentError::ExecutionError(_))
        ));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("", 3), "");
    }
}
