use anyhow::{Context, Result};

use scout::agent::Agent;
use scout::config::{Config, OpenAiProviderConfig, SerpApiConfig, WikipediaConfig};
use scout::providers::openai::OpenAiProvider;
use scout::systems::{GoogleJobsSystem, System, WikipediaSystem};

use crate::Cli;

const JOBS_DESCRIPTION: &str = "A wrapper around Google Jobs Search. \
    Useful for when you need to get information about job postings from Google Jobs. \
    Input should be a search query.";

const WIKI_DESCRIPTION: &str = "A tool to explain things in text format. \
    Use this tool if you think the concept the user asked about is best explained through text.";

/// Short summaries keep the agent's context small
const WIKI_MAX_CHARS: usize = 280;

/// Provider settings from the environment, with `--api-key` and `--model` taking precedence
pub fn provider_config(cli: &Cli) -> Result<OpenAiProviderConfig> {
    let mut config = OpenAiProviderConfig::from_env_with_key(cli.api_key.clone()).context(
        "API key must be provided via --api-key or OPENAI_API_KEY environment variable",
    )?;
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    Ok(config)
}

pub fn provider(cli: &Cli) -> Result<OpenAiProvider> {
    OpenAiProvider::new(provider_config(cli)?)
}

/// Build the jobs system. Without `require_key` a missing SERPAPI_API_KEY is tolerated,
/// which is enough to describe the tool but not to call it.
pub fn google_jobs(require_key: bool) -> Result<GoogleJobsSystem> {
    let config = match SerpApiConfig::from_env() {
        Ok(config) => config,
        Err(_) if !require_key => SerpApiConfig::new(String::new()),
        Err(e) => return Err(e.context("SERPAPI_API_KEY is needed for the Google Jobs tool")),
    };
    Ok(GoogleJobsSystem::new(config)?.with_description(JOBS_DESCRIPTION))
}

pub fn wikipedia_config() -> Result<WikipediaConfig> {
    WikipediaConfig::from_env_or(WikipediaConfig {
        doc_content_chars_max: WIKI_MAX_CHARS,
        ..WikipediaConfig::default()
    })
}

pub fn wikipedia() -> Result<WikipediaSystem> {
    Ok(WikipediaSystem::new(wikipedia_config()?)?.with_description(WIKI_DESCRIPTION))
}

/// Every system the agent is handed, in the order the model sees them
pub fn systems(require_key: bool) -> Result<Vec<Box<dyn System>>> {
    let jobs: Box<dyn System> = Box::new(google_jobs(require_key)?);
    let wiki: Box<dyn System> = Box::new(wikipedia()?);
    Ok(vec![jobs, wiki])
}

pub fn agent(cli: &Cli, system_prompt: &str) -> Result<Agent> {
    let mut agent = Agent::new(Box::new(provider(cli)?)).with_system_prompt(system_prompt);
    for system in systems(true)? {
        agent.add_system(system);
    }
    Ok(agent)
}
