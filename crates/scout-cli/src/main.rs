use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod setup;

use commands::{agent, chat, lookup, tools};

const SCIENTIST_PROMPT: &str = "You are a Scientist in AI.";
const HOT_TOPICS_QUESTION: &str = "Which are the most 3 hot topic in AI now?";
const JOBS_QUERY: &str = "Can I get a list of 3 job posting related to machine learning in alberta";
const WIKI_QUERY: &str = "Amii (research institute)";
pub const RECRUITER_PROMPT: &str =
    "You are a recruiter, who is trying to help me in finding suitable jobs";
pub const RECRUITER_QUESTION: &str =
    "Find me the most recent Machine Learning job in Alberta, specify when the job was posted";
pub const ASSISTANT_PROMPT: &str = "You are my assistant";
pub const ASSISTANT_QUESTION: &str = "What is Amii (research institute)?";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Load environment variables from this file instead of searching for .env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// OpenAI API Key (can also be set via OPENAI_API_KEY environment variable)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model to use (can also be set via OPENAI_MODEL environment variable)
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the tools the agent can call
    Tools,

    /// Ask the chat model directly, without any tools
    Chat {
        /// Instruction for how the model should behave
        #[arg(long, default_value = SCIENTIST_PROMPT)]
        system: String,

        /// The question to ask
        #[arg(long, default_value = HOT_TOPICS_QUESTION)]
        prompt: String,
    },

    /// Run the Google Jobs tool on its own
    Jobs {
        #[arg(default_value = JOBS_QUERY)]
        query: String,

        /// Only print this many characters of the result
        #[arg(long, default_value_t = 1000)]
        max_chars: usize,
    },

    /// Run the Wikipedia tool on its own
    Wiki {
        #[arg(default_value = WIKI_QUERY)]
        query: String,
    },

    /// Let the agent pick tools to answer a question
    Agent {
        /// Instruction for how the agent should behave
        #[arg(long, default_value = RECRUITER_PROMPT)]
        system: String,

        /// The question to ask
        #[arg(long, default_value = RECRUITER_QUESTION)]
        prompt: String,

        /// Print every message exchanged, not just the final answer
        #[arg(long)]
        transcript: bool,
    },

    /// Run the recruiter and assistant examples one after the other
    Demo {
        /// Print every message exchanged, not just the final answers
        #[arg(long)]
        transcript: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Some(path) = scout::config::load_env(cli.env_file.as_deref()) {
        tracing::info!("Loaded environment from {:?}", path);
    }

    match cli.command.as_ref().unwrap_or(&Command::Demo { transcript: false }) {
        Command::Tools => tools::run(),
        Command::Chat { system, prompt } => chat::run(&cli, system, prompt).await,
        Command::Jobs { query, max_chars } => lookup::jobs(query, *max_chars).await,
        Command::Wiki { query } => lookup::wiki(query).await,
        Command::Agent {
            system,
            prompt,
            transcript,
        } => agent::run(&cli, system, prompt, *transcript).await,
        Command::Demo { transcript } => agent::demo(&cli, *transcript).await,
    }
}
