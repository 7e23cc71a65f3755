use anyhow::Result;
use cliclack::spinner;

use scout::systems::System;

use crate::{render, setup};

async fn run_tool(system: &dyn System, query: &str) -> Result<String> {
    let spin = spinner();
    spin.start(format!("querying {}", system.name()));
    let output = system.run(query).await;
    spin.stop("");
    Ok(output?)
}

pub async fn jobs(query: &str, max_chars: usize) -> Result<()> {
    let system = setup::google_jobs(true)?;
    let output = run_tool(&system, query).await?;
    let shown: String = output.chars().take(max_chars).collect();
    render::markdown(&shown)
}

pub async fn wiki(query: &str) -> Result<()> {
    let system = setup::wikipedia()?;
    let output = run_tool(&system, query).await?;
    render::markdown(&output)
}
