use anyhow::Result;
use cliclack::spinner;

use scout::providers::base::Provider;

use crate::{render, setup, Cli};

pub async fn run(cli: &Cli, system: &str, prompt: &str) -> Result<()> {
    let provider = setup::provider(cli)?;

    let spin = spinner();
    spin.start(format!("asking {}", provider.model()));
    let reply = provider.chat(system, prompt).await;
    spin.stop("");

    render::markdown(&reply?)
}
