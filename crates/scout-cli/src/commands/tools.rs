use anyhow::Result;
use console::style;

use scout::agent::prefixed_tools;

use crate::setup;

pub fn run() -> Result<()> {
    let tools = prefixed_tools(&setup::systems(false)?);

    println!("{} {}", style("tools:").bold(), tools.len());
    for tool in &tools {
        println!(
            "{}  {}",
            style(&tool.name).green(),
            style(&tool.description).dim()
        );
    }
    Ok(())
}
