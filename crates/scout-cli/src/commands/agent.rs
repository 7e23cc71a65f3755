use anyhow::Result;
use cliclack::spinner;
use console::style;

use scout::models::message::Message;

use crate::{render, setup, Cli};
use crate::{ASSISTANT_PROMPT, ASSISTANT_QUESTION, RECRUITER_PROMPT, RECRUITER_QUESTION};

pub async fn run(cli: &Cli, system: &str, prompt: &str, transcript: bool) -> Result<()> {
    let agent = setup::agent(cli, system)?;

    let spin = spinner();
    spin.start("agent is working");
    let response = agent.invoke(&[Message::user().with_text(prompt)]).await;
    spin.stop("");
    let response = response?;

    if transcript {
        for message in &response.messages {
            render::message(message)?;
        }
    }

    let tools = response.tool_names();
    println!(
        "{} {}",
        style("tools used:").dim(),
        if tools.is_empty() {
            "none".to_string()
        } else {
            tools.join(", ")
        }
    );
    render::markdown(&response.final_answer().unwrap_or_default())?;
    println!();
    Ok(())
}

pub async fn demo(cli: &Cli, transcript: bool) -> Result<()> {
    let examples = [
        (RECRUITER_PROMPT, RECRUITER_QUESTION),
        (ASSISTANT_PROMPT, ASSISTANT_QUESTION),
    ];

    for (system, prompt) in examples {
        render::heading(prompt);
        run(cli, system, prompt, transcript).await?;
    }
    Ok(())
}
