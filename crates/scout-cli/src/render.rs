use anyhow::{anyhow, Result};
use bat::{PrettyPrinter, WrappingMode};
use console::style;

use scout::models::message::{Message, MessageContent};
use scout::models::role::Role;

pub fn markdown(content: &str) -> Result<()> {
    PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .wrapping_mode(WrappingMode::Character)
        .print()
        .map_err(|e| anyhow!("Failed to render output: {}", e))?;
    Ok(())
}

fn framed(content: &str, title: String, language: &str) -> Result<()> {
    PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()).name(title))
        .language(language)
        .grid(true)
        .header(true)
        .wrapping_mode(WrappingMode::Character)
        .print()
        .map_err(|e| anyhow!("Failed to render output: {}", e))?;
    Ok(())
}

pub fn heading(text: &str) {
    println!("{}", style(text).bold().cyan());
}

/// Print one message of an agent transcript
pub fn message(message: &Message) -> Result<()> {
    let label = match message.role {
        Role::User => style("human").green(),
        Role::Assistant => style("ai").magenta(),
    };
    println!("{} {}", label.bold(), style(&message.id).dim());

    for content in &message.content {
        match content {
            MessageContent::Text(text) => markdown(&text.text)?,
            MessageContent::ToolRequest(request) => match &request.tool_call {
                Ok(call) => framed(
                    &serde_json::to_string_pretty(&call.arguments)?,
                    format!("Tool Request: {} ({})", call.name, request.id),
                    "JSON",
                )?,
                Err(e) => println!("{} {}", style("Invalid tool request:").red(), e),
            },
            MessageContent::ToolResponse(response) => match &response.tool_result {
                Ok(_) => framed(
                    &content.as_tool_response_text().unwrap_or_default(),
                    format!("Tool Response: {}", response.id),
                    "txt",
                )?,
                Err(e) => println!("{} {}", style("Tool failed:").red(), e),
            },
        }
    }
    println!();
    Ok(())
}
