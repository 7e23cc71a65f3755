use anyhow::Result;
use scout::agent::Agent;
use scout::config::{OpenAiProviderConfig, SerpApiConfig, WikipediaConfig};
use scout::models::message::Message;
use scout::models::role::Role;
use scout::providers::openai::OpenAiProvider;
use scout::systems::{GoogleJobsSystem, WikipediaSystem};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(message: Value) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": message, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 50, "completion_tokens": 20, "total_tokens": 70}
    })
}

fn tool_call(name: &str, query: &str) -> Value {
    completion(json!({
        "role": "assistant",
        "content": null,
        "tool_calls": [{
            "id": "call_1",
            "type": "function",
            "function": {
                "name": name,
                "arguments": json!({"query": query}).to_string()
            }
        }]
    }))
}

fn final_answer(text: &str) -> Value {
    completion(json!({"role": "assistant", "content": text}))
}

/// The model answers once a tool result is in the conversation, otherwise it asks for `tool`
async fn mount_model(server: &MockServer, tool: &str, query: &str, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("tool_call_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(final_answer(answer)))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_call(tool, query)))
        .with_priority(10)
        .mount(server)
        .await;
}

fn build_agent(server: &MockServer, system_prompt: &str) -> Result<Agent> {
    let provider = OpenAiProvider::new(OpenAiProviderConfig {
        host: server.uri(),
        api_key: "sk-test".to_string(),
        model: "gpt-4o-mini".to_string(),
        temperature: None,
        max_tokens: None,
    })?;

    let jobs = GoogleJobsSystem::new(SerpApiConfig {
        host: server.uri(),
        api_key: "serp-test".to_string(),
        max_results: 1,
    })?;
    let wikipedia = WikipediaSystem::new(WikipediaConfig {
        host: server.uri(),
        top_k_results: 1,
        doc_content_chars_max: 280,
    })?;

    let mut agent = Agent::new(Box::new(provider)).with_system_prompt(system_prompt);
    agent.add_system(Box::new(jobs));
    agent.add_system(Box::new(wikipedia));
    Ok(agent)
}

#[tokio::test]
async fn test_recruiter_uses_job_search() -> Result<()> {
    let server = MockServer::start().await;
    mount_model(
        &server,
        "google_jobs__search",
        "Machine Learning Alberta",
        "The most recent posting is a Machine Learning Engineer role at Amii, posted 2 days ago.",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_jobs"))
        .and(query_param("q", "Machine Learning Alberta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs_results": [{
                "title": "Machine Learning Engineer",
                "company_name": "Amii",
                "location": "Edmonton, AB",
                "via": "LinkedIn",
                "description": "Build ML systems.",
                "detected_extensions": {"posted_at": "2 days ago"}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agent = build_agent(
        &server,
        "You are a recruiter, who is trying to help me in finding suitable jobs",
    )?;
    let response = agent
        .invoke(&[Message::user().with_text(
            "Find me the most recent Machine Learning job in Alberta, specify when the job was posted",
        )])
        .await?;

    // human, assistant tool request, tool response, assistant answer
    assert_eq!(response.messages.len(), 4);
    assert_eq!(response.tool_names(), vec!["google_jobs__search".to_string()]);
    let tool_output = response.messages[2].content[0]
        .as_tool_response_text()
        .expect("tool output");
    assert!(tool_output.contains("Job Title: Machine Learning Engineer"));
    assert!(tool_output.contains("Posted: 2 days ago"));
    assert_eq!(response.messages[3].role, Role::Assistant);
    assert!(response
        .final_answer()
        .unwrap_or_default()
        .contains("posted 2 days ago"));
    Ok(())
}

#[tokio::test]
async fn test_assistant_uses_wikipedia() -> Result<()> {
    let server = MockServer::start().await;
    mount_model(
        &server,
        "wikipedia__lookup",
        "Amii research institute",
        "Amii is the Alberta Machine Intelligence Institute.",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"search": [{"title": "Alberta Machine Intelligence Institute"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "extracts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [{
                "title": "Alberta Machine Intelligence Institute",
                "extract": "The Alberta Machine Intelligence Institute (Amii) is a research institute."
            }]}
        })))
        .mount(&server)
        .await;

    let agent = build_agent(&server, "You are my assistant")?;
    let response = agent
        .invoke(&[Message::user().with_text("What is Amii (research institute)?")])
        .await?;

    assert_eq!(response.tool_names(), vec!["wikipedia__lookup".to_string()]);
    let tool_output = response.messages[2].content[0]
        .as_tool_response_text()
        .expect("tool output");
    assert!(tool_output.starts_with("Page: Alberta Machine Intelligence Institute\nSummary: "));
    assert_eq!(
        response.final_answer().as_deref(),
        Some("Amii is the Alberta Machine Intelligence Institute.")
    );
    Ok(())
}

#[tokio::test]
async fn test_tool_failure_is_reported_to_model() -> Result<()> {
    let server = MockServer::start().await;
    mount_model(
        &server,
        "google_jobs__search",
        "ML jobs",
        "I could not reach the job search service.",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key."})))
        .mount(&server)
        .await;

    let agent = build_agent(&server, "")?;
    let response = agent
        .invoke(&[Message::user().with_text("ML jobs please")])
        .await?;

    let tool_response = &response.messages[2].tool_responses()[0];
    assert!(tool_response.tool_result.is_err());
    assert_eq!(
        response.final_answer().as_deref(),
        Some("I could not reach the job search service.")
    );
    Ok(())
}
