//! These models represent the objects passed around by the agent
//!
//! Two formats meet here: the openai chat-completions messages/tools sent to the LLM,
//! and the tool calls dispatched to the systems that do the lookups. We convert the
//! openai format into these internal structs as soon as a response arrives, so the
//! rest of the crate only deals with one shape.
pub mod content;
pub mod message;
pub mod role;
pub mod tool;
