use serde::Serialize;
use tera::{Context, Error as TeraError, Tera};

/// Rendering of job search results, one block per posting
pub const JOBS_TEMPLATE: &str = include_str!("templates/jobs.md");

pub fn render_template<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    // Tool output is plain text for the model, escaping would mangle quotes and ampersands
    tera.autoescape_on(vec![]);
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    tera.render("inline_template", &context)
}
