//! Built-in page template using the Tera template engine
//!
//! The page layout is embedded in the binary. Card and overlay markup arrive
//! pre-rendered; everything else is escaped in the template.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded page layout
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Cards are already escaped where needed; the template escapes explicitly
        tera.autoescape_on(vec![]);

        tera.add_raw_template("page.html", include_str!("codenour/page.html"))?;
        tera.register_filter("nav_label", nav_label_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    pub fn render_page(&self, data: &PageData) -> Result<String> {
        let mut context = Context::from_serialize(data)?;
        context.insert("version", env!("CARGO_PKG_VERSION"));
        self.render("page.html", &context)
    }
}

/// Tera filter: `games.html` -> `GAMES`
fn nav_label_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("nav_label", "value", String, value);
    let stem = s.split(['?', '#']).next().unwrap_or_default();
    let stem = stem.trim_end_matches(".html");
    let label = if stem == "index" { "home" } else { stem };
    Ok(tera::Value::String(label.to_uppercase()))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub sections: Vec<SectionData>,
    pub overlays: Vec<String>,
    pub notices: Vec<String>,
    pub nav_links: Vec<String>,
    /// CSS transition delay of the footer
    pub footer_delay: String,
    pub generated: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub id: String,
    pub title: String,
    /// CSS transition delay of the section heading
    pub title_delay: String,
    /// Pre-rendered card markup
    pub cards: String,
}
