//! Built-in blog templates using the Tera template engine
//!
//! Templates are embedded in the binary; pages receive the plain data
//! structures defined below.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::{html_escape, truncate};
use crate::i18n::I18n;

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Same escaping as the rest of the crate, which leaves `/` in URLs alone
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("macros.html", include_str!("blog/macros.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("post_cards.html", include_str!("blog/post_cards.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };
    Ok(tera::Value::String(truncate(&s, length, None)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub root: String,
    pub version: &'static str,
}

/// A post in the listing
#[derive(Debug, Clone, Serialize)]
pub struct PostCardData {
    pub uid: String,
    pub url: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: Option<String>,
    pub date_iso: Option<String>,
}

/// A full post page
#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub uid: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: Option<String>,
    pub date_iso: Option<String>,
    /// "edited on" note, only when the post changed after publication
    pub edited: Option<String>,
    pub reading_time: String,
    pub banner_url: Option<String>,
    pub banner_alt: String,
    pub sections: Vec<SectionData>,
    pub previous: Option<NavData>,
    pub next: Option<NavData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    /// Pre-rendered, escaped body HTML
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavData {
    pub title: String,
    pub url: String,
}

/// One static page of the listing, fetched by the load-more script
#[derive(Debug, Clone, Serialize)]
pub struct PostsChunk<'a> {
    pub next_page: Option<String>,
    pub results: &'a [crate::content::PostSummary],
    /// The results rendered as post cards
    pub html: String,
}

/// UI strings used by the templates
#[derive(Debug, Clone, Serialize)]
pub struct LabelsData {
    pub load_more: String,
    pub loading: String,
    pub empty: String,
    pub previous: String,
    pub next: String,
    pub not_found: String,
}

impl LabelsData {
    pub fn from_i18n(i18n: &I18n) -> Self {
        Self {
            load_more: i18n.get("list.load_more"),
            loading: i18n.get("list.loading"),
            empty: i18n.get("list.empty"),
            previous: i18n.get("post.previous"),
            next: i18n.get("post.next"),
            not_found: i18n.get("post.not_found"),
        }
    }
}
