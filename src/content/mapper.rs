//! Maps raw CMS documents to view models
//!
//! All validation of the CMS payload happens here. Required fields (`uid`,
//! `title`) fail fast; optional ones (banner, subtitle, author, content)
//! degrade to empty values.

use serde_json::Value;

use super::post::{Banner, ContentSection, NavLink, PostDetail, PostSummary};
use super::rich_text::RichTextFragment;
use crate::cms::{CmsError, Document};

/// Listing view of a document
pub fn summary_from_document(doc: &Document) -> Result<PostSummary, CmsError> {
    Ok(PostSummary {
        uid: require_uid(doc)?,
        first_publication_date: doc.first_publication_date,
        title: require_title(doc)?,
        subtitle: optional_text(&doc.data, "subtitle"),
        author: optional_text(&doc.data, "author"),
    })
}

/// Full view of a document, without navigation links
pub fn detail_from_document(doc: &Document) -> Result<PostDetail, CmsError> {
    Ok(PostDetail {
        uid: require_uid(doc)?,
        first_publication_date: doc.first_publication_date,
        last_publication_date: doc.last_publication_date,
        title: require_title(doc)?,
        subtitle: optional_text(&doc.data, "subtitle"),
        author: optional_text(&doc.data, "author"),
        banner: banner(&doc.data),
        content: content_sections(doc)?,
        previous_post: None,
        next_post: None,
    })
}

/// Navigation link to a document
pub fn nav_link_from_document(doc: &Document) -> Result<NavLink, CmsError> {
    Ok(NavLink {
        uid: require_uid(doc)?,
        title: require_title(doc)?,
    })
}

fn require_uid(doc: &Document) -> Result<String, CmsError> {
    match doc.uid.as_deref().map(str::trim) {
        Some(uid) if !uid.is_empty() => Ok(uid.to_string()),
        _ => Err(CmsError::malformed(&doc.id, "missing uid")),
    }
}

fn require_title(doc: &Document) -> Result<String, CmsError> {
    let title = text_field(&doc.data, "title")
        .ok_or_else(|| CmsError::malformed(&doc.id, "missing title"))?;
    if title.trim().is_empty() {
        return Err(CmsError::malformed(&doc.id, "empty title"));
    }
    Ok(title)
}

/// A text field stored either as a plain string or as title-style rich text
fn text_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(blocks) => {
            let text: Vec<&str> = blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect();
            Some(text.join(" "))
        }
        _ => None,
    }
}

fn optional_text(data: &Value, key: &str) -> String {
    text_field(data, key).unwrap_or_default()
}

/// Image fields arrive as `{}` when left empty in the CMS
fn banner(data: &Value) -> Option<Banner> {
    let image = data.get("banner")?;
    let url = image.get("url")?.as_str()?.trim();
    if url.is_empty() {
        return None;
    }
    Some(Banner {
        url: url.to_string(),
        alt: image
            .get("alt")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn content_sections(doc: &Document) -> Result<Vec<ContentSection>, CmsError> {
    let sections = match doc.data.get("content") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(sections)) => sections,
        Some(_) => return Err(CmsError::malformed(&doc.id, "content is not a list")),
    };

    sections
        .iter()
        .map(|section| {
            let heading = optional_text(section, "heading");
            let body = match section.get("body") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(body)) => body
                    .iter()
                    .map(|fragment| RichTextFragment::from_value(&doc.id, fragment))
                    .collect::<Result<Vec<_>, _>>()?,
                Some(_) => {
                    return Err(CmsError::malformed(
                        &doc.id,
                        format!("body of section {:?} is not a list", heading),
                    ))
                }
            };
            Ok(ContentSection { heading, body })
        })
        .collect()
}
