//! Post view models

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::rich_text::RichTextFragment;

/// Reading speed used for the reading-time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    /// Slug
    pub uid: String,

    /// First publication date
    pub first_publication_date: Option<DateTime<Utc>>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// A full post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    /// Slug
    pub uid: String,

    /// First publication date
    pub first_publication_date: Option<DateTime<Utc>>,

    /// Last publication date
    pub last_publication_date: Option<DateTime<Utc>>,

    pub title: String,
    pub subtitle: String,
    pub author: String,

    /// Banner image, absent when the CMS has none
    pub banner: Option<Banner>,

    /// Content sections in source order
    pub content: Vec<ContentSection>,

    /// Older neighbour
    pub previous_post: Option<NavLink>,

    /// Newer neighbour
    pub next_post: Option<NavLink>,
}

impl PostDetail {
    /// Total words across every body fragment of every section
    pub fn word_count(&self) -> usize {
        self.content
            .iter()
            .flat_map(|section| section.body.iter())
            .map(RichTextFragment::word_count)
            .sum()
    }

    /// Estimated reading time in whole minutes, never below one
    pub fn reading_time(&self) -> usize {
        self.word_count().div_ceil(WORDS_PER_MINUTE).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub url: String,
    pub alt: Option<String>,
}

/// A heading followed by rich-text body fragments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentSection {
    pub heading: String,
    pub body: Vec<RichTextFragment>,
}

/// Link to a neighbouring post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub uid: String,
    pub title: String,
}
