//! Scripted in-memory content source for tests

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::{parse_cms_date, CmsError, ContentSource, Document, Query, SearchResponse};

/// Replays canned search responses in order and serves cursor pages by URL
///
/// Every call is recorded so tests can assert on the exact traffic.
#[derive(Default)]
pub struct MemorySource {
    searches: Mutex<VecDeque<Result<SearchResponse, CmsError>>>,
    pages: Mutex<HashMap<String, Result<SearchResponse, CmsError>>>,
    queries: Mutex<Vec<Query>>,
    fetched: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next `search` call
    pub fn push_search(&self, results: Vec<Document>, next_page: Option<&str>) -> &Self {
        self.searches
            .lock()
            .unwrap()
            .push_back(Ok(response(results, next_page)));
        self
    }

    pub fn push_search_error(&self, error: CmsError) -> &Self {
        self.searches.lock().unwrap().push_back(Err(error));
        self
    }

    /// Serve `results` when `cursor` is fetched (once)
    pub fn add_page(&self, cursor: &str, results: Vec<Document>, next_page: Option<&str>) -> &Self {
        self.pages
            .lock()
            .unwrap()
            .insert(cursor.to_string(), Ok(response(results, next_page)));
        self
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn search(&self, query: &Query) -> Result<SearchResponse, CmsError> {
        self.queries.lock().unwrap().push(query.clone());
        self.searches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchResponse::default()))
    }

    async fn fetch_page(&self, cursor: &str) -> Result<SearchResponse, CmsError> {
        self.fetched.lock().unwrap().push(cursor.to_string());
        self.pages
            .lock()
            .unwrap()
            .remove(cursor)
            .unwrap_or_else(|| Err(network_error()))
    }
}

fn response(results: Vec<Document>, next_page: Option<&str>) -> SearchResponse {
    SearchResponse {
        page: 1,
        results_per_page: results.len() as u32,
        next_page: next_page.map(str::to_string),
        results,
        ..SearchResponse::default()
    }
}

/// A genuine `reqwest` error, produced without touching the network
pub fn network_error() -> CmsError {
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err();
    CmsError::Network(err)
}

/// A summary-shaped post document
pub fn post(uid: &str, title: &str) -> Document {
    Document {
        id: format!("id-{}", uid),
        uid: Some(uid.to_string()),
        doc_type: "posts".to_string(),
        first_publication_date: parse_cms_date("2021-03-25T19:25:28+0000"),
        last_publication_date: None,
        data: serde_json::json!({
            "title": title,
            "subtitle": format!("About {}", title),
            "author": "Ana",
        }),
    }
}

/// A full post document with the given sections of paragraph texts
pub fn full_post(uid: &str, title: &str, sections: &[(&str, &[&str])]) -> Document {
    let content: Vec<serde_json::Value> = sections
        .iter()
        .map(|(heading, paragraphs)| {
            let body: Vec<serde_json::Value> = paragraphs
                .iter()
                .map(|text| serde_json::json!({"type": "paragraph", "text": text, "spans": []}))
                .collect();
            serde_json::json!({"heading": heading, "body": body})
        })
        .collect();

    let mut doc = post(uid, title);
    doc.last_publication_date = parse_cms_date("2021-03-26T10:00:00+0000");
    doc.data["banner"] = serde_json::json!({"url": format!("https://images.example/{}.png", uid), "alt": null});
    doc.data["content"] = serde_json::Value::Array(content);
    doc
}
