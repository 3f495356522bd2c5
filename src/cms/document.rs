//! Raw response shapes of the CMS REST API
//!
//! These mirror the JSON the CMS sends and nothing more. Field access on
//! `data` is left to the mapper, which decides what is required.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// API description returned by the entry point
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDescription {
    #[serde(default)]
    pub refs: Vec<ContentRef>,
}

impl ApiDescription {
    /// The published content release
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// A content release (master, preview, scheduled release)
#[derive(Debug, Clone, Deserialize)]
pub struct ContentRef {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

/// One page of search results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    /// Continuation cursor; `None` once the result set is exhausted
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    #[serde(default)]
    pub results: Vec<Document>,
}

/// A CMS document as delivered by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default, deserialize_with = "deserialize_cms_date")]
    pub first_publication_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_cms_date")]
    pub last_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Parse a CMS timestamp
///
/// The API writes offsets without a colon (`2021-03-25T19:25:28+0000`),
/// which RFC 3339 parsing rejects, so both spellings are accepted.
pub fn parse_cms_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn deserialize_cms_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_cms_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid CMS date {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_cms_date() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap();
        assert_eq!(parse_cms_date("2021-03-25T19:25:28+0000"), Some(expected));
        assert_eq!(parse_cms_date("2021-03-25T19:25:28+00:00"), Some(expected));
        assert_eq!(parse_cms_date("yesterday"), None);
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "page": 1,
            "results_per_page": 1,
            "total_results_size": 2,
            "total_pages": 2,
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2",
            "prev_page": null,
            "results": [{
                "id": "YF0Q",
                "uid": "hello-world",
                "type": "posts",
                "tags": [],
                "lang": "pt-br",
                "first_publication_date": "2021-03-25T19:25:28+0000",
                "last_publication_date": null,
                "data": {"title": "Hello"}
            }]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_pages, 2);
        assert!(response.next_page.is_some());
        let doc = &response.results[0];
        assert_eq!(doc.uid.as_deref(), Some("hello-world"));
        assert!(doc.first_publication_date.is_some());
        assert!(doc.last_publication_date.is_none());
        assert_eq!(doc.data["title"], "Hello");
    }

    #[test]
    fn test_master_ref() {
        let json = r#"{"refs": [
            {"id": "preview", "ref": "abc", "label": "Preview"},
            {"id": "master", "ref": "YF0Q-master", "label": "Master", "isMasterRef": true}
        ]}"#;
        let api: ApiDescription = serde_json::from_str(json).unwrap();
        assert_eq!(api.master_ref(), Some("YF0Q-master"));
    }
}
