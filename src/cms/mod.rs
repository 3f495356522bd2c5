//! Headless CMS adapter
//!
//! Everything that knows about the CMS wire format lives here. The rest of
//! the crate talks to a [`ContentSource`], which [`CmsClient`] implements
//! over HTTP.

mod client;
mod document;
mod error;
mod query;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;

pub use client::CmsClient;
pub use document::{parse_cms_date, ApiDescription, ContentRef, Document, SearchResponse};
pub use error::CmsError;
pub use query::{Direction, Ordering, Predicate, Query};

/// Read access to CMS documents
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run a predicate search and return the first page of results
    async fn search(&self, query: &Query) -> Result<SearchResponse, CmsError>;

    /// Follow a continuation cursor returned as `next_page`
    async fn fetch_page(&self, cursor: &str) -> Result<SearchResponse, CmsError>;

    /// Look up one document by its unique identifier
    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Document, CmsError> {
        let query = Query::new(Predicate::at(
            &format!("my.{}.uid", document_type),
            uid,
        ))
        .page_size(1);

        self.search(&query)
            .await?
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::not_found(document_type, uid))
    }
}
