//! Post list aggregation over the CMS continuation cursor

use serde::Serialize;

use crate::cms::{CmsError, ContentSource, Ordering, Predicate, Query, SearchResponse};
use crate::content::{summary_from_document, PostSummary};

/// Accumulated listing plus the cursor to resume from
///
/// Owned by the caller and threaded through [`PostListAggregator::more`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostsPagination {
    /// Continuation cursor, `None` once every page has been read
    pub next_page: Option<String>,
    /// Summaries in arrival order
    pub results: Vec<PostSummary>,
}

impl PostsPagination {
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }
}

/// Reads the post listing page by page
pub struct PostListAggregator<'a, S: ContentSource + ?Sized> {
    source: &'a S,
    document_type: String,
}

impl<'a, S: ContentSource + ?Sized> PostListAggregator<'a, S> {
    pub fn new(source: &'a S, document_type: &str) -> Self {
        Self {
            source,
            document_type: document_type.to_string(),
        }
    }

    /// The listing query, newest first, restricted to summary fields
    fn listing_query(&self, page_size: usize) -> Query {
        let field = |name: &str| format!("{}.{}", self.document_type, name);
        Query::new(Predicate::at("document.type", &self.document_type))
            .fetch([field("title"), field("subtitle"), field("author")])
            .page_size(page_size.max(1))
            .order_by(Ordering::desc("document.first_publication_date"))
    }

    /// First page of the listing
    pub async fn initial(&self, page_size: usize) -> Result<PostsPagination, CmsError> {
        let response = self.source.search(&self.listing_query(page_size)).await?;
        let (results, next_page) = map_page(response)?;
        tracing::debug!("Fetched first page: {} posts", results.len());
        Ok(PostsPagination { next_page, results })
    }

    /// Append the page behind the cursor
    ///
    /// An exhausted pagination is returned untouched without a request.
    pub async fn more(&self, pagination: PostsPagination) -> Result<PostsPagination, CmsError> {
        let PostsPagination {
            next_page,
            mut results,
        } = pagination;

        let Some(cursor) = next_page else {
            return Ok(PostsPagination {
                next_page: None,
                results,
            });
        };

        let response = self.source.fetch_page(&cursor).await?;
        let (page, next_page) = map_page(response)?;
        tracing::debug!("Fetched {} more posts", page.len());
        results.extend(page);

        Ok(PostsPagination { next_page, results })
    }

    /// Walk every page, returning the final accumulation and each page's
    /// own slice of summaries in order
    pub async fn all(
        &self,
        page_size: usize,
    ) -> Result<(PostsPagination, Vec<Vec<PostSummary>>), CmsError> {
        let mut pagination = self.initial(page_size).await?;
        let mut pages = vec![pagination.results.clone()];

        while pagination.has_more() {
            let before = pagination.results.len();
            pagination = self.more(pagination).await?;
            pages.push(pagination.results[before..].to_vec());
        }

        tracing::info!(
            "Fetched {} posts in {} pages",
            pagination.results.len(),
            pages.len()
        );
        Ok((pagination, pages))
    }
}

fn map_page(response: SearchResponse) -> Result<(Vec<PostSummary>, Option<String>), CmsError> {
    let results = response
        .results
        .iter()
        .map(summary_from_document)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((results, response.next_page))
}
