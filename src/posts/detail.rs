//! Single post resolution with previous/next navigation

use crate::cms::{CmsError, ContentSource, Document, Ordering, Predicate, Query};
use crate::content::{detail_from_document, nav_link_from_document, NavLink, PostDetail};

/// Field the sibling navigation is ordered by
const SIBLING_ORDER_FIELD: &str = "document.last_publication_date";

/// Resolves posts by slug
pub struct PostDetailResolver<'a, S: ContentSource + ?Sized> {
    source: &'a S,
    document_type: String,
}

impl<'a, S: ContentSource + ?Sized> PostDetailResolver<'a, S> {
    pub fn new(source: &'a S, document_type: &str) -> Self {
        Self {
            source,
            document_type: document_type.to_string(),
        }
    }

    /// Fetch a post and its neighbours
    pub async fn by_slug(&self, slug: &str) -> Result<PostDetail, CmsError> {
        let doc = self.source.get_by_uid(&self.document_type, slug).await?;
        let mut post = detail_from_document(&doc)?;

        post.previous_post = self.sibling(&doc, &post.uid, Ordering::desc).await?;
        post.next_post = self.sibling(&doc, &post.uid, Ordering::asc).await?;

        tracing::debug!(
            "Resolved {} ({} sections, {} min)",
            post.uid,
            post.content.len(),
            post.reading_time()
        );
        Ok(post)
    }

    /// The post right after `doc` in the given ordering, if any
    ///
    /// A result pointing back at the current post is dropped.
    async fn sibling(
        &self,
        doc: &Document,
        uid: &str,
        ordering: fn(&str) -> Ordering,
    ) -> Result<Option<NavLink>, CmsError> {
        let query = Query::new(Predicate::at("document.type", &self.document_type))
            .fetch([format!("{}.title", self.document_type)])
            .page_size(1)
            .order_by(ordering(SIBLING_ORDER_FIELD))
            .after(&doc.id);

        let response = self.source.search(&query).await?;
        let Some(found) = response.results.first() else {
            return Ok(None);
        };

        if found.uid.as_deref() == Some(uid) {
            tracing::debug!("Dropping self-referencing sibling of {}", uid);
            return Ok(None);
        }

        nav_link_from_document(found).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::testing::{full_post, network_error, post, MemorySource};
    use crate::cms::Direction;

    #[tokio::test]
    async fn test_by_slug_with_siblings() {
        let source = MemorySource::new();
        source
            .push_search(
                vec![full_post("foo", "Foo", &[("One", &["a b"]), ("Two", &["c"])])],
                None,
            )
            .push_search(vec![post("older", "Older")], None)
            .push_search(vec![post("newer", "Newer")], None);

        let resolver = PostDetailResolver::new(&source, "posts");
        let detail = resolver.by_slug("foo").await.unwrap();

        assert_eq!(detail.uid, "foo");
        let headings: Vec<&str> = detail.content.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["One", "Two"]);
        assert_eq!(detail.reading_time(), 1);
        assert_eq!(
            detail.previous_post,
            Some(NavLink {
                uid: "older".to_string(),
                title: "Older".to_string()
            })
        );
        assert_eq!(detail.next_post.map(|n| n.uid), Some("newer".to_string()));

        let queries = source.queries();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0].q(), r#"[[at(my.posts.uid, "foo")]]"#);
        for (query, direction) in queries[1..].iter().zip([Direction::Desc, Direction::Asc]) {
            assert_eq!(query.page_size, Some(1));
            assert_eq!(query.after.as_deref(), Some("id-foo"));
            assert_eq!(query.orderings[0].field, SIBLING_ORDER_FIELD);
            assert_eq!(query.orderings[0].direction, direction);
        }
    }

    #[tokio::test]
    async fn test_self_referencing_sibling_is_dropped() {
        let source = MemorySource::new();
        source
            .push_search(vec![full_post("foo", "Foo", &[])], None)
            .push_search(vec![post("foo", "Foo")], None)
            .push_search(Vec::new(), None);

        let resolver = PostDetailResolver::new(&source, "posts");
        let detail = resolver.by_slug("foo").await.unwrap();
        assert_eq!(detail.previous_post, None);
        assert_eq!(detail.next_post, None);
    }

    #[tokio::test]
    async fn test_self_referencing_next_sibling_is_dropped() {
        let source = MemorySource::new();
        source
            .push_search(vec![full_post("foo", "Foo", &[])], None)
            .push_search(vec![post("bar", "Bar")], None)
            .push_search(vec![post("foo", "Foo")], None);

        let resolver = PostDetailResolver::new(&source, "posts");
        let detail = resolver.by_slug("foo").await.unwrap();
        assert_eq!(
            detail.previous_post,
            Some(NavLink {
                uid: "bar".to_string(),
                title: "Bar".to_string(),
            })
        );
        assert_eq!(detail.next_post, None);
    }

    #[tokio::test]
    async fn test_missing_slug_is_not_found() {
        let source = MemorySource::new();
        source.push_search(Vec::new(), None);

        let resolver = PostDetailResolver::new(&source, "posts");
        let err = resolver.by_slug("nope").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(source.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_sibling_failure_propagates() {
        let source = MemorySource::new();
        source
            .push_search(vec![full_post("foo", "Foo", &[])], None)
            .push_search_error(network_error());

        let resolver = PostDetailResolver::new(&source, "posts");
        let err = resolver.by_slug("foo").await.unwrap_err();
        assert!(matches!(err, CmsError::Network(_)));
    }
}
