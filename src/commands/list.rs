//! List the posts the CMS currently publishes

use anyhow::Result;

use crate::cms::ContentSource;
use crate::helpers::Helpers;
use crate::posts::PostListAggregator;
use crate::Blog;

/// Print every post, newest first
pub async fn run(blog: &Blog) -> Result<()> {
    let client = blog.connect(None).await?;
    for line in lines(blog, &client).await? {
        println!("{}", line);
    }
    Ok(())
}

async fn lines<S: ContentSource + ?Sized>(blog: &Blog, source: &S) -> Result<Vec<String>> {
    let helpers = Helpers::new(blog.config.clone());
    let aggregator = PostListAggregator::new(source, &blog.config.cms.document_type);
    let (pagination, _) = aggregator.all(blog.config.per_page).await?;

    let mut lines = vec![format!("Posts ({}):", pagination.results.len())];
    for post in &pagination.results {
        let date = post
            .first_publication_date
            .as_ref()
            .map(|d| helpers.date(d))
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("  {} - {} [{}]", date, post.title, post.uid));
    }

    Ok(lines)
}
