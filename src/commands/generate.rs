//! Generate static files

use anyhow::Result;

use crate::cms::ContentSource;
use crate::generator::{GenerateReport, Generator};
use crate::Blog;

/// Connect to the CMS and generate the whole site
pub async fn run(blog: &Blog, content_ref: Option<&str>) -> Result<()> {
    let client = blog.connect(content_ref).await?;
    tracing::info!("Using content ref {}", client.content_ref());

    run_with_source(blog, &client).await?;
    Ok(())
}

/// Generate from any content source
pub async fn run_with_source<S: ContentSource + ?Sized>(
    blog: &Blog,
    source: &S,
) -> Result<GenerateReport> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    let report = generator.generate(source).await?;

    if !report.skipped.is_empty() {
        tracing::warn!(
            "Skipped {} posts that could not be resolved: {}",
            report.skipped.len(),
            report.skipped.join(", ")
        );
    }

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts and {} listing pages in {:.2}s",
        report.posts,
        report.pages,
        duration.as_secs_f64()
    );

    Ok(report)
}
