//! Generator module - renders the CMS content into static HTML files

use anyhow::{anyhow, Context as _, Result};
use std::fs;
use std::path::Path;

use tera::Context;

use crate::cms::ContentSource;
use crate::comments::CommentsWidget;
use crate::content::{rich_text, NavLink, PostDetail, PostSummary};
use crate::helpers::{date_xml, post_path, posts_chunk_path, Helpers, POSTS_DIR, POST_DIR};
use crate::i18n::I18n;
use crate::posts::{PostDetailResolver, PostListAggregator};
use crate::templates::{
    LabelsData, NavData, PostCardData, PostPageData, PostsChunk, SectionData, SiteData,
    TemplateRenderer,
};
use crate::Blog;

/// What a generation run produced
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GenerateReport {
    /// Post pages written
    pub posts: usize,
    /// Listing chunks written
    pub pages: usize,
    /// Slugs listed by the CMS that could not be resolved
    pub skipped: Vec<String>,
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    helpers: Helpers,
    i18n: I18n,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let helpers = Helpers::new(blog.config.clone());

        let mut i18n = I18n::new(&blog.config.language);
        i18n.load_languages(blog.base_dir.join(&blog.config.i18n_dir))?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
            helpers,
            i18n,
        })
    }

    /// Generate the entire site from a content source
    ///
    /// Everything is fetched before anything is written, so a failing CMS
    /// leaves the previous output untouched. Listing chunks and post pages
    /// from the previous run are removed, unpublished posts disappear.
    pub async fn generate<S: ContentSource + ?Sized>(&self, source: &S) -> Result<GenerateReport> {
        let document_type = &self.blog.config.cms.document_type;
        let aggregator = PostListAggregator::new(source, document_type);
        let (listing, pages) = aggregator.all(self.blog.config.per_page).await?;

        let mut report = GenerateReport::default();

        let resolver = PostDetailResolver::new(source, document_type);
        let mut posts = Vec::with_capacity(listing.results.len());
        for summary in &listing.results {
            match resolver.by_slug(&summary.uid).await {
                Ok(post) => posts.push(post),
                Err(e) if e.is_not_found() => {
                    tracing::warn!("Skipping {}: {}", summary.uid, e);
                    report.skipped.push(summary.uid.clone());
                }
                Err(e) => return Err(e.into()),
            }
        }

        fs::create_dir_all(&self.blog.public_dir)?;
        self.remove_generated()?;

        // Listing: index page plus the chunks the load-more button walks
        self.generate_index_page(&pages)?;
        for (i, page) in pages.iter().enumerate() {
            self.generate_posts_chunk(i + 1, page, pages.len())?;
            report.pages += 1;
        }

        for post in &posts {
            self.generate_post_page(post)?;
            report.posts += 1;
        }

        self.generate_not_found_page()?;

        Ok(report)
    }

    /// Delete the directories a previous run filled with per-post output
    fn remove_generated(&self) -> Result<()> {
        for dir in [POSTS_DIR, POST_DIR] {
            let path = self.blog.public_dir.join(dir);
            if path.exists() {
                fs::remove_dir_all(&path)
                    .with_context(|| format!("Failed to delete {:?}", path))?;
                tracing::debug!("Deleted: {:?}", path);
            }
        }
        Ok(())
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let config = &self.blog.config;
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: config.title.clone(),
                description: config.description.clone(),
                language: config.language.clone(),
                root: config.root.clone(),
                version: env!("CARGO_PKG_VERSION"),
            },
        );
        context.insert("labels", &LabelsData::from_i18n(&self.i18n));
        context
    }

    /// Site URL of the n-th listing chunk when it exists
    fn chunk_url(&self, page: usize, total: usize) -> Option<String> {
        (page <= total).then(|| self.helpers.url_for(&posts_chunk_path(page)))
    }

    /// Generate the index page with the first listing page
    fn generate_index_page(&self, pages: &[Vec<PostSummary>]) -> Result<()> {
        let first = pages.first().map(Vec::as_slice).unwrap_or_default();

        let mut context = self.create_base_context();
        context.insert("posts", &self.cards(first));
        context.insert("next_page", &self.chunk_url(2, pages.len()));
        context.insert("canonical", &self.helpers.full_url_for("/"));

        let html = self
            .renderer
            .render("index.html", &context)
            .map_err(|e| anyhow!("Failed to render index: {}", e))?;
        self.write("index.html", &html)
    }

    /// Generate `posts/<n>.json`, the static stand-in for one CMS page
    fn generate_posts_chunk(&self, page: usize, results: &[PostSummary], total: usize) -> Result<()> {
        let mut context = Context::new();
        context.insert("posts", &self.cards(results));
        let html = self
            .renderer
            .render("post_cards.html", &context)
            .map_err(|e| anyhow!("Failed to render posts page {}: {}", page, e))?;

        let chunk = PostsChunk {
            next_page: self.chunk_url(page + 1, total),
            results,
            html,
        };
        self.write(&posts_chunk_path(page), &serde_json::to_string(&chunk)?)
    }

    /// Generate a single post page
    fn generate_post_page(&self, post: &PostDetail) -> Result<()> {
        let mut context = self.create_base_context();
        context.insert("post", &self.post_page_data(post));
        context.insert("canonical", &self.helpers.full_url_for(&post_path(&post.uid)));
        context.insert(
            "comments",
            &CommentsWidget::new(&self.blog.config.comments).render(),
        );

        let html = self
            .renderer
            .render("post.html", &context)
            .map_err(|e| anyhow!("Failed to render post {}: {}", post.uid, e))?;
        self.write(&format!("{}index.html", post_path(&post.uid)), &html)
    }

    fn generate_not_found_page(&self) -> Result<()> {
        let context = self.create_base_context();
        let html = self
            .renderer
            .render("not_found.html", &context)
            .map_err(|e| anyhow!("Failed to render 404 page: {}", e))?;
        self.write("404.html", &html)
    }

    fn cards(&self, posts: &[PostSummary]) -> Vec<PostCardData> {
        posts
            .iter()
            .map(|p| PostCardData {
                uid: p.uid.clone(),
                url: self.helpers.post_url(&p.uid),
                title: p.title.clone(),
                subtitle: p.subtitle.clone(),
                author: p.author.clone(),
                date: p.first_publication_date.as_ref().map(|d| self.helpers.date(d)),
                date_iso: p.first_publication_date.as_ref().map(date_xml),
            })
            .collect()
    }

    fn post_page_data(&self, post: &PostDetail) -> PostPageData {
        let edited = match (post.first_publication_date, post.last_publication_date) {
            (first, Some(last)) if first != Some(last) => {
                Some(self.i18n.get_with("post.edited", &self.helpers.date(&last)))
            }
            _ => None,
        };

        let description = if post.subtitle.is_empty() {
            post.content
                .first()
                .map(|s| rich_text::as_text(&s.body))
                .unwrap_or_default()
        } else {
            post.subtitle.clone()
        };

        let banner_alt = post
            .banner
            .as_ref()
            .and_then(|b| b.alt.clone())
            .filter(|alt| !alt.is_empty())
            .unwrap_or_else(|| self.i18n.get("post.banner_alt"));

        PostPageData {
            uid: post.uid.clone(),
            title: post.title.clone(),
            description,
            author: post.author.clone(),
            date: post.first_publication_date.as_ref().map(|d| self.helpers.date(d)),
            date_iso: post.first_publication_date.as_ref().map(date_xml),
            edited,
            reading_time: self.i18n.get_count("post.reading_time", post.reading_time()),
            banner_url: post.banner.as_ref().map(|b| b.url.clone()),
            banner_alt,
            sections: post
                .content
                .iter()
                .map(|s| SectionData {
                    heading: s.heading.clone(),
                    html: rich_text::to_html(&s.body),
                })
                .collect(),
            previous: post.previous_post.as_ref().map(|l| self.nav(l)),
            next: post.next_post.as_ref().map(|l| self.nav(l)),
        }
    }

    fn nav(&self, link: &NavLink) -> NavData {
        NavData {
            title: link.title.clone(),
            url: self.helpers.post_url(&link.uid),
        }
    }

    /// Write a file below the public directory
    fn write(&self, relative: &str, content: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        ensure_parent(&output_path)?;
        fs::write(&output_path, content)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
