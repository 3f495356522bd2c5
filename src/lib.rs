//! spacetraveling: a static blog generated from a headless CMS
//!
//! Posts are read from a Prismic-style content API, mapped into view
//! models and rendered with embedded Tera templates into a public
//! directory that any static file server can host.

pub mod cms;
pub mod commands;
pub mod comments;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod posts;
pub mod server;
pub mod templates;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cms::CmsClient;

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            let mut config = config::SiteConfig::default();
            config.apply_env();
            config
        };

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// Connect to the configured CMS, optionally pinned to a content ref
    pub async fn connect(&self, content_ref: Option<&str>) -> Result<CmsClient> {
        let client = CmsClient::connect(&self.config.cms)
            .await
            .with_context(|| format!("Failed to connect to CMS at {:?}", self.config.cms.endpoint))?;

        Ok(match content_ref {
            Some(r) => client.with_ref(r),
            None => client,
        })
    }

    /// Generate the static site
    pub async fn generate(&self, content_ref: Option<&str>) -> Result<()> {
        commands::generate::run(self, content_ref).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_new_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Space\npublic_dir: out\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "Space");
        assert_eq!(blog.public_dir, dir.path().join("out"));
    }

    #[test]
    fn test_new_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.per_page, 10);
        assert_eq!(blog.public_dir, dir.path().join("public"));
    }
}
