//! URL helper functions

use crate::config::SiteConfig;

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/post/hello/") // -> "/blog/post/hello/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Filesystem-safe form of a post slug
///
/// CMS uids are already slugs, this only guards against path tricks.
pub fn safe_slug(uid: &str) -> String {
    slug::slugify(uid)
}

/// Directory holding one subdirectory per post page
pub const POST_DIR: &str = "post";

/// Directory holding the listing chunks
pub const POSTS_DIR: &str = "posts";

/// Site-relative path of a post page
pub fn post_path(uid: &str) -> String {
    format!("{}/{}/", POST_DIR, safe_slug(uid))
}

/// Site-relative path of the n-th (1-based) listing chunk
pub fn posts_chunk_path(page: usize) -> String {
    format!("{}/{}.json", POSTS_DIR, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            root: "/blog/".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/blog/css/style.css");
        assert_eq!(url_for(&config, "post/hello/"), "/blog/post/hello/");
        assert_eq!(url_for(&config, ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/post/hello/"),
            "https://example.com/blog/post/hello/"
        );
    }

    #[test]
    fn test_post_path() {
        assert_eq!(post_path("como-utilizar-hooks"), "post/como-utilizar-hooks/");
        assert_eq!(post_path("../../etc"), "post/etc/");
        assert_eq!(posts_chunk_path(2), "posts/2.json");
    }
}
