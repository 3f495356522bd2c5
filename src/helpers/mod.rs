//! Helper functions for templates and page generation

mod date;
mod html;
mod url;

use chrono::{DateTime, Utc};

pub use date::*;
pub use html::*;
pub use url::*;

use crate::config::SiteConfig;

/// Site-aware helpers bound to one configuration
pub struct Helpers {
    config: SiteConfig,
    tz: Option<chrono_tz::Tz>,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: SiteConfig) -> Self {
        let tz = config.tz();
        Self { config, tz }
    }

    /// Get url_for helper
    pub fn url_for(&self, path: &str) -> String {
        url_for(&self.config, path)
    }

    /// Get full_url_for helper
    pub fn full_url_for(&self, path: &str) -> String {
        full_url_for(&self.config, path)
    }

    /// Link to a post page
    pub fn post_url(&self, uid: &str) -> String {
        url_for(&self.config, &post_path(uid))
    }

    /// Format a CMS date in the site timezone, language and date format
    pub fn date(&self, date: &DateTime<Utc>) -> String {
        let format = &self.config.date_format;
        let locale = &self.config.language;
        match self.tz {
            Some(tz) => format_date(&date.with_timezone(&tz), format, locale),
            None => format_date(date, format, locale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_uses_site_settings() {
        let config = SiteConfig {
            language: "pt-BR".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
            ..SiteConfig::default()
        };
        let helpers = Helpers::new(config);
        let date = Utc.with_ymd_and_hms(2021, 3, 26, 1, 0, 0).unwrap();
        assert_eq!(helpers.date(&date), "25 mar 2021");
    }

    #[test]
    fn test_post_url() {
        let config = SiteConfig {
            root: "/blog/".to_string(),
            ..SiteConfig::default()
        };
        let helpers = Helpers::new(config);
        assert_eq!(helpers.post_url("hello"), "/blog/post/hello/");
    }
}
