//! HTTP client for the CMS REST API

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{ApiDescription, CmsError, ContentSource, Query, SearchResponse};
use crate::config::CmsConfig;

/// Pause between retried requests
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Authenticated client bound to one CMS repository and content release
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
    content_ref: String,
    retries: u32,
}

impl CmsClient {
    /// Connect to the API entry point and bind to the master ref
    pub async fn connect(config: &CmsConfig) -> Result<Self, CmsError> {
        let endpoint = parse_url(config.endpoint.trim_end_matches('/'))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("spacetraveling/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut client = Self {
            http,
            endpoint,
            access_token: config.access_token.clone(),
            content_ref: String::new(),
            retries: config.retries,
        };

        let api: ApiDescription = client.get_json(client.endpoint.clone(), &[]).await?;
        client.content_ref = api.master_ref().ok_or(CmsError::NoMasterRef)?.to_string();
        tracing::debug!("Bound to master ref {}", client.content_ref);

        Ok(client)
    }

    /// Query a different content release (preview, scheduled release)
    pub fn with_ref(mut self, content_ref: impl Into<String>) -> Self {
        self.content_ref = content_ref.into();
        self
    }

    pub fn content_ref(&self) -> &str {
        &self.content_ref
    }

    fn search_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path(&format!(
            "{}/documents/search",
            self.endpoint.path().trim_end_matches('/')
        ));
        url
    }

    /// Add the access token to a cursor URL unless it already carries one
    fn authorize(&self, mut url: Url) -> Url {
        if let Some(ref token) = self.access_token {
            let has_token = url.query_pairs().any(|(k, _)| k == "access_token");
            if !has_token {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, CmsError> {
        let url = self.authorize(url);
        let mut attempt = 0;

        loop {
            match self.get_once(url.clone(), params).await {
                Ok(body) => return Ok(serde_json::from_str(&body)?),
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "CMS request failed ({}), retrying {}/{}",
                        e,
                        attempt,
                        self.retries
                    );
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(&self, url: Url, params: &[(&str, String)]) -> Result<String, CmsError> {
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CmsError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ContentSource for CmsClient {
    async fn search(&self, query: &Query) -> Result<SearchResponse, CmsError> {
        let mut params = vec![("ref", self.content_ref.clone())];
        params.extend(query.params());
        self.get_json(self.search_url(), &params).await
    }

    async fn fetch_page(&self, cursor: &str) -> Result<SearchResponse, CmsError> {
        let url = parse_url(cursor)?;
        self.get_json(url, &[]).await
    }
}

fn parse_url(raw: &str) -> Result<Url, CmsError> {
    Url::parse(raw).map_err(|e| CmsError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
