use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::api::endpoints;
use crate::api::models::{Article, ArticlesResponse, LogsResponse, ScrapeResponse, ScrapingLog};
use crate::error::Result;

/// Listing size used when the page renders articles.
pub const PAGE_SIZE: u32 = 20;

/// Upper bound for the read-only calls. A scrape runs as long as the
/// backend needs.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// The backend endpoints the page talks to.
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Asks the backend to refresh article data, optionally for one category.
    async fn trigger_scrape(&self, category: Option<&str>) -> Result<ScrapeResponse>;

    /// The most recently scraped article, if there is one.
    async fn latest_article(&self) -> Result<Option<Article>>;

    async fn list_articles(&self, category: Option<&str>, limit: u32, offset: u32) -> Result<Vec<Article>>;

    async fn scraping_logs(&self) -> Result<Vec<ScrapingLog>>;
}

#[derive(Clone)]
pub struct PortalClient {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
}

impl PortalClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: CLIENT.clone(),
            base_url,
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    // Non-2xx responses are still parsed; the body decides success.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Portal responded");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PortalApi for PortalClient {
    async fn trigger_scrape(&self, category: Option<&str>) -> Result<ScrapeResponse> {
        let url = endpoints::scrape_url(&self.base_url, category);
        debug!(%url, "Triggering scrape");
        let response = self.client.post(&url).send().await?;
        Self::read_json(response).await
    }

    async fn latest_article(&self) -> Result<Option<Article>> {
        let articles = self.list_articles(None, 1, 0).await?;
        Ok(articles.into_iter().next())
    }

    async fn list_articles(&self, category: Option<&str>, limit: u32, offset: u32) -> Result<Vec<Article>> {
        let url = endpoints::articles_url(&self.base_url, category, limit, offset);
        let response = self.client.get(&url).timeout(self.request_timeout).send().await?;
        let body: ArticlesResponse = Self::read_json(response).await?;
        Ok(body.articles)
    }

    async fn scraping_logs(&self) -> Result<Vec<ScrapingLog>> {
        let url = endpoints::logs_url(&self.base_url);
        let response = self.client.get(&url).timeout(self.request_timeout).send().await?;
        let body: LogsResponse = Self::read_json(response).await?;
        Ok(body.logs)
    }
}
