//! Trending articles shown on the dashboard, from a public feed.

use chrono::Duration;
use spacedash_shared::{ApiError, Article};

use crate::api_client::{decode, ApiClient, RequestOptions};
use crate::cache::TtlCache;

pub const ARTICLES_TTL_MINUTES: i64 = 30;

/// Key of the feed in the `articles` cache.
pub const TRENDING_CACHE_KEY: &str = "trending";

#[derive(Clone)]
pub struct ArticleFeed {
    api: ApiClient,
    cache: TtlCache,
    url: String,
}

impl ArticleFeed {
    pub fn new(api: ApiClient, cache: TtlCache, url: impl Into<String>) -> Self {
        Self {
            api,
            cache,
            url: url.into(),
        }
    }

    /// Cached articles while fresh, otherwise a live fetch that refills the cache.
    pub async fn trending(&self) -> Result<Vec<Article>, ApiError> {
        if let Some(articles) = self.cache.get::<Vec<Article>>(TRENDING_CACHE_KEY) {
            crate::log_debug!("Trending articles served from cache");
            return Ok(articles);
        }

        let resp = self.api.get(&self.url, RequestOptions::anonymous()).await?;
        let articles: Option<Vec<Article>> = decode(resp).await?;
        let articles = articles.unwrap_or_default();
        self.cache.put(
            TRENDING_CACHE_KEY,
            &articles,
            Duration::minutes(ARTICLES_TTL_MINUTES),
        );
        Ok(articles)
    }

    pub fn invalidate(&self) {
        self.cache.invalidate(TRENDING_CACHE_KEY);
    }
}
