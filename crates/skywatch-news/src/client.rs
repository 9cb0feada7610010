//! NewsAPI-style search client.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use crate::sample::sample_articles;
use crate::types::{Article, NewsError};

const SEARCH_PATH: &str = "/v2/everything";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    query: String,
    language: String,
    max_articles: usize,
}

#[derive(Debug, Deserialize)]
struct SearchDto {
    #[serde(default)]
    articles: Vec<ArticleDto>,
}

#[derive(Debug, Deserialize)]
struct ArticleDto {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

impl NewsClient {
    /// Create a client against the given API host.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        query: &str,
        language: &str,
        max_articles: usize,
    ) -> Result<Self, NewsError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            query: query.to_string(),
            language: language.to_string(),
            max_articles,
        })
    }

    /// Search recent headlines, newest first, capped at the configured count.
    /// Records missing a title, link, or date are dropped.
    ///
    /// # Errors
    /// Returns an error on transport, API, or parse failure.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_articles(&self) -> Result<Vec<Article>, NewsError> {
        let url = format!(
            "{}{}?q={}&language={}&sortBy=publishedAt&apiKey={}",
            self.base_url,
            SEARCH_PATH,
            urlencoding::encode(&self.query),
            self.language,
            self.api_key
        );
        let response = self.client.get(&url).send().await?;
        let search: SearchDto = self.handle_response(response).await?;

        let articles: Vec<Article> = search
            .articles
            .into_iter()
            .filter_map(normalize)
            .take(self.max_articles)
            .collect();
        tracing::debug!(count = articles.len(), "Fetched news articles");
        Ok(articles)
    }

    /// Headlines for display: fetched articles, or the built-in samples when
    /// the API cannot be reached. Never fails.
    pub async fn load_headlines(&self, now: DateTime<Utc>) -> Vec<Article> {
        match self.fetch_articles().await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!("News fetch failed, serving sample headlines: {}", e);
                sample_articles(now)
            }
        }
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, NewsError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| NewsError::Parse(format!("JSON parse error: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NewsError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn normalize(dto: ArticleDto) -> Option<Article> {
    let published_at = DateTime::parse_from_rfc3339(&dto.published_at?)
        .ok()?
        .with_timezone(&Utc);

    Some(Article {
        title: dto.title?,
        description: dto.description,
        url: dto.url?,
        published_at,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article(title: &str, published_at: &str) -> serde_json::Value {
        serde_json::json!({
            "title": title,
            "description": "details",
            "url": "https://example.com/story",
            "publishedAt": published_at
        })
    }

    fn client_for(server: &MockServer) -> NewsClient {
        NewsClient::new(
            &server.uri(),
            "test-key",
            "weather OR disaster",
            "en",
            20,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_articles() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "weather OR disaster"))
            .and(query_param("language", "en"))
            .and(query_param("sortBy", "publishedAt"))
            .and(query_param("apiKey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "articles": [
                    article("Flood warning for Turkestan region", "2024-08-01T10:00:00Z"),
                    article("Heatwave to continue through the week", "2024-08-01T08:30:00Z"),
                ]
            })))
            .mount(&mock_server)
            .await;

        let articles = client_for(&mock_server).fetch_articles().await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Flood warning for Turkestan region");
        assert_eq!(articles[0].description.as_deref(), Some("details"));
        assert_eq!(articles[0].published_at.timestamp(), 1_722_506_400);
    }

    #[tokio::test]
    async fn test_fetch_articles_capped_at_twenty() {
        let mock_server = MockServer::start().await;
        let list: Vec<_> = (0..25)
            .map(|i| article(&format!("Story {}", i), "2024-08-01T10:00:00Z"))
            .collect();
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "articles": list })),
            )
            .mount(&mock_server)
            .await;

        let articles = client_for(&mock_server).fetch_articles().await.unwrap();

        assert_eq!(articles.len(), 20);
        assert_eq!(articles[0].title, "Story 0");
        assert_eq!(articles[19].title, "Story 19");
    }

    #[tokio::test]
    async fn test_incomplete_records_dropped() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "articles": [
                    { "title": null, "url": "https://example.com", "publishedAt": "2024-08-01T10:00:00Z" },
                    { "title": "No link", "url": null, "publishedAt": "2024-08-01T10:00:00Z" },
                    { "title": "Bad date", "url": "https://example.com", "publishedAt": "yesterday" },
                    article("Kept", "2024-08-01T10:00:00Z"),
                ]
            })))
            .mount(&mock_server)
            .await;

        let articles = client_for(&mock_server).fetch_articles().await.unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Kept");
    }

    #[tokio::test]
    async fn test_empty_result_is_valid() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "articles": [] })),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert!(client.fetch_articles().await.unwrap().is_empty());

        // an empty success is not a failure: no sample fallback
        assert!(client.load_headlines(Utc::now()).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_headlines_falls_back_on_server_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let now = Utc::now();
        let articles = client_for(&mock_server).load_headlines(now).await;

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Sample story: Wildfire near Shymkent");
        assert_eq!(articles[1].published_at, now - chrono::Duration::hours(24));
    }

    #[tokio::test]
    async fn test_load_headlines_falls_back_on_unreachable_host() {
        let client = NewsClient::new("http://127.0.0.1:1", "k", "q", "en", 20).unwrap();
        let articles = client.load_headlines(Utc::now()).await;

        assert_eq!(articles.len(), 2);
    }

    #[tokio::test]
    async fn test_load_headlines_falls_back_on_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let articles = client_for(&mock_server).load_headlines(Utc::now()).await;

        assert_eq!(articles.len(), 2);
    }
}
