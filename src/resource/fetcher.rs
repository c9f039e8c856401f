//! Resource fetching
//!
//! One GET per call, no retries and no caching at this layer. The transport
//! timeout comes from configuration.

use super::{normalize, Payload, ResourceRequest};
use crate::config::ApiConfig;
use crate::error::{FetchError, FetchResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::future::Future;
use std::time::Duration;

/// Anything that can turn a request into a payload
pub trait ResourceFetcher: Send + Sync + 'static {
    fn fetch(&self, request: &ResourceRequest) -> impl Future<Output = FetchResult<Payload>> + Send;

    /// URL the request resolves to, used as the shared cache key
    fn cache_key(&self, request: &ResourceRequest) -> FetchResult<String>;
}

/// Unwrap the envelope and apply the request's field aliases
pub fn ingest(body: serde_json::Value, request: &ResourceRequest) -> FetchResult<Payload> {
    let (mut payload, shape) = normalize(body, request.domain_key.as_deref())?;
    log::trace!("{} unwrapped from {:?} envelope", request.endpoint, shape);
    request.aliases.apply(&mut payload);
    Ok(payload)
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &ApiConfig) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, request: &ResourceRequest) -> FetchResult<Payload> {
        let url = request.url(&self.base_url)?;
        log::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {} returned {}", url, status);
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        ingest(body, request)
    }

    fn cache_key(&self, request: &ResourceRequest) -> FetchResult<String> {
        request.cache_key(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::resource::FieldAliases;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn history(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        let title = match q.get("lang").map(String::as_str) {
            Some("en") => "Founded",
            _ => "Основан",
        };
        Json(json!({"results": [{"year": 1955, "name": title}]}))
    }

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route("/api/academy/history-steps/", get(history))
            .route("/api/broken/", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/api/garbage/", get(|| async { "<html>oops</html>" }))
            .route(
                "/api/closed/",
                get(|| async { Json(json!({"success": false, "error": "closed"})) }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetcher(base_url: &str) -> HttpFetcher {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..ApiConfig::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    #[test]
    fn test_ingest_applies_aliases_after_unwrap() {
        let request = ResourceRequest::new("/api/x/", Locale::En)
            .with_domain_key("faculty")
            .with_aliases(FieldAliases::new().alias("description", &["info.description"]));
        let body = json!({"faculty": {"info": {"description": "Law"}}});
        let payload = ingest(body, &request).unwrap();
        assert_eq!(payload["description"], json!("Law"));
    }

    #[tokio::test]
    async fn test_fetch_history_steps() {
        let base = spawn_backend().await;
        let request = ResourceRequest::new("/api/academy/history-steps/", Locale::En)
            .with_aliases(FieldAliases::new().alias("title", &["name"]));

        let payload = fetcher(&base).fetch(&request).await.unwrap();
        assert_eq!(payload, json!([{"year": 1955, "name": "Founded", "title": "Founded"}]));
    }

    #[tokio::test]
    async fn test_fetch_is_idempotent() {
        let base = spawn_backend().await;
        let fetcher = fetcher(&base);
        let request = ResourceRequest::new("/api/academy/history-steps/", Locale::Ru);
        let first = fetcher.fetch(&request).await.unwrap();
        let second = fetcher.fetch(&request).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let base = spawn_backend().await;
        let request = ResourceRequest::new("/api/broken/", Locale::En);
        let err = fetcher(&base).fetch(&request).await.unwrap_err();
        assert_eq!(err, FetchError::Http { status: 500 });
    }

    #[tokio::test]
    async fn test_decode_error() {
        let base = spawn_backend().await;
        let request = ResourceRequest::new("/api/garbage/", Locale::En);
        let err = fetcher(&base).fetch(&request).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_rejected_body() {
        let base = spawn_backend().await;
        let request = ResourceRequest::new("/api/closed/", Locale::En);
        let err = fetcher(&base).fetch(&request).await.unwrap_err();
        assert_eq!(err, FetchError::Rejected("closed".into()));
    }

    #[tokio::test]
    async fn test_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = ResourceRequest::new("/api/academy/history-steps/", Locale::En);
        let err = fetcher(&format!("http://{}", addr)).fetch(&request).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
