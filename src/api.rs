use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::source::PageSource;
use crate::types::Page;

pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// Client for the public Rick and Morty REST API.
pub struct RickAndMorty {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for RickAndMorty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RickAndMorty")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RickAndMorty {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}/character/?page={}", self.base_url, page)
    }
}

/// Decode a response body into a [`Page`].
fn parse_page(body: &[u8]) -> Result<Page> {
    serde_json::from_slice(body).map_err(|e| AppError::Parse(e.to_string()))
}

#[async_trait]
impl PageSource for RickAndMorty {
    fn name(&self) -> &str {
        "rickandmortyapi"
    }

    async fn fetch_page(&self, page: u32) -> Result<Page> {
        let url = self.page_url(page);
        tracing::debug!(%url, "fetching page");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "request failed");
            AppError::Fetch(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "non-success status");
            return Err(AppError::Fetch(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        parse_page(&body)
            .inspect_err(|e| tracing::warn!(%url, error = %e, "unparseable page"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_uses_query_parameter() {
        let api = RickAndMorty::new(DEFAULT_BASE_URL, None).unwrap();
        assert_eq!(
            api.page_url(3),
            "https://rickandmortyapi.com/api/character/?page=3"
        );
    }

    #[test]
    fn page_url_trims_trailing_slash() {
        let api = RickAndMorty::new("http://localhost:8080/api/", None).unwrap();
        assert_eq!(api.page_url(1), "http://localhost:8080/api/character/?page=1");
    }

    #[test]
    fn parse_page_accepts_api_payload() {
        let body = br#"{"info":{"next":null},"results":[{"id":7,"name":"Abradolf Lincler","image":"x.jpeg"}]}"#;
        let page = parse_page(body).unwrap();
        assert_eq!(page.results[0].id, 7);
        assert!(!page.has_next());
    }

    #[test]
    fn parse_page_rejects_malformed_json() {
        let err = parse_page(b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn parse_page_rejects_missing_results() {
        let err = parse_page(br#"{"info":{"next":null}}"#).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = format!("http://{}/api", addr);
        let api = RickAndMorty::new(&base, Some(Duration::from_secs(2))).unwrap();
        let err = api.fetch_page(1).await.unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }

    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::{header, StatusCode, Uri};
    use axum::response::{IntoResponse, Response};
    use axum::Router;
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    const ONE_CHARACTER: &str = r#"{"info":{"next":"http://x/api/character/?page=2"},"results":[{"id":1,"name":"Rick Sanchez","image":"1.jpeg"}]}"#;

    /// Canned reply for the character endpoint plus a log of every request
    /// path the backend saw.
    #[derive(Clone)]
    struct MockApi {
        requests: Arc<Mutex<Vec<String>>>,
        status: StatusCode,
        body: &'static str,
    }

    async fn character_endpoint(State(api): State<MockApi>, uri: Uri) -> Response {
        let path = uri
            .path_and_query()
            .map(|p| p.to_string())
            .unwrap_or_default();
        api.requests.lock().await.push(path);

        if uri.path() != "/api/character/" {
            return StatusCode::NOT_FOUND.into_response();
        }
        (
            api.status,
            [(header::CONTENT_TYPE, "application/json")],
            api.body,
        )
            .into_response()
    }

    /// Start the mock on a local port and return the base URL and request log.
    async fn mock_api(status: StatusCode, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .fallback(character_endpoint)
            .with_state(MockApi {
                requests: Arc::clone(&requests),
                status,
                body,
            });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/api", addr), requests)
    }

    #[tokio::test]
    async fn requests_character_endpoint_with_page_query() {
        let (base, requests) = mock_api(StatusCode::OK, ONE_CHARACTER).await;
        let api = RickAndMorty::new(&format!("{}/", base), None).unwrap();
        api.fetch_page(7).await.unwrap();

        assert_eq!(*requests.lock().await, vec!["/api/character/?page=7"]);
    }

    #[tokio::test]
    async fn wrong_base_path_is_a_fetch_error() {
        let (base, requests) = mock_api(StatusCode::OK, ONE_CHARACTER).await;
        let api = RickAndMorty::new(&format!("{}/v2", base), None).unwrap();
        match api.fetch_page(1).await {
            Err(AppError::Fetch(msg)) => {
                assert_eq!(msg, "Request failed with status code 404")
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
        assert_eq!(*requests.lock().await, vec!["/api/v2/character/?page=1"]);
    }

    #[tokio::test]
    async fn server_error_status_is_a_fetch_error() {
        let (base, _) = mock_api(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#).await;
        let api = RickAndMorty::new(&base, None).unwrap();
        match api.fetch_page(1).await {
            Err(AppError::Fetch(msg)) => {
                assert_eq!(msg, "Request failed with status code 500")
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn successful_response_is_parsed() {
        let (base, _) = mock_api(StatusCode::OK, ONE_CHARACTER).await;
        let api = RickAndMorty::new(&base, None).unwrap();
        let page = api.fetch_page(1).await.unwrap();
        assert!(page.has_next());
        assert_eq!(page.results[0].name, "Rick Sanchez");
    }

    #[tokio::test]
    async fn garbage_body_is_a_parse_error() {
        let (base, _) = mock_api(StatusCode::OK, "not json").await;
        let api = RickAndMorty::new(&base, None).unwrap();
        let err = api.fetch_page(1).await.unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
