//! Fake HTTP backend for tests.
//!
//! Available inside this crate's tests and, with the `test-utils` feature,
//! to other crates' tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ports::{HttpBackend, HttpError, HttpRequest, HttpResponse, HttpResult};

/// A fake HTTP backend that returns canned responses.
///
/// Responses are matched by URL substring, in the order they were added.
/// Every request is recorded so tests can assert on what was sent.
#[derive(Default)]
pub struct FakeBackend {
    responses: Vec<(String, HttpResponse)>,
    default_response: Option<HttpResponse>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    hang: bool,
}

impl FakeBackend {
    /// Create a fake backend that answers 404 to everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose requests never complete. Used for cancellation tests.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    /// Add a canned response for URLs containing `url_contains`.
    #[must_use]
    pub fn with_response(mut self, url_contains: &str, response: HttpResponse) -> Self {
        self.responses.push((url_contains.to_string(), response));
        self
    }

    /// Add a canned text response.
    #[must_use]
    pub fn with_text(self, url_contains: &str, status: u16, body: &str) -> Self {
        self.with_response(url_contains, HttpResponse::new(status, body.as_bytes().to_vec()))
    }

    /// Add a canned JSON response.
    #[must_use]
    pub fn with_json(self, url_contains: &str, json: &serde_json::Value) -> Self {
        let mut response = HttpResponse::new(200, json.to_string().into_bytes());
        response
            .headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self.with_response(url_contains, response)
    }

    /// Set a default response for URLs that don't match any pattern.
    #[must_use]
    pub fn with_default(mut self, response: HttpResponse) -> Self {
        self.default_response = Some(response);
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.recorded().clone()
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<HttpRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn find_response(&self, url: &str) -> Option<HttpResponse> {
        self.responses
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .or_else(|| self.default_response.clone())
    }
}

#[async_trait]
impl HttpBackend for FakeBackend {
    async fn send(&self, request: HttpRequest) -> HttpResult<HttpResponse> {
        let url = request.url.to_string();
        self.recorded().push(request);

        if self.hang {
            std::future::pending::<()>().await;
        }

        Ok(self
            .find_response(&url)
            .unwrap_or_else(|| HttpResponse::new(404, b"not found".to_vec())))
    }
}

/// A backend that always fails at the transport level.
pub struct FailingBackend {
    pub message: String,
}

#[async_trait]
impl HttpBackend for FailingBackend {
    async fn send(&self, _request: HttpRequest) -> HttpResult<HttpResponse> {
        Err(HttpError::Network {
            message: self.message.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    fn get(url: &str) -> HttpRequest {
        HttpRequest::get(Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_fake_backend_returns_canned_response() {
        let backend = FakeBackend::new().with_json("graphql", &json!({"data": {"x": 1}}));

        let response = backend.send(get("https://api.example.com/graphql")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert!(response.text().contains("\"x\":1"));
    }

    #[tokio::test]
    async fn test_fake_backend_returns_404_for_unknown_url() {
        let backend = FakeBackend::new();
        let response = backend.send(get("https://example.com/unknown")).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_fake_backend_default_response() {
        let backend = FakeBackend::new().with_default(HttpResponse::new(200, b"default".to_vec()));
        let response = backend.send(get("https://example.com/anything")).await.unwrap();
        assert_eq!(response.text(), "default");
    }

    #[tokio::test]
    async fn test_fake_backend_records_requests() {
        let backend = FakeBackend::new();
        backend.send(get("https://example.com/a")).await.unwrap();
        backend.send(get("https://example.com/b")).await.unwrap();

        let urls: Vec<String> = backend.requests().iter().map(|r| r.url.to_string()).collect();
        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[tokio::test]
    async fn test_failing_backend_reports_network_error() {
        let backend = FailingBackend {
            message: "connection refused".to_string(),
        };
        let err = backend.send(get("https://example.com")).await.unwrap_err();
        assert!(matches!(err, HttpError::Network { .. }));
    }
}
