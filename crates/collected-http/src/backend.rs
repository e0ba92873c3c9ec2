//! Production [`HttpBackend`] on top of reqwest.
//!
//! One attempt per request: retrying is the caller's decision, and commands
//! never retry.

use async_trait::async_trait;
use collected_core::{HttpBackend, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResult};
use reqwest::redirect::Policy;
use tracing::{trace, warn};

use crate::config::HttpClientConfig;
use crate::error::BuildError;

/// reqwest-backed HTTP backend with a response size cap.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_body_bytes: u64,
}

impl ReqwestBackend {
    pub fn new(config: &HttpClientConfig) -> Result<Self, BuildError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects));

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(|source| {
                BuildError::InvalidProxy {
                    proxy: proxy.clone(),
                    source,
                }
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(BuildError::Client)?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    fn too_large(&self) -> HttpError {
        HttpError::BodyTooLarge {
            limit: self.max_body_bytes,
        }
    }
}

fn from_reqwest(err: &reqwest::Error) -> HttpError {
    if err.is_builder() {
        HttpError::InvalidRequest {
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        HttpError::Network {
            message: "request timed out".to_string(),
        }
    } else {
        HttpError::Network {
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: HttpRequest) -> HttpResult<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let mut response = builder.send().await.map_err(|err| from_reqwest(&err))?;
        let status = response.status().as_u16();

        if response
            .content_length()
            .is_some_and(|length| length > self.max_body_bytes)
        {
            warn!(status, limit = self.max_body_bytes, "Response declared a body over the limit");
            return Err(self.too_large());
        }

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let limit = usize::try_from(self.max_body_bytes).unwrap_or(usize::MAX);
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|err| from_reqwest(&err))? {
            if body.len() + chunk.len() > limit {
                warn!(status, limit = self.max_body_bytes, "Response body over the limit");
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        trace!(status, bytes = body.len(), "Response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_defaults() {
        assert!(ReqwestBackend::new(&HttpClientConfig::new()).is_ok());
    }

    #[test]
    fn test_invalid_proxy_is_rejected() {
        let config = HttpClientConfig::new().with_proxy("::not a proxy::");
        let err = ReqwestBackend::new(&config).unwrap_err();
        assert!(matches!(err, BuildError::InvalidProxy { .. }));
    }
}
