//! HTTP transport behind the tracking client
//!
//! The client only depends on [`HttpTransport`]; [`ReqwestTransport`] is the
//! production implementation talking HTTPS to the tracking API.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::warn;

use crate::error::{Error, TransportError};

/// Default timeout for one request round trip
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request as handed to the transport, path relative to the API base
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Status and raw body of a completed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// Executes one HTTP call
///
/// An `Err` means no status was obtained (connect, TLS, timeout). Any status,
/// including 4xx/5xx, comes back as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed HTTPS transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport rooted at `base_url`
    ///
    /// A trailing `/` is added when missing so relative paths join cleanly.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, self.url_for(&request.path))
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        // A status was received, so a broken body must not hide it
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(status, error = %err, "failed to read response body");
                String::new()
            }
        };

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let transport = ReqwestTransport::new("http://localhost:9999/api/v1", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:9999/api/v1/");
    }

    #[test]
    fn test_url_join() {
        let transport =
            ReqwestTransport::new("https://track.customer.io/api/v1/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            transport.url_for("customers/42/events"),
            "https://track.customer.io/api/v1/customers/42/events"
        );
        assert_eq!(
            transport.url_for("/customers/7"),
            "https://track.customer.io/api/v1/customers/7"
        );
    }
}
