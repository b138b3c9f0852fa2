//! HTTP transport used by the schedulers
//!
//! The schedulers never talk to reqwest directly. They go through the
//! [`Transport`] trait, which hides credential handling and lets tests
//! replay scripted responses.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use crate::error::{Result, SdkError};
use crate::pod::Credentials;

/// Content type for ESS REST calls
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type for SOAP 1.2 calls
pub const CONTENT_TYPE_SOAP: &str = "application/soap+xml; charset=utf-8";

/// Status and body of an HTTP exchange, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-success response into [`SdkError::Transport`]
    pub fn error_for_status(self) -> Result<Self> {
        if !self.is_success() {
            return Err(SdkError::transport(self.status, self.body));
        }
        Ok(self)
    }
}

/// Authenticated request execution against a pod
///
/// Implementations return `Ok` for every response the server sends,
/// whatever its status; classification is left to the caller. `Err` means
/// no response was received at all.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON document
    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse>;

    /// POST a SOAP envelope
    async fn post_xml(&self, url: &str, body: String) -> Result<RawResponse>;

    /// GET a resource
    async fn get(&self, url: &str) -> Result<RawResponse>;
}

/// reqwest-backed transport using basic authentication
///
/// A fresh client is built for every call, so no connection is held open
/// across the long waits of a polling loop.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    credentials: Credentials,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport with a 30 second per-request timeout
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client(&self) -> Result<HttpClient> {
        Ok(HttpClient::builder().timeout(self.timeout).build()?)
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(self.credentials.username(), Some(self.credentials.password()))
    }

    async fn send(request: RequestBuilder) -> Result<RawResponse> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse> {
        let request = self
            .client()?
            .post(url)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body.to_string());
        Self::send(self.authenticate(request)).await
    }

    async fn post_xml(&self, url: &str, body: String) -> Result<RawResponse> {
        let request = self
            .client()?
            .post(url)
            .header(CONTENT_TYPE, CONTENT_TYPE_SOAP)
            .body(body);
        Self::send(self.authenticate(request)).await
    }

    async fn get(&self, url: &str) -> Result<RawResponse> {
        let request = self
            .client()?
            .get(url)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON);
        Self::send(self.authenticate(request)).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(201, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(302, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }

    #[test]
    fn test_error_for_status_keeps_status_and_body() {
        let ok = RawResponse::new(200, "{}").error_for_status().unwrap();
        assert_eq!(ok.body, "{}");

        match RawResponse::new(404, "Not Found").error_for_status() {
            Err(SdkError::Transport { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "Not Found");
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_http_transport_debug_hides_password() {
        let transport = HttpTransport::new(Credentials::new("integration.user", "hunter2"));
        let debug = format!("{:?}", transport);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("integration.user"));
    }

    #[test]
    fn test_fake_transport_replays_in_order() {
        let fake = testing::FakeTransport::new()
            .submitted("1")
            .statuses(&["RUNNING"]);

        let first = tokio_test::block_on(fake.post_json("http://h/a", &json!({"k": 1}))).unwrap();
        let second = tokio_test::block_on(fake.get("http://h/b")).unwrap();

        assert!(first.body.contains("ReqstId"));
        assert!(second.body.contains("RUNNING"));
        assert_eq!(fake.count("POST"), 1);
        assert_eq!(fake.count("GET"), 1);
        assert_eq!(fake.calls()[0].body, r#"{"k":1}"#);
    }

    #[tokio::test]
    #[ignore] // Ignore by default since it requires a running server
    async fn test_http_transport_get() {
        let transport = HttpTransport::new(Credentials::new("username", "password"));
        let response = transport.get("http://localhost:8080/").await;

        // This would pass if something is listening on localhost:8080
        assert!(response.is_ok());
    }
}
