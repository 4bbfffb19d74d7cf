//! Mock management endpoint for testing
//!
//! Simulates the server side of DMR exchanges without a running application
//! server. Payloads are base64 JSON, matching the default codec.

use base64::Engine;
use serde_json::Value;
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const MANAGEMENT_PATH: &str = "/management";

/// Mock server exposing a management endpoint under `/management`
pub struct MockManagementServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockManagementServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, MANAGEMENT_PATH)
    }

    pub fn encode(value: &Value) -> String {
        base64::engine::general_purpose::STANDARD.encode(value.to_string())
    }

    /// Successful POST answering with the given result
    pub async fn mock_post_success(&self, result: Value) {
        Mock::given(method("POST"))
            .and(path(MANAGEMENT_PATH))
            .and(header("content-type", "application/dmr-encoded"))
            .and(header("accept", "application/dmr-encoded"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(Self::encode(&result), "application/dmr-encoded"),
            )
            .mount(&self.server)
            .await;
    }

    /// POST that requires basic credentials
    pub async fn mock_post_requiring_auth(&self, authorization: &str, result: Value) {
        Mock::given(method("POST"))
            .and(path(MANAGEMENT_PATH))
            .and(header("authorization", authorization))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(Self::encode(&result), "application/dmr-encoded"),
            )
            .with_priority(1)
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(MANAGEMENT_PATH))
            .respond_with(ResponseTemplate::new(401))
            .with_priority(2)
            .mount(&self.server)
            .await;
    }

    /// Description GET on a resource path with an expected query
    pub async fn mock_description(&self, resource_path: &str, query: &[(&str, &str)], body: Value) {
        let mut mock = Mock::given(method("GET")).and(path(format!("{}{}", MANAGEMENT_PATH, resource_path)));
        for (name, value) in query {
            mock = mock.and(query_param(*name, *value));
        }
        mock.respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(Self::encode(&body), "application/dmr-encoded"),
        )
        .mount(&self.server)
        .await;
    }

    /// Any request answered with a bare status
    pub async fn mock_status(&self, status: u16) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Any request answered with a status and a base64 failure payload
    pub async fn mock_failure(&self, status: u16, payload: Value) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string(Self::encode(&payload)))
            .mount(&self.server)
            .await;
    }

    /// Temporary redirect to a login page
    pub async fn mock_redirect(&self, location: &str) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(307).insert_header("location", location))
            .mount(&self.server)
            .await;
    }

    /// Successful POST that answers only after a delay
    pub async fn mock_slow(&self, delay: Duration, result: Value) {
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(Self::encode(&result))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }
}
